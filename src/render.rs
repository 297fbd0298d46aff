//! Frame layout and composition.
//!
//! A frame is built into one byte buffer (clear, home, hide cursor, draw)
//! and handed to the console in a single write so the screen never shows a
//! half-drawn list.

use crate::session::Session;
use crate::terminal::Size;
use crossterm::{
    cursor::{Hide, MoveTo},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io;
use unicode_width::UnicodeWidthChar;

/// Lines above the list: prompt and separator, plus one spare
const RESERVED_ROWS: usize = 3;
/// First screen row (0-based) used by list entries
const FIRST_LIST_ROW: u16 = 2;

/// Where the side preview goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewArea {
    /// 0-based column of the panel's left edge
    pub col: u16,
    pub width: u16,
    pub height: u16,
}

/// Geometry of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub size: Size,
    pub list_width: usize,
    /// Number of list rows that fit
    pub rows: usize,
    pub preview: Option<PreviewArea>,
}

impl Layout {
    /// The list takes half the width when a preview is wanted and the
    /// terminal is wider than `min_preview_width`, otherwise all of it.
    pub fn compute(size: Size, preview_wanted: bool, min_preview_width: u16) -> Self {
        let show_preview = preview_wanted && size.cols > min_preview_width;
        let list_width = if show_preview { size.cols / 2 } else { size.cols };
        let rows = (size.rows as usize).saturating_sub(RESERVED_ROWS);

        let preview = show_preview.then(|| PreviewArea {
            col: list_width + 1,
            width: size.cols.saturating_sub(list_width + 1),
            height: u16::try_from(rows).unwrap_or(u16::MAX),
        });

        Self {
            size,
            list_width: list_width as usize,
            rows,
            preview,
        }
    }
}

/// Cut `label` so it occupies at most `max_cols` terminal columns
pub fn truncate(label: &str, max_cols: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_cols {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

/// Everything needed to draw one frame besides the session itself
pub struct FrameParams<'a> {
    pub prompt: &'a str,
    pub show_icons: bool,
    pub preview: &'a [String],
}

/// Compose a full frame
pub fn compose(layout: &Layout, session: &Session, params: &FrameParams) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let rule_width = layout.list_width.saturating_sub(1);
    // Must not wrap onto the separator row
    let prompt_line = truncate(
        &format!("{}> {}", params.prompt, session.query()),
        usize::from(layout.size.cols),
    );

    queue!(
        buf,
        Clear(ClearType::All),
        MoveTo(0, 0),
        Hide,
        Print(prompt_line),
        MoveTo(0, 1),
        Print("-".repeat(rule_width))
    )?;

    let items = session.items();
    let filtered = session.filtered();
    let start = session.viewport_start();

    for i in 0..layout.rows {
        let row = FIRST_LIST_ROW.saturating_add(u16::try_from(i).unwrap_or(u16::MAX));
        let pos = start + i;

        if let Some(&idx) = filtered.get(pos) {
            let item = &items[idx];
            let marker = if params.show_icons { item.icon.marker() } else { None };
            let label = truncate(
                &format!("{}{}", marker.unwrap_or(""), item.name),
                rule_width,
            );

            queue!(buf, MoveTo(0, row))?;
            if pos == session.selected() {
                queue!(
                    buf,
                    SetAttribute(Attribute::Reverse),
                    Print(label),
                    SetAttribute(Attribute::Reset)
                )?;
            } else {
                queue!(buf, Print(label))?;
            }
            queue!(buf, Clear(ClearType::UntilNewLine))?;
        }

        if let (Some(area), Some(line)) = (layout.preview, params.preview.get(i)) {
            queue!(buf, MoveTo(area.col, row), Print(line))?;
        }
    }

    Ok(buf)
}
