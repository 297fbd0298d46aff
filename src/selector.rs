//! The interactive list selector.
//!
//! One iteration per keystroke: refresh the filter, measure the terminal,
//! scroll, draw the whole frame, then block for the next key. There is no
//! background redraw.

use crate::item::SelectableItem;
use crate::preview::{PreviewMemo, PreviewRenderer};
use crate::render::{self, FrameParams, Layout};
use crate::session::{Session, Step};
use crate::terminal::{effective_size, Console};
use anyhow::{Context, Result};
use std::io;
use tracing::{debug, info};

/// Per-run settings, computed once by the caller
#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub prompt: String,
    /// Show the side preview when the terminal is wide enough
    pub preview: bool,
    pub min_preview_width: u16,
    pub show_icons: bool,
}

impl LoopOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            preview: false,
            min_preview_width: 60,
            show_icons: false,
        }
    }
}

/// How a selection run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    Accepted(&'a SelectableItem),
    Cancelled,
    /// There was nothing to choose from; the terminal was never touched
    Empty,
}

impl<'a> Outcome<'a> {
    pub fn accepted(self) -> Option<&'a SelectableItem> {
        match self {
            Outcome::Accepted(item) => Some(item),
            Outcome::Cancelled | Outcome::Empty => None,
        }
    }
}

/// Run the selector over `items`.
///
/// `open` puts the terminal into raw mode and is only called when there is
/// something to show. The console it returns is dropped (restoring the
/// terminal) before this function returns, on every path.
pub fn select<'a, C, F>(
    items: &'a [SelectableItem],
    options: &LoopOptions,
    renderer: Option<&dyn PreviewRenderer>,
    open: F,
) -> Result<Outcome<'a>>
where
    C: Console,
    F: FnOnce() -> io::Result<C>,
{
    if items.is_empty() {
        info!("Nothing to show for {}", options.prompt);
        println!("No items found.");
        return Ok(Outcome::Empty);
    }

    let mut console = open().context("Failed to prepare terminal")?;
    let outcome = run_loop(items, options, &mut console, renderer)?;
    debug!("Selector finished: {:?}", outcome.accepted().map(|i| &i.name));
    Ok(outcome)
}

/// The loop proper, on an already prepared console
pub fn run_loop<'a, C: Console>(
    items: &'a [SelectableItem],
    options: &LoopOptions,
    console: &mut C,
    renderer: Option<&dyn PreviewRenderer>,
) -> io::Result<Outcome<'a>> {
    let mut session = Session::new(items);
    let mut memo = PreviewMemo::default();

    loop {
        session.refresh();

        let size = effective_size(console.size());
        let layout = Layout::compute(
            size,
            options.preview && renderer.is_some(),
            options.min_preview_width,
        );
        session.scroll(layout.rows);

        let preview: &[String] = match (layout.preview, renderer, session.selected_item()) {
            (Some(area), Some(renderer), Some(item)) if area.height > 0 => {
                memo.lines(item, area.width, area.height, renderer)
            }
            _ => &[],
        };

        let frame = render::compose(
            &layout,
            &session,
            &FrameParams {
                prompt: &options.prompt,
                show_icons: options.show_icons,
                preview,
            },
        )?;
        console.present(&frame)?;

        match session.apply(console.read_key()?) {
            Step::Running => {}
            Step::Accepted(idx) => return Ok(Outcome::Accepted(&items[idx])),
            Step::Cancelled => return Ok(Outcome::Cancelled),
        }
    }
}
