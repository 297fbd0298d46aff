//! Image previews for the side panel.
//!
//! The selector only cares about lines of pre-rendered terminal text; how an
//! image turns into those lines is up to the [`PreviewRenderer`].

use crate::item::SelectableItem;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Label drawn for placeholder entries instead of an image
pub const PLACEHOLDER_LABEL: &str = "[ Random ]";

/// Turns an image into a block of terminal text
pub trait PreviewRenderer {
    /// Render `path` into roughly `width` x `height` cells.
    ///
    /// Never fails: on error the block describes the error instead. The block
    /// may be shorter than `height`.
    fn render(&self, path: &Path, width: u16, height: u16) -> Vec<String>;
}

/// Renders previews by shelling out to `chafa`
#[derive(Debug, Clone)]
pub struct ChafaRenderer {
    command: String,
    extra_args: Vec<String>,
}

impl ChafaRenderer {
    pub fn new(command: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            extra_args,
        }
    }

    fn command_for(&self, path: &Path, width: u16, height: u16) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg("--size")
            .arg(format!("{}x{}", width, height))
            .args(&self.extra_args)
            .arg(path);
        cmd
    }
}

impl PreviewRenderer for ChafaRenderer {
    fn render(&self, path: &Path, width: u16, height: u16) -> Vec<String> {
        debug!("Rendering preview {} at {}x{}", path.display(), width, height);

        match self.command_for(path, width, height).output() {
            Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
                .lines()
                .map(str::to_string)
                .collect(),
            Ok(output) => {
                let mut lines = vec![format!("{} error: {}", self.command, output.status)];
                lines.extend(String::from_utf8_lossy(&output.stderr).lines().map(str::to_string));
                lines
            }
            Err(e) => vec![format!("{} error: {}", self.command, e)],
        }
    }
}

/// Static block shown for placeholder entries: `height` rows of `width`
/// blanks with the label centred.
pub fn placeholder_block(width: u16, height: u16) -> Vec<String> {
    let width = width as usize;
    let height = height as usize;
    let mut lines = vec![" ".repeat(width); height];

    if let Some(middle) = lines.get_mut(height / 2) {
        let label: String = PLACEHOLDER_LABEL.chars().take(width).collect();
        let pad = (width - label.chars().count()) / 2;
        *middle = format!(
            "{}{}{}",
            " ".repeat(pad),
            label,
            " ".repeat(width - pad - label.chars().count())
        );
    }

    lines
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoKey {
    payload: String,
    placeholder: bool,
    width: u16,
    height: u16,
}

/// Remembers the last rendered block so the renderer only runs when the
/// selected item or the cell size changes.
#[derive(Debug, Default)]
pub struct PreviewMemo {
    key: Option<MemoKey>,
    lines: Vec<String>,
}

impl PreviewMemo {
    pub fn lines(
        &mut self,
        item: &SelectableItem,
        width: u16,
        height: u16,
        renderer: &dyn PreviewRenderer,
    ) -> &[String] {
        let key = MemoKey {
            payload: item.payload.clone(),
            placeholder: item.placeholder,
            width,
            height,
        };

        if self.key.as_ref() != Some(&key) {
            self.lines = if item.placeholder {
                placeholder_block(width, height)
            } else {
                renderer.render(Path::new(&item.payload), width, height)
            };
            self.key = Some(key);
        }

        &self.lines
    }
}
