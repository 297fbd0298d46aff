//! Selectable entries shared by the providers, the selection loop and the
//! dispatchers.

use std::collections::HashSet;
use std::path::PathBuf;

/// Resolution state of a desktop entry's icon
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Icon {
    /// The entry does not declare an icon
    #[default]
    None,
    /// Icon declared and found on disk
    Found(PathBuf),
    /// Icon declared but no matching file was found
    Missing,
}

impl Icon {
    /// Row marker shown in front of the name when icon markers are enabled
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Icon::None => None,
            Icon::Found(_) => Some("◆ "),
            Icon::Missing => Some("◇ "),
        }
    }
}

/// One entry of the list presented by the selector.
///
/// `name` is what the user sees and what the query matches against.
/// `payload` is opaque to the selector: a command line for launches, an
/// image path for wallpapers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableItem {
    pub name: String,
    pub payload: String,
    /// Synthetic entry without a concrete payload ("Random Wallpaper")
    pub placeholder: bool,
    pub icon: Icon,
}

impl SelectableItem {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
            placeholder: false,
            icon: Icon::None,
        }
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: String::new(),
            placeholder: true,
            icon: Icon::None,
        }
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = icon;
        self
    }
}

/// A producer of selectable entries (desktop files, `$PATH`, wallpapers).
///
/// Sources never fail as a whole: unreadable directories and files are
/// skipped, so the worst case is an empty list.
pub trait ItemSource {
    fn items(&self) -> Vec<SelectableItem>;
}

/// Drop entries whose name was already seen, keeping the first occurrence.
pub fn dedup_by_name(items: Vec<SelectableItem>) -> Vec<SelectableItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.name.clone()))
        .collect()
}
