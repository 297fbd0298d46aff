use crate::icons::IconResolver;
use crate::item::{Icon, ItemSource, SelectableItem};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// The parts of a `.desktop` file the launcher uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: String,
    pub exec: String,
    pub icon: Option<String>,
}

/// Parse the `[Desktop Entry]` group of a desktop file.
///
/// Returns `None` for hidden entries (`NoDisplay=true`), non-applications
/// and entries lacking a name or command. Exec field codes (`%f`, `%U`, ...)
/// are dropped.
pub fn parse_desktop_entry(content: &str) -> Option<DesktopEntry> {
    let mut name = None;
    let mut exec = None;
    let mut entry_type = None;
    let mut icon = None;
    let mut in_entry = false;

    for line in content.lines() {
        let line = line.trim();
        if line == "[Desktop Entry]" {
            in_entry = true;
            continue;
        }
        if line.starts_with('[') {
            in_entry = false;
            continue;
        }
        if !in_entry {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "Name" => name = Some(value.trim().to_string()),
            "Exec" => exec = Some(value.trim().to_string()),
            "Type" => entry_type = Some(value.trim().to_string()),
            "Icon" => icon = Some(value.trim().to_string()),
            "NoDisplay" if value.trim() == "true" => return None,
            _ => {}
        }
    }

    if !matches!(entry_type.as_deref(), None | Some("Application") | Some("")) {
        return None;
    }

    let name = name.filter(|n| !n.is_empty())?;
    let exec = strip_field_codes(&exec?);
    if exec.is_empty() {
        return None;
    }

    Some(DesktopEntry {
        name,
        exec,
        icon: icon.filter(|i| !i.is_empty()),
    })
}

fn strip_field_codes(exec: &str) -> String {
    exec.split_whitespace()
        .filter(|part| !part.starts_with('%'))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Applications from `.desktop` files in a list of directories
pub struct DesktopEntries {
    dirs: Vec<PathBuf>,
    icons: Option<IconResolver>,
}

impl DesktopEntries {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs, icons: None }
    }

    /// Resolve `Icon=` values while loading
    pub fn with_icons(mut self, resolver: IconResolver) -> Self {
        self.icons = Some(resolver);
        self
    }

    fn icon_for(&self, entry: &DesktopEntry) -> Icon {
        match (&self.icons, &entry.icon) {
            (Some(resolver), Some(name)) => match resolver.find(name) {
                Some(path) => Icon::Found(path),
                None => Icon::Missing,
            },
            _ => Icon::None,
        }
    }
}

impl ItemSource for DesktopEntries {
    fn items(&self) -> Vec<SelectableItem> {
        let mut items = Vec::new();
        let mut seen = HashSet::new();

        for dir in &self.dirs {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("Skipping {}: {}", dir.display(), e);
                    continue;
                }
            };

            let mut paths: Vec<PathBuf> = entries
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "desktop"))
                .collect();
            paths.sort();

            for path in paths {
                let content = match fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!("Failed to read {}: {}", path.display(), e);
                        continue;
                    }
                };

                if let Some(entry) = parse_desktop_entry(&content) {
                    if seen.insert(entry.name.clone()) {
                        let icon = self.icon_for(&entry);
                        items.push(SelectableItem::new(entry.name, entry.exec).with_icon(icon));
                    }
                }
            }
        }

        debug!("Found {} desktop applications", items.len());
        items
    }
}
