use crate::item::{ItemSource, SelectableItem};
use std::collections::HashSet;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tracing::debug;

/// Every executable reachable through `$PATH`
pub struct PathExecutables {
    path: OsString,
}

impl PathExecutables {
    pub fn new(path: OsString) -> Self {
        Self { path }
    }

    pub fn from_env() -> Self {
        Self::new(env::var_os("PATH").unwrap_or_default())
    }
}

impl ItemSource for PathExecutables {
    fn items(&self) -> Vec<SelectableItem> {
        let mut items = Vec::new();
        let mut seen = HashSet::new();

        for dir in env::split_paths(&self.path) {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };

            for entry in entries.flatten() {
                // Follows symlinks, so /usr/bin style links count
                let Ok(meta) = fs::metadata(entry.path()) else {
                    continue;
                };
                if !meta.is_file() || meta.permissions().mode() & 0o111 == 0 {
                    continue;
                }

                let name = entry.file_name().to_string_lossy().into_owned();
                if seen.insert(name.clone()) {
                    items.push(SelectableItem::new(name.clone(), name));
                }
            }
        }

        items.sort_by_key(|item| item.name.to_lowercase());
        debug!("Found {} executables on PATH", items.len());
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(path: &Path, mode: u32) {
        fs::write(path, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[test]
    fn test_collects_executables_only() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        touch(&a.path().join("zathura"), 0o755);
        touch(&a.path().join("README"), 0o644);
        touch(&b.path().join("Btop"), 0o700);
        touch(&b.path().join("zathura"), 0o755);
        fs::create_dir(a.path().join("subdir")).unwrap();

        let path = env::join_paths([a.path(), b.path(), Path::new("/nonexistent")]).unwrap();
        let items = PathExecutables::new(path).items();

        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Btop", "zathura"]);
        assert_eq!(items[1].payload, "zathura");
    }

    #[test]
    fn test_empty_path() {
        assert!(PathExecutables::new(OsString::new()).items().is_empty());
    }
}
