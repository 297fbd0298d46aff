use crate::item::{ItemSource, SelectableItem};
use crate::utils::has_extension;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Name of the entry that picks a wallpaper at random
pub const RANDOM_WALLPAPER: &str = "Random Wallpaper";

/// Image files under the wallpaper directory, behind a "Random Wallpaper"
/// placeholder
pub struct WallpaperDir {
    dir: PathBuf,
    extensions: Vec<String>,
    recursive: bool,
}

impl WallpaperDir {
    pub fn new(dir: PathBuf, extensions: Vec<String>, recursive: bool) -> Self {
        Self {
            dir,
            extensions,
            recursive,
        }
    }

    fn scan(&self) -> Vec<PathBuf> {
        let walker = WalkDir::new(&self.dir).follow_links(true);
        let walker = if self.recursive { walker } else { walker.max_depth(1) };

        walker
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable entry under {}: {}", self.dir.display(), err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| has_extension(p, &self.extensions))
            .collect()
    }
}

impl ItemSource for WallpaperDir {
    fn items(&self) -> Vec<SelectableItem> {
        let paths = self.scan();

        let mut seen: HashMap<&OsStr, usize> = HashMap::new();
        for name in paths.iter().filter_map(|p| p.file_name()) {
            *seen.entry(name).or_default() += 1;
        }

        // Same file name in two folders: show the path under the root instead
        let mut wallpapers: Vec<SelectableItem> = paths
            .iter()
            .filter_map(|path| {
                let file_name = path.file_name()?;
                let name = if seen.get(file_name).copied().unwrap_or(0) > 1 {
                    let relative = path.strip_prefix(&self.dir).unwrap_or(path.as_path());
                    relative.to_string_lossy().into_owned()
                } else {
                    file_name.to_string_lossy().into_owned()
                };
                Some(SelectableItem::new(name, path.to_string_lossy().into_owned()))
            })
            .collect();

        wallpapers.sort_by_key(|item| item.name.to_lowercase());
        debug!("Found {} wallpapers in {}", wallpapers.len(), self.dir.display());

        let mut items = Vec::with_capacity(wallpapers.len() + 1);
        items.push(SelectableItem::placeholder(RANDOM_WALLPAPER));
        items.extend(wallpapers);
        items
    }
}

/// Wallpaper category, taken from the directory the image lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Space,
    Nature,
    Gaming,
    Minimal,
    Dark,
    Abstract,
}

impl Category {
    pub fn detect(path: &Path) -> Self {
        let path = path.to_string_lossy();
        [
            ("/space/", Category::Space),
            ("/nature/", Category::Nature),
            ("/gaming/", Category::Gaming),
            ("/minimal/", Category::Minimal),
            ("/dark/", Category::Dark),
            ("/abstract/", Category::Abstract),
        ]
        .into_iter()
        .find(|(segment, _)| path.contains(segment))
        .map(|(_, category)| category)
        .unwrap_or(Category::Minimal)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Space => "space",
            Category::Nature => "nature",
            Category::Gaming => "gaming",
            Category::Minimal => "minimal",
            Category::Dark => "dark",
            Category::Abstract => "abstract",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::IMAGE_EXTENSIONS;
    use std::fs;
    use tempfile::TempDir;

    fn exts() -> Vec<String> {
        IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("space")).unwrap();
        fs::write(dir.path().join("space/nebula.PNG"), b"").unwrap();
        fs::write(dir.path().join("Aurora.jpg"), b"").unwrap();
        fs::write(dir.path().join("dune.webp"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        dir
    }

    #[test]
    fn test_placeholder_first_then_sorted_images() {
        let dir = fixture();
        let items = WallpaperDir::new(dir.path().to_path_buf(), exts(), true).items();

        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec![RANDOM_WALLPAPER, "Aurora.jpg", "dune.webp", "nebula.PNG"]);
        assert!(items[0].placeholder);
        assert_eq!(
            items[3].payload,
            dir.path().join("space/nebula.PNG").to_string_lossy()
        );
    }

    #[test]
    fn test_same_file_name_in_two_folders() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("space")).unwrap();
        fs::create_dir_all(dir.path().join("nature")).unwrap();
        fs::write(dir.path().join("space/bg.png"), b"").unwrap();
        fs::write(dir.path().join("nature/bg.png"), b"").unwrap();
        fs::write(dir.path().join("lake.jpg"), b"").unwrap();

        let items = WallpaperDir::new(dir.path().to_path_buf(), exts(), true).items();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec![RANDOM_WALLPAPER, "lake.jpg", "nature/bg.png", "space/bg.png"]
        );
        assert_eq!(
            items[3].payload,
            dir.path().join("space/bg.png").to_string_lossy()
        );
    }

    #[test]
    fn test_non_recursive_scan() {
        let dir = fixture();
        let items = WallpaperDir::new(dir.path().to_path_buf(), exts(), false).items();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.name != "nebula.PNG"));
    }

    #[test]
    fn test_missing_directory_still_offers_placeholder() {
        let items = WallpaperDir::new(PathBuf::from("/nonexistent/walls"), exts(), true).items();
        assert_eq!(items.len(), 1);
        assert!(items[0].placeholder);
    }

    #[test]
    fn test_category_detection() {
        assert_eq!(Category::detect(Path::new("/w/space/nebula.png")), Category::Space);
        assert_eq!(Category::detect(Path::new("/w/abstract/x.jpg")), Category::Abstract);
        assert_eq!(Category::detect(Path::new("/w/dark/x.jpg")), Category::Dark);
        assert_eq!(Category::detect(Path::new("/w/other/x.jpg")), Category::Minimal);
        assert_eq!(Category::detect(Path::new("space.jpg")), Category::Minimal);
        assert_eq!(Category::Gaming.name(), "gaming");
    }
}
