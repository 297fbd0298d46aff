use std::path::{Path, PathBuf};

const THEMES: &[&str] = &["hicolor", "Papirus", "Adwaita", "breeze"];
const SIZES: &[&str] = &["48x48", "32x32", "24x24", "16x16", "scalable"];
const CONTEXTS: &[&str] = &["apps", "applications", ""];
const FORMATS: &[&str] = &["png", "svg", "xpm"];

/// Looks up desktop entry icons in the usual icon directories
#[derive(Debug, Clone)]
pub struct IconResolver {
    roots: Vec<PathBuf>,
}

impl IconResolver {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// User and system icon directories
    pub fn system() -> Self {
        let mut roots = Vec::new();
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join(".icons"));
            roots.push(home.join(".local/share/icons"));
        }
        roots.push(PathBuf::from("/usr/share/icons"));
        roots.push(PathBuf::from("/usr/share/pixmaps"));
        Self::new(roots)
    }

    /// Resolve an `Icon=` value to a file.
    ///
    /// Absolute values must exist as-is. Names are tried directly under each
    /// root first, then inside the known themes by size and context.
    pub fn find(&self, icon: &str) -> Option<PathBuf> {
        if icon.is_empty() {
            return None;
        }

        let as_path = Path::new(icon);
        if as_path.is_absolute() {
            return as_path.exists().then(|| as_path.to_path_buf());
        }

        for root in &self.roots {
            if let Some(found) = first_existing(root, icon) {
                return Some(found);
            }

            for theme in THEMES {
                for size in SIZES {
                    for context in CONTEXTS {
                        let dir = root.join(theme).join(size).join(context);
                        if let Some(found) = first_existing(&dir, icon) {
                            return Some(found);
                        }
                    }
                }
            }
        }

        None
    }
}

fn first_existing(dir: &Path, name: &str) -> Option<PathBuf> {
    FORMATS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_direct_icon_in_root() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("kitty.svg"), b"<svg/>").unwrap();

        let resolver = IconResolver::new(vec![root.path().to_path_buf()]);
        assert_eq!(resolver.find("kitty"), Some(root.path().join("kitty.svg")));
    }

    #[test]
    fn test_themed_icon_prefers_larger_sizes() {
        let root = TempDir::new().unwrap();
        let small = root.path().join("hicolor/16x16/apps");
        let large = root.path().join("hicolor/48x48/apps");
        fs::create_dir_all(&small).unwrap();
        fs::create_dir_all(&large).unwrap();
        fs::write(small.join("gimp.png"), b"png").unwrap();
        fs::write(large.join("gimp.png"), b"png").unwrap();

        let resolver = IconResolver::new(vec![root.path().to_path_buf()]);
        assert_eq!(resolver.find("gimp"), Some(large.join("gimp.png")));
    }

    #[test]
    fn test_absolute_icon_paths() {
        let root = TempDir::new().unwrap();
        let icon = root.path().join("custom.png");
        fs::write(&icon, b"png").unwrap();

        let resolver = IconResolver::new(Vec::new());
        assert_eq!(resolver.find(icon.to_str().unwrap()), Some(icon.clone()));
        assert_eq!(resolver.find("/nonexistent/icon.png"), None);
        assert_eq!(resolver.find(""), None);
    }

    #[test]
    fn test_system_roots_include_shared_dirs() {
        let resolver = IconResolver::system();
        assert!(resolver.roots.contains(&PathBuf::from("/usr/share/icons")));
        assert_eq!(resolver.roots.last(), Some(&PathBuf::from("/usr/share/pixmaps")));
    }

    #[test]
    fn test_unknown_icon() {
        let root = TempDir::new().unwrap();
        let resolver = IconResolver::new(vec![root.path().to_path_buf()]);
        assert_eq!(resolver.find("does-not-exist"), None);
    }
}
