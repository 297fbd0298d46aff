use std::path::{Path, PathBuf};

/// Supported image file extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif"];

/// Check if a path has one of the given extensions (case-insensitive)
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let ext = e.to_lowercase();
            extensions.iter().any(|supported| supported.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// Expand tilde (~) in path
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_extension_ignores_case() {
        let exts: Vec<String> = IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        assert!(has_extension(Path::new("/w/space/Nebula.JPG"), &exts));
        assert!(has_extension(Path::new("a.webp"), &exts));
        assert!(!has_extension(Path::new("notes.txt"), &exts));
        assert!(!has_extension(Path::new("no_extension"), &exts));
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde(Path::new("/etc/xdg")), PathBuf::from("/etc/xdg"));
    }

    #[test]
    fn test_expand_tilde_uses_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/pics")), home.join("pics"));
        }
    }
}
