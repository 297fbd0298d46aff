use crate::input::DEFAULT_ESCAPE_GRACE;
use crate::ranking::Ranking;
use crate::swww::{FillColor, ResizeMode, Transition, TransitionType};
use crate::utils::{expand_tilde, IMAGE_EXTENSIONS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub launcher: LauncherConfig,
    pub wallpaper: WallpaperConfig,
    pub preview: PreviewConfig,
    pub input: InputConfig,
    pub transition: TransitionConfig,
    pub display: DisplayConfig,
    pub theme: ThemeConfig,
    pub restart: RestartConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub app_dirs: Vec<PathBuf>,
    pub ranking: Ranking,
    /// Prefix desktop entries with an icon found/missing marker
    pub show_icons: bool,
    /// Offer every executable on $PATH after the desktop entries
    pub include_path: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WallpaperConfig {
    pub directory: PathBuf,
    pub extensions: Vec<String>,
    pub recursive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub enabled: bool,
    pub command: String,
    pub extra_args: Vec<String>,
    /// Narrower terminals get no preview panel
    pub min_width: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// How long a lone ESC waits for the rest of an escape sequence
    pub escape_grace_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub transition_type: String,
    pub duration: f32,
    pub fps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DisplayConfig {
    pub resize_mode: ResizeMode,
    pub fill_color: FillColor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub enabled: bool,
    pub switcher_script: PathBuf,
    pub matugen_config: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    pub enabled: bool,
    pub reload_compositor: bool,
    /// Process name killed before the bars are started again
    pub bar_process: String,
    /// Shell commands, one per bar
    pub bars: Vec<String>,
    pub notifier_process: String,
    pub notifier: String,
    /// Send SIGUSR1 to kitty so it rereads its config
    pub signal_terminals: bool,
    pub settle_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            app_dirs: vec![
                PathBuf::from("/usr/share/applications"),
                PathBuf::from("~/.local/share/applications"),
            ],
            ranking: Ranking::Smart,
            show_icons: true,
            include_path: true,
        }
    }
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir()
                .map(|p| p.join("wallpapers"))
                .unwrap_or_else(|| PathBuf::from("~/Pictures/wallpapers")),
            extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            recursive: true,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "chafa".to_string(),
            extra_args: Vec::new(),
            min_width: 60,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            escape_grace_ms: DEFAULT_ESCAPE_GRACE.as_millis() as u64,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            transition_type: "fade".to_string(),
            duration: 1.0,
            fps: 60,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            switcher_script: PathBuf::from("~/dotfiles/scripts/theme-switcher.sh"),
            matugen_config: PathBuf::from("~/dotfiles/matugen/config.toml"),
        }
    }
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reload_compositor: true,
            bar_process: "waybar".to_string(),
            bars: vec![
                "waybar".to_string(),
                "waybar -c ~/.config/waybar/config-bottom -s ~/.config/waybar/style-bottom.css"
                    .to_string(),
            ],
            notifier_process: "dunst".to_string(),
            notifier: "dunst".to_string(),
            signal_terminals: true,
            settle_ms: 500,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "frostlaunch", "frostlaunch")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&data)
                .with_context(|| format!("Invalid config in {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = toml::to_string_pretty(self)?;
        fs::write(&path, data)?;

        Ok(())
    }

    pub fn transition(&self) -> Transition {
        let transition_type = match self.transition.transition_type.as_str() {
            "fade" => TransitionType::Fade,
            "wipe" => TransitionType::Wipe,
            "grow" => TransitionType::Grow,
            "center" => TransitionType::Center,
            "outer" => TransitionType::Outer,
            "none" => TransitionType::None,
            _ => TransitionType::Fade,
        };

        Transition {
            transition_type,
            duration: self.transition.duration,
            fps: self.transition.fps,
        }
    }

    /// Wallpaper directory with ~ expanded
    pub fn wallpaper_dir(&self) -> PathBuf {
        expand_tilde(&self.wallpaper.directory)
    }

    pub fn app_dirs(&self) -> Vec<PathBuf> {
        self.launcher.app_dirs.iter().map(|d| expand_tilde(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [launcher]
            ranking = "alphabetical"

            [preview]
            command = "timg"

            [restart]
            settle_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.launcher.ranking, Ranking::Alphabetical);
        assert!(config.launcher.include_path);
        assert_eq!(config.preview.command, "timg");
        assert_eq!(config.preview.min_width, 60);
        assert_eq!(config.input.escape_grace_ms, 25);
        assert_eq!(config.restart.settle_ms, 0);
        assert_eq!(config.restart.bar_process, "waybar");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_defaults_survive_a_round_trip() {
        let data = toml::to_string_pretty(&Config::default()).unwrap();
        let config: Config = toml::from_str(&data).unwrap();
        assert_eq!(config.wallpaper.extensions.len(), IMAGE_EXTENSIONS.len());
        assert_eq!(config.launcher.app_dirs.len(), 2);
        assert_eq!(config.display.resize_mode, ResizeMode::Crop);
    }

    #[test]
    fn test_transition_falls_back_to_fade() {
        let mut config = Config::default();
        config.transition.transition_type = "wipe".into();
        assert!(matches!(config.transition().transition_type, TransitionType::Wipe));
        config.transition.transition_type = "sparkle".into();
        assert!(matches!(config.transition().transition_type, TransitionType::Fade));
    }
}
