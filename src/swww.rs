use crate::error::DispatchError;
use crate::process::{CommandRunner, CommandSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Transition {
    pub transition_type: TransitionType,
    pub duration: f32,
    pub fps: u32,
}

#[derive(Debug, Clone, Copy)]
pub enum TransitionType {
    Fade,
    Wipe,
    Grow,
    Center,
    Outer,
    None,
}

/// How to resize/fit the wallpaper to the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResizeMode {
    /// Resize to fill the screen, cropping parts that don't fit (default)
    #[default]
    Crop,
    /// Resize to fit inside the screen, preserving aspect ratio (adds padding)
    Fit,
    /// Don't resize, center the image (adds padding if smaller)
    No,
    /// Stretch to fill (distorts aspect ratio)
    Stretch,
}

impl ResizeMode {
    fn as_str(&self) -> &'static str {
        match self {
            ResizeMode::Crop => "crop",
            ResizeMode::Fit => "fit",
            ResizeMode::No => "no",
            ResizeMode::Stretch => "stretch",
        }
    }
}

/// Fill color for padding when image doesn't fill screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for FillColor {
    fn default() -> Self {
        // Black
        Self { r: 0, g: 0, b: 0, a: 255 }
    }
}

impl FillColor {
    fn to_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            transition_type: TransitionType::Fade,
            duration: 1.0,
            fps: 60,
        }
    }
}

impl TransitionType {
    fn as_str(&self) -> &'static str {
        match self {
            TransitionType::Fade => "fade",
            TransitionType::Wipe => "wipe",
            TransitionType::Grow => "grow",
            TransitionType::Center => "center",
            TransitionType::Outer => "outer",
            TransitionType::None => "none",
        }
    }
}

/// Start swww-daemon unless `swww query` says one is already up
pub fn ensure_daemon(runner: &dyn CommandRunner) -> Result<(), DispatchError> {
    let query = CommandSpec::new("swww", ["query"]);
    if matches!(runner.status(&query), Ok(true)) {
        return Ok(());
    }

    info!("swww-daemon not answering, starting it");
    runner
        .spawn_detached(&CommandSpec::new("swww-daemon", Vec::<String>::new()))
        .map_err(DispatchError::SwwwSpawn)?;

    // Give it a moment to initialize
    thread::sleep(Duration::from_millis(100));
    Ok(())
}

/// Arguments for `swww img` on every output
pub fn img_args(
    path: &Path,
    transition: &Transition,
    resize_mode: ResizeMode,
    fill_color: &FillColor,
) -> Vec<String> {
    vec![
        "img".to_string(),
        path.to_string_lossy().into_owned(),
        "--resize".to_string(),
        resize_mode.as_str().to_string(),
        "--fill-color".to_string(),
        fill_color.to_hex(),
        "--transition-type".to_string(),
        transition.transition_type.as_str().to_string(),
        "--transition-duration".to_string(),
        transition.duration.to_string(),
        "--transition-fps".to_string(),
        transition.fps.to_string(),
    ]
}

/// Set wallpaper on all outputs
pub fn set_wallpaper(
    runner: &dyn CommandRunner,
    path: &Path,
    transition: &Transition,
    resize_mode: ResizeMode,
    fill_color: &FillColor,
) -> Result<(), DispatchError> {
    ensure_daemon(runner)?;

    let spec = CommandSpec::new("swww", img_args(path, transition, resize_mode, fill_color));
    let output = runner.output(&spec).map_err(DispatchError::SwwwSpawn)?;

    if !output.success {
        warn!("swww img failed: {}", output.stderr.trim());
        return Err(DispatchError::Swww(output.stderr.trim().to_string()));
    }

    if !output.stdout.trim().is_empty() {
        debug!("swww: {}", output.stdout.trim());
    }
    info!("Wallpaper set to {}", path.display());
    Ok(())
}
