use crate::error::DispatchError;
use crate::item::SelectableItem;
use crate::process::{CommandRunner, CommandSpec};
use crate::swww::{self, FillColor, ResizeMode, Transition};
use crate::theme::ThemePipeline;
use crate::usage::UsageStore;
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;
use tracing::{info, warn};

/// Acts on the item the user picked
pub trait Dispatcher {
    fn dispatch(
        &mut self,
        chosen: &SelectableItem,
        all: &[SelectableItem],
    ) -> Result<(), DispatchError>;
}

/// Starts applications and keeps their usage statistics
pub struct AppLauncher<'a> {
    runner: &'a dyn CommandRunner,
    usage: UsageStore,
}

impl<'a> AppLauncher<'a> {
    pub fn new(runner: &'a dyn CommandRunner, usage: UsageStore) -> Self {
        Self { runner, usage }
    }
}

impl Dispatcher for AppLauncher<'_> {
    fn dispatch(&mut self, chosen: &SelectableItem, _all: &[SelectableItem]) -> Result<(), DispatchError> {
        let spec = CommandSpec::from_command_line(&chosen.payload)
            .ok_or_else(|| DispatchError::EmptyCommand(chosen.name.clone()))?;

        self.usage.record(&chosen.name, &chosen.payload, Utc::now());
        if let Err(e) = self.usage.save() {
            warn!("Failed to save usage data: {:#}", e);
        }

        info!("Launching {} ({})", chosen.name, spec);
        self.runner
            .spawn_detached(&spec)
            .map_err(|source| DispatchError::Launch {
                name: chosen.name.clone(),
                source,
            })
    }
}

/// Uniform pick among the real wallpapers, ignoring placeholders
pub fn choose_wallpaper<'i, R: Rng + ?Sized>(
    all: &'i [SelectableItem],
    rng: &mut R,
) -> Option<&'i SelectableItem> {
    let candidates: Vec<&SelectableItem> = all.iter().filter(|i| !i.placeholder).collect();
    candidates.choose(rng).copied()
}

/// Hands the picked image to swww, then recolors the desktop
pub struct WallpaperSetter<'a, R: Rng> {
    runner: &'a dyn CommandRunner,
    transition: Transition,
    resize_mode: ResizeMode,
    fill_color: FillColor,
    theme: ThemePipeline<'a>,
    rng: R,
}

impl<'a, R: Rng> WallpaperSetter<'a, R> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        transition: Transition,
        resize_mode: ResizeMode,
        fill_color: FillColor,
        theme: ThemePipeline<'a>,
        rng: R,
    ) -> Self {
        Self {
            runner,
            transition,
            resize_mode,
            fill_color,
            theme,
            rng,
        }
    }
}

impl<R: Rng> Dispatcher for WallpaperSetter<'_, R> {
    fn dispatch(&mut self, chosen: &SelectableItem, all: &[SelectableItem]) -> Result<(), DispatchError> {
        let wallpaper = if chosen.placeholder {
            match choose_wallpaper(all, &mut self.rng) {
                Some(item) => {
                    println!("Random wallpaper: {}", item.name);
                    item
                }
                None => {
                    println!("No wallpapers found to choose from.");
                    return Ok(());
                }
            }
        } else {
            chosen
        };

        let path = Path::new(&wallpaper.payload);
        swww::set_wallpaper(
            self.runner,
            path,
            &self.transition,
            self.resize_mode,
            &self.fill_color,
        )?;
        println!("Wallpaper set to {}", wallpaper.name);

        self.theme.apply(path);
        Ok(())
    }
}
