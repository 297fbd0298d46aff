mod config;
mod desktop;
mod dispatch;
mod error;
mod icons;
mod input;
mod item;
mod logging;
mod path_exec;
mod preview;
mod process;
mod ranking;
mod render;
mod selector;
mod session;
mod swww;
mod terminal;
mod theme;
mod usage;
mod utils;
mod wallpaper;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use config::Config;
use desktop::DesktopEntries;
use dispatch::{AppLauncher, Dispatcher, WallpaperSetter};
use icons::IconResolver;
use item::{dedup_by_name, ItemSource, SelectableItem};
use path_exec::PathExecutables;
use preview::{ChafaRenderer, PreviewRenderer};
use process::SystemRunner;
use selector::{LoopOptions, Outcome};
use std::path::PathBuf;
use std::time::Duration;
use terminal::TtyConsole;
use theme::ThemePipeline;
use tracing::{info, warn};
use usage::UsageStore;
use wallpaper::WallpaperDir;

const WINDOW_TITLE: &str = "frostlaunch";

#[derive(Parser)]
#[command(name = "frostlaunch")]
#[command(version)]
#[command(about = "Terminal application launcher and wallpaper picker")]
struct Cli {
    /// What to pick from
    #[arg(value_enum)]
    mode: Mode,

    /// Wallpaper directory
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Don't show image previews
    #[arg(long)]
    no_preview: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Launch a desktop application or $PATH executable
    Launch,
    /// Set a wallpaper and recolor the desktop
    Wall,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init(&config.log.level);
    info!("Starting in {:?} mode", cli.mode);

    match cli.mode {
        Mode::Launch => cmd_launch(&config),
        Mode::Wall => {
            let dir = cli.dir.unwrap_or_else(|| config.wallpaper_dir());
            cmd_wall(&config, dir, !cli.no_preview)
        }
    }
}

fn cmd_launch(config: &Config) -> Result<()> {
    let usage = UsageStore::load(&UsageStore::default_path());
    info!("Usage history for {} apps", usage.len());

    let mut desktop = DesktopEntries::new(config.app_dirs());
    if config.launcher.show_icons {
        desktop = desktop.with_icons(IconResolver::system());
    }

    let mut items = desktop.items();
    config.launcher.ranking.apply(&mut items, &usage, Utc::now());
    if config.launcher.include_path {
        items.extend(PathExecutables::from_env().items());
    }
    let items = dedup_by_name(items);

    let mut options = LoopOptions::new("Launch");
    options.show_icons = config.launcher.show_icons;

    let runner = SystemRunner;
    let mut launcher = AppLauncher::new(&runner, usage);
    run_mode(config, &items, &options, None, &mut launcher)
}

fn cmd_wall(config: &Config, dir: PathBuf, preview_wanted: bool) -> Result<()> {
    let items = WallpaperDir::new(
        dir,
        config.wallpaper.extensions.clone(),
        config.wallpaper.recursive,
    )
    .items();

    let renderer = ChafaRenderer::new(&config.preview.command, config.preview.extra_args.clone());
    let available = preview_wanted && config.preview.enabled && preview_available(config);

    let mut options = LoopOptions::new("Wallpaper");
    options.preview = available;
    options.min_preview_width = config.preview.min_width;

    let runner = SystemRunner;
    let theme = ThemePipeline::new(&runner, &config.theme, &config.restart);
    let mut setter = WallpaperSetter::new(
        &runner,
        config.transition(),
        config.display.resize_mode,
        config.display.fill_color.clone(),
        theme,
        rand::thread_rng(),
    );

    let renderer: Option<&dyn PreviewRenderer> = available.then_some(&renderer as &dyn PreviewRenderer);
    run_mode(config, &items, &options, renderer, &mut setter)
}

/// Looked up once per run, before the terminal is touched
fn preview_available(config: &Config) -> bool {
    match which::which(&config.preview.command) {
        Ok(path) => {
            info!("Previews rendered with {}", path.display());
            true
        }
        Err(_) => {
            warn!("{} not found, previews disabled", config.preview.command);
            false
        }
    }
}

fn run_mode(
    config: &Config,
    items: &[SelectableItem],
    options: &LoopOptions,
    renderer: Option<&dyn PreviewRenderer>,
    dispatcher: &mut dyn Dispatcher,
) -> Result<()> {
    let grace = Duration::from_millis(config.input.escape_grace_ms);
    let outcome = selector::select(items, options, renderer, || {
        terminal::set_title(WINDOW_TITLE)?;
        TtyConsole::open(grace)
    })?;

    if outcome != Outcome::Empty {
        terminal::clear_screen()?;
    }

    match outcome.accepted() {
        Some(chosen) => {
            info!("Selected {}", chosen.name);
            dispatcher.dispatch(chosen, items)?;
        }
        None => info!("Nothing selected"),
    }

    Ok(())
}
