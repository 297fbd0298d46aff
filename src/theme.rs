use crate::config::{RestartConfig, ThemeConfig};
use crate::process::{CommandRunner, CommandSpec};
use crate::utils::expand_tilde;
use crate::wallpaper::Category;
use std::env;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Which step produced the new color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeOutcome {
    Disabled,
    Switcher,
    Matugen,
    Failed,
}

/// Recolors the desktop after a wallpaper change. Nothing here is fatal;
/// problems are printed and logged and the run carries on.
pub struct ThemePipeline<'a> {
    runner: &'a dyn CommandRunner,
    theme: &'a ThemeConfig,
    restart: &'a RestartConfig,
    wayland: bool,
}

impl<'a> ThemePipeline<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        theme: &'a ThemeConfig,
        restart: &'a RestartConfig,
    ) -> Self {
        Self {
            runner,
            theme,
            restart,
            wayland: env::var_os("WAYLAND_DISPLAY").is_some_and(|v| !v.is_empty()),
        }
    }

    #[cfg(test)]
    pub fn with_wayland(mut self, wayland: bool) -> Self {
        self.wayland = wayland;
        self
    }

    pub fn apply(&self, wallpaper: &Path) -> ThemeOutcome {
        if !self.theme.enabled {
            return ThemeOutcome::Disabled;
        }

        let category = Category::detect(wallpaper);
        println!("Applying {} theme...", category.name());
        info!("Applying {} theme for {}", category.name(), wallpaper.display());

        let script = expand_tilde(&self.theme.switcher_script);
        if !script.is_file() {
            warn!("Theme switcher {} not found", script.display());
            println!("Theme switcher not found, generating colors with matugen");
            return self.matugen(wallpaper);
        }

        let spec = CommandSpec::new(
            "bash",
            [
                script.to_string_lossy().into_owned(),
                "apply".to_string(),
                wallpaper.to_string_lossy().into_owned(),
            ],
        );
        match self.runner.status(&spec) {
            Ok(true) => {
                println!("Theme applied");
                self.restart_applications();
                ThemeOutcome::Switcher
            }
            Ok(false) => {
                warn!("Theme switcher exited with an error");
                println!("Theme switcher failed, falling back to matugen");
                self.matugen(wallpaper)
            }
            Err(e) => {
                warn!("Could not run theme switcher: {}", e);
                println!("Theme switcher failed, falling back to matugen");
                self.matugen(wallpaper)
            }
        }
    }

    fn matugen(&self, wallpaper: &Path) -> ThemeOutcome {
        let config = expand_tilde(&self.theme.matugen_config);
        let wallpaper = wallpaper.to_string_lossy().into_owned();

        let spec = if config.is_file() {
            CommandSpec::new(
                "matugen",
                [
                    "image".to_string(),
                    "--config".to_string(),
                    config.to_string_lossy().into_owned(),
                    wallpaper,
                ],
            )
        } else {
            CommandSpec::new("matugen", ["image".to_string(), wallpaper])
        };

        match self.runner.status(&spec) {
            Ok(true) => {
                println!("Material You colors generated");
                ThemeOutcome::Matugen
            }
            Ok(false) => {
                warn!("matugen exited with an error");
                println!("matugen color generation failed");
                ThemeOutcome::Failed
            }
            Err(e) => {
                warn!("Could not run matugen: {}", e);
                println!("matugen color generation failed; install matugen for automatic theming");
                ThemeOutcome::Failed
            }
        }
    }

    fn restart_applications(&self) {
        if !self.restart.enabled {
            return;
        }

        let hyprland = CommandSpec::new("pgrep", ["-x", "Hyprland"]);
        if !self.wayland || !self.succeeds(&hyprland) {
            println!("Not running under Hyprland, applications won't be restarted");
            return;
        }

        println!("Reloading applications with the new theme...");

        if self.restart.reload_compositor {
            self.run_logged(&CommandSpec::new("hyprctl", ["reload"]));
        }

        self.restart_process(&self.restart.bar_process, &self.restart.bars);

        if !self.restart.notifier.trim().is_empty() {
            self.restart_process(
                &self.restart.notifier_process,
                std::slice::from_ref(&self.restart.notifier),
            );
        }

        if self.restart.signal_terminals {
            self.run_logged(&CommandSpec::new("killall", ["-USR1", "kitty"]));
        }
    }

    /// Kill `process` if it runs, then start each command detached
    fn restart_process(&self, process: &str, commands: &[String]) {
        if commands.is_empty() {
            return;
        }

        if !process.is_empty() && self.succeeds(&CommandSpec::new("pgrep", ["-x", process])) {
            self.run_logged(&CommandSpec::new("pkill", [process]));
            thread::sleep(Duration::from_millis(self.restart.settle_ms));
        }

        for command in commands {
            if let Err(e) = self.runner.spawn_detached(&CommandSpec::shell(command)) {
                warn!("Failed to start {}: {}", command, e);
            }
        }
    }

    fn succeeds(&self, spec: &CommandSpec) -> bool {
        matches!(self.runner.status(spec), Ok(true))
    }

    fn run_logged(&self, spec: &CommandSpec) {
        match self.runner.status(spec) {
            Ok(true) => {}
            Ok(false) => warn!("{} exited with an error", spec),
            Err(e) => warn!("Failed to run {}: {}", spec, e),
        }
    }
}
