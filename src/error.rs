use std::io;
use thiserror::Error;

/// Failures that end the run after a selection was made
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no command to run for {0:?}")]
    EmptyCommand(String),

    #[error("failed to launch {name}: {source}")]
    Launch {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to run swww (is swww-daemon running?): {0}")]
    SwwwSpawn(#[source] io::Error),

    #[error("swww failed (is swww-daemon running?): {0}")]
    Swww(String),
}
