use crate::input::{Key, KeyReader, TtyBytes};
use crossterm::{
    cursor::{MoveTo, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType, SetTitle},
};
use std::io::{self, Write};
use std::time::Duration;

/// Geometry used when the terminal cannot tell us its size
pub const FALLBACK_SIZE: Size = Size { cols: 80, rows: 24 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

/// Turn a `(cols, rows)` query result into a usable size.
/// Errors and zero dimensions fall back to 80x24 without complaint.
pub fn effective_size(queried: io::Result<(u16, u16)>) -> Size {
    match queried {
        Ok((cols, rows)) if cols > 0 && rows > 0 => Size { cols, rows },
        _ => FALLBACK_SIZE,
    }
}

/// The terminal as seen by the selector loop
pub trait Console {
    /// Raw `(cols, rows)` query; may fail or report zeros
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Block for exactly one keystroke
    fn read_key(&mut self) -> io::Result<Key>;

    /// Write a complete frame in one go
    fn present(&mut self, frame: &[u8]) -> io::Result<()>;
}

/// Raw mode for as long as the guard lives.
///
/// Dropping it (normal return, `?` propagation or unwinding panic) shows the
/// cursor again and restores the previous line discipline.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show);
        if let Err(e) = disable_raw_mode() {
            tracing::warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Set the terminal window title so compositor rules can match the launcher
pub fn set_title(title: &str) -> io::Result<()> {
    execute!(io::stdout(), SetTitle(title))
}

/// Wipe the selector's last frame and home the cursor
pub fn clear_screen() -> io::Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
}

/// Controlling terminal in raw mode: keys from `/dev/tty`, frames to stdout
pub struct TtyConsole {
    _raw: RawModeGuard,
    keys: KeyReader<TtyBytes>,
    out: io::Stdout,
}

impl TtyConsole {
    pub fn open(escape_grace: Duration) -> io::Result<Self> {
        let keys = KeyReader::new(TtyBytes::open()?, escape_grace);
        let raw = RawModeGuard::acquire()?;
        Ok(Self {
            _raw: raw,
            keys,
            out: io::stdout(),
        })
    }
}

impl Console for TtyConsole {
    fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    fn read_key(&mut self) -> io::Result<Key> {
        self.keys.next_key()
    }

    fn present(&mut self, frame: &[u8]) -> io::Result<()> {
        let mut out = self.out.lock();
        out.write_all(frame)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_falls_back() {
        assert_eq!(effective_size(Ok((0, 0))), Size { cols: 80, rows: 24 });
        assert_eq!(effective_size(Ok((120, 0))), FALLBACK_SIZE);
    }

    #[test]
    fn test_query_error_falls_back() {
        let err = io::Error::new(io::ErrorKind::Other, "not a tty");
        assert_eq!(effective_size(Err(err)), FALLBACK_SIZE);
    }

    #[test]
    fn test_reported_size_is_used() {
        assert_eq!(effective_size(Ok((132, 43))), Size { cols: 132, rows: 43 });
    }
}
