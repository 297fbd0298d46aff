//! Keystroke decoding for the selector.
//!
//! The tty delivers raw bytes. A lone `ESC` and the first byte of an arrow
//! key sequence look the same, so after an `ESC` the reader waits a short
//! grace window for follow-up bytes before deciding it was a bare Escape.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::os::fd::AsFd;
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

const ESC: u8 = 0x1b;
const CTRL_C: u8 = 0x03;
const BACKSPACE: u8 = 0x08;
const DEL: u8 = 0x7f;

/// Default wait for the rest of an escape sequence
pub const DEFAULT_ESCAPE_GRACE: Duration = Duration::from_millis(25);

/// A decoded keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Up,
    Down,
    Escape,
    Backspace,
    Interrupt,
    Tab,
    Char(char),
    /// Anything the selector ignores (other control bytes, unknown sequences)
    Other,
    /// The input stream is closed
    Eof,
}

/// Byte-level input with a bounded wait
pub trait ByteSource {
    /// Block until a byte arrives. `Ok(None)` means end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Return the next byte if one is available within `timeout`.
    fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/// Turns a byte stream into [`Key`]s
pub struct KeyReader<S> {
    source: S,
    grace: Duration,
    /// Byte read ahead while decoding an escape, handed out next
    pushed_back: Option<u8>,
}

impl<S: ByteSource> KeyReader<S> {
    pub fn new(source: S, grace: Duration) -> Self {
        Self {
            source,
            grace,
            pushed_back: None,
        }
    }

    /// Read exactly one keystroke (possibly several bytes)
    pub fn next_key(&mut self) -> io::Result<Key> {
        let next = match self.pushed_back.take() {
            Some(byte) => Some(byte),
            None => self.source.read_byte()?,
        };
        let Some(byte) = next else {
            return Ok(Key::Eof);
        };

        let key = match byte {
            b'\r' | b'\n' => Key::Enter,
            ESC => self.escape()?,
            DEL | BACKSPACE => Key::Backspace,
            CTRL_C => Key::Interrupt,
            b'\t' => Key::Tab,
            b' '..=b'~' => Key::Char(byte as char),
            _ => Key::Other,
        };
        Ok(key)
    }

    fn escape(&mut self) -> io::Result<Key> {
        match self.source.poll_byte(self.grace)? {
            None => Ok(Key::Escape),
            Some(b'[') => self.csi(),
            // A second Escape press starts its own key
            Some(ESC) => {
                self.pushed_back = Some(ESC);
                Ok(Key::Escape)
            }
            Some(b'O') => match self.source.poll_byte(self.grace)? {
                Some(b'A') => Ok(Key::Up),
                Some(b'B') => Ok(Key::Down),
                _ => Ok(Key::Other),
            },
            // Alt-chords and friends
            Some(_) => Ok(Key::Other),
        }
    }

    /// `ESC [` already consumed: swallow parameter bytes up to the final byte
    fn csi(&mut self) -> io::Result<Key> {
        let mut params = 0usize;
        loop {
            match self.source.poll_byte(self.grace)? {
                Some(b'A') if params == 0 => return Ok(Key::Up),
                Some(b'B') if params == 0 => return Ok(Key::Down),
                Some(0x30..=0x3f) => params += 1,
                // Final byte, or the sequence was cut short
                _ => return Ok(Key::Other),
            }
        }
    }
}

/// Unbuffered byte source on the controlling terminal
pub struct TtyBytes {
    tty: File,
    pending: VecDeque<u8>,
}

impl TtyBytes {
    pub fn open() -> io::Result<Self> {
        let tty = File::open("/dev/tty")?;
        Ok(Self {
            tty,
            pending: VecDeque::new(),
        })
    }

    fn fill(&mut self) -> io::Result<bool> {
        let mut chunk = [0u8; 64];
        loop {
            match self.tty.read(&mut chunk) {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    self.pending.extend(&chunk[..n]);
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn readable(&self, timeout: Duration) -> io::Result<bool> {
        let millis = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
        let mut fds = [PollFd::new(self.tty.as_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, PollTimeout::from(millis)) {
            Ok(ready) => Ok(ready > 0),
            Err(Errno::EINTR) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl ByteSource for TtyBytes {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pending.is_empty() && !self.fill()? {
            return Ok(None);
        }
        Ok(self.pending.pop_front())
    }

    fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        if self.pending.is_empty() {
            if !self.readable(timeout)? || !self.fill()? {
                return Ok(None);
            }
        }
        Ok(self.pending.pop_front())
    }
}
