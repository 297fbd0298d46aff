use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use tracing::debug;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line on whitespace. Returns None when it is blank.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    /// Run `line` through `sh -c`
    pub fn shell(line: &str) -> Self {
        Self::new("sh", ["-c", line])
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Where external programs get started
pub trait CommandRunner {
    /// Run to completion with output discarded; true on exit status 0
    fn status(&self, spec: &CommandSpec) -> io::Result<bool>;

    /// Run to completion and capture stdout/stderr
    fn output(&self, spec: &CommandSpec) -> io::Result<CommandOutput>;

    /// Start in its own process group with null stdio and do not wait
    fn spawn_detached(&self, spec: &CommandSpec) -> io::Result<()>;
}

/// Runs real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn status(&self, spec: &CommandSpec) -> io::Result<bool> {
        debug!("Running {}", spec);
        let status = spec
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        Ok(status.success())
    }

    fn output(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        debug!("Running {}", spec);
        let output = spec.command().stdin(Stdio::null()).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn spawn_detached(&self, spec: &CommandSpec) -> io::Result<()> {
        debug!("Spawning {}", spec);
        spec.command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every command line; answers by matching prefixes
    #[derive(Default)]
    pub(crate) struct RecordingRunner {
        pub calls: RefCell<Vec<String>>,
        failing: Vec<String>,
        missing: Vec<String>,
        stderr: String,
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Commands whose display form starts with `prefix` exit non-zero
        pub fn failing(mut self, prefix: &str) -> Self {
            self.failing.push(prefix.to_string());
            self
        }

        /// Commands whose display form starts with `prefix` cannot be spawned
        pub fn missing(mut self, prefix: &str) -> Self {
            self.missing.push(prefix.to_string());
            self
        }

        pub fn with_stderr(mut self, stderr: &str) -> Self {
            self.stderr = stderr.to_string();
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn run(&self, kind: &str, spec: &CommandSpec) -> io::Result<bool> {
            let line = spec.to_string();
            self.calls.borrow_mut().push(format!("{kind} {line}"));
            if self.missing.iter().any(|p| line.starts_with(p.as_str())) {
                return Err(io::Error::new(io::ErrorKind::NotFound, "not found"));
            }
            Ok(!self.failing.iter().any(|p| line.starts_with(p.as_str())))
        }
    }

    impl CommandRunner for RecordingRunner {
        fn status(&self, spec: &CommandSpec) -> io::Result<bool> {
            self.run("run", spec)
        }

        fn output(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
            let success = self.run("run", spec)?;
            Ok(CommandOutput {
                success,
                stdout: String::new(),
                stderr: if success { String::new() } else { self.stderr.clone() },
            })
        }

        fn spawn_detached(&self, spec: &CommandSpec) -> io::Result<()> {
            self.run("spawn", spec).map(|_| ())
        }
    }

    #[test]
    fn test_command_line_splitting() {
        let spec = CommandSpec::from_command_line("  kitty   --class  float htop ").unwrap();
        assert_eq!(spec.program, "kitty");
        assert_eq!(spec.args, vec!["--class", "float", "htop"]);
        assert_eq!(spec.to_string(), "kitty --class float htop");

        assert!(CommandSpec::from_command_line("").is_none());
        assert!(CommandSpec::from_command_line(" \t ").is_none());
    }

    #[test]
    fn test_shell_wrapper() {
        let spec = CommandSpec::shell("waybar -c ~/cfg");
        assert_eq!(spec.program, "sh");
        assert_eq!(spec.args, vec!["-c", "waybar -c ~/cfg"]);
    }

    #[test]
    fn test_system_runner_status() {
        let runner = SystemRunner;
        assert!(runner.status(&CommandSpec::new("true", Vec::<String>::new())).unwrap());
        assert!(!runner.status(&CommandSpec::new("false", Vec::<String>::new())).unwrap());
        assert!(runner
            .status(&CommandSpec::new("/nonexistent/frostlaunch-test", Vec::<String>::new()))
            .is_err());
    }

    #[test]
    fn test_system_runner_output() {
        let out = SystemRunner
            .output(&CommandSpec::shell("echo hi; echo oops >&2; exit 3"))
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.stdout, "hi\n");
        assert_eq!(out.stderr, "oops\n");
    }
}
