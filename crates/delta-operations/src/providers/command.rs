use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::{OperationError, Result};

/// Captured result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Raw text to report on failure: stderr, or stdout when stderr is empty.
    #[must_use]
    pub fn diagnostic(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Runs external programs with an argument vector. Never goes through a shell.
pub trait CommandRunner {
    /// Runs `program` to completion and captures its output.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::BackendLaunch`] if the program cannot start.
    fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> Result<CommandOutput>;

    /// Runs `program`, handing each stdout line to `on_line` as it is printed.
    /// The returned `stdout` holds every line, newline-terminated.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::BackendLaunch`] if the program cannot start.
    fn stream(
        &self,
        program: &str,
        args: &[String],
        cwd: Option<&Path>,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<CommandOutput>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    fn command(program: &str, args: &[String], cwd: Option<&Path>) -> Command {
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }
        debug!(program, ?args, cwd = ?cwd, "running external command");
        command
    }

    fn launch_error(program: &str, source: std::io::Error) -> OperationError {
        OperationError::BackendLaunch {
            program: program.to_string(),
            source,
        }
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> Result<CommandOutput> {
        let output = Self::command(program, args, cwd)
            .output()
            .map_err(|e| Self::launch_error(program, e))?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn stream(
        &self,
        program: &str,
        args: &[String],
        cwd: Option<&Path>,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<CommandOutput> {
        let mut child = Self::command(program, args, cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::launch_error(program, e))?;

        // Drain stderr on its own thread so a chatty backend cannot block on a
        // full pipe while stdout is being read.
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        let read = child
            .stdout
            .take()
            .map_or_else(|| Ok(String::new()), |out| read_lines(out, on_line));

        let status = child.wait().map_err(|e| Self::launch_error(program, e))?;
        let stdout = read.map_err(|source| OperationError::BackendRead {
            program: program.to_string(),
            source,
        })?;
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        Ok(CommandOutput {
            success: status.success(),
            stdout,
            stderr,
        })
    }
}

/// Hands each line of `out` to `on_line`, replacing invalid UTF-8, and
/// returns the whole output newline-terminated.
fn read_lines(out: impl Read, on_line: &mut dyn FnMut(&str)) -> std::io::Result<String> {
    let mut reader = BufReader::new(out);
    let mut collected = String::new();
    let mut buf = Vec::new();

    while reader.read_until(b'\n', &mut buf)? > 0 {
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']);
        on_line(line);
        collected.push_str(line);
        collected.push('\n');
        buf.clear();
    }
    Ok(collected)
}
