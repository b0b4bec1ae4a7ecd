use std::fmt;
use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};

/// A program plus arguments, run without a shell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExternalCommand {
    pub program: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl ExternalCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line on whitespace. No quoting rules are applied.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs an external command in a directory and captures its result.
pub trait CommandRunner {
    fn run(&self, command: &ExternalCommand, dir: &Path) -> std::io::Result<CommandOutput>;
}

/// Runs commands as child processes of this one.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ExternalCommand, dir: &Path) -> std::io::Result<CommandOutput> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(dir)
            .output()?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Run `command` and describe any problem as a warning. Returns `None` when
/// the command exited successfully.
pub fn run_hook(runner: &dyn CommandRunner, command: &ExternalCommand, dir: &Path) -> Option<String> {
    tracing::info!(command = %command, dir = %dir.display(), "running post-scaffold hook");
    match runner.run(command, dir) {
        Ok(output) if output.success() => None,
        Ok(output) => {
            let status = output
                .status
                .map_or_else(|| "a signal".to_string(), |code| format!("status {code}"));
            let detail = output.stderr.trim();
            Some(if detail.is_empty() {
                format!("hook `{command}` exited with {status}")
            } else {
                format!("hook `{command}` exited with {status}: {detail}")
            })
        }
        Err(e) => Some(format!("hook `{command}` could not be started: {e}")),
    }
}
