//! External command seam.
//!
//! Every metadata source that shells out goes through [`CommandRunner`] so
//! tests can substitute canned output for `git`, `hostname` and `whoami`.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, StampError};

/// Runs an external program and returns its trimmed stdout.
pub trait CommandRunner {
    /// Run `program` with `args`.
    ///
    /// Returns an error when the program cannot be spawned, exits with a
    /// non-zero status, or prints nothing but whitespace.
    fn run(&self, program: &str, args: &[&str]) -> Result<String>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner {
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl SystemCommandRunner {
    /// Runner that inherits the current working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run commands inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: Some(dir.as_ref().to_path_buf()),
            envs: Vec::new(),
        }
    }

    /// Set an extra environment variable on every spawned command.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = &self.dir {
            command.current_dir(dir);
        }
        for (key, value) in &self.envs {
            command.env(key, value);
        }

        let output = command
            .output()
            .map_err(|e| StampError::Command(format!("failed to spawn {}: {}", program, e)))?;

        if !output.status.success() {
            return Err(StampError::Command(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| StampError::Command(format!("{} printed non-UTF-8 output", program)))?;

        non_empty(program, &stdout)
    }
}

/// Trim command output, rejecting output that is empty after trimming.
pub(crate) fn non_empty(program: &str, stdout: &str) -> Result<String> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Err(StampError::Command(format!("{} printed nothing", program)));
    }
    Ok(trimmed.to_string())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims_output() {
        assert_eq!(non_empty("git", "  v1.2.0\n").unwrap(), "v1.2.0");
    }

    #[test]
    fn non_empty_rejects_whitespace() {
        let err = non_empty("hostname", " \n\t").unwrap_err();
        assert!(matches!(err, StampError::Command(_)));
    }

    #[test]
    fn missing_program_is_command_error() {
        let runner = SystemCommandRunner::new();
        let err = runner
            .run("buildstamp-definitely-not-a-real-program", &[])
            .unwrap_err();
        assert!(matches!(err, StampError::Command(_)));
    }
}
