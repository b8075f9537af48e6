use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use diffpost_core::{DiffpostError, Result};

/// Runs git subcommands against one repository checkout.
///
/// Every invocation goes through `git -C <repo_dir>` so the working
/// directory of the calling process never matters.
#[derive(Debug, Clone)]
pub struct GitRunner {
    repo_dir: PathBuf,
}

impl GitRunner {
    /// Create a runner for the checkout at `repo_dir`.
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// The checkout directory every command runs against.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Runs `git <args>` and returns its stdout.
    ///
    /// A non-zero exit status becomes [`DiffpostError::Git`] carrying the
    /// trimmed stderr.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DiffpostError::Git(format!(
                "git {} failed: {}",
                args.first().copied().unwrap_or_default(),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs `git <args>` for its exit status alone.
    ///
    /// Returns `Ok(true)` on a zero exit status. Spawn failures still error;
    /// a non-zero status does not.
    pub fn succeeds(&self, args: &[&str]) -> Result<bool> {
        let output = self.output(args)?;
        Ok(output.status.success())
    }

    fn output(&self, args: &[&str]) -> Result<std::process::Output> {
        Command::new("git")
            .arg("-C")
            .arg(&self.repo_dir)
            .args(args)
            .output()
            .map_err(|err| {
                if err.kind() == ErrorKind::NotFound {
                    DiffpostError::Git("git executable not found in PATH".to_string())
                } else {
                    DiffpostError::Io(err)
                }
            })
    }
}

/// Returns the remote-tracking name for `branch`.
///
/// # Examples
///
/// ```
/// assert_eq!(diffpost_git::runner::upstream("development"), "origin/development");
/// ```
pub fn upstream(branch: &str) -> String {
    format!("origin/{branch}")
}
