use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Result of asking git for a single file's diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    /// Captured stdout of `git diff`, possibly empty (binary files, no textual change)
    Available(String),
    /// git could not produce a diff; the reason has already been logged
    Unavailable,
}

impl DiffOutcome {
    /// Collapse to the text stored on a file change. Unavailable becomes "".
    pub fn into_patch(self) -> String {
        match self {
            DiffOutcome::Available(text) => text,
            DiffOutcome::Unavailable => String::new(),
        }
    }
}

/// Computes a diff for one file between two branches.
///
/// Implementations must not fail: every problem is reported as
/// [`DiffOutcome::Unavailable`].
#[async_trait]
pub trait DiffRunner: Send + Sync {
    async fn diff(&self, base: &str, head: &str, filename: &str) -> DiffOutcome;
}

/// Runs `git diff <remote>/<base>...<remote>/<head> -- <file>` in a local checkout.
#[derive(Debug, Clone)]
pub struct GitDiff {
    git: PathBuf,
    remote: String,
    repo_dir: PathBuf,
}

impl GitDiff {
    pub fn new(git: impl Into<PathBuf>, remote: impl Into<String>, repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            git: git.into(),
            remote: remote.into(),
            repo_dir: repo_dir.into(),
        }
    }

    /// Three-dot range between the remote-tracking refs of both branches.
    fn revision_range(&self, base: &str, head: &str) -> String {
        format!("{remote}/{base}...{remote}/{head}", remote = self.remote)
    }
}

#[async_trait]
impl DiffRunner for GitDiff {
    #[instrument(skip(self), fields(remote = %self.remote))]
    async fn diff(&self, base: &str, head: &str, filename: &str) -> DiffOutcome {
        let range = self.revision_range(base, head);
        debug!(%range, "running fallback git diff");

        let output = match Command::new(&self.git)
            .current_dir(&self.repo_dir)
            .args(["diff", range.as_str(), "--", filename])
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "failed to execute git diff for {}", filename);
                return DiffOutcome::Unavailable;
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            warn!(exit_code = code, "git diff failed for {}: {}", filename, stderr.trim());
            return DiffOutcome::Unavailable;
        }

        if !stderr.is_empty() {
            warn!("git diff for {} wrote to stderr: {}", filename, stderr.trim());
            return DiffOutcome::Unavailable;
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(diff_bytes = stdout.len(), "fallback diff captured");
        DiffOutcome::Available(stdout)
    }
}
