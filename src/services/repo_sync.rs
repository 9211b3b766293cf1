use crate::models::{Edition, RepoCoordinates};
use crate::progress::{ProgressEvent, ProgressTracker};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::process::Command;

/// Errors during repository clone/update.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to create repository directory {path}: {source}")]
    CreateDir {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("`{command}` exited with code {code} in {dir}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        dir: Utf8PathBuf,
        stderr: String,
    },
}

/// Capability for running one external process invocation to completion.
///
/// The synchronizer drives git exclusively through this seam so the ordered
/// update contract is testable without a git binary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String], cwd: &Utf8Path) -> Result<(), SyncError>;
}

/// [`CommandRunner`] backed by tokio subprocesses.
///
/// Captures output rather than inheriting stdio; stderr is folded into the
/// error on nonzero exit.
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String], cwd: &Utf8Path) -> Result<(), SyncError> {
        let rendered = format!("{} {}", program, args.join(" "));
        tracing::debug!("Running `{}` in {}", rendered, cwd);

        let start = Instant::now();
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .await
            .map_err(|source| SyncError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(SyncError::CommandFailed {
                command: rendered,
                code: output.status.code().unwrap_or(-1),
                dir: cwd.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::debug!(
            "`{}` completed in {:.2}s",
            rendered,
            start.elapsed().as_secs_f32()
        );
        Ok(())
    }
}

/// Capability for producing a local tree checked out at a version.
#[async_trait]
pub trait RepoSynchronizer: Send + Sync {
    /// Ensure a local working copy of `coords` exists and is fast-forwarded
    /// to `version`; returns its root path.
    async fn sync(
        &self,
        pack_name: &str,
        edition: Edition,
        coords: &RepoCoordinates,
        version: &str,
        progress: &ProgressTracker,
    ) -> Result<Utf8PathBuf, SyncError>;
}

/// Git-backed [`RepoSynchronizer`].
///
/// Local trees live under a fixed root, keyed by repository name, and are
/// reused across invocations. Distinct repositories may be synchronized
/// concurrently; two overlapping syncs of the *same* repository are a caller
/// error (the working copy has no internal lock).
pub struct GitSync {
    repos_root: Utf8PathBuf,
    runner: Arc<dyn CommandRunner>,
}

/// The ordered update sequence for a local tree: discard local edits,
/// refresh remote-tracking refs, fetch, check out the target version, pull
/// its latest state. Strictly sequential; concurrent git against one tree
/// corrupts it.
pub fn update_steps(version: &str) -> Vec<Vec<String>> {
    vec![
        vec!["stash".to_string()],
        vec!["remote".to_string(), "update".to_string()],
        vec!["fetch".to_string()],
        vec!["checkout".to_string(), version.to_string()],
        vec!["pull".to_string()],
    ]
}

impl GitSync {
    pub fn new(repos_root: impl AsRef<Utf8Path>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            repos_root: repos_root.as_ref().to_path_buf(),
            runner,
        }
    }

    /// Construct with the real subprocess runner.
    pub fn with_process_runner(repos_root: impl AsRef<Utf8Path>) -> Self {
        Self::new(repos_root, Arc::new(ProcessRunner))
    }

    /// Deterministic local root for a repository.
    pub fn local_path(&self, coords: &RepoCoordinates) -> Utf8PathBuf {
        self.repos_root.join(&coords.repo)
    }
}

#[async_trait]
impl RepoSynchronizer for GitSync {
    async fn sync(
        &self,
        pack_name: &str,
        edition: Edition,
        coords: &RepoCoordinates,
        version: &str,
        progress: &ProgressTracker,
    ) -> Result<Utf8PathBuf, SyncError> {
        let cwd = self.local_path(coords);

        if !cwd.exists() {
            progress.emit(ProgressEvent::DownloadStarted {
                pack: pack_name.to_string(),
                edition,
            });
            fs::create_dir_all(&cwd).map_err(|source| SyncError::CreateDir {
                path: cwd.clone(),
                source,
            })?;

            let clone_args = vec![
                "clone".to_string(),
                coords.remote_url(),
                ".".to_string(),
            ];
            self.runner.run("git", &clone_args, &cwd).await?;
            tracing::info!("Cloned {} into {}", coords.remote_url(), cwd);
        }

        progress.emit(ProgressEvent::UpdateStarted {
            pack: pack_name.to_string(),
            version: version.to_string(),
        });

        for step in update_steps(version) {
            self.runner.run("git", &step, &cwd).await?;
        }

        tracing::info!("{} ({}) synchronized at {}", pack_name, edition, version);
        Ok(cwd)
    }
}
