use crate::models::{
    BASELINE_PACK, BEDROCK_LATEST, Edition, EditionReport, EditionSelector, FilterConfig,
    TaskOutcome, completion_percentage, resolve_version,
};
use crate::progress::{ProgressEvent, ProgressTracker};
use crate::services::catalog::{CatalogApi, CatalogError};
use crate::services::diff::{diff_textures, format_report};
use crate::services::repo_sync::{RepoSynchronizer, SyncError};
use crate::services::tree_walk::{WalkError, collect_files};
use camino::{Utf8Path, Utf8PathBuf};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;

/// Errors fatal to one edition's computation.
#[derive(Error, Debug)]
pub enum MissingError {
    #[error("{pack} doesn't support {} Edition.", .edition.title())]
    UnsupportedEdition { pack: String, edition: Edition },

    #[error("Unknown pack: {0}")]
    UnknownPack(String),

    #[error(
        "Baseline for {edition} `{version}` contains no files after filtering; \
         the sync or filter configuration is broken"
    )]
    EmptyBaseline { edition: Edition, version: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Walk(#[from] WalkError),
}

/// The completion engine: expands an edition selection, synchronizes the
/// baseline and candidate repositories, and diffs their filtered file sets.
///
/// Holds only read-only collaborators, so one instance can serve concurrent
/// computations. The catalog and synchronizer are injected capabilities;
/// tests substitute in-memory fakes.
pub struct MissingService {
    catalog: Arc<dyn CatalogApi>,
    syncer: Arc<dyn RepoSynchronizer>,
    filters: FilterConfig,
}

impl MissingService {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        syncer: Arc<dyn RepoSynchronizer>,
        filters: FilterConfig,
    ) -> Self {
        Self {
            catalog,
            syncer,
            filters,
        }
    }

    /// Compute missing results for a pack across the selected editions.
    ///
    /// Returns one [`TaskOutcome`] per concrete edition, in catalog order.
    /// Each edition's computation is isolated: its error becomes a `Failed`
    /// outcome carrying a displayable message, never an early abort of the
    /// batch. The only fatal path is the up-front edition-list fetch needed
    /// to expand [`EditionSelector::All`].
    pub async fn compute(
        &self,
        pack: &str,
        selector: EditionSelector,
        version: &str,
        check_modded: bool,
        progress: &ProgressTracker,
    ) -> Result<Vec<TaskOutcome>, MissingError> {
        let editions = match selector {
            EditionSelector::Only(edition) => vec![edition],
            EditionSelector::All => self.catalog.editions().await?,
        };

        // Editions use independent git repositories, so they can safely run
        // in parallel.
        let tasks = editions.into_iter().map(|edition| async move {
            match self
                .compute_edition(pack, edition, version, check_modded, progress)
                .await
            {
                Ok(report) => TaskOutcome::Report(report),
                Err(err) => {
                    tracing::error!("Computation for {} ({}) failed: {}", pack, edition, err);
                    TaskOutcome::Failed {
                        pack: pack.to_string(),
                        edition,
                        version: version.to_string(),
                        message: failure_message(pack, edition, version, &err),
                    }
                }
            }
        });

        Ok(join_all(tasks).await)
    }

    /// Compute one edition's report, or fail with a domain error.
    pub async fn compute_edition(
        &self,
        pack: &str,
        edition: Edition,
        version: &str,
        check_modded: bool,
        progress: &ProgressTracker,
    ) -> Result<EditionReport, MissingError> {
        let packs = self.catalog.packs().await?;

        let candidate = packs
            .get(pack)
            .ok_or_else(|| MissingError::UnknownPack(pack.to_string()))?;
        let candidate_coords = candidate.github.get(&edition).ok_or_else(|| {
            MissingError::UnsupportedEdition {
                pack: candidate.name.clone(),
                edition,
            }
        })?;

        let baseline = packs
            .get(BASELINE_PACK)
            .ok_or_else(|| MissingError::UnknownPack(BASELINE_PACK.to_string()))?;
        let baseline_coords = baseline.github.get(&edition).ok_or_else(|| {
            MissingError::UnsupportedEdition {
                pack: baseline.name.clone(),
                edition,
            }
        })?;

        let version = if edition == Edition::Bedrock {
            BEDROCK_LATEST.to_string()
        } else {
            let known = self.catalog.versions(edition).await?;
            resolve_version(edition, version, &known)
        };

        // Independent local trees: baseline and candidate sync concurrently.
        let (baseline_root, candidate_root) = tokio::try_join!(
            self.syncer
                .sync(&baseline.name, edition, baseline_coords, &version, progress),
            self.syncer
                .sync(&candidate.name, edition, candidate_coords, &version, progress),
        )?;

        progress.emit(ProgressEvent::DiffStarted);

        let filter = self.filters.for_edition(edition, check_modded);
        let baseline_paths =
            relative_paths(&baseline_root, collect_files(&baseline_root, &filter)?);
        let candidate_paths =
            relative_paths(&candidate_root, collect_files(&candidate_root, &filter)?);

        // An empty baseline means the sync or filters misfired; scoring it
        // as complete would be a lie and dividing by it would be worse.
        if baseline_paths.is_empty() {
            return Err(MissingError::EmptyBaseline { edition, version });
        }

        let outcome = diff_textures(&baseline_paths, &candidate_paths, &filter);
        let completion = completion_percentage(outcome.missing.len(), baseline_paths.len());

        tracing::info!(
            "{} ({}, {}): {} of {} baseline files missing, completion {}",
            pack,
            edition,
            version,
            outcome.missing.len(),
            baseline_paths.len(),
            completion
        );

        let missing_report = format_report(&outcome.missing);
        let nonconforming_report = if outcome.nonconforming.is_empty() {
            None
        } else {
            Some(format_report(&outcome.nonconforming))
        };

        Ok(EditionReport {
            pack: pack.to_string(),
            edition,
            version,
            completion,
            total: baseline_paths.len(),
            missing: outcome.missing,
            missing_report,
            nonconforming_report,
        })
    }
}

/// Displayable failure text. Always names the triple that failed so batch
/// callers can attribute it.
fn failure_message(pack: &str, edition: Edition, version: &str, err: &MissingError) -> String {
    format!("Computing `{pack}` ({edition}, {version}) failed: {err}")
}

/// Strip the tree root so baseline and candidate paths compare by suffix
/// identity, with a leading `/` and forward slashes.
fn relative_paths(root: &Utf8Path, files: Vec<Utf8PathBuf>) -> Vec<String> {
    files
        .into_iter()
        .map(|file| {
            let rel = file
                .strip_prefix(root)
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|_| file.as_str().to_string());
            format!("/{}", rel.trim_start_matches('/').replace('\\', "/"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_strip_root_and_lead_with_slash() {
        let files = vec![Utf8PathBuf::from(
            "/tmp/repos/base/assets/minecraft/textures/a.png",
        )];
        let rel = relative_paths(Utf8Path::new("/tmp/repos/base"), files);
        assert_eq!(rel, vec!["/assets/minecraft/textures/a.png".to_string()]);
    }

    #[test]
    fn test_failure_message_names_the_triple() {
        let err = MissingError::UnknownPack("nope".to_string());
        let message = failure_message("nope", Edition::Java, "1.21.4", &err);
        assert!(message.contains("nope"));
        assert!(message.contains("java"));
        assert!(message.contains("1.21.4"));
    }
}
