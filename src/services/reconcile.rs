use crate::models::EditionReport;
use crate::services::catalog::{CatalogApi, CatalogError};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use thiserror::Error;

/// Kind of display channel a mapping resolves to. Only voice channels carry
/// a completion number in their name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Voice,
    Text,
}

/// A resolved display channel.
#[derive(Debug, Clone)]
pub struct DisplayChannel {
    pub name: String,
    pub kind: ChannelKind,
}

/// Errors from the display-entity service.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Channel lookup failed: {0}")]
    Lookup(String),

    #[error("Rename failed: {0}")]
    Rename(String),
}

/// Capability over the external display surface (channel directory).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DisplayApi: Send + Sync {
    /// Resolve a channel id to a live channel, or `None` when it does not
    /// exist or cannot be fetched.
    async fn find_channel(&self, id: &str) -> Result<Option<DisplayChannel>, DisplayError>;

    async fn rename_channel(&self, id: &str, name: &str) -> Result<(), DisplayError>;
}

#[derive(Error, Debug)]
enum ReconcileError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// What the reconciler did, for observability only. Failures surface as
/// `Skipped`; they are logged internally and never escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Renamed,
    Skipped,
}

/// Pushes a completed report's score into the mapped progress channel name.
///
/// Cosmetic side effect only: every failure is downgraded to a logged no-op
/// at the outer boundary and never reaches the primary result path.
pub struct ProgressChannelReconciler {
    catalog: Arc<dyn CatalogApi>,
    display: Arc<dyn DisplayApi>,

    /// Matches runs of digits and dots; the last match in a channel name is
    /// the completion number to compare and replace.
    number_pattern: Regex,
}

impl ProgressChannelReconciler {
    pub fn new(catalog: Arc<dyn CatalogApi>, display: Arc<dyn DisplayApi>) -> Self {
        Self {
            catalog,
            display,
            number_pattern: Regex::new(r"[\d.]+").expect("Invalid number regex"),
        }
    }

    /// Reconcile the mapped channel with `report`'s completion, best-effort.
    pub async fn reconcile(&self, report: &EditionReport) -> ReconcileOutcome {
        match self.try_reconcile(report).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(
                    "Progress channel update for {}/{} skipped: {}",
                    report.pack,
                    report.edition,
                    err
                );
                ReconcileOutcome::Skipped
            }
        }
    }

    async fn try_reconcile(
        &self,
        report: &EditionReport,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let mapping = self.catalog.progress_channels().await?;

        // Packs/editions without a live display surface simply have no
        // mapping; that is the expected case, not an error.
        let Some(channel_id) = mapping
            .get(&report.pack)
            .and_then(|editions| editions.get(&report.edition))
        else {
            return Ok(ReconcileOutcome::Skipped);
        };

        let Some(channel) = self.display.find_channel(channel_id).await? else {
            return Ok(ReconcileOutcome::Skipped);
        };
        if channel.kind != ChannelKind::Voice {
            return Ok(ReconcileOutcome::Skipped);
        }

        let completion = report.completion_text();
        let Some(found) = self.number_pattern.find_iter(&channel.name).last() else {
            tracing::debug!("Channel {} has no numeric substring to rewrite", channel_id);
            return Ok(ReconcileOutcome::Skipped);
        };

        // Skip redundant renames: the display service rate-limits them.
        if found.as_str() == completion {
            return Ok(ReconcileOutcome::Skipped);
        }

        let mut updated = channel.name.clone();
        updated.replace_range(found.range(), &completion);
        self.display.rename_channel(channel_id, &updated).await?;

        tracing::info!(
            "Progress channel {} renamed to `{}` ({} {})",
            channel_id,
            updated,
            report.pack,
            report.edition
        );
        Ok(ReconcileOutcome::Renamed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Edition;
    use crate::services::catalog::{MockCatalogApi, ProgressChannelMap};
    use indexmap::IndexMap;

    fn report(completion: f64) -> EditionReport {
        EditionReport {
            pack: "candidate32x".to_string(),
            edition: Edition::Java,
            version: "1.21.4".to_string(),
            completion,
            total: 100,
            missing: Vec::new(),
            missing_report: String::new(),
            nonconforming_report: None,
        }
    }

    fn catalog_with_mapping(channel_id: &str) -> MockCatalogApi {
        let mut mapping = ProgressChannelMap::new();
        let mut editions = IndexMap::new();
        editions.insert(Edition::Java, channel_id.to_string());
        mapping.insert("candidate32x".to_string(), editions);

        let mut catalog = MockCatalogApi::new();
        catalog
            .expect_progress_channels()
            .returning(move || Ok(mapping.clone()));
        catalog
    }

    fn voice_channel(name: &str) -> DisplayChannel {
        DisplayChannel {
            name: name.to_string(),
            kind: ChannelKind::Voice,
        }
    }

    #[tokio::test]
    async fn test_matching_completion_issues_no_rename() {
        let catalog = catalog_with_mapping("123");
        let mut display = MockDisplayApi::new();
        display
            .expect_find_channel()
            .returning(|_| Ok(Some(voice_channel("progress-87.5%"))));
        // No rename expectation: the strict mock panics if one is issued.

        let reconciler = ProgressChannelReconciler::new(Arc::new(catalog), Arc::new(display));
        assert_eq!(
            reconciler.reconcile(&report(87.5)).await,
            ReconcileOutcome::Skipped
        );
    }

    #[tokio::test]
    async fn test_changed_completion_rewrites_number_in_place() {
        let catalog = catalog_with_mapping("123");
        let mut display = MockDisplayApi::new();
        display
            .expect_find_channel()
            .returning(|_| Ok(Some(voice_channel("progress-87.5%"))));
        display
            .expect_rename_channel()
            .withf(|id, name| id == "123" && name == "progress-88.0%")
            .times(1)
            .returning(|_, _| Ok(()));

        let reconciler = ProgressChannelReconciler::new(Arc::new(catalog), Arc::new(display));
        assert_eq!(
            reconciler.reconcile(&report(88.0)).await,
            ReconcileOutcome::Renamed
        );
    }

    #[tokio::test]
    async fn test_unmapped_pack_exits_silently() {
        let mut catalog = MockCatalogApi::new();
        catalog
            .expect_progress_channels()
            .returning(|| Ok(ProgressChannelMap::new()));
        let display = MockDisplayApi::new();

        let reconciler = ProgressChannelReconciler::new(Arc::new(catalog), Arc::new(display));
        reconciler.reconcile(&report(50.0)).await;
    }

    #[tokio::test]
    async fn test_unresolvable_channel_exits_silently() {
        let catalog = catalog_with_mapping("123");
        let mut display = MockDisplayApi::new();
        display.expect_find_channel().returning(|_| Ok(None));

        let reconciler = ProgressChannelReconciler::new(Arc::new(catalog), Arc::new(display));
        reconciler.reconcile(&report(50.0)).await;
    }

    #[tokio::test]
    async fn test_text_channel_is_left_alone() {
        let catalog = catalog_with_mapping("123");
        let mut display = MockDisplayApi::new();
        display.expect_find_channel().returning(|_| {
            Ok(Some(DisplayChannel {
                name: "progress-10.0%".to_string(),
                kind: ChannelKind::Text,
            }))
        });

        let reconciler = ProgressChannelReconciler::new(Arc::new(catalog), Arc::new(display));
        reconciler.reconcile(&report(50.0)).await;
    }

    #[tokio::test]
    async fn test_rename_failure_is_swallowed() {
        let catalog = catalog_with_mapping("123");
        let mut display = MockDisplayApi::new();
        display
            .expect_find_channel()
            .returning(|_| Ok(Some(voice_channel("progress-10.0%"))));
        display
            .expect_rename_channel()
            .returning(|_, _| Err(DisplayError::Rename("rate limited".to_string())));

        let reconciler = ProgressChannelReconciler::new(Arc::new(catalog), Arc::new(display));
        // Must not panic or surface the error.
        reconciler.reconcile(&report(50.0)).await;
    }

    #[tokio::test]
    async fn test_last_numeric_substring_is_the_target() {
        let catalog = catalog_with_mapping("123");
        let mut display = MockDisplayApi::new();
        display
            .expect_find_channel()
            .returning(|_| Ok(Some(voice_channel("32x-progress: 42.1%"))));
        display
            .expect_rename_channel()
            .withf(|_, name| name == "32x-progress: 88.0%")
            .times(1)
            .returning(|_, _| Ok(()));

        let reconciler = ProgressChannelReconciler::new(Arc::new(catalog), Arc::new(display));
        reconciler.reconcile(&report(88.0)).await;
    }
}
