use crate::models::Edition;
use serde::Serialize;

/// Completed diff computation for one pack/edition/version triple.
#[derive(Debug, Clone, Serialize)]
pub struct EditionReport {
    /// Pack id the computation ran for.
    pub pack: String,

    pub edition: Edition,

    /// Version actually used after resolution (may differ from the request).
    pub version: String,

    /// Percentage of baseline files present in the candidate, rounded to two
    /// decimal places. Only defined for a non-empty baseline.
    pub completion: f64,

    /// Number of baseline files after filtering.
    pub total: usize,

    /// Baseline files absent from the candidate, in baseline enumeration
    /// order.
    pub missing: Vec<String>,

    /// Rendered missing list, ready for attachment or display.
    pub missing_report: String,

    /// Rendered list of candidate-only files inside recognized content
    /// roots. Absent when nothing non-conforming was found.
    pub nonconforming_report: Option<String>,
}

impl EditionReport {
    /// Completion rendered for display: at most two decimals, with a
    /// trailing hundredths zero trimmed (`87.5`, `88.0`, never `87.50`).
    pub fn completion_text(&self) -> String {
        render_completion(self.completion)
    }
}

/// Outcome of one edition's computation. Errors never cross the orchestrator
/// boundary; a failure becomes a displayable message attributed to the
/// triple that produced it.
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    Report(EditionReport),
    Failed {
        pack: String,
        edition: Edition,
        version: String,
        message: String,
    },
}

impl TaskOutcome {
    pub fn edition(&self) -> Edition {
        match self {
            TaskOutcome::Report(report) => report.edition,
            TaskOutcome::Failed { edition, .. } => *edition,
        }
    }

    pub fn as_report(&self) -> Option<&EditionReport> {
        match self {
            TaskOutcome::Report(report) => Some(report),
            TaskOutcome::Failed { .. } => None,
        }
    }
}

/// Completion percentage for `missing_count` absences out of `total`
/// baseline files, rounded to two decimal places.
///
/// Callers must ensure `total > 0`; an empty baseline is a computation
/// error upstream, not a score.
pub fn completion_percentage(missing_count: usize, total: usize) -> f64 {
    debug_assert!(total > 0, "completion is undefined for an empty baseline");
    let raw = 100.0 * (1.0 - missing_count as f64 / total as f64);
    (raw * 100.0).round() / 100.0
}

/// Render a completion value with at most two decimals, trimming a trailing
/// hundredths zero. One decimal is always kept so rewritten channel names
/// stay unambiguous (`88.0%`, not `88%` next to `87.5%`).
pub fn render_completion(value: f64) -> String {
    let mut text = format!("{value:.2}");
    if text.ends_with('0') {
        text.pop();
    }
    text
}
