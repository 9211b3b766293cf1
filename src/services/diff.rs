use crate::models::FilterSet;
use std::collections::HashSet;

/// Content roots a candidate-only file must live under to count as
/// non-conforming. Anything outside these is invisible to the check.
pub const CONTENT_ROOTS: [&str; 3] = ["/assets/minecraft/textures", "/assets/realms", "/textures"];

/// Community in-joke file that must never be reported, regardless of any
/// other rule.
pub const JOKE_FILE: &str = "huge_chungus.png";

/// Result of diffing one candidate tree against the baseline tree.
#[derive(Debug, Clone, Default)]
pub struct DiffOutcome {
    /// Baseline paths absent from the candidate, in baseline order.
    pub missing: Vec<String>,

    /// Candidate-only paths inside recognized content roots that are not
    /// filter entries and not the joke file.
    pub nonconforming: Vec<String>,
}

/// Compute the missing and non-conforming sets for two root-relative path
/// lists.
///
/// Candidate membership uses a `HashSet`: baseline sets reach tens of
/// thousands of entries and linear scans per path would be quadratic.
pub fn diff_textures(baseline: &[String], candidate: &[String], filter: &FilterSet) -> DiffOutcome {
    let candidate_set: HashSet<&str> = candidate.iter().map(String::as_str).collect();
    let baseline_set: HashSet<&str> = baseline.iter().map(String::as_str).collect();

    let missing = baseline
        .iter()
        .filter(|path| !candidate_set.contains(path.as_str()))
        .cloned()
        .collect();

    let nonconforming = candidate
        .iter()
        .filter(|path| {
            let normalized = path.replace('\\', "/");
            let in_content_root = CONTENT_ROOTS
                .iter()
                .any(|root| normalized.starts_with(root));

            in_content_root
                && !baseline_set.contains(path.as_str())
                && !filter.contains_exact(path)
                && !normalized.ends_with(JOKE_FILE)
        })
        .cloned()
        .collect();

    DiffOutcome {
        missing,
        nonconforming,
    }
}

/// Render a path list into a human-diffable report.
///
/// Separators are normalized to `/`, the literal `/assets/minecraft` prefix
/// is stripped wherever it occurs, and `/textures/` is stripped only at the
/// start of a line so realms and similar subtrees keep their mid-path
/// segments intact.
pub fn format_report(paths: &[String]) -> String {
    paths
        .iter()
        .map(|path| {
            let line = path.replace('\\', "/").replace("/assets/minecraft", "");
            match line.strip_prefix("/textures/") {
                Some(rest) => rest.to_string(),
                None => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> FilterSet {
        FilterSet::new(vec!["png".to_string()], Vec::new())
    }

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_is_baseline_minus_candidate() {
        let baseline = paths(&[
            "/assets/minecraft/textures/a.png",
            "/assets/minecraft/textures/b.png",
        ]);
        let candidate = paths(&["/assets/minecraft/textures/a.png"]);

        let outcome = diff_textures(&baseline, &candidate, &filter());

        assert_eq!(outcome.missing, paths(&["/assets/minecraft/textures/b.png"]));
    }

    #[test]
    fn test_identical_sets_have_no_diff() {
        let baseline = paths(&[
            "/assets/minecraft/textures/a.png",
            "/assets/minecraft/textures/b.png",
        ]);

        let outcome = diff_textures(&baseline, &baseline, &filter());

        assert!(outcome.missing.is_empty());
        assert!(outcome.nonconforming.is_empty());
    }

    #[test]
    fn test_missing_preserves_baseline_order() {
        let baseline = paths(&[
            "/textures/blocks/z.png",
            "/textures/blocks/a.png",
            "/textures/blocks/m.png",
        ]);
        let outcome = diff_textures(&baseline, &[], &filter());

        assert_eq!(outcome.missing, baseline);
    }

    #[test]
    fn test_nonconforming_requires_content_root() {
        let candidate = paths(&[
            "/assets/minecraft/textures/extra.png",
            "/assets/realms/extra.png",
            "/textures/extra.png",
            "/secret/extra.png",
        ]);

        let outcome = diff_textures(&[], &candidate, &filter());

        assert_eq!(outcome.nonconforming.len(), 3);
        assert!(!outcome.nonconforming.iter().any(|p| p.contains("secret")));
    }

    #[test]
    fn test_nonconforming_skips_filter_entries_and_joke_file() {
        let exact = "/textures/map/map_background.png";
        let candidate = paths(&[exact, "/textures/entity/huge_chungus.png"]);
        let filter = FilterSet::new(vec!["png".to_string()], vec![exact.to_string()]);

        let outcome = diff_textures(&[], &candidate, &filter);

        assert!(outcome.nonconforming.is_empty());
    }

    #[test]
    fn test_format_strips_known_prefixes() {
        let report = format_report(&paths(&[
            "/assets/minecraft/textures/block/stone.png",
            "/textures/blocks/dirt.png",
            "/assets/realms/textures/logo.png",
        ]));

        assert_eq!(
            report,
            "/textures/block/stone.png\nblocks/dirt.png\n/assets/realms/textures/logo.png"
        );
    }

    #[test]
    fn test_format_normalizes_backslashes() {
        let report = format_report(&paths(&["\\assets\\minecraft\\textures\\a.png"]));
        assert_eq!(report, "/textures/a.png");
    }

    #[test]
    fn test_format_strips_textures_prefix_only_at_line_start() {
        let report = format_report(&paths(&["/assets/realms/textures/logo.png"]));
        // Mid-path "/textures/" segments are untouched.
        assert_eq!(report, "/assets/realms/textures/logo.png");
    }

    #[test]
    fn test_format_round_trip() {
        let input = paths(&["/textures/blocks/a.png", "/textures/blocks/b.png"]);
        let report = format_report(&input);
        let lines: Vec<&str> = report.split('\n').collect();
        assert_eq!(lines, vec!["blocks/a.png", "blocks/b.png"]);
    }
}
