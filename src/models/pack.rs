use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pack id of the canonical baseline pack in the catalog.
///
/// Every completion computation diffs a candidate pack against this entry,
/// so the catalog must always define it.
pub const BASELINE_PACK: &str = "default";

/// Version sentinel used for Bedrock, which has no discrete version history
/// worth pinning.
pub const BEDROCK_LATEST: &str = "latest";

/// A concrete platform edition of the resource pack ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    Java,
    Bedrock,
}

impl Edition {
    /// Lowercase identifier as used in catalog URLs and config keys.
    pub fn id(&self) -> &'static str {
        match self {
            Edition::Java => "java",
            Edition::Bedrock => "bedrock",
        }
    }

    /// Title-cased name for user-facing messages ("Java Edition").
    pub fn title(&self) -> &'static str {
        match self {
            Edition::Java => "Java",
            Edition::Bedrock => "Bedrock",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Edition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "java" => Ok(Edition::Java),
            "bedrock" => Ok(Edition::Bedrock),
            other => Err(format!("unknown edition: {other}")),
        }
    }
}

/// What the caller asked to compute: one edition, or every edition the
/// catalog knows about.
///
/// `All` is never itself a unit of computation; the orchestrator expands it
/// into one task per concrete edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditionSelector {
    All,
    Only(Edition),
}

impl FromStr for EditionSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(EditionSelector::All)
        } else {
            Edition::from_str(s).map(EditionSelector::Only)
        }
    }
}

/// Repository coordinates of one edition's source tree on the git host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCoordinates {
    pub org: String,
    pub repo: String,
}

impl RepoCoordinates {
    /// Clone URL derived deterministically from the coordinates.
    pub fn remote_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.org, self.repo)
    }
}

/// One content pack as defined by the catalog service.
///
/// Immutable once fetched; a fresh copy is pulled from the catalog on every
/// invocation rather than cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackReference {
    /// Display name used in user-facing messages.
    pub name: String,

    /// Per-edition repository coordinates. Editions without an entry are
    /// unsupported by this pack.
    #[serde(default)]
    pub github: IndexMap<Edition, RepoCoordinates>,
}

/// Catalog pack map, keyed by pack id.
pub type PackSet = IndexMap<String, PackReference>;

/// Resolve a requested version string against the known versions for an
/// edition (most-recent first).
///
/// Bedrock always resolves to [`BEDROCK_LATEST`]. An unrecognized version
/// falls back to the most recent known one instead of failing: unknown
/// version strings are common user error and a result is still wanted. An
/// empty known list keeps the request unchanged; the checkout will surface
/// the bad ref if it does not exist.
pub fn resolve_version(edition: Edition, requested: &str, known: &[String]) -> String {
    if edition == Edition::Bedrock {
        return BEDROCK_LATEST.to_string();
    }

    if known.iter().any(|v| v == requested) {
        requested.to_string()
    } else {
        known.first().cloned().unwrap_or_else(|| requested.to_string())
    }
}
