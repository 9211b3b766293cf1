use crate::models::Edition;
use serde::{Deserialize, Serialize};

/// Ignore lists and the extension allow-list, loaded from
/// `ignored-paths.yaml` (or built-in defaults when the file is absent).
///
/// Immutable after load and passed into the diff engine explicitly, so tests
/// can substitute fixtures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// File extensions that count as pack content. Everything else is
    /// invisible to enumeration.
    #[serde(default = "default_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Path substrings excluded for Java edition trees.
    #[serde(default)]
    pub java: Vec<String>,

    /// Path substrings excluded for Bedrock edition trees.
    #[serde(default)]
    pub bedrock: Vec<String>,

    /// Path substrings belonging to modded content, excluded unless modded
    /// checking is requested for Java.
    #[serde(default)]
    pub modded: Vec<String>,
}

impl FilterConfig {
    fn edition_list(&self, edition: Edition) -> &[String] {
        match edition {
            Edition::Java => &self.java,
            Edition::Bedrock => &self.bedrock,
        }
    }

    /// Build the effective filter for one computation.
    ///
    /// Modded textures are only inspectable for Java; for every other case
    /// the modded list widens the edition's own ignore list.
    pub fn for_edition(&self, edition: Edition, check_modded: bool) -> FilterSet {
        let mut ignored = Vec::new();
        if !(check_modded && edition == Edition::Java) {
            ignored.extend(self.modded.iter().cloned());
        }
        ignored.extend(self.edition_list(edition).iter().cloned());

        FilterSet {
            extensions: self.allowed_extensions.clone(),
            ignored,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_extensions(),
            java: vec![
                "textures/font".to_string(),
                "textures/misc".to_string(),
                "textures/colormap".to_string(),
                "_MACOSX".to_string(),
            ],
            bedrock: vec![
                "textures/persona_thumbnails".to_string(),
                "textures/ui".to_string(),
                "_MACOSX".to_string(),
            ],
            modded: vec![
                "assets/forge".to_string(),
                "assets/fabric".to_string(),
                "assets/neoforge".to_string(),
                "assets/create".to_string(),
            ],
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["png".to_string(), "tga".to_string()]
}

/// The effective exclusion filter for one edition/mode, consumed by the tree
/// walker and the diff engine. Read-only; safe to share across concurrent
/// computations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    extensions: Vec<String>,
    ignored: Vec<String>,
}

impl FilterSet {
    /// Construct directly; primarily for tests and embedding callers.
    pub fn new(extensions: Vec<String>, ignored: Vec<String>) -> Self {
        Self { extensions, ignored }
    }

    /// Whether a file extension (without the dot) is pack content.
    pub fn allows_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|allowed| allowed == ext)
    }

    /// Whether any ignored substring occurs in the path.
    pub fn excludes(&self, path: &str) -> bool {
        self.ignored.iter().any(|ignored| path.contains(ignored))
    }

    /// Exact membership test, used for the non-conforming check where a
    /// candidate path must not itself be an ignore entry.
    pub fn contains_exact(&self, path: &str) -> bool {
        self.ignored.iter().any(|ignored| ignored == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_with_modded_check_keeps_modded_paths() {
        let config = FilterConfig::default();
        let filter = config.for_edition(Edition::Java, true);

        assert!(!filter.excludes("/assets/forge/textures/block/stone.png"));
        assert!(filter.excludes("/assets/minecraft/textures/font/ascii.png"));
    }

    #[test]
    fn test_java_without_modded_check_widens_filter() {
        let config = FilterConfig::default();
        let filter = config.for_edition(Edition::Java, false);

        assert!(filter.excludes("/assets/forge/textures/block/stone.png"));
    }

    #[test]
    fn test_bedrock_always_excludes_modded() {
        // The modded flag only means something for Java.
        let config = FilterConfig::default();
        let filter = config.for_edition(Edition::Bedrock, true);

        assert!(filter.excludes("/assets/fabric/icon.png"));
        assert!(filter.excludes("/textures/ui/button.png"));
    }

    #[test]
    fn test_extension_allow_list() {
        let filter = FilterConfig::default().for_edition(Edition::Java, true);
        assert!(filter.allows_extension("png"));
        assert!(filter.allows_extension("tga"));
        assert!(!filter.allows_extension("txt"));
    }

    #[test]
    fn test_exact_membership() {
        let filter = FilterSet::new(
            vec!["png".to_string()],
            vec!["/textures/map/map_background.png".to_string()],
        );
        assert!(filter.contains_exact("/textures/map/map_background.png"));
        assert!(!filter.contains_exact("/textures/map/map_background.png.bak"));
    }
}
