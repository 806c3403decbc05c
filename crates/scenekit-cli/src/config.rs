//! Config file for the command-line tool

use std::path::Path;

use anyhow::{Context, Result};
use scenekit_analyzer::AnalyzerConfig;
use scenekit_core::ScenekitError;
use scenekit_editor::SearchOptions;
use serde::{Deserialize, Serialize};

use crate::SearchFlags;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub analyzer: AnalyzerConfig,
    pub search: SearchSettings,
}

/// Default search options; command-line flags can only switch them on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub regex: bool,
    pub case_sensitive: bool,
    pub whole_word: bool,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config {:?}", path))
    }

    pub fn parse(content: &str) -> scenekit_core::Result<Self> {
        toml::from_str(content).map_err(|e| ScenekitError::Configuration(e.to_string()))
    }

    /// Search options for a command, combining config defaults with its flags
    pub fn search_options(&self, flags: SearchFlags) -> SearchOptions {
        SearchOptions::new()
            .regex(self.search.regex || flags.regex)
            .case_sensitive(self.search.case_sensitive || flags.case_sensitive)
            .whole_word(self.search.whole_word || flags.whole_word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_config() {
        let config = CliConfig::parse(indoc! {r#"
            [analyzer]
            long_scene_chars = 500
            max_nesting_depth = 2
            entry_scene = "prologue"

            [search]
            case_sensitive = true
        "#})
        .unwrap();

        assert_eq!(config.analyzer.long_scene_chars, 500);
        assert_eq!(config.analyzer.max_nesting_depth, 2);
        assert_eq!(config.analyzer.entry_scene.as_deref(), Some("prologue"));
        assert_eq!(config.analyzer.comment_check_min_lines, 20);
        assert!(config.search.case_sensitive);
        assert!(!config.search.regex);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(CliConfig::parse("").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = CliConfig::parse("[analyzer]\nmax_nesting_depth = \"deep\"");

        assert!(matches!(result, Err(ScenekitError::Configuration(_))));
    }

    #[test]
    fn test_flags_combine_with_config() {
        let config = CliConfig::parse("[search]\nwhole_word = true").unwrap();
        let options = config.search_options(SearchFlags {
            regex: true,
            ..SearchFlags::default()
        });

        assert_eq!(
            options,
            SearchOptions::new().regex(true).whole_word(true)
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = CliConfig::load(Path::new("/nonexistent/scenekit.toml")).unwrap_err();

        assert!(err.to_string().contains("Failed to read config"));
    }
}
