use crate::merge::MergeTolerance;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engine configuration: thresholds, merge tolerances, recognizer keys, and
/// the names of the follow-on flow's steps. Every field has a default so a
/// partial config file stays valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum recognizer score for a detection to survive merging.
    pub score_threshold: f32,
    /// Minimum normalized similarity for an entry to count as the target.
    pub similarity_limit: f64,
    pub merge: MergeTolerance,
    pub keys: RecognizerKeys,
    pub tasks: TaskNames,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.84,
            similarity_limit: 0.8,
            merge: MergeTolerance::default(),
            keys: RecognizerKeys::default(),
            tasks: TaskNames::default(),
        }
    }
}

/// The three named recognizers the engine relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerKeys {
    /// Reads the name labels in the visible list region.
    pub entries: String,
    /// Sentinel: hits when the list cannot scroll further down.
    pub list_bottom: String,
    /// Sentinel: hits when the list is back at its top.
    pub list_top: String,
}

impl Default for RecognizerKeys {
    fn default() -> Self {
        Self {
            entries: "list_entry_names".to_string(),
            list_bottom: "list_bottom_marker".to_string(),
            list_top: "list_top_marker".to_string(),
        }
    }
}

/// Names of the external follow-on flow and the steps inside it that gift
/// overrides address. All host-side pipeline data; the engine only passes
/// these through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskNames {
    /// The declarative flow run after a successful click.
    pub follow_up: String,
    /// Entry step of the flow; its transition list is overridden to decline.
    pub entry_step: String,
    /// Step that picks a gift by template matching.
    pub pick_step: String,
    /// Step that hands the picked gift over.
    pub give_step: String,
    /// Step that declines gifting altogether.
    pub decline_step: String,
    pub any_gift_templates: Vec<String>,
    pub favorite_gift_templates: Vec<String>,
}

impl Default for TaskNames {
    fn default() -> Self {
        Self {
            follow_up: "invite_selected".to_string(),
            entry_step: "gift_prompt".to_string(),
            pick_step: "pick_gift".to_string(),
            give_step: "give_gift".to_string(),
            decline_step: "decline_gift".to_string(),
            any_gift_templates: vec!["gifts/any.png".to_string()],
            favorite_gift_templates: vec!["gifts/favorite.png".to_string()],
        }
    }
}

impl SearchConfig {
    /// Load from the user config file, falling back to defaults.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_file_path()
            && let Ok(content) = std::fs::read_to_string(config_path)
            && let Ok(config) = toml::from_str(&content)
        {
            return config;
        }
        Self::default()
    }

    /// Load from an explicit TOML file.
    pub fn from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(config_path, content)?;
        }
        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("listsense");
            path.push("config.toml");
            path
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_constants() {
        let config = SearchConfig::default();
        assert_eq!(config.score_threshold, 0.84);
        assert_eq!(config.similarity_limit, 0.8);
        assert_eq!(config.merge.x, 50);
        assert_eq!(config.merge.y, 30);
        assert_eq!(config.keys.entries, "list_entry_names");
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let config: SearchConfig = toml::from_str("score_threshold = 0.9").unwrap();
        assert_eq!(config.score_threshold, 0.9);
        assert_eq!(config.similarity_limit, 0.8);
        assert_eq!(config.keys.list_bottom, "list_bottom_marker");
    }

    #[test]
    fn toml_roundtrip() {
        let config = SearchConfig::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let back: SearchConfig = toml::from_str(&content).unwrap();
        assert_eq!(back.tasks, config.tasks);
        assert_eq!(back.keys, config.keys);
    }

    #[test]
    fn from_path_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[merge]\nx = 80\n").unwrap();

        let config = SearchConfig::from_path(&path).unwrap();
        assert_eq!(config.merge.x, 80);
        assert_eq!(config.merge.y, 30);
    }

    #[test]
    fn from_path_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not toml at all {{{").unwrap();
        assert!(SearchConfig::from_path(&path).is_err());
    }
}
