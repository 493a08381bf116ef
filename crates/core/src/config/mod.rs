use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level configuration structure for the editor core.
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub history: HistoryConfig,
    pub autosave: AutosaveConfig,
    pub alignment: AlignmentConfig,
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Bounded undo history kept by an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of snapshots; the oldest is evicted first.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Quiet period after the last edit before the song is handed to the
    /// persistence layer.
    pub debounce_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { debounce_ms: 2_000 }
    }
}

/// Limits for the proximity fallback of the alignment engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// How far (in words) a retyped word may drift from where the old word
    /// would have landed.
    pub max_index_distance: usize,
    /// How many character edits separate the old and the retyped word.
    pub max_edit_distance: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            max_index_distance: 1,
            max_edit_distance: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EditorConfig::from_json_str(r#"{"history":{"capacity":5}}"#).unwrap();
        assert_eq!(config.history.capacity, 5);
        assert_eq!(config.autosave.debounce_ms, 2_000);
        assert_eq!(config.alignment, AlignmentConfig::default());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = EditorConfig::from_json_str("{history").unwrap_err();
        assert!(format!("{err}").contains("invalid configuration"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EditorConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, crate::ChordSheetError::Io(_)));
    }
}
