//! Arcade configuration file
//!
//! JSON or YAML, chosen by extension. Every section is optional and falls
//! back to its defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fa_cards::CardConfig;
use fa_core::JsonFileStore;
use fa_slot::SlotConfig;
use serde::{Deserialize, Serialize};

/// Where the arcade keeps its save file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Save file path; platform data dir when unset
    pub path: Option<PathBuf>,
    /// Keep state in memory only
    pub in_memory: bool,
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(JsonFileStore::default_path)
    }
}

/// Complete arcade configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub slot: SlotConfig,
    pub cards: CardConfig,
    pub store: StoreConfig,
}

impl ArcadeConfig {
    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yml::from_str(&content)
                .with_context(|| format!("parsing YAML config {}", path.display()))?,
            _ => serde_json::from_str(&content)
                .with_context(|| format!("parsing JSON config {}", path.display()))?,
        };

        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load when a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.slot.validate().context("invalid slot config")?;
        self.cards.validate().context("invalid cards config")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arcade.yaml");
        fs::write(
            &path,
            "slot:\n  daily_bonus: 80\n  timing:\n    tumble_frames: 0\ncards:\n  pack_size: 3\n",
        )
        .unwrap();

        let config = ArcadeConfig::load_from(&path).unwrap();
        assert_eq!(config.slot.daily_bonus, 80);
        assert_eq!(config.slot.min_bet, 10);
        assert_eq!(config.slot.timing.tumble_frames, 0);
        assert_eq!(config.cards.pack_size, 3);
        assert_eq!(config.cards.rarity_weights.mythical, 3);
    }

    #[test]
    fn test_json_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arcade.json");
        fs::write(&path, r#"{"store": {"in_memory": true}}"#).unwrap();

        let config = ArcadeConfig::load_from(&path).unwrap();
        assert!(config.store.in_memory);
        assert_eq!(config.slot, SlotConfig::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arcade.json");
        fs::write(&path, r#"{"slot": {"min_bet": 0}}"#).unwrap();

        assert!(ArcadeConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_missing_path_uses_defaults() {
        let config = ArcadeConfig::load_or_default(None).unwrap();
        assert_eq!(config, ArcadeConfig::default());
    }
}
