//! Engine configuration.
//!
//! Defaults reproduce the standard cube rules (15-card packs, 45-card pools,
//! 40-card decks on a 16-land baseline). A JSON file can override any subset.

use crate::color::Color;
use crate::error::{DraftError, DraftResult};
use crate::pack::PackOptions;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Rules for turning a finished pool into a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "camelCase", default))]
pub struct DeckRules {
    /// Exact pool size accepted by the assembler.
    pub pool_size: usize,
    pub deck_size: usize,
    /// Land count the spell target is computed from before clamping.
    pub land_baseline: usize,
    pub min_spells: usize,
    pub max_spells: usize,
    /// Basic land color used when the pool has no colored cards at all.
    pub fallback_color: Color,
}

impl Default for DeckRules {
    fn default() -> Self {
        Self {
            pool_size: 45,
            deck_size: 40,
            land_baseline: 16,
            min_spells: 22,
            max_spells: 24,
            fallback_color: Color::Green,
        }
    }
}

impl DeckRules {
    pub fn validate(&self) -> DraftResult<()> {
        if self.min_spells > self.max_spells {
            return Err(DraftError::config(format!(
                "minSpells ({}) exceeds maxSpells ({})",
                self.min_spells, self.max_spells
            )));
        }
        if self.max_spells > self.deck_size {
            return Err(DraftError::config(format!(
                "maxSpells ({}) exceeds deckSize ({})",
                self.max_spells, self.deck_size
            )));
        }
        if self.land_baseline > self.deck_size {
            return Err(DraftError::config(format!(
                "landBaseline ({}) exceeds deckSize ({})",
                self.land_baseline, self.deck_size
            )));
        }
        if self.pool_size < self.deck_size {
            return Err(DraftError::config(format!(
                "poolSize ({}) is smaller than deckSize ({})",
                self.pool_size, self.deck_size
            )));
        }
        Ok(())
    }
}

/// Top-level configuration: pack defaults and deck rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "camelCase", default))]
pub struct DraftConfig {
    pub pack: PackOptions,
    pub deck: DeckRules,
}

impl DraftConfig {
    pub fn validate(&self) -> DraftResult<()> {
        if self.pack.size == 0 {
            return Err(DraftError::config("pack size must be positive"));
        }
        if let Some(min_size) = self.pack.min_size {
            if min_size > self.pack.size {
                return Err(DraftError::config(format!(
                    "pack minSize ({min_size}) exceeds size ({})",
                    self.pack.size
                )));
            }
        }
        self.deck.validate()
    }

    /// Parses and validates a JSON configuration. Missing keys keep defaults.
    #[cfg(feature = "serialization")]
    pub fn from_json_str(json: &str) -> DraftResult<Self> {
        let config: DraftConfig =
            serde_json::from_str(json).map_err(|e| DraftError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    #[cfg(feature = "serialization")]
    pub fn load(path: impl AsRef<std::path::Path>) -> DraftResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| DraftError::config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DraftConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pack.size, 15);
        assert_eq!(config.deck.pool_size, 45);
        assert_eq!(config.deck.fallback_color, Color::Green);
    }

    #[test]
    fn test_inconsistent_rules_rejected() {
        let rules = DeckRules {
            min_spells: 25,
            ..DeckRules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(DraftError::InvalidConfig { .. })
        ));

        let rules = DeckRules {
            pool_size: 30,
            ..DeckRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            DraftConfig::from_json_str(r#"{"pack": {"colorBalanced": true}, "deck": {"fallbackColor": "U"}}"#)
                .unwrap();
        assert!(config.pack.color_balanced);
        assert_eq!(config.pack.size, 15);
        assert!(config.pack.exclude_facedown);
        assert_eq!(config.deck.fallback_color, Color::Blue);
        assert_eq!(config.deck.deck_size, 40);
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("Failed to create a temp file");
        write!(file, r#"{{"deck": {{"landBaseline": 17}}}}"#).unwrap();
        let config = DraftConfig::load(file.path()).unwrap();
        assert_eq!(config.deck.land_baseline, 17);

        let mut bad = tempfile::NamedTempFile::new().expect("Failed to create a temp file");
        write!(bad, r#"{{"pack": {{"size": 0}}}}"#).unwrap();
        assert!(DraftConfig::load(bad.path()).is_err());
        assert!(DraftConfig::load("/nonexistent/cubedraft.json").is_err());
    }
}
