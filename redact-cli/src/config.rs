//! Arquivo de configuração opcional (`--config`, TOML).
//!
//! ```toml
//! [placeholders]
//! person = "individual"
//!
//! [gazetteer]
//! persons = ["Zed Quill"]
//! locations = ["Springfield"]
//! ```
//!
//! Tudo é opcional: sem arquivo, valem a tabela e o gazetteer embutidos do
//! idioma. As entradas do gazetteer se somam às embutidas.

use std::fs;
use std::path::Path;

use redact_core::{EntityCategory, Gazetteer, Language, PlaceholderTable};
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RedactConfig {
    pub placeholders: PlaceholderWords,
    pub gazetteer: GazetteerConfig,
}

/// Palavras que substituem as do idioma, por categoria.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderWords {
    pub person: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GazetteerConfig {
    pub persons: Vec<String>,
    pub locations: Vec<String>,
}

impl RedactConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Tabela do idioma com as substituições configuradas aplicadas.
    pub fn placeholder_table(&self, language: Language) -> PlaceholderTable {
        let overrides = [
            (EntityCategory::Person, &self.placeholders.person),
            (EntityCategory::Date, &self.placeholders.date),
            (EntityCategory::Location, &self.placeholders.location),
        ];
        overrides
            .into_iter()
            .fold(PlaceholderTable::for_language(language), |table, (category, word)| {
                match word.as_deref().map(str::trim) {
                    Some(word) if !word.is_empty() => table.with_word(category, word),
                    _ => table,
                }
            })
    }

    /// Gazetteer embutido do idioma mais as entradas configuradas.
    pub fn gazetteer(&self, language: Language) -> Gazetteer {
        let mut gazetteer = Gazetteer::for_language(language);
        for name in &self.gazetteer.persons {
            gazetteer.add_person(name);
        }
        for name in &self.gazetteer.locations {
            gazetteer.add_location(name);
        }
        gazetteer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_uses_builtins() {
        let config = RedactConfig::from_toml("").unwrap();
        assert_eq!(config, RedactConfig::default());
        let table = config.placeholder_table(Language::Hebrew);
        assert_eq!(table.word(EntityCategory::Person), Some("אדם"));
    }

    #[test]
    fn test_placeholder_override() {
        let config = RedactConfig::from_toml("[placeholders]\nperson = \"individual\"\ndate = \"  \"").unwrap();
        let table = config.placeholder_table(Language::English);
        assert_eq!(table.word(EntityCategory::Person), Some("individual"));
        assert_eq!(table.word(EntityCategory::Date), Some("date"));
        assert_eq!(table.word(EntityCategory::Location), Some("location"));
    }

    #[test]
    fn test_gazetteer_extends_builtin() {
        let config = RedactConfig::from_toml("[gazetteer]\nlocations = [\"Springfield\"]").unwrap();
        let gazetteer = config.gazetteer(Language::English);
        let builtin = Gazetteer::for_language(Language::English);
        assert_eq!(gazetteer.locations().len(), builtin.locations().len() + 1);
        assert!(gazetteer.locations().iter().any(|l| l == &["springfield"]));
    }

    #[test]
    fn test_gazetteer_persons_reach_detector() {
        use redact_core::{anonymize, EntityDetector, RuleBasedDetector};

        let config = RedactConfig::from_toml("[gazetteer]\npersons = [\"Zed Quill\"]").unwrap();
        let gazetteer = config.gazetteer(Language::English);
        assert!(gazetteer.persons().iter().any(|p| p == &["zed", "quill"]));

        let detector = RuleBasedDetector::with_gazetteer(Language::English, gazetteer);
        let text = "Zed Quill called.";
        let spans = detector.detect(text);
        let table = config.placeholder_table(Language::English);
        assert_eq!(anonymize(text, &spans, &table).unwrap(), "person_1 called.");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(RedactConfig::from_toml("[placeholders]\norg = \"company\"").is_err());
        assert!(RedactConfig::from_toml("verbose = true").is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("redact.toml");
        fs::write(&path, "[gazetteer\n").unwrap();
        let err = RedactConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("redact.toml"));

        let missing = RedactConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
