//! # Idiomas e Tabelas de Placeholders
//!
//! Cada idioma suportado define a palavra usada nos placeholders de cada
//! categoria (`person_1`, `אדם_1`, ...). A tabela também decide quais
//! categorias estão **no escopo**: uma categoria ausente da tabela nunca é
//! substituída.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tagger::EntityCategory;

/// Idiomas suportados pelo detector e pelas tabelas de placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Hebrew,
}

impl Language {
    /// Nome usado na linha de comando
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hebrew => "hebrew",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("idioma não suportado: '{0}' (use 'english' ou 'hebrew')")]
    UnsupportedLanguage(String),
}

impl FromStr for Language {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" => Ok(Language::English),
            "hebrew" => Ok(Language::Hebrew),
            _ => Err(LocaleError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Mapeamento categoria → palavra do placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaceholderTable {
    words: HashMap<EntityCategory, String>,
}

impl PlaceholderTable {
    /// Tabela vazia: nenhuma categoria no escopo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabela padrão de um idioma (pessoa, data e local).
    pub fn for_language(language: Language) -> Self {
        let (person, date, location) = match language {
            Language::English => ("person", "date", "location"),
            Language::Hebrew => ("אדם", "תאריך", "מיקום"),
        };
        Self::new()
            .with_word(EntityCategory::Person, person)
            .with_word(EntityCategory::Date, date)
            .with_word(EntityCategory::Location, location)
    }

    /// Define (ou substitui) a palavra de uma categoria.
    pub fn with_word(mut self, category: EntityCategory, word: impl Into<String>) -> Self {
        self.words.insert(category, word.into());
        self
    }

    pub fn word(&self, category: EntityCategory) -> Option<&str> {
        self.words.get(&category).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!("english".parse::<Language>(), Ok(Language::English));
        assert_eq!("Hebrew".parse::<Language>(), Ok(Language::Hebrew));
        assert_eq!(
            "klingon".parse::<Language>(),
            Err(LocaleError::UnsupportedLanguage("klingon".to_string()))
        );
    }

    #[test]
    fn test_default_tables() {
        let en = PlaceholderTable::for_language(Language::English);
        assert_eq!(en.word(EntityCategory::Person), Some("person"));
        assert_eq!(en.word(EntityCategory::Location), Some("location"));
        assert_eq!(en.word(EntityCategory::Organization), None);

        let he = PlaceholderTable::for_language(Language::Hebrew);
        assert_eq!(he.word(EntityCategory::Date), Some("תאריך"));
        assert_eq!(he.len(), 3);
    }

    #[test]
    fn test_override_word() {
        let table = PlaceholderTable::for_language(Language::English)
            .with_word(EntityCategory::Person, "individual");
        assert_eq!(table.word(EntityCategory::Person), Some("individual"));
    }
}
