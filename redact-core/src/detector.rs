//! # Detectores de Entidades
//!
//! O anonimizador não sabe de onde vêm os spans. Esta camada define o ponto de
//! extensão ([`EntityDetector`]) e duas fontes:
//!
//! - [`RuleBasedDetector`]: detector embutido (tokenizador + [`RuleEngine`]).
//!   É construído uma vez por idioma, imutável depois disso, e passado por
//!   referência para cada documento.
//! - [`parse_entities_json`]: spans produzidos fora do processo (por exemplo
//!   por um modelo NER pré-treinado), no formato `{start, end, label}`.
//!
//! A saída de qualquer detector é tratada como entrada não confiável: o
//! anonimizador valida todos os spans antes de reescrever o texto.

use serde::Deserialize;
use tracing::debug;

use crate::error::AnonymizeError;
use crate::gazetteer::Gazetteer;
use crate::locale::Language;
use crate::rule_based::RuleEngine;
use crate::tagger::{tokens_to_spans, EntityCategory, EntitySpan, Tag, TaggedToken};
use crate::tokenizer::tokenize;

/// Qualquer fonte de spans `[start, end)` em offsets de caractere.
pub trait EntityDetector {
    /// Idioma para o qual o detector foi construído
    fn language(&self) -> Language;

    /// Detecta entidades em `text`, na ordem em que aparecem.
    fn detect(&self, text: &str) -> Vec<EntitySpan>;
}

/// Detector embutido baseado em regras e gazetteers.
pub struct RuleBasedDetector {
    language: Language,
    engine: RuleEngine,
}

impl RuleBasedDetector {
    /// Detector com o gazetteer embutido do idioma.
    pub fn for_language(language: Language) -> Self {
        Self::with_gazetteer(language, Gazetteer::for_language(language))
    }

    pub fn with_gazetteer(language: Language, gazetteer: Gazetteer) -> Self {
        Self {
            language,
            engine: RuleEngine::with_gazetteer(language, gazetteer),
        }
    }

    /// Tokens do texto com as tags atribuídas pelas regras.
    pub fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let tokens = tokenize(text);
        let matches = self.engine.apply(text, &tokens);

        tokens
            .into_iter()
            .zip(matches)
            .map(|(token, m)| match m {
                Some(m) => TaggedToken { token, tag: m.tag, skip: m.skip },
                None => TaggedToken { token, tag: Tag::Outside, skip: 0 },
            })
            .collect()
    }
}

impl EntityDetector for RuleBasedDetector {
    fn language(&self) -> Language {
        self.language
    }

    fn detect(&self, text: &str) -> Vec<EntitySpan> {
        let tagged = self.tag(text);
        let spans = tokens_to_spans(&tagged, text);
        debug!(
            language = %self.language,
            tokens = tagged.len(),
            entities = spans.len(),
            "detecção concluída"
        );
        spans
    }
}

#[derive(Deserialize)]
struct RawSpan {
    start: i64,
    end: i64,
    label: String,
}

/// Aceita tanto uma lista de spans quanto um documento com campo `ents`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntities {
    List(Vec<RawSpan>),
    Document { ents: Vec<RawSpan> },
}

/// Lê spans de um detector externo.
///
/// Formatos aceitos (offsets em caracteres de `text`):
///
/// ```json
/// [{"start": 0, "end": 5, "label": "PERSON"}]
/// {"text": "...", "ents": [{"start": 0, "end": 5, "label": "PERSON"}]}
/// ```
///
/// Offsets negativos falham com [`AnonymizeError::InvalidSpan`]; os demais
/// limites são conferidos pelo anonimizador.
pub fn parse_entities_json(json: &str, text: &str) -> Result<Vec<EntitySpan>, AnonymizeError> {
    let raw: RawEntities =
        serde_json::from_str(json).map_err(|e| AnonymizeError::MalformedEntities(e.to_string()))?;
    let raw = match raw {
        RawEntities::List(spans) | RawEntities::Document { ents: spans } => spans,
    };

    raw.into_iter()
        .map(|span| {
            if span.start < 0 || span.end < 0 {
                return Err(AnonymizeError::InvalidSpan {
                    start: span.start,
                    end: span.end,
                    len: text.chars().count(),
                });
            }
            Ok(EntitySpan::new(
                span.start as usize,
                span.end as usize,
                EntityCategory::from_label(&span.label),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymizer::anonymize;
    use crate::locale::PlaceholderTable;

    #[test]
    fn test_detect_english_document() {
        let detector = RuleBasedDetector::for_language(Language::English);
        let text = "Alice Smith visited London on 3 March 2021. Alice loved London.";
        let spans = detector.detect(text);

        let categories: Vec<EntityCategory> = spans.iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            [
                EntityCategory::Person,
                EntityCategory::Location,
                EntityCategory::Date,
                EntityCategory::Person,
                EntityCategory::Location,
            ]
        );

        let table = PlaceholderTable::for_language(Language::English);
        assert_eq!(
            anonymize(text, &spans, &table).unwrap(),
            "person_1 visited location_2 on date_3. person_4 loved location_2."
        );
    }

    #[test]
    fn test_detect_hebrew_document() {
        let detector = RuleBasedDetector::for_language(Language::Hebrew);
        let text = "דוד גר בתל אביב";
        let spans = detector.detect(text);
        assert_eq!(
            spans,
            [
                EntitySpan::new(0, 3, EntityCategory::Person),
                EntitySpan::new(8, 15, EntityCategory::Location),
            ]
        );

        let table = PlaceholderTable::for_language(Language::Hebrew);
        assert_eq!(anonymize(text, &spans, &table).unwrap(), "אדם_1 גר במיקום_2");
    }

    #[test]
    fn test_detect_empty_text() {
        let detector = RuleBasedDetector::for_language(Language::English);
        assert!(detector.detect("").is_empty());
        assert_eq!(detector.language(), Language::English);
    }

    #[test]
    fn test_custom_gazetteer() {
        let mut gazetteer = Gazetteer::new();
        gazetteer.add_location("Springfield");
        let detector = RuleBasedDetector::with_gazetteer(Language::English, gazetteer);
        let spans = detector.detect("Welcome to Springfield");
        assert_eq!(spans, [EntitySpan::new(11, 22, EntityCategory::Location)]);
    }

    #[test]
    fn test_parse_entities_list_and_document() {
        let text = "Alice met Bob.";
        let list = r#"[{"start": 0, "end": 5, "label": "PERSON"}, {"start": 10, "end": 13, "label": "GPE"}]"#;
        let spans = parse_entities_json(list, text).unwrap();
        assert_eq!(spans[1], EntitySpan::new(10, 13, EntityCategory::Location));

        let doc = r#"{"text": "Alice met Bob.", "ents": [{"start": 0, "end": 5, "label": "ORG"}]}"#;
        let spans = parse_entities_json(doc, text).unwrap();
        assert_eq!(spans, [EntitySpan::new(0, 5, EntityCategory::Organization)]);
    }

    #[test]
    fn test_parse_negative_offset_is_invalid_span() {
        let err = parse_entities_json(r#"[{"start": -1, "end": 2, "label": "PERSON"}]"#, "hello")
            .unwrap_err();
        assert_eq!(err, AnonymizeError::InvalidSpan { start: -1, end: 2, len: 5 });
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_entities_json("{not json", "").unwrap_err();
        assert!(matches!(err, AnonymizeError::MalformedEntities(_)));
    }
}
