//! # Anonimizador — Substituição de Entidades por Placeholders
//!
//! Recebe o texto original, os spans detectados e a tabela de placeholders do
//! idioma, e devolve o texto com cada entidade trocada por `<palavra>_<n>`.
//!
//! ## Algoritmo
//!
//! 1. **Validação**: todos os spans são conferidos antes de qualquer escrita.
//!    Um único span inválido rejeita o lote inteiro.
//! 2. **Filtro**: apenas categorias presentes na tabela seguem adiante.
//! 3. **Numeração**: percorrendo os spans da esquerda para a direita, cada
//!    *texto distinto* recebe o próximo ordinal (1, 2, 3...). Ocorrências
//!    repetidas reaproveitam o placeholder já atribuído. O contador é único
//!    por documento e a chave é só o texto; "John" e "john" são distintos.
//! 4. **Reescrita da direita para a esquerda**: os spans são aplicados em
//!    ordem decrescente de `start`. Cada substituição só altera o texto a
//!    partir do próprio `start`, então os offsets dos spans ainda pendentes
//!    continuam válidos.
//!
//! ## Exemplo
//!
//! ```rust
//! use redact_core::anonymizer::anonymize;
//! use redact_core::locale::{Language, PlaceholderTable};
//! use redact_core::tagger::{EntityCategory, EntitySpan};
//!
//! let text = "Alice met Bob. Alice left.";
//! let spans = [
//!     EntitySpan::new(0, 5, EntityCategory::Person),
//!     EntitySpan::new(10, 13, EntityCategory::Person),
//!     EntitySpan::new(15, 20, EntityCategory::Person),
//! ];
//! let table = PlaceholderTable::for_language(Language::English);
//!
//! let redacted = anonymize(text, &spans, &table).unwrap();
//! assert_eq!(redacted, "person_1 met person_2. person_1 left.");
//! ```
//!
//! ## Spans sobrepostos
//!
//! Com [`OverlapPolicy::Permissive`] (padrão) a ordem continua sendo apenas
//! `start` decrescente: um span mais à esquerda cujo `end` invade uma região
//! já reescrita corta o texto reescrito (com `end` limitado ao tamanho atual).
//! [`OverlapPolicy::Strict`] recusa esses lotes com
//! [`AnonymizeError::OverlappingSpans`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AnonymizeError;
use crate::locale::PlaceholderTable;
use crate::tagger::{EntityCategory, EntitySpan};

/// O que fazer com spans no escopo que se sobrepõem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Aplica tudo em ordem decrescente de `start`, sem resolver conflitos.
    #[default]
    Permissive,
    /// Falha com `OverlappingSpans` antes de reescrever qualquer coisa.
    Strict,
}

/// Um texto original e o placeholder que o substitui.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedPlaceholder {
    pub original: String,
    pub placeholder: String,
    /// Categoria da primeira ocorrência
    pub category: EntityCategory,
    pub occurrences: usize,
}

/// Texto → placeholder, em ordem de primeira ocorrência.
///
/// Vive apenas durante uma chamada de anonimização.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaceholderAssignment {
    entries: Vec<AssignedPlaceholder>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl PlaceholderAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retorna o placeholder de `original`, criando `<word>_<n>` na primeira vez.
    pub fn assign(&mut self, original: &str, category: EntityCategory, word: &str) -> String {
        if let Some(&i) = self.index.get(original) {
            let entry = &mut self.entries[i];
            entry.occurrences += 1;
            return entry.placeholder.clone();
        }

        let placeholder = format!("{}_{}", word, self.entries.len() + 1);
        self.index.insert(original.to_string(), self.entries.len());
        self.entries.push(AssignedPlaceholder {
            original: original.to_string(),
            placeholder: placeholder.clone(),
            category,
            occurrences: 1,
        });
        placeholder
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssignedPlaceholder> {
        self.entries.iter()
    }

    /// Número de entidades distintas
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resultado completo de uma anonimização.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redaction {
    pub text: String,
    pub assignment: PlaceholderAssignment,
    /// Quantos spans foram reescritos
    pub replaced: usize,
}

/// Anonimiza `text` com a política permissiva e devolve só o texto.
pub fn anonymize(
    text: &str,
    entities: &[EntitySpan],
    placeholders: &PlaceholderTable,
) -> Result<String, AnonymizeError> {
    anonymize_with(text, entities, placeholders, OverlapPolicy::Permissive).map(|r| r.text)
}

/// Anonimiza `text` e devolve também o mapeamento de placeholders.
pub fn anonymize_with(
    text: &str,
    entities: &[EntitySpan],
    placeholders: &PlaceholderTable,
    policy: OverlapPolicy,
) -> Result<Redaction, AnonymizeError> {
    let mut chars: Vec<char> = text.chars().collect();

    for span in entities {
        validate_span(span, chars.len())?;
    }

    // Ordenação estável: empates mantêm a ordem do detector
    let mut in_scope: Vec<(&EntitySpan, &str)> = entities
        .iter()
        .filter_map(|span| placeholders.word(span.category).map(|word| (span, word)))
        .collect();
    in_scope.sort_by_key(|(span, _)| span.start);

    if policy == OverlapPolicy::Strict {
        check_overlaps(&in_scope)?;
    }

    let mut assignment = PlaceholderAssignment::new();
    let mut replacements: Vec<(usize, usize, String)> = in_scope
        .iter()
        .map(|(span, word)| {
            let original: String = chars[span.start..span.end].iter().collect();
            let placeholder = assignment.assign(&original, span.category, word);
            (span.start, span.end, placeholder)
        })
        .collect();

    replacements.sort_by(|a, b| b.0.cmp(&a.0));

    for (start, end, placeholder) in &replacements {
        // Só spans sobrepostos podem apontar além do texto já reescrito
        let end = (*end).min(chars.len());
        let start = (*start).min(end);
        chars.splice(start..end, placeholder.chars());
    }

    debug!(
        spans = entities.len(),
        in_scope = replacements.len(),
        distinct = assignment.len(),
        "anonimização concluída"
    );

    Ok(Redaction {
        text: chars.into_iter().collect(),
        replaced: replacements.len(),
        assignment,
    })
}

fn validate_span(span: &EntitySpan, len: usize) -> Result<(), AnonymizeError> {
    if span.start > span.end || span.end > len {
        return Err(AnonymizeError::InvalidSpan {
            start: span.start as i64,
            end: span.end as i64,
            len,
        });
    }
    Ok(())
}

/// Dois spans conflitam se compartilham um caractere, ou se um deles é uma
/// inserção (vazio) em `other.start <= p < other.end`.
fn conflicts(a: &EntitySpan, b: &EntitySpan) -> bool {
    match (a.is_empty(), b.is_empty()) {
        (false, false) => a.start < b.end && b.start < a.end,
        (true, false) => b.start <= a.start && a.start < b.end,
        (false, true) => a.start <= b.start && b.start < a.end,
        (true, true) => false,
    }
}

/// `spans` deve estar ordenado por `start`.
fn check_overlaps(spans: &[(&EntitySpan, &str)]) -> Result<(), AnonymizeError> {
    for (i, (first, _)) in spans.iter().enumerate() {
        for (second, _) in &spans[i + 1..] {
            if second.start > first.end {
                break;
            }
            if conflicts(first, second) {
                return Err(AnonymizeError::OverlappingSpans {
                    first_start: first.start,
                    first_end: first.end,
                    second_start: second.start,
                    second_end: second.end,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Language;
    use proptest::prelude::*;

    fn person(start: usize, end: usize) -> EntitySpan {
        EntitySpan::new(start, end, EntityCategory::Person)
    }

    fn english() -> PlaceholderTable {
        PlaceholderTable::for_language(Language::English)
    }

    #[test]
    fn test_end_to_end_example() {
        let spans = [person(0, 5), person(10, 13), person(15, 20)];
        let out = anonymize("Alice met Bob. Alice left.", &spans, &english()).unwrap();
        assert_eq!(out, "person_1 met person_2. person_1 left.");
    }

    #[test]
    fn test_empty_entities_is_identity() {
        let text = "Nothing to see here, שלום.";
        assert_eq!(anonymize(text, &[], &english()).unwrap(), text);
        assert_eq!(anonymize("", &[], &english()).unwrap(), "");
    }

    #[test]
    fn test_zero_length_span_inserts() {
        let out = anonymize("AB", &[person(1, 1)], &english()).unwrap();
        assert_eq!(out, "Aperson_1B");
    }

    #[test]
    fn test_reversed_span_is_rejected() {
        let err = anonymize("hello", &[person(3, 1)], &english()).unwrap_err();
        assert_eq!(err, AnonymizeError::InvalidSpan { start: 3, end: 1, len: 5 });
    }

    #[test]
    fn test_span_past_end_is_rejected() {
        let err = anonymize("hello", &[person(2, 6)], &english()).unwrap_err();
        assert!(matches!(err, AnonymizeError::InvalidSpan { end: 6, .. }));
    }

    #[test]
    fn test_invalid_out_of_scope_span_still_rejects_batch() {
        let spans = [person(0, 1), EntitySpan::new(4, 99, EntityCategory::Organization)];
        assert!(anonymize("hello", &spans, &english()).is_err());
    }

    #[test]
    fn test_out_of_scope_category_is_untouched() {
        let spans = [
            person(0, 5),
            EntitySpan::new(12, 16, EntityCategory::Organization),
        ];
        let out = anonymize("Alice likes Acme.", &spans, &english()).unwrap();
        assert_eq!(out, "person_1 likes Acme.");
    }

    #[test]
    fn test_case_variants_are_distinct() {
        let spans = [person(0, 4), person(9, 13)];
        let out = anonymize("John and john", &spans, &english()).unwrap();
        assert_eq!(out, "person_1 and person_2");
    }

    #[test]
    fn test_counter_is_shared_across_categories() {
        let text = "Alice was in Paris on 2020-01-31.";
        let spans = [
            person(0, 5),
            EntitySpan::new(13, 18, EntityCategory::Location),
            EntitySpan::new(22, 32, EntityCategory::Date),
        ];
        let out = anonymize(text, &spans, &english()).unwrap();
        assert_eq!(out, "person_1 was in location_2 on date_3.");
    }

    #[test]
    fn test_numbering_follows_text_order_not_input_order() {
        let spans = [person(10, 13), person(0, 5)];
        let out = anonymize("Alice met Bob.", &spans, &english()).unwrap();
        assert_eq!(out, "person_1 met person_2.");
    }

    #[test]
    fn test_hebrew_text_uses_char_offsets() {
        let text = "דוד פגש את שרה";
        let table = PlaceholderTable::for_language(Language::Hebrew);
        let spans = [person(0, 3), person(11, 14)];
        let out = anonymize(text, &spans, &table).unwrap();
        assert_eq!(out, "אדם_1 פגש את אדם_2");
    }

    #[test]
    fn test_overlap_permissive_follows_descending_start() {
        let out = anonymize("abcdef", &[person(0, 4), person(2, 6)], &english()).unwrap();
        assert_eq!(out, "person_1rson_2");
    }

    #[test]
    fn test_overlap_strict_is_rejected() {
        let err = anonymize_with(
            "abcdef",
            &[person(2, 6), person(0, 4)],
            &english(),
            OverlapPolicy::Strict,
        )
        .unwrap_err();
        assert_eq!(
            err,
            AnonymizeError::OverlappingSpans {
                first_start: 0,
                first_end: 4,
                second_start: 2,
                second_end: 6,
            }
        );
    }

    #[test]
    fn test_strict_accepts_adjacent_spans() {
        let spans = [person(0, 2), person(2, 4), person(4, 4)];
        let redaction = anonymize_with("abcd", &spans, &english(), OverlapPolicy::Strict).unwrap();
        assert_eq!(redaction.text, "person_1person_2person_3");
    }

    #[test]
    fn test_strict_rejects_insertion_at_span_start() {
        let spans = [person(1, 1), person(1, 3)];
        let result = anonymize_with("abcd", &spans, &english(), OverlapPolicy::Strict);
        assert!(matches!(result, Err(AnonymizeError::OverlappingSpans { .. })));
    }

    #[test]
    fn test_strict_ignores_overlaps_out_of_scope() {
        let spans = [
            person(0, 5),
            EntitySpan::new(0, 9, EntityCategory::Organization),
        ];
        let result = anonymize_with("Alice Inc", &spans, &english(), OverlapPolicy::Strict);
        assert_eq!(result.unwrap().text, "person_1 Inc");
    }

    #[test]
    fn test_redaction_report() {
        let spans = [person(0, 5), person(10, 13), person(15, 20)];
        let redaction = anonymize_with(
            "Alice met Bob. Alice left.",
            &spans,
            &english(),
            OverlapPolicy::Permissive,
        )
        .unwrap();

        assert_eq!(redaction.replaced, 3);
        assert_eq!(redaction.assignment.len(), 2);
        let first = redaction.assignment.iter().next().unwrap();
        assert_eq!(first.original, "Alice");
        assert_eq!(first.placeholder, "person_1");
        assert_eq!(first.occurrences, 2);
    }

    /// Spans ordenados, sem sobreposição e sem `start` repetido.
    fn disjoint_spans(len: usize, raw: Vec<(usize, usize)>) -> Vec<EntitySpan> {
        let mut bounds: Vec<(usize, usize)> = raw
            .into_iter()
            .map(|(a, b)| {
                let (a, b) = (a.min(len), b.min(len));
                (a.min(b), a.max(b))
            })
            .collect();
        bounds.sort();

        let mut kept: Vec<EntitySpan> = Vec::new();
        for (start, end) in bounds {
            let ok = match kept.last() {
                Some(prev) => start >= prev.end && start > prev.start,
                None => true,
            };
            if ok {
                kept.push(person(start, end));
            }
        }
        kept
    }

    /// Reconstrução independente, da esquerda para a direita.
    fn left_to_right(chars: &[char], spans: &[EntitySpan]) -> String {
        let mut seen: HashMap<String, String> = HashMap::new();
        let mut out = String::new();
        let mut cursor = 0;
        for span in spans {
            out.extend(&chars[cursor..span.start]);
            let original: String = chars[span.start..span.end].iter().collect();
            let next = format!("person_{}", seen.len() + 1);
            out.push_str(seen.entry(original).or_insert(next));
            cursor = span.end;
        }
        out.extend(&chars[cursor..]);
        out
    }

    proptest! {
        #[test]
        fn prop_text_outside_spans_is_preserved(
            text in "[a-cA-Cא-ג ]{0,40}",
            raw in prop::collection::vec((0usize..=40, 0usize..=40), 0..6),
        ) {
            let chars: Vec<char> = text.chars().collect();
            let spans = disjoint_spans(chars.len(), raw);

            let out = anonymize(&text, &spans, &english()).unwrap();
            prop_assert_eq!(out, left_to_right(&chars, &spans));
        }

        #[test]
        fn prop_repeated_text_gets_same_placeholder(word in "[a-z]{1,8}", gap in " [0-9]{0,5} ") {
            let text = format!("{word}{gap}{word}");
            let n = word.chars().count();
            let second = n + gap.chars().count();
            let spans = [person(0, n), person(second, second + n)];

            let out = anonymize(&text, &spans, &english()).unwrap();
            prop_assert_eq!(out, format!("person_1{gap}person_1"));
        }
    }
}
