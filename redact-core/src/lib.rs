//! # redact-core — Anonimização de Entidades Nomeadas
//!
//! Este crate troca nomes de pessoas, datas e locais de um documento curto por
//! placeholders consistentes (`person_1`, `date_2`, `אדם_3`...), sem corromper
//! o restante do texto.
//!
//! ## Arquitetura
//!
//! 1.  **Entrada**: texto bruto (String).
//! 2.  **Detecção** ([`detector`]): uma fonte de spans `(start, end, categoria)`.
//!     O detector embutido combina [`tokenizer`], [`rule_based`] e [`gazetteer`];
//!     spans externos podem ser lidos de JSON.
//! 3.  **Anonimização** ([`anonymizer`]): valida os spans, numera cada texto
//!     distinto e reescreve o texto da direita para a esquerda.
//! 4.  **Saída**: texto anonimizado, mais o mapeamento de placeholders.
//!
//! As palavras dos placeholders vêm de [`locale::PlaceholderTable`], escolhida
//! pelo idioma do documento.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use redact_core::{anonymize, EntityDetector, Language, PlaceholderTable, RuleBasedDetector};
//!
//! // 1. Detector e tabela são construídos uma vez por idioma
//! let detector = RuleBasedDetector::for_language(Language::English);
//! let table = PlaceholderTable::for_language(Language::English);
//!
//! // 2. Detecta e anonimiza
//! let text = "Alice flew to Paris.";
//! let spans = detector.detect(text);
//! let redacted = anonymize(text, &spans, &table).unwrap();
//!
//! assert_eq!(redacted, "person_1 flew to location_2.");
//! ```

pub mod anonymizer;
pub mod detector;
pub mod error;
pub mod gazetteer;
pub mod locale;
pub mod rule_based;
pub mod tagger;
pub mod tokenizer;

pub use anonymizer::{anonymize, anonymize_with, OverlapPolicy, PlaceholderAssignment, Redaction};
pub use detector::{parse_entities_json, EntityDetector, RuleBasedDetector};
pub use error::AnonymizeError;
pub use gazetteer::Gazetteer;
pub use locale::{Language, LocaleError, PlaceholderTable};
pub use tagger::{EntityCategory, EntitySpan, Tag};
