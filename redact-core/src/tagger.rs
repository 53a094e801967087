//! # Esquema de Tags BIO e Tipos de Entidade
//!
//! Define as categorias de entidade que o anonimizador conhece e o esquema
//! **BIO** (Beginning-Inside-Outside) usado pelo detector de regras para
//! rotular tokens antes de agrupá-los em spans.
//!
//! ## Categorias de Entidades
//!
//! | Categoria      | Rótulos aceitos           | Exemplos                     |
//! |----------------|---------------------------|------------------------------|
//! | `Person`       | PERSON, PER               | Alice Smith, דוד כהן         |
//! | `Date`         | DATE                      | 3 March 2021, 12/03/2020     |
//! | `Location`     | GPE, LOC, LOCATION        | London, ירושלים              |
//! | `Organization` | ORG                       | Acme Inc                     |
//! | `Misc`         | (qualquer outro rótulo)   | NORP, CARDINAL, ...          |
//!
//! Apenas categorias presentes na [`PlaceholderTable`](crate::locale::PlaceholderTable)
//! são substituídas; as demais passam intactas.
//!
//! ## Offsets
//!
//! [`EntitySpan`] usa **índices de caractere** (Unicode scalar values), não de byte.
//! O tokenizador trabalha em bytes; a conversão acontece em [`tokens_to_spans`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::tokenizer::Token;

/// Categorias de entidade reconhecidas pelo sistema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityCategory {
    /// **Pessoa**: nomes de pessoas reais ou fictícias.
    Person,
    /// **Data**: datas absolutas ("3 March 2021", "2020-01-31").
    Date,
    /// **Localização**: países, cidades, regiões.
    Location,
    /// **Organização**: empresas e instituições. Fora do escopo das tabelas padrão.
    Organization,
    /// **Miscelânea**: qualquer rótulo que o detector emitir e não reconhecemos.
    Misc,
}

impl EntityCategory {
    /// Nome canônico da categoria (para logs e serialização)
    pub fn name(&self) -> &'static str {
        match self {
            EntityCategory::Person => "PERSON",
            EntityCategory::Date => "DATE",
            EntityCategory::Location => "LOCATION",
            EntityCategory::Organization => "ORG",
            EntityCategory::Misc => "MISC",
        }
    }

    /// Converte um rótulo de detector em categoria.
    ///
    /// Aceita os nomes dos esquemas mais comuns (PER/LOC do CoNLL, PERSON/GPE
    /// do OntoNotes). Rótulos desconhecidos viram [`EntityCategory::Misc`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "PERSON" | "PER" => EntityCategory::Person,
            "DATE" => EntityCategory::Date,
            "GPE" | "LOC" | "LOCATION" => EntityCategory::Location,
            "ORG" | "ORGANIZATION" => EntityCategory::Organization,
            _ => EntityCategory::Misc,
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl From<String> for EntityCategory {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<EntityCategory> for String {
    fn from(category: EntityCategory) -> Self {
        category.name().to_string()
    }
}

/// Tag BIO aplicada a um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    /// **Begin**: primeiro token de uma entidade. Ex: **Alice** (B-PERSON) Smith.
    Begin(EntityCategory),
    /// **Inside**: continuação da entidade. Ex: Alice **Smith** (I-PERSON).
    Inside(EntityCategory),
    /// **Outside**: o token não faz parte de nenhuma entidade.
    Outside,
}

impl Tag {
    /// Representação textual da tag (ex: "B-PERSON", "I-DATE", "O")
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(cat) => format!("B-{}", cat.name()),
            Tag::Inside(cat) => format!("I-{}", cat.name()),
            Tag::Outside => "O".to_string(),
        }
    }

    /// Retorna a categoria desta tag (se for B- ou I-)
    pub fn category(&self) -> Option<EntityCategory> {
        match self {
            Tag::Begin(c) | Tag::Inside(c) => Some(*c),
            Tag::Outside => None,
        }
    }

    /// Verifica se a transição tag_prev → self é válida no esquema BIO
    ///
    /// Regras:
    /// - `I-X` só pode seguir `B-X` ou `I-X` (mesma categoria)
    /// - `B-X` e `O` podem seguir qualquer tag
    pub fn is_valid_transition(prev: &Tag, next: &Tag) -> bool {
        match next {
            Tag::Inside(cat) => match prev {
                Tag::Begin(prev_cat) | Tag::Inside(prev_cat) => prev_cat == cat,
                _ => false,
            },
            _ => true,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Um token com sua tag BIO.
///
/// `skip` é o número de bytes no início do token que não pertencem à entidade
/// (o proclítico hebraico em "בירושלים", por exemplo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: Token,
    pub tag: Tag,
    #[serde(default)]
    pub skip: usize,
}

/// Uma entidade detectada: intervalo semiaberto `[start, end)` em caracteres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Índice do primeiro caractere (inclusivo)
    pub start: usize,
    /// Índice do caractere final (exclusivo)
    pub end: usize,
    /// Categoria atribuída pelo detector
    #[serde(rename = "label")]
    pub category: EntityCategory,
}

impl EntitySpan {
    pub fn new(start: usize, end: usize, category: EntityCategory) -> Self {
        Self { start, end, category }
    }

    /// Número de caracteres cobertos (0 para spans de inserção)
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Converte uma sequência de tokens classificados (BIO) em spans de entidades.
///
/// Máquina de estados do esquema BIO:
/// - Inicia uma nova entidade ao encontrar `B-XXX`.
/// - Continua enquanto encontrar `I-XXX` da **mesma** categoria.
/// - Finaliza ao encontrar `O`, `B-YYY` ou `I-YYY` de outra categoria.
///
/// Os offsets de byte dos tokens são convertidos em offsets de caractere de
/// `original_text`.
///
/// # Exemplo
/// `[B-PERSON, I-PERSON, O, B-LOCATION]` -> `[EntitySpan(PERSON), EntitySpan(LOCATION)]`
pub fn tokens_to_spans(tagged: &[TaggedToken], original_text: &str) -> Vec<EntitySpan> {
    let offsets = CharOffsets::new(original_text);
    let mut spans = Vec::new();
    let mut i = 0;

    while i < tagged.len() {
        if let Tag::Begin(cat) = tagged[i].tag {
            let start_byte = tagged[i].token.start + tagged[i].skip;
            let mut end_byte = tagged[i].token.end;

            // Acumula tokens I-XXX consecutivos da mesma categoria
            let mut j = i + 1;
            while j < tagged.len()
                && matches!(tagged[j].tag, Tag::Inside(_))
                && Tag::is_valid_transition(&tagged[j - 1].tag, &tagged[j].tag)
            {
                end_byte = tagged[j].token.end;
                j += 1;
            }

            spans.push(EntitySpan::new(
                offsets.char_index(start_byte),
                offsets.char_index(end_byte),
                cat,
            ));
            i = j;
        } else {
            i += 1;
        }
    }

    spans
}

/// Tabela byte → caractere para um texto.
struct CharOffsets {
    byte_starts: Vec<usize>,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        let mut byte_starts: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        byte_starts.push(text.len());
        Self { byte_starts }
    }

    /// Índice de caractere do byte `byte` (que deve estar numa fronteira de caractere).
    fn char_index(&self, byte: usize) -> usize {
        match self.byte_starts.binary_search(&byte) {
            Ok(idx) | Err(idx) => idx,
        }
    }
}
