//! # Tokenizador
//!
//! Divide o texto bruto em tokens (palavras e pontuação) usando as fronteiras
//! de palavra do Unicode (UAX #29, via `unicode-segmentation`). Espaços em
//! branco são descartados; cada token preserva sua posição original em bytes.
//!
//! As regras do UAX #29 já tratam os casos que importam para hebraico:
//! abreviações com gershayim (`ד"ר`) e geresh (`גב'`) ficam num único token.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use redact_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("Dr. Smith, 2021.");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, ["Dr", ".", "Smith", ",", "2021", "."]);
//! ```

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Um token extraído do texto original.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "Alice", ",", "2021").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

impl Token {
    /// `true` se o token contém ao menos uma letra ou dígito.
    pub fn is_word(&self) -> bool {
        self.text.chars().any(char::is_alphanumeric)
    }

    /// `true` se o primeiro caractere é maiúsculo.
    ///
    /// Escritas sem caixa (hebraico) nunca são capitalizadas.
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().map(char::is_uppercase).unwrap_or(false)
    }

    /// Forma normalizada usada nas buscas em gazetteers.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Tokeniza um texto, descartando espaços em branco.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_word_bound_indices()
        .filter(|(_, segment)| !segment.chars().all(char::is_whitespace))
        .enumerate()
        .map(|(index, (start, segment))| Token {
            text: segment.to_string(),
            start,
            end: start + segment.len(),
            index,
        })
        .collect()
}
