use thiserror::Error;

/// Falhas do anonimizador.
///
/// Nenhuma delas é recuperável localmente: um lote com qualquer span inválido
/// é rejeitado inteiro, nunca anonimizado pela metade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnonymizeError {
    /// Span fora dos limites do texto ou com `start > end`.
    #[error("span inválido [{start}, {end}) para um texto de {len} caracteres")]
    InvalidSpan { start: i64, end: i64, len: usize },

    /// Dois spans no escopo se sobrepõem (apenas com `OverlapPolicy::Strict`).
    #[error("spans sobrepostos: [{first_start}, {first_end}) e [{second_start}, {second_end})")]
    OverlappingSpans {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    /// JSON de entidades externas malformado.
    #[error("entidades externas inválidas: {0}")]
    MalformedEntities(String),
}
