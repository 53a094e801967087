use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Falhas de leitura/gravação de documentos.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("formato de entrada não suportado: '{0}' (use .txt ou .docx)")]
    UnsupportedInputFormat(String),

    #[error("formato de saída não suportado: '{0}' (use txt, docx ou pdf)")]
    UnsupportedOutputFormat(String),

    #[error("erro de E/S em {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("arquivo .txt não está em UTF-8: {}", path.display())]
    NotUtf8 { path: PathBuf },

    #[error("falha no formato .docx")]
    Docx(#[source] BoxError),

    #[error("falha ao gerar .pdf")]
    Pdf(#[source] BoxError),

    #[error(
        "o .pdf só comporta texto Latin-1: {count} caractere(s) fora dele, a começar por '{first}' (use txt ou docx)"
    )]
    PdfUnencodable { count: usize, first: char },
}

impl DocumentError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| DocumentError::Io { path, source }
    }
}

/// Falhas ao carregar o arquivo de configuração.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("não foi possível ler {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuração inválida em {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
