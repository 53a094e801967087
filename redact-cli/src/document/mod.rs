//! # Adaptador de Documentos
//!
//! Leitura de `.txt`/`.docx` e gravação em `.txt`/`.docx`/`.pdf`. Nenhuma
//! lógica de anonimização vive aqui; é só serialização.
//!
//! Cada formato de saída é um [`Serializer`] que produz os bytes completos em
//! memória. [`write_text`] grava esses bytes num arquivo temporário no mesmo
//! diretório do destino e o renomeia ao final: ou o arquivo final existe
//! inteiro, ou não existe.

mod docx;
mod pdf;
mod plain;

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::DocumentError;

pub use self::docx::ParagraphDocument;
pub use self::pdf::PagedDocument;
pub use self::plain::PlainText;

/// Formatos de entrada, decididos pela extensão do arquivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Txt,
    Docx,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "txt" => Ok(InputFormat::Txt),
            "docx" => Ok(InputFormat::Docx),
            _ => Err(DocumentError::UnsupportedInputFormat(path.display().to_string())),
        }
    }
}

/// Formatos de saída aceitos pela linha de comando.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Txt,
    Docx,
    Pdf,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn serializer(&self) -> Box<dyn Serializer> {
        match self {
            OutputFormat::Txt => Box::new(PlainText),
            OutputFormat::Docx => Box::new(ParagraphDocument),
            OutputFormat::Pdf => Box::new(PagedDocument::default()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" => Ok(OutputFormat::Txt),
            "docx" => Ok(OutputFormat::Docx),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(DocumentError::UnsupportedOutputFormat(s.to_string())),
        }
    }
}

/// Converte o texto final nos bytes de um formato de arquivo.
pub trait Serializer {
    fn render(&self, text: &str) -> Result<Vec<u8>, DocumentError>;
}

/// Lê o texto de um arquivo `.txt` ou `.docx`.
///
/// Quebras de linha `\r\n` e `\r` são normalizadas para `\n`, então os
/// offsets dos spans sempre se referem ao texto normalizado.
pub fn read_text(path: &Path) -> Result<String, DocumentError> {
    let format = InputFormat::from_path(path)?;
    let bytes = fs::read(path).map_err(DocumentError::io(path))?;

    let text = match format {
        InputFormat::Txt => {
            String::from_utf8(bytes).map_err(|_| DocumentError::NotUtf8 { path: path.to_path_buf() })?
        }
        InputFormat::Docx => docx::read(&bytes)?,
    };

    debug!(path = %path.display(), ?format, chars = text.chars().count(), "documento lido");
    Ok(normalize_newlines(&text))
}

/// Grava `text` em `path` no formato pedido, de forma atômica.
pub fn write_text(path: &Path, text: &str, format: OutputFormat) -> Result<(), DocumentError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if !ext.eq_ignore_ascii_case(format.name()) {
        warn!(path = %path.display(), %format, "extensão do arquivo de saída difere do formato");
    }

    let bytes = format.serializer().render(text)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(DocumentError::io(dir))?;
    tmp.write_all(&bytes).map_err(DocumentError::io(path))?;
    tmp.persist(path).map_err(|e| DocumentError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    debug!(path = %path.display(), %format, bytes = bytes.len(), "documento gravado");
    Ok(())
}

fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
