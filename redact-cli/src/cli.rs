use std::path::PathBuf;

use clap::Parser;
use redact_core::Language;

use crate::document::OutputFormat;

/// Anonimiza um documento .txt/.docx trocando pessoas, datas e locais por
/// placeholders numerados.
#[derive(Debug, Parser)]
#[command(name = "redact", version, about)]
pub struct Cli {
    /// Documento de entrada (.txt ou .docx)
    pub input: PathBuf,

    /// Caminho do arquivo anonimizado
    pub output: PathBuf,

    /// Idioma do documento: english ou hebrew
    pub language: Language,

    /// Formato de saída: txt, docx ou pdf
    pub format: OutputFormat,

    /// Configuração TOML com palavras de placeholder e gazetteer extra
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Spans JSON de um detector externo, no lugar do detector embutido
    #[arg(short, long, value_name = "FILE")]
    pub entities: Option<PathBuf>,

    /// Rejeita spans sobrepostos em vez de aplicá-los em sequência
    #[arg(long)]
    pub strict_overlaps: bool,

    /// Filtro de log (ex.: warn, info, redact_core=debug)
    #[arg(short, long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}
