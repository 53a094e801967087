//! Linha de comando `redact`: anonimiza um documento e grava o resultado.

mod app;
mod cli;
mod config;
mod document;
mod error;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs vão para stderr; stdout fica só com a confirmação
    let filter = EnvFilter::try_new(&cli.log_level)
        .with_context(|| format!("filtro de log inválido: '{}'", cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    app::run(&cli)?;
    println!("Arquivo anonimizado criado em: {}", cli.output.display());
    Ok(())
}
