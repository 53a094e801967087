use std::fs;

use anyhow::{Context, Result};
use redact_core::{
    anonymize_with, parse_entities_json, EntityDetector, EntitySpan, OverlapPolicy,
    RuleBasedDetector,
};
use tracing::info;

use crate::cli::Cli;
use crate::config::RedactConfig;
use crate::document::{read_text, write_text};

/// Lê, anonimiza e grava um documento.
///
/// Nada é gravado se qualquer etapa falhar.
pub fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => RedactConfig::load(path)?,
        None => RedactConfig::default(),
    };
    let table = config.placeholder_table(cli.language);

    let text = read_text(&cli.input)
        .with_context(|| format!("falha ao ler {}", cli.input.display()))?;

    let entities: Vec<EntitySpan> = match &cli.entities {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("falha ao ler {}", path.display()))?;
            parse_entities_json(&json, &text)
                .with_context(|| format!("spans inválidos em {}", path.display()))?
        }
        None => {
            let detector = RuleBasedDetector::with_gazetteer(cli.language, config.gazetteer(cli.language));
            detector.detect(&text)
        }
    };

    let policy = if cli.strict_overlaps {
        OverlapPolicy::Strict
    } else {
        OverlapPolicy::Permissive
    };
    let redaction = anonymize_with(&text, &entities, &table, policy)
        .with_context(|| format!("não foi possível anonimizar {}", cli.input.display()))?;

    info!(
        language = %cli.language,
        entities = entities.len(),
        replaced = redaction.replaced,
        identities = redaction.assignment.len(),
        "documento anonimizado"
    );

    write_text(&cli.output, &redaction.text, cli.format)
        .with_context(|| format!("falha ao gravar {}", cli.output.display()))?;
    Ok(())
}
