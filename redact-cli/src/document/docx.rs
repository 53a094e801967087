//! Documentos `.docx`: uma sequência ordenada de parágrafos.
//!
//! Na leitura, os parágrafos do corpo são unidos com `\n` (tabelas, cabeçalhos
//! e rodapés ficam de fora). Na gravação, cada linha vira um parágrafo.

use std::io::Cursor;

use docx_rs::{read_docx, DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild};

use crate::error::DocumentError;

use super::Serializer;

/// Um parágrafo `.docx` por linha do texto.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphDocument;

impl Serializer for ParagraphDocument {
    fn render(&self, text: &str) -> Result<Vec<u8>, DocumentError> {
        let docx = text.split('\n').fold(Docx::new(), |docx, line| {
            docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)))
        });

        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| DocumentError::Docx(e.into()))?;
        Ok(buf.into_inner())
    }
}

/// Texto do corpo de um `.docx`, um parágrafo por linha.
pub(super) fn read(bytes: &[u8]) -> Result<String, DocumentError> {
    let docx = read_docx(bytes).map_err(|e| DocumentError::Docx(e.into()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(&p.children)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for part in &run.children {
                    match part {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => text.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    text
}
