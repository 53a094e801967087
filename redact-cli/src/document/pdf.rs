//! Saída `.pdf`: texto corrido em páginas A4 com fonte Courier.
//!
//! O PDF usa apenas a fonte Type1 padrão (sem embutir fonte), codificada em
//! WinAnsi. Texto com caracteres fora do Latin-1 (hebraico, por exemplo) é
//! recusado com [`DocumentError::PdfUnencodable`] antes de qualquer gravação.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tracing::debug;

use crate::error::DocumentError;

use super::Serializer;

/// Avanço de um glifo Courier, em frações do corpo da fonte.
const COURIER_ADVANCE: f32 = 0.6;

/// Layout de página para a saída PDF. Medidas em pontos.
#[derive(Debug, Clone, Copy)]
pub struct PagedDocument {
    pub font_size: i64,
    pub leading: i64,
    pub margin: i64,
    pub page_width: i64,
    pub page_height: i64,
}

impl Default for PagedDocument {
    fn default() -> Self {
        Self {
            font_size: 12,
            leading: 14,
            margin: 42,
            page_width: 595,
            page_height: 842,
        }
    }
}

impl PagedDocument {
    /// Caracteres por linha que cabem entre as margens.
    pub fn columns(&self) -> usize {
        let usable = (self.page_width - 2 * self.margin).max(0) as f32;
        ((usable / (self.font_size as f32 * COURIER_ADVANCE)) as usize).max(1)
    }

    /// Linhas por página que cabem entre as margens.
    pub fn rows(&self) -> usize {
        let usable = (self.page_height - 2 * self.margin - self.font_size).max(0);
        ((usable / self.leading.max(1)) as usize + 1).max(1)
    }

    /// Quebra o texto em linhas visuais, respeitando `\n` e quebrando por palavra.
    pub fn layout(&self, text: &str) -> Vec<String> {
        let columns = self.columns();
        text.split('\n')
            .flat_map(|line| wrap(line, columns))
            .collect()
    }

    fn page_content(&self, lines: &[Vec<u8>]) -> Content {
        let top = self.page_height - self.margin - self.font_size;
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(self.font_size)]),
            Operation::new("TL", vec![Object::Integer(self.leading)]),
            Operation::new("Td", vec![Object::Integer(self.margin), Object::Integer(top)]),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("T*", vec![]));
            }
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(line.clone(), StringFormat::Literal)],
            ));
        }
        operations.push(Operation::new("ET", vec![]));
        Content { operations }
    }
}

impl Serializer for PagedDocument {
    fn render(&self, text: &str) -> Result<Vec<u8>, DocumentError> {
        let encoded = encode_latin1(text)?;

        let lines: Vec<Vec<u8>> = self
            .layout(&encoded)
            .into_iter()
            .map(|line| line.chars().map(|c| c as u8).collect())
            .collect();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        // Um documento vazio ainda tem uma página
        let chunks: Vec<&[Vec<u8>]> = if lines.is_empty() {
            vec![&lines[..]]
        } else {
            lines.chunks(self.rows()).collect()
        };

        let mut kids = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let content = self
                .page_content(chunk)
                .encode()
                .map_err(|e| DocumentError::Pdf(e.into()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(self.page_width),
                Object::Integer(self.page_height),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| DocumentError::Pdf(e.into()))?;
        debug!(pages = count, "pdf montado");
        Ok(bytes)
    }
}

/// Restringe o texto ao Latin-1. Tabs e caracteres de controle viram espaço.
fn encode_latin1(text: &str) -> Result<String, DocumentError> {
    let mut outside = text.chars().filter(|&c| (c as u32) > 0xFF);
    if let Some(first) = outside.next() {
        return Err(DocumentError::PdfUnencodable {
            count: outside.count() + 1,
            first,
        });
    }

    Ok(text
        .chars()
        .map(|c| match c {
            '\n' => '\n',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect())
}

fn wrap(line: &str, columns: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut width = 0;

    for word in line.split(' ') {
        let len = word.chars().count();
        let needed = if width == 0 { len } else { width + 1 + len };

        if needed <= columns {
            if width > 0 {
                current.push(' ');
            }
            current.push_str(word);
            width = needed;
            continue;
        }

        if width > 0 {
            out.push(std::mem::take(&mut current));
            width = 0;
        }

        // Palavra maior que a linha: corta em pedaços
        let chars: Vec<char> = word.chars().collect();
        let mut pieces = chars.chunks(columns).peekable();
        while let Some(piece) = pieces.next() {
            if pieces.peek().is_some() {
                out.push(piece.iter().collect());
            } else {
                current = piece.iter().collect();
                width = piece.len();
            }
        }
    }

    out.push(current);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let layout = PagedDocument::default();
        assert_eq!(layout.columns(), 70);
        assert_eq!(layout.rows(), 54);
    }

    #[test]
    fn test_wrap_by_word() {
        assert_eq!(wrap("aaa bbb ccc", 7), ["aaa bbb", "ccc"]);
        assert_eq!(wrap("", 7), [""]);
        assert_eq!(wrap("abcdefghij", 4), ["abcd", "efgh", "ij"]);
        assert_eq!(wrap("ab abcdefghij", 4), ["ab", "abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_layout_keeps_blank_lines() {
        let layout = PagedDocument::default();
        assert_eq!(layout.layout("a\n\nb"), ["a", "", "b"]);
    }

    #[test]
    fn test_encode_latin1_rejects_text_outside_latin1() {
        assert_eq!(encode_latin1("café\tok").unwrap(), "café ok");
        assert!(matches!(
            encode_latin1("אדם_1 ok"),
            Err(DocumentError::PdfUnencodable { count: 3, first: 'א' })
        ));
    }

    #[test]
    fn test_render_is_pdf() {
        let bytes = PagedDocument::default().render("person_1 met person_2.").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_hebrew_fails() {
        let err = PagedDocument::default().render("אדם_1 גר במיקום_2").unwrap_err();
        assert!(matches!(err, DocumentError::PdfUnencodable { count: 11, first: 'א' }));
    }

    #[test]
    fn test_render_paginates() {
        let text = vec!["line"; 120].join("\n");
        let bytes = PagedDocument::default().render(&text).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_render_empty_text_has_one_page() {
        let bytes = PagedDocument::default().render("").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
