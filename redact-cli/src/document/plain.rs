use crate::error::DocumentError;

use super::Serializer;

/// Texto puro em UTF-8, sem alterações.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl Serializer for PlainText {
    fn render(&self, text: &str) -> Result<Vec<u8>, DocumentError> {
        Ok(text.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_verbatim() {
        let text = "אדם_1\nperson_2\n";
        assert_eq!(PlainText.render(text).unwrap(), text.as_bytes());
    }
}
