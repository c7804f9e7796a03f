//! Helpers for preparing `LOAD_DOCUMENT` payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::command::LoadDocument;

/// Build a `data:` URL for PDF bytes.
pub fn pdf_data_url(bytes: &[u8]) -> String {
    format!("data:application/pdf;base64,{}", STANDARD.encode(bytes))
}

/// Last path segment of `url`, without its query string.
pub fn extract_document_name(url: &str) -> &str {
    let tail = url.rfind('/').map_or(url, |slash| &url[slash + 1..]);
    tail.split('?').next().unwrap_or_default()
}

impl LoadDocument {
    /// Prepare a load command for PDF bytes fetched from `source_url`.
    pub fn from_bytes(bytes: &[u8], source_url: &str) -> Self {
        let name = extract_document_name(source_url);
        Self {
            data_url: pdf_data_url(bytes),
            name: (!name.is_empty()).then(|| name.to_owned()),
            page: None,
        }
    }

    pub fn at_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_document_names() {
        let cases = [
            ("https://example.com/document.pdf", "document.pdf"),
            ("https://example.com/path/to/file.pdf", "file.pdf"),
            ("https://example.com/doc.pdf?token=abc&v=1", "doc.pdf"),
            ("https://example.com/", ""),
            ("https://example.com", "example.com"),
            ("https://example.com/my%20document.pdf", "my%20document.pdf"),
            ("", ""),
        ];
        for (url, expected) in cases {
            assert_eq!(extract_document_name(url), expected, "url: {url}");
        }
    }

    #[test]
    fn builds_data_url() {
        assert_eq!(pdf_data_url(b"%PDF"), "data:application/pdf;base64,JVBERg==");
    }

    #[test]
    fn load_command_from_bytes() {
        let cmd = LoadDocument::from_bytes(b"%PDF", "https://example.com/a/b.pdf?x=1").at_page(3);
        assert_eq!(cmd.name.as_deref(), Some("b.pdf"));
        assert_eq!(cmd.page, Some(3));
        assert!(cmd.data_url.starts_with("data:application/pdf;base64,"));

        let unnamed = LoadDocument::from_bytes(b"%PDF", "https://example.com/");
        assert_eq!(unnamed.name, None);
    }
}
