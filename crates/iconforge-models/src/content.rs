//! In-memory asset payloads
//!
//! An asset's contents are either UTF-8 text (the common case for SVG
//! sources) or an opaque binary buffer (rasterized outputs).

use std::fmt;

/// Payload held in memory by an asset or flavor
#[derive(Clone, PartialEq, Eq)]
pub enum Content {
    /// UTF-8 text, e.g. an SVG document
    Text(String),
    /// Raw bytes, e.g. a PNG buffer
    Binary(Vec<u8>),
}

impl Content {
    /// View the payload as raw bytes
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    /// View the payload as text, if it is text
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    /// Payload size in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the payload is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "Content::Text({} bytes)", text.len()),
            Self::Binary(bytes) => write!(f, "Content::Binary({} bytes)", bytes.len()),
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_as_bytes() {
        let content = Content::from("<svg/>");
        assert_eq!(content.as_bytes(), b"<svg/>");
        assert_eq!(content.as_text(), Some("<svg/>"));
    }

    #[test]
    fn binary_has_no_text_view() {
        let content = Content::from(vec![0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(content.as_text(), None);
        assert_eq!(content.len(), 4);
    }

    #[test]
    fn debug_elides_payload() {
        let content = Content::from("a".repeat(4096));
        assert_eq!(format!("{content:?}"), "Content::Text(4096 bytes)");
    }
}
