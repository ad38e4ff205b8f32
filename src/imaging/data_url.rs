/// Data-URL payloads
///
/// Stills travel through the app the same way the request body carries
/// them: as `data:<mime>;base64,<payload>` strings. This module owns the
/// encode/parse/decode round trip and the advisory byte-size estimate shown
/// next to the quality slider.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DataUrlError {
    #[error("missing data: prefix")]
    MissingPrefix,

    #[error("missing ;base64, marker")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Payload(#[from] base64::DecodeError),
}

/// An encoded image held as its MIME type plus base64 payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUrl {
    mime: String,
    payload: String,
}

impl DataUrl {
    /// Encode raw bytes under the given MIME type.
    pub fn encode(bytes: &[u8], mime: &str) -> Self {
        Self {
            mime: mime.to_string(),
            payload: STANDARD.encode(bytes),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` string. The payload is not
    /// validated until decode.
    pub fn parse(url: &str) -> Result<Self, DataUrlError> {
        let rest = url.strip_prefix("data:").ok_or(DataUrlError::MissingPrefix)?;
        let (mime, payload) = rest.split_once(";base64,").ok_or(DataUrlError::NotBase64)?;
        Ok(Self {
            mime: mime.to_string(),
            payload: payload.to_string(),
        })
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Decode the payload back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, DataUrlError> {
        Ok(STANDARD.decode(&self.payload)?)
    }

    /// Approximate decoded size, derived from the base64 length without
    /// decoding. Advisory only; never used for control decisions.
    pub fn estimated_bytes(&self) -> usize {
        let padding = self
            .payload
            .bytes()
            .rev()
            .take_while(|byte| *byte == b'=')
            .count();
        (self.payload.len() / 4) * 3 - padding
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.payload)
    }
}

/// Human-readable byte count for the size estimate label.
pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_prefixed_url() {
        let url = DataUrl::encode(&[0xFF, 0xD8, 0xFF], "image/jpeg");
        assert!(url.to_string().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn parse_round_trips() {
        let original = DataUrl::encode(b"hello pixels", "image/png");
        let parsed = DataUrl::parse(&original.to_string()).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.decode().unwrap(), b"hello pixels");
    }

    #[test]
    fn parse_rejects_non_data_urls() {
        assert_eq!(
            DataUrl::parse("http://example.com/image.png"),
            Err(DataUrlError::MissingPrefix)
        );
        assert_eq!(
            DataUrl::parse("data:image/png,rawpayload"),
            Err(DataUrlError::NotBase64)
        );
    }

    #[test]
    fn estimate_matches_decoded_length() {
        for len in [0usize, 1, 2, 3, 4, 57, 1024] {
            let bytes = vec![0xABu8; len];
            let url = DataUrl::encode(&bytes, "image/png");
            assert_eq!(url.estimated_bytes(), len, "length {len}");
            assert_eq!(url.decode().unwrap().len(), len);
        }
    }

    #[test]
    fn size_labels() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(49_352), "48.2 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
