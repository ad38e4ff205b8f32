/// Image pipeline module
///
/// Everything between raw pixels and an encoded payload:
/// - Data-URL encode/decode and size estimation (data_url.rs)
/// - Still-frame encoding and stretch-transcode (transcode.rs)
/// - File upload with media-type validation (upload.rs)

pub mod data_url;
pub mod transcode;
pub mod upload;

use data_url::DataUrlError;

/// Errors from decoding, encoding, or loading image payloads.
#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("Not an image file: {0}")]
    NotAnImage(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Malformed data URL: {0}")]
    DataUrl(#[from] DataUrlError),
}
