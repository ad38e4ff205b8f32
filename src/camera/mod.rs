/// Camera module
///
/// Webcam capture through nokhwa's native backends. The device is owned by
/// a dedicated capture thread (feed.rs) that publishes the latest frame;
/// the UI never touches the device directly.

pub mod feed;

/// Camera-related errors.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Failed to start camera stream: {0}")]
    Stream(String),

    #[error("Failed to read camera frame: {0}")]
    Frame(String),

    #[error("Failed to decode camera frame: {0}")]
    Decode(String),
}

/// A decoded RGBA frame from the viewfinder.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, row-major, width * height * 4 bytes
    pub rgba: Vec<u8>,
}
