/// The currently held still image
///
/// A still arrives from the webcam or from an uploaded file; either way it
/// is carried as an encoded data URL plus its pixel dimensions. At most one
/// image exists at a time and the explicit close action clears it.

use crate::imaging::data_url::DataUrl;

/// A still image ready for preview, transform, download, or transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    /// Encoded payload as a data URL
    pub url: DataUrl,
    /// Pixel width of the encoded image
    pub width: u32,
    /// Pixel height of the encoded image
    pub height: u32,
}

impl CapturedImage {
    /// Whether this image already has the given target dimensions.
    /// When it does not, the transform action becomes available.
    pub fn matches(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

/// Capture lifecycle state.
#[derive(Debug, Default)]
pub struct CaptureState {
    pub image: Option<CapturedImage>,
    /// True while a decode or transcode is in flight
    pub loading: bool,
}

impl CaptureState {
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Discard the current image and any in-flight marker.
    pub fn clear(&mut self) {
        self.image = None;
        self.loading = false;
    }
}
