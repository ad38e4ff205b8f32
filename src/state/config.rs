/// Output image parameters
///
/// This struct stores the user-editable output settings: target dimensions,
/// the aspect-ratio lock, the encoding format, and the encoder quality.
/// Whenever a lock other than Free is active, editing either dimension
/// recomputes the other so the pair always honors the locked ratio.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Aspect-ratio lock applied to the output dimensions.
///
/// Carried as an explicit variant rather than inferred from the current
/// width/height quotient, so ratios like 16:9 survive integer rounding.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    /// No lock; both dimensions edit independently.
    Free,
    FourThree,
    SixteenNine,
    Square,
    ThreeTwo,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Free,
        AspectRatio::FourThree,
        AspectRatio::SixteenNine,
        AspectRatio::Square,
        AspectRatio::ThreeTwo,
    ];

    /// The locked (width, height) ratio, or None for Free.
    pub fn ratio(&self) -> Option<(u32, u32)> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::FourThree => Some((4, 3)),
            AspectRatio::SixteenNine => Some((16, 9)),
            AspectRatio::Square => Some((1, 1)),
            AspectRatio::ThreeTwo => Some((3, 2)),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AspectRatio::Free => "Free",
            AspectRatio::FourThree => "4:3",
            AspectRatio::SixteenNine => "16:9",
            AspectRatio::Square => "1:1",
            AspectRatio::ThreeTwo => "3:2",
        };
        f.write_str(label)
    }
}

/// Encoding format for captured and transcoded stills.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP];

    /// Wire name used in request bodies ("jpeg", "png", "webp").
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    /// MIME type for data URLs and multipart parts.
    pub fn mime(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// Filename extension for downloads and multipart filenames.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WebP",
        };
        f.write_str(label)
    }
}

/// All output settings for the next capture, transform, or send.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ImageConfig {
    /// Target width in pixels (positive)
    pub width: u32,
    /// Target height in pixels (positive)
    pub height: u32,
    /// Aspect-ratio lock tying the two dimensions together
    pub aspect: AspectRatio,
    /// Encoding format
    pub format: OutputFormat,
    /// Encoder quality in [0.10, 1.00]; only JPEG honors it
    pub quality: f32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            aspect: AspectRatio::FourThree,
            format: OutputFormat::Jpeg,
            // Same default a canvas JPEG export uses
            quality: 0.92,
        }
    }
}

impl ImageConfig {
    /// Set the width; under an active lock the height follows as
    /// round(width * ratio_h / ratio_w).
    pub fn set_width(&mut self, width: u32) {
        self.width = width;
        if let Some((rw, rh)) = self.aspect.ratio() {
            self.height = ((width as f64 * rh as f64) / rw as f64).round() as u32;
        }
    }

    /// Set the height; under an active lock the width follows as
    /// round(height * ratio_w / ratio_h).
    pub fn set_height(&mut self, height: u32) {
        self.height = height;
        if let Some((rw, rh)) = self.aspect.ratio() {
            self.width = ((height as f64 * rw as f64) / rh as f64).round() as u32;
        }
    }

    /// Change the lock. A non-Free lock recomputes the height from the
    /// current width; switching to Free leaves both dimensions as they are.
    pub fn set_aspect(&mut self, aspect: AspectRatio) {
        self.aspect = aspect;
        if aspect.ratio().is_some() {
            self.set_width(self.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_edit_recomputes_height_under_lock() {
        let mut config = ImageConfig::default();
        config.set_aspect(AspectRatio::SixteenNine);

        config.set_width(800);
        assert_eq!(config.height, 450);

        config.set_width(640);
        assert_eq!(config.height, 360);
    }

    #[test]
    fn height_edit_recomputes_width_under_lock() {
        let mut config = ImageConfig::default();
        config.set_aspect(AspectRatio::FourThree);

        config.set_height(600);
        assert_eq!(config.width, 800);
    }

    #[test]
    fn rounding_is_exact_per_ratio() {
        let mut config = ImageConfig::default();
        for aspect in [
            AspectRatio::FourThree,
            AspectRatio::SixteenNine,
            AspectRatio::Square,
            AspectRatio::ThreeTwo,
        ] {
            config.set_aspect(aspect);
            let (rw, rh) = aspect.ratio().unwrap();
            for width in [37, 320, 799, 1280] {
                config.set_width(width);
                let expected = ((width as f64 * rh as f64) / rw as f64).round() as u32;
                assert_eq!(config.height, expected, "{aspect} at width {width}");
            }
        }
    }

    #[test]
    fn switching_to_free_keeps_dimensions_and_stops_recompute() {
        let mut config = ImageConfig::default();
        config.set_aspect(AspectRatio::SixteenNine);
        config.set_width(800);

        config.set_aspect(AspectRatio::Free);
        assert_eq!((config.width, config.height), (800, 450));

        config.set_width(333);
        assert_eq!(config.height, 450);
    }

    #[test]
    fn locking_recomputes_from_current_width() {
        let mut config = ImageConfig {
            width: 1000,
            height: 123,
            aspect: AspectRatio::Free,
            ..ImageConfig::default()
        };
        config.set_aspect(AspectRatio::Square);
        assert_eq!((config.width, config.height), (1000, 1000));
    }

    #[test]
    fn serialization_round_trips() {
        let mut config = ImageConfig::default();
        config.set_aspect(AspectRatio::ThreeTwo);
        config.format = OutputFormat::WebP;
        config.quality = 0.55;

        let json = serde_json::to_string(&config).unwrap();
        let restored: ImageConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
