/// File upload
///
/// Loading an image from disk keeps the original bytes: the file becomes a
/// data URL under its own MIME type, and a decode pass only establishes the
/// pixel dimensions. Files whose media type is not image/* are rejected
/// before anything is read.

use std::path::{Path, PathBuf};
use tokio::task;

use crate::imaging::data_url::DataUrl;
use crate::imaging::ImagingError;
use crate::state::capture::CapturedImage;

/// Extensions accepted by the picker, with their media types.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
];

/// Media type for a path, if its extension names an image/* type.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_string_lossy().to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

/// Filename extension for a media type, used when saving to disk.
pub fn extension_for_mime(mime: &str) -> &'static str {
    IMAGE_TYPES
        .iter()
        .find(|(_, known)| *known == mime)
        .map(|(ext, _)| *ext)
        .unwrap_or("bin")
}

/// Load an image file into a data URL plus its decoded dimensions.
pub async fn load_from_file(path: PathBuf) -> Result<CapturedImage, String> {
    task::spawn_blocking(move || load_blocking(&path))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
        .map_err(|e| e.to_string())
}

fn load_blocking(path: &Path) -> Result<CapturedImage, ImagingError> {
    let mime =
        mime_for_path(path).ok_or_else(|| ImagingError::NotAnImage(path.display().to_string()))?;

    let bytes = std::fs::read(path)?;
    let decoded =
        image::load_from_memory(&bytes).map_err(|e| ImagingError::Decode(e.to_string()))?;

    log::info!(
        "loaded {} ({}x{}, {})",
        path.display(),
        decoded.width(),
        decoded.height(),
        mime
    );

    Ok(CapturedImage {
        url: DataUrl::encode(&bytes, mime),
        width: decoded.width(),
        height: decoded.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn mime_lookup_is_case_insensitive() {
        assert_eq!(mime_for_path(Path::new("face.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("face.png")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn extension_round_trips_known_mimes() {
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/webp"), "webp");
        assert_eq!(extension_for_mime("application/json"), "bin");
    }

    #[test]
    fn rejects_non_image_files_without_reading_them() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.txt");
        std::fs::write(&path, b"definitely not pixels").unwrap();

        let err = load_blocking(&path).unwrap_err();
        assert!(matches!(err, ImagingError::NotAnImage(_)));
    }

    #[test]
    fn loads_a_png_with_its_original_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        RgbaImage::from_pixel(6, 4, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_blocking(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (6, 4));
        assert_eq!(loaded.url.mime(), "image/png");
        assert_eq!(loaded.url.decode().unwrap(), std::fs::read(&path).unwrap());
    }

    #[test]
    fn corrupt_image_files_fail_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a real png").unwrap();

        let err = load_blocking(&path).unwrap_err();
        assert!(matches!(err, ImagingError::Decode(_)));
    }
}
