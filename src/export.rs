//! Saving gallery images to disk.

use crate::ai::mime::extension_for_mime;
use crate::models::{EncodedImage, GenerationResult};
use crate::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

const FILE_PREFIX: &str = "banana-canvas";

/// File extension for an image: declared MIME type first, then the bytes.
pub fn file_extension(image: &EncodedImage) -> &'static str {
    extension_for_mime(&image.mime_type)
        .or_else(|| {
            image::guess_format(&image.data)
                .ok()
                .and_then(|format| format.extensions_str().first().copied())
        })
        .unwrap_or("png")
}

pub fn file_name(image: &EncodedImage, timestamp_millis: i64, index: usize) -> String {
    format!(
        "{}-{}-{}.{}",
        FILE_PREFIX,
        timestamp_millis,
        index,
        file_extension(image)
    )
}

/// Write one image into `dir`, returning the written path.
pub async fn download(image: &EncodedImage, index: usize, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name(image, Utc::now().timestamp_millis(), index));
    tokio::fs::write(&path, &image.data).await?;
    info!("Saved image to {}", path.display());
    Ok(path)
}

/// Write every result in gallery order.
pub async fn download_all(results: &[GenerationResult], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(results.len());
    for (index, result) in results.iter().enumerate() {
        paths.push(download(&result.image, index, dir).await?);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AspectRatio;
    use tempfile::TempDir;

    const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_extension_from_mime() {
        let image = EncodedImage::new("image/jpeg", PNG_SIGNATURE.to_vec());
        assert_eq!(file_extension(&image), "jpg");
    }

    #[test]
    fn test_extension_sniffed_when_mime_unknown() {
        let image = EncodedImage::new("application/octet-stream", PNG_SIGNATURE.to_vec());
        assert_eq!(file_extension(&image), "png");

        let image = EncodedImage::new("", vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(file_extension(&image), "jpg");
    }

    #[test]
    fn test_extension_defaults_to_png() {
        let image = EncodedImage::new("", vec![0x00, 0x01]);
        assert_eq!(file_extension(&image), "png");
    }

    #[test]
    fn test_file_name_format() {
        let image = EncodedImage::new("image/webp", vec![]);
        assert_eq!(
            file_name(&image, 1_700_000_000_000, 2),
            "banana-canvas-1700000000000-2.webp"
        );
    }

    #[tokio::test]
    async fn test_download_all_writes_each_image() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested");
        let results: Vec<GenerationResult> = (0..3)
            .map(|i| {
                let mut data = PNG_SIGNATURE.to_vec();
                data.push(i);
                GenerationResult::new(
                    EncodedImage::new("image/png", data),
                    "cat".to_string(),
                    AspectRatio::Square,
                )
            })
            .collect();

        let paths = download_all(&results, &target).await.unwrap();

        assert_eq!(paths.len(), 3);
        for (i, path) in paths.iter().enumerate() {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("banana-canvas-"));
            assert!(name.ends_with(&format!("-{}.png", i)));
            assert_eq!(std::fs::read(path).unwrap(), results[i].image.data);
        }
    }

    #[tokio::test]
    async fn test_download_all_empty() {
        let dir = TempDir::new().unwrap();
        let paths = tokio_test::assert_ok!(download_all(&[], dir.path()).await);
        assert!(paths.is_empty());
    }
}
