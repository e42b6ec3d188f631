//! Sharing selected photos
//!
//! Photos are written as PNG files named after their Flickr id, using
//! the large image when it has been loaded and the thumbnail otherwise.

use image::{ColorType, ImageFormat};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::ShareError;
use crate::state::Photo;

/// Result of an export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub folder: PathBuf,
    pub written: usize,
    pub skipped: usize,
}

/// Default folder offered by the folder picker
pub fn default_export_dir() -> Option<PathBuf> {
    dirs_next::picture_dir().or_else(dirs_next::home_dir)
}

/// Write every photo into `folder`, creating it if needed
pub async fn export_photos(photos: Vec<Photo>, folder: PathBuf) -> Result<ExportSummary, ShareError> {
    tokio::fs::create_dir_all(&folder)
        .await
        .map_err(|source| ShareError::CreateDir {
            path: folder.clone(),
            source,
        })?;

    // PNG encoding is CPU-bound
    tokio::task::spawn_blocking(move || export_photos_blocking(&photos, &folder)).await?
}

/// Blocking version of the export
fn export_photos_blocking(photos: &[Photo], folder: &Path) -> Result<ExportSummary, ShareError> {
    let mut summary = ExportSummary {
        folder: folder.to_path_buf(),
        ..ExportSummary::default()
    };

    for photo in photos {
        let Some(image) = photo.best_image() else {
            warn!("{}", ShareError::NoImage(photo.id.to_string()));
            summary.skipped += 1;
            continue;
        };

        let path = folder.join(format!("{}.png", photo.id));
        image::save_buffer_with_format(
            &path,
            &image.pixels,
            image.width,
            image.height,
            ColorType::Rgba8,
            ImageFormat::Png,
        )
        .map_err(|source| ShareError::Write {
            path: path.clone(),
            source,
        })?;
        summary.written += 1;
    }

    info!(
        "Exported {} photos to {} ({} without image)",
        summary.written,
        folder.display(),
        summary.skipped
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::{image, photo};

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("photo-grid-{}-{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn writes_best_image_of_each_photo() {
        let folder = scratch_dir("export");
        let mut large = photo("big");
        large.large_image = Some(image(8, 6));
        let mut blank = photo("blank");
        blank.thumbnail = None;

        let summary = export_photos(vec![photo("small"), large, blank], folder.clone())
            .await
            .unwrap();

        assert_eq!(summary.written, 2);
        assert_eq!(summary.skipped, 1);
        let written = image::open(folder.join("big.png")).unwrap();
        assert_eq!((written.width(), written.height()), (8, 6));
        assert!(folder.join("small.png").exists());
        assert!(!folder.join("blank.png").exists());

        let _ = std::fs::remove_dir_all(&folder);
    }
}
