//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the Flickr client, the grid controller and the UI layer.

use bytes::Bytes;
use chrono::{DateTime, Local};
use iced::widget::image::Handle;
use image::RgbaImage;
use std::fmt;

/// Flickr photo identifier (e.g., "53012345678")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(pub String);

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of an item in the grid.
/// Section 0 is always the most recent search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemIndex {
    pub section: usize,
    pub item: usize,
}

impl ItemIndex {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for ItemIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// A decoded image ready to be drawn
#[derive(Debug, Clone)]
pub struct PhotoImage {
    pub width: u32,
    pub height: u32,
    /// Decoded RGBA8 pixels, shared with `handle` (kept for exporting)
    pub pixels: Bytes,
    /// iced handle uploaded once and reused by every frame
    pub handle: Handle,
}

impl PhotoImage {
    pub fn new(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = Bytes::from(image.into_raw());
        Self {
            width,
            height,
            handle: Handle::from_rgba(width, height, pixels.clone()),
            pixels,
        }
    }

    /// An image with a zero dimension carries nothing to draw
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height (1.0 for empty images)
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Represents a single photo returned by a search
#[derive(Debug, Clone)]
pub struct Photo {
    pub id: PhotoId,
    /// Flickr addressing fields, used to build image URLs
    pub farm: u32,
    pub server: String,
    pub secret: String,
    pub title: String,
    /// Small image downloaded together with the search results
    pub thumbnail: Option<PhotoImage>,
    /// Large image, loaded lazily the first time the photo is expanded
    pub large_image: Option<PhotoImage>,
}

impl Photo {
    /// Image shown for this photo: the large one once cached, the thumbnail otherwise
    pub fn best_image(&self) -> Option<&PhotoImage> {
        self.large_image.as_ref().or(self.thumbnail.as_ref())
    }

    /// Size that fills the width of `bounds` keeping the thumbnail's aspect ratio.
    /// The height is clamped to the bounds, shrinking the width to match.
    pub fn size_to_fill_width(&self, bounds: (f32, f32)) -> (f32, f32) {
        let Some(thumbnail) = self.thumbnail.as_ref().filter(|t| !t.is_empty()) else {
            return bounds;
        };

        let (max_width, max_height) = bounds;
        let aspect_ratio = thumbnail.aspect_ratio();
        let height = max_width / aspect_ratio;

        if height > max_height {
            (max_height * aspect_ratio, max_height)
        } else {
            (max_width, height)
        }
    }
}

impl PartialEq for Photo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// The outcome of one completed search
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub search_term: String,
    pub items: Vec<Photo>,
    /// When the search completed (shown in the section header)
    pub searched_at: DateTime<Local>,
}

impl SearchResult {
    pub fn new(search_term: impl Into<String>, items: Vec<Photo>) -> Self {
        Self {
            search_term: search_term.into(),
            items,
            searched_at: Local::now(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A blank test image
    pub fn image(width: u32, height: u32) -> PhotoImage {
        PhotoImage::new(RgbaImage::new(width, height))
    }

    pub fn photo(id: &str) -> Photo {
        Photo {
            id: PhotoId(id.to_string()),
            farm: 1,
            server: "7372".to_string(),
            secret: "abcdef".to_string(),
            title: format!("photo {id}"),
            thumbnail: Some(image(4, 3)),
            large_image: None,
        }
    }

    /// A search result with `count` photos named `<term>-<n>`
    pub fn search(term: &str, count: usize) -> SearchResult {
        let items = (0..count).map(|n| photo(&format!("{term}-{n}"))).collect();
        SearchResult::new(term, items)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn handle_shares_the_pixel_buffer() {
        let photo_image = image(4, 3);
        assert_eq!(photo_image.pixels.len(), 4 * 3 * 4);
        match &photo_image.handle {
            Handle::Rgba { pixels, .. } => assert_eq!(pixels.as_ptr(), photo_image.pixels.as_ptr()),
            other => panic!("expected an RGBA handle, got {:?}", other),
        }
    }

    #[test]
    fn empty_images_are_detected() {
        assert!(image(0, 10).is_empty());
        assert!(!image(2, 2).is_empty());
    }

    #[test]
    fn landscape_photo_fills_width() {
        let photo = photo("1");
        let (width, height) = photo.size_to_fill_width((400.0, 600.0));
        assert_eq!(width, 400.0);
        assert_eq!(height, 300.0);
    }

    #[test]
    fn tall_result_is_clamped_to_available_height() {
        let mut photo = photo("1");
        photo.thumbnail = Some(image(3, 4));
        let (width, height) = photo.size_to_fill_width((400.0, 200.0));
        assert_eq!(height, 200.0);
        assert_eq!(width, 150.0);
    }

    #[test]
    fn missing_thumbnail_uses_full_bounds() {
        let mut photo = photo("1");
        photo.thumbnail = None;
        assert_eq!(photo.size_to_fill_width((320.0, 240.0)), (320.0, 240.0));
    }

    #[test]
    fn best_image_prefers_large() {
        let mut photo = photo("1");
        assert_eq!(photo.best_image().map(|i| i.width), Some(4));
        photo.large_image = Some(image(40, 30));
        assert_eq!(photo.best_image().map(|i| i.width), Some(40));
    }
}
