//! Image download and decoding
//!
//! Photos are addressed by their farm/server/id/secret fields; the size
//! suffix picks which rendition Flickr serves.

use tokio::task;

use crate::error::ImageLoadError;
use crate::state::{Photo, PhotoImage};

/// Rendition of a photo on the Flickr static servers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// 240px on the longest side, shown in the grid
    Thumbnail,
    /// 1024px on the longest side, shown when expanded
    Large,
}

impl ImageSize {
    fn suffix(self) -> &'static str {
        match self {
            ImageSize::Thumbnail => "m",
            ImageSize::Large => "b",
        }
    }
}

/// Build the static URL of a photo rendition
pub fn image_url(farm: u32, server: &str, id: &str, secret: &str, size: ImageSize) -> String {
    format!(
        "https://farm{}.staticflickr.com/{}/{}_{}_{}.jpg",
        farm,
        server,
        id,
        secret,
        size.suffix()
    )
}

/// Build the static URL of a photo rendition
pub fn photo_url(photo: &Photo, size: ImageSize) -> String {
    image_url(photo.farm, &photo.server, &photo.id.0, &photo.secret, size)
}

/// Download an image and decode it off the async runtime
pub async fn fetch_image(http: &reqwest::Client, url: &str) -> Result<PhotoImage, ImageLoadError> {
    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ImageLoadError::Status(response.status()));
    }

    let bytes = response.bytes().await?;

    // Decoding a 1024px JPEG is CPU-bound
    task::spawn_blocking(move || decode_image(&bytes)).await?
}

/// Decode JPEG/PNG bytes into an RGBA image
pub fn decode_image(bytes: &[u8]) -> Result<PhotoImage, ImageLoadError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    let image = PhotoImage::new(decoded);

    if image.is_empty() {
        return Err(ImageLoadError::Empty);
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::photo;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        RgbaImage::new(width, height)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn thumbnail_and_large_urls() {
        let photo = photo("53012");
        assert_eq!(
            photo_url(&photo, ImageSize::Thumbnail),
            "https://farm1.staticflickr.com/7372/53012_abcdef_m.jpg"
        );
        assert_eq!(
            photo_url(&photo, ImageSize::Large),
            "https://farm1.staticflickr.com/7372/53012_abcdef_b.jpg"
        );
    }

    #[test]
    fn decodes_png() {
        let image = decode_image(&png_bytes(3, 2)).unwrap();
        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(image.pixels.len(), 3 * 2 * 4);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result = decode_image(b"<html>not an image</html>");
        assert!(matches!(result, Err(ImageLoadError::Decode(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_an_http_error() {
        let http = reqwest::Client::new();
        let result = fetch_image(&http, "http://127.0.0.1:9/none.jpg").await;
        assert!(matches!(result, Err(ImageLoadError::Http(_))));
    }
}
