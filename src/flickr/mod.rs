//! Flickr collaborators
//!
//! This module handles:
//! - Searching Flickr for photos matching a term (search.rs)
//! - Downloading and decoding thumbnails and large images (images.rs)

pub mod images;
pub mod search;

pub use search::FlickrClient;
