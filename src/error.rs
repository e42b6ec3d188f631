//! Error types for the collaborators around the grid
//!
//! Every error here is terminal: nothing is retried, and failures are
//! logged rather than shown to the user.

use std::path::PathBuf;

use thiserror::Error;

/// A search request failed
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Flickr answered `"stat": "fail"`
    #[error("Flickr error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("no API key configured (set FLICKR_API_KEY)")]
    MissingApiKey,

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Loading or decoding an image failed
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels")]
    Empty,

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Exporting shared photos failed
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("could not create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("photo {0} has no image to export")]
    NoImage(String),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The settings file could not be used
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
