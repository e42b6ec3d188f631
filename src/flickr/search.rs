use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::images::{fetch_image, image_url, photo_url, ImageSize};
use crate::error::{ImageLoadError, SearchError};
use crate::state::{Photo, PhotoId, PhotoImage, SearchResult};

/// Flickr REST endpoint
pub const REST_ENDPOINT: &str = "https://api.flickr.com/services/rest/";

/// Talks to the Flickr REST API.
/// Cheap to clone: the HTTP connection pool is shared.
#[derive(Debug, Clone)]
pub struct FlickrClient {
    http: reqwest::Client,
    api_key: String,
    per_page: u32,
}

/// Body of a `flickr.photos.search` response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    stat: String,
    photos: Option<PhotoPage>,
    code: Option<i64>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoPage {
    #[serde(default)]
    photo: Vec<PhotoEntry>,
}

/// One photo as listed in search results (no pixels yet)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PhotoEntry {
    pub id: String,
    pub farm: u32,
    pub server: String,
    pub secret: String,
    #[serde(default)]
    pub title: String,
}

impl PhotoEntry {
    fn thumbnail_url(&self) -> String {
        image_url(self.farm, &self.server, &self.id, &self.secret, ImageSize::Thumbnail)
    }

    fn into_photo(self, thumbnail: PhotoImage) -> Photo {
        Photo {
            id: PhotoId(self.id),
            farm: self.farm,
            server: self.server,
            secret: self.secret,
            title: self.title,
            thumbnail: Some(thumbnail),
            large_image: None,
        }
    }
}

/// Parse a search response body into its photo listing
pub fn parse_search_response(body: &[u8]) -> Result<Vec<PhotoEntry>, SearchError> {
    let response: SearchResponse = serde_json::from_slice(body)?;

    if response.stat != "ok" {
        return Err(SearchError::Api {
            code: response.code.unwrap_or_default(),
            message: response
                .message
                .unwrap_or_else(|| format!("unexpected stat '{}'", response.stat)),
        });
    }

    Ok(response.photos.map(|page| page.photo).unwrap_or_default())
}

impl FlickrClient {
    pub fn new(api_key: impl Into<String>, per_page: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            per_page,
        }
    }

    /// Query string of a `flickr.photos.search` call
    fn search_query(&self, term: &str) -> Vec<(&'static str, String)> {
        vec![
            ("method", "flickr.photos.search".to_string()),
            ("api_key", self.api_key.clone()),
            ("text", term.to_string()),
            ("per_page", self.per_page.to_string()),
            ("format", "json".to_string()),
            ("nojsoncallback", "1".to_string()),
        ]
    }

    /// Search for photos matching `term` and download their thumbnails.
    /// Photos whose thumbnail cannot be fetched are left out.
    pub async fn search(&self, term: String) -> Result<SearchResult, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        let response = self
            .http
            .get(REST_ENDPOINT)
            .query(&self.search_query(&term))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status()));
        }

        let body = response.bytes().await?;
        let entries = parse_search_response(&body)?;
        debug!("Flickr listed {} photos for '{}'", entries.len(), term);

        // Download every thumbnail concurrently, keeping the listing order
        let mut downloads = JoinSet::new();
        for (position, entry) in entries.into_iter().enumerate() {
            let http = self.http.clone();
            downloads.spawn(async move {
                let thumbnail = fetch_image(&http, &entry.thumbnail_url()).await;
                (position, entry, thumbnail)
            });
        }

        let mut photos = Vec::new();
        while let Some(joined) = downloads.join_next().await {
            let (position, entry, thumbnail) = joined?;
            match thumbnail {
                Ok(thumbnail) => photos.push((position, entry.into_photo(thumbnail))),
                Err(e) => warn!("Skipping photo {}: {}", entry.id, e),
            }
        }
        photos.sort_by_key(|(position, _)| *position);

        Ok(SearchResult::new(
            term,
            photos.into_iter().map(|(_, photo)| photo).collect(),
        ))
    }

    /// Download the large rendition of a photo
    pub async fn load_large_image(&self, photo: Photo) -> Result<PhotoImage, ImageLoadError> {
        fetch_image(&self.http, &photo_url(&photo, ImageSize::Large)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{
        "photos": {
            "page": 1, "pages": 10, "perpage": 2, "total": "20",
            "photo": [
                { "id": "1", "owner": "x@N00", "secret": "s1", "server": "65535", "farm": 66, "title": "Cat", "ispublic": 1 },
                { "id": "2", "owner": "y@N00", "secret": "s2", "server": "65535", "farm": 66, "title": "", "ispublic": 1 }
            ]
        },
        "stat": "ok"
    }"#;

    #[test]
    fn parses_photo_listing() {
        let entries = parse_search_response(OK_BODY.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "1");
        assert_eq!(entries[0].title, "Cat");
        assert_eq!(
            entries[1].thumbnail_url(),
            "https://farm66.staticflickr.com/65535/2_s2_m.jpg"
        );
    }

    #[test]
    fn api_failure_is_reported() {
        let body = br#"{ "stat": "fail", "code": 100, "message": "Invalid API Key (Key has invalid format)" }"#;
        match parse_search_response(body) {
            Err(SearchError::Api { code, message }) => {
                assert_eq!(code, 100);
                assert!(message.starts_with("Invalid API Key"));
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        assert!(matches!(
            parse_search_response(b"jsonFlickrApi({})"),
            Err(SearchError::Decode(_))
        ));
    }

    #[test]
    fn empty_page_gives_no_photos() {
        let body = br#"{ "photos": { "photo": [] }, "stat": "ok" }"#;
        assert!(parse_search_response(body).unwrap().is_empty());
    }

    #[test]
    fn query_asks_for_plain_json() {
        let client = FlickrClient::new("key", 20);
        let query = client.search_query("cats");
        assert!(query.contains(&("text", "cats".to_string())));
        assert!(query.contains(&("per_page", "20".to_string())));
        assert!(query.contains(&("nojsoncallback", "1".to_string())));
    }

    #[tokio::test]
    async fn search_without_api_key_fails_fast() {
        let client = FlickrClient::new("", 20);
        assert!(matches!(
            client.search("cats".to_string()).await,
            Err(SearchError::MissingApiKey)
        ));
    }
}
