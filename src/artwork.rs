use std::path::Path;
use std::time::Duration;

use base64::Engine;
use thiserror::Error;

/// Why artwork could not be shown. Always recovered from by drawing the fallback avatar.
#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("unsupported artwork reference: {0}")]
    Unsupported(String),
    #[error("invalid data URL")]
    InvalidDataUrl,
    #[error("failed to decode base64 artwork: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("artwork request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to read artwork: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode artwork: {0}")]
    Decode(#[from] image::ImageError),
    #[error("artwork fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("artwork task failed: {0}")]
    Task(String),
}

/// Fetches raw artwork bytes for a reference. Blocking; only ever called off the UI path.
pub trait ArtworkLoader: Send + Sync {
    fn load(&self, reference: &str) -> Result<Vec<u8>, ArtworkError>;
}

/// Resolves `data:` URLs, `http(s)://` URLs, `file://` URIs and plain paths.
pub struct DefaultArtworkLoader {
    client: reqwest::blocking::Client,
}

impl DefaultArtworkLoader {
    pub fn new(timeout: Duration) -> Result<Self, ArtworkError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn fetch_http(&self, url: &str) -> Result<Vec<u8>, ArtworkError> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

impl ArtworkLoader for DefaultArtworkLoader {
    fn load(&self, reference: &str) -> Result<Vec<u8>, ArtworkError> {
        if reference.starts_with("data:") {
            decode_data_url(reference)
        } else if reference.starts_with("http://") || reference.starts_with("https://") {
            self.fetch_http(reference)
        } else if let Some(path) = reference.strip_prefix("file://") {
            Ok(std::fs::read(Path::new(path))?)
        } else if reference.contains("://") {
            Err(ArtworkError::Unsupported(reference.to_string()))
        } else {
            Ok(std::fs::read(Path::new(reference))?)
        }
    }
}

/// Decode a base64 `data:` URL payload
pub fn decode_data_url(reference: &str) -> Result<Vec<u8>, ArtworkError> {
    let (header, payload) = reference
        .split_once(',')
        .ok_or(ArtworkError::InvalidDataUrl)?;
    if !header.ends_with(";base64") {
        return Err(ArtworkError::InvalidDataUrl);
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url() {
        let bytes = decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_data_url_errors() {
        assert!(matches!(
            decode_data_url("data:image/png;base64"),
            Err(ArtworkError::InvalidDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:text/plain,hello"),
            Err(ArtworkError::InvalidDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,!!!"),
            Err(ArtworkError::Base64(_))
        ));
    }

    #[test]
    fn test_unsupported_scheme() {
        let loader = DefaultArtworkLoader::new(Duration::from_secs(1)).unwrap();
        assert!(matches!(
            loader.load("content://media/external/audio/albumart/7"),
            Err(ArtworkError::Unsupported(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let loader = DefaultArtworkLoader::new(Duration::from_secs(1)).unwrap();
        assert!(matches!(
            loader.load("/definitely/not/here/cover.jpg"),
            Err(ArtworkError::Io(_))
        ));
        assert!(matches!(
            loader.load("file:///definitely/not/here/cover.jpg"),
            Err(ArtworkError::Io(_))
        ));
    }
}
