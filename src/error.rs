//! Error kinds produced by the fetch, parse, coerce and write stages.
//!
//! Each source pipeline returns `Result<_, ScrapeError>` and the driver in
//! `main` decides whether a failure is logged or fatal.

use thiserror::Error;

/// Everything that can go wrong while scraping one source.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a 4xx or 5xx status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The markup did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// A field could not be coerced into its typed form.
    #[error("coercion error: {0}")]
    Coercion(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// Map a reqwest failure onto the status or transport variant.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ScrapeError::HttpStatus {
                url: url.to_string(),
                status,
            },
            None => ScrapeError::Transport {
                url: url.to_string(),
                source: err,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_url_and_status() {
        let err = ScrapeError::HttpStatus {
            url: "https://example.com/bonuses".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404 Not Found fetching https://example.com/bonuses"
        );
    }

    #[test]
    fn test_io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: ScrapeError = io.into();
        assert!(matches!(err, ScrapeError::Io(_)));
    }
}
