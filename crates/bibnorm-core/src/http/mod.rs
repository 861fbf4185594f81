//! HTTP client abstraction for the remote index

mod client;

pub use client::HttpClient;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {message}")]
    RequestFailed { message: String },
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
    #[error("Timeout")]
    Timeout,
    #[error("Rate limited")]
    RateLimited,
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Could not read response body: {message}")]
    Body { message: String },
    #[error("Could not build HTTP client: {message}")]
    Client { message: String },
}

impl HttpError {
    /// Transport-level failures worth another attempt. Server answers,
    /// including 429, are final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, HttpError::RequestFailed { .. } | HttpError::Timeout)
    }
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
