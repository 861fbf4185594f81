//! HTTP client using reqwest

use std::time::Duration;

use reqwest::{Client, Url};

use super::{HttpError, HttpResponse};
use crate::config::HttpConfig;

const RETRY_DELAY: Duration = Duration::from_millis(500);

pub struct HttpClient {
    client: Client,
    user_agent: String,
    max_retries: u32,
}

impl HttpClient {
    /// Build a client from explicit request settings
    pub fn new(config: &HttpConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| HttpError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
        })
    }

    /// GET a URL, retrying transport failures up to `max_retries` times
    pub async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let mut attempt = 0;
        loop {
            match self.get_once(url).await {
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::debug!("GET {} failed ({}), retry {}", url, e, attempt);
                    tokio::time::sleep(RETRY_DELAY * attempt).await;
                }
                result => return result,
            }
        }
    }

    pub async fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError> {
        let url = Url::parse_with_params(url, params).map_err(|_| HttpError::InvalidUrl {
            url: url.to_string(),
        })?;

        self.get(url.as_str()).await
    }

    async fn get_once(&self, url: &str) -> Result<HttpResponse, HttpError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout
                } else {
                    HttpError::RequestFailed {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(HttpError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(HttpError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| HttpError::Body {
            message: e.to_string(),
        })?;

        Ok(HttpResponse { status, body })
    }
}
