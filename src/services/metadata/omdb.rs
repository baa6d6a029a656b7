//! OMDb API provider
//!
//! One lookup per movie: `GET {api_url}/?i={imdb id}&apikey={key}`.
//! OMDb answers unknown ids with HTTP 200 and `"Response": "False"`, which is
//! reported as a fetch error here and degraded by the gateway.

use crate::{
    error::{AppError, AppResult},
    models::{MetadataRecord, OmdbResponse},
    services::metadata::MetadataProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    /// Creates a provider whose requests give up after `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.api_url.trim_end_matches('/'))
    }

    fn convert_api_response(
        &self,
        movie_id: &str,
        response: OmdbResponse,
    ) -> AppResult<MetadataRecord> {
        if response.is_error() {
            return Err(AppError::MetadataFetch(format!(
                "OMDb lookup for {} failed: {}",
                movie_id,
                response.error.as_deref().unwrap_or("unknown error")
            )));
        }

        Ok(MetadataRecord::from(response))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbProvider {
    async fn fetch_metadata(&self, movie_id: &str) -> AppResult<MetadataRecord> {
        if movie_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Movie id cannot be empty".to_string()));
        }

        let response = self
            .http_client
            .get(self.endpoint())
            .query(&[("i", movie_id), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::MetadataFetch(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let body: OmdbResponse = response.json().await?;
        self.convert_api_response(movie_id, body)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
