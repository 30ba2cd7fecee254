use crate::drom::error::RequesterError;
use async_trait::async_trait;
use common::io::drom::{Part, SearchQuery};
use tracing::{debug, instrument};

/// Do not wrap `DromRequester` in a [`Rc`] or [`Arc`]
/// because [`reqwest::Client`] uses an [`Arc`] internally.
#[derive(Clone)]
pub struct DromRequester {
    http: reqwest::Client,
    base_url: String,
}

#[async_trait]
pub trait DromRequesterExt {
    async fn search_parts(&self, query: &SearchQuery) -> Result<Vec<Part>, RequesterError>;
}

/// Both query strings are interpolated verbatim, empty ones included.
pub fn parts_url(base_url: &str, query: &SearchQuery) -> String {
    format!(
        "{}/drom/{}/{}",
        base_url.trim_end_matches('/'),
        query.search_string,
        query.model
    )
}

impl DromRequester {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DromRequesterExt for DromRequester {
    #[instrument(skip(self))]
    async fn search_parts(&self, query: &SearchQuery) -> Result<Vec<Part>, RequesterError> {
        let url = parts_url(&self.base_url, query);
        debug!(url = %url, "requesting parts");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequesterError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parts = serde_json::from_slice::<Vec<Part>>(&body)?;
        debug!(n_parts = parts.len(), "decoded parts");

        Ok(parts)
    }
}
