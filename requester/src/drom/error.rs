use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequesterError {
    #[error("http request failed: {0}")]
    Http(String),
    #[error("backend responded with status `{0}`")]
    Status(u16),
    #[error("could not decode parts from response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RequesterError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value.to_string())
    }
}

impl From<serde_json::Error> for RequesterError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
