use common::config::ConfigError;
use common::logging::LoggingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("terminal io error: {0}")]
    Io(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging setup error: {0}")]
    Logging(#[from] LoggingError),
    #[error("could not open link `{0}`")]
    OpenLink(String),
}

impl From<std::io::Error> for PanelError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}
