use crate::config::Config;
use std::fs::File;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};
use url::Url;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("could not create log file: {0}")]
    File(String),
    #[error("could not build loki layer: {0}")]
    Loki(String),
    #[error("global tracing subscriber is already set")]
    GlobalDefault,
}

impl From<std::io::Error> for LoggingError {
    fn from(value: std::io::Error) -> Self {
        Self::File(value.to_string())
    }
}

impl From<tracing_loki::Error> for LoggingError {
    fn from(value: tracing_loki::Error) -> Self {
        Self::Loki(value.to_string())
    }
}

impl From<url::ParseError> for LoggingError {
    fn from(value: url::ParseError) -> Self {
        Self::Loki(value.to_string())
    }
}

impl From<tracing::subscriber::SetGlobalDefaultError> for LoggingError {
    fn from(_: tracing::subscriber::SetGlobalDefaultError) -> Self {
        Self::GlobalDefault
    }
}

fn filter_directives(module_name: &str) -> String {
    format!("{module_name}=debug,requester=debug,common=debug")
}

/// Installs the global subscriber. Logs go to `{log_dir}/log.txt` and, when
/// `loki.url` is configured, to Loki. There is no stdout layer since the
/// terminal belongs to the UI.
///
/// Must be called inside a tokio runtime when Loki is configured.
pub fn setup_logging(module_name: &str, config: &Config) -> Result<(), LoggingError> {
    let directives = filter_directives(module_name);

    std::fs::create_dir_all(&config.log_dir)?;
    let file = File::create(format!("{}/log.txt", config.log_dir))?;
    let file_log = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(EnvFilter::new(&directives));

    let loki_log = match &config.loki {
        Some(loki) => {
            let (layer, task) = tracing_loki::builder()
                .label("application", module_name)?
                .extra_field("pid", std::process::id().to_string())?
                .build_url(Url::parse(&loki.url)?)?;
            tokio::spawn(task);
            Some(layer.with_filter(EnvFilter::new(&directives)))
        }
        None => None,
    };

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(file_log).with(loki_log),
    )?;

    Ok(())
}
