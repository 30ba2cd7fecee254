use common::config::Config;
use common::logging::setup_logging;
use panel::error::PanelError;
use requester::drom::DromRequester;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), PanelError> {
    let config = Config::load()?;
    setup_logging("panel", &config)?;

    let requester = DromRequester::new(config.drom.base_url);
    info!(base_url = requester.base_url(), "starting app");

    panel::app::run(requester).await?;
    info!("exited");
    Ok(())
}
