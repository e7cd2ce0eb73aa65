//! Solar Configurator Client - Main Entry Point

use anyhow::Context;
use solar_configurator::app::application::Application;
use solar_configurator::config::ClientConfig;
use solar_configurator::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match ClientConfig::try_load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {e}");
            ClientConfig::default()
        }
    };

    // Keep the guard alive so the log file is flushed on exit
    let _log_guard = logging::init(&config.logging);

    tracing::info!("Starting Solar Configurator client...");

    let app = Application::new(&config).context("failed to initialize application")?;
    let resolution = app.start().await;

    let entities = app.entities();
    let title = entities.router.lock().document_title().to_string();
    tracing::info!(
        route = %resolution.route,
        title = %title,
        connected = entities.status.is_connected(),
        "Client ready"
    );

    for event in app.events().try_iter() {
        tracing::debug!(?event, "Startup event");
    }

    Ok(())
}
