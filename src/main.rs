mod app;
mod classifier;
mod config;
mod domain;
mod extract;
mod infrastructure;
mod tasks;
mod validation;

use anyhow::Result;
use infrastructure::{directories, instance_guard::InstanceGuard, logging, shutdown};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let _guard = if config.intake.skip_process_guard {
        tracing::warn!(
            target: "lifecycle",
            "process guard skipped because SKIP_PROCESS_GUARD=1"
        );
        None
    } else {
        Some(InstanceGuard::acquire(&paths.data_dir)?)
    };

    let (shutdown, _) = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown.clone());

    let app = app::TimetableIntakeApp::initialize(config, paths, shutdown).await?;
    app.run().await
}
