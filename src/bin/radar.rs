// Entry point for one scheduled digest run.

use std::process::ExitCode;

use radar::core::config::AppConfig;
use radar::pipeline::{self, RunOutcome};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    radar::setup_logging();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Config error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };
    info!("Loaded configuration: {:?}", config);

    let result = pipeline::run(&config).await;
    match &result {
        Ok(RunOutcome::Delivered { items }) => info!("Digest of {} items delivered", items),
        Ok(RunOutcome::NothingNew { notified }) => {
            info!("No recent items (notice sent: {})", notified);
        }
        Err(e) => error!("Run failed: {}", e),
    }

    ExitCode::from(pipeline::exit_code(&result))
}
