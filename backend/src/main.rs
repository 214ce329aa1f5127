use channel_ranking::config::{init_logger, load_environment, Settings};
use log::error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    load_environment();
    init_logger();

    let settings = Settings::from_env();
    match channel_ranking::run(&settings).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Channel ranking update failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
