use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};

fn init_logging() {
    dotenv().ok();
    common::utils::logging::init_logging_default();
    info!(service = "auth-service", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    init_logging();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "auth-service", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let worker_threads = cfg.auth.server.worker_threads;
    common::utils::runtime::run_service("auth-service", worker_threads, move || server::run_auth(cfg))
}
