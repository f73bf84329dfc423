use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};

fn init_logging() {
    // 提前加载 .env，使得 RUST_LOG / MONGO_URI 等环境变量生效
    dotenv().ok();
    common::utils::logging::init_logging_default();
    info!(service = "ads-service", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    init_logging();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "ads-service", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let worker_threads = cfg.ads.worker_threads;
    common::utils::runtime::run_service("ads-service", worker_threads, move || server::run_ads(cfg))
}
