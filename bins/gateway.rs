use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};

fn init_logging() {
    // 加载 .env（允许使用 RUST_LOG / LOG_FORMAT 配置日志）
    dotenv().ok();
    common::utils::logging::init_logging_default();
    info!(service = "gateway", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    init_logging();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "gateway", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    // 仅作为启动入口，将执行流程委托给 crates/gateway
    let worker_threads = cfg.gateway.server.worker_threads;
    common::utils::runtime::run_service("gateway", worker_threads, move || gateway::run(cfg))
}
