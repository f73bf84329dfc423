use std::sync::Arc;

use anyhow::Context;
use configs::AppConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::observability::READINESS_ATTEMPTS_TOTAL;
use crate::readiness::{wait_until_ready, HealthProbe, ReadinessPolicy};
use crate::routes::{build_router, GatewayState};
use crate::upstream::{build_http_client, AdsClient, AuthClient};

/// Build upstream clients from config.
pub fn build_state(cfg: &AppConfig) -> anyhow::Result<GatewayState> {
    let gw = &cfg.gateway;
    let http = build_http_client(gw.request_timeout()).context("build http client")?;
    let auth = AuthClient::new(http.clone(), &gw.auth_url).context("auth_url")?;
    let ads = AdsClient::new(http, &gw.ads_url).context("ads_url")?;
    Ok(GatewayState { auth, ads })
}

pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg)?;
    let gw = &cfg.gateway;

    // 就绪屏障：上游全部健康后才开始监听
    let probes: Vec<Arc<dyn HealthProbe>> = vec![
        Arc::new(state.auth.health_probe()?),
        Arc::new(state.ads.health_probe()?),
    ];
    info!(auth = %gw.auth_url, ads = %gw.ads_url, "waiting for upstream services");
    let policy = ReadinessPolicy::from(&gw.readiness);
    let attempts = wait_until_ready(&policy, &probes).await?;
    READINESS_ATTEMPTS_TOTAL.inc_by(u64::from(attempts));

    let app = build_router(state);
    let addr = gw.server.addr();
    let listener = TcpListener::bind(&addr).await.with_context(|| format!("bind {addr}"))?;
    info!(%addr, "gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
