use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use tracing::{info, warn};

use crate::routes::{self, ads::AdsState, auth::AuthState};
use service::{
    ads::{repo::mongo::MongoAdRepository, repository::AdRepository, AdService},
    auth::{AllowList, AuthService},
};

/// Ads service entry: connect the store, reconcile legacy records, serve.
pub async fn run_ads(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect(&cfg.database).await?;
    let repo: Arc<dyn AdRepository> = Arc::new(MongoAdRepository::new(&db));
    let ads = AdService::new(repo);

    // 启动时补齐旧记录缺失的 hidden 字段，再开始接收请求
    ads.reconcile_on_startup().await?;

    let app = routes::build_ads_router(AdsState { ads });
    serve(&cfg.ads.addr(), app).await
}

/// Auth service entry: load the allow-list once, serve.
pub async fn run_auth(cfg: AppConfig) -> anyhow::Result<()> {
    let allow_list = AllowList::load(&cfg.auth.allow_list_path).await?;
    if allow_list.is_empty() {
        warn!(path = %cfg.auth.allow_list_path, "allow-list is empty; every login will be rejected");
    }
    let auth = AuthService::new(Arc::new(allow_list));

    let app = routes::build_auth_router(AuthState { auth });
    serve(&cfg.auth.server.addr(), app).await
}

async fn serve(addr: &str, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
