use ssi_project_service::{run_server, ProjectService, ScraperConfig, ServerConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // ログ設定（RUST_LOG 未指定なら info）
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let server_config = ServerConfig::from_env();

    let service = match ProjectService::new(ScraperConfig::default()) {
        Ok(service) => service,
        Err(e) => {
            error!("スクレイパー初期化エラー: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    run_server(&server_config, service).await
}
