use ssi_project_service::{BatchRequest, ProjectRequest, ProjectService, ScraperConfig};
use tower::ServiceExt;

#[tokio::main]
async fn main() {
    // ログ設定
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // 引数でCUIを指定（複数指定でバッチ取得）
    let cuis: Vec<String> = std::env::args().skip(1).collect();
    if cuis.is_empty() {
        eprintln!("usage: cargo run --example fetch_project -- <CUI> [CUI...]");
        std::process::exit(2);
    }

    let service = ProjectService::new(ScraperConfig::default())
        .expect("Failed to build HTTP client");

    println!("=== SSI Project Fetch ===");

    if let [cui] = cuis.as_slice() {
        match service.oneshot(ProjectRequest::new(cui.as_str())).await {
            Ok(record) => {
                println!("{}", serde_json::to_string_pretty(&record).unwrap());
            }
            Err(e) => {
                eprintln!("エラー: {}", e);
            }
        }
        return;
    }

    let result = service
        .oneshot(BatchRequest::new(cuis))
        .await
        .unwrap_or_else(|never| match never {});
    println!("{}", serde_json::to_string_pretty(&result).unwrap());
}
