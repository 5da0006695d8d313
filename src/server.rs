//! HTTP API（axum）
//!
//! - `GET /` : ヘルスチェックとエンドポイント一覧
//! - `GET /api/project/{cui}` : 1件取得
//! - `POST /api/projects` : `{"cuis": [...]}` を1件ずつ順に取得

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::ScraperError;
use crate::service::{BatchRequest, ProjectRequest, ProjectService};
use crate::traits::Fetcher;

pub fn router<F: Fetcher + 'static>(service: ProjectService<F>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/project/{cui}", get(project_handler::<F>))
        .route("/api/projects", post(batch_handler::<F>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// サーバーを起動し、終了シグナルまで待機する
pub async fn run_server<F: Fetcher + 'static>(
    config: &ServerConfig,
    service: ProjectService<F>,
) -> std::io::Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("サーバー起動: http://{}", addr);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("サーバー停止");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Ctrl-C の監視に失敗: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("SIGTERM の監視に失敗: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("終了シグナル受信");
}

async fn index_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "SSI project financial data API",
        "endpoints": {
            "GET /api/project/{cui}": "Financial data of one project for the current year",
            "POST /api/projects": "Financial data of several projects, body: {\"cuis\": [\"...\"]}",
        },
    }))
}

async fn project_handler<F: Fetcher + 'static>(
    State(service): State<ProjectService<F>>,
    Path(cui): Path<String>,
) -> Response {
    match service.oneshot(ProjectRequest::new(cui.as_str())).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => {
            error!("プロジェクト取得失敗: cui={}, error={}", cui, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to fetch project data",
                    "message": e.to_string(),
                    "cui": cui,
                })),
            )
                .into_response()
        }
    }
}

async fn batch_handler<F: Fetcher + 'static>(
    State(service): State<ProjectService<F>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request = body
        .map_err(|rejection| ScraperError::Validation(rejection.body_text()))
        .and_then(|Json(value)| BatchRequest::from_json(&value));

    let request = match request {
        Ok(request) => request,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
                .into_response()
        }
    };

    match service.oneshot(request).await {
        Ok(result) => Json(result).into_response(),
        Err(never) => match never {},
    }
}
