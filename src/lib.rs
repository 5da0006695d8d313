//! SSI プロジェクト財務データAPI
//!
//! - CUIを指定して公開ポータル(SSI)のプロジェクトページを取得
//! - プロジェクト名と当年度の PIM / certificación / compromiso anual / devengado を抽出
//! - PIMに対する各割合を付けたJSONレコードとして返す
//!
//! # 使用例
//!
//! ```rust,ignore
//! use ssi_project_service::{ProjectRequest, ProjectService, ScraperConfig};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ProjectService::new(ScraperConfig::default()).unwrap();
//!
//!     let record = service.call(ProjectRequest::new("2345678")).await.unwrap();
//!     println!("{}: PIM={}", record.nombre, record.pim);
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod server;
pub mod service;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// 主要な型をリエクスポート
pub use config::{PageSelectors, ScraperConfig, ServerConfig};
pub use document::{Document, HtmlDocument};
pub use error::ScraperError;
pub use extractor::{extract_record, parse_amount};
pub use fetcher::HttpFetcher;
pub use server::{router, run_server};
pub use service::{current_year, BatchEntry, BatchRequest, ProjectRequest, ProjectService};
pub use traits::Fetcher;
pub use types::{AnnualFigures, BatchError, BatchResult, ProjectRecord};
