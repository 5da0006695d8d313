use async_trait::async_trait;

use crate::error::ScraperError;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// CUIに対応するプロジェクトページのHTMLを取得
    async fn fetch(&self, cui: &str) -> Result<String, ScraperError>;
}
