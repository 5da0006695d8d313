use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("failed to fetch project page: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("project not found for CUI {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("HTTP client init error: {0}")]
    ClientInit(String),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    #[error("invalid selector {0:?}")]
    Selector(String),
}

impl ScraperError {
    /// 呼び出し側の入力不備によるエラーか
    pub fn is_validation(&self) -> bool {
        matches!(self, ScraperError::Validation(_))
    }
}
