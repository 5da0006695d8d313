use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chrono::{Datelike, Local};
use serde_json::Value;
use tower::Service;
use tracing::{info, warn};

use crate::config::{PageSelectors, ScraperConfig};
use crate::document::HtmlDocument;
use crate::error::ScraperError;
use crate::extractor::extract_record;
use crate::fetcher::HttpFetcher;
use crate::traits::Fetcher;
use crate::types::{BatchError, BatchResult, ProjectRecord};

/// 実行時点の暦年
pub fn current_year() -> i32 {
    Local::now().year()
}

/// 単一プロジェクト取得リクエスト
#[derive(Debug, Clone)]
pub struct ProjectRequest {
    pub cui: String,
    /// 対象年度（未指定なら実行時点の年）
    pub year: Option<i32>,
}

impl ProjectRequest {
    pub fn new(cui: impl Into<String>) -> Self {
        Self {
            cui: cui.into(),
            year: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// バッチ内の1要素
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    Cui(String),
    /// CUIとして使えない要素（JSON表記を保持）
    Invalid(String),
}

impl From<String> for BatchEntry {
    fn from(cui: String) -> Self {
        BatchEntry::Cui(cui)
    }
}

impl From<&str> for BatchEntry {
    fn from(cui: &str) -> Self {
        BatchEntry::Cui(cui.to_string())
    }
}

impl BatchEntry {
    fn from_json(entry: &Value) -> Self {
        match entry {
            Value::String(cui) => BatchEntry::Cui(cui.clone()),
            Value::Number(cui) => BatchEntry::Cui(cui.to_string()),
            other => BatchEntry::Invalid(other.to_string()),
        }
    }
}

/// バッチ取得リクエスト
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchRequest {
    pub entries: Vec<BatchEntry>,
    pub year: Option<i32>,
}

impl BatchRequest {
    pub fn new<I, S>(cuis: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BatchEntry>,
    {
        Self {
            entries: cuis.into_iter().map(Into::into).collect(),
            year: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// `{"cuis": [...]}` 形式のJSONボディを読み込む
    ///
    /// `cuis` が無い・配列でない場合のみエラー。文字列と数値はCUIとして扱い
    /// （数値は10進表記）、それ以外の要素はその要素だけの失敗になる。
    pub fn from_json(body: &Value) -> Result<Self, ScraperError> {
        let entries = body
            .get("cuis")
            .and_then(Value::as_array)
            .ok_or_else(|| ScraperError::Validation("cuis must be an array of CUIs".to_string()))?;

        Ok(Self {
            entries: entries.iter().map(BatchEntry::from_json).collect(),
            year: None,
        })
    }
}

/// CUI → 財務データのパイプラインを tower::Service として公開する
pub struct ProjectService<F = HttpFetcher> {
    fetcher: Arc<F>,
    selectors: Arc<PageSelectors>,
}

impl<F> Clone for ProjectService<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            selectors: Arc::clone(&self.selectors),
        }
    }
}

impl ProjectService<HttpFetcher> {
    pub fn new(config: ScraperConfig) -> Result<Self, ScraperError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(fetcher, config.selectors))
    }
}

impl<F: Fetcher> ProjectService<F> {
    pub fn with_fetcher(fetcher: F, selectors: PageSelectors) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            selectors: Arc::new(selectors),
        }
    }

    /// 1件取得（取得 → 抽出 → レコード組み立て）
    pub async fn fetch_project(&self, cui: &str, year: i32) -> Result<ProjectRecord, ScraperError> {
        let html = self.fetcher.fetch(cui).await?;
        self.scrape(&html, cui, year)
    }

    // パース済み文書は await をまたがせない
    fn scrape(&self, html: &str, cui: &str, year: i32) -> Result<ProjectRecord, ScraperError> {
        let doc = HtmlDocument::parse(html);
        extract_record(&doc, cui, &self.selectors, year)
    }

    /// 入力順に1件ずつ取得する。失敗した要素は `errors` に回して処理を続ける
    pub async fn fetch_projects(&self, entries: &[BatchEntry], year: i32) -> BatchResult {
        let mut results = Vec::with_capacity(entries.len());
        let mut errors = Vec::new();

        for entry in entries {
            let (cui, outcome) = match entry {
                BatchEntry::Cui(cui) => (cui, self.fetch_project(cui, year).await),
                BatchEntry::Invalid(raw) => (
                    raw,
                    Err(ScraperError::Validation(format!("invalid CUI entry: {}", raw))),
                ),
            };
            match outcome {
                Ok(record) => results.push(record),
                Err(e) => {
                    warn!("CUI {} の取得に失敗: {}", cui, e);
                    errors.push(BatchError {
                        cui: cui.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let result = BatchResult::new(results, errors);
        info!(
            "バッチ取得完了: total={}, successful={}, failed={}",
            result.total, result.successful, result.failed
        );
        result
    }
}

impl<F: Fetcher + 'static> Service<ProjectRequest> for ProjectService<F> {
    type Response = ProjectRecord;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ProjectRequest) -> Self::Future {
        info!("プロジェクト取得リクエスト受信: cui={}", req.cui);
        let service = self.clone();

        Box::pin(async move {
            let year = req.year.unwrap_or_else(current_year);
            let record = service.fetch_project(&req.cui, year).await?;

            info!(
                "プロジェクト取得完了: cui={}, year={}, pim={}",
                record.cui, year, record.pim
            );
            Ok(record)
        })
    }
}

impl<F: Fetcher + 'static> Service<BatchRequest> for ProjectService<F> {
    type Response = BatchResult;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: BatchRequest) -> Self::Future {
        info!("バッチ取得リクエスト受信: {}件", req.entries.len());
        let service = self.clone();

        Box::pin(async move {
            let year = req.year.unwrap_or_else(current_year);
            Ok(service.fetch_projects(&req.entries, year).await)
        })
    }
}
