//! テスト用のスタブフェッチャー

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ScraperError;
use crate::traits::Fetcher;

/// 登録済みのCUIにはHTMLを返し、それ以外は取得エラーにする
#[derive(Default)]
pub(crate) struct StubFetcher {
    pages: HashMap<String, String>,
    calls: Arc<AtomicUsize>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, cui: &str, html: String) -> Self {
        self.pages.insert(cui.to_string(), html);
        self
    }

    pub(crate) fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

fn fetch_error() -> ScraperError {
    // URLとして不正な文字列で本物の reqwest::Error を作る
    let err = reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("invalid URL must fail");
    ScraperError::Fetch(err)
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, cui: &str) -> Result<String, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(cui).cloned().ok_or_else(fetch_error)
    }
}

/// 既定セレクタに合わせたプロジェクトページ
///
/// `figures` は PIM, certificación, compromiso anual, devengado の順。
pub(crate) fn project_page(name: &str, year: i32, figures: [&str; 4]) -> String {
    let [pim, cert, comp, dev] = figures;
    format!(
        r#"<html><body>
            <table><tr><td id="td_nominv">{name}</td></tr></table>
            <table id="tb_anual">
                <tr><th>Año</th><th>PIA</th><th>PIM</th><th>Certificado</th><th>Compromiso</th><th>Devengado</th></tr>
                <tr><td>{year}</td><td>0</td><td>{pim}</td><td>{cert}</td><td>{comp}</td><td>{dev}</td></tr>
            </table>
        </body></html>"#
    )
}
