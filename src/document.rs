//! HTML文書への最小限の問い合わせ機能
//!
//! 抽出ロジックは [`Document`] トレイトだけに依存し、HTMLパーサーの API には直接触れない。

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;

pub trait Document {
    /// セレクタに最初に一致した要素のテキスト（一致なしなら空文字列）
    fn find_text(&self, selector: &str) -> Result<String, ScraperError>;

    /// テーブルの各行のセルテキスト。テーブル自体が存在しなければ `None`
    fn find_rows(&self, table_selector: &str) -> Result<Option<Vec<Vec<String>>>, ScraperError>;
}

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("static selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").expect("static selector"));

/// `scraper` クレートによる [`Document`] 実装
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|_| ScraperError::Selector(selector.to_string()))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

impl Document for HtmlDocument {
    fn find_text(&self, selector: &str) -> Result<String, ScraperError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .html
            .select(&selector)
            .next()
            .map(element_text)
            .unwrap_or_default())
    }

    fn find_rows(&self, table_selector: &str) -> Result<Option<Vec<Vec<String>>>, ScraperError> {
        let selector = parse_selector(table_selector)?;
        let Some(table) = self.html.select(&selector).next() else {
            return Ok(None);
        };

        let rows = table
            .select(&ROW)
            .map(|row| row.select(&CELL).map(element_text).collect())
            .collect();
        Ok(Some(rows))
    }
}
