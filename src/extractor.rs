//! プロジェクトページからの財務データ抽出

use tracing::{debug, warn};

use crate::config::PageSelectors;
use crate::document::Document;
use crate::error::ScraperError;
use crate::types::{AnnualFigures, ProjectRecord};

/// 年度別テーブルの列位置（0始まり）
const YEAR_COLUMN: usize = 0;
const PIM_COLUMN: usize = 2;
const CERTIFICACION_COLUMN: usize = 3;
const COMPROMISO_COLUMN: usize = 4;
const DEVENGADO_COLUMN: usize = 5;

/// 文書から指定年度のレコードを組み立てる
///
/// プロジェクト名が空なら `NotFound`。年度別テーブルが無い、または該当年度の行が
/// 無い場合は金額0のレコードを返す。
pub fn extract_record<D: Document>(
    doc: &D,
    cui: &str,
    selectors: &PageSelectors,
    year: i32,
) -> Result<ProjectRecord, ScraperError> {
    let nombre = doc.find_text(&selectors.project_name)?.trim().to_string();
    if nombre.is_empty() {
        return Err(ScraperError::NotFound(cui.to_string()));
    }

    let record = ProjectRecord::without_figures(cui, nombre);

    let Some(rows) = doc.find_rows(&selectors.annual_table)? else {
        // 財務データは別リクエストで読み込まれるページ構成（未対応）
        warn!(
            "年度別テーブルなし: CUI={}。財務データは別リクエストが必要なため金額0で返します",
            cui
        );
        return Ok(record);
    };

    match find_year_row(&rows, year) {
        Some(row) => {
            debug!("{}年度の行を検出: CUI={}, {:?}", year, cui, row);
            Ok(record.with_figures(parse_figures(row)))
        }
        None => {
            debug!("{}年度の行なし: CUI={}, 行数={}", year, cui, rows.len());
            Ok(record)
        }
    }
}

/// 年度ラベルが一致する最後の行
fn find_year_row(rows: &[Vec<String>], year: i32) -> Option<&[String]> {
    let label = year.to_string();
    rows.iter()
        .rev()
        .find(|row| row.get(YEAR_COLUMN).is_some_and(|cell| cell.trim() == label))
        .map(Vec::as_slice)
}

fn parse_figures(row: &[String]) -> AnnualFigures {
    let cell = |index: usize| row.get(index).map_or(0.0, |text| parse_amount(text));
    AnnualFigures {
        pim: cell(PIM_COLUMN),
        certificacion: cell(CERTIFICACION_COLUMN),
        compromiso_anual: cell(COMPROMISO_COLUMN),
        devengado: cell(DEVENGADO_COLUMN),
    }
}

/// "1,234.50" 形式の金額を読む。空・解析不能なら0
pub fn parse_amount(text: &str) -> f64 {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
