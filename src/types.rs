//! プロジェクト財務データの型定義

use serde::{Deserialize, Serialize};

/// 年度別テーブル1行分の金額
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnnualFigures {
    pub pim: f64,
    pub certificacion: f64,
    pub compromiso_anual: f64,
    pub devengado: f64,
}

/// CUI 1件分の財務データ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub cui: String,
    pub nombre: String,
    pub pim: f64,
    pub certificacion: f64,
    pub compromiso_anual: f64,
    pub devengado: f64,
    pub porcentaje_cert: f64,
    pub porcentaje_comp: f64,
    pub porcentaje_dev: f64,
}

impl ProjectRecord {
    /// 金額がすべて0のレコード
    pub fn without_figures(cui: impl Into<String>, nombre: impl Into<String>) -> Self {
        Self {
            cui: cui.into(),
            nombre: nombre.into(),
            pim: 0.0,
            certificacion: 0.0,
            compromiso_anual: 0.0,
            devengado: 0.0,
            porcentaje_cert: 0.0,
            porcentaje_comp: 0.0,
            porcentaje_dev: 0.0,
        }
    }

    /// 金額を設定し、PIMに対する各割合を算出する
    pub fn with_figures(self, figures: AnnualFigures) -> Self {
        let AnnualFigures {
            pim,
            certificacion,
            compromiso_anual,
            devengado,
        } = figures;
        Self {
            pim,
            certificacion,
            compromiso_anual,
            devengado,
            porcentaje_cert: percentage(certificacion, pim),
            porcentaje_comp: percentage(compromiso_anual, pim),
            porcentaje_dev: percentage(devengado, pim),
            ..self
        }
    }
}

/// `part / pim * 100`。PIMが0以下なら0
pub fn percentage(part: f64, pim: f64) -> f64 {
    if pim > 0.0 {
        part / pim * 100.0
    } else {
        0.0
    }
}

/// バッチ内で失敗したCUI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchError {
    pub cui: String,
    pub error: String,
}

/// バッチ取得結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub results: Vec<ProjectRecord>,
    pub errors: Vec<BatchError>,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchResult {
    pub fn new(results: Vec<ProjectRecord>, errors: Vec<BatchError>) -> Self {
        let successful = results.len();
        let failed = errors.len();
        Self {
            results,
            errors,
            total: successful + failed,
            successful,
            failed,
        }
    }
}
