// Reference Data Loader - municipality and per-diem tables
// Loaded once at startup; the immutable handle is passed by reference everywhere.

use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sheet names expected in the reference workbook
pub const MUNICIPALITY_SHEET: &str = "Base Municipio";
pub const CATEGORY_SHEET: &str = "Base Diárias";

/// Exact headers required in the category table
pub const LABEL_COLUMN: &str = "Tipo de Diária";
pub const RATE_COLUMN: &str = "Valor";

/// One row of the municipality table. Names are not guaranteed unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub name: String,
    pub uf: String,
}

/// One row of the per-diem table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiemCategory {
    pub label: String,
    pub rate: f64,
}

/// The two reference tables, loaded once per process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub municipalities: Vec<Municipality>,
    pub categories: Vec<DiemCategory>,
}

/// All variants are fatal: startup halts instead of running on a degraded data set.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("arquivo de referência não encontrado: {0}")]
    NotFound(PathBuf),

    #[error("falha ao ler planilha: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("falha ao ler CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("coluna obrigatória não encontrada: {0}")]
    MissingColumn(&'static str),

    #[error("valor de diária inválido para '{0}': {1}")]
    BadRate(String, String),
}

/// Load both tables from an xlsx workbook with the named sheets.
pub fn load_workbook(path: &Path) -> Result<ReferenceData, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path)?;

    let range = workbook.worksheet_range(MUNICIPALITY_SHEET)?;
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|c| normalize_header(&cell_text(c))).collect(),
        None => Vec::new(),
    };
    let (city_col, uf_col) = detect_municipality_columns(&headers)?;

    let mut municipalities = Vec::new();
    for row in rows {
        let name = cell_text(row.get(city_col).unwrap_or(&Data::Empty));
        if name.is_empty() {
            continue;
        }
        let uf = cell_text(row.get(uf_col).unwrap_or(&Data::Empty));
        municipalities.push(Municipality { name, uf });
    }

    let range = workbook.worksheet_range(CATEGORY_SHEET)?;
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|c| cell_text(c)).collect(),
        None => Vec::new(),
    };
    let (label_col, rate_col) = detect_category_columns(&headers)?;

    let mut categories = Vec::new();
    for row in rows {
        let label = cell_text(row.get(label_col).unwrap_or(&Data::Empty));
        if label.is_empty() {
            continue;
        }
        let rate = cell_rate(&label, row.get(rate_col).unwrap_or(&Data::Empty))?;
        categories.push(DiemCategory { label, rate });
    }

    tracing::debug!(
        municipalities = municipalities.len(),
        categories = categories.len(),
        "reference data loaded from workbook"
    );

    Ok(ReferenceData {
        municipalities,
        categories,
    })
}

/// Load the same two tables from a pair of CSV files (plain-text alternative
/// to the workbook; one file per table).
pub fn load_csv(municipios_path: &Path, diarias_path: &Path) -> Result<ReferenceData, DataLoadError> {
    for path in [municipios_path, diarias_path] {
        if !path.exists() {
            return Err(DataLoadError::NotFound(path.to_path_buf()));
        }
    }

    let mut rdr = csv::Reader::from_path(municipios_path)?;
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| normalize_header(h))
        .collect();
    let (city_col, uf_col) = detect_municipality_columns(&headers)?;

    let mut municipalities = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let name = record.get(city_col).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }
        let uf = record.get(uf_col).unwrap_or("").trim().to_string();
        municipalities.push(Municipality { name, uf });
    }

    let mut rdr = csv::Reader::from_path(diarias_path)?;
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let (label_col, rate_col) = detect_category_columns(&headers)?;

    let mut categories = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let label = record.get(label_col).unwrap_or("").trim().to_string();
        if label.is_empty() {
            continue;
        }
        let raw = record.get(rate_col).unwrap_or("").trim().to_string();
        let rate = parse_rate(&label, &raw)?;
        categories.push(DiemCategory { label, rate });
    }

    tracing::debug!(
        municipalities = municipalities.len(),
        categories = categories.len(),
        "reference data loaded from csv"
    );

    Ok(ReferenceData {
        municipalities,
        categories,
    })
}

/// City column is found by substring ("cid"/"muni"), UF column by exact name.
fn detect_municipality_columns(headers: &[String]) -> Result<(usize, usize), DataLoadError> {
    let city_col = headers
        .iter()
        .position(|h| h.contains("cid") || h.contains("muni"))
        .ok_or(DataLoadError::MissingColumn("cidade/município"))?;

    let uf_col = headers
        .iter()
        .position(|h| h == "uf" || h == "estado")
        .ok_or(DataLoadError::MissingColumn("uf/estado"))?;

    Ok((city_col, uf_col))
}

/// Category headers are exact after trimming.
fn detect_category_columns(headers: &[String]) -> Result<(usize, usize), DataLoadError> {
    let label_col = headers
        .iter()
        .position(|h| h == LABEL_COLUMN)
        .ok_or(DataLoadError::MissingColumn(LABEL_COLUMN))?;

    let rate_col = headers
        .iter()
        .position(|h| h == RATE_COLUMN)
        .ok_or(DataLoadError::MissingColumn(RATE_COLUMN))?;

    Ok((label_col, rate_col))
}

fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn cell_rate(label: &str, cell: &Data) -> Result<f64, DataLoadError> {
    match cell {
        Data::Float(f) => Ok(*f),
        Data::Int(i) => Ok(*i as f64),
        Data::String(s) => parse_rate(label, s),
        other => Err(DataLoadError::BadRate(label.to_string(), other.to_string())),
    }
}

fn parse_rate(label: &str, raw: &str) -> Result<f64, DataLoadError> {
    // Brazilian sources sometimes write "150,00"
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| DataLoadError::BadRate(label.to_string(), raw.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================
