//! Rendering seams for finished datasets
//!
//! Aggregators hand a fully ordered dataset to exactly one renderer call.
//! Renderers are synchronous and own no concurrency.

pub mod chart_writer;
pub mod csv_writer;

pub use chart_writer::JsonChartWriter;
pub use csv_writer::CsvFileWriter;

use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum RenderError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Csv(csv::Error),
    InvalidData(String),
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Serialization(err)
    }
}

impl From<csv::Error> for RenderError {
    fn from(err: csv::Error) -> Self {
        RenderError::Csv(err)
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "IO error: {}", e),
            RenderError::Serialization(e) => write!(f, "Serialization error: {}", e),
            RenderError::Csv(e) => write!(f, "CSV error: {}", e),
            RenderError::InvalidData(msg) => write!(f, "Invalid chart data: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Line chart over a numeric X axis (block numbers)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuousChart {
    pub file_name: String,
    pub series_title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    pub details: Vec<String>,
}

/// Line chart over calendar dates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesChart {
    pub file_name: String,
    pub series_title: String,
    pub x_label: String,
    pub y_label: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarValue {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub file_name: String,
    pub title: String,
    pub y_label: String,
    pub bars: Vec<BarValue>,
}

pub trait ChartRenderer: Send + Sync {
    fn render_continuous(&self, chart: &ContinuousChart) -> Result<PathBuf, RenderError>;

    fn render_time_series(&self, chart: &TimeSeriesChart) -> Result<PathBuf, RenderError>;

    fn render_bar_chart(&self, chart: &BarChart) -> Result<PathBuf, RenderError>;
}

pub trait CsvExporter: Send + Sync {
    /// Write all rows (header first) and return the final path
    fn write_csv(&self, file_name: &str, rows: &[Vec<String>]) -> Result<PathBuf, RenderError>;
}

/// Write to a sibling temp file then rename, so readers never see a
/// half-written artifact
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), RenderError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".partial");
    let tmp_path = PathBuf::from(tmp_name);

    let result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(RenderError::Io(e));
    }

    Ok(())
}
