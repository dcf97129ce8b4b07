//! JSON chart documents
//!
//! Each chart is written as `<export>/charts/<file_name>.json`: the series,
//! axis labels and detail annotations a plotting front-end needs.

use super::{write_atomically, BarChart, ChartRenderer, ContinuousChart, RenderError, TimeSeriesChart};
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct ChartDocument<'a, C: Serialize> {
    kind: &'static str,
    rendered_at: i64,
    chart: &'a C,
}

pub struct JsonChartWriter {
    base_path: PathBuf,
}

impl JsonChartWriter {
    pub fn new(export_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: export_path.into().join("charts"),
        }
    }

    fn chart_path(&self, file_name: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", file_name))
    }

    fn write<C>(&self, kind: &'static str, file_name: &str, chart: &C) -> Result<PathBuf, RenderError>
    where
        C: Serialize,
    {
        let document = ChartDocument {
            kind,
            rendered_at: Utc::now().timestamp(),
            chart,
        };

        let json = serde_json::to_vec_pretty(&document)?;
        let path = self.chart_path(file_name);
        write_atomically(&path, &json)?;

        log::info!("📈 Wrote {} chart to {}", kind, path.display());
        Ok(path)
    }
}

impl ChartRenderer for JsonChartWriter {
    fn render_continuous(&self, chart: &ContinuousChart) -> Result<PathBuf, RenderError> {
        if chart.x_values.len() != chart.y_values.len() {
            return Err(RenderError::InvalidData(format!(
                "{} x values but {} y values",
                chart.x_values.len(),
                chart.y_values.len()
            )));
        }
        self.write("continuous", &chart.file_name, chart)
    }

    fn render_time_series(&self, chart: &TimeSeriesChart) -> Result<PathBuf, RenderError> {
        if chart.dates.len() != chart.values.len() {
            return Err(RenderError::InvalidData(format!(
                "{} dates but {} values",
                chart.dates.len(),
                chart.values.len()
            )));
        }
        self.write("time_series", &chart.file_name, chart)
    }

    fn render_bar_chart(&self, chart: &BarChart) -> Result<PathBuf, RenderError> {
        self.write("bar", &chart.file_name, chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::BarValue;
    use tempfile::TempDir;

    #[test]
    fn test_continuous_chart_document() {
        let dir = TempDir::new().unwrap();
        let writer = JsonChartWriter::new(dir.path());

        let chart = ContinuousChart {
            file_name: "shard-0-block-10-to-12".to_string(),
            series_title: "Transactions Per Second".to_string(),
            x_label: "Block #".to_string(),
            y_label: "Transactions Per Second".to_string(),
            x_values: vec![10.0, 11.0],
            y_values: vec![0.0, 2.0],
            details: vec!["Shard: 0".to_string()],
        };

        let path = writer.render_continuous(&chart).unwrap();
        assert_eq!(path, dir.path().join("charts").join("shard-0-block-10-to-12.json"));

        let doc: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(doc["kind"], "continuous");
        assert_eq!(doc["chart"]["x_values"][1], 11.0);
        assert_eq!(doc["chart"]["details"][0], "Shard: 0");
    }

    #[test]
    fn test_mismatched_series_is_rejected() {
        let dir = TempDir::new().unwrap();
        let writer = JsonChartWriter::new(dir.path());

        let chart = ContinuousChart {
            file_name: "broken".to_string(),
            series_title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x_values: vec![1.0],
            y_values: vec![],
            details: vec![],
        };

        assert!(matches!(writer.render_continuous(&chart), Err(RenderError::InvalidData(_))));
        assert!(!dir.path().join("charts").join("broken.json").exists());
    }

    #[test]
    fn test_bar_chart_in_subdirectory() {
        let dir = TempDir::new().unwrap();
        let writer = JsonChartWriter::new(dir.path());

        let chart = BarChart {
            file_name: "validators/mainnet-leaderboard".to_string(),
            title: "Leaderboard".to_string(),
            y_label: "Rewards".to_string(),
            bars: vec![BarValue { label: "a".to_string(), value: 3.0 }],
        };

        let path = writer.render_bar_chart(&chart).unwrap();
        assert!(path.ends_with("charts/validators/mainnet-leaderboard.json"));
        assert!(path.exists());
    }
}
