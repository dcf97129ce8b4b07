//! Validator analyze report
//!
//! Listing → elected stage → balance stage → field filter, then an optional
//! CSV export of whatever matched.

use super::engine::ValidatorEngine;
use super::export::{csv_rows, export_file_name};
use super::ValidatorResult;
use crate::config::{ExportFormat, ValidatorConfig};
use crate::error::StatsError;
use crate::render::CsvExporter;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AnalyzeReport {
    /// Validators in the base listing
    pub checked: usize,
    /// Validators left after every stage, in listing order
    pub results: Vec<ValidatorResult>,
    pub csv_path: Option<PathBuf>,
}

impl AnalyzeReport {
    pub fn matching(&self) -> usize {
        self.results.len()
    }

    pub fn balance_failures(&self) -> usize {
        self.results.iter().filter(|r| !r.is_error_free()).count()
    }
}

pub struct ValidatorAnalyzer {
    engine: ValidatorEngine,
    exporter: Arc<dyn CsvExporter>,
    config: ValidatorConfig,
    export_format: Option<ExportFormat>,
}

impl ValidatorAnalyzer {
    pub fn new(
        engine: ValidatorEngine,
        exporter: Arc<dyn CsvExporter>,
        config: ValidatorConfig,
        export_format: Option<ExportFormat>,
    ) -> Self {
        Self {
            engine,
            exporter,
            config,
            export_format,
        }
    }

    pub async fn run(&self) -> Result<AnalyzeReport, StatsError> {
        log::info!("🔍 Analyzing validators");
        log::info!("   ├─ Elected only: {}", self.config.elected);
        log::info!("   ├─ Balances: {}", self.config.balances);
        log::info!("   └─ Filter active: {}", self.config.filter.is_active());

        let listing = self.engine.listing().await?;
        let checked = listing.len();

        let results = self
            .engine
            .aggregate(listing, self.config.elected, self.config.balances, &self.config.filter)
            .await;

        log::info!("📊 Total checked number of validators: {}", checked);
        log::info!("   └─ Matching filter: {}", results.len());

        let csv_path = match self.export_format {
            Some(ExportFormat::Csv) => {
                let rows = csv_rows(&results, self.config.balances);
                let path = self.exporter.write_csv(&export_file_name(Utc::now()), &rows)?;
                log::info!("✅ Exported validator data to {}", path.display());
                Some(path)
            }
            None => None,
        };

        Ok(AnalyzeReport {
            checked,
            results,
            csv_path,
        })
    }
}
