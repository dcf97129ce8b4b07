use super::{write_atomically, CsvExporter, RenderError};
use std::path::PathBuf;

/// Writes CSV files relative to the export directory
pub struct CsvFileWriter {
    base_path: PathBuf,
}

impl CsvFileWriter {
    pub fn new(export_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: export_path.into(),
        }
    }
}

impl CsvExporter for CsvFileWriter {
    fn write_csv(&self, file_name: &str, rows: &[Vec<String>]) -> Result<PathBuf, RenderError> {
        let mut writer = csv::WriterBuilder::new().flexible(false).from_writer(Vec::new());

        for row in rows {
            writer.write_record(row)?;
        }

        let bytes = writer.into_inner().map_err(|e| RenderError::Io(e.into_error()))?;

        let path = self.base_path.join(file_name);
        write_atomically(&path, &bytes)?;

        log::info!("💾 Wrote {} CSV rows to {}", rows.len().saturating_sub(1), path.display());
        Ok(path)
    }
}
