//! CSV export of the current result set.
//!
//! One row per label. Values and targets use plain decimal formatting
//! (integral values print without a fraction, no thousands separators);
//! growth is fixed to one decimal place. Missing cells are left empty.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use crate::net::types::ResultData;

pub const CSV_HEADER: [&str; 4] = ["Month", "Value", "Growth (%)", "Target"];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv flush failed: {0}")]
    Flush(String),
    #[error("csv output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render `data` as CSV text, header row first.
///
/// # Errors
///
/// Returns an error only if the CSV writer fails, which does not happen for
/// in-memory output in practice.
pub fn results_to_csv(data: &ResultData) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for (i, label) in data.labels.iter().enumerate() {
        let value = data.values.get(i).map(|v| format_number(*v)).unwrap_or_default();
        let growth = column_cell(data.growth.as_deref(), i, |v| format!("{v:.1}"));
        let target = column_cell(data.target.as_deref(), i, format_number);
        writer.write_record([label.as_str(), value.as_str(), growth.as_str(), target.as_str()])?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download name for an export made on `date`, e.g. `analytics_data_2024-03-01.csv`.
#[must_use]
pub fn export_file_name(date: time::Date) -> String {
    format!("analytics_data_{date}.csv")
}

/// [`export_file_name`] for today's UTC date.
#[must_use]
pub fn default_export_file_name() -> String {
    export_file_name(time::OffsetDateTime::now_utc().date())
}

fn column_cell(column: Option<&[f64]>, i: usize, fmt: impl Fn(f64) -> String) -> String {
    column.and_then(|c| c.get(i)).map(|v| fmt(*v)).unwrap_or_default()
}

fn format_number(v: f64) -> String {
    format!("{v}")
}
