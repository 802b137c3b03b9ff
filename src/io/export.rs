//! Export the aligned master table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per reference date, one column per series/indicator,
//! missing cells left empty.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{ColumnKey, MasterTable};
use crate::error::AppError;

/// Write the master table to a CSV file.
pub fn write_table_csv(path: &Path, table: &MasterTable) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    let columns = ColumnKey::all();

    let mut header = String::from("date");
    for key in &columns {
        header.push(',');
        header.push_str(key.key());
    }
    writeln!(file, "{header}")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (row, date) in table.dates().iter().enumerate() {
        let mut line = date.to_string();
        for &key in &columns {
            line.push(',');
            if let Some(v) = table.value(key, row) {
                line.push_str(&format!("{v:.4}"));
            }
        }
        writeln!(file, "{line}")
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
