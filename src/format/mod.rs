// Result rendering: JSON (default) and bordered text tables
mod json;
mod table;

use crate::core::{CqlError, Row};
use clap::ValueEnum;
use serde::Deserialize;

pub use json::render_json;
pub use table::render_table;

/// How returned rows are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented JSON array of objects
    #[default]
    Json,
    /// Text table with one column per CQL column
    Table,
}

pub fn render_rows(rows: &[Row], format: OutputFormat) -> Result<String, CqlError> {
    match format {
        OutputFormat::Json => render_json(rows),
        OutputFormat::Table => Ok(render_table(rows)),
    }
}
