use crate::core::{CqlError, Row};

/// Renders rows as a two-space indented JSON array, one object per row.
///
/// Row order and per-row column order are kept exactly as returned.
pub fn render_json(rows: &[Row]) -> Result<String, CqlError> {
    serde_json::to_string_pretty(rows).map_err(|e| CqlError::Formatting(e.to_string()))
}
