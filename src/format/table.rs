use crate::core::Row;
use comfy_table::{Cell, Table, presets::UTF8_FULL};

/// Renders rows as a text table followed by a row count.
///
/// Column headers come from the first row; every row of a single result
/// carries the same columns.
pub fn render_table(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return "(0 rows)".to_string();
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(first.column_names().map(Cell::new));

    for row in rows {
        table.add_row(row.columns.iter().map(|(_, value)| {
            if value.is_null() {
                Cell::new("")
            } else {
                Cell::new(value)
            }
        }));
    }

    format!("{table}\n({} rows)", rows.len())
}
