//! Table builder wrapper around comfy-table for per-unit coverage.

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets};

use crate::domain::models::UnitCoverage;

/// Create a standard list table with the given headers.
///
/// Uses the NOTHING preset (no borders) for a clean CLI aesthetic.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// One row per unit, in reporter order.
pub fn unit_table(units: &[UnitCoverage]) -> Table {
    let mut table = list_table(&["location", "function", "coverage"]);
    for unit in units {
        table.add_row(vec![
            Cell::new(&unit.location),
            Cell::new(unit.name.as_deref().unwrap_or("-")),
            Cell::new(format!("{:.1}%", unit.percent)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_rows_render() {
        let units = vec![
            UnitCoverage {
                location: "vm/vm.go:52:".to_string(),
                name: Some("Run".to_string()),
                percent: 93.1,
            },
            UnitCoverage {
                location: "parser/parser.go".to_string(),
                name: None,
                percent: 100.0,
            },
        ];
        let rendered = unit_table(&units).to_string();
        assert!(rendered.contains("LOCATION"));
        assert!(rendered.contains("Run"));
        assert!(rendered.contains("93.1%"));
        assert!(rendered.contains("100.0%"));
    }
}
