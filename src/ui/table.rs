use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::pivot::PivotTable;

// ---------------------------------------------------------------------------
// Pivot table (central panel, above the chart)
// ---------------------------------------------------------------------------

/// Render the pivot table as-is: rows in table order, year shown as text.
pub fn pivot_table(ui: &mut Ui, table: &PivotTable, max_height: f32) {
    if table.is_empty() {
        ui.label("No rows match the current selection.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(60.0))
        .columns(Column::auto().at_least(100.0), table.column_count())
        .min_scrolled_height(0.0)
        .max_scroll_height(max_height)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Year");
            });
            for category in &table.categories {
                header.col(|ui| {
                    ui.strong(category);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.row_count(), |mut row| {
                let idx = row.index();
                row.col(|ui| {
                    ui.label(table.years[idx].to_string());
                });
                for value in &table.cells[idx] {
                    row.col(|ui| {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(format_value(*value));
                        });
                    });
                }
            });
        });
}

/// Whole numbers print with thousands separators, anything else with two decimals.
fn format_value(v: f64) -> String {
    if v.fract() != 0.0 || v.abs() >= 1e15 {
        return format!("{v:.2}");
    }
    let digits = format!("{}", v.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if v < 0.0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(150.0), "150");
        assert_eq!(format_value(1234567.0), "1,234,567");
        assert_eq!(format_value(-1000.0), "-1,000");
        assert_eq!(format_value(30.5), "30.50");
    }
}
