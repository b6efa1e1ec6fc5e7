use std::io::Write;

use anyhow::{Context, Result};

use crate::chart::LineChartSpec;
use crate::data::pivot::{ChartSeries, PivotTable};

/// Write the pivot table as CSV: a `year` column followed by one column per
/// category, rows in table order.
pub fn write_table_csv<W: Write>(table: &PivotTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["year".to_string()];
    header.extend(table.categories.iter().cloned());
    wtr.write_record(&header).context("writing CSV header")?;

    for (year, row) in table.years.iter().zip(&table.cells) {
        let mut record = vec![year.to_string()];
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record)
            .with_context(|| format!("writing CSV row for {year}"))?;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(())
}

/// Write the chart as a pretty-printed Vega-Lite document.
pub fn write_chart_spec<W: Write>(spec: &LineChartSpec, series: &ChartSeries, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &spec.to_vega_lite(series))
        .context("writing chart spec")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use crate::data::pivot::{pivot, unpivot};

    fn table() -> PivotTable {
        pivot(&[
            Record::new("Action", 2000, 150.0),
            Record::new("Drama", 2001, 30.5),
        ])
    }

    #[test]
    fn test_table_csv() {
        let mut buf = Vec::new();
        write_table_csv(&table(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "year,Action,Drama\n2001,0,30.5\n2000,150,0\n");
    }

    #[test]
    fn test_empty_table_csv_has_only_header() {
        let mut buf = Vec::new();
        write_table_csv(&PivotTable::default(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "year\n");
    }

    #[test]
    fn test_chart_spec_json() {
        let t = table();
        let mut buf = Vec::new();
        write_chart_spec(&LineChartSpec::default(), &unpivot(&t), &mut buf).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(doc["data"]["values"].as_array().unwrap().len(), 4);
    }
}
