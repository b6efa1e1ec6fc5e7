use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::data::pivot::ChartSeries;

// ---------------------------------------------------------------------------
// Line chart description
// ---------------------------------------------------------------------------

/// Encoding of the long-form series as a line chart: year on a nominal x
/// axis, value on a quantitative y axis, one coloured line per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineChartSpec {
    pub x_field: String,
    pub y_field: String,
    pub color_field: String,
    pub x_title: String,
    pub y_title: String,
    pub height: f32,
}

impl Default for LineChartSpec {
    fn default() -> Self {
        Self {
            x_field: "year".to_string(),
            y_field: "gross".to_string(),
            color_field: "genre".to_string(),
            x_title: "Year".to_string(),
            y_title: "Gross earnings ($)".to_string(),
            height: 320.0,
        }
    }
}

impl LineChartSpec {
    /// Render as a Vega-Lite document with the data inlined.
    pub fn to_vega_lite(&self, series: &ChartSeries) -> Value {
        let values: Vec<Value> = series
            .iter()
            .map(|p| {
                let mut row = serde_json::Map::new();
                row.insert(self.x_field.clone(), json!(p.year));
                row.insert(self.color_field.clone(), json!(p.category));
                row.insert(self.y_field.clone(), json!(p.value));
                Value::Object(row)
            })
            .collect();

        json!({
            "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
            "data": { "values": values },
            "mark": "line",
            "encoding": {
                "x": { "field": self.x_field, "type": "nominal", "title": self.x_title },
                "y": { "field": self.y_field, "type": "quantitative", "title": self.y_title },
                "color": { "field": self.color_field, "type": "nominal" }
            },
            "height": self.height,
            "width": "container"
        })
    }
}

// ---------------------------------------------------------------------------
// Geometry for the native plot
// ---------------------------------------------------------------------------

/// Distinct years of the series, ascending. Index `i` is the x position of
/// `years[i]`, so the axis is ordinal: a gap of ten years takes the same
/// space as a gap of one.
pub fn year_axis(series: &ChartSeries) -> Vec<i64> {
    series
        .iter()
        .map(|p| p.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One polyline per category over the ordinal year axis, points ordered by
/// year ascending.
pub fn lines(series: &ChartSeries) -> BTreeMap<String, Vec<[f64; 2]>> {
    let axis = year_axis(series);
    let mut out: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for p in series {
        if let Ok(pos) = axis.binary_search(&p.year) {
            out.entry(p.category.clone())
                .or_default()
                .push([pos as f64, p.value]);
        }
    }
    for points in out.values_mut() {
        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    }
    out
}

/// Tick label for an ordinal x position: the year, or nothing between years.
pub fn year_label(axis: &[i64], position: f64) -> String {
    if position.fract() != 0.0 || position < 0.0 {
        return String::new();
    }
    axis.get(position as usize)
        .map(|y| y.to_string())
        .unwrap_or_default()
}
