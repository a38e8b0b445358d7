// src/dashboard/figure.rs
//
// Plotly figure JSON for one region: a line per county.

use chrono::NaiveDate;
use serde::Serialize;

use crate::table::CanonicalTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub text: String,
}

impl Text {
    fn new(s: impl Into<String>) -> Self {
        Self { text: s.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Text,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub legend: Legend,
}

impl Layout {
    fn titled(title: String) -> Self {
        Self {
            title: Text::new(title),
            xaxis: Axis {
                title: Text::new("Date"),
            },
            yaxis: Axis {
                title: Text::new("Vaccination Rate (%)"),
            },
            legend: Legend {
                title: Text::new("County"),
            },
        }
    }
}

impl Figure {
    /// No traces; shown when there is no region to chart.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            layout: Layout::titled("Vaccination Over Time".to_string()),
        }
    }

    /// One `lines` trace per subregion, in order of first appearance, points
    /// in record order. An unknown region gives a figure with no traces.
    pub fn for_region(table: &CanonicalTable, region: &str) -> Self {
        let mut data: Vec<Trace> = Vec::new();
        for rec in table.filter_region(region) {
            let idx = match data.iter().position(|t| t.name == rec.subregion) {
                Some(idx) => idx,
                None => {
                    data.push(Trace {
                        kind: "scatter",
                        mode: "lines",
                        name: rec.subregion.clone(),
                        x: Vec::new(),
                        y: Vec::new(),
                    });
                    data.len() - 1
                }
            };
            data[idx].x.push(rec.date);
            data[idx].y.push(rec.completion_pct);
        }

        Self {
            data,
            layout: Layout::titled(format!("Vaccination Over Time in {}", region)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CanonicalRecord;

    fn rec(day: u32, region: &str, subregion: &str, pct: f64) -> CanonicalRecord {
        CanonicalRecord {
            date: NaiveDate::from_ymd_opt(2021, 5, day).unwrap(),
            region: region.into(),
            subregion: subregion.into(),
            completion_pct: pct,
        }
    }

    #[test]
    fn test_traces_grouped_by_subregion() {
        let table = CanonicalTable::new(vec![
            rec(1, "IN", "Marion", 40.0),
            rec(1, "IN", "Lake", 10.0),
            rec(1, "OH", "Franklin", 30.0),
            rec(2, "IN", "Marion", 41.0),
        ]);

        let fig = Figure::for_region(&table, "IN");

        assert_eq!(fig.data.len(), 2);
        assert_eq!(fig.data[0].name, "Marion");
        assert_eq!(fig.data[0].y, vec![40.0, 41.0]);
        assert_eq!(fig.data[1].name, "Lake");
        assert_eq!(fig.layout.title.text, "Vaccination Over Time in IN");
    }

    #[test]
    fn test_figure_json_shape() {
        let table = CanonicalTable::new(vec![rec(1, "IN", "Marion", 42.5)]);
        let json = serde_json::to_value(Figure::for_region(&table, "IN")).unwrap();

        assert_eq!(json["data"][0]["type"], "scatter");
        assert_eq!(json["data"][0]["mode"], "lines");
        assert_eq!(json["data"][0]["x"][0], "2021-05-01");
        assert_eq!(json["data"][0]["y"][0], 42.5);
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "Vaccination Rate (%)");
        assert_eq!(json["layout"]["legend"]["title"]["text"], "County");
    }

    #[test]
    fn test_unknown_region_is_empty() {
        let table = CanonicalTable::new(vec![rec(1, "IN", "Marion", 42.5)]);
        assert!(Figure::for_region(&table, "TX").data.is_empty());
    }

    #[test]
    fn test_empty_figure_has_generic_title() {
        let json = serde_json::to_value(Figure::empty()).unwrap();
        assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
        assert_eq!(json["layout"]["title"]["text"], "Vaccination Over Time");
    }
}
