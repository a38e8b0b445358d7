// src/dashboard/page.rs

use askama::Template;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// The dashboard page: heading, state dropdown, chart. The chart is filled
/// from `/api/figure` on load and on every selection change.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    pub plotly_js: &'a str,
    pub regions: &'a [String],
    /// Empty when nothing is preselected.
    pub selected: &'a str,
}

impl<'a> IndexTemplate<'a> {
    pub fn new(title: &'a str, regions: &'a [String], selected: Option<&'a str>) -> Self {
        Self {
            title,
            plotly_js: PLOTLY_JS,
            regions,
            selected: selected.unwrap_or(""),
        }
    }
}
