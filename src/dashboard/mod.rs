// src/dashboard/mod.rs

pub mod figure;
pub mod page;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::table::CanonicalTable;
pub use figure::Figure;
pub use page::IndexTemplate;

/// Read-only state shared by every handler.
pub struct AppState {
    pub table: Arc<CanonicalTable>,
    pub page_title: String,
    pub default_region: Option<String>,
}

impl AppState {
    /// `preferred` is used as the default selection only if the table has it;
    /// otherwise the first region (alphabetically) is.
    pub fn new(table: Arc<CanonicalTable>, page_title: String, preferred: &str) -> Self {
        let default_region = if table.contains_region(preferred) {
            Some(preferred.to_string())
        } else {
            table.regions().into_iter().next()
        };
        Self {
            table,
            page_title,
            default_region,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    pub regions: Vec<String>,
    pub default: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FigureQuery {
    pub region: Option<String>,
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, StatusCode> {
    let regions = state.table.regions();
    IndexTemplate::new(&state.page_title, &regions, state.default_region.as_deref())
        .render()
        .map(Html)
        .map_err(|err| {
            error!("rendering index failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

async fn regions(State(state): State<Arc<AppState>>) -> Json<RegionsResponse> {
    Json(RegionsResponse {
        regions: state.table.regions(),
        default: state.default_region.clone(),
    })
}

async fn figure(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FigureQuery>,
) -> Json<Figure> {
    let fig = match q.region.or_else(|| state.default_region.clone()) {
        Some(region) => Figure::for_region(&state.table, &region),
        None => Figure::empty(),
    };
    debug!(title = %fig.layout.title.text, traces = fig.data.len(), "figure requested");
    Json(fig)
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "records": state.table.len(),
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/regions", get(regions))
        .route("/api/figure", get(figure))
        .route("/healthz", get(health_check))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Dashboard: http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use crate::table::CanonicalRecord;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn rec(day: u32, region: &str, subregion: &str, pct: f64) -> CanonicalRecord {
        CanonicalRecord {
            date: NaiveDate::from_ymd_opt(2021, 5, day).unwrap(),
            region: region.into(),
            subregion: subregion.into(),
            completion_pct: pct,
        }
    }

    fn state(preferred: &str) -> Arc<AppState> {
        let table = CanonicalTable::new(vec![
            rec(1, "OH", "Franklin", 30.0),
            rec(1, "IN", "Marion", 40.0),
            rec(2, "IN", "Marion", 41.0),
        ]);
        Arc::new(AppState::new(
            Arc::new(table),
            "US Vaccination Dashboard".into(),
            preferred,
        ))
    }

    async fn get_json(app: Router, uri: &str) -> serde_json::Value {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_default_region_falls_back_to_first() {
        assert_eq!(state("IN").default_region.as_deref(), Some("IN"));
        assert_eq!(state("TX").default_region.as_deref(), Some("IN"));

        let empty = AppState::new(Arc::new(CanonicalTable::default()), "t".into(), "IN");
        assert_eq!(empty.default_region, None);
    }

    #[tokio::test]
    async fn test_regions_endpoint() {
        init_test_logging();
        let json = get_json(router(state("OH")), "/api/regions").await;
        assert_eq!(json["regions"], serde_json::json!(["IN", "OH"]));
        assert_eq!(json["default"], "OH");
    }

    #[tokio::test]
    async fn test_figure_endpoint_filters_by_region() {
        init_test_logging();
        let json = get_json(router(state("IN")), "/api/figure?region=OH").await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["name"], "Franklin");

        // no region: the default is charted
        let json = get_json(router(state("IN")), "/api/figure").await;
        assert_eq!(json["data"][0]["name"], "Marion");
        assert_eq!(json["data"][0]["y"], serde_json::json!([40.0, 41.0]));
    }

    #[tokio::test]
    async fn test_figure_without_any_region_is_empty() {
        let table = CanonicalTable::new(vec![rec(1, "", "", 5.0)]);
        let state = Arc::new(AppState::new(Arc::new(table), "t".into(), "IN"));
        assert_eq!(state.default_region, None);

        let json = get_json(router(state), "/api/figure").await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_and_health() {
        let app = router(state("IN"));
        let resp = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(r#"<option value="IN" selected>IN</option>"#));

        let json = get_json(app, "/healthz").await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["records"], 3);
    }
}
