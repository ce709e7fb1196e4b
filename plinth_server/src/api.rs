use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use plinth_core::calculations::footing::DEFAULT_COLUMN_MM;
use plinth_core::calculations::{
    check_punching, crack_width_check, design_combined, design_footing, slab_deflection_check,
    CombinedFootingInput, CombinedFootingResult, CrackWidthInput, DeflectionInput, DrawingParams, FootingInput,
    FootingResult, PunchingInput, PunchingResult, ServiceabilityResult, StrapDetails,
};
use plinth_core::drawings::{generate_drawings, ColumnFootprint, DrawingSet, PlanLayout};
use plinth_core::{CalcError, DesignSettings, ReportSink};

const SERVICE_NAME: &str = "Plinth Footing Design Service";

/// Application state
pub struct AppState {
    settings: DesignSettings,
    reports: Arc<dyn ReportSink>,
}

impl AppState {
    pub fn new(settings: DesignSettings, reports: Arc<dyn ReportSink>) -> Self {
        Self { settings, reports }
    }

    fn sink(&self, write_reports: bool) -> Option<&dyn ReportSink> {
        write_reports.then(|| self.reports.as_ref())
    }
}

/// Build the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/v1/version", get(version_handler))
        .route("/api/v1/footing", post(footing_handler))
        .route("/api/v1/combined-footing", post(combined_footing_handler))
        .route("/api/v1/punching", post(punching_handler))
        .route("/api/v1/crack-width", post(crack_width_handler))
        .route("/api/v1/deflection", post(deflection_handler))
        .route("/api/v1/drawings", post(drawings_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Isolated footing request: the design input plus the report switch.
#[derive(Debug, Deserialize)]
pub struct FootingRequest {
    #[serde(flatten)]
    pub input: FootingInput,
    #[serde(default)]
    pub write_reports: bool,
}

/// Combined footing request: the design input plus the report switch.
#[derive(Debug, Deserialize)]
pub struct CombinedFootingRequest {
    #[serde(flatten)]
    pub input: CombinedFootingInput,
    #[serde(default)]
    pub write_reports: bool,
}

/// Drawing request: geometry from a previous design plus what sits on the pad.
#[derive(Debug, Deserialize)]
pub struct DrawingRequest {
    pub drawing_params: DrawingParams,
    #[serde(default)]
    pub columns: Vec<ColumnFootprint>,
    #[serde(default)]
    pub strap: Option<StrapDetails>,
}

/// Envelope returned by the design endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct DesignResponse<I, R> {
    pub job_id: String,
    pub timestamp: String,
    pub inputs: I,
    pub results: R,
}

impl<I, R> DesignResponse<I, R> {
    fn new(inputs: I, results: R) -> Self {
        DesignResponse {
            job_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            inputs,
            results,
        }
    }
}

/// Root endpoint
async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "description": "Isolated and combined pad footing design with punching and serviceability checks",
        "endpoints": [
            "POST /api/v1/footing",
            "POST /api/v1/combined-footing",
            "POST /api/v1/punching",
            "POST /api/v1/crack-width",
            "POST /api/v1/deflection",
            "POST /api/v1/drawings"
        ]
    }))
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Version endpoint
async fn version_handler() -> Json<serde_json::Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "engine": "plinth_core"
    }))
}

/// Size an isolated pad
async fn footing_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FootingRequest>,
) -> Result<Json<DesignResponse<FootingInput, FootingResult>>, ApiError> {
    tracing::info!(label = %request.input.label, pu_kn = request.input.pu_kn, "footing design request");

    let FootingRequest { input, write_reports } = request;
    let results = tokio::task::spawn_blocking(move || {
        design_footing(&input, &state.settings, state.sink(write_reports)).map(|r| (input, r))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Design task failed: {}", e)))??;

    Ok(Json(DesignResponse::new(results.0, results.1)))
}

/// Size a single or two-column combined pad
async fn combined_footing_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CombinedFootingRequest>,
) -> Result<Json<DesignResponse<CombinedFootingInput, CombinedFootingResult>>, ApiError> {
    tracing::info!(label = %request.input.label, mode = ?request.input.mode(), "combined footing request");

    let CombinedFootingRequest { input, write_reports } = request;
    let results = tokio::task::spawn_blocking(move || {
        design_combined(&input, &state.settings, state.sink(write_reports)).map(|r| (input, r))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Design task failed: {}", e)))??;

    Ok(Json(DesignResponse::new(results.0, results.1)))
}

async fn punching_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<PunchingInput>,
) -> Result<Json<PunchingResult>, ApiError> {
    Ok(Json(check_punching(&input, &state.settings)?))
}

async fn crack_width_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CrackWidthInput>,
) -> Result<Json<ServiceabilityResult>, ApiError> {
    Ok(Json(crack_width_check(&input, &state.settings)?))
}

async fn deflection_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<DeflectionInput>,
) -> Result<Json<ServiceabilityResult>, ApiError> {
    Ok(Json(slab_deflection_check(&input, &state.settings)?))
}

/// Render plan/elevation SVG and a takeoff for given drawing parameters
async fn drawings_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DrawingRequest>,
) -> Result<Json<DrawingSet>, ApiError> {
    let params = request.drawing_params;
    let layout = if request.columns.is_empty() {
        PlanLayout::single(params.pad_side_m, DEFAULT_COLUMN_MM, DEFAULT_COLUMN_MM)
    } else {
        PlanLayout {
            pad_side_m: params.pad_side_m,
            columns: request.columns,
            strap: request.strap,
        }
    };

    Ok(Json(generate_drawings(&layout, &params, &state.settings)))
}

/// API Errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Calc(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.error_code(), e.to_string()),
            ApiError::Calc(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.error_code(), e.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!(code, error = %message, "request failed");
        }

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use plinth_core::{CalcResult, ReportPaths};
    use serde_json::Value;
    use tower::ServiceExt;

    struct NullSink;

    impl ReportSink for NullSink {
        fn write_reports(&self, prefix: &str, _inputs: &Value, _results: &Value) -> CalcResult<ReportPaths> {
            Ok(ReportPaths {
                text_path: format!("{}.txt", prefix),
                html_path: format!("{}.html", prefix),
            })
        }
    }

    fn app() -> Router {
        create_router(AppState::new(DesignSettings::default(), Arc::new(NullSink)))
    }

    async fn send(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send("GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_version() {
        let (status, body) = send("GET", "/api/v1/version", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["api_version"], "v1");
    }

    #[tokio::test]
    async fn test_footing_design() {
        let request = json!({
            "label": "F-1",
            "Pu_kN": 2000.0,
            "soil_allow_kN_per_m2": 150.0,
            "pad_depth_mm": 500.0,
            "fc_MPa": 25.0,
            "fy_MPa": 415.0
        });
        let (status, body) = send("POST", "/api/v1/footing", Some(request)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"]["side_m"], 3.651);
        assert_eq!(body["inputs"]["label"], "F-1");
        assert!(body["results"].get("report_paths").is_none());
        assert!(body["job_id"].is_string());
    }

    #[tokio::test]
    async fn test_footing_design_with_reports() {
        let request = json!({
            "pu_kn": 800.0,
            "soil_allow_kn_per_m2": 200.0,
            "pad_depth_mm": 450.0,
            "fc_mpa": 25.0,
            "fy_mpa": 415.0,
            "write_reports": true
        });
        let (status, body) = send("POST", "/api/v1/footing", Some(request)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"]["report_paths"]["text_path"], "footing.txt");
    }

    #[tokio::test]
    async fn test_invalid_soil_is_bad_request() {
        let request = json!({
            "pu_kn": 800.0,
            "soil_allow_kn_per_m2": 0.0,
            "pad_depth_mm": 450.0,
            "fc_mpa": 25.0,
            "fy_mpa": 415.0
        });
        let (status, body) = send("POST", "/api/v1/footing", Some(request)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
        assert!(body["error"].as_str().unwrap().contains("soil_allow"));
    }

    #[tokio::test]
    async fn test_combined_two_column() {
        let request = json!({ "P1_kN": 600.0, "P2_kN": 900.0, "spacing_m": 2.5 });
        let (status, body) = send("POST", "/api/v1/combined-footing", Some(request)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"]["mode"], "two_column");
        assert_eq!(body["results"]["total_load_kn"], 1500.0);
        assert!(body["results"]["takeoff"]["total_bars"].is_u64());
    }

    #[tokio::test]
    async fn test_combined_missing_load_is_bad_request() {
        let (status, body) = send("POST", "/api/v1/combined-footing", Some(json!({ "P1_kN": 600.0 }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_FIELD");
    }

    #[tokio::test]
    async fn test_punching_endpoint() {
        let request = json!({
            "pu_kn": 2000.0,
            "col_b_mm": 400.0,
            "col_d_mm": 400.0,
            "pad_depth_mm": 500.0,
            "fc_mpa": 25.0
        });
        let (status, body) = send("POST", "/api/v1/punching", Some(request)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["b0_mm"], 3200.0);
        assert_eq!(body["punching_safe"], false);
    }

    #[tokio::test]
    async fn test_serviceability_endpoints() {
        let crack = json!({ "spacing_mm": 150.0, "cover_mm": 25.0, "steel_stress_mpa": 207.5 });
        let (status, body) = send("POST", "/api/v1/crack-width", Some(crack)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["check"], "crack_width");

        let deflection = json!({ "span_m": 4.0, "thickness_mm": 200.0, "load_kn_per_m": 10.0 });
        let (status, body) = send("POST", "/api/v1/deflection", Some(deflection)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["allowable_mm"], 16.0);
        assert_eq!(body["passes"], false);

        let bad = json!({ "span_m": 0.0, "thickness_mm": 200.0, "load_kn_per_m": 10.0 });
        let (status, _) = send("POST", "/api/v1/deflection", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_drawings_endpoint() {
        let request = json!({
            "drawing_params": {
                "pad_side_m": 1.414,
                "pad_depth_mm": 500.0,
                "cover_mm": 25.0,
                "bar_dia_mm": 10.0,
                "n_per_row": 39,
                "n_layers": 2,
                "spacing_mm": 150.0
            }
        });
        let (status, body) = send("POST", "/api/v1/drawings", Some(request)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["plan_svg"].as_str().unwrap().starts_with("<svg"));
        assert_eq!(body["takeoff"]["total_bars"], 78);
    }
}
