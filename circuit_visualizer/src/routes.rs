use crate::parse::decode_circuit;
use crate::prelude::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use circuit_core::Diagnostic;
use circuit_core::layout::{Canvas, Layout, calculate_layout};
use serde_json::json;
use spice_format::Schematic;
use tower_http::cors::CorsLayer;

const INDEX_HTML: &str = include_str!("../static/index.html");

pub fn router(cx: Context) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/circuits", get(list_circuits))
        .route("/api/circuit/{id}", get(get_circuit))
        .route("/api/circuit/{id}/layout", get(get_layout))
        .route("/api/parse", post(parse_circuit))
        .layer(CorsLayer::permissive())
        .with_state(cx)
}

#[derive(Debug)]
pub enum ApiError {
    CircuitNotFound,
    Unprocessable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::CircuitNotFound => (StatusCode::NOT_FOUND, "Circuit not found".to_string()),
            ApiError::Unprocessable(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Serialize)]
struct CircuitList {
    circuits: Vec<String>,
}

#[derive(Serialize)]
struct Parsed {
    id: String,
    circuit: Schematic,
    diagnostics: Vec<Diagnostic>,
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn list_circuits(State(cx): State<Context>) -> Json<CircuitList> {
    cx.read()
        .await
        .ids()
        .pipe(|circuits| Json(CircuitList { circuits }))
}

async fn get_circuit(
    State(cx): State<Context>,
    Path(id): Path<String>,
) -> Result<Json<Schematic>, ApiError> {
    let cx = cx.read().await;
    let schematic = cx.circuit(&id).ok_or(ApiError::CircuitNotFound)?;
    Ok(Json(schematic.clone()))
}

async fn get_layout(
    State(cx): State<Context>,
    Path(id): Path<String>,
) -> Result<Json<Layout>, ApiError> {
    let cx = cx.read().await;
    let schematic = cx.circuit(&id).ok_or(ApiError::CircuitNotFound)?;
    Ok(Json(calculate_layout(schematic, Canvas::default())))
}

async fn parse_circuit(State(cx): State<Context>, body: String) -> Result<Json<Parsed>, ApiError> {
    let (circuit, diagnostics) = decode_circuit(&body)
        .tap_err(|e| warn!("Rejected pasted circuit: {e}"))
        .map_err(|e| ApiError::Unprocessable(format!("{e:#}")))?;
    let id = cx.write().await.add_parsed(circuit.clone());
    info!(
        "Stored {id} \"{}\" with {} diagnostics",
        circuit.name,
        diagnostics.len()
    );
    Ok(Json(Parsed {
        id,
        circuit,
        diagnostics,
    }))
}
