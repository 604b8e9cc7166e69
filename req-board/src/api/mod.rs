//! HTTP API layer exposing record CRUD endpoints for each collection.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use bytes::Bytes;
use req_board_core::record::{CollectionName, Fields, Record};
use req_board_core::storage::json::JsonStore;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

/// Shared application state containing the record store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<JsonStore>>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            ApiError::Internal(err) => {
                error!("Error writing store: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

pub fn router(store: Arc<RwLock<JsonStore>>) -> Router {
    let app_state = AppState { store };
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/{collection}", get(list_records).post(create_record))
        .route(
            "/{collection}/{id}",
            put(update_record).delete(delete_record),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::map_response(cors_headers))
                .layer(cors),
        )
        .with_state(app_state)
}

/// Stamp the cross-origin headers on every response, errors included.
async fn cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn resolve(collection: &str) -> Result<CollectionName, ApiError> {
    CollectionName::from_name(collection).ok_or(ApiError::NotFound)
}

/// Parse a request body into record fields. Only a JSON object is accepted.
fn parse_fields(body: &[u8]) -> Result<Fields, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ApiError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
        Err(err) => Err(ApiError::BadRequest(format!("Malformed JSON body: {err}"))),
    }
}

async fn list_records(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let collection = resolve(&collection)?;
    let store = state.store.read().await;
    Ok(Json(store.list(collection).to_vec()))
}

async fn create_record(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let collection = resolve(&collection)?;
    let fields = parse_fields(&body)?;
    let mut store = state.store.write().await;
    let record = store.insert(collection, fields)?;
    info!("Created {} record {}", collection, record.id().unwrap_or_default());
    Ok(StatusCode::CREATED)
}

async fn update_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Record>, ApiError> {
    let collection = resolve(&collection)?;
    let fields = parse_fields(&body)?;
    let mut store = state.store.write().await;
    match store.replace(collection, &id, fields)? {
        Some(record) => {
            info!("Updated {} record {}", collection, id);
            Ok(Json(record))
        }
        None => Err(ApiError::NotFound),
    }
}

async fn delete_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let collection = resolve(&collection)?;
    let mut store = state.store.write().await;
    match store.remove(collection, &id)? {
        Some(_) => {
            info!("Deleted {} record {}", collection, id);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound),
    }
}
