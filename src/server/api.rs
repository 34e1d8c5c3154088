//! HTTP handlers.
//!
//! Every handler negotiates the response format from the request headers,
//! asks the navigator for a document and renders it.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::AppState;
use crate::navigator::Document;
use crate::prelude::NavigatorError;
use crate::render::Format;

/// Build the router with all endpoints.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/query_manager", get(query_manager))
        .route("/{schema}/tables", get(tables))
        .route("/{schema}/tables/{table}", get(table))
        .route(
            "/{schema}/tables/{table}/stats",
            get(table_stats).post(refresh_table_stats),
        )
        .route(
            "/{schema}/tables/{table}/columns/{column}/stats",
            get(column_stats).post(refresh_column_stats),
        )
}

// === Request/Response types ===

#[derive(Deserialize)]
struct IndexParams {
    #[serde(default)]
    q: Option<String>,
}

#[derive(Deserialize)]
struct QueryParams {
    #[serde(default)]
    query: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// A failed request, rendered in the format the client asked for
struct ApiError {
    format: Format,
    error: NavigatorError,
}

impl ApiError {
    fn wrap(format: Format) -> impl Fn(NavigatorError) -> ApiError {
        move |error| ApiError { format, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.error {
            NavigatorError::NotFound { .. } => StatusCode::NOT_FOUND,
            NavigatorError::MalformedQuery(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(status = %status, error = %self.error, "Request failed");
        } else {
            debug!(status = %status, error = %self.error, "Request rejected");
        }

        let message = self.error.to_string();
        match self.format {
            Format::Json => (status, Json(ErrorResponse { error: message })).into_response(),
            Format::Html => (status, message).into_response(),
        }
    }
}

type ApiResult = Result<Response, ApiError>;

/// Pick the response format from request headers
///
/// JSON when the request body or `Accept` header is JSON, or when the
/// request was made by a script (`X-Requested-With: XMLHttpRequest`).
pub fn negotiate(headers: &HeaderMap) -> Format {
    let names_json = |name: header::HeaderName| {
        headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.to_ascii_lowercase().contains("application/json"))
    };

    let is_xhr = headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("xmlhttprequest"));

    if names_json(header::CONTENT_TYPE) || names_json(header::ACCEPT) || is_xhr {
        Format::Json
    } else {
        Format::Html
    }
}

fn render(state: &AppState, format: Format, document: Document) -> ApiResult {
    let renderer = state.renderers.get(format);
    let body = renderer
        .render(&document)
        .map_err(ApiError::wrap(format))?;
    Ok(([(header::CONTENT_TYPE, renderer.content_type())], body).into_response())
}

// === Handlers ===

/// GET /health - Health check with version
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET / - Schema list, or search results when `q` is given
async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<IndexParams>,
) -> ApiResult {
    let format = negotiate(&headers);
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let document: Document = match query {
        Some(query) => state
            .navigator
            .search(&query)
            .await
            .map_err(ApiError::wrap(format))?
            .into(),
        None => state
            .navigator
            .schemas()
            .await
            .map_err(ApiError::wrap(format))?
            .into(),
    };

    render(&state, format, document)
}

/// GET /{schema}/tables
async fn tables(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(schema): Path<String>,
) -> ApiResult {
    let format = negotiate(&headers);
    let document = state
        .navigator
        .tables(&schema)
        .await
        .map_err(ApiError::wrap(format))?;
    render(&state, format, document.into())
}

/// GET /{schema}/tables/{table}
async fn table(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((schema, table)): Path<(String, String)>,
) -> ApiResult {
    let format = negotiate(&headers);
    let document = state
        .navigator
        .table(&schema, &table)
        .await
        .map_err(ApiError::wrap(format))?;
    render(&state, format, document.into())
}

/// GET /{schema}/tables/{table}/stats
async fn table_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((schema, table)): Path<(String, String)>,
) -> ApiResult {
    let format = negotiate(&headers);
    let document = state
        .navigator
        .table_stats(&schema, &table)
        .await
        .map_err(ApiError::wrap(format))?;
    render(&state, format, document.into())
}

/// POST /{schema}/tables/{table}/stats - Analyze a table
async fn refresh_table_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((schema, table)): Path<(String, String)>,
) -> ApiResult {
    let format = negotiate(&headers);
    state
        .navigator
        .refresh_table_stats(&schema, &table)
        .await
        .map_err(ApiError::wrap(format))?;
    Ok(StatusCode::OK.into_response())
}

/// GET /{schema}/tables/{table}/columns/{column}/stats
async fn column_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((schema, table, column)): Path<(String, String, String)>,
) -> ApiResult {
    let format = negotiate(&headers);
    let document = state
        .navigator
        .column_stats(&schema, &table, &column)
        .await
        .map_err(ApiError::wrap(format))?;
    render(&state, format, document.into())
}

/// POST /{schema}/tables/{table}/columns/{column}/stats - Analyze one column
async fn refresh_column_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((schema, table, column)): Path<(String, String, String)>,
) -> ApiResult {
    let format = negotiate(&headers);
    state
        .navigator
        .refresh_column_stats(&schema, &table, &column)
        .await
        .map_err(ApiError::wrap(format))?;
    Ok(StatusCode::OK.into_response())
}

/// GET /query_manager?query=... - Run an ad-hoc query and roll it back
async fn query_manager(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> ApiResult {
    let format = negotiate(&headers);
    let document = state
        .navigator
        .query(&params.query)
        .await
        .map_err(ApiError::wrap(format))?;
    render(&state, format, document.into())
}
