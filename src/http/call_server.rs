//! The call-server route: GET/POST/PUT/DELETE forwarded to the upstream
//! `/data` resource.
//!
//! Each verb makes at most one upstream call. Success responses wrap the
//! upstream body in `{message, data}`; failures become `{error}` with 400
//! for a non-numeric id and 500 for everything else.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, RawQuery, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::time::Instant;

use crate::http::error::ProxyError;
use crate::http::request::RequestIdExt;
use crate::http::response::Envelope;
use crate::http::server::AppState;
use crate::numeric_id::NumericId;
use crate::observability::metrics;
use crate::upstream::UpstreamCall;

/// Inbound path of the route.
pub const CALL_SERVER_PATH: &str = "/api/call-server";

pub async fn handle_get(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let request_id = headers.request_id();
    let result = fetch(&state, request_id).await;
    respond(Method::GET, request_id, start, result)
}

pub async fn handle_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let request_id = headers.request_id();
    let result = create(&state, request_id, body).await;
    respond(Method::POST, request_id, start, result)
}

pub async fn handle_put(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let request_id = headers.request_id();
    let result = update(&state, request_id, body).await;
    respond(Method::PUT, request_id, start, result)
}

pub async fn handle_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let start = Instant::now();
    let request_id = headers.request_id();
    let result = remove(&state, request_id, query.as_deref()).await;
    respond(Method::DELETE, request_id, start, result)
}

async fn fetch(state: &AppState, request_id: &str) -> Result<Envelope, ProxyError> {
    let data = state.upstream.send(UpstreamCall::Fetch, request_id).await?;
    Ok(Envelope::success("GET request successful", data))
}

async fn create(
    state: &AppState,
    request_id: &str,
    body: Result<Bytes, BytesRejection>,
) -> Result<Envelope, ProxyError> {
    let body = parse_body(body)?;
    let data = state
        .upstream
        .send(UpstreamCall::Create(&body), request_id)
        .await?;
    Ok(Envelope::success("POST request successful", data))
}

async fn update(
    state: &AppState,
    request_id: &str,
    body: Result<Bytes, BytesRejection>,
) -> Result<Envelope, ProxyError> {
    let body = parse_body(body)?;
    if body.is_null() {
        return Err(ProxyError::Body("cannot read `id` of null".into()));
    }

    let id = body.as_object().and_then(|fields| fields.get("id"));
    let id = NumericId::from_json(id).ok_or(ProxyError::InvalidId)?;
    tracing::debug!(request_id = %request_id, id = %id, "Updating record");

    // The id travels inside the body; the path does not carry it.
    let data = state
        .upstream
        .send(UpstreamCall::Update(&body), request_id)
        .await?;
    Ok(Envelope::success("PUT request successful", data))
}

async fn remove(
    state: &AppState,
    request_id: &str,
    query: Option<&str>,
) -> Result<Envelope, ProxyError> {
    let raw_id = query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.into_owned())
    });
    let id = NumericId::from_query(raw_id.as_deref()).ok_or(ProxyError::InvalidId)?;

    let data = state
        .upstream
        .send(UpstreamCall::Remove(id), request_id)
        .await?;
    Ok(Envelope::success("DELETE request successful", data))
}

fn parse_body(body: Result<Bytes, BytesRejection>) -> Result<Value, ProxyError> {
    let bytes = body.map_err(|e| ProxyError::Body(e.body_text()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Log, record metrics and render the envelope.
fn respond(
    method: Method,
    request_id: &str,
    start: Instant,
    result: Result<Envelope, ProxyError>,
) -> Response {
    match result {
        Ok(envelope) => {
            metrics::record_request(method.as_str(), StatusCode::OK.as_u16(), start);
            tracing::debug!(request_id = %request_id, method = %method, "Upstream call succeeded");
            (StatusCode::OK, Json(envelope)).into_response()
        }
        Err(e) => {
            let status = e.status();
            metrics::record_request(method.as_str(), status.as_u16(), start);
            match &e {
                ProxyError::InvalidId => {
                    tracing::warn!(request_id = %request_id, method = %method, "Rejected invalid id");
                }
                ProxyError::Upstream(cause) => {
                    metrics::record_upstream_error(method.as_str(), cause.kind());
                    tracing::error!(
                        request_id = %request_id,
                        method = %method,
                        kind = cause.kind(),
                        error = %cause,
                        "Upstream call failed"
                    );
                }
                ProxyError::Body(cause) => {
                    tracing::error!(request_id = %request_id, method = %method, error = %cause, "Bad request body");
                }
            }
            e.into_response()
        }
    }
}
