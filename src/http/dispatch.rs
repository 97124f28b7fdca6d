use axum::body::Body;
use axum::extract::{Query, Request};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, field, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::error::{ApiError, ApiResult};

/// Histogram of request latency, labelled by `path`, `method` and `code`.
pub const API_DURATION_METRIC: &str = "docstore_api_duration_milliseconds";

pub type QueryParams = HashMap<String, String>;

pub type Handler = Arc<dyn Fn(RequestContext, String, QueryParams) -> BoxFuture<'static, ApiResult<Option<Value>>> + Send + Sync>;

/// Per-request identity and deadline, handed to every handler.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub deadline: Instant,
}

impl RequestContext {
    pub fn new(timeout: Duration) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            deadline: Instant::now() + timeout,
        }
    }

    /// Time left before the request is abandoned.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

/// One path with its body limit and its handlers, tried in order.
#[derive(Clone)]
pub struct Route {
    pub path: &'static str,
    pub max_content_length: usize,
    pub handlers: Vec<(Method, Handler)>,
}

impl Route {
    pub fn new(path: &'static str, max_content_length: usize) -> Self {
        Self {
            path,
            max_content_length,
            handlers: Vec::new(),
        }
    }

    pub fn handle<F, Fut>(mut self, method: Method, handler: F) -> Self
    where
        F: Fn(RequestContext, String, QueryParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<Option<Value>>> + Send + 'static,
    {
        self.handlers
            .push((method, Arc::new(move |ctx, body, query| handler(ctx, body, query).boxed())));
        self
    }

    fn handler_for(&self, method: &Method) -> Option<&Handler> {
        self.handlers.iter().find(|(m, _)| m == method).map(|(_, h)| h)
    }
}

/// Runs one request through `route` and records its latency.
pub async fn dispatch(route: Arc<Route>, timeout: Duration, request: Request) -> Response {
    let start = std::time::Instant::now();
    let method = request.method().clone();
    let ctx = RequestContext::new(timeout);
    let span = info_span!(
        "http_request",
        request_id = %ctx.request_id,
        path = route.path,
        method = %method,
        status = field::Empty,
        error = field::Empty
    );

    let result = async {
        info!("start process");
        let result = match read_request(&route, request).await {
            Ok((body, query)) => invoke(&route, &method, ctx, body, query).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            if e.status_code().is_server_error() {
                error!(error = %e, "request failed");
            } else {
                warn!(error = %e, "request failed");
            }
        }
        info!("finish process");
        result
    }
    .instrument(span.clone())
    .await;

    let status = status_of(&result);
    span.record("status", status.as_u16());
    if !status.is_success() {
        span.record("error", true);
    }

    let response = into_response(result);
    record_duration(route.path, &method, response.status(), start.elapsed());
    response
}

/// Answers paths no route claims.
pub async fn not_found(request: Request) -> Response {
    let start = std::time::Instant::now();
    let response = ApiError::NotFound.into_response();
    record_duration("unmatched", request.method(), response.status(), start.elapsed());
    response
}

async fn read_request(route: &Route, request: Request) -> ApiResult<(String, QueryParams)> {
    if let Some(length) = declared_content_length(request.headers()) {
        if length > route.max_content_length {
            return Err(ApiError::ContentTooLarge);
        }
    }

    let (parts, body) = request.into_parts();
    let body = read_body(body, route.max_content_length).await?;
    let Query(query) = Query::<QueryParams>::try_from_uri(&parts.uri)
        .map_err(|e| ApiError::BadRequest(format!("failed to parse query: {}", e.body_text())))?;
    Ok((body, query))
}

fn declared_content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

async fn read_body(body: Body, limit: usize) -> ApiResult<String> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
    String::from_utf8(bytes.to_vec()).map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))
}

async fn invoke(
    route: &Route,
    method: &Method,
    ctx: RequestContext,
    body: String,
    query: QueryParams,
) -> ApiResult<Option<Value>> {
    let handler = route.handler_for(method).ok_or(ApiError::MethodNotAllowed)?;
    let deadline = ctx.deadline;
    tokio::time::timeout_at(deadline, handler(ctx, body, query))
        .await
        .unwrap_or(Err(ApiError::Timeout))
}

fn status_of(result: &ApiResult<Option<Value>>) -> StatusCode {
    match result {
        Ok(Some(_)) => StatusCode::OK,
        Ok(None) => StatusCode::NOT_FOUND,
        Err(e) => e.status_code(),
    }
}

fn into_response(result: ApiResult<Option<Value>>) -> Response {
    match result {
        Ok(Some(value)) => match serde_json::to_string(&value) {
            Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Err(e) => ApiError::Internal(format!("failed to encode response: {e}")).into_response(),
        },
        Ok(None) => ApiError::NotFound.into_response(),
        Err(e) => e.into_response(),
    }
}

fn record_duration(path: &'static str, method: &Method, code: StatusCode, elapsed: Duration) {
    metrics::histogram!(
        API_DURATION_METRIC,
        "path" => path,
        "method" => method.to_string(),
        "code" => code.as_u16().to_string()
    )
    .record(elapsed.as_secs_f64() * 1000.0);
}
