use axum::extract::Request;
use axum::http::Method;
use axum::routing::any;
use axum::Router;
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::dispatch::{dispatch, not_found, QueryParams, RequestContext, Route};
use super::error::{ApiError, ApiResult};
use super::responder::Responder;
use crate::model::{FindDocumentsRequest, GetDocumentRequest, UploadDocumentRequest};

/// Limits applied by the router.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub request_timeout: Duration,
    pub max_document_bytes: usize,
    pub max_query_bytes: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(5000),
            max_document_bytes: 10000,
            max_query_bytes: 1000,
        }
    }
}

/// The route table served in front of `responder`.
pub fn routes<R: Responder>(responder: Arc<R>, options: &HttpOptions) -> Vec<Route> {
    vec![
        Route::new("/liveness", 0).handle(Method::GET, bind(&responder, liveness::<R>)),
        Route::new("/readiness", 0).handle(Method::GET, bind(&responder, readiness::<R>)),
        Route::new("/documents", options.max_document_bytes)
            .handle(Method::POST, bind(&responder, upload_document::<R>))
            .handle(Method::GET, bind(&responder, get_document::<R>)),
        Route::new("/documents/all", 0).handle(Method::GET, bind(&responder, get_all_documents::<R>)),
        Route::new("/documents/find", options.max_query_bytes)
            .handle(Method::POST, bind(&responder, find_documents::<R>)),
        Route::new("/dump", 0).handle(Method::GET, bind(&responder, dump::<R>)),
        Route::new("/sleep", 0).handle(Method::GET, bind(&responder, sleep::<R>)),
        Route::new("/kill", 0).handle(Method::POST, bind(&responder, kill::<R>)),
    ]
}

/// Build the Axum router: every route goes through [`dispatch`], everything else is a 404.
pub fn setup_router<R: Responder>(responder: Arc<R>, options: &HttpOptions) -> Router {
    let timeout = options.request_timeout;
    routes(responder, options)
        .into_iter()
        .fold(Router::new(), |router, route| {
            info!(path = route.path, max_content_length = route.max_content_length, "route registered");
            let path = route.path;
            let route = Arc::new(route);
            router.route(
                path,
                any(move |request: Request| {
                    let route = route.clone();
                    async move { dispatch(route, timeout, request).await }
                }),
            )
        })
        .fallback(not_found)
}

fn bind<R, F, Fut>(responder: &Arc<R>, handler: F) -> impl Fn(RequestContext, String, QueryParams) -> Fut + Send + Sync + 'static
where
    R: Responder,
    F: Fn(Arc<R>, RequestContext, String, QueryParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<Option<Value>>> + Send + 'static,
{
    let responder = responder.clone();
    move |ctx, body, query| handler(responder.clone(), ctx, body, query)
}

fn to_json<T: Serialize>(value: T) -> ApiResult<Option<Value>> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| ApiError::Internal(format!("failed to encode response: {e}")))
}

fn empty() -> ApiResult<Option<Value>> {
    Ok(Some(json!("")))
}

async fn liveness<R: Responder>(responder: Arc<R>, _: RequestContext, _: String, _: QueryParams) -> ApiResult<Option<Value>> {
    if !responder.is_live() {
        return Err(ApiError::Internal("not live".to_string()));
    }
    empty()
}

async fn readiness<R: Responder>(responder: Arc<R>, _: RequestContext, _: String, _: QueryParams) -> ApiResult<Option<Value>> {
    if !responder.is_ready() {
        return Err(ApiError::Internal("not ready".to_string()));
    }
    empty()
}

async fn upload_document<R: Responder>(
    responder: Arc<R>,
    ctx: RequestContext,
    body: String,
    _: QueryParams,
) -> ApiResult<Option<Value>> {
    let request: UploadDocumentRequest = serde_json::from_str(&body)?;
    to_json(responder.upload_document(&ctx, request).await?)
}

async fn get_document<R: Responder>(
    responder: Arc<R>,
    ctx: RequestContext,
    _: String,
    query: QueryParams,
) -> ApiResult<Option<Value>> {
    let request = GetDocumentRequest {
        document_id: query.get("id").cloned().unwrap_or_default(),
    };
    to_json(responder.get_document(&ctx, request).await?)
}

async fn get_all_documents<R: Responder>(
    responder: Arc<R>,
    ctx: RequestContext,
    _: String,
    _: QueryParams,
) -> ApiResult<Option<Value>> {
    to_json(responder.get_all_documents(&ctx).await?)
}

async fn find_documents<R: Responder>(
    responder: Arc<R>,
    ctx: RequestContext,
    body: String,
    _: QueryParams,
) -> ApiResult<Option<Value>> {
    let request: FindDocumentsRequest = serde_json::from_str(&body)?;
    to_json(responder.find_documents(&ctx, request).await?)
}

async fn dump<R: Responder>(responder: Arc<R>, ctx: RequestContext, _: String, _: QueryParams) -> ApiResult<Option<Value>> {
    Ok(Some(responder.dump(&ctx).await?))
}

async fn sleep<R: Responder>(responder: Arc<R>, ctx: RequestContext, _: String, query: QueryParams) -> ApiResult<Option<Value>> {
    let milliseconds = sleep_milliseconds(&query)?;
    responder.sleep(&ctx, milliseconds).await?;
    empty()
}

async fn kill<R: Responder>(responder: Arc<R>, _: RequestContext, _: String, _: QueryParams) -> ApiResult<Option<Value>> {
    responder.kill();
    empty()
}

/// `milliseconds` wins over `seconds`; seconds are scaled before any range check.
fn sleep_milliseconds(query: &QueryParams) -> ApiResult<i64> {
    let parse = |name: &str, raw: &str| {
        raw.parse::<i64>()
            .map_err(|e| ApiError::BadRequest(format!("invalid {name} '{raw}': {e}")))
    };
    if let Some(raw) = query.get("milliseconds") {
        return parse("milliseconds", raw);
    }
    if let Some(raw) = query.get("seconds") {
        return parse("seconds", raw)?
            .checked_mul(1000)
            .ok_or_else(|| ApiError::BadRequest(format!("invalid seconds '{raw}': out of range")));
    }
    Err(ApiError::BadRequest(
        "missing 'milliseconds' or 'seconds' query parameter".to_string(),
    ))
}
