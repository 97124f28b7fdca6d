use async_trait::async_trait;
use serde_json::Value;

use super::dispatch::RequestContext;
use super::error::ApiResult;
use crate::model::{
    FindDocumentsRequest, FindDocumentsResponse, GetAllDocumentsResponse, GetDocumentRequest,
    GetDocumentResponse, UploadDocumentRequest, UploadDocumentResponse,
};

/// Everything the HTTP layer needs from the document store.
///
/// The router only depends on this capability, so tests can drive it with any
/// implementation and the store client stays free of HTTP plumbing.
#[async_trait]
pub trait Responder: Send + Sync + 'static {
    async fn upload_document(
        &self,
        ctx: &RequestContext,
        request: UploadDocumentRequest,
    ) -> ApiResult<UploadDocumentResponse>;

    async fn get_document(&self, ctx: &RequestContext, request: GetDocumentRequest) -> ApiResult<GetDocumentResponse>;

    async fn get_all_documents(&self, ctx: &RequestContext) -> ApiResult<GetAllDocumentsResponse>;

    async fn find_documents(
        &self,
        ctx: &RequestContext,
        request: FindDocumentsRequest,
    ) -> ApiResult<FindDocumentsResponse>;

    /// Full internal state, for debugging.
    async fn dump(&self, ctx: &RequestContext) -> ApiResult<Value>;

    /// Occupies the store for `milliseconds`.
    async fn sleep(&self, ctx: &RequestContext, milliseconds: i64) -> ApiResult<()>;

    fn is_live(&self) -> bool;

    fn is_ready(&self) -> bool;

    fn kill(&self);
}
