use crate::clients::actor_client::ActorClient;
use crate::document_actor::{DocumentStore, Health, StoreError};
use crate::framework::{FrameworkError, MailboxClient};
use crate::http::{ApiError, RequestContext, Responder};
use crate::model::{
    Document, DocumentId, FindDocumentsRequest, FindDocumentsResponse, FindDocumentsResponseItem,
    GetAllDocumentsResponse, GetDocumentRequest, GetDocumentResponse, UploadDocumentRequest,
    UploadDocumentResponse,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Client for interacting with the Document actor.
#[derive(Clone)]
pub struct StoreClient {
    inner: MailboxClient<DocumentStore>,
    health: Arc<Health>,
    max_sleep: Duration,
}

#[async_trait]
impl ActorClient<DocumentStore> for StoreClient {
    type Error = StoreError;

    fn inner(&self) -> &MailboxClient<DocumentStore> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        StoreError::from(e)
    }
}

impl StoreClient {
    pub fn new(inner: MailboxClient<DocumentStore>, health: Arc<Health>, max_sleep: Duration) -> Self {
        Self {
            inner,
            health,
            max_sleep,
        }
    }

    #[instrument(skip(self, raw), fields(len = raw.len()))]
    pub async fn upload(&self, raw: String) -> Result<DocumentId, StoreError> {
        self.perform("upload document", move |store: &mut DocumentStore| store.upload(raw))
            .await
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, id: &str) -> Result<Document, StoreError> {
        let id = parse_document_id(id)?;
        self.perform("fetch document", move |store: &mut DocumentStore| store.fetch(&id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<HashMap<DocumentId, Document>, StoreError> {
        self.perform("fetch all documents", |store: &mut DocumentStore| Ok(store.fetch_all()))
            .await
    }

    #[instrument(skip(self))]
    pub async fn find(&self, key: String) -> Result<Vec<FindDocumentsResponseItem>, StoreError> {
        self.perform("find documents", move |store: &mut DocumentStore| Ok(store.find(&key)))
            .await
    }

    /// Documents plus the health flags, for debugging.
    #[instrument(skip(self))]
    pub async fn dump(&self) -> Result<Value, StoreError> {
        let documents = self
            .perform("dump", |store: &mut DocumentStore| Ok(store.dump()))
            .await?;
        Ok(json!({
            "documents": documents,
            "live": self.health.is_live(),
            "ready": self.health.is_ready(),
        }))
    }

    /// Occupies the worker for `milliseconds`. Accepts 1 up to the configured maximum.
    #[instrument(skip(self))]
    pub async fn sleep(&self, milliseconds: i64) -> Result<(), StoreError> {
        let max = self.max_sleep.as_millis() as u64;
        let duration = match u64::try_from(milliseconds) {
            Ok(ms) if (1..=max).contains(&ms) => Duration::from_millis(ms),
            _ => {
                return Err(StoreError::InvalidDuration {
                    requested: milliseconds,
                    max,
                })
            }
        };
        self.perform("sleep", move |_store: &mut DocumentStore| {
            std::thread::sleep(duration);
            Ok(())
        })
        .await
    }

    pub fn is_live(&self) -> bool {
        self.health.is_live()
    }

    pub fn is_ready(&self) -> bool {
        self.health.is_ready()
    }

    /// Shared by every clone; flipped by the system as the worker starts and stops.
    pub fn set_ready(&self, ready: bool) {
        self.health.set_ready(ready);
    }

    /// Fails liveness from now on.
    pub fn kill(&self) {
        warn!("liveness disabled");
        self.health.set_live(false);
    }
}

fn parse_document_id(id: &str) -> Result<DocumentId, StoreError> {
    if id.is_empty() {
        return Err(StoreError::InvalidId("empty".to_string()));
    }
    Uuid::parse_str(id)
        .map(DocumentId::from)
        .map_err(|e| StoreError::InvalidId(format!("'{id}': {e}")))
}

#[async_trait]
impl Responder for StoreClient {
    async fn upload_document(
        &self,
        ctx: &RequestContext,
        request: UploadDocumentRequest,
    ) -> Result<UploadDocumentResponse, ApiError> {
        let document_id = self.upload(request.document).await?;
        info!(request_id = %ctx.request_id, %document_id, "document uploaded");
        Ok(UploadDocumentResponse { document_id })
    }

    async fn get_document(
        &self,
        ctx: &RequestContext,
        request: GetDocumentRequest,
    ) -> Result<GetDocumentResponse, ApiError> {
        debug!(request_id = %ctx.request_id, id = %request.document_id, "fetching document");
        let document = self.fetch(&request.document_id).await?;
        Ok(GetDocumentResponse { document })
    }

    async fn get_all_documents(&self, ctx: &RequestContext) -> Result<GetAllDocumentsResponse, ApiError> {
        let documents = self.fetch_all().await?;
        debug!(request_id = %ctx.request_id, count = documents.len(), "fetched all documents");
        Ok(GetAllDocumentsResponse { documents })
    }

    async fn find_documents(
        &self,
        ctx: &RequestContext,
        request: FindDocumentsRequest,
    ) -> Result<FindDocumentsResponse, ApiError> {
        let matches = self.find(request.key).await?;
        debug!(request_id = %ctx.request_id, matches = matches.len(), "find finished");
        Ok(FindDocumentsResponse { matches })
    }

    async fn dump(&self, _ctx: &RequestContext) -> Result<Value, ApiError> {
        Ok(StoreClient::dump(self).await?)
    }

    async fn sleep(&self, ctx: &RequestContext, milliseconds: i64) -> Result<(), ApiError> {
        debug!(request_id = %ctx.request_id, milliseconds, "sleeping");
        Ok(StoreClient::sleep(self, milliseconds).await?)
    }

    fn is_live(&self) -> bool {
        StoreClient::is_live(self)
    }

    fn is_ready(&self) -> bool {
        StoreClient::is_ready(self)
    }

    fn kill(&self) {
        StoreClient::kill(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_action, run_next};

    fn mock_client() -> (StoreClient, tokio::sync::mpsc::Receiver<crate::framework::Action<DocumentStore>>) {
        let (inner, receiver) = create_mock_client(1);
        let client = StoreClient::new(inner, Arc::new(Health::default()), Duration::from_millis(5000));
        client.set_ready(true);
        (client, receiver)
    }

    #[tokio::test]
    async fn test_upload_runs_upload_action() {
        let (client, mut receiver) = mock_client();
        let pending = tokio::spawn({
            let client = client.clone();
            async move { client.upload(r#"{"a": 1}"#.to_string()).await }
        });

        let mut store = DocumentStore::default();
        assert!(run_next(&mut receiver, "upload document", &mut store).await);
        let id = pending.await.unwrap().unwrap();
        assert_eq!(store.fetch(&id).unwrap().raw, r#"{"a": 1}"#);
    }

    #[tokio::test]
    async fn test_fetch_rejects_bad_ids_without_submitting() {
        let (client, mut receiver) = mock_client();

        assert_eq!(client.fetch("").await, Err(StoreError::InvalidId("empty".to_string())));
        assert!(matches!(client.fetch("not-a-uuid").await, Err(StoreError::InvalidId(_))));

        drop(client);
        assert!(expect_action(&mut receiver).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found() {
        let (client, mut receiver) = mock_client();
        let id = Uuid::new_v4();
        let pending = tokio::spawn({
            let client = client.clone();
            async move { client.fetch(&id.to_string()).await }
        });

        let mut store = DocumentStore::default();
        assert!(!run_next(&mut receiver, "fetch document", &mut store).await);
        assert_eq!(pending.await.unwrap(), Err(StoreError::NotFound(id.to_string())));
    }

    #[tokio::test]
    async fn test_sleep_validates_range() {
        let (client, mut receiver) = mock_client();

        for ms in [0, -5, 5001] {
            assert_eq!(
                client.sleep(ms).await,
                Err(StoreError::InvalidDuration { requested: ms, max: 5000 })
            );
        }

        drop(client);
        assert!(expect_action(&mut receiver).await.is_none());
    }

    #[tokio::test]
    async fn test_mailbox_full_maps_to_service_unavailable() {
        let (client, mut receiver) = mock_client();
        let queued = tokio::spawn({
            let client = client.clone();
            async move { client.fetch_all().await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(client.find("x".to_string()).await, Err(StoreError::ServiceUnavailable));

        let mut store = DocumentStore::default();
        assert!(run_next(&mut receiver, "fetch all documents", &mut store).await);
        assert!(queued.await.unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_kill_flips_liveness_only() {
        let (client, _receiver) = mock_client();
        assert!(client.is_live());
        client.kill();
        assert!(!client.is_live());
        assert!(client.is_ready());
    }

    #[tokio::test]
    async fn test_dump_includes_health_flags() {
        let (client, mut receiver) = mock_client();
        client.kill();
        let pending = tokio::spawn({
            let client = client.clone();
            async move { client.dump().await }
        });

        let mut store = DocumentStore::default();
        assert!(run_next(&mut receiver, "dump", &mut store).await);
        let dump = pending.await.unwrap().unwrap();
        assert_eq!(dump["live"], json!(false));
        assert_eq!(dump["ready"], json!(true));
        assert_eq!(dump["documents"], json!({}));
    }

    #[tokio::test]
    async fn test_readiness_is_shared_between_clones() {
        let (client, _receiver) = mock_client();
        let other = client.clone();
        client.set_ready(false);
        assert!(!other.is_ready());
        assert!(other.is_live());
    }
}
