//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, document
//! store) and the Google Drive connector into the album core. Desktop apps
//! typically enable the `desktop-shims` feature (which depends on
//! `bridge-desktop`) and call [`bootstrap_desktop`].

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{document::DocumentStore, storage::RemoteStorage, time::Clock, SystemClock};
use core_album::{
    Album, AlbumDeletion, AlbumSummary, CandidateFile, CatalogService, CoverImage, CoverService,
    DeleteOutcome, DocumentAlbumRepository, DocumentCoverRepository, DocumentPhotoRepository,
    FolderResolver, Photo, PhotoDeletion, Reconciler, Session, SessionBootstrap, TransferGateway,
    UploadOrchestrator, UploadSummary,
};
use core_auth::{AuthError, Credential, CredentialProvider};
use core_runtime::config::CoreConfig;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus, EventStream};
use provider_google_drive::GoogleDriveConnector;
use tracing::info;

/// Aggregated handle to the bridge dependencies the core requires.
pub struct CoreDependencies {
    pub remote_storage: Arc<dyn RemoteStorage>,
    pub document_store: Arc<dyn DocumentStore>,
    pub clock: Arc<dyn Clock>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(remote_storage: Arc<dyn RemoteStorage>, document_store: Arc<dyn DocumentStore>) -> Self {
        Self {
            remote_storage,
            document_store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Google Drive storage over the configured HTTP client, plus `document_store`.
    pub fn google_drive(config: &CoreConfig, document_store: Arc<dyn DocumentStore>) -> Self {
        Self::new(Arc::new(GoogleDriveConnector::from_config(config)), document_store)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

struct Services {
    config: CoreConfig,
    event_bus: Arc<EventBus>,
    bootstrap: SessionBootstrap,
    catalog: CatalogService,
    uploads: UploadOrchestrator,
    reconciler: Reconciler,
    covers: CoverService,
}

/// Primary façade exposed to host applications.
///
/// Every remote operation takes the [`Session`] returned by
/// [`start_session`](AdminService::start_session).
#[derive(Clone)]
pub struct AdminService {
    inner: Arc<Services>,
}

impl AdminService {
    /// Create a new service from the provided configuration and dependencies.
    pub fn new(config: CoreConfig, deps: CoreDependencies) -> Self {
        let event_bus = Arc::new(EventBus::new(config.event_buffer_size));

        let albums = Arc::new(DocumentAlbumRepository::new(Arc::clone(&deps.document_store)));
        let photos = Arc::new(DocumentPhotoRepository::new(Arc::clone(&deps.document_store)));
        let covers = Arc::new(DocumentCoverRepository::new(Arc::clone(&deps.document_store)));

        let resolver = Arc::new(FolderResolver::new(Arc::clone(&deps.remote_storage)));
        let gateway = Arc::new(TransferGateway::from_config(
            Arc::clone(&deps.remote_storage),
            &config,
        ));

        let services = Services {
            bootstrap: SessionBootstrap::new(
                Arc::clone(&resolver),
                config.album_root_folder_name.clone(),
                Arc::clone(&event_bus),
            ),
            catalog: CatalogService::new(
                albums.clone(),
                photos.clone(),
                Arc::clone(&event_bus),
                Arc::clone(&deps.clock),
            ),
            uploads: UploadOrchestrator::new(
                Arc::clone(&resolver),
                Arc::clone(&gateway),
                photos.clone(),
                Arc::clone(&event_bus),
                Arc::clone(&deps.clock),
            ),
            reconciler: Reconciler::new(
                Arc::clone(&gateway),
                albums,
                photos,
                Arc::clone(&event_bus),
            ),
            covers: CoverService::new(
                resolver,
                gateway,
                covers,
                Arc::clone(&event_bus),
                Arc::clone(&deps.clock),
                config.cover_folder_name.clone(),
            ),
            event_bus,
            config,
        };

        Self {
            inner: Arc::new(services),
        }
    }

    /// Build a Google Drive backed service from a config that carries its
    /// document store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CapabilityMissing`] when no document store was
    /// injected; use [`bootstrap_desktop`] to open the default one.
    pub fn from_config(config: CoreConfig) -> Result<Self> {
        let document_store = config
            .document_store
            .clone()
            .ok_or_else(|| CoreError::CapabilityMissing {
                capability: "DocumentStore".to_string(),
                message: "Inject a DocumentStore or use bootstrap_desktop()".to_string(),
            })?;
        let deps = CoreDependencies::google_drive(&config, document_store);
        Ok(Self::new(config, deps))
    }

    pub fn config(&self) -> &CoreConfig {
        &self.inner.config
    }

    /// Subscribe to core events.
    pub fn events(&self) -> EventStream {
        EventStream::new(self.inner.event_bus.subscribe())
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Resolve the album root folder for `credential` and return a session.
    pub async fn start_session(&self, credential: Credential) -> Result<Session> {
        Ok(self.inner.bootstrap.start(credential).await?)
    }

    /// Start a session with whatever credential `provider` currently holds.
    pub async fn start_session_from(&self, provider: &dyn CredentialProvider) -> Result<Session> {
        let credential = provider
            .current_credential()
            .await
            .ok_or(AuthError::NotAuthenticated)?;
        self.start_session(credential).await
    }

    /// Discard a session. The credential itself is owned by the host.
    pub fn end_session(&self, _session: Session) {
        info!("Session ended");
        let _ = self.inner.event_bus.emit(CoreEvent::Auth(AuthEvent::SignedOut));
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    pub async fn create_album(&self, name: &str) -> Result<Album> {
        Ok(self.inner.catalog.create_album(name).await?)
    }

    pub async fn list_albums(&self) -> Result<Vec<AlbumSummary>> {
        Ok(self.inner.catalog.list_albums().await?)
    }

    pub async fn list_photos(&self, album_id: Option<&str>) -> Result<Vec<Photo>> {
        Ok(self.inner.catalog.list_photos(album_id).await?)
    }

    // ------------------------------------------------------------------
    // Transfers
    // ------------------------------------------------------------------

    pub async fn upload_photos(
        &self,
        session: &Session,
        files: Vec<CandidateFile>,
        album_id: &str,
    ) -> Result<UploadSummary> {
        Ok(self
            .inner
            .uploads
            .upload_batch(session, files, album_id)
            .await?)
    }

    pub async fn delete_photo(&self, session: &Session, photo_id: &str) -> Result<PhotoDeletion> {
        Ok(self.inner.reconciler.delete_photo(session, photo_id).await?)
    }

    pub async fn delete_album(&self, session: &Session, album_id: &str) -> Result<AlbumDeletion> {
        Ok(self.inner.reconciler.delete_album(session, album_id).await?)
    }

    // ------------------------------------------------------------------
    // Cover
    // ------------------------------------------------------------------

    pub async fn set_cover(&self, session: &Session, file: CandidateFile) -> Result<CoverImage> {
        Ok(self.inner.covers.set_cover(session, file).await?)
    }

    pub async fn remove_cover(&self, session: &Session) -> Result<Option<DeleteOutcome>> {
        Ok(self.inner.covers.remove_cover(session).await?)
    }

    pub async fn load_cover(&self) -> Result<Option<CoverImage>> {
        Ok(self.inner.covers.load_cover().await?)
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Uses the injected document store when present, otherwise opens a
/// `SqliteDocumentStore` at `config.database_path`.
///
/// ```no_run
/// # async fn example() -> core_service::Result<()> {
/// use core_runtime::config::CoreConfig;
/// use core_service::bootstrap_desktop;
///
/// let config = CoreConfig::builder().database_path("album.db").build()?;
/// let service = bootstrap_desktop(config).await?;
/// let albums = service.list_albums().await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub async fn bootstrap_desktop(config: CoreConfig) -> Result<AdminService> {
    use bridge_desktop::SqliteDocumentStore;

    let document_store: Arc<dyn DocumentStore> = match config.document_store.clone() {
        Some(store) => store,
        None => {
            let path = config
                .database_path
                .clone()
                .ok_or_else(|| CoreError::InitializationFailed("database path not set".to_string()))?;
            info!(path = %path.display(), "Opening document store");
            let store = SqliteDocumentStore::new(path)
                .await
                .map_err(|e| CoreError::InitializationFailed(e.to_string()))?;
            Arc::new(store)
        }
    };

    let deps = CoreDependencies::google_drive(&config, document_store);
    Ok(AdminService::new(config, deps))
}

#[cfg(all(test, feature = "desktop-shims"))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_desktop::SqliteDocumentStore;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
    use bytes::Bytes;
    use core_auth::StaticCredentialProvider;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    /// A Drive that already has the album root and accepts everything else.
    fn drive_api(request: HttpRequest) -> BridgeResult<HttpResponse> {
        let url = request.url.as_str();
        match request.method {
            HttpMethod::Get if url.contains("Album-Boda") => Ok(response(
                200,
                r#"{"files":[{"id":"root-1","name":"Album-Boda"}]}"#,
            )),
            HttpMethod::Get => Ok(response(200, r#"{"files":[]}"#)),
            HttpMethod::Post if url.contains("uploadType=multipart") => Ok(response(
                200,
                r#"{"id":"file-1","name":"a.jpg","parents":["album-folder"]}"#,
            )),
            HttpMethod::Post => Ok(response(200, r#"{"id":"album-folder","name":"album"}"#)),
            HttpMethod::Delete => Ok(response(204, "")),
            _ => Err(BridgeError::NotAvailable(url.to_string())),
        }
    }

    async fn service(http: MockHttpClient) -> AdminService {
        let store = Arc::new(SqliteDocumentStore::in_memory().await.unwrap());
        let config = CoreConfig::builder()
            .http_client(Arc::new(http))
            .document_store(store)
            .build()
            .unwrap();
        AdminService::from_config(config).unwrap()
    }

    #[tokio::test]
    async fn test_start_session_finds_existing_root() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Get);
            assert_eq!(
                req.headers.get("Authorization"),
                Some(&"Bearer ya29".to_string())
            );
            drive_api(req)
        });

        let service = service(http).await;
        let session = service
            .start_session(Credential::new("ya29"))
            .await
            .unwrap();

        assert_eq!(session.album_root_id.as_deref(), Some("root-1"));
    }

    #[tokio::test]
    async fn test_start_session_from_signed_out_provider() {
        let mut http = MockHttpClient::new();
        http.expect_execute().never();

        let service = service(http).await;
        let provider = StaticCredentialProvider::signed_out();

        let err = service.start_session_from(&provider).await.unwrap_err();
        assert!(matches!(err, CoreError::Auth(AuthError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_end_session_emits_signed_out() {
        let mut http = MockHttpClient::new();
        http.expect_execute().never();

        let service = service(http).await;
        let mut events = service.events();
        service.end_session(Session::signed_out());

        assert!(matches!(
            events.recv().await.unwrap(),
            CoreEvent::Auth(AuthEvent::SignedOut)
        ));
    }

    #[tokio::test]
    async fn test_upload_and_delete_album_flow() {
        let mut http = MockHttpClient::new();
        http.expect_execute().returning(drive_api);

        let service = service(http).await;
        let mut events = service.events();
        let provider = StaticCredentialProvider::new(Credential::new("ya29"));
        let session = service.start_session_from(&provider).await.unwrap();

        let album = service.create_album("Ceremonia").await.unwrap();
        let summary = service
            .upload_photos(
                &session,
                vec![CandidateFile::new("a.jpg", Bytes::from_static(b"JPEG"), "image/jpeg")],
                &album.id,
            )
            .await
            .unwrap();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(
            summary.photos[0].url,
            "https://drive.google.com/uc?id=file-1&export=download"
        );

        let albums = service.list_albums().await.unwrap();
        assert_eq!(albums[0].photo_count, 1);

        let deletion = service.delete_album(&session, &album.id).await.unwrap();
        assert_eq!(deletion.photos_removed, 1);
        assert!(service.list_albums().await.unwrap().is_empty());
        assert!(service.list_photos(None).await.unwrap().is_empty());

        assert!(matches!(
            events.try_recv(),
            Some(Ok(CoreEvent::Auth(AuthEvent::SessionStarted { .. })))
        ));
    }

    #[tokio::test]
    async fn test_cover_flow() {
        let mut http = MockHttpClient::new();
        http.expect_execute().returning(drive_api);

        let service = service(http).await;
        let session = service
            .start_session(Credential::new("ya29"))
            .await
            .unwrap();

        let cover = service
            .set_cover(
                &session,
                CandidateFile::new("portada.jpg", Bytes::from_static(b"JPEG"), "image/jpeg"),
            )
            .await
            .unwrap();
        assert_eq!(service.load_cover().await.unwrap(), Some(cover));

        assert_eq!(
            service.remove_cover(&session).await.unwrap(),
            Some(DeleteOutcome::Deleted)
        );
        assert!(service.load_cover().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remote_errors_surface_as_album_errors() {
        let mut http = MockHttpClient::new();
        http.expect_execute().returning(|_| {
            Ok(response(
                401,
                r#"{"error":{"code":401,"message":"Invalid Credentials"}}"#,
            ))
        });

        let service = service(http).await;
        let err = service
            .start_session(Credential::new("expired"))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Album(_)));
        assert!(err.to_string().contains("Invalid Credentials"));
    }

    #[tokio::test]
    async fn test_from_config_requires_document_store() {
        let config = CoreConfig::builder()
            .http_client(Arc::new(MockHttpClient::new()))
            .database_path("/tmp/unused.db")
            .build()
            .unwrap();
        assert!(matches!(
            AdminService::from_config(config),
            Err(CoreError::CapabilityMissing { .. })
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_desktop_uses_injected_store() {
        let store = Arc::new(SqliteDocumentStore::in_memory().await.unwrap());
        let config = CoreConfig::builder()
            .http_client(Arc::new(MockHttpClient::new()))
            .document_store(store)
            .build()
            .unwrap();

        let service = bootstrap_desktop(config).await.unwrap();
        let album = service.create_album("Fiesta").await.unwrap();
        assert_eq!(service.list_albums().await.unwrap()[0].album, album);
    }
}
