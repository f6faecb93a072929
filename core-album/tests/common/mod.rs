//! In-memory fakes shared by the integration tests.
//!
//! Both fakes append to one call log so tests can assert the order of remote
//! and metadata operations.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::document::{Document, DocumentStore};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::storage::{FileUpload, RemoteDeletion, RemoteFolder, RemoteStorage, StoredFile};
use bridge_traits::time::FixedClock;
use chrono::{TimeZone, Utc};
use core_album::{
    CandidateFile, CatalogService, CoverService, DocumentAlbumRepository, DocumentCoverRepository,
    DocumentPhotoRepository, FolderResolver, Reconciler, Session, SessionBootstrap,
    TransferGateway, UploadOrchestrator,
};
use core_auth::Credential;
use core_runtime::events::EventBus;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const ROOT_ID: &str = "R";

pub type CallLog = Arc<Mutex<Vec<String>>>;

// ============================================================================
// Remote storage fake
// ============================================================================

#[derive(Default)]
pub struct FakeDrive {
    log: CallLog,
    folders: Mutex<Vec<RemoteFolder>>,
    files: Mutex<Vec<StoredFile>>,
    next_id: Mutex<usize>,
    /// Upload of these file names answers 500
    pub reject_uploads: Mutex<HashSet<String>>,
    /// Delete of these file ids answers "not found"
    pub missing_files: Mutex<HashSet<String>>,
    /// Delete of these file ids fails in transport
    pub failing_deletes: Mutex<HashSet<String>>,
    lookups_fail: Mutex<bool>,
}

impl FakeDrive {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("{}-{}", prefix, next)
    }

    pub fn folders(&self) -> Vec<RemoteFolder> {
        self.folders.lock().unwrap().clone()
    }

    pub fn files(&self) -> Vec<StoredFile> {
        self.files.lock().unwrap().clone()
    }

    pub fn reject_upload(&self, name: &str) {
        self.reject_uploads.lock().unwrap().insert(name.to_string());
    }

    pub fn fail_lookups(&self) {
        *self.lookups_fail.lock().unwrap() = true;
    }
}

#[async_trait]
impl RemoteStorage for FakeDrive {
    async fn find_folder(
        &self,
        _access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> BridgeResult<Option<RemoteFolder>> {
        self.record(format!("drive:find:{}", name));
        if *self.lookups_fail.lock().unwrap() {
            return Err(BridgeError::OperationFailed("Request timed out".to_string()));
        }
        Ok(self
            .folders
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.name == name && f.parent_id.as_deref() == parent_id)
            .cloned())
    }

    async fn create_folder(
        &self,
        _access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> BridgeResult<RemoteFolder> {
        self.record(format!("drive:create:{}", name));
        let folder = RemoteFolder {
            id: self.next_id("folder"),
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
        };
        self.folders.lock().unwrap().push(folder.clone());
        Ok(folder)
    }

    async fn upload_file(
        &self,
        _access_token: &str,
        upload: &FileUpload,
        folder_id: &str,
    ) -> BridgeResult<StoredFile> {
        self.record(format!("drive:upload:{}", upload.name));
        if self.reject_uploads.lock().unwrap().contains(&upload.name) {
            return Err(BridgeError::RemoteRejected {
                status: 500,
                message: "Backend Error".to_string(),
            });
        }
        let file = StoredFile {
            id: self.next_id("file"),
            name: upload.name.clone(),
            folder_id: Some(folder_id.to_string()),
        };
        self.files.lock().unwrap().push(file.clone());
        Ok(file)
    }

    async fn delete_file(&self, _access_token: &str, file_id: &str) -> BridgeResult<RemoteDeletion> {
        self.record(format!("drive:delete:{}", file_id));
        if self.failing_deletes.lock().unwrap().contains(file_id) {
            return Err(BridgeError::OperationFailed("connection reset".to_string()));
        }
        if self.missing_files.lock().unwrap().contains(file_id) {
            return Ok(RemoteDeletion::NotFound);
        }
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| f.id != file_id);
        if files.len() == before {
            Ok(RemoteDeletion::NotFound)
        } else {
            Ok(RemoteDeletion::Deleted)
        }
    }
}

// ============================================================================
// Metadata store fake
// ============================================================================

#[derive(Default)]
pub struct FakeStore {
    log: CallLog,
    documents: Mutex<Vec<(String, Document)>>,
    next_id: Mutex<usize>,
    /// `add` into this collection fails
    pub failing_adds: Mutex<HashSet<String>>,
    /// `delete` of these ids fails
    pub failing_deletes: Mutex<HashSet<String>>,
}

impl FakeStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    pub fn count(&self, collection: &str) -> usize {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == collection)
            .count()
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn add(&self, collection: &str, data: serde_json::Value) -> BridgeResult<String> {
        self.record(format!("store:add:{}", collection));
        if self.failing_adds.lock().unwrap().contains(collection) {
            return Err(BridgeError::DatabaseError("quota exceeded".to_string()));
        }
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("doc-{}", next)
        };
        self.documents
            .lock()
            .unwrap()
            .push((collection.to_string(), Document::new(id.clone(), data)));
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: serde_json::Value) -> BridgeResult<()> {
        self.record(format!("store:set:{}:{}", collection, id));
        let mut documents = self.documents.lock().unwrap();
        match documents
            .iter_mut()
            .find(|(c, d)| c == collection && d.id == id)
        {
            Some((_, doc)) => doc.data = data,
            None => documents.push((collection.to_string(), Document::new(id, data))),
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> BridgeResult<Option<Document>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|(c, d)| c == collection && d.id == id)
            .map(|(_, d)| d.clone()))
    }

    async fn list(&self, collection: &str) -> BridgeResult<Vec<Document>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == collection)
            .map(|(_, d)| d.clone())
            .collect())
    }

    async fn delete(&self, collection: &str, id: &str) -> BridgeResult<bool> {
        self.record(format!("store:delete:{}:{}", collection, id));
        if self.failing_deletes.lock().unwrap().contains(id) {
            return Err(BridgeError::DatabaseError("database is locked".to_string()));
        }
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|(c, d)| !(c == collection && d.id == id));
        Ok(documents.len() != before)
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub struct Harness {
    pub log: CallLog,
    pub drive: Arc<FakeDrive>,
    pub store: Arc<FakeStore>,
    pub event_bus: Arc<EventBus>,
    pub resolver: Arc<FolderResolver>,
    pub gateway: Arc<TransferGateway>,
    pub catalog: CatalogService,
    pub uploads: UploadOrchestrator,
    pub reconciler: Reconciler,
    pub covers: CoverService,
    pub bootstrap: SessionBootstrap,
}

impl Harness {
    pub fn new() -> Self {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let drive = Arc::new(FakeDrive::new(Arc::clone(&log)));
        let store = Arc::new(FakeStore::new(Arc::clone(&log)));
        let event_bus = Arc::new(EventBus::new(64));
        let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 6, 14, 18, 30, 0).unwrap()));

        let albums = Arc::new(DocumentAlbumRepository::new(store.clone()));
        let photos = Arc::new(DocumentPhotoRepository::new(store.clone()));
        let cover_repo = Arc::new(DocumentCoverRepository::new(store.clone()));

        let resolver = Arc::new(FolderResolver::new(drive.clone()));
        let gateway = Arc::new(TransferGateway::new(drive.clone()));

        Self {
            catalog: CatalogService::new(
                albums.clone(),
                photos.clone(),
                event_bus.clone(),
                clock.clone(),
            ),
            uploads: UploadOrchestrator::new(
                resolver.clone(),
                gateway.clone(),
                photos.clone(),
                event_bus.clone(),
                clock.clone(),
            ),
            reconciler: Reconciler::new(gateway.clone(), albums, photos, event_bus.clone()),
            covers: CoverService::new(
                resolver.clone(),
                gateway.clone(),
                cover_repo,
                event_bus.clone(),
                clock,
                "cover",
            ),
            bootstrap: SessionBootstrap::new(resolver.clone(), "Album-Boda", event_bus.clone()),
            log,
            drive,
            store,
            event_bus,
            resolver,
            gateway,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.log.lock().unwrap().clear();
    }

    /// Calls whose entry starts with `prefix`
    pub fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

pub fn session() -> Session {
    Session::new(
        Credential::new("ya29.test").with_email("novios@example.com"),
        Some(ROOT_ID.to_string()),
    )
}

pub fn jpeg(name: &str) -> CandidateFile {
    CandidateFile::new(name, &b"\xFF\xD8\xFF\xE0"[..], "image/jpeg")
}

pub fn file(name: &str, mime_type: &str) -> CandidateFile {
    CandidateFile::new(name, &b"data"[..], mime_type)
}
