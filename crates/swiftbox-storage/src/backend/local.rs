//! Local filesystem backend
//!
//! Layout: `<data_dir>/<tenant>/<container>/objects/<percent-encoded name>`

use super::{Backend, BackendError, BackendResult, Connector};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use std::path::{Path, PathBuf};
use swiftbox_core::{Credentials, ObjectInfo};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub async fn init(&self) -> BackendResult<()> {
        fs::create_dir_all(&self.root).await?;
        info!("Local storage initialized at {:?}", self.root);
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn container_path(&self, container: &str) -> BackendResult<PathBuf> {
        // Container names become directory names under the account root
        if container.is_empty()
            || container.contains('/')
            || container.contains('\\')
            || container == "."
            || container == ".."
        {
            return Err(BackendError::new(format!(
                "InvalidBucketName: The specified bucket is not valid: {:?}",
                container
            )));
        }
        Ok(self.root.join(container))
    }

    fn objects_path(&self, container: &str) -> BackendResult<PathBuf> {
        Ok(self.container_path(container)?.join("objects"))
    }

    fn object_path(&self, container: &str, name: &str) -> BackendResult<PathBuf> {
        let encoded = utf8_percent_encode(name, NON_ALPHANUMERIC).to_string();
        Ok(self.objects_path(container)?.join(encoded))
    }

    async fn require_container(&self, container: &str) -> BackendResult<()> {
        if !fs::try_exists(self.objects_path(container)?).await? {
            return Err(BackendError::no_such_bucket(container));
        }
        Ok(())
    }

    /// Health check - verify storage is accessible
    pub async fn health_check(&self) -> BackendResult<()> {
        if !self.root.exists() {
            return Err(BackendError::internal("Data directory does not exist"));
        }

        let test_file = self.root.join(".health_check");
        match fs::write(&test_file, "ok").await {
            Ok(_) => {
                let _ = fs::remove_file(&test_file).await;
                Ok(())
            }
            Err(e) => Err(BackendError::internal(format!("Storage not writable: {}", e))),
        }
    }
}

#[async_trait]
impl Backend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list_containers(&self, prefix: &str) -> BackendResult<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(prefix) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn create_container(&self, name: &str) -> BackendResult<()> {
        let path = self.container_path(name)?;
        if fs::try_exists(&path).await? {
            return Err(BackendError::bucket_already_exists(name));
        }
        fs::create_dir_all(path.join("objects")).await?;
        info!("Created container {}", name);
        Ok(())
    }

    async fn delete_container(&self, name: &str) -> BackendResult<()> {
        self.require_container(name).await?;

        let mut entries = fs::read_dir(self.objects_path(name)?).await?;
        if entries.next_entry().await?.is_some() {
            return Err(BackendError::bucket_not_empty(name));
        }

        fs::remove_dir_all(self.container_path(name)?).await?;
        info!("Deleted container {}", name);
        Ok(())
    }

    async fn list_objects(&self, container: &str) -> BackendResult<Vec<ObjectInfo>> {
        self.require_container(container).await?;

        let mut objects = Vec::new();
        let mut entries = fs::read_dir(self.objects_path(container)?).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let encoded = file_name.to_string_lossy();
            let name = match percent_decode_str(&encoded).decode_utf8() {
                Ok(name) => name.into_owned(),
                Err(e) => {
                    warn!("Skipping undecodable object file {:?}: {}", file_name, e);
                    continue;
                }
            };

            let metadata = entry.metadata().await?;
            let last_modified: DateTime<Utc> = metadata.modified()?.into();
            objects.push(ObjectInfo::new(name, metadata.len() as i64, last_modified));
        }
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    async fn put_object(&self, container: &str, name: &str, data: Bytes) -> BackendResult<()> {
        self.require_container(container).await?;

        let path = self.object_path(container, name)?;
        let mut file = fs::File::create(&path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;

        debug!("Stored object {}/{} ({} bytes)", container, name, data.len());
        Ok(())
    }

    async fn get_object(&self, container: &str, name: &str) -> BackendResult<Bytes> {
        self.require_container(container).await?;

        let path = self.object_path(container, name)?;
        if !fs::try_exists(&path).await? {
            return Err(BackendError::no_such_key(container, name));
        }

        let data = fs::read(&path).await?;
        debug!("Retrieved object {}/{} ({} bytes)", container, name, data.len());
        Ok(Bytes::from(data))
    }

    async fn delete_object(&self, container: &str, name: &str) -> BackendResult<()> {
        self.require_container(container).await?;

        let path = self.object_path(container, name)?;
        if !fs::try_exists(&path).await? {
            return Err(BackendError::no_such_key(container, name));
        }

        fs::remove_file(&path).await?;
        debug!("Deleted object {}/{}", container, name);
        Ok(())
    }
}

/// Opens the per-tenant directory under a data directory
#[derive(Debug, Clone)]
pub struct LocalConnector {
    data_dir: PathBuf,
}

impl LocalConnector {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl Connector for LocalConnector {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn authenticate(&self, credentials: &Credentials) -> BackendResult<Box<dyn Backend>> {
        let tenant = credentials.tenant().unwrap_or(swiftbox_core::DEFAULT_TENANT);
        if tenant.contains('/') || tenant.contains('\\') || tenant == "." || tenant == ".." {
            return Err(BackendError::new(format!("Invalid tenant id: {}", tenant)));
        }

        let backend = LocalBackend::new(self.data_dir.join(tenant));
        backend.init().await?;
        backend.health_check().await?;

        debug!("Opened local account {:?} for {}", backend.root(), credentials.username);
        Ok(Box::new(backend))
    }
}
