//! Storage client facade

use crate::classify;
use bytes::Bytes;
use std::path::Path;
use swiftbox_core::config::ClientConfig;
use swiftbox_core::types::{validate_container_name, validate_object_name};
use swiftbox_core::utils::object_name_from_path;
use swiftbox_core::{Credentials, EmptinessCheck, Error, ObjectInfo, Result};
use swiftbox_storage::{Backend, Connector};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Behavior switches for a [`StorageClient`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub emptiness_check: EmptinessCheck,
}

impl ClientOptions {
    pub fn with_emptiness_check(mut self, check: EmptinessCheck) -> Self {
        self.emptiness_check = check;
        self
    }
}

impl From<&ClientConfig> for ClientOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            emptiness_check: config.emptiness_check,
        }
    }
}

/// Container and object operations over one authenticated backend
/// connection. Every failure is reported as a classified [`Error`].
pub struct StorageClient {
    backend: Box<dyn Backend>,
    options: ClientOptions,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("backend", &self.backend.name())
            .field("options", &self.options)
            .finish()
    }
}

impl StorageClient {
    /// Authenticate and wrap the resulting connection.
    ///
    /// Authentication failures are not classified: they surface as
    /// [`Error::Backend`] with the provider message.
    pub async fn connect(connector: &dyn Connector, credentials: &Credentials) -> Result<Self> {
        Self::connect_with(connector, credentials, ClientOptions::default()).await
    }

    pub async fn connect_with(
        connector: &dyn Connector,
        credentials: &Credentials,
        options: ClientOptions,
    ) -> Result<Self> {
        debug!(
            "Authenticating {} against {} ({})",
            credentials.username,
            credentials.auth_url,
            connector.name()
        );

        let backend = connector
            .authenticate(credentials)
            .await
            .map_err(classify::authenticate)?;

        info!("Connected to {} backend", backend.name());
        Ok(Self { backend, options })
    }

    /// Wrap an already authenticated connection
    pub fn from_backend(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            options: ClientOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Container names starting with `prefix` (empty matches all)
    pub async fn list_containers(&self, prefix: &str) -> Result<Vec<String>> {
        let names = self
            .backend
            .list_containers(prefix)
            .await
            .map_err(classify::list_containers)?;

        debug!("Listed {} containers with prefix {:?}", names.len(), prefix);
        Ok(names)
    }

    /// Create a container.
    ///
    /// Fails with [`Error::AlreadyExists`] when it already exists.
    pub async fn create_container(&self, name: &str) -> Result<()> {
        validate_container_name(name)?;

        self.backend
            .create_container(name)
            .await
            .map_err(|e| classify::create_container(e, name))?;

        info!("Created container {}", name);
        Ok(())
    }

    /// Delete an empty container.
    ///
    /// Runs the configured emptiness check first and fails with
    /// [`Error::Conflict`] without deleting when it finds any entry. The
    /// check and the delete are separate requests.
    pub async fn delete_container(&self, name: &str) -> Result<()> {
        validate_container_name(name)?;

        let blocking = match self.options.emptiness_check {
            EmptinessCheck::Objects => self.list_objects(name).await?.len(),
            EmptinessCheck::ContainerPrefix => self.list_containers(name).await?.len(),
        };
        if blocking > 0 {
            warn!(
                "Refusing to delete container {}: {} entries found by {} check",
                name,
                blocking,
                self.options.emptiness_check.as_str()
            );
            return Err(Error::Conflict(name.to_string()));
        }

        self.backend
            .delete_container(name)
            .await
            .map_err(|e| classify::delete_container(e, name))?;

        info!("Deleted container {}", name);
        Ok(())
    }

    /// Upload a local file under its base name.
    ///
    /// An unopenable path fails with [`Error::CannotOpenFile`] before the
    /// backend is contacted.
    pub async fn upload_file(&self, container: &str, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        validate_container_name(container)?;

        let cannot_open = |source| Error::CannotOpenFile {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).await.map_err(cannot_open)?;
        let metadata = file.metadata().await.map_err(cannot_open)?;
        if !metadata.is_file() {
            return Err(cannot_open(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        let object = object_name_from_path(path).ok_or_else(|| {
            Error::InvalidArgument(format!("Path has no file name: {:?}", path))
        })?;

        self.upload(container, &object, file).await
    }

    /// Upload everything `reader` yields as one object, replacing any
    /// existing object of the same name.
    pub async fn upload<R>(&self, container: &str, object: &str, mut reader: R) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        validate_container_name(container)?;
        validate_object_name(object)?;

        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.map_err(|e| {
            Error::Backend(format!(
                "Failed to read upload source for {}/{}: {}",
                container, object, e
            ))
        })?;

        let size = buf.len();
        self.backend
            .put_object(container, object, Bytes::from(buf))
            .await
            .map_err(|e| classify::upload(e, container))?;

        info!("Uploaded {}/{} ({} bytes)", container, object, size);
        Ok(())
    }

    /// Download an object into a local file, creating or truncating it.
    ///
    /// The destination is created before the object is fetched. A failure
    /// writing it is reported as [`Error::Backend`].
    pub async fn download_file(
        &self,
        container: &str,
        object: &str,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        validate_container_name(container)?;
        validate_object_name(object)?;

        let mut file = File::create(path)
            .await
            .map_err(|source| Error::CannotCreateFile {
                path: path.to_path_buf(),
                source,
            })?;

        let data = self
            .backend
            .get_object(container, object)
            .await
            .map_err(|e| classify::download(e, container, object))?;

        let write_failed = |e: std::io::Error| {
            Error::Backend(format!("Failed to write {:?}: {}", path, e))
        };
        file.write_all(&data).await.map_err(write_failed)?;
        file.flush().await.map_err(write_failed)?;

        info!(
            "Downloaded {}/{} to {:?} ({} bytes)",
            container,
            object,
            path,
            data.len()
        );
        Ok(())
    }

    pub async fn delete_object(&self, container: &str, object: &str) -> Result<()> {
        validate_container_name(container)?;
        validate_object_name(object)?;

        self.backend
            .delete_object(container, object)
            .await
            .map_err(|e| classify::delete_object(e, container, object))?;

        info!("Deleted object {}/{}", container, object);
        Ok(())
    }

    /// Every object in a container
    pub async fn list_objects(&self, container: &str) -> Result<Vec<ObjectInfo>> {
        validate_container_name(container)?;

        let objects = self
            .backend
            .list_objects(container)
            .await
            .map_err(|e| classify::list_objects(e, container))?;

        debug!("Listed {} objects in {}", objects.len(), container);
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiftbox_core::ErrorKind;
    use swiftbox_storage::{LocalConnector, MemoryBackend, MemoryConnector, Operation};

    fn memory_client() -> (MemoryBackend, StorageClient) {
        let backend = MemoryBackend::new();
        let client = StorageClient::from_backend(Box::new(backend.clone()));
        (backend, client)
    }

    #[tokio::test]
    async fn test_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let (_backend, client) = memory_client();

        client.create_container("c1").await.unwrap();
        let err = client.create_container("c1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let upload_path = dir.path().join("a.txt");
        std::fs::write(&upload_path, "hello\n").unwrap();
        client.upload_file("c1", &upload_path).await.unwrap();

        let download_path = dir.path().join("b.txt");
        client
            .download_file("c1", "a.txt", &download_path)
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&download_path).unwrap(), "hello\n");

        client.delete_object("c1", "a.txt").await.unwrap();
        client.delete_container("c1").await.unwrap();
        assert!(client.list_containers("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scenario_on_local_backend() {
        let data = tempfile::tempdir().unwrap();
        let files = tempfile::tempdir().unwrap();
        let connector = LocalConnector::new(data.path());
        let creds = Credentials::new("file://", "tester", "").with_tenant_id("t1");
        let client = StorageClient::connect(&connector, &creds).await.unwrap();

        client.create_container("conoha_container2").await.unwrap();

        let ulfile = files.path().join("ulfile");
        std::fs::write(&ulfile, "object strage test\n").unwrap();
        client.upload_file("conoha_container2", &ulfile).await.unwrap();

        let listing = client.list_objects("conoha_container2").await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "ulfile");
        assert_eq!(listing[0].size_bytes, 19);

        let dlfile = files.path().join("dlfile");
        client
            .download_file("conoha_container2", "ulfile", &dlfile)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&dlfile).unwrap(), b"object strage test\n");

        let err = client.delete_container("conoha_container2").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        client.delete_object("conoha_container2", "ulfile").await.unwrap();
        client.delete_container("conoha_container2").await.unwrap();
    }

    #[tokio::test]
    async fn test_round_trip_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let (_backend, client) = memory_client();
        client.create_container("blobs").await.unwrap();

        let binary: Vec<u8> = (0..=255u8).collect();
        let large: Vec<u8> = (0..1_000_000u32).map(|i| (i % 251) as u8).collect();
        let samples: [&[u8]; 4] = [b"", b"hello\n", &binary, &large];

        for (i, sample) in samples.iter().enumerate() {
            let name = format!("sample-{}", i);
            client.upload("blobs", &name, *sample).await.unwrap();

            let dest = dir.path().join(&name);
            client.download_file("blobs", &name, &dest).await.unwrap();
            assert_eq!(std::fs::read(&dest).unwrap(), *sample);
        }
    }

    #[tokio::test]
    async fn test_upload_overwrites() {
        let (backend, client) = memory_client();
        client.create_container("c1").await.unwrap();

        client.upload("c1", "k", &b"first"[..]).await.unwrap();
        client.upload("c1", "k", &b"second!"[..]).await.unwrap();

        let listing = client.list_objects("c1").await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].size_bytes, 7);
        assert_eq!(backend.object_count("c1"), Some(1));
    }

    #[tokio::test]
    async fn test_delete_non_empty_container_is_conflict() {
        let (backend, client) = memory_client();
        client.create_container("c1").await.unwrap();
        client.upload("c1", "a.txt", &b"hello\n"[..]).await.unwrap();

        let err = client.delete_container("c1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        assert!(!backend.calls().contains(&Operation::DeleteContainer));
        assert_eq!(backend.container_names(), vec!["c1".to_string()]);
        assert_eq!(backend.object_count("c1"), Some(1));
    }

    #[tokio::test]
    async fn test_conflict_even_when_backend_cascades() {
        let backend = MemoryBackend::with_cascading_deletes();
        let client = StorageClient::from_backend(Box::new(backend.clone()));
        client.create_container("c1").await.unwrap();
        client.upload("c1", "a", &b"x"[..]).await.unwrap();

        let err = client.delete_container("c1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(backend.object_count("c1"), Some(1));
    }

    #[tokio::test]
    async fn test_prefix_check_mode() {
        let backend = MemoryBackend::new();
        let client = StorageClient::from_backend(Box::new(backend.clone())).with_options(
            ClientOptions::default().with_emptiness_check(EmptinessCheck::ContainerPrefix),
        );

        // An empty container still matches its own name as a prefix
        client.create_container("logs").await.unwrap();
        let err = client.delete_container("logs").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            backend.calls(),
            vec![Operation::CreateContainer, Operation::ListContainers]
        );
        assert_eq!(backend.container_names(), vec!["logs".to_string()]);

        // A missing container has no prefix matches and reaches the delete
        let err = client.delete_container("missing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_missing_container() {
        let (backend, client) = memory_client();
        let err = client.delete_container("not_exist_container").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(backend.calls(), vec![Operation::ListObjects]);
    }

    #[tokio::test]
    async fn test_delete_conflict_reported_by_backend() {
        let (backend, client) = memory_client();
        client.create_container("c1").await.unwrap();
        backend.fail_on(
            Operation::DeleteContainer,
            "Expected HTTP response code [202 204] when accessing [DELETE /v1/AUTH_t/c1], but got 409 instead",
        );

        let err = client.delete_container("c1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_missing_object_and_container() {
        let dir = tempfile::tempdir().unwrap();
        let (_backend, client) = memory_client();
        client.create_container("c1").await.unwrap();

        let dest = dir.path().join("out");
        let err = client.download_file("c1", "nope", &dest).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSuchKey);

        let err = client.download_file("c2", "nope", &dest).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = client.delete_object("c1", "nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSuchKey);

        let err = client.delete_object("c2", "nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = client.list_objects("c2").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = client.upload("c2", "k", &b"data"[..]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_local_file_errors_skip_backend() {
        let dir = tempfile::tempdir().unwrap();
        let (backend, client) = memory_client();

        let err = client
            .upload_file("c1", dir.path().join("does-not-exist"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CannotOpenFile);

        let err = client.upload_file("c1", dir.path()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CannotOpenFile);

        let err = client
            .download_file("c1", "a.txt", dir.path().join("missing-dir").join("b.txt"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CannotCreateFile);

        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_names_skip_backend() {
        let (backend, client) = memory_client();

        assert_eq!(
            client.create_container("").await.unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            client.upload("c1", "", &b""[..]).await.unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_dot_segment_container_names_rejected() {
        let data = tempfile::tempdir().unwrap();
        let connector = LocalConnector::new(data.path());

        // Another tenant named like the per-container objects directory
        let other = Credentials::new("file://", "bob", "").with_tenant_id("objects");
        let other = StorageClient::connect(&connector, &other).await.unwrap();
        other.create_container("keep").await.unwrap();

        let creds = Credentials::new("file://", "alice", "").with_tenant_id("t1");
        let client = StorageClient::connect(&connector, &creds).await.unwrap();

        let err = client.create_container(".").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = client.delete_container("..").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = client.delete_container(".").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        assert!(data.path().join("t1").exists());
        assert!(data.path().join("objects").join("keep").exists());
        assert_eq!(other.list_containers("").await.unwrap(), vec!["keep".to_string()]);
    }

    #[tokio::test]
    async fn test_unclassified_errors_keep_message() {
        let (backend, client) = memory_client();
        backend.fail_on(Operation::ListContainers, "ServiceUnavailable: try later (HTTP 503)");

        let err = client.list_containers("conoha_").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendFailure);
        assert_eq!(
            err.backend_detail(),
            Some("ServiceUnavailable: try later (HTTP 503)")
        );
    }

    #[tokio::test]
    async fn test_connect() {
        let backend = MemoryBackend::new();
        let connector = MemoryConnector::new(backend.clone()).require_credentials("alice", "pw");

        let creds = Credentials::new("memory://", "alice", "pw");
        let client = StorageClient::connect(&connector, &creds).await.unwrap();
        assert_eq!(client.backend_name(), "memory");
        assert_eq!(client.options().emptiness_check, EmptinessCheck::Objects);

        let creds = Credentials::new("memory://", "alice", "wrong");
        let err = StorageClient::connect(&connector, &creds).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendFailure);
        assert!(err.to_string().contains("401"));
    }
}
