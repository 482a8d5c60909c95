//! In-memory backend
//!
//! Cloned handles share state, so a test can keep one handle for
//! inspection while a client owns another.

use super::{Backend, BackendError, BackendResult, Connector, Operation};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use swiftbox_core::{Credentials, ObjectInfo};
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    last_modified: DateTime<Utc>,
}

type Container = BTreeMap<String, StoredObject>;

#[derive(Debug, Default)]
struct Inner {
    containers: RwLock<BTreeMap<String, Container>>,
    failures: Mutex<HashMap<Operation, String>>,
    calls: Mutex<Vec<Operation>>,
    cascading_deletes: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow deleting non-empty containers, dropping their objects
    pub fn with_cascading_deletes() -> Self {
        Self {
            inner: Arc::new(Inner {
                cascading_deletes: true,
                ..Inner::default()
            }),
        }
    }

    /// Make every call to `op` fail with `message` until cleared
    pub fn fail_on(&self, op: Operation, message: impl Into<String>) {
        self.inner.failures.lock().insert(op, message.into());
    }

    pub fn clear_failure(&self, op: Operation) {
        self.inner.failures.lock().remove(&op);
    }

    /// Operations received so far, in order
    pub fn calls(&self) -> Vec<Operation> {
        self.inner.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().len()
    }

    /// Container names, without recording a call
    pub fn container_names(&self) -> Vec<String> {
        self.inner.containers.read().keys().cloned().collect()
    }

    /// Number of objects in a container, without recording a call
    pub fn object_count(&self, container: &str) -> Option<usize> {
        self.inner.containers.read().get(container).map(|c| c.len())
    }

    fn begin(&self, op: Operation) -> BackendResult<()> {
        self.inner.calls.lock().push(op);
        match self.inner.failures.lock().get(&op) {
            Some(message) => Err(BackendError::new(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_containers(&self, prefix: &str) -> BackendResult<Vec<String>> {
        self.begin(Operation::ListContainers)?;
        let containers = self.inner.containers.read();
        Ok(containers
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn create_container(&self, name: &str) -> BackendResult<()> {
        self.begin(Operation::CreateContainer)?;
        let mut containers = self.inner.containers.write();
        if containers.contains_key(name) {
            return Err(BackendError::bucket_already_exists(name));
        }
        containers.insert(name.to_string(), Container::new());
        debug!("Created container {}", name);
        Ok(())
    }

    async fn delete_container(&self, name: &str) -> BackendResult<()> {
        self.begin(Operation::DeleteContainer)?;
        let mut containers = self.inner.containers.write();
        match containers.get(name) {
            None => return Err(BackendError::no_such_bucket(name)),
            Some(objects) if !objects.is_empty() && !self.inner.cascading_deletes => {
                return Err(BackendError::bucket_not_empty(name));
            }
            Some(_) => {}
        }
        containers.remove(name);
        debug!("Deleted container {}", name);
        Ok(())
    }

    async fn list_objects(&self, container: &str) -> BackendResult<Vec<ObjectInfo>> {
        self.begin(Operation::ListObjects)?;
        let containers = self.inner.containers.read();
        let objects = containers
            .get(container)
            .ok_or_else(|| BackendError::no_such_bucket(container))?;

        Ok(objects
            .iter()
            .map(|(name, obj)| ObjectInfo::new(name, obj.data.len() as i64, obj.last_modified))
            .collect())
    }

    async fn put_object(&self, container: &str, name: &str, data: Bytes) -> BackendResult<()> {
        self.begin(Operation::PutObject)?;
        let mut containers = self.inner.containers.write();
        let objects = containers
            .get_mut(container)
            .ok_or_else(|| BackendError::no_such_bucket(container))?;

        debug!("Stored object {}/{} ({} bytes)", container, name, data.len());
        objects.insert(
            name.to_string(),
            StoredObject {
                data,
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, container: &str, name: &str) -> BackendResult<Bytes> {
        self.begin(Operation::GetObject)?;
        let containers = self.inner.containers.read();
        let objects = containers
            .get(container)
            .ok_or_else(|| BackendError::no_such_bucket(container))?;

        objects
            .get(name)
            .map(|obj| obj.data.clone())
            .ok_or_else(|| BackendError::no_such_key(container, name))
    }

    async fn delete_object(&self, container: &str, name: &str) -> BackendResult<()> {
        self.begin(Operation::DeleteObject)?;
        let mut containers = self.inner.containers.write();
        let objects = containers
            .get_mut(container)
            .ok_or_else(|| BackendError::no_such_bucket(container))?;

        objects
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| BackendError::no_such_key(container, name))
    }
}

/// Hands out handles to a shared [`MemoryBackend`]
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    backend: MemoryBackend,
    accepted: Option<(String, String)>,
}

impl MemoryConnector {
    pub fn new(backend: MemoryBackend) -> Self {
        Self {
            backend,
            accepted: None,
        }
    }

    /// Reject any other username/password pair
    pub fn require_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.accepted = Some((username.into(), password.into()));
        self
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn authenticate(&self, credentials: &Credentials) -> BackendResult<Box<dyn Backend>> {
        if let Some((username, password)) = &self.accepted {
            if credentials.username != *username || credentials.password != *password {
                return Err(BackendError::new(format!(
                    "Authentication failed for user {}: got 401 Unauthorized",
                    credentials.username
                )));
            }
        }
        Ok(Box::new(self.backend.clone()))
    }
}
