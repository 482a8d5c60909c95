//! S3-compatible backend using the AWS SDK.

use super::{Backend, BackendError, BackendResult, Connector};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials as AwsCredentials;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;
use swiftbox_core::config::BackendConfig;
use swiftbox_core::{Credentials, ObjectInfo};
use tracing::{debug, instrument};

/// Render an SDK error as `"{code}: {message} (HTTP {status})"`.
///
/// Bodiless responses (HEAD) carry no code, so one is derived from the status.
fn describe_sdk_error<E>(err: SdkError<E>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    if let SdkError::ServiceError(ref service_err) = err {
        let status = service_err.raw().status().as_u16();
        let code = service_err
            .err()
            .code()
            .unwrap_or_else(|| status_code_name(status));
        let message = service_err.err().message().unwrap_or("");
        return BackendError::new(format!("{}: {} (HTTP {})", code, message, status));
    }
    BackendError::new(DisplayErrorContext(&err).to_string())
}

fn status_code_name(status: u16) -> &'static str {
    match status {
        301 => "PermanentRedirect",
        400 => "BadRequest",
        401 => "Unauthorized",
        403 => "AccessDenied",
        404 => "NotFound",
        409 => "Conflict",
        _ => "ServiceError",
    }
}

fn is_not_found<E>(err: &SdkError<E>) -> bool {
    matches!(err, SdkError::ServiceError(service_err) if service_err.raw().status().as_u16() == 404)
}

fn normalize_endpoint(endpoint: &str) -> String {
    let lower = endpoint.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        endpoint.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", endpoint.trim_end_matches('/'))
    }
}

/// Authenticates against an S3-compatible endpoint.
///
/// `auth_url` is the endpoint, `username`/`password` are the access and
/// secret keys. Tenant and domain are not part of S3 request signing.
#[derive(Debug, Clone)]
pub struct S3Connector {
    region: String,
    path_style: bool,
    timeout: Duration,
}

impl S3Connector {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            path_style: true,
            timeout: Duration::from_secs(swiftbox_core::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.region.clone())
            .with_path_style(config.path_style)
            .with_timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_path_style(mut self, path_style: bool) -> Self {
        self.path_style = path_style;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn client_config(
        &self,
        credentials: &Credentials,
    ) -> BackendResult<aws_sdk_s3::config::Builder> {
        if credentials.auth_url.is_empty() {
            return Err(BackendError::new("Missing endpoint: auth_url is empty"));
        }
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(BackendError::new(
                "Missing credentials: username and password are required",
            ));
        }

        let aws_credentials = AwsCredentials::new(
            &credentials.username,
            &credentials.password,
            None,
            None,
            "swiftbox",
        );

        let timeouts = TimeoutConfig::builder()
            .operation_timeout(self.timeout)
            .build();

        Ok(aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(aws_credentials)
            .endpoint_url(normalize_endpoint(&credentials.auth_url))
            .force_path_style(self.path_style)
            .timeout_config(timeouts))
    }

    fn build_client(&self, credentials: &Credentials) -> BackendResult<Client> {
        Ok(Client::from_conf(self.client_config(credentials)?.build()))
    }
}

#[async_trait]
impl Connector for S3Connector {
    fn name(&self) -> &'static str {
        "s3"
    }

    #[instrument(skip(self, credentials), fields(backend = "s3", user = %credentials.username))]
    async fn authenticate(&self, credentials: &Credentials) -> BackendResult<Box<dyn Backend>> {
        let client = self.build_client(credentials)?;

        // Signing is lazy; a cheap listing proves the keys are accepted.
        client
            .list_buckets()
            .send()
            .await
            .map_err(describe_sdk_error)?;

        debug!(
            tenant = %credentials.tenant_id,
            domain = %credentials.domain_name,
            "Authenticated against {}",
            credentials.auth_url
        );

        Ok(Box::new(S3Backend {
            client,
            region: self.region.clone(),
        }))
    }
}

/// Authenticated S3 connection
pub struct S3Backend {
    client: Client,
    region: String,
}

impl std::fmt::Debug for S3Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Backend")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl S3Backend {
    async fn bucket_exists(&self, container: &str) -> BackendResult<bool> {
        match self.client.head_bucket().bucket(container).send().await {
            Ok(_) => Ok(true),
            Err(err) if is_not_found(&err) => Ok(false),
            Err(err) => Err(describe_sdk_error(err)),
        }
    }
}

#[async_trait]
impl Backend for S3Backend {
    fn name(&self) -> &'static str {
        "s3"
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn list_containers(&self, prefix: &str) -> BackendResult<Vec<String>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(describe_sdk_error)?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| b.name())
            .filter(|name| name.starts_with(prefix))
            .map(|name| name.to_string())
            .collect())
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn create_container(&self, name: &str) -> BackendResult<()> {
        let mut req = self.client.create_bucket().bucket(name);

        // us-east-1 rejects an explicit location constraint
        if self.region != swiftbox_core::DEFAULT_REGION {
            let constraint = BucketLocationConstraint::from(self.region.as_str());
            let config = CreateBucketConfiguration::builder()
                .location_constraint(constraint)
                .build();
            req = req.create_bucket_configuration(config);
        }

        req.send().await.map_err(describe_sdk_error)?;
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn delete_container(&self, name: &str) -> BackendResult<()> {
        self.client
            .delete_bucket()
            .bucket(name)
            .send()
            .await
            .map_err(describe_sdk_error)?;
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn list_objects(&self, container: &str) -> BackendResult<Vec<ObjectInfo>> {
        let mut results = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(container);
            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let output = request.send().await.map_err(describe_sdk_error)?;

            for obj in output.contents() {
                let Some(key) = obj.key() else { continue };
                let last_modified = obj
                    .last_modified()
                    .and_then(|dt| DateTime::<Utc>::from_timestamp(dt.secs(), dt.subsec_nanos()))
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
                results.push(ObjectInfo::new(key, obj.size().unwrap_or(0), last_modified));
            }

            if output.is_truncated() == Some(true) {
                continuation_token = output.next_continuation_token().map(|s| s.to_string());
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        Ok(results)
    }

    #[instrument(skip(self, data), fields(backend = "s3", size = data.len()))]
    async fn put_object(&self, container: &str, name: &str, data: Bytes) -> BackendResult<()> {
        self.client
            .put_object()
            .bucket(container)
            .key(name)
            .body(data.into())
            .send()
            .await
            .map_err(describe_sdk_error)?;
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn get_object(&self, container: &str, name: &str) -> BackendResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(container)
            .key(name)
            .send()
            .await
            .map_err(describe_sdk_error)?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| BackendError::new(format!("Failed to read object body: {}", e)))?
            .into_bytes();

        Ok(bytes)
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn delete_object(&self, container: &str, name: &str) -> BackendResult<()> {
        // DeleteObject succeeds on missing keys, so probe first
        match self
            .client
            .head_object()
            .bucket(container)
            .key(name)
            .send()
            .await
        {
            Ok(_) => {}
            Err(err) if is_not_found(&err) => {
                if self.bucket_exists(container).await? {
                    return Err(BackendError::no_such_key(container, name));
                }
                return Err(BackendError::no_such_bucket(container));
            }
            Err(err) => return Err(describe_sdk_error(err)),
        }

        self.client
            .delete_object()
            .bucket(container)
            .key(name)
            .send()
            .await
            .map_err(describe_sdk_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
    use aws_smithy_types::body::SdkBody;

    const ENDPOINT: &str = "http://localhost:9000";

    fn error_body(code: &str, message: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>{}</Code><Message>{}</Message><RequestId>4442587FB7D0A2F9</RequestId></Error>"#,
            code, message
        )
    }

    fn event(uri: &str, status: u16, body: impl Into<SdkBody>) -> ReplayEvent {
        ReplayEvent::new(
            http::Request::builder()
                .uri(format!("{}{}", ENDPOINT, uri))
                .body(SdkBody::empty())
                .unwrap(),
            http::Response::builder()
                .status(status)
                .body(body.into())
                .unwrap(),
        )
    }

    /// Backend whose HTTP exchanges are answered from `events`, in order
    fn replay_backend(events: Vec<ReplayEvent>) -> (StaticReplayClient, S3Backend) {
        let http_client = StaticReplayClient::new(events);
        let config = S3Connector::new("us-east-1")
            .client_config(&Credentials::new(ENDPOINT, "access", "secret"))
            .unwrap()
            .http_client(http_client.clone())
            .build();

        let backend = S3Backend {
            client: Client::from_conf(config),
            region: "us-east-1".to_string(),
        };
        (http_client, backend)
    }

    #[tokio::test]
    async fn test_service_errors_render_code_message_and_status() {
        let (_http, backend) = replay_backend(vec![event(
            "/missing?list-type=2",
            404,
            error_body("NoSuchBucket", "The specified bucket does not exist"),
        )]);

        let err = backend.list_objects("missing").await.unwrap_err();
        assert_eq!(
            err.message(),
            "NoSuchBucket: The specified bucket does not exist (HTTP 404)"
        );
    }

    #[tokio::test]
    async fn test_create_existing_bucket_keeps_code() {
        let (_http, backend) = replay_backend(vec![event(
            "/c1",
            409,
            error_body(
                "BucketAlreadyOwnedByYou",
                "Your previous request to create the named bucket succeeded and you already own it.",
            ),
        )]);

        let err = backend.create_container("c1").await.unwrap_err();
        assert!(err.message().starts_with("BucketAlreadyOwnedByYou: "));
        assert!(err.message().ends_with("(HTTP 409)"));
    }

    #[tokio::test]
    async fn test_delete_missing_key_in_existing_bucket() {
        let (http, backend) = replay_backend(vec![
            event("/c1/a.txt", 404, SdkBody::empty()),
            event("/c1", 200, SdkBody::empty()),
        ]);

        let err = backend.delete_object("c1", "a.txt").await.unwrap_err();
        assert_eq!(err, BackendError::no_such_key("c1", "a.txt"));
        assert_eq!(http.actual_requests().count(), 2);
    }

    #[tokio::test]
    async fn test_delete_object_in_missing_bucket() {
        let (_http, backend) = replay_backend(vec![
            event("/c2/a.txt", 404, SdkBody::empty()),
            event("/c2", 404, SdkBody::empty()),
        ]);

        let err = backend.delete_object("c2", "a.txt").await.unwrap_err();
        assert_eq!(err, BackendError::no_such_bucket("c2"));
    }

    #[tokio::test]
    async fn test_delete_existing_object() {
        let (http, backend) = replay_backend(vec![
            event("/c1/a.txt", 200, SdkBody::empty()),
            event("/c1/a.txt", 204, SdkBody::empty()),
        ]);

        backend.delete_object("c1", "a.txt").await.unwrap();
        assert_eq!(http.actual_requests().count(), 2);
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("minio:9000"), "http://minio:9000");
        assert_eq!(
            normalize_endpoint("https://object-storage.example.com/"),
            "https://object-storage.example.com"
        );
        assert_eq!(normalize_endpoint("HTTP://Host:80"), "HTTP://Host:80");
    }

    #[test]
    fn test_status_code_name() {
        assert_eq!(status_code_name(404), "NotFound");
        assert_eq!(status_code_name(409), "Conflict");
        assert_eq!(status_code_name(500), "ServiceError");
    }

    #[test]
    fn test_build_client_requires_endpoint_and_keys() {
        let connector = S3Connector::new("us-east-1");

        let err = connector
            .build_client(&Credentials::new("", "key", "secret"))
            .err()
            .unwrap();
        assert!(err.contains("Missing endpoint"));

        let err = connector
            .build_client(&Credentials::new("http://localhost:9000", "", ""))
            .err()
            .unwrap();
        assert!(err.contains("Missing credentials"));
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig {
            region: "eu-west-1".to_string(),
            path_style: false,
            timeout_secs: 10,
            ..BackendConfig::default()
        };
        let connector = S3Connector::from_config(&config);
        assert_eq!(connector.region, "eu-west-1");
        assert!(!connector.path_style);
        assert_eq!(connector.timeout, Duration::from_secs(10));
    }
}
