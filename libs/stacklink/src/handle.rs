//! Connection broker: credential checks, address resolution, and the
//! per-service session cache.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::{CloudConnector, ServiceClient, TenantEnumerator};
use crate::credentials::Credentials;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::options::{ConnectOptions, ConnectionOptions};
use crate::secret::SecretString;
use crate::service::ServiceType;
use crate::ssl::{SslMode, SslParams};

/// Open one service session without a [`Handle`].
///
/// This is the first-connection path: validates the credentials, resolves
/// the authentication URL, assembles the connection options, and delegates
/// to the raw connector. No caching.
///
/// # Errors
///
/// [`ApiError::CredentialsRejected`] before any connector call when the
/// password fails validation; otherwise whatever the connector reports,
/// unmodified.
pub async fn connect_service(
    connector: &dyn CloudConnector,
    endpoint: &Endpoint,
    credentials: &Credentials,
    opts: &ConnectOptions,
) -> Result<Arc<dyn ServiceClient>, ApiError> {
    credentials.validate()?;
    let auth_url = endpoint.auth_url();
    let options = ConnectionOptions::assemble(opts, endpoint);
    tracing::debug!(
        service = %opts.service,
        tenant = %options.tenant,
        auth_url = %auth_url,
        "opening control plane session"
    );
    connector
        .connect(
            &credentials.username,
            &credentials.password,
            &auth_url,
            opts.service,
            &options,
        )
        .await
}

/// One authenticated identity against one cloud endpoint.
///
/// Holds the credentials, the endpoint record, the injected collaborators,
/// and a per-service session cache. The cache is populated lazily by
/// [`service`](Self::service) and cleared by
/// [`reset_services`](Self::reset_services); a cache write atomically
/// replaces the whole entry, so concurrent first connects for the same
/// service are tolerated as "build twice, keep last" and `Arc`s handed out
/// earlier stay valid.
pub struct Handle {
    credentials: Credentials,
    endpoint: Endpoint,
    connector: Arc<dyn CloudConnector>,
    enumerator: Arc<dyn TenantEnumerator>,
    services: RwLock<HashMap<ServiceType, Arc<dyn ServiceClient>>>,
}

impl Handle {
    /// Handle over an existing endpoint record.
    #[must_use]
    pub fn new(
        credentials: Credentials,
        endpoint: Endpoint,
        connector: Arc<dyn CloudConnector>,
        enumerator: Arc<dyn TenantEnumerator>,
    ) -> Self {
        Self {
            credentials,
            endpoint,
            connector,
            enumerator,
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Start building a handle field by field.
    #[must_use]
    pub fn builder() -> HandleBuilder {
        HandleBuilder::default()
    }

    /// Username of the authenticated identity.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// The endpoint record this handle is bound to.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub(crate) fn enumerator(&self) -> &dyn TenantEnumerator {
        self.enumerator.as_ref()
    }

    /// Open a session with explicit options, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Same as [`connect_service`].
    pub async fn connect(
        &self,
        opts: &ConnectOptions,
    ) -> Result<Arc<dyn ServiceClient>, ApiError> {
        connect_service(
            self.connector.as_ref(),
            &self.endpoint,
            &self.credentials,
            opts,
        )
        .await
    }

    /// Session for `service` under the default project, connecting on
    /// first use.
    ///
    /// The cache lock is never held across the connect await; two tasks
    /// racing on an uncached service may both connect, and the later write
    /// wins.
    ///
    /// # Errors
    ///
    /// Same as [`connect_service`].
    pub async fn service(
        &self,
        service: ServiceType,
    ) -> Result<Arc<dyn ServiceClient>, ApiError> {
        if let Some(client) = self.services.read().get(&service) {
            return Ok(client.clone());
        }
        let client = self.connect(&ConnectOptions::service(service)).await?;
        self.services.write().insert(service, client.clone());
        Ok(client)
    }

    /// Number of cached service sessions.
    #[must_use]
    pub fn cached_services(&self) -> usize {
        self.services.read().len()
    }

    /// Drop every cached session; the next access reconnects.
    pub fn reset_services(&self) {
        self.services.write().clear();
        tracing::debug!("service session cache cleared");
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("credentials", &self.credentials)
            .field("endpoint", &self.endpoint)
            .field("cached_services", &self.cached_services())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Handle`].
///
/// Endpoint knobs default like [`Endpoint::new`]: port 5000, API version
/// `v2`, policy `non-ssl`. Credentials and both collaborators are required.
#[derive(Default)]
pub struct HandleBuilder {
    username: Option<String>,
    password: Option<SecretString>,
    host: Option<String>,
    port: Option<u16>,
    api_version: Option<String>,
    ssl_mode: Option<SslMode>,
    region: Option<String>,
    ssl_params: SslParams,
    connector: Option<Arc<dyn CloudConnector>>,
    enumerator: Option<Arc<dyn TenantEnumerator>>,
}

impl HandleBuilder {
    /// Identity to authenticate as.
    #[must_use]
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Control plane host (IPv6 literals unbracketed).
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Identity service port; zero is rejected at build time.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Stored identity API version tag (`v2`, `v3`).
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Transport security policy.
    #[must_use]
    pub fn ssl_mode(mut self, mode: SslMode) -> Self {
        self.ssl_mode = Some(mode);
        self
    }

    /// Region to scope requests to.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// CA material for the `ssl-with-validation` policy.
    #[must_use]
    pub fn ssl_params(mut self, params: SslParams) -> Self {
        self.ssl_params = params;
        self
    }

    /// Raw session factory.
    #[must_use]
    pub fn connector(mut self, connector: Arc<dyn CloudConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Accessible-project enumerator.
    #[must_use]
    pub fn enumerator(mut self, enumerator: Arc<dyn TenantEnumerator>) -> Self {
        self.enumerator = Some(enumerator);
        self
    }

    /// Assemble the handle.
    ///
    /// # Errors
    ///
    /// [`ApiError::Config`] when credentials, host, or a collaborator is
    /// missing, or the port is zero.
    pub fn build(self) -> Result<Handle, ApiError> {
        let username = self
            .username
            .ok_or_else(|| ApiError::Config("credentials not set".to_owned()))?;
        let password = self
            .password
            .ok_or_else(|| ApiError::Config("credentials not set".to_owned()))?;
        let host = self
            .host
            .ok_or_else(|| ApiError::Config("host not set".to_owned()))?;
        let connector = self
            .connector
            .ok_or_else(|| ApiError::Config("connector not set".to_owned()))?;
        let enumerator = self
            .enumerator
            .ok_or_else(|| ApiError::Config("enumerator not set".to_owned()))?;
        if self.port == Some(0) {
            return Err(ApiError::Config("port must be positive".to_owned()));
        }

        let mut endpoint = Endpoint::new(host);
        if let Some(port) = self.port {
            endpoint.port = port;
        }
        if let Some(api_version) = self.api_version {
            endpoint.api_version = api_version;
        }
        if let Some(ssl_mode) = self.ssl_mode {
            endpoint.ssl_mode = ssl_mode;
        }
        endpoint.region = self.region;
        endpoint.ssl_params = self.ssl_params;

        Ok(Handle::new(
            Credentials {
                username,
                password,
            },
            endpoint,
            connector,
            enumerator,
        ))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::api::{Realized, ResourceList, TenantScope};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Connector that records every call and hands out numbered clients.
    #[derive(Default)]
    struct RecordingConnector {
        calls: AtomicUsize,
        last_auth_url: parking_lot::Mutex<Option<String>>,
        last_options: parking_lot::Mutex<Option<ConnectionOptions>>,
    }

    struct StubClient;

    #[async_trait]
    impl ServiceClient for StubClient {
        async fn invoke(&self, _accessor: &str) -> Result<Box<dyn ResourceList>, ApiError> {
            Ok(Box::new(Realized(Vec::new())))
        }
    }

    #[async_trait]
    impl CloudConnector for RecordingConnector {
        async fn connect(
            &self,
            _username: &str,
            _password: &SecretString,
            auth_url: &str,
            _service: ServiceType,
            options: &ConnectionOptions,
        ) -> Result<Arc<dyn ServiceClient>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_auth_url.lock() = Some(auth_url.to_owned());
            *self.last_options.lock() = Some(options.clone());
            Ok(Arc::new(StubClient))
        }
    }

    struct NoTenants;

    #[async_trait]
    impl TenantEnumerator for NoTenants {
        async fn accessible_scopes(
            &self,
            _service: ServiceType,
        ) -> Result<Vec<TenantScope>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn handle_with(connector: Arc<RecordingConnector>) -> Handle {
        Handle::builder()
            .credentials("admin", "dummy")
            .host("address")
            .connector(connector)
            .enumerator(Arc::new(NoTenants))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn connect_resolves_url_and_assembles_options() {
        let connector = Arc::new(RecordingConnector::default());
        let handle = handle_with(connector.clone());

        handle.connect(&ConnectOptions::default()).await.unwrap();

        assert_eq!(
            connector.last_auth_url.lock().as_deref(),
            Some("http://address:5000")
        );
        let options = connector.last_options.lock().clone().unwrap();
        assert_eq!(options.tenant, "admin");
        assert_eq!(options.api_version, "v2.0");
        assert!(options.region.is_none());
        assert!(options.ssl.is_empty());
    }

    #[tokio::test]
    async fn numeric_password_never_reaches_the_connector() {
        let connector = Arc::new(RecordingConnector::default());
        let handle = Handle::builder()
            .credentials("admin", "123456")
            .host("address")
            .connector(connector.clone())
            .enumerator(Arc::new(NoTenants))
            .build()
            .unwrap();

        match handle.connect(&ConnectOptions::default()).await {
            Err(err) if err.is_credentials_rejected() => {
                assert_eq!(err.to_string(), "Numeric-only passwords are not accepted");
            }
            Err(other) => panic!("expected CredentialsRejected, got: {other:?}"),
            Ok(_) => panic!("expected credential validation to fail"),
        }
        assert_eq!(connector.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn service_connects_once_and_caches() {
        let connector = Arc::new(RecordingConnector::default());
        let handle = handle_with(connector.clone());

        let first = handle.service(ServiceType::Compute).await.unwrap();
        let second = handle.service(ServiceType::Compute).await.unwrap();

        assert_eq!(connector.calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(handle.cached_services(), 1);
    }

    #[tokio::test]
    async fn distinct_services_get_distinct_sessions() {
        let connector = Arc::new(RecordingConnector::default());
        let handle = handle_with(connector.clone());

        handle.service(ServiceType::Compute).await.unwrap();
        handle.service(ServiceType::Network).await.unwrap();

        assert_eq!(connector.calls.load(Ordering::SeqCst), 2);
        assert_eq!(handle.cached_services(), 2);
    }

    #[tokio::test]
    async fn reset_services_forces_reconnect() {
        let connector = Arc::new(RecordingConnector::default());
        let handle = handle_with(connector.clone());

        handle.service(ServiceType::Compute).await.unwrap();
        handle.reset_services();
        assert_eq!(handle.cached_services(), 0);

        handle.service(ServiceType::Compute).await.unwrap();
        assert_eq!(connector.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn connect_bypasses_the_cache() {
        let connector = Arc::new(RecordingConnector::default());
        let handle = handle_with(connector.clone());

        handle.connect(&ConnectOptions::default()).await.unwrap();
        handle.connect(&ConnectOptions::default()).await.unwrap();

        assert_eq!(connector.calls.load(Ordering::SeqCst), 2);
        assert_eq!(handle.cached_services(), 0);
    }

    #[tokio::test]
    async fn builder_applies_endpoint_knobs() {
        let connector = Arc::new(RecordingConnector::default());
        let handle = Handle::builder()
            .credentials("admin", "dummy")
            .host("::1")
            .port(35357)
            .api_version("v3")
            .ssl_mode(SslMode::Ssl)
            .region("rgn2")
            .connector(connector.clone())
            .enumerator(Arc::new(NoTenants))
            .build()
            .unwrap();

        handle.connect(&ConnectOptions::default()).await.unwrap();

        assert_eq!(
            connector.last_auth_url.lock().as_deref(),
            Some("https://[::1]:35357")
        );
        let options = connector.last_options.lock().clone().unwrap();
        assert_eq!(options.api_version, "v3");
        assert_eq!(options.region.as_deref(), Some("rgn2"));
        assert_eq!(options.ssl.ssl_verify_peer, Some(false));
    }

    #[test]
    fn builder_requires_all_mandatory_fields() {
        let err = Handle::builder().build().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));

        let err = Handle::builder()
            .credentials("admin", "dummy")
            .host("address")
            .connector(Arc::new(RecordingConnector::default()))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("enumerator not set"));
    }

    #[test]
    fn builder_rejects_port_zero() {
        let err = Handle::builder()
            .credentials("admin", "dummy")
            .host("address")
            .port(0)
            .connector(Arc::new(RecordingConnector::default()))
            .enumerator(Arc::new(NoTenants))
            .build()
            .unwrap_err();

        assert!(matches!(err, ApiError::Config(_)));
        assert!(err.to_string().contains("port must be positive"));
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let handle = handle_with(Arc::new(RecordingConnector::default()));
        let dbg = format!("{handle:?}");
        assert!(dbg.contains("[REDACTED]"));
        assert!(!dbg.contains("dummy"));
    }
}
