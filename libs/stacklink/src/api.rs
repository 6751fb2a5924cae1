//! Collaborator seams between the broker and the underlying cloud library.
//!
//! The crate never talks to the network itself. The host registers one
//! [`CloudConnector`] (the raw session factory) and one [`TenantEnumerator`]
//! (project discovery); everything produced by those lives behind
//! [`ServiceClient`] and [`ResourceList`]. Adapters are expected to map the
//! cloud library's failures into [`ApiError`] at this boundary, carrying the
//! HTTP status where one exists so not-found classification stays a local
//! check.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::options::ConnectionOptions;
use crate::secret::SecretString;
use crate::service::ServiceType;

/// Raw session factory for one cloud control plane.
#[async_trait]
pub trait CloudConnector: Send + Sync {
    /// Open an authenticated session against one service endpoint.
    ///
    /// `auth_url` is already resolved and `options` fully assembled; the
    /// connector only performs the wire-level handshake.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] of the adapter's choosing; authentication failures
    /// and transport errors are typical.
    async fn connect(
        &self,
        username: &str,
        password: &SecretString,
        auth_url: &str,
        service: ServiceType,
        options: &ConnectionOptions,
    ) -> Result<Arc<dyn ServiceClient>, ApiError>;
}

/// Live authenticated session with one service of the control plane.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// Invoke a named collection accessor (e.g. `"servers"`, `"networks"`).
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] with the backend's status code when the service
    /// answers non-success; anything else per the adapter's mapping.
    async fn invoke(&self, accessor: &str) -> Result<Box<dyn ResourceList>, ApiError>;
}

/// A possibly-lazy collection produced by an accessor call.
///
/// Some backends defer the actual request until enumeration begins, so
/// realization can fail with the same status semantics as the accessor
/// call itself.
#[async_trait]
pub trait ResourceList: Send + Sync {
    /// Materialize the collection into plain JSON entities.
    ///
    /// Consumes the list; a realized collection cannot be re-fetched.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ServiceClient::invoke`]; in particular a deferred
    /// not-found surfaces here.
    async fn realize(self: Box<Self>) -> Result<Vec<Value>, ApiError>;
}

/// An eagerly available collection; `realize` just unwraps it.
pub struct Realized(pub Vec<Value>);

#[async_trait]
impl ResourceList for Realized {
    async fn realize(self: Box<Self>) -> Result<Vec<Value>, ApiError> {
        Ok(self.0)
    }
}

/// A project (tenant) visible to the authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Opaque project identifier.
    pub id: String,
    /// Human-readable name, when the catalogue exposes one.
    #[serde(default)]
    pub name: Option<String>,
}

impl Project {
    /// Project with an identifier only.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// One accessible project together with a session scoped to it.
#[derive(Clone)]
pub struct TenantScope {
    /// The project this scope belongs to.
    pub project: Project,
    /// Session for the requested service, already scoped to `project`.
    pub service: Arc<dyn ServiceClient>,
}

/// Enumerates the projects an identity can address for a given service.
#[async_trait]
pub trait TenantEnumerator: Send + Sync {
    /// List accessible projects, each with a scoped service session.
    ///
    /// The returned order is the aggregation order. An empty list is valid
    /// (a credential with no visible tenants).
    ///
    /// # Errors
    ///
    /// Failures here mean tenant discovery itself broke; the aggregator
    /// propagates them unmodified.
    async fn accessible_scopes(
        &self,
        service: ServiceType,
    ) -> Result<Vec<TenantScope>, ApiError>;
}
