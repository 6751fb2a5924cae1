//! Connect-time options and the assembled per-connection value object.

use serde::Serialize;

use crate::endpoint::Endpoint;
use crate::service::ServiceType;
use crate::ssl::SslOptions;

/// Project used when the caller names none.
pub const DEFAULT_TENANT: &str = "admin";

/// Caller-side options for opening one service session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Service to connect to.
    pub service: ServiceType,
    /// Project to scope the session to.
    pub project_name: Option<String>,
    /// Legacy tenant selector; consulted only when `project_name` is unset.
    pub tenant_name: Option<String>,
}

impl ConnectOptions {
    /// Options for `service` with the default project.
    #[must_use]
    pub fn service(service: ServiceType) -> Self {
        Self {
            service,
            ..Self::default()
        }
    }

    /// Scope the session to a named project.
    #[must_use]
    pub fn project(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Set the legacy tenant selector.
    #[must_use]
    pub fn tenant(mut self, name: impl Into<String>) -> Self {
        self.tenant_name = Some(name.into());
        self
    }

    /// The project the session will be scoped to: project name, else the
    /// legacy tenant name, else `"admin"`.
    #[must_use]
    pub fn resolved_tenant(&self) -> &str {
        self.project_name
            .as_deref()
            .or(self.tenant_name.as_deref())
            .unwrap_or(DEFAULT_TENANT)
    }
}

/// Assembled per-connection options handed to the raw connector.
///
/// Field names in serialized form follow the wire contract of the
/// underlying cloud library. Built fresh per connect call and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionOptions {
    /// Project the session is scoped to.
    #[serde(rename = "openstack_tenant")]
    pub tenant: String,

    /// Identity API version in wire form (`v2.0`, `v3`).
    #[serde(rename = "openstack_identity_api_version")]
    pub api_version: String,

    /// Region, always present in serialized form (null when unset).
    #[serde(rename = "openstack_region")]
    pub region: Option<String>,

    /// SSL options derived from the endpoint's security policy.
    #[serde(rename = "connection_options")]
    pub ssl: SslOptions,
}

impl ConnectionOptions {
    /// Assemble the options for one connect call against `endpoint`.
    ///
    /// Pure: resolves the tenant selector, normalizes the API version, and
    /// derives the SSL block from the endpoint's policy.
    #[must_use]
    pub fn assemble(opts: &ConnectOptions, endpoint: &Endpoint) -> Self {
        Self {
            tenant: opts.resolved_tenant().to_owned(),
            api_version: normalize_api_version(&endpoint.api_version).to_owned(),
            region: endpoint.region.clone(),
            ssl: SslOptions::for_mode(endpoint.ssl_mode, &endpoint.ssl_params),
        }
    }
}

/// Normalize a stored identity API version tag to its wire form.
///
/// The stored short form `v2` maps to `v2.0`; every other value passes
/// through unchanged (`v3` stays `v3`).
#[must_use]
pub fn normalize_api_version(version: &str) -> &str {
    if version == "v2" { "v2.0" } else { version }
}
