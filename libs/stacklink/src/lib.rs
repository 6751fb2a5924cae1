#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Connection broker and cross-tenant inventory aggregator for
//! OpenStack-compatible control planes.
//!
//! What this crate does for a management platform:
//! - resolves authentication URLs from stored endpoint records, including
//!   IPv6 literals ([`auth_url`])
//! - validates credentials before any network activity ([`Credentials`])
//! - assembles per-connection options under four transport security
//!   policies ([`ConnectionOptions`], [`SslMode`])
//! - caches one live session per service type ([`Handle`])
//! - fans a read accessor out across every accessible tenant and merges
//!   the results, suppressing not-found answers from tenants without
//!   visibility ([`Handle::collect_for_accessible_tenants`])
//!
//! The wire protocol stays behind the [`CloudConnector`] and
//! [`TenantEnumerator`] seams; this crate never talks to the network
//! itself.
//!
//! # Example
//!
//! ```ignore
//! use stacklink::{Handle, ServiceType, SslMode};
//!
//! let handle = Handle::builder()
//!     .credentials("admin", "s3cr3t")
//!     .host("cloud.example.net")
//!     .ssl_mode(SslMode::SslWithValidation)
//!     .connector(connector)
//!     .enumerator(enumerator)
//!     .build()?;
//!
//! let servers = handle
//!     .collect_for_accessible_tenants(ServiceType::Compute, "servers", "id")
//!     .await?;
//! ```

mod aggregate;
mod api;
mod credentials;
mod endpoint;
mod error;
mod handle;
mod options;
mod secret;
mod service;
mod ssl;

pub use aggregate::{ResourceMap, collect_scoped};
pub use api::{
    CloudConnector, Project, Realized, ResourceList, ServiceClient, TenantEnumerator, TenantScope,
};
pub use credentials::Credentials;
pub use endpoint::{DEFAULT_API_VERSION, DEFAULT_AUTH_PORT, Endpoint, auth_url};
pub use error::ApiError;
pub use handle::{Handle, HandleBuilder, connect_service};
pub use options::{
    ConnectOptions, ConnectionOptions, DEFAULT_TENANT, normalize_api_version,
};
pub use secret::SecretString;
pub use service::ServiceType;
pub use ssl::{SslMode, SslOptions, SslParams};
