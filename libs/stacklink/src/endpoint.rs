//! Endpoint coordinates and authentication URL resolution.

use serde::{Deserialize, Deserializer};

use crate::ssl::{SslMode, SslParams};

/// Default port of the identity service.
pub const DEFAULT_AUTH_PORT: u16 = 5000;

/// Default identity API version tag for stored endpoint records.
pub const DEFAULT_API_VERSION: &str = "v2";

/// Network coordinates of one cloud control plane.
///
/// Deserializable from host configuration; every field except `host` has a
/// default. Credentials are deliberately not part of this struct and are
/// supplied programmatically.
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    /// Host name or literal IP address. IPv6 literals are accepted
    /// unbracketed; [`auth_url`](Self::auth_url) brackets them.
    pub host: String,

    /// Identity service port; must be positive.
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,

    /// Identity API version tag as stored (`v2`, `v3`). Normalized to its
    /// wire form at option-assembly time, not here.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Transport security policy.
    #[serde(default)]
    pub ssl_mode: SslMode,

    /// Region to scope requests to, for region-aware deployments.
    #[serde(default)]
    pub region: Option<String>,

    /// CA material for the `ssl-with-validation` policy.
    #[serde(default)]
    pub ssl_params: SslParams,
}

fn default_port() -> u16 {
    DEFAULT_AUTH_PORT
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let port = u16::deserialize(deserializer)?;
    if port == 0 {
        return Err(serde::de::Error::custom("port must be positive"));
    }
    Ok(port)
}

impl Endpoint {
    /// Endpoint for `host` with all defaults (port 5000, `v2`, `non-ssl`).
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_AUTH_PORT,
            api_version: default_api_version(),
            ssl_mode: SslMode::default(),
            region: None,
            ssl_params: SslParams::default(),
        }
    }

    /// Identity endpoint URL for this record.
    #[must_use]
    pub fn auth_url(&self) -> String {
        auth_url(&self.host, self.port, self.ssl_mode)
    }
}

/// Build the identity endpoint URL for a host, port, and security policy.
///
/// The scheme is `https` only under the `ssl` and `ssl-with-validation`
/// policies. A host containing a colon is taken for an IPv6 literal and
/// bracketed. The result carries no trailing slash and no path.
///
/// Usable standalone, before any [`Endpoint`] or handle exists.
#[must_use]
pub fn auth_url(host: &str, port: u16, ssl_mode: SslMode) -> String {
    let scheme = ssl_mode.scheme();
    if host.contains(':') {
        format!("{scheme}://[{host}]:{port}")
    } else {
        format!("{scheme}://{host}:{port}")
    }
}
