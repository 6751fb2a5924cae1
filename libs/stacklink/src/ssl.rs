//! Transport security policy and the per-connection SSL options derived
//! from it.

use serde::{Deserialize, Serialize};

/// Transport security policy under which a session is negotiated.
///
/// Stored endpoint records use the kebab-case names (`none`, `non-ssl`,
/// `ssl`, `ssl-with-validation`). Unknown values are a deserialization
/// error, not a silent fallback.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    /// Plain HTTP.
    None,
    /// Plain HTTP. Distinct name kept for stored endpoint records.
    #[default]
    NonSsl,
    /// TLS without peer verification.
    Ssl,
    /// TLS with peer verification against the configured CA material.
    SslWithValidation,
}

impl SslMode {
    /// Whether the policy negotiates TLS at all.
    #[must_use]
    pub fn is_secure(self) -> bool {
        matches!(self, Self::Ssl | Self::SslWithValidation)
    }

    /// URL scheme implied by the policy.
    #[must_use]
    pub fn scheme(self) -> &'static str {
        if self.is_secure() { "https" } else { "http" }
    }

    /// Stable kebab-case name, matching the serde form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NonSsl => "non-ssl",
            Self::Ssl => "ssl",
            Self::SslWithValidation => "ssl-with-validation",
        }
    }
}

impl std::fmt::Display for SslMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CA material consulted when the policy is `ssl-with-validation`.
///
/// Every field is optional; absent fields simply do not appear in the
/// assembled [`SslOptions`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SslParams {
    /// Path to a CA bundle file.
    pub ca_file: Option<String>,
    /// Path to a directory of CA certificates.
    pub ca_path: Option<String>,
    /// Name of a pre-built certificate store.
    pub cert_store: Option<String>,
}

/// Per-connection SSL options handed to the raw connector, nested under the
/// `connection_options` key of the assembled connection options.
///
/// Serialization omits absent keys entirely, so the `none`/`non-ssl`
/// policies produce an empty object.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SslOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_verify_peer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_ca_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_ca_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_cert_store: Option<String>,
}

impl SslOptions {
    /// Derive the SSL options for one policy.
    ///
    /// | policy | `ssl_verify_peer` | CA material |
    /// |---|---|---|
    /// | `none` / `non-ssl` | absent | no |
    /// | `ssl` | `false` | no |
    /// | `ssl-with-validation` | `true` | each param, when supplied |
    #[must_use]
    pub fn for_mode(mode: SslMode, params: &SslParams) -> Self {
        match mode {
            SslMode::None | SslMode::NonSsl => Self::default(),
            SslMode::Ssl => Self {
                ssl_verify_peer: Some(false),
                ..Self::default()
            },
            SslMode::SslWithValidation => Self {
                ssl_verify_peer: Some(true),
                ssl_ca_file: params.ca_file.clone(),
                ssl_ca_path: params.ca_path.clone(),
                ssl_cert_store: params.cert_store.clone(),
            },
        }
    }

    /// Whether no SSL key is set at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ssl_verify_peer.is_none()
            && self.ssl_ca_file.is_none()
            && self.ssl_ca_path.is_none()
            && self.ssl_cert_store.is_none()
    }
}
