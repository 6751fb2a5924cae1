//! The control-plane service catalogue addressed by the broker.

use serde::{Deserialize, Serialize};

/// One service category of the control plane.
///
/// Used as the session-cache key and as the service selector for connect
/// and aggregation calls. The kebab-case names are the stored/config form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    /// Compute (instances, flavors, key pairs).
    #[default]
    Compute,
    /// Networking (networks, subnets, routers, floating IPs).
    Network,
    /// Image catalogue.
    Image,
    /// Block storage volumes.
    Volume,
    /// Object storage.
    Storage,
    /// Telemetry and metering.
    Metering,
    /// Stack orchestration.
    Orchestration,
    /// Bare-metal provisioning.
    Baremetal,
    /// Bare-metal introspection.
    Introspection,
    /// Workflow execution.
    Workflow,
}

impl ServiceType {
    /// Stable kebab-case name, matching the serde form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compute => "compute",
            Self::Network => "network",
            Self::Image => "image",
            Self::Volume => "volume",
            Self::Storage => "storage",
            Self::Metering => "metering",
            Self::Orchestration => "orchestration",
            Self::Baremetal => "baremetal",
            Self::Introspection => "introspection",
            Self::Workflow => "workflow",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
