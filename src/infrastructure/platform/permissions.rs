use crate::domain::persistence::entity::{Capability, PermissionDecision};
use async_trait::async_trait;
use std::collections::HashSet;

#[async_trait]
pub trait PermissionBroker: Send + Sync {
    /// Ask the platform (and, if needed, the user) for `capability`.
    async fn request(&self, capability: Capability) -> PermissionDecision;
}

/// Broker with a fixed set of grants, for hosts without runtime permissions.
pub struct StaticPermissionBroker {
    granted: HashSet<Capability>,
}

impl StaticPermissionBroker {
    pub fn new(granted: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            granted: granted.into_iter().collect(),
        }
    }

    pub fn allow_all() -> Self {
        Self::new([
            Capability::Camera,
            Capability::ReadMedia,
            Capability::WriteMedia,
        ])
    }

    pub fn deny_all() -> Self {
        Self::new([])
    }
}

#[async_trait]
impl PermissionBroker for StaticPermissionBroker {
    async fn request(&self, capability: Capability) -> PermissionDecision {
        if self.granted.contains(&capability) {
            PermissionDecision::Granted
        } else {
            tracing::debug!(%capability, "permission not granted");
            PermissionDecision::Denied
        }
    }
}
