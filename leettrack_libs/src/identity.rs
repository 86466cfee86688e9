use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

/// Opaque reference to an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Identity(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds an identity from an optional raw value; blank values mean anonymous.
    pub fn from_optional(id: Option<&str>) -> Option<Self> {
        id.map(str::trim)
            .filter(|id| !id.is_empty())
            .map(Identity::new)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of the current identity and of identity-change notifications.
pub struct IdentityProvider {
    tx: watch::Sender<Option<Identity>>,
}

impl IdentityProvider {
    pub fn new(initial: Option<Identity>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }

    pub fn sign_in(&self, identity: Identity) {
        tracing::info!("identity changed to {}", identity);
        self.tx.send_replace(Some(identity));
    }

    pub fn sign_out(&self) {
        tracing::info!("signed out");
        self.tx.send_replace(None);
    }
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new(None)
    }
}
