//! Credential gate for the Gemini API key.
//!
//! The hosting environment owns key selection. The client only asks the
//! injected [`CredentialGate`] for a key at call time, so nothing in the
//! generation path reaches for global state.

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Errors from the key-selection flow.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The host offers no way to select a key.
    #[error("API key selection is not available in this environment")]
    SelectionUnavailable,

    /// The selection flow ran but did not produce a key.
    #[error("API key selection failed: {0}")]
    SelectionFailed(String),
}

/// Host-provided source of the Gemini API key.
#[async_trait]
pub trait CredentialGate: Send + Sync {
    /// Whether a key is currently available.
    async fn has_selected_api_key(&self) -> bool;

    /// Ask the host to run its key-selection flow.
    async fn open_select_key(&self) -> Result<(), CredentialError>;

    /// The key to attach to outgoing requests, if any.
    async fn api_key(&self) -> Option<String>;
}

/// A gate backed by a key supplied at startup (typically `GEMINI_API_KEY`).
///
/// With no key there is nothing to select from, so
/// [`open_select_key`](CredentialGate::open_select_key) reports
/// [`CredentialError::SelectionUnavailable`] until [`set_key`](Self::set_key)
/// provides one.
#[derive(Debug, Default)]
pub struct StaticCredentialGate {
    key: RwLock<Option<String>>,
}

impl StaticCredentialGate {
    pub fn new(key: Option<String>) -> Self {
        let key = key.filter(|k| !k.trim().is_empty());
        Self {
            key: RwLock::new(key),
        }
    }

    /// Replace the stored key. Blank keys clear it.
    pub async fn set_key(&self, key: Option<String>) {
        *self.key.write().await = key.filter(|k| !k.trim().is_empty());
    }
}

#[async_trait]
impl CredentialGate for StaticCredentialGate {
    async fn has_selected_api_key(&self) -> bool {
        self.key.read().await.is_some()
    }

    async fn open_select_key(&self) -> Result<(), CredentialError> {
        if self.key.read().await.is_some() {
            Ok(())
        } else {
            Err(CredentialError::SelectionUnavailable)
        }
    }

    async fn api_key(&self) -> Option<String> {
        self.key.read().await.clone()
    }
}
