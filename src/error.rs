//! Top-level error type for one grab invocation.
//!
//! Every variant is terminal: the invocation aborts and the user
//! re-invokes. Nothing is retried.

use crate::config::ConfigError;
use crate::prompt::PromptError;
use crate::provider::ProviderError;
use crate::registry::RegistryError;
use crate::surface::SurfaceError;

#[derive(Debug, thiserror::Error)]
pub enum GrabError {
    /// A menu key matched no entry.
    #[error("invalid selection: {key:?}")]
    Selection { key: char },

    /// The provider had nothing to link.
    #[error("no link available from {app}")]
    NoLinkAvailable { app: String },

    /// The provider's automation call failed.
    #[error("{app}: {source}")]
    Automation {
        app: String,
        #[source]
        source: ProviderError,
    },

    #[error("unknown application: {0}")]
    UnknownApp(String),

    #[error("unknown link type: {0}")]
    UnknownLinkType(String),

    #[error("prompt: {0}")]
    Prompt(#[from] PromptError),

    /// Delivery failed on the host side.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
}
