//! Link providers — one per application, each an opaque automation call.
//!
//! A provider is asked for "the current link" and answers with a
//! [`Grab`]. How it gets there (osascript, clipboard round-trip, an
//! external command) is its own business; the dispatcher only sees the
//! [`LinkProvider`] trait.
//!
//! Returning [`Grab::Absent`] is the normal "nothing selected" outcome.
//! An `Err` means the automation itself failed.

pub mod command;
pub mod presets;
pub mod script;

use std::sync::Arc;

use crate::link::Grab;
use crate::registry::{Registry, RegistryEntry, RegistryError};
use crate::surface::SurfaceError;
use crate::surface::clipboard::ClipboardProvider;

pub use command::CommandProvider;
pub use script::{ClipboardScriptProvider, ScriptProvider};

/// Errors returned by providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The automation program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The automation program ran and reported failure.
    #[error("{program} failed: {message}")]
    Failed { program: String, message: String },

    /// A clipboard round-trip failed.
    #[error(transparent)]
    Clipboard(#[from] SurfaceError),
}

/// Retrieves the current link from one application.
pub trait LinkProvider {
    fn grab(&self) -> Result<Grab, ProviderError>;
}

impl<F> LinkProvider for F
where
    F: Fn() -> Result<Grab, ProviderError>,
{
    fn grab(&self) -> Result<Grab, ProviderError> {
        self()
    }
}

/// An application offered in the menu.
pub struct AppEntry {
    pub id: String,
    pub label: String,
    pub provider: Box<dyn LinkProvider>,
}

impl AppEntry {
    pub fn new(id: &str, label: &str, provider: impl LinkProvider + 'static) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            provider: Box::new(provider),
        }
    }
}

impl std::fmt::Debug for AppEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEntry")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl RegistryEntry for AppEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// The built-in application table, in menu order.
///
/// `clipboard` is lent to providers that copy their target through the
/// system clipboard.
pub fn default_apps(
    clipboard: Arc<dyn ClipboardProvider>,
) -> Result<Registry<AppEntry>, RegistryError> {
    Registry::from_entries([
        AppEntry::new("chrome", "chrome", ScriptProvider::new(presets::CHROME)),
        AppEntry::new("safari", "safari", ScriptProvider::new(presets::SAFARI)),
        AppEntry::new(
            "firefox",
            "firefox",
            ClipboardScriptProvider::new(presets::FIREFOX, clipboard),
        ),
        AppEntry::new("finder", "Finder", ScriptProvider::new(presets::FINDER)),
        AppEntry::new("mail", "mail", ScriptProvider::new(presets::MAIL)),
        AppEntry::new(
            "terminal",
            "terminal",
            ScriptProvider::new(presets::TERMINAL).absent_on_failure(),
        ),
        AppEntry::new("skim", "Skim", ScriptProvider::new(presets::SKIM)),
    ])
}
