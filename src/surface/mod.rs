//! Editing surface — where formatted links end up.
//!
//! The dispatcher only talks to the [`EditingSurface`] trait. The
//! [`HostSurface`] used by the binary inserts by writing to stdout (the
//! invoking editor reads the command's output at its cursor), copies
//! through the system clipboard, and stores links in a JSON-lines file
//! when one is configured.

pub mod clipboard;
pub mod context;
pub mod store;

use std::io::Write;
use std::sync::Arc;

use clipboard::ClipboardProvider;
use store::{JsonlLinkStore, LinkStore};

/// Errors from the editing surface. Reported as-is by the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// Writing the inserted text failed.
    #[error("insert: {0}")]
    Insert(#[from] std::io::Error),

    /// Clipboard operation failed (e.g. xclip not found, pipe error).
    #[error("clipboard: {0}")]
    Clipboard(String),

    /// Pushing to the stored-links registry failed.
    #[error("stored links: {0}")]
    Store(String),

    /// Focused-window lookup failed.
    #[error("context: {0}")]
    Context(String),
}

/// Host-side operations the dispatcher needs.
pub trait EditingSurface {
    /// Insert text at the cursor, after anything inserted before.
    fn insert_at_cursor(&mut self, text: &str) -> Result<(), SurfaceError>;

    /// The current editing context (e.g. editor mode or window class),
    /// matched against the configured context rules.
    fn current_context(&self) -> Option<String>;

    /// Replace the system clipboard content.
    fn set_clipboard(&mut self, text: &str) -> Result<(), SurfaceError>;

    /// The stored-links registry, if the host has one.
    fn stored_links(&mut self) -> Option<&mut dyn LinkStore>;
}

/// The binary's surface: stdout, system clipboard, optional link file.
pub struct HostSurface {
    out: Box<dyn Write>,
    clipboard: Arc<dyn ClipboardProvider>,
    context: Option<String>,
    store: Option<JsonlLinkStore>,
}

impl HostSurface {
    /// `context` overrides focused-window detection when set.
    pub fn new(
        out: Box<dyn Write>,
        clipboard: Arc<dyn ClipboardProvider>,
        context: Option<String>,
        store: Option<JsonlLinkStore>,
    ) -> Self {
        Self {
            out,
            clipboard,
            context,
            store,
        }
    }
}

impl EditingSurface for HostSurface {
    fn insert_at_cursor(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn current_context(&self) -> Option<String> {
        self.context
            .clone()
            .or_else(context::focused_window_class)
    }

    fn set_clipboard(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.clipboard.write(text)
    }

    fn stored_links(&mut self) -> Option<&mut dyn LinkStore> {
        self.store.as_mut().map(|s| s as &mut dyn LinkStore)
    }
}
