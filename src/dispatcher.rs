//! Dispatcher — select, grab, format, deliver.
//!
//! One [`Dispatcher::run`] is one user invocation. Selection and the
//! provider call happen before anything touches the editing surface,
//! so a failure in either leaves the surface exactly as it was.

use crate::error::GrabError;
use crate::format::{LinkTypeEntry, ORG};
use crate::link::LinkRecord;
use crate::prompt::Prompt;
use crate::provider::AppEntry;
use crate::registry::Registry;
use crate::selector::{Preferences, Selector};
use crate::surface::EditingSurface;

/// What to do with the formatted link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DeliveryAction {
    /// Insert at the cursor.
    #[default]
    Insert,
    /// Copy to the clipboard, or store the pair for `org` links when
    /// the host keeps a stored-links registry.
    Copy,
}

/// How one invocation selects and delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mode {
    /// Skip the application prompt and use the preferred app.
    pub default_app: bool,
    /// Skip the link-type prompt and use the preferred or inferred type.
    pub default_type: bool,
    pub deliver: DeliveryAction,
}

/// How the text reached the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivered {
    /// Inserted this many formatted links.
    Inserted(usize),
    Copied,
    Stored,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub app: String,
    pub link_type: String,
    /// The first formatted link.
    pub text: String,
    pub delivered: Delivered,
}

pub struct Dispatcher<'a> {
    selector: Selector<'a>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        apps: &'a Registry<AppEntry>,
        link_types: &'a Registry<LinkTypeEntry>,
        prefs: &'a Preferences,
    ) -> Self {
        Self {
            selector: Selector::new(apps, link_types, prefs),
        }
    }

    /// Run one grab.
    pub fn run(
        &self,
        mode: &Mode,
        prompt: &mut dyn Prompt,
        surface: &mut dyn EditingSurface,
    ) -> Result<Outcome, GrabError> {
        let app = self.selector.select_app(mode.default_app, prompt)?;
        let link_type = self
            .selector
            .select_link_type(mode.default_type, prompt, &*surface)?;

        tracing::info!(app = %app.id, link_type = %link_type.id, "grabbing link");

        let grab = app.provider.grab().map_err(|source| GrabError::Automation {
            app: app.label.clone(),
            source,
        })?;

        let records = grab.into_records().ok_or_else(|| GrabError::NoLinkAvailable {
            app: app.label.clone(),
        })?;

        let texts: Vec<String> = records
            .iter()
            .map(|r| link_type.format(&r.target, &r.title))
            .collect();

        let delivered = deliver(mode.deliver, link_type, &records, &texts, surface)?;

        tracing::info!(count = texts.len(), delivered = ?delivered, "link delivered");

        let text = texts.into_iter().next().unwrap_or_default();
        Ok(Outcome {
            app: app.id.clone(),
            link_type: link_type.id.clone(),
            text,
            delivered,
        })
    }
}

/// Hand the formatted links to the surface.
///
/// `records` and `texts` are parallel and non-empty.
fn deliver(
    action: DeliveryAction,
    link_type: &LinkTypeEntry,
    records: &[LinkRecord],
    texts: &[String],
    surface: &mut dyn EditingSurface,
) -> Result<Delivered, GrabError> {
    match action {
        DeliveryAction::Insert => {
            for (i, text) in texts.iter().enumerate() {
                if i > 0 {
                    surface.insert_at_cursor("\n")?;
                }
                surface.insert_at_cursor(text)?;
            }
            Ok(Delivered::Inserted(texts.len()))
        }
        DeliveryAction::Copy => {
            if link_type.id == ORG
                && let Some(store) = surface.stored_links()
            {
                store.push(&records[0])?;
                return Ok(Delivered::Stored);
            }
            surface.set_clipboard(&texts[0])?;
            Ok(Delivered::Copied)
        }
    }
}
