//! User-facing output: `--list` tables and delivery confirmations.
//!
//! Confirmations go to stderr so they never mix with inserted text on
//! stdout. The key column of the tables is what the menus accept.

use std::fmt::Write;

use crate::dispatcher::{Delivered, Outcome};
use crate::format::LinkTypeEntry;
use crate::provider::AppEntry;
use crate::registry::{Registry, RegistryEntry};

/// Render the application and link-type tables.
pub fn render(apps: &Registry<AppEntry>, link_types: &Registry<LinkTypeEntry>) -> String {
    let mut out = String::new();
    render_table(&mut out, "APPLICATION", apps, "No applications registered");
    out.push('\n');
    render_table(&mut out, "LINK TYPE", link_types, "No link types registered");
    out
}

fn render_table<E: RegistryEntry>(
    out: &mut String,
    heading: &str,
    registry: &Registry<E>,
    empty: &str,
) {
    if registry.is_empty() {
        let _ = writeln!(out, "{empty}");
        return;
    }

    let width = registry
        .list()
        .map(|e| e.id().chars().count())
        .chain([heading.len()])
        .max()
        .unwrap_or_default()
        + 2;

    let _ = writeln!(out, "{:<4} {:<width$} LABEL", "KEY", heading);
    let _ = writeln!(out, "{}", "-".repeat(width + 16));
    for (key, entry) in registry.keyed() {
        let _ = writeln!(out, "{:<4} {:<width$} {}", key, entry.id(), entry.label());
    }
}

/// Confirmation for deliveries the user cannot see at the cursor.
pub fn delivery_message(outcome: &Outcome) -> Option<String> {
    match outcome.delivered {
        Delivered::Inserted(_) => None,
        Delivered::Copied => Some(format!("Copied: {}", outcome.text)),
        Delivered::Stored => Some(format!(
            "Stored {} link from {}: {}",
            outcome.link_type, outcome.app, outcome.text
        )),
    }
}
