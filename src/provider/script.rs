//! osascript-backed providers.
//!
//! [`ScriptProvider`] runs an AppleScript and parses its stdout as link
//! records. [`ClipboardScriptProvider`] is for applications with no
//! scripting dictionary: the script copies the target to the clipboard
//! and prints the title, and the clipboard is restored afterwards.

use std::process::Command;
use std::sync::Arc;

use crate::link::{Grab, LinkRecord, parse_records};
use crate::surface::clipboard::{ClipboardGuard, ClipboardProvider};

use super::{LinkProvider, ProviderError};

const OSASCRIPT: &str = "osascript";

/// Run an AppleScript and return its stdout without the final line
/// terminator.
pub fn run_osascript(script: &str) -> Result<String, ProviderError> {
    let output = Command::new(OSASCRIPT)
        .arg("-e")
        .arg(script)
        .output()
        .map_err(|source| ProviderError::Spawn {
            program: OSASCRIPT.to_string(),
            source,
        })?;

    if output.status.success() {
        Ok(script_output(&output.stdout))
    } else {
        Err(ProviderError::Failed {
            program: OSASCRIPT.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// osascript ends its output with a newline; anything before that,
/// trailing spaces in the last title included, is kept.
fn script_output(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}

/// Runs one AppleScript that prints `target::split::title` lines.
pub struct ScriptProvider {
    script: &'static str,
    absent_on_failure: bool,
}

impl ScriptProvider {
    pub fn new(script: &'static str) -> Self {
        Self {
            script,
            absent_on_failure: false,
        }
    }

    /// Treat a failing script as "nothing to link".
    ///
    /// For applications whose script errors out when no window is
    /// open, where the failure carries no more information than
    /// [`Grab::Absent`].
    pub fn absent_on_failure(mut self) -> Self {
        self.absent_on_failure = true;
        self
    }
}

impl LinkProvider for ScriptProvider {
    fn grab(&self) -> Result<Grab, ProviderError> {
        finish(run_osascript(self.script), self.absent_on_failure)
    }
}

/// Map a script result to a grab, folding failure into `Absent` when
/// asked to.
fn finish(
    result: Result<String, ProviderError>,
    absent_on_failure: bool,
) -> Result<Grab, ProviderError> {
    match result {
        Ok(stdout) => Ok(parse_records(&stdout)),
        Err(e) if absent_on_failure => {
            tracing::debug!(error = %e, "script failed, treating as no window");
            Ok(Grab::Absent)
        }
        Err(e) => Err(e),
    }
}

/// Copies the target through the clipboard; the script prints the title.
pub struct ClipboardScriptProvider {
    script: &'static str,
    clipboard: Arc<dyn ClipboardProvider>,
}

impl ClipboardScriptProvider {
    pub fn new(script: &'static str, clipboard: Arc<dyn ClipboardProvider>) -> Self {
        Self { script, clipboard }
    }

    /// Run `automation` with the clipboard borrowed, then build the
    /// record from what it left there.
    fn grab_with(
        &self,
        automation: impl FnOnce() -> Result<String, ProviderError>,
    ) -> Result<Grab, ProviderError> {
        let guard = ClipboardGuard::save(self.clipboard.as_ref())?;
        let title = automation()?;
        let target = guard.read()?;
        Ok(record_from_clipboard(&target, &title))
    }
}

impl LinkProvider for ClipboardScriptProvider {
    fn grab(&self) -> Result<Grab, ProviderError> {
        self.grab_with(|| run_osascript(self.script))
    }
}

fn record_from_clipboard(target: &str, title: &str) -> Grab {
    let target = target.trim();
    if target.is_empty() {
        Grab::Absent
    } else {
        Grab::One(LinkRecord::new(target, title.trim_end_matches(['\n', '\r'])))
    }
}
