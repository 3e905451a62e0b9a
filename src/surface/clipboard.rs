//! System clipboard access — `xclip` on X11, `pbcopy`/`pbpaste` on macOS.
//!
//! Both adapters shell out synchronously via `std::process::Command`.
//! [`ClipboardGuard`] snapshots the clipboard for providers that route
//! data through it and puts the snapshot back when dropped.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

use super::SurfaceError;

/// Reads and writes the system clipboard as text.
pub trait ClipboardProvider: Send + Sync {
    /// Set the clipboard content.
    fn write(&self, content: &str) -> Result<(), SurfaceError>;

    /// Read the current clipboard content.
    fn read(&self) -> Result<String, SurfaceError>;
}

/// Pick the clipboard adapter for the running platform.
pub fn default_clipboard() -> Arc<dyn ClipboardProvider> {
    if cfg!(target_os = "macos") {
        Arc::new(PbClipboard)
    } else {
        Arc::new(XclipClipboard)
    }
}

/// X11 clipboard via `xclip -selection clipboard`.
pub struct XclipClipboard;

impl ClipboardProvider for XclipClipboard {
    fn write(&self, content: &str) -> Result<(), SurfaceError> {
        pipe_into("xclip", &["-selection", "clipboard"], content)
    }

    fn read(&self) -> Result<String, SurfaceError> {
        read_from("xclip", &["-selection", "clipboard", "-o"])
    }
}

/// macOS pasteboard via `pbcopy` / `pbpaste`.
pub struct PbClipboard;

impl ClipboardProvider for PbClipboard {
    fn write(&self, content: &str) -> Result<(), SurfaceError> {
        pipe_into("pbcopy", &[], content)
    }

    fn read(&self) -> Result<String, SurfaceError> {
        read_from("pbpaste", &[])
    }
}

fn pipe_into(program: &str, args: &[&str], content: &str) -> Result<(), SurfaceError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| SurfaceError::Clipboard(format!("failed to spawn {program}: {e}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(content.as_bytes())
            .map_err(|e| SurfaceError::Clipboard(format!("failed to write to {program}: {e}")))?;
        // Drop stdin to close the pipe so the child can finish.
    }

    let status = child
        .wait()
        .map_err(|e| SurfaceError::Clipboard(format!("failed to wait for {program}: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(SurfaceError::Clipboard(format!(
            "{program} exited with status {status}"
        )))
    }
}

fn read_from(program: &str, args: &[&str]) -> Result<String, SurfaceError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| SurfaceError::Clipboard(format!("failed to spawn {program}: {e}")))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(SurfaceError::Clipboard(format!(
            "{program} exited with status {}",
            output.status
        )))
    }
}

/// Scoped clipboard borrow: restores the saved content on drop.
///
/// Taken by providers that copy data out of an application through the
/// clipboard. The restore runs on every exit path, including early
/// returns on automation failure.
pub struct ClipboardGuard<'a> {
    clipboard: &'a dyn ClipboardProvider,
    saved: String,
}

impl<'a> ClipboardGuard<'a> {
    /// Snapshot the current clipboard content.
    pub fn save(clipboard: &'a dyn ClipboardProvider) -> Result<Self, SurfaceError> {
        let saved = clipboard.read()?;
        Ok(Self { clipboard, saved })
    }

    /// Read whatever the borrowed clipboard holds now.
    pub fn read(&self) -> Result<String, SurfaceError> {
        self.clipboard.read()
    }
}

impl Drop for ClipboardGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.clipboard.write(&self.saved) {
            tracing::warn!(error = %e, "failed to restore clipboard");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;

    /// In-memory clipboard.
    #[derive(Default)]
    pub(crate) struct MemoryClipboard {
        content: Mutex<String>,
    }

    impl MemoryClipboard {
        pub fn with(content: &str) -> Self {
            Self {
                content: Mutex::new(content.to_string()),
            }
        }

        pub fn get(&self) -> String {
            self.content.lock().unwrap().clone()
        }
    }

    impl ClipboardProvider for MemoryClipboard {
        fn write(&self, content: &str) -> Result<(), SurfaceError> {
            *self.content.lock().unwrap() = content.to_string();
            Ok(())
        }

        fn read(&self) -> Result<String, SurfaceError> {
            Ok(self.get())
        }
    }

    #[test]
    fn guard_restores_on_drop() {
        let clip = MemoryClipboard::with("before");
        {
            let guard = ClipboardGuard::save(&clip).unwrap();
            clip.write("https://borrowed/").unwrap();
            assert_eq!(guard.read().unwrap(), "https://borrowed/");
        }
        assert_eq!(clip.get(), "before");
    }

    #[test]
    fn guard_restores_on_early_return() {
        fn borrow_and_fail(clip: &MemoryClipboard) -> Result<(), SurfaceError> {
            let _guard = ClipboardGuard::save(clip)?;
            clip.write("scratch")?;
            Err(SurfaceError::Clipboard("automation failed".into()))
        }

        let clip = MemoryClipboard::with("keep me");
        assert!(borrow_and_fail(&clip).is_err());
        assert_eq!(clip.get(), "keep me");
    }

    #[test]
    fn missing_program_is_clipboard_error() {
        let err = read_from("grab-link-no-such-program", &[]).unwrap_err();
        assert!(matches!(err, SurfaceError::Clipboard(_)));
        let err = pipe_into("grab-link-no-such-program", &[], "x").unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }
}
