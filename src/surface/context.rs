//! Editing context from the focused X11 window.
//!
//! The context string is the `WM_CLASS` class name of the window named
//! by `_NET_ACTIVE_WINDOW` (e.g. `Emacs`, `obsidian`). Context rules in
//! the config match against it.

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{self, Atom, AtomEnum, Window};
use x11rb::rust_connection::RustConnection;

use super::SurfaceError;

/// Connection plus the atoms needed to find the focused window.
pub struct X11Focus {
    conn: RustConnection,
    root: Window,
    net_active_window: Atom,
}

impl X11Focus {
    /// Connect to the display named by `$DISPLAY`.
    pub fn connect() -> Result<Self, SurfaceError> {
        let (conn, screen_num) = RustConnection::connect(None)
            .map_err(|e| SurfaceError::Context(format!("X11 connect failed: {e}")))?;

        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| SurfaceError::Context(format!("no screen {screen_num}")))?;

        let net_active_window = xproto::intern_atom(&conn, false, b"_NET_ACTIVE_WINDOW")
            .map_err(|e| SurfaceError::Context(format!("intern_atom: {e}")))?
            .reply()
            .map_err(|e| SurfaceError::Context(format!("intern_atom reply: {e}")))?
            .atom;

        Ok(Self {
            conn,
            root,
            net_active_window,
        })
    }

    /// Class name of the focused window, or `None` if nothing is focused
    /// or the window carries no `WM_CLASS`.
    pub fn focused_class(&self) -> Result<Option<String>, SurfaceError> {
        let Some(window) = self.active_window()? else {
            return Ok(None);
        };

        let reply = xproto::get_property(
            &self.conn,
            false,
            window,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            0,
            256,
        )
        .map_err(|e| SurfaceError::Context(format!("get_property WM_CLASS: {e}")))?
        .reply()
        .map_err(|e| SurfaceError::Context(format!("get_property reply: {e}")))?;

        if reply.format != 8 {
            return Ok(None);
        }

        Ok(parse_wm_class(&reply.value))
    }

    fn active_window(&self) -> Result<Option<Window>, SurfaceError> {
        let reply = xproto::get_property(
            &self.conn,
            false,
            self.root,
            self.net_active_window,
            AtomEnum::WINDOW,
            0,
            1,
        )
        .map_err(|e| SurfaceError::Context(format!("get_property _NET_ACTIVE_WINDOW: {e}")))?
        .reply()
        .map_err(|e| SurfaceError::Context(format!("get_property reply: {e}")))?;

        if reply.format != 32 || reply.value.len() < 4 {
            return Ok(None);
        }

        let window = u32::from_ne_bytes([
            reply.value[0],
            reply.value[1],
            reply.value[2],
            reply.value[3],
        ]);

        Ok((window != 0).then_some(window))
    }
}

/// `WM_CLASS` is `instance\0class\0`. Prefer the class, fall back to
/// the instance.
fn parse_wm_class(value: &[u8]) -> Option<String> {
    let mut parts = value
        .split(|&b| b == 0)
        .filter(|part| !part.is_empty())
        .map(|part| String::from_utf8_lossy(part).into_owned());

    let instance = parts.next()?;
    Some(parts.next().unwrap_or(instance))
}

/// Best-effort lookup used by the host surface: any X11 failure means
/// "no context".
pub fn focused_window_class() -> Option<String> {
    let focus = match X11Focus::connect() {
        Ok(focus) => focus,
        Err(e) => {
            tracing::debug!(error = %e, "no X11 display for context lookup");
            return None;
        }
    };

    match focus.focused_class() {
        Ok(class) => class,
        Err(e) => {
            tracing::debug!(error = %e, "focused window class lookup failed");
            None
        }
    }
}
