//! AppleScript sources for the built-in applications.
//!
//! Every script prints records in the `target::split::title` line
//! format parsed by [`crate::link::parse_records`], except `FIREFOX`,
//! which only prints the window title; its target arrives through the
//! clipboard.

/// Google Chrome — active tab of the front window.
pub const CHROME: &str = r#"
tell application "Google Chrome"
    set theTab to active tab of first window
    return (URL of theTab) & "::split::" & (title of theTab)
end tell
"#;

/// Safari — front document.
pub const SAFARI: &str = r#"
tell application "Safari"
    return (URL of document 1) & "::split::" & (name of document 1)
end tell
"#;

/// Firefox has no scripting dictionary: focus the address bar, copy
/// it, dismiss, and report the window title.
pub const FIREFOX: &str = r#"
tell application "Firefox" to activate
tell application "System Events"
    keystroke "l" using command down
    delay 0.2
    keystroke "c" using command down
    delay 0.2
    key code 53
end tell
tell application "System Events" to tell process "firefox"
    return name of front window
end tell
"#;

/// Finder — every selected item, in selection order.
pub const FINDER: &str = r#"
tell application "Finder"
    set theLinks to {}
    repeat with theItem in (get selection)
        set end of theLinks to (URL of theItem) & "::split::" & (name of theItem)
    end repeat
    set AppleScript's text item delimiters to linefeed
    return theLinks as text
end tell
"#;

/// Mail — every selected message as a `message://` URL.
pub const MAIL: &str = r#"
tell application "Mail"
    set theLinks to {}
    repeat with theMessage in (get selection)
        set end of theLinks to "message://%3c" & (message id of theMessage) & "%3e::split::" & (subject of theMessage)
    end repeat
    set AppleScript's text item delimiters to linefeed
    return theLinks as text
end tell
"#;

/// Terminal — tty and custom title of the front window's selected tab.
/// Errors when no window is open.
pub const TERMINAL: &str = r#"
tell application "Terminal"
    set theTab to selected tab of front window
    return "terminal://" & (tty of theTab) & "::split::" & (custom title of theTab)
end tell
"#;

/// Skim — front document and current page.
pub const SKIM: &str = r#"
tell application "Skim"
    set theDoc to front document
    set thePage to index of current page of theDoc
    return "skim://" & (path of theDoc) & "::" & thePage & "::split::" & (name of theDoc) & ", p. " & thePage
end tell
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::FIELD_DELIMITER;

    #[test]
    fn record_scripts_emit_the_field_delimiter() {
        for (name, script) in [
            ("chrome", CHROME),
            ("safari", SAFARI),
            ("finder", FINDER),
            ("mail", MAIL),
            ("terminal", TERMINAL),
            ("skim", SKIM),
        ] {
            assert!(
                script.contains(FIELD_DELIMITER),
                "{name} script does not emit {FIELD_DELIMITER}"
            );
        }
    }

    #[test]
    fn firefox_prints_title_only() {
        assert!(!FIREFOX.contains(FIELD_DELIMITER));
    }

    #[test]
    fn multi_selection_scripts_join_with_linefeed() {
        for script in [FINDER, MAIL] {
            assert!(script.contains("text item delimiters to linefeed"));
        }
    }
}
