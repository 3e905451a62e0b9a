//! One-keystroke prompts on the controlling terminal.
//!
//! The prompt talks to `/dev/tty` directly: stdout carries the inserted
//! link and stdin may be a pipe from the invoking editor. The terminal
//! is put in raw mode for the single read, and [`RawModeGuard`] restores
//! it on every exit path.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};

use nix::sys::termios::{self, SetArg, Termios};

/// Prompt errors.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("terminal: {0}")]
    Terminal(#[from] nix::Error),
    #[error("key is not valid UTF-8")]
    InvalidUtf8,
}

/// Shows a question and reads one key.
pub trait Prompt {
    fn read_key(&mut self, question: &str) -> Result<char, PromptError>;
}

/// Prompt on `/dev/tty`, opened per question so that runs which skip
/// every prompt never need a terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn read_key(&mut self, question: &str) -> Result<char, PromptError> {
        let mut tty = OpenOptions::new().read(true).write(true).open("/dev/tty")?;
        tty.write_all(question.as_bytes())?;
        tty.flush()?;

        let key = {
            let _raw = RawModeGuard::enter(&tty)?;
            read_char(&mut &tty)?
        };

        // Echo the choice so the menu line reads naturally afterwards.
        writeln!(tty, "{key}")?;
        Ok(key)
    }
}

/// RAII guard that restores terminal settings on drop.
struct RawModeGuard<'a> {
    tty: &'a File,
    original: Termios,
}

impl<'a> RawModeGuard<'a> {
    fn enter(tty: &'a File) -> Result<Self, PromptError> {
        let original = termios::tcgetattr(tty)?;
        let mut raw = original.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(tty, SetArg::TCSANOW, &raw)?;
        Ok(Self { tty, original })
    }
}

impl Drop for RawModeGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = termios::tcsetattr(self.tty, SetArg::TCSANOW, &self.original) {
            tracing::warn!(error = %e, "failed to restore terminal settings");
        }
    }
}

/// Read exactly one UTF-8 encoded character.
fn read_char(input: &mut impl Read) -> Result<char, PromptError> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf[..1])?;

    let len = utf8_len(buf[0]).ok_or(PromptError::InvalidUtf8)?;
    if len > 1 {
        input.read_exact(&mut buf[1..len])?;
    }

    std::str::from_utf8(&buf[..len])
        .ok()
        .and_then(|s| s.chars().next())
        .ok_or(PromptError::InvalidUtf8)
}

/// Encoded length from the leading byte, `None` for continuation bytes.
fn utf8_len(first: u8) -> Option<usize> {
    match first {
        0x00..=0x7f => Some(1),
        0xc0..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf7 => Some(4),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Answers prompts from a fixed key sequence and records questions.
    #[derive(Default)]
    pub(crate) struct ScriptedPrompt {
        keys: VecDeque<char>,
        pub questions: Vec<String>,
    }

    impl ScriptedPrompt {
        pub fn new(keys: &str) -> Self {
            Self {
                keys: keys.chars().collect(),
                questions: Vec::new(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn read_key(&mut self, question: &str) -> Result<char, PromptError> {
            self.questions.push(question.to_string());
            self.keys.pop_front().ok_or_else(|| {
                PromptError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "no scripted key left",
                ))
            })
        }
    }

    #[test]
    fn read_ascii_char() {
        let mut input: &[u8] = b"sx";
        assert_eq!(read_char(&mut input).unwrap(), 's');
        assert_eq!(input, b"x");
    }

    #[test]
    fn read_multibyte_char() {
        let mut input = "é!".as_bytes();
        assert_eq!(read_char(&mut input).unwrap(), 'é');
        assert_eq!(input, b"!");
    }

    #[test]
    fn continuation_byte_is_invalid() {
        let mut input: &[u8] = &[0x80];
        assert!(matches!(read_char(&mut input), Err(PromptError::InvalidUtf8)));
    }

    #[test]
    fn eof_is_io_error() {
        let mut input: &[u8] = b"";
        assert!(matches!(read_char(&mut input), Err(PromptError::Io(_))));
    }

    #[test]
    fn scripted_prompt_records_questions() {
        let mut p = ScriptedPrompt::new("ab");
        assert_eq!(p.read_key("first? ").unwrap(), 'a');
        assert_eq!(p.read_key("second? ").unwrap(), 'b');
        assert!(p.read_key("third? ").is_err());
        assert_eq!(p.questions.len(), 3);
    }
}
