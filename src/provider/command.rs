//! External-command providers, configured per application.
//!
//! The command's stdout uses the same `target::split::title` line
//! format as the built-in scripts, so any tool (a shell script, a
//! browser remote-control CLI) can be plugged in from the config file.

use std::process::{Command, Stdio};

use crate::link::{Grab, parse_records};

use super::{LinkProvider, ProviderError};

#[derive(Debug, Clone)]
pub struct CommandProvider {
    program: String,
    args: Vec<String>,
}

impl CommandProvider {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl LinkProvider for CommandProvider {
    fn grab(&self) -> Result<Grab, ProviderError> {
        tracing::debug!(program = %self.program, args = ?self.args, "running link command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProviderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with status {}", output.status)
            } else {
                stderr
            };
            return Err(ProviderError::Failed {
                program: self.program.clone(),
                message,
            });
        }

        Ok(parse_records(&String::from_utf8_lossy(&output.stdout)))
    }
}
