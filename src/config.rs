//! Configuration file — preferred defaults, context rules, and registry
//! overrides.
//!
//! Loaded once at startup from `<config_dir>/grab-link/config.json`
//! (or `--config`). A missing file means defaults; a broken file is an
//! error rather than a silent fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::format::LinkTypeEntry;
use crate::provider::{AppEntry, CommandProvider};
use crate::registry::{Registry, RegistryError};
use crate::selector::{ContextRule, PreferredLinkType, Preferences};
use crate::surface::clipboard::ClipboardProvider;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid context pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unknown link type {0:?}")]
    UnknownLinkType(String),
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Application id used when the application prompt is skipped.
    pub preferred_app: Option<String>,

    /// Link type id, or `"from-context"`, used when the link-type
    /// prompt is skipped.
    pub preferred_link_type: Option<PreferredLinkType>,

    /// Ordered `context regex → link type` rules for `"from-context"`.
    pub context_link_types: Vec<ContextLinkType>,

    /// Application ids removed from the menu.
    pub disabled_apps: Vec<String>,

    /// Link type ids removed from the menu.
    pub disabled_link_types: Vec<String>,

    /// Extra applications, or replacements for built-in ones, backed
    /// by an external command.
    pub apps: Vec<CommandApp>,

    /// JSON-lines file acting as the stored-links registry.
    pub stored_links_file: Option<PathBuf>,
}

/// One context rule as written in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextLinkType {
    pub context: String,
    pub link_type: String,
}

/// An application backed by an external command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandApp {
    pub id: String,
    pub label: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Default config location.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("grab-link")
        .join("config.json")
}

impl Config {
    /// Load from `path`; a missing file yields the default config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the selection preferences against the link-type registry.
    ///
    /// Compiles the context rules and checks that every link type the
    /// config names is registered.
    pub fn preferences(
        &self,
        link_types: &Registry<LinkTypeEntry>,
    ) -> Result<Preferences, ConfigError> {
        if let Some(PreferredLinkType::Id(id)) = &self.preferred_link_type
            && link_types.get(id).is_none()
        {
            return Err(ConfigError::UnknownLinkType(id.clone()));
        }

        let context_rules = self
            .context_link_types
            .iter()
            .map(|rule| {
                if link_types.get(&rule.link_type).is_none() {
                    return Err(ConfigError::UnknownLinkType(rule.link_type.clone()));
                }
                let pattern = Regex::new(&rule.context).map_err(|source| ConfigError::Pattern {
                    pattern: rule.context.clone(),
                    source,
                })?;
                Ok(ContextRule::new(pattern, &rule.link_type))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Preferences {
            app: self.preferred_app.clone(),
            link_type: self.preferred_link_type.clone(),
            context_rules,
        })
    }

    /// Apply `disabled_apps` and `apps` to the application registry.
    ///
    /// Removals run first so a configured app may take over a freed
    /// dispatch key.
    pub fn apply_app_overrides(
        &self,
        apps: &mut Registry<AppEntry>,
    ) -> Result<(), RegistryError> {
        for id in &self.disabled_apps {
            if apps.remove(id).is_none() {
                tracing::warn!(app = %id, "disabled app is not registered");
            }
        }

        for app in &self.apps {
            let provider = CommandProvider::new(&app.command, app.args.clone());
            apps.upsert(AppEntry::new(&app.id, &app.label, provider))?;
            tracing::debug!(app = %app.id, command = %app.command, "configured command app");
        }

        Ok(())
    }

    /// Apply `disabled_link_types` to the link-type registry.
    pub fn apply_link_type_overrides(&self, link_types: &mut Registry<LinkTypeEntry>) {
        for id in &self.disabled_link_types {
            if link_types.remove(id).is_none() {
                tracing::warn!(link_type = %id, "disabled link type is not registered");
            }
        }
    }
}

/// Build the application registry: built-ins plus config overrides.
pub fn build_apps(
    config: &Config,
    clipboard: Arc<dyn ClipboardProvider>,
) -> Result<Registry<AppEntry>, RegistryError> {
    let mut apps = crate::provider::default_apps(clipboard)?;
    config.apply_app_overrides(&mut apps)?;
    Ok(apps)
}

/// Build the link-type registry: built-ins minus disabled types.
pub fn build_link_types(config: &Config) -> Result<Registry<LinkTypeEntry>, RegistryError> {
    let mut link_types = crate::format::default_link_types()?;
    config.apply_link_type_overrides(&mut link_types);
    Ok(link_types)
}
