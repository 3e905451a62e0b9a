//! Selection of the application and the link type.
//!
//! Each choice is resolved by one of three strategies: an interactive
//! one-key menu, a configured preferred default, or (link type only)
//! inference from the current editing context. The selector reads the
//! registries but never runs a provider or a formatter.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GrabError;
use crate::format::{LinkTypeEntry, PLAIN};
use crate::prompt::Prompt;
use crate::provider::AppEntry;
use crate::registry::{Registry, RegistryEntry};
use crate::surface::EditingSurface;

const APP_QUESTION: &str = "Grab link from";
const LINK_TYPE_QUESTION: &str = "Link type";

/// Configured default link type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PreferredLinkType {
    /// Infer from the current editing context.
    FromContext,
    /// A link type id, used verbatim.
    Id(String),
}

impl PreferredLinkType {
    const FROM_CONTEXT: &'static str = "from-context";
}

impl From<String> for PreferredLinkType {
    fn from(value: String) -> Self {
        if value == Self::FROM_CONTEXT {
            Self::FromContext
        } else {
            Self::Id(value)
        }
    }
}

impl From<PreferredLinkType> for String {
    fn from(value: PreferredLinkType) -> Self {
        match value {
            PreferredLinkType::FromContext => PreferredLinkType::FROM_CONTEXT.to_string(),
            PreferredLinkType::Id(id) => id,
        }
    }
}

/// Compiled `context → link type` rule.
#[derive(Debug, Clone)]
pub struct ContextRule {
    pattern: Regex,
    link_type: String,
}

impl ContextRule {
    pub fn new(pattern: Regex, link_type: &str) -> Self {
        Self {
            pattern,
            link_type: link_type.to_string(),
        }
    }

    pub fn link_type(&self) -> &str {
        &self.link_type
    }

    fn matches(&self, context: &str) -> bool {
        self.pattern.is_match(context)
    }
}

/// Resolved selection settings, built from the config at startup.
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    pub app: Option<String>,
    pub link_type: Option<PreferredLinkType>,
    pub context_rules: Vec<ContextRule>,
}

/// First rule matching `context` wins; no context or no match → `plain`.
pub fn infer_link_type<'r>(rules: &'r [ContextRule], context: Option<&str>) -> &'r str {
    let Some(context) = context else {
        return PLAIN;
    };

    rules
        .iter()
        .find(|rule| rule.matches(context))
        .map(ContextRule::link_type)
        .unwrap_or(PLAIN)
}

/// Menu line: `Grab link from [c]hrome [s]afari [F]inder: `.
pub fn render_menu<E: RegistryEntry>(question: &str, registry: &Registry<E>) -> String {
    let items: Vec<String> = registry
        .keyed()
        .map(|(key, entry)| {
            let rest = &entry.label()[key.len_utf8()..];
            format!("[{key}]{rest}")
        })
        .collect();
    format!("{question} {}: ", items.join(" "))
}

/// Show the menu for `registry` and resolve the pressed key.
pub fn choose<'a, E: RegistryEntry>(
    question: &str,
    registry: &'a Registry<E>,
    prompt: &mut dyn Prompt,
) -> Result<&'a E, GrabError> {
    let key = prompt.read_key(&render_menu(question, registry))?;
    registry.by_key(key).ok_or(GrabError::Selection { key })
}

/// Resolves the application and link type for one dispatch.
pub struct Selector<'a> {
    apps: &'a Registry<AppEntry>,
    link_types: &'a Registry<LinkTypeEntry>,
    prefs: &'a Preferences,
}

impl<'a> Selector<'a> {
    pub fn new(
        apps: &'a Registry<AppEntry>,
        link_types: &'a Registry<LinkTypeEntry>,
        prefs: &'a Preferences,
    ) -> Self {
        Self {
            apps,
            link_types,
            prefs,
        }
    }

    /// Pick the application.
    ///
    /// With `use_preferred`, the configured app is used verbatim. When
    /// none is configured the menu is shown anyway.
    pub fn select_app(
        &self,
        use_preferred: bool,
        prompt: &mut dyn Prompt,
    ) -> Result<&'a AppEntry, GrabError> {
        if use_preferred {
            if let Some(id) = &self.prefs.app {
                tracing::debug!(app = %id, "using preferred app");
                return self
                    .apps
                    .get(id)
                    .ok_or_else(|| GrabError::UnknownApp(id.clone()));
            }
            tracing::debug!("no preferred app configured, prompting");
        }

        choose(APP_QUESTION, self.apps, prompt)
    }

    /// Pick the link type.
    ///
    /// With `use_preferred`, the configured type is used verbatim, or
    /// inferred from `surface`'s context for `from-context`. When none
    /// is configured the menu is shown anyway.
    pub fn select_link_type(
        &self,
        use_preferred: bool,
        prompt: &mut dyn Prompt,
        surface: &dyn EditingSurface,
    ) -> Result<&'a LinkTypeEntry, GrabError> {
        if use_preferred {
            match &self.prefs.link_type {
                Some(PreferredLinkType::Id(id)) => {
                    tracing::debug!(link_type = %id, "using preferred link type");
                    return self.link_type(id);
                }
                Some(PreferredLinkType::FromContext) => {
                    let context = surface.current_context();
                    let id = infer_link_type(&self.prefs.context_rules, context.as_deref());
                    tracing::debug!(context = ?context, link_type = %id, "inferred link type");
                    return self.link_type(id);
                }
                None => tracing::debug!("no preferred link type configured, prompting"),
            }
        }

        choose(LINK_TYPE_QUESTION, self.link_types, prompt)
    }

    fn link_type(&self, id: &str) -> Result<&'a LinkTypeEntry, GrabError> {
        self.link_types
            .get(id)
            .ok_or_else(|| GrabError::UnknownLinkType(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::default_link_types;
    use crate::link::Grab;
    use crate::prompt::tests::ScriptedPrompt;
    use crate::provider::ProviderError;
    use crate::surface::SurfaceError;
    use crate::surface::store::LinkStore;

    struct ContextOnly(Option<&'static str>);

    impl EditingSurface for ContextOnly {
        fn insert_at_cursor(&mut self, _: &str) -> Result<(), SurfaceError> {
            unreachable!()
        }
        fn current_context(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
        fn set_clipboard(&mut self, _: &str) -> Result<(), SurfaceError> {
            unreachable!()
        }
        fn stored_links(&mut self) -> Option<&mut dyn LinkStore> {
            None
        }
    }

    fn absent() -> Result<Grab, ProviderError> {
        Ok(Grab::Absent)
    }

    fn apps() -> Registry<AppEntry> {
        Registry::from_entries([
            AppEntry::new("chrome", "chrome", absent),
            AppEntry::new("safari", "safari", absent),
            AppEntry::new("finder", "Finder", absent),
        ])
        .unwrap()
    }

    fn rules(pairs: &[(&str, &str)]) -> Vec<ContextRule> {
        pairs
            .iter()
            .map(|(p, t)| ContextRule::new(Regex::new(p).unwrap(), t))
            .collect()
    }

    #[test]
    fn menu_marks_dispatch_keys() {
        let menu = render_menu(APP_QUESTION, &apps());
        assert_eq!(menu, "Grab link from [c]hrome [s]afari [F]inder: ");
    }

    #[test]
    fn interactive_resolves_key() {
        let apps = apps();
        let types = default_link_types().unwrap();
        let prefs = Preferences::default();
        let selector = Selector::new(&apps, &types, &prefs);

        let mut prompt = ScriptedPrompt::new("Fo");
        let app = selector.select_app(false, &mut prompt).unwrap();
        let ty = selector
            .select_link_type(false, &mut prompt, &ContextOnly(None))
            .unwrap();

        assert_eq!(app.id, "finder");
        assert_eq!(ty.id, "org");
        assert_eq!(prompt.questions.len(), 2);
        assert!(prompt.questions[1].starts_with("Link type [p]lain"));
    }

    #[test]
    fn interactive_unknown_key_is_selection_error() {
        let apps = apps();
        let mut prompt = ScriptedPrompt::new("x");
        let err = choose(APP_QUESTION, &apps, &mut prompt).unwrap_err();
        assert!(matches!(err, GrabError::Selection { key: 'x' }));
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn interactive_key_is_case_sensitive() {
        let apps = apps();
        let mut prompt = ScriptedPrompt::new("f");
        let err = choose(APP_QUESTION, &apps, &mut prompt).unwrap_err();
        assert!(matches!(err, GrabError::Selection { key: 'f' }));
    }

    #[test]
    fn preferred_app_skips_prompt() {
        let apps = apps();
        let types = default_link_types().unwrap();
        let prefs = Preferences {
            app: Some("safari".into()),
            ..Preferences::default()
        };
        let selector = Selector::new(&apps, &types, &prefs);

        let mut prompt = ScriptedPrompt::new("");
        assert_eq!(selector.select_app(true, &mut prompt).unwrap().id, "safari");
        assert!(prompt.questions.is_empty());
    }

    #[test]
    fn preferred_app_unregistered() {
        let apps = apps();
        let types = default_link_types().unwrap();
        let prefs = Preferences {
            app: Some("opera".into()),
            ..Preferences::default()
        };
        let selector = Selector::new(&apps, &types, &prefs);
        let err = selector
            .select_app(true, &mut ScriptedPrompt::new(""))
            .unwrap_err();
        assert!(matches!(err, GrabError::UnknownApp(ref id) if id == "opera"));
    }

    #[test]
    fn missing_preference_falls_back_to_prompt() {
        let apps = apps();
        let types = default_link_types().unwrap();
        let prefs = Preferences::default();
        let selector = Selector::new(&apps, &types, &prefs);

        let mut prompt = ScriptedPrompt::new("ch");
        assert_eq!(selector.select_app(true, &mut prompt).unwrap().id, "chrome");
        let ty = selector
            .select_link_type(true, &mut prompt, &ContextOnly(None))
            .unwrap();
        assert_eq!(ty.id, "html");
        assert_eq!(prompt.questions.len(), 2);
    }

    #[test]
    fn preferred_link_type_verbatim() {
        let apps = apps();
        let types = default_link_types().unwrap();
        let prefs = Preferences {
            link_type: Some(PreferredLinkType::Id("markdown".into())),
            ..Preferences::default()
        };
        let selector = Selector::new(&apps, &types, &prefs);
        let ty = selector
            .select_link_type(true, &mut ScriptedPrompt::new(""), &ContextOnly(Some("org-mode")))
            .unwrap();
        assert_eq!(ty.id, "markdown");
    }

    #[test]
    fn inferred_link_type_from_context() {
        let apps = apps();
        let types = default_link_types().unwrap();
        let prefs = Preferences {
            link_type: Some(PreferredLinkType::FromContext),
            context_rules: rules(&[("^org-mode$", "org"), ("markdown", "markdown")]),
            ..Preferences::default()
        };
        let selector = Selector::new(&apps, &types, &prefs);
        let mut prompt = ScriptedPrompt::new("");

        let ty = selector
            .select_link_type(true, &mut prompt, &ContextOnly(Some("gfm-markdown-mode")))
            .unwrap();
        assert_eq!(ty.id, "markdown");

        let ty = selector
            .select_link_type(true, &mut prompt, &ContextOnly(Some("text-mode")))
            .unwrap();
        assert_eq!(ty.id, "plain");
        assert!(prompt.questions.is_empty());
    }

    #[test]
    fn inference_first_match_wins() {
        let rules = rules(&[("mode", "org"), ("markdown-mode", "markdown")]);
        assert_eq!(infer_link_type(&rules, Some("markdown-mode")), "org");
    }

    #[test]
    fn inference_without_context_is_plain() {
        let rules = rules(&[(".*", "org")]);
        assert_eq!(infer_link_type(&rules, None), "plain");
        assert_eq!(infer_link_type(&[], Some("org-mode")), "plain");
    }

    #[test]
    fn preferred_link_type_serde() {
        let ctx: PreferredLinkType = serde_json::from_str("\"from-context\"").unwrap();
        assert_eq!(ctx, PreferredLinkType::FromContext);
        let id: PreferredLinkType = serde_json::from_str("\"org\"").unwrap();
        assert_eq!(id, PreferredLinkType::Id("org".into()));
        assert_eq!(
            serde_json::to_string(&PreferredLinkType::FromContext).unwrap(),
            "\"from-context\""
        );
    }
}
