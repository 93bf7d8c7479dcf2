//! Resolvers: application state to Variable Store.
//!
//! A resolver is a plain function from a state type to [`Variables`], one per
//! output type. [`ResolverRegistry`] keys them by output type; the engine
//! looks the resolver up and renders the catalog sections against its result.
//!
//! [`ResolverRegistry::builtin`] registers the resolvers for every
//! [`OutputKind`] over [`AppState`]. Applications with their own state type
//! build a registry of their own:
//!
//! ```
//! use promptsmith::{ResolverRegistry, Variables};
//!
//! struct Ticket { title: String }
//!
//! fn ticket(t: &Ticket) -> Variables {
//!     Variables::new().with("title", t.title.as_str())
//! }
//!
//! let mut registry = ResolverRegistry::new();
//! registry.register("ticket", ticket);
//!
//! let vars = registry.resolve("ticket", &Ticket { title: "Fix".into() }).unwrap();
//! assert_eq!(vars.get_str("title"), Some("Fix"));
//! ```
//!
//! Every built-in resolver starts from [`common`], which binds the shared
//! document settings.

mod character;
mod graphic;
mod scene;

use std::collections::BTreeMap;

use promptsmith_template::Variables;

use crate::escape::escape_yaml;
use crate::kind::OutputKind;
use crate::state::AppState;

/// A resolver function.
pub type ResolverFn<S> = fn(&S) -> Variables;

/// Resolvers keyed by output type.
pub struct ResolverRegistry<S> {
    resolvers: BTreeMap<String, ResolverFn<S>>,
}

impl<S> Default for ResolverRegistry<S> {
    fn default() -> Self {
        Self {
            resolvers: BTreeMap::new(),
        }
    }
}

impl<S> Clone for ResolverRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            resolvers: self.resolvers.clone(),
        }
    }
}

impl<S> std::fmt::Debug for ResolverRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("keys", &self.resolvers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<S> ResolverRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `resolver` for `output_type`, replacing any previous one.
    pub fn register(&mut self, output_type: impl Into<String>, resolver: ResolverFn<S>) {
        self.resolvers.insert(output_type.into(), resolver);
    }

    /// Runs the resolver for `output_type`, or returns `None` if there is none.
    pub fn resolve(&self, output_type: &str, state: &S) -> Option<Variables> {
        self.resolvers.get(output_type).map(|resolve| resolve(state))
    }

    pub fn contains(&self, output_type: &str) -> bool {
        self.resolvers.contains_key(output_type)
    }

    /// Registered output types in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(String::as_str)
    }
}

impl ResolverRegistry<AppState> {
    /// The resolvers for every built-in [`OutputKind`].
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in OutputKind::ALL {
            registry.register(kind.as_str(), builtin_resolver(kind));
        }
        registry
    }
}

fn builtin_resolver(kind: OutputKind) -> ResolverFn<AppState> {
    match kind {
        OutputKind::FaceSheet => character::face_sheet,
        OutputKind::BodySheet => character::body_sheet,
        OutputKind::OutfitSheet => character::outfit_sheet,
        OutputKind::Pose => character::pose,
        OutputKind::SceneBuilder => scene::scene_builder,
        OutputKind::Background => scene::background,
        OutputKind::FourPanel => scene::four_panel,
        OutputKind::DecorativeText => graphic::decorative_text,
        OutputKind::StyleTransform => graphic::style_transform,
        OutputKind::Infographic => graphic::infographic,
    }
}

/// Binds the settings shared by every output kind.
///
/// | Variable | Source |
/// |----------|--------|
/// | `title` | escaped title |
/// | `author` | trimmed author, only when non-empty |
/// | `color_mode` | color mode key |
/// | `is_duotone` | `true` for duotone |
/// | `duotone_style` | ink description, only for duotone |
/// | `output_style` | style key |
/// | `aspect_ratio` | ratio such as `16:9` |
/// | `title_overlay_enabled` | whether the title is drawn into the image |
pub fn common(state: &AppState) -> Variables {
    let mut vars = Variables::new();
    vars.set("title", escape_yaml(&state.title));

    let author = state.author.trim();
    if !author.is_empty() {
        vars.set("author", escape_yaml(author));
    }

    vars.set("color_mode", state.color_mode.as_str());
    vars.set("is_duotone", state.color_mode.is_duotone());
    if state.color_mode.is_duotone() {
        vars.set("duotone_style", state.duotone_color.prompt());
    }

    vars.set("output_style", state.output_style.as_str());
    vars.set("aspect_ratio", state.aspect_ratio.as_str());
    vars.set("title_overlay_enabled", state.include_title_in_image);
    vars
}

/// Sets `name` only when `value` is non-empty after trimming.
pub(crate) fn set_non_empty(vars: &mut Variables, name: &str, value: String) {
    if !value.trim().is_empty() {
        vars.set(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ColorMode, DuotoneColor};

    #[test]
    fn builtin_covers_every_kind() {
        let registry = ResolverRegistry::builtin();
        for kind in OutputKind::ALL {
            assert!(registry.contains(kind.as_str()), "{kind}");
        }
        assert_eq!(registry.keys().count(), OutputKind::ALL.len());
        assert!(registry.resolve("comic", &AppState::default()).is_none());
    }

    #[test]
    fn every_builtin_includes_common_values() {
        let state = AppState {
            title: "Demo".into(),
            ..Default::default()
        };
        let registry = ResolverRegistry::builtin();
        for key in registry.keys() {
            let vars = registry.resolve(key, &state).unwrap();
            assert_eq!(vars.get_str("title"), Some("Demo"), "{key}");
            assert_eq!(vars.get_str("aspect_ratio"), Some("1:1"), "{key}");
        }
    }

    #[test]
    fn common_escapes_and_trims() {
        let state = AppState {
            title: "The \"Best\" Day".into(),
            author: "   ".into(),
            ..Default::default()
        };
        let vars = common(&state);
        assert_eq!(vars.get_str("title"), Some("The \\\"Best\\\" Day"));
        assert!(!vars.contains("author"));
        assert_eq!(vars.get_bool("is_duotone"), Some(false));
        assert!(!vars.contains("duotone_style"));
        assert_eq!(vars.get_bool("title_overlay_enabled"), Some(false));
    }

    #[test]
    fn common_duotone_style() {
        let state = AppState {
            author: " Mika ".into(),
            color_mode: ColorMode::Duotone,
            duotone_color: DuotoneColor::BlueBlack,
            ..Default::default()
        };
        let vars = common(&state);
        assert_eq!(vars.get_str("author"), Some("Mika"));
        assert_eq!(vars.get_str("color_mode"), Some("duotone"));
        assert_eq!(vars.get_bool("is_duotone"), Some(true));
        assert_eq!(
            vars.get_str("duotone_style"),
            Some(DuotoneColor::BlueBlack.prompt())
        );
    }

    #[test]
    fn custom_registry_replaces_entries() {
        fn first(_: &u8) -> Variables {
            Variables::new().with("n", 1)
        }
        fn second(_: &u8) -> Variables {
            Variables::new().with("n", 2)
        }
        let mut registry = ResolverRegistry::new();
        registry.register("x", first);
        registry.register("x", second);
        let vars = registry.resolve("x", &0u8).unwrap();
        assert_eq!(vars.get("n").and_then(|v| v.as_int()), Some(2));
    }
}
