//! The orchestrator: catalog + resolvers → document text.
//!
//! [`Engine`] owns its configuration, a lazily loaded [`Catalog`] and the
//! resolver registry. Generating a document runs these steps:
//!
//! 1. Load the catalog on first use. A missing document is fatal.
//! 2. Resolve variables for the output type.
//! 3. Look the selection key up in the Selection Map. A missing or empty
//!    section list is fatal ([`Error::UnknownOutputType`]).
//! 4. Fill in the catalog's static values for the output type, then the
//!    `<table>_label` bindings from the variable-mapping tables. Values the
//!    resolver produced are never overwritten.
//! 5. Render each listed section, kind-specific table first, then common.
//!    Undefined sections are skipped; outside the optional allow-list the
//!    skip is logged as a warning. A section that fails to parse aborts the
//!    whole document.
//! 6. Join the rendered sections with newlines and, when configured, prune
//!    empty fields.
//!
//! ```
//! use promptsmith::{AppState, Catalog, Engine, OutputKind};
//!
//! let catalog = Catalog::from_yaml(
//!     "output_types:\n  face_sheet:\n    sections:\n      name:\n        template: 'name: {{character_name}}'\n",
//!     "selection_map:\n  face_sheet:\n    sections: [name]\n",
//! ).unwrap();
//!
//! let engine = Engine::default().with_catalog(catalog);
//! let state: AppState = serde_json::from_str(r#"{"face_sheet": {"character_name": "Aki"}}"#).unwrap();
//!
//! assert_eq!(engine.generate(OutputKind::FaceSheet, &state).unwrap(), "name: Aki");
//! ```
//!
//! The catalog is immutable once loaded, so one engine can serve concurrent
//! callers.

use std::borrow::Cow;

use once_cell::sync::OnceCell;
use promptsmith_template::{parse, PartialSource, Renderer, Variables};
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::cleanup::prune_empty_fields;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::kind::OutputKind;
use crate::resolver::ResolverRegistry;
use crate::state::AppState;

/// Assembles documents from a catalog and application state.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    catalog: OnceCell<Catalog>,
    resolvers: ResolverRegistry<AppState>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Creates an engine with the built-in resolvers. The catalog is loaded
    /// from `config.source` on first use.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            catalog: OnceCell::new(),
            resolvers: ResolverRegistry::builtin(),
        }
    }

    /// Uses an already loaded catalog instead of `config.source`.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = OnceCell::with_value(catalog);
        self
    }

    /// Replaces the resolver registry.
    pub fn with_resolvers(mut self, resolvers: ResolverRegistry<AppState>) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolvers(&self) -> &ResolverRegistry<AppState> {
        &self.resolvers
    }

    /// Returns the catalog, loading it on first call.
    pub fn catalog(&self) -> Result<&Catalog> {
        self.catalog
            .get_or_try_init(|| Catalog::load(&self.config.source))
    }

    /// Generates the document for `kind`, deriving the selection key from
    /// the state.
    pub fn generate(&self, kind: OutputKind, state: &AppState) -> Result<String> {
        let selection_key = kind.selection_key(state);
        debug!(kind = %kind, selection_key, "selection key derived");
        self.generate_for_key(kind, selection_key, state)
    }

    /// Generates the document for `kind` using an explicit selection key.
    pub fn generate_for_key(
        &self,
        kind: OutputKind,
        selection_key: &str,
        state: &AppState,
    ) -> Result<String> {
        self.generate_with(&self.resolvers, kind.as_str(), selection_key, state)
    }

    /// Generates a document with a caller-supplied resolver registry.
    pub fn generate_with<S>(
        &self,
        resolvers: &ResolverRegistry<S>,
        output_type: &str,
        selection_key: &str,
        state: &S,
    ) -> Result<String> {
        self.catalog()?;
        let vars = resolvers
            .resolve(output_type, state)
            .ok_or_else(|| Error::UnknownOutputType(output_type.to_string()))?;
        self.assemble(output_type, selection_key, vars)
    }

    /// Assembles a document from caller-supplied variables.
    pub fn assemble(
        &self,
        output_type: &str,
        selection_key: &str,
        mut vars: Variables,
    ) -> Result<String> {
        let catalog = self.catalog()?;
        let sections = catalog
            .sections_for(selection_key)
            .filter(|sections| !sections.is_empty())
            .ok_or_else(|| Error::UnknownOutputType(selection_key.to_string()))?;

        vars.merge_missing(&catalog.static_values(output_type, selection_key));
        catalog.apply_variable_mappings(&mut vars);

        let partials = SectionPartials {
            catalog,
            output_type,
        };
        let renderer =
            Renderer::with_partials(&partials).max_partial_depth(self.config.max_partial_depth);

        let mut parts = Vec::with_capacity(sections.len());
        for name in sections {
            let Some(section) = catalog.section(output_type, name) else {
                if !self.config.is_optional(name) {
                    warn!(section = %name, output_type, selection_key, "section not found, skipping");
                }
                continue;
            };
            parts.push(render_template(&renderer, name, &section.template, &vars)?);
        }

        let document = parts.join("\n");
        if self.config.prune_empty_fields {
            Ok(prune_empty_fields(&document))
        } else {
            Ok(document)
        }
    }

    /// The ordered section names for a selection key; empty when the key is
    /// unknown.
    pub fn list_available_sections(&self, selection_key: &str) -> Result<Vec<String>> {
        let catalog = self.catalog()?;
        Ok(catalog
            .sections_for(selection_key)
            .map(<[String]>::to_vec)
            .unwrap_or_default())
    }

    /// Renders a single section of an output type against `vars`.
    pub fn render_section(&self, output_type: &str, name: &str, vars: &Variables) -> Result<String> {
        let catalog = self.catalog()?;
        let section = catalog
            .section(output_type, name)
            .ok_or_else(|| Error::UnknownSection(name.to_string()))?;
        let partials = SectionPartials {
            catalog,
            output_type,
        };
        let renderer =
            Renderer::with_partials(&partials).max_partial_depth(self.config.max_partial_depth);
        render_template(&renderer, name, &section.template, vars)
    }
}

fn render_template(
    renderer: &Renderer<'_>,
    name: &str,
    template: &str,
    vars: &Variables,
) -> Result<String> {
    let nodes = parse(template).map_err(|e| Error::parse(name, e))?;
    renderer
        .render(&nodes, vars)
        .map_err(|e| Error::parse(name, e))
}

/// Resolves `{{> name}}` against the same section tables as the document.
struct SectionPartials<'a> {
    catalog: &'a Catalog,
    output_type: &'a str,
}

impl PartialSource for SectionPartials<'_> {
    fn partial(&self, name: &str) -> Option<Cow<'_, str>> {
        self.catalog
            .section(self.output_type, name)
            .map(|section| Cow::Borrowed(section.template.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = r##"
common_sections:
  header:
    template: "title: {{title}}"
  footer:
    template: "# {{type}}"
output_types:
  demo:
    type_value: demo_sheet
    header_values:
      title: From Catalog
    sections:
      body:
        template: "note: {{note}}"
      wrapped:
        template: "{{> body}}!"
"##;

    const SELECTION: &str = r#"
selection_map:
  k1:
    output_type_key: demo
    sections: [header, body]
  k2:
    sections: [header, missing, title_overlay, footer]
  empty:
    sections: []
"#;

    fn engine() -> Engine {
        Engine::default().with_catalog(Catalog::from_yaml(MASTER, SELECTION).unwrap())
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn assemble_joins_sections() {
        let vars = Variables::new().with("title", "Demo").with("note", "");
        let doc = engine().assemble("demo", "k1", vars).unwrap();
        assert_eq!(doc, "title: Demo\nnote: ");
    }

    #[test]
    fn resolver_values_beat_header_values() {
        let doc = engine()
            .assemble("demo", "k1", Variables::new().with("title", "Mine"))
            .unwrap();
        assert!(doc.starts_with("title: Mine\n"));

        let doc = engine().assemble("demo", "k1", Variables::new()).unwrap();
        assert!(doc.starts_with("title: From Catalog\n"));
    }

    #[test]
    fn missing_sections_are_skipped() {
        let doc = engine()
            .assemble("demo", "k2", Variables::new().with("title", "T"))
            .unwrap();
        assert_eq!(doc, "title: T\n# demo_sheet");
    }

    #[test]
    fn unknown_or_empty_selection_is_fatal() {
        for key in ["nope", "empty"] {
            let err = engine().assemble("demo", key, Variables::new()).unwrap_err();
            assert!(matches!(err, Error::UnknownOutputType(k) if k == key));
        }
    }

    #[test]
    fn unknown_resolver_is_fatal() {
        let registry: ResolverRegistry<()> = ResolverRegistry::new();
        let err = engine().generate_with(&registry, "demo", "k1", &()).unwrap_err();
        assert!(matches!(err, Error::UnknownOutputType(k) if k == "demo"));
    }

    #[test]
    fn partials_use_section_lookup() {
        let vars = Variables::new().with("note", "hi");
        assert_eq!(
            engine().render_section("demo", "wrapped", &vars).unwrap(),
            "note: hi!"
        );
        assert!(matches!(
            engine().render_section("demo", "nope", &vars),
            Err(Error::UnknownSection(n)) if n == "nope"
        ));
    }

    #[test]
    fn lists_sections() {
        let engine = engine();
        assert_eq!(engine.list_available_sections("k1").unwrap(), ["header", "body"]);
        assert!(engine.list_available_sections("nope").unwrap().is_empty());
    }
}
