//! Promptsmith - assemble YAML prompt documents from a section catalog.
//!
//! Prompt documents for image generation are built from named fragments
//! rather than written whole. A **catalog** holds the fragments (the Master
//! Template) and, for each selection key, the ordered list of fragments that
//! make up one document (the Selection Map). A **resolver** turns the
//! current [`AppState`] into a [`Variables`] store, and the [`Engine`]
//! renders every listed section against it and joins the results.
//!
//! # Quick Start
//!
//! ```rust
//! use promptsmith::{AppState, Engine, OutputKind};
//!
//! let engine = Engine::default(); // bundled catalog
//! let state: AppState = serde_json::from_str(r#"{
//!     "title": "Aki",
//!     "face_sheet": { "character_name": "Aki", "appearance_description": "silver hair" }
//! }"#).unwrap();
//!
//! let yaml = engine.generate(OutputKind::FaceSheet, &state).unwrap();
//! assert!(yaml.contains("Aki"));
//! ```
//!
//! # Catalogs
//!
//! The bundled catalog covers every [`OutputKind`]. Point
//! [`EngineConfig::source`] at a directory to use your own:
//!
//! ```rust,no_run
//! use promptsmith::{CatalogSource, Engine, EngineConfig};
//!
//! let engine = Engine::new(
//!     EngineConfig::new()
//!         .source(CatalogSource::dir("./templates"))
//!         .prune_empty_fields(true),
//! );
//! for issue in engine.catalog()?.validate(&engine.config().optional_sections) {
//!     eprintln!("{issue}");
//! }
//! # Ok::<(), promptsmith::Error>(())
//! ```
//!
//! # Template Syntax
//!
//! Sections use the directive language of [`promptsmith_template`]:
//! `{{name}}`, `{{#if}}`/`{{#unless}}`/`{{else}}`, `{{#each}}` with
//! `{{@index}}`/`{{@index_1}}`, `{{> partial}}` and `{{! comments}}`.
//! Partials inside a section resolve against the same catalog tables.
//!
//! # Modules
//!
//! - [`catalog`]: Master Template and Selection Map models
//! - [`resolver`]: state-to-variables functions and their registry
//! - [`library`]: standalone template files

pub mod catalog;
mod cleanup;
mod config;
mod engine;
mod error;
mod escape;
mod kind;
pub mod library;
pub mod resolver;
mod state;

pub use catalog::{Catalog, CatalogIssue};
pub use cleanup::prune_empty_fields;
pub use config::{default_optional_sections, CatalogSource, EngineConfig, DEFAULT_OPTIONAL_SECTIONS};
pub use engine::Engine;
pub use error::{Error, Result};
pub use escape::{escape_yaml, file_name, newlines_to_comma};
pub use kind::OutputKind;
pub use library::TemplateLibrary;
pub use resolver::{ResolverFn, ResolverRegistry};
pub use state::{
    AppState, AspectRatio, BackgroundSettings, BodySheetSettings, ColorMode,
    DecorativeTextSettings, DuotoneColor, FaceSheetSettings, FourPanelCharacter,
    FourPanelSettings, InfoSection, InfographicSettings, OutfitSettings, OutputStyle,
    PanelSettings, PoseSettings, SceneBuilderSettings, SceneCharacter, SceneType, Speaker,
    Speech, StyleInfo, StyleTransformSettings,
};

// Template types used in resolver signatures.
pub use promptsmith_template::{record, Record, Value, Variables};
