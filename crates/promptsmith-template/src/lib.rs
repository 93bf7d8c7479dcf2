//! Promptsmith templates - a small mustache-style directive language.
//!
//! This crate turns template text into a node tree and renders that tree
//! against a [`Variables`] store. It implements exactly the directives that
//! prompt documents need and nothing more:
//!
//! | Directive | Meaning |
//! |-----------|---------|
//! | `{{name}}` | Substitute a variable (dotted paths allowed) |
//! | `{{{name}}}` | Same as `{{name}}`; no escaping is applied by either |
//! | `{{#if name}}…{{else}}…{{/if}}` | Render a branch by truthiness |
//! | `{{#unless name}}…{{/unless}}` | Negated conditional |
//! | `{{#each name}}…{{/each}}` | Iterate a list of records |
//! | `{{> partial key="value"}}` | Include another template with overrides |
//! | `{{! comment}}` | Dropped from output |
//!
//! # Quick Start
//!
//! ```rust
//! use promptsmith_template::{parse, record, render, Variables};
//!
//! let template = parse(
//!     "title: {{title}}\n{{#each panels}}- {{@index_1}}: {{scene}}\n{{/each}}",
//! ).unwrap();
//!
//! let vars = Variables::new()
//!     .with("title", "Demo")
//!     .with("panels", vec![
//!         record! { "scene" => "dawn" },
//!         record! { "scene" => "dusk" },
//!     ]);
//!
//! assert_eq!(render(&template, &vars), "title: Demo\n- 1: dawn\n- 2: dusk\n");
//! ```
//!
//! # Truthiness
//!
//! Conditionals treat absent names, empty strings, `false` and empty lists as
//! false. Everything else is true, including the integer `0` and records.
//!
//! # Loop Scope
//!
//! Each loop iteration renders against a copy of the enclosing store with the
//! current record's fields and `@index` / `@index_1` bound. Nothing bound
//! inside a loop is visible after it.

mod ast;
mod error;
mod lexer;
mod parser;
mod render;
mod value;
mod vars;

pub use ast::{partial_names, Condition, Loop, Node, Partial, Template};
pub use error::{ParseError, Result};
pub use lexer::{TagKind, Token, Tokenizer};
pub use parser::parse;
pub use render::{render, PartialSource, Renderer, DEFAULT_MAX_PARTIAL_DEPTH};
pub use value::{Record, Value};
pub use vars::{Variables, INDEX, INDEX_1};
