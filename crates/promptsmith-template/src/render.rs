//! Renderer: evaluates a node tree against a [`Variables`] store.
//!
//! Rendering is deterministic and has no side effects apart from log events.
//! Problems that only exist at render time never fail the render:
//!
//! - absent variables render as empty text,
//! - a loop over something that is not a list renders nothing,
//! - a partial that cannot be found renders a `# Partial not found` marker,
//! - partials nested deeper than the configured limit render nothing.
//!
//! Only a partial whose source fails to parse produces an error.
//!
//! # Example
//!
//! ```rust
//! use promptsmith_template::{parse, record, Renderer, Variables};
//! use std::collections::HashMap;
//!
//! let mut partials = HashMap::new();
//! partials.insert("item".to_string(), "- {{name}} ({{tone}})\n".to_string());
//!
//! let vars = Variables::new().with(
//!     "items",
//!     vec![record! { "name" => "a" }, record! { "name" => "b" }],
//! );
//! let nodes = parse("{{#each items}}{{> item tone=\"soft\"}}{{/each}}").unwrap();
//! let out = Renderer::with_partials(&partials).render(&nodes, &vars).unwrap();
//! assert_eq!(out, "- a (soft)\n- b (soft)\n");
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::ast::{Condition, Loop, Node, Partial};
use crate::error::Result;
use crate::parser::parse;
use crate::vars::Variables;

/// Default limit on nested partial inclusion.
pub const DEFAULT_MAX_PARTIAL_DEPTH: usize = 10;

/// Looks up partial templates by name.
pub trait PartialSource {
    /// Returns the source text of the partial called `name`.
    fn partial(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl PartialSource for HashMap<String, String> {
    fn partial(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|s| Cow::Borrowed(s.as_str()))
    }
}

impl PartialSource for BTreeMap<String, String> {
    fn partial(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|s| Cow::Borrowed(s.as_str()))
    }
}

impl<F> PartialSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn partial(&self, name: &str) -> Option<Cow<'_, str>> {
        self(name).map(Cow::Owned)
    }
}

/// Renders parsed templates, optionally resolving partials.
#[derive(Clone, Copy)]
pub struct Renderer<'a> {
    partials: Option<&'a dyn PartialSource>,
    max_partial_depth: usize,
}

impl Default for Renderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Renderer<'a> {
    /// Creates a renderer without a partial source. Partials render empty.
    pub fn new() -> Self {
        Self {
            partials: None,
            max_partial_depth: DEFAULT_MAX_PARTIAL_DEPTH,
        }
    }

    /// Creates a renderer that resolves partials through `source`.
    pub fn with_partials(source: &'a dyn PartialSource) -> Self {
        Self {
            partials: Some(source),
            max_partial_depth: DEFAULT_MAX_PARTIAL_DEPTH,
        }
    }

    /// Sets the maximum partial nesting depth.
    pub fn max_partial_depth(mut self, depth: usize) -> Self {
        self.max_partial_depth = depth;
        self
    }

    /// Renders `nodes` against `vars`.
    pub fn render(&self, nodes: &[Node], vars: &Variables) -> Result<String> {
        let mut out = String::new();
        self.render_into(&mut out, nodes, vars, 0)?;
        Ok(out)
    }

    /// Parses and renders `source` in one step.
    pub fn render_str(&self, source: &str, vars: &Variables) -> Result<String> {
        self.render(&parse(source)?, vars)
    }

    fn render_into(
        &self,
        out: &mut String,
        nodes: &[Node],
        vars: &Variables,
        depth: usize,
    ) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Variable(name) | Node::RawVariable(name) => {
                    out.push_str(&lookup_output(vars, name));
                }
                Node::Condition(condition) => {
                    if let Some(branch) = select_branch(condition, vars) {
                        self.render_into(out, branch, vars, depth)?;
                    }
                }
                Node::Loop(l) => self.render_loop(out, l, vars, depth)?,
                Node::Partial(partial) => self.render_partial(out, partial, vars, depth)?,
                Node::Comment(_) => {}
            }
        }
        Ok(())
    }

    fn render_loop(&self, out: &mut String, l: &Loop, vars: &Variables, depth: usize) -> Result<()> {
        let items = match vars.get(&l.collection) {
            None => return Ok(()),
            Some(value) => match value.as_list() {
                Some(items) => items,
                None => {
                    debug!(
                        collection = %l.collection,
                        found = value.type_name(),
                        "loop collection is not a list"
                    );
                    return Ok(());
                }
            },
        };

        for (index, item) in items.iter().enumerate() {
            let child = vars.child(item, index);
            self.render_into(out, &l.body, &child, depth)?;
        }
        Ok(())
    }

    fn render_partial(
        &self,
        out: &mut String,
        partial: &Partial,
        vars: &Variables,
        depth: usize,
    ) -> Result<()> {
        let Some(source) = self.partials else {
            return Ok(());
        };
        if depth >= self.max_partial_depth {
            warn!(
                partial = %partial.name,
                max_depth = self.max_partial_depth,
                "partial nesting too deep, rendering empty"
            );
            return Ok(());
        }
        let Some(text) = source.partial(&partial.name) else {
            warn!(partial = %partial.name, "partial not found");
            out.push_str("# Partial not found: ");
            out.push_str(&partial.name);
            return Ok(());
        };

        let nodes = parse(&text)?;
        if partial.params.is_empty() {
            return self.render_into(out, &nodes, vars, depth + 1);
        }
        let mut scoped = vars.clone();
        for (key, value) in &partial.params {
            scoped.set(key.as_str(), value.as_str());
        }
        self.render_into(out, &nodes, &scoped, depth + 1)
    }
}

/// Renders `nodes` against `vars` without a partial source.
pub fn render(nodes: &[Node], vars: &Variables) -> String {
    // Without partials nothing is parsed, so the render cannot fail.
    Renderer::new().render(nodes, vars).unwrap_or_default()
}

fn lookup_output(vars: &Variables, name: &str) -> String {
    if name.starts_with('@') && vars.loop_depth() == 0 {
        return String::new();
    }
    vars.get(name).map(|v| v.to_output()).unwrap_or_default()
}

fn select_branch<'n>(condition: &'n Condition, vars: &Variables) -> Option<&'n [Node]> {
    if vars.exists(&condition.expression) != condition.negated {
        Some(condition.then_branch.as_slice())
    } else {
        condition.else_branch.as_deref()
    }
}
