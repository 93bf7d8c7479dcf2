//! Standalone template files.
//!
//! A [`TemplateLibrary`] renders whole documents from individual template
//! files rather than catalog sections. Templates are resolved by name:
//!
//! 1. Inline templates (added with [`TemplateLibrary::add_inline`]) win.
//! 2. Directories are searched in registration order; the first one holding
//!    the name wins.
//! 3. Names may be given with or without extension: `"face_sheet"` and
//!    `"face_sheet.yaml"` both resolve.
//!
//! | Priority | Extension |
//! |----------|-----------|
//! | 1 | `.yaml` |
//! | 2 | `.yml` |
//!
//! Files in subdirectories resolve as `dir/name`. Files are read on every
//! lookup, so edits show up without rebuilding the library.
//!
//! `{{> name}}` inside a library template resolves against the same library.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use promptsmith_template::{parse, PartialSource, Renderer, Variables, DEFAULT_MAX_PARTIAL_DEPTH};
use tracing::{debug, warn};

use crate::cleanup::prune_empty_fields;
use crate::error::{Error, Result};

/// Recognized template file extensions in priority order.
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".yaml", ".yml"];

/// Named templates from inline strings and directories.
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    inline: BTreeMap<String, String>,
    dirs: Vec<PathBuf>,
    prune: bool,
    max_partial_depth: usize,
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self {
            inline: BTreeMap::new(),
            dirs: Vec::new(),
            prune: true,
            max_partial_depth: DEFAULT_MAX_PARTIAL_DEPTH,
        }
    }
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template held in memory.
    pub fn add_inline(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.inline.insert(name.into(), content.into());
    }

    /// Registers a directory of template files.
    pub fn add_dir(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::FileNotFound(dir.to_path_buf()));
        }
        debug!(dir = %dir.display(), "template directory added");
        self.dirs.push(dir.to_path_buf());
        Ok(())
    }

    /// Whether [`render`](Self::render) prunes empty fields. On by default.
    pub fn prune_empty_fields(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    pub fn max_partial_depth(mut self, depth: usize) -> Self {
        self.max_partial_depth = depth;
        self
    }

    /// Returns the source text of a template.
    pub fn get_content(&self, name: &str) -> Result<String> {
        let base = strip_extension(name);
        if let Some(content) = self.inline.get(name).or_else(|| self.inline.get(base)) {
            return Ok(content.clone());
        }

        let path = self
            .find_file(name)
            .ok_or_else(|| Error::TemplateNotFound(name.to_string()))?;
        fs::read_to_string(&path).map_err(|source| Error::Io { path, source })
    }

    /// All resolvable names, without extensions, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = self
            .inline
            .keys()
            .map(|name| strip_extension(name).to_string())
            .collect();
        for dir in &self.dirs {
            collect_names(dir, "", &mut names);
        }
        names.into_iter().collect()
    }

    /// Renders a template, resolving partials against this library.
    pub fn render(&self, name: &str, vars: &Variables) -> Result<String> {
        let content = self.get_content(name)?;
        let nodes = parse(&content).map_err(|e| Error::parse(name, e))?;
        let rendered = Renderer::with_partials(self)
            .max_partial_depth(self.max_partial_depth)
            .render(&nodes, vars)
            .map_err(|e| Error::parse(name, e))?;

        if self.prune {
            Ok(prune_empty_fields(&rendered))
        } else {
            Ok(rendered)
        }
    }

    fn find_file(&self, name: &str) -> Option<PathBuf> {
        let candidates: Vec<String> = if strip_extension(name) != name {
            vec![name.to_string()]
        } else {
            TEMPLATE_EXTENSIONS
                .iter()
                .map(|ext| format!("{name}{ext}"))
                .collect()
        };

        self.dirs.iter().find_map(|dir| {
            candidates
                .iter()
                .map(|candidate| dir.join(candidate))
                .find(|path| path.is_file())
        })
    }
}

impl PartialSource for TemplateLibrary {
    fn partial(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.get_content(name) {
            Ok(content) => Some(Cow::Owned(content)),
            Err(Error::TemplateNotFound(_)) => None,
            Err(err) => {
                warn!(partial = name, error = %err, "partial could not be read");
                None
            }
        }
    }
}

fn strip_extension(name: &str) -> &str {
    TEMPLATE_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name)
}

fn collect_names(dir: &Path, prefix: &str, names: &mut BTreeSet<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if path.is_dir() {
            collect_names(&path, &format!("{prefix}{file_name}/"), names);
            continue;
        }
        let base = strip_extension(&file_name);
        if base != file_name {
            names.insert(format!("{prefix}{base}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_extensions_only() {
        assert_eq!(strip_extension("face.yaml"), "face");
        assert_eq!(strip_extension("face.yml"), "face");
        assert_eq!(strip_extension("face.txt"), "face.txt");
        assert_eq!(strip_extension("face"), "face");
    }

    #[test]
    fn inline_templates_resolve_with_or_without_extension() {
        let mut library = TemplateLibrary::new();
        library.add_inline("greeting", "hello {{name}}");
        assert_eq!(library.get_content("greeting").unwrap(), "hello {{name}}");
        assert_eq!(library.get_content("greeting.yaml").unwrap(), "hello {{name}}");
        assert!(matches!(
            library.get_content("other"),
            Err(Error::TemplateNotFound(n)) if n == "other"
        ));
    }

    #[test]
    fn render_resolves_partials_and_prunes() {
        let mut library = TemplateLibrary::new();
        library.add_inline("doc", "title: \"{{title}}\"\n{{> extra}}");
        library.add_inline("extra", "extra:\n  note: \"{{note}}\"");
        let vars = Variables::new().with("title", "Demo");

        assert_eq!(library.render("doc", &vars).unwrap(), "title: \"Demo\"");

        let raw = library.clone().prune_empty_fields(false);
        assert_eq!(
            raw.render("doc", &vars).unwrap(),
            "title: \"Demo\"\nextra:\n  note: \"\""
        );
    }

    #[test]
    fn parse_errors_name_the_template() {
        let mut library = TemplateLibrary::new();
        library.add_inline("broken", "{{#if x}}open");
        assert!(matches!(
            library.render("broken", &Variables::new()),
            Err(Error::Parse { section, .. }) if section == "broken"
        ));
    }

    #[test]
    fn missing_dir_is_file_not_found() {
        let mut library = TemplateLibrary::new();
        assert!(matches!(
            library.add_dir("/definitely/not/here"),
            Err(Error::FileNotFound(_))
        ));
    }
}
