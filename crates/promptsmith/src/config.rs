//! Engine configuration.

use std::path::{Path, PathBuf};

use promptsmith_template::DEFAULT_MAX_PARTIAL_DEPTH;

use crate::catalog::{MASTER_TEMPLATE_FILE, SELECTION_MAP_FILE};

/// Sections that may be listed in the Selection Map without being defined.
pub const DEFAULT_OPTIONAL_SECTIONS: [&str; 3] =
    ["title_overlay", "reference_image", "bonus_character"];

/// Owned copy of [`DEFAULT_OPTIONAL_SECTIONS`].
pub fn default_optional_sections() -> Vec<String> {
    DEFAULT_OPTIONAL_SECTIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Where an [`Engine`](crate::Engine) loads its catalog from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
    /// The catalog compiled into this crate.
    #[default]
    Bundled,
    /// Two documents on disk.
    Files { master: PathBuf, selection: PathBuf },
    /// Two documents held in memory.
    Inline { master: String, selection: String },
}

impl CatalogSource {
    /// The standard document names inside `dir`.
    pub fn dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        CatalogSource::Files {
            master: dir.join(MASTER_TEMPLATE_FILE),
            selection: dir.join(SELECTION_MAP_FILE),
        }
    }

    pub fn inline(master: impl Into<String>, selection: impl Into<String>) -> Self {
        CatalogSource::Inline {
            master: master.into(),
            selection: selection.into(),
        }
    }
}

/// Configuration for an [`Engine`](crate::Engine).
///
/// ```
/// use promptsmith::{CatalogSource, EngineConfig};
///
/// let config = EngineConfig::new()
///     .source(CatalogSource::dir("templates"))
///     .prune_empty_fields(true);
///
/// assert!(config.prune_empty_fields);
/// assert_eq!(config.max_partial_depth, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub source: CatalogSource,
    /// Sections skipped silently when undefined.
    pub optional_sections: Vec<String>,
    /// Run [`prune_empty_fields`](crate::prune_empty_fields) over each document.
    pub prune_empty_fields: bool,
    pub max_partial_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::Bundled,
            optional_sections: default_optional_sections(),
            prune_empty_fields: false,
            max_partial_depth: DEFAULT_MAX_PARTIAL_DEPTH,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: CatalogSource) -> Self {
        self.source = source;
        self
    }

    /// Replaces the optional-section allow-list.
    pub fn optional_sections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional_sections = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn prune_empty_fields(mut self, prune: bool) -> Self {
        self.prune_empty_fields = prune;
        self
    }

    pub fn max_partial_depth(mut self, depth: usize) -> Self {
        self.max_partial_depth = depth;
        self
    }

    pub(crate) fn is_optional(&self, section: &str) -> bool {
        self.optional_sections.iter().any(|name| name == section)
    }
}
