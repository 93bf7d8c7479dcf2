//! Error types for catalog loading and document generation.

use std::path::PathBuf;

use promptsmith_template::ParseError;
use thiserror::Error;

/// Errors that can occur while loading a catalog or generating a document.
///
/// Missing catalog documents, unknown selection keys and malformed templates
/// are fatal. Sections missing from the catalog are not errors; the engine
/// logs and skips them.
#[derive(Debug, Error)]
pub enum Error {
    /// A catalog document does not exist.
    #[error("catalog document not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A catalog or template file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A catalog document is not valid YAML for its model.
    #[error("invalid {document}: {source}")]
    Yaml {
        document: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A section or template failed to parse. Aborts the whole document.
    #[error("failed to parse `{section}`: {source}")]
    Parse {
        section: String,
        #[source]
        source: ParseError,
    },

    /// No resolver or selection entry exists for the given key.
    #[error("unknown output type: {0}")]
    UnknownOutputType(String),

    /// The named section exists in neither the kind-specific nor the common table.
    #[error("unknown section: {0}")]
    UnknownSection(String),

    /// The template library has no template by that name.
    #[error("template not found: {0}")]
    TemplateNotFound(String),
}

/// Result type for promptsmith operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn parse(section: impl Into<String>, source: ParseError) -> Self {
        Error::Parse {
            section: section.into(),
            source,
        }
    }
}
