use std::path::PathBuf;

use clap::{Parser, Subcommand};
use promptsmith::OutputKind;

/// Assemble YAML prompt documents from a section catalog.
#[derive(Debug, Parser)]
#[command(name = "promptsmith", version, about)]
pub struct Cli {
    /// Catalog directory holding MasterTemplate.yaml and SelectionMap.yaml.
    /// Uses the bundled catalog when unset.
    #[arg(long, global = true, env = "PROMPTSMITH_CATALOG", value_name = "DIR")]
    pub catalog: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate the document for an output kind.
    Generate {
        /// Output kind, e.g. face_sheet or four-panel.
        kind: OutputKind,

        /// Application state as JSON (.json) or YAML.
        #[arg(long, value_name = "FILE")]
        state: Option<PathBuf>,

        /// Selection key to use instead of the one derived from the state.
        #[arg(long)]
        key: Option<String>,

        /// Drop empty fields from the document.
        #[arg(long)]
        prune: bool,

        /// Write the document to FILE instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the sections of a selection key in render order.
    Sections {
        selection_key: String,
    },

    /// List output kinds and their selection keys.
    Kinds,

    /// Validate the catalog. Exits non-zero when issues are found.
    Check,

    /// Render a standalone template from a template library.
    Render {
        /// Template name, with or without extension.
        name: String,

        /// Variables as JSON (.json) or YAML.
        #[arg(long, value_name = "FILE")]
        vars: Option<PathBuf>,

        /// Template directory; repeat to search several, first wins.
        #[arg(long, value_name = "DIR", required = true)]
        library: Vec<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "promptsmith",
            "generate",
            "four-panel",
            "--state",
            "state.json",
            "--prune",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate {
                kind, state, prune, key, ..
            } => {
                assert_eq!(kind, OutputKind::FourPanel);
                assert_eq!(state, Some(PathBuf::from("state.json")));
                assert!(prune);
                assert!(key.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["promptsmith", "generate", "comic"]).is_err());
    }

    #[test]
    fn render_requires_a_library() {
        assert!(Cli::try_parse_from(["promptsmith", "render", "sheet"]).is_err());
    }
}
