//! The section catalog: Master Template and Selection Map.
//!
//! Two YAML documents drive document assembly:
//!
//! - **`MasterTemplate.yaml`** holds the named template fragments. Each
//!   output type has its own `sections` table plus static header values;
//!   `common_sections` is the fallback table shared by all types.
//! - **`SelectionMap.yaml`** maps a selection key (an output type plus any
//!   sub-mode, like `pose_reference`) to the ordered list of section names
//!   to render. It can also carry `variable_mappings`: static lookup tables
//!   that turn a raw setting value into descriptive text.
//!
//! ```yaml
//! # MasterTemplate.yaml
//! version: "1.0"
//! common_sections:
//!   header:
//!     template: "title: \"{{title}}\""
//! output_types:
//!   face_sheet:
//!     header_values:
//!       header_comment: Face Sheet
//!     type_value: character_design
//!     sections:
//!       character:
//!         description: Character block
//!         template: "name: \"{{character_name}}\""
//! ```
//!
//! ```yaml
//! # SelectionMap.yaml
//! version: "1.0"
//! selection_map:
//!   face_sheet:
//!     output_type_key: face_sheet
//!     sections: [header, character]
//! ```
//!
//! The catalog is read-only once loaded.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use promptsmith_template::{Record, Value, Variables};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CatalogSource;
use crate::error::{Error, Result};

/// File name of the Master Template document.
pub const MASTER_TEMPLATE_FILE: &str = "MasterTemplate.yaml";
/// File name of the Selection Map document.
pub const SELECTION_MAP_FILE: &str = "SelectionMap.yaml";

const BUNDLED_MASTER: &str = include_str!("../templates/MasterTemplate.yaml");
const BUNDLED_SELECTION: &str = include_str!("../templates/SelectionMap.yaml");

// ============================================================================
// Master Template
// ============================================================================

/// The Master Template document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterTemplate {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub common_sections: BTreeMap<String, SectionDefinition>,
    #[serde(default)]
    pub output_types: BTreeMap<String, OutputTypeDefinition>,
}

/// A named template fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub template: String,
}

/// Static values and sections for one output type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputTypeDefinition {
    #[serde(default)]
    pub header_values: BTreeMap<String, serde_yaml::Value>,
    /// Bound as `type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_value: Option<String>,
    /// Bound as the record `output`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_values: Option<BTreeMap<String, serde_yaml::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_generation_instructions: Option<bool>,
    #[serde(default)]
    pub sections: BTreeMap<String, SectionDefinition>,
}

/// Converts a value written in a catalog document into a template value.
///
/// Integers stay integers; other numbers keep their YAML spelling (`1.0`
/// stays `1.0`). A key with no value binds the empty string.
fn catalog_value(yaml: &serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Value::String(String::new()),
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::String(n.to_string()),
        },
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Mapping(map) => Value::Record(catalog_record(map)),
        Yaml::Sequence(items) => Value::List(
            items
                .iter()
                .filter_map(|item| item.as_mapping().map(catalog_record))
                .collect(),
        ),
        Yaml::Tagged(tagged) => catalog_value(&tagged.value),
    }
}

/// Mapping entries with non-string keys are skipped.
fn catalog_record(map: &serde_yaml::Mapping) -> Record {
    map.iter()
        .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), catalog_value(v))))
        .collect()
}

// ============================================================================
// Selection Map
// ============================================================================

/// The Selection Map document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionMap {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub selection_map: BTreeMap<String, SelectionEntry>,
    #[serde(default)]
    pub variable_mappings: BTreeMap<String, BTreeMap<String, String>>,
}

/// The ordered section list for one selection key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionEntry {
    /// Output type whose sections and header values apply. Defaults to the
    /// selection key itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_type: Option<String>,
    /// Overrides the output type's flag of the same name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_generation_instructions: Option<bool>,
    #[serde(default)]
    pub sections: Vec<String>,
}

// ============================================================================
// Catalog
// ============================================================================

/// A loaded Master Template and Selection Map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub master: MasterTemplate,
    pub selection: SelectionMap,
}

impl Catalog {
    /// Parses a catalog from the text of its two documents.
    pub fn from_yaml(master: &str, selection: &str) -> Result<Self> {
        let master = serde_yaml::from_str(master).map_err(|source| Error::Yaml {
            document: MASTER_TEMPLATE_FILE.to_string(),
            source,
        })?;
        let selection = serde_yaml::from_str(selection).map_err(|source| Error::Yaml {
            document: SELECTION_MAP_FILE.to_string(),
            source,
        })?;
        Ok(Self { master, selection })
    }

    /// The catalog compiled into this crate.
    pub fn bundled() -> Result<Self> {
        Self::from_yaml(BUNDLED_MASTER, BUNDLED_SELECTION)
    }

    /// Loads a catalog from the given source.
    pub fn load(source: &CatalogSource) -> Result<Self> {
        let catalog = match source {
            CatalogSource::Bundled => Self::bundled()?,
            CatalogSource::Files { master, selection } => {
                let master = read_document(master)?;
                let selection = read_document(selection)?;
                Self::from_yaml(&master, &selection)?
            }
            CatalogSource::Inline { master, selection } => Self::from_yaml(master, selection)?,
        };
        debug!(
            output_types = catalog.master.output_types.len(),
            selection_keys = catalog.selection.selection_map.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Returns the ordered section names for a selection key.
    pub fn sections_for(&self, selection_key: &str) -> Option<&[String]> {
        self.selection
            .selection_map
            .get(selection_key)
            .map(|entry| entry.sections.as_slice())
    }

    /// Looks a section up for an output type, falling back to the common table.
    pub fn section(&self, output_type: &str, name: &str) -> Option<&SectionDefinition> {
        self.master
            .output_types
            .get(output_type)
            .and_then(|def| def.sections.get(name))
            .or_else(|| self.master.common_sections.get(name))
    }

    /// Returns the definition of an output type.
    pub fn output_type(&self, key: &str) -> Option<&OutputTypeDefinition> {
        self.master.output_types.get(key)
    }

    /// Returns the output type a selection key renders, if the key exists.
    pub fn output_type_for(&self, selection_key: &str) -> Option<&str> {
        let (key, entry) = self.selection.selection_map.get_key_value(selection_key)?;
        Some(entry.output_type_key.as_deref().unwrap_or(key))
    }

    /// Static values contributed by the catalog for one output type.
    ///
    /// Binds every header value, `type` from `type_value`, the record
    /// `output` from `output_values`, and `has_generation_instructions`
    /// (the selection entry's flag wins over the output type's).
    pub fn static_values(&self, output_type: &str, selection_key: &str) -> Variables {
        let mut vars = Variables::new();

        if let Some(def) = self.output_type(output_type) {
            for (name, value) in &def.header_values {
                vars.set(name.as_str(), catalog_value(value));
            }
            if let Some(type_value) = &def.type_value {
                vars.set("type", type_value.as_str());
            }
            if let Some(output) = &def.output_values {
                let record: Record = output
                    .iter()
                    .map(|(k, v)| (k.clone(), catalog_value(v)))
                    .collect();
                vars.set("output", record);
            }
            if let Some(flag) = def.has_generation_instructions {
                vars.set("has_generation_instructions", flag);
            }
        }

        if let Some(flag) = self
            .selection
            .selection_map
            .get(selection_key)
            .and_then(|entry| entry.has_generation_instructions)
        {
            vars.set("has_generation_instructions", flag);
        }
        vars
    }

    /// Binds `<table>_label` for each variable-mapping table whose key
    /// variable holds a mapped string. Existing bindings are kept.
    pub fn apply_variable_mappings(&self, vars: &mut Variables) {
        for (table, mapping) in &self.selection.variable_mappings {
            let label_name = format!("{table}_label");
            if vars.contains(&label_name) {
                continue;
            }
            let Some(raw) = vars.get_str(table) else {
                continue;
            };
            if let Some(label) = mapping.get(raw) {
                let label = label.clone();
                vars.set(label_name, label);
            }
        }
    }

    /// Selection keys in sorted order.
    pub fn selection_keys(&self) -> impl Iterator<Item = &str> {
        self.selection.selection_map.keys().map(String::as_str)
    }

    /// Output type keys in sorted order.
    pub fn output_types(&self) -> impl Iterator<Item = &str> {
        self.master.output_types.keys().map(String::as_str)
    }

    /// Checks the Selection Map against the Master Template.
    ///
    /// Sections named in `optional` may be missing without an issue.
    pub fn validate(&self, optional: &[String]) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for (key, entry) in &self.selection.selection_map {
            let output_type = entry.output_type_key.as_deref().unwrap_or(key);
            if self.output_type(output_type).is_none() {
                issues.push(CatalogIssue::UnknownOutputType {
                    selection_key: key.clone(),
                    output_type: output_type.to_string(),
                });
            }
            if entry.sections.is_empty() {
                issues.push(CatalogIssue::EmptySelection {
                    selection_key: key.clone(),
                });
            }
            for name in &entry.sections {
                if self.section(output_type, name).is_none() && !optional.contains(name) {
                    issues.push(CatalogIssue::MissingSection {
                        selection_key: key.clone(),
                        section: name.clone(),
                    });
                }
            }
        }
        issues
    }
}

fn read_document(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A problem found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// A selection entry names a section that exists nowhere.
    MissingSection {
        selection_key: String,
        section: String,
    },
    /// A selection entry points at an output type the Master Template lacks.
    UnknownOutputType {
        selection_key: String,
        output_type: String,
    },
    /// A selection entry lists no sections.
    EmptySelection { selection_key: String },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::MissingSection {
                selection_key,
                section,
            } => write!(f, "{selection_key}: section `{section}` is not defined"),
            CatalogIssue::UnknownOutputType {
                selection_key,
                output_type,
            } => write!(f, "{selection_key}: unknown output type `{output_type}`"),
            CatalogIssue::EmptySelection { selection_key } => {
                write!(f, "{selection_key}: no sections listed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = r##"
version: "1.0"
common_sections:
  header:
    template: "title: {{title}}"
  footer:
    description: Closing line
    template: "# end"
output_types:
  demo:
    header_values:
      header_comment: Demo Sheet
      revision: 2
      draft: true
    type_value: character_design
    output_values:
      format: reference sheet
      background: white
    has_generation_instructions: false
    sections:
      header:
        template: "demo title: {{title}}"
      body:
        template: "note: {{note}}"
"##;

    const SELECTION: &str = r#"
version: "1.0"
selection_map:
  demo_full:
    output_type_key: demo
    has_generation_instructions: true
    sections: [header, body, footer]
  demo:
    sections: [body]
  ghost:
    output_type_key: nowhere
    sections: [header, title_overlay, missing]
variable_mappings:
  wind:
    strong: "hair and clothes flowing"
"#;

    fn catalog() -> Catalog {
        Catalog::from_yaml(MASTER, SELECTION).unwrap()
    }

    #[test]
    fn parses_both_documents() {
        let catalog = catalog();
        assert_eq!(catalog.master.version, "1.0");
        assert_eq!(
            catalog.sections_for("demo_full").unwrap(),
            ["header", "body", "footer"]
        );
        assert!(catalog.sections_for("nope").is_none());
    }

    #[test]
    fn kind_specific_section_shadows_common() {
        let catalog = catalog();
        assert_eq!(
            catalog.section("demo", "header").unwrap().template,
            "demo title: {{title}}"
        );
        assert_eq!(catalog.section("demo", "footer").unwrap().template, "# end");
        assert_eq!(
            catalog.section("other", "header").unwrap().template,
            "title: {{title}}"
        );
        assert!(catalog.section("demo", "missing").is_none());
    }

    #[test]
    fn output_type_defaults_to_selection_key() {
        let catalog = catalog();
        assert_eq!(catalog.output_type_for("demo_full"), Some("demo"));
        assert_eq!(catalog.output_type_for("demo"), Some("demo"));
        assert_eq!(catalog.output_type_for("nope"), None);
    }

    #[test]
    fn output_type_outlives_the_lookup_key() {
        let catalog = catalog();
        let found = {
            let key = String::from("demo");
            catalog.output_type_for(&key)
        };
        assert_eq!(found, Some("demo"));
    }

    #[test]
    fn static_values_bind_headers_type_and_output() {
        let vars = catalog().static_values("demo", "demo");
        assert_eq!(vars.get_str("header_comment"), Some("Demo Sheet"));
        assert_eq!(vars.get("revision"), Some(&Value::Int(2)));
        assert_eq!(vars.get_bool("draft"), Some(true));
        assert_eq!(vars.get_str("type"), Some("character_design"));
        assert_eq!(vars.get_str("output.format"), Some("reference sheet"));
        assert_eq!(vars.get_bool("has_generation_instructions"), Some(false));
    }

    #[test]
    fn header_values_keep_their_spelling() {
        let master = r#"
output_types:
  demo:
    header_values:
      version: 1.0
      scale: 0.75
      note:
    output_values:
      ratio: 1.0
      extra:
    sections:
      body:
        template: "v: {{version}}"
"#;
        let selection = "selection_map:\n  demo:\n    sections: [body]\n";
        let catalog = Catalog::from_yaml(master, selection).unwrap();
        let vars = catalog.static_values("demo", "demo");

        assert_eq!(vars.get_str("version"), Some("1.0"));
        assert_eq!(vars.get_str("scale"), Some("0.75"));
        assert_eq!(vars.get_str("note"), Some(""));
        assert_eq!(vars.get_str("output.ratio"), Some("1.0"));
        assert_eq!(vars.get_str("output.extra"), Some(""));
    }

    #[test]
    fn selection_flag_overrides_output_type_flag() {
        let vars = catalog().static_values("demo", "demo_full");
        assert_eq!(vars.get_bool("has_generation_instructions"), Some(true));
    }

    #[test]
    fn variable_mappings_bind_labels() {
        let catalog = catalog();

        let mut vars = Variables::new().with("wind", "strong");
        catalog.apply_variable_mappings(&mut vars);
        assert_eq!(vars.get_str("wind_label"), Some("hair and clothes flowing"));

        let mut unmapped = Variables::new().with("wind", "calm");
        catalog.apply_variable_mappings(&mut unmapped);
        assert!(!unmapped.contains("wind_label"));

        let mut preset = Variables::new()
            .with("wind", "strong")
            .with("wind_label", "mine");
        catalog.apply_variable_mappings(&mut preset);
        assert_eq!(preset.get_str("wind_label"), Some("mine"));
    }

    #[test]
    fn validate_reports_unknown_types_and_sections() {
        let optional = vec!["title_overlay".to_string()];
        let issues = catalog().validate(&optional);
        assert_eq!(
            issues,
            vec![
                CatalogIssue::UnknownOutputType {
                    selection_key: "ghost".into(),
                    output_type: "nowhere".into(),
                },
                CatalogIssue::MissingSection {
                    selection_key: "ghost".into(),
                    section: "missing".into(),
                },
            ]
        );
        assert_eq!(
            issues[1].to_string(),
            "ghost: section `missing` is not defined"
        );
    }

    #[test]
    fn bad_yaml_names_the_document() {
        let err = Catalog::from_yaml(MASTER, "selection_map: [").unwrap_err();
        assert!(matches!(err, Error::Yaml { ref document, .. } if document == SELECTION_MAP_FILE));
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let source = CatalogSource::dir("/definitely/not/here");
        let err = Catalog::load(&source).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(p) if p.ends_with(MASTER_TEMPLATE_FILE)));
    }

    #[test]
    fn bundled_catalog_is_consistent() {
        let catalog = Catalog::bundled().unwrap();
        let optional = crate::config::default_optional_sections();
        assert_eq!(catalog.validate(&optional), Vec::new());
    }
}
