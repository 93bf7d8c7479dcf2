use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use promptsmith::{
    AppState, CatalogSource, Engine, EngineConfig, OutputKind, Record, TemplateLibrary, Value,
    Variables,
};
use tracing::debug;

use crate::cli::{Cli, Commands};

pub fn run(cli: Cli) -> Result<ExitCode> {
    let catalog = cli.catalog;
    match cli.command {
        Commands::Generate {
            kind,
            state,
            key,
            prune,
            output,
        } => generate(catalog, kind, state, key, prune, output),
        Commands::Sections { selection_key } => sections(catalog, &selection_key),
        Commands::Kinds => kinds(),
        Commands::Check => check(catalog),
        Commands::Render {
            name,
            vars,
            library,
        } => render(&name, vars, &library),
    }
}

fn engine(catalog: Option<PathBuf>, prune: bool) -> Engine {
    let source = match catalog {
        Some(dir) => {
            debug!(dir = %dir.display(), "using catalog directory");
            CatalogSource::dir(dir)
        }
        None => CatalogSource::Bundled,
    };
    Engine::new(EngineConfig::new().source(source).prune_empty_fields(prune))
}

fn generate(
    catalog: Option<PathBuf>,
    kind: OutputKind,
    state: Option<PathBuf>,
    key: Option<String>,
    prune: bool,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let state: AppState = match state {
        Some(path) => read_document(&path)?,
        None => AppState::default(),
    };

    let engine = engine(catalog, prune);
    let document = match key {
        Some(key) => engine.generate_for_key(kind, &key, &state),
        None => engine.generate(kind, &state),
    }
    .with_context(|| format!("failed to generate {kind}"))?;

    match output {
        Some(path) => fs::write(&path, format!("{document}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{document}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn sections(catalog: Option<PathBuf>, selection_key: &str) -> Result<ExitCode> {
    let names = engine(catalog, false).list_available_sections(selection_key)?;
    if names.is_empty() {
        bail!("unknown selection key: {selection_key}");
    }
    for (i, name) in names.iter().enumerate() {
        println!("{}. {name}", i + 1);
    }
    Ok(ExitCode::SUCCESS)
}

fn kinds() -> Result<ExitCode> {
    for kind in OutputKind::ALL {
        println!("{kind}: {}", kind.selection_keys().join(", "));
    }
    Ok(ExitCode::SUCCESS)
}

fn check(catalog: Option<PathBuf>) -> Result<ExitCode> {
    let engine = engine(catalog, false);
    let catalog = engine.catalog()?;
    let issues = catalog.validate(&engine.config().optional_sections);

    if issues.is_empty() {
        println!(
            "catalog OK: {} output types, {} selection keys",
            catalog.output_types().count(),
            catalog.selection_keys().count()
        );
        return Ok(ExitCode::SUCCESS);
    }
    for issue in &issues {
        println!("{issue}");
    }
    eprintln!("{} issue(s) found", issues.len());
    Ok(ExitCode::FAILURE)
}

fn render(name: &str, vars: Option<PathBuf>, dirs: &[PathBuf]) -> Result<ExitCode> {
    let mut library = TemplateLibrary::new();
    for dir in dirs {
        library.add_dir(dir)?;
    }

    let vars = match vars {
        Some(path) => {
            let json: serde_json::Value = read_document(&path)?;
            variables_from_json(json)
                .with_context(|| format!("{} must hold a mapping", path.display()))?
        }
        None => Variables::new(),
    };

    println!("{}", library.render(name, &vars)?);
    Ok(ExitCode::SUCCESS)
}

/// Reads JSON (`.json`) or YAML (anything else).
fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    if is_json {
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("invalid YAML in {}", path.display()))
    }
}

fn variables_from_json(json: serde_json::Value) -> Option<Variables> {
    match json {
        serde_json::Value::Object(map) => Some(
            map.into_iter()
                .filter_map(|(k, v)| value_from_json(v).map(|v| (k, v)))
                .collect(),
        ),
        serde_json::Value::Null => Some(Variables::new()),
        _ => None,
    }
}

/// Nulls are dropped; lists keep only their mapping items.
fn value_from_json(json: serde_json::Value) -> Option<Value> {
    use serde_json::Value as Json;

    match json {
        Json::Null => None,
        Json::Bool(b) => Some(Value::Bool(b)),
        Json::Number(n) => Some(match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::String(n.to_string()),
        }),
        Json::String(s) => Some(Value::String(s)),
        Json::Object(map) => Some(Value::Record(record_from_json(map))),
        Json::Array(items) => Some(Value::List(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Json::Object(map) => Some(record_from_json(map)),
                    _ => None,
                })
                .collect(),
        )),
    }
}

fn record_from_json(map: serde_json::Map<String, serde_json::Value>) -> Record {
    map.into_iter()
        .filter_map(|(k, v)| value_from_json(v).map(|v| (k, v)))
        .collect()
}
