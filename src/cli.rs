//! Minimal CLI: normalize schema documents, validate JSON against them, print the sample catalog
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use codec_schema::{JsonSchema, catalog, derive_schema, wire};

use crate::logging::{LogFormat, LogLevel};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// derive, read, write and check JSON Schema documents
#[derive(Parser, Debug)]
#[command(name = "codec-schema", version)]
pub struct CommandLineInterface {
    /// log output format (stderr)
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true, env = "CODEC_SCHEMA_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// minimum log level (stderr)
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true, env = "CODEC_SCHEMA_LOG_LEVEL")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// parse a schema document and print its canonical form
    Normalize(NormalizeOut),
    /// validate JSON documents against a schema document
    Validate(ValidateIn),
    /// print the schemas of the built-in sample codecs
    Catalog(CatalogOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct NormalizeOut {
    /// schema document to read
    #[arg(short, long)]
    schema: PathBuf,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ValidateIn {
    /// schema document to validate against
    #[arg(short, long)]
    schema: PathBuf,

    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(clap::Parser, Debug)]
struct CatalogOut {
    /// only print the sample with this name
    #[arg(long)]
    name: Option<String>,
}

/// One JSON document pulled from the inputs, labelled for reporting.
struct Document {
    label: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let label = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({label})"))?;
            if self.ndjson {
                for (ix, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let label = format!("{label}:{}", ix + 1);
                    let value = parse_json(line, &label)?;
                    out.push(self.select(label, value)?);
                }
            } else {
                let value = parse_json(&source, &label)?;
                out.push(self.select(label, value)?);
            }
        }
        tracing::debug!(documents = out.len(), "loaded inputs");
        Ok(out)
    }

    fn select(&self, label: String, value: Value) -> Result<Document> {
        let Some(pointer) = self.json_pointer.as_deref() else {
            return Ok(Document { label, value });
        };
        let value = value
            .pointer(pointer)
            .cloned()
            .ok_or_else(|| anyhow!("JSON pointer {pointer} selects nothing in {label}"))?;
        Ok(Document { label, value })
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Run the selected command, returning the process exit code.
    pub fn run(&self) -> Result<i32> {
        match &self.cmd {
            Command::Normalize(target) => {
                let schema = read_schema(&target.schema)?;
                for violation in schema.well_formedness_violations() {
                    tracing::warn!(%violation, "schema is not well formed");
                }
                let schema_src = serde_json::to_string_pretty(&schema)?;
                write_output(target.out.as_deref(), &schema_src)?;
                Ok(0)
            }
            Command::Validate(target) => {
                let schema = read_schema(&target.schema)?;
                let documents = target.input_settings.load()?;
                let outcomes: Vec<_> = documents
                    .par_iter()
                    .map(|doc| (doc, codec_schema::check(&doc.value, &schema)))
                    .collect();
                let mut failures = 0usize;
                for (doc, outcome) in &outcomes {
                    match outcome {
                        Ok(()) => println!("{} {}", "ok".green(), doc.label),
                        Err(mismatch) => {
                            failures += 1;
                            println!("{} {}: {mismatch}", "FAIL".red().bold(), doc.label);
                        }
                    }
                }
                tracing::info!(documents = outcomes.len(), failures, "validation finished");
                Ok(if failures == 0 { 0 } else { 1 })
            }
            Command::Catalog(target) => {
                let mut printed = 0usize;
                for sample in catalog::catalog() {
                    if target.name.as_deref().is_some_and(|name| name != sample.name) {
                        continue;
                    }
                    let schema = derive_schema(&sample.codec)
                        .with_context(|| format!("failed to derive schema for `{}`", sample.name))?;
                    println!("{}", format!("// {}", sample.name).as_str().dimmed());
                    println!("{}", serde_json::to_string_pretty(&schema)?);
                    printed += 1;
                }
                if printed == 0 {
                    bail!("no sample named {}", target.name.as_deref().unwrap_or_default());
                }
                Ok(0)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_schema(path: &Path) -> Result<JsonSchema> {
    let label = path.to_string_lossy();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file ({label})"))?;
    let schema = wire::from_str(&source)
        .with_context(|| format!("failed to parse schema file ({label})"))?;
    tracing::debug!(path = %label, "loaded schema");
    Ok(schema)
}

fn parse_json(source: &str, label: &str) -> Result<Value> {
    serde_json::from_str::<Value>(source)
        .with_context(|| format!("failed to parse JSON source ({label})"))
}

fn write_output(out: Option<&Path>, contents: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, contents)?;
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
