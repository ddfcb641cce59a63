// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! critql: compile search criteria into structured queries.
//!
//! Subcommands:
//! - `compile`: compile a JSON criteria document against a JSON schema
//!   definition and print the search envelope
//! - `terms`: show the word terms a piece of text tokenizes to
//! - `search`: run criteria against a JSON array of documents in memory

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};

use critql_criteria::{
    CompilerConfig, CriteriaCompiler, CriteriaSchema, DynamicCriteria, EntityMetadata,
    EntityRegistry, SchemaDefinition, TermTokenizer,
};
use critql_executor::{
    CriteriaExecutor, Document, InMemorySearchBackend, Order, Pageable, Sort,
};
use critql_query::DocumentFormat;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "critql", version = VERSION, about = "Compile search criteria into structured queries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a criteria document and print the search envelope.
    Compile {
        #[command(flatten)]
        input: CriteriaInput,

        /// Print the envelope on a single line.
        #[arg(long)]
        compact: bool,
    },

    /// Print the word terms a text tokenizes to.
    Terms {
        #[arg(required = true)]
        text: Vec<String>,

        #[arg(long, default_value_t = '*')]
        wildcard: char,
    },

    /// Run criteria against a JSON array of documents held in memory.
    Search {
        #[command(flatten)]
        input: CriteriaInput,

        /// JSON file holding an array of documents.
        #[arg(long)]
        documents: PathBuf,

        /// Zero-based page number.
        #[arg(long, default_value_t = 0)]
        page: usize,

        #[arg(long, default_value_t = 10)]
        size: usize,

        /// Sort key; prefix with '-' for descending. Repeatable.
        #[arg(long = "sort", allow_hyphen_values = true)]
        sort: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
struct CriteriaInput {
    /// JSON schema definition of the criteria type.
    #[arg(long)]
    schema: PathBuf,

    /// JSON criteria document.
    #[arg(long)]
    criteria: PathBuf,

    /// Document format of the entity (json or xml).
    #[arg(long)]
    format: Option<DocumentFormat>,

    /// JSON compiler configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

impl CriteriaInput {
    fn schema(&self) -> Result<Arc<CriteriaSchema>> {
        let definition: SchemaDefinition = serde_json::from_value(read_json(&self.schema)?)
            .with_context(|| format!("invalid schema definition in {}", self.schema.display()))?;
        let schema = CriteriaSchema::from_definition(definition)?;
        debug!(entity = schema.entity(), fields = schema.len(), "Loaded criteria schema");
        Ok(Arc::new(schema))
    }

    fn load(&self) -> Result<(CriteriaCompiler, DynamicCriteria)> {
        let schema = self.schema()?;
        let criteria = DynamicCriteria::from_json(Arc::clone(&schema), &read_json(&self.criteria)?)?;

        let config = match &self.config {
            Some(path) => serde_json::from_value::<CompilerConfig>(read_json(path)?)
                .with_context(|| format!("invalid compiler config in {}", path.display()))?,
            None => CompilerConfig::default(),
        };

        let mut registry = EntityRegistry::new();
        if let Some(format) = self.format {
            registry.register(schema.entity(), EntityMetadata::new(format));
        }

        let compiler = CriteriaCompiler::new(Arc::new(registry)).with_config(config);
        Ok((compiler, criteria))
    }
}

fn parse_sort(keys: &[String]) -> Sort {
    keys.iter().fold(Sort::unsorted(), |sort, key| match key.strip_prefix('-') {
        Some(property) => sort.and(Order::desc(property)),
        None => sort.and(Order::asc(key.trim_start_matches('+'))),
    })
}

fn compile(input: &CriteriaInput, compact: bool) -> Result<String> {
    let (compiler, criteria) = input.load()?;
    let query = compiler.compile(&criteria);
    Ok(query.to_search_string(!compact)?)
}

fn terms(text: &[String], wildcard: char) -> String {
    TermTokenizer::new(wildcard).terms(&text.join(" ")).join("\n")
}

async fn search(
    input: &CriteriaInput,
    documents: &Path,
    pageable: &Pageable,
) -> Result<String> {
    let (compiler, criteria) = input.load()?;
    let backend = InMemorySearchBackend::new().with_wildcard(compiler.config().wildcard);

    let items = match read_json(documents)? {
        Value::Array(items) => items,
        _ => anyhow::bail!("{} must hold a JSON array of documents", documents.display()),
    };
    for item in items {
        match serde_json::from_value::<Document>(item.clone()) {
            Ok(document) => backend.insert(document).await,
            Err(_) => {
                backend.insert_new(Vec::<String>::new(), item).await;
            }
        }
    }
    info!(documents = backend.len().await, "Loaded documents");

    let executor = CriteriaExecutor::new(compiler, Arc::new(backend));
    let page = executor.find_page(&criteria, pageable).await?;
    let summary = serde_json::json!({
        "total": page.total,
        "page": page.number(),
        "pages": page.total_pages(),
        "results": page.content,
    });
    Ok(serde_json::to_string_pretty(&summary)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Command::Compile { input, compact } => compile(&input, compact)?,
        Command::Terms { text, wildcard } => terms(&text, wildcard),
        Command::Search {
            input,
            documents,
            page,
            size,
            sort,
        } => {
            let pageable = Pageable::of(page, size).with_sort(parse_sort(&sort));
            search(&input, &documents, &pageable).await?
        }
    };

    println!("{output}");
    Ok(())
}
