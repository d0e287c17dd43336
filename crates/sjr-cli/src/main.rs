//! `sjr` CLI — format, check, query and convert SJR documents.
//!
//! ## Usage
//!
//! ```sh
//! # Re-render a document in canonical layout (stdin → stdout)
//! echo '{"b": 2, "a": 1}' | sjr fmt
//!
//! # Format from file to file
//! sjr fmt -i settings.sjr -o settings.sjr
//!
//! # Validate, reporting line:column of the first error
//! sjr check -i settings.sjr
//!
//! # Print the subtree at a path
//! sjr get servers/0/host -i settings.sjr
//!
//! # Convert to and from JSON
//! sjr to-json -i settings.sjr
//! sjr from-json -i settings.json
//!
//! # Count nodes per kind
//! sjr stats -i settings.sjr
//! ```
//!
//! Logging goes to stderr; set `SJR_LOG` (e.g. `SJR_LOG=debug`) or pass
//! `--verbose`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sjr_core::{line_col, parse_bytes, render, Kind, Node, ParseOptions, SjrError};
use std::collections::BTreeMap;
use std::io::{self, Read};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sjr", version, about = "SJR document CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    parse_args: ParseArgs,

    /// Log parsing and I/O details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct ParseArgs {
    /// Maximum nesting depth accepted by the parser
    #[arg(long, global = true, default_value_t = sjr_core::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Keep whitespace inside quoted strings and keys instead of dropping it
    #[arg(long, global = true)]
    keep_whitespace: bool,
}

impl ParseArgs {
    fn options(&self) -> ParseOptions {
        ParseOptions::new()
            .with_max_depth(self.max_depth)
            .with_string_whitespace(self.keep_whitespace)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and print it in canonical layout
    Fmt {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate a document; exits non-zero with the error position on failure
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the subtree at a `/`-separated path (numeric segments index arrays)
    Get {
        /// Path such as `servers/0/host`
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Convert an SJR document to pretty-printed JSON
    ToJson {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Convert a JSON document to SJR
    FromJson {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show node counts per kind and maximum nesting depth
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let options = cli.parse_args.options();

    match cli.command {
        Commands::Fmt { input, output } => {
            let doc = read_document(input.as_deref(), &options)?;
            let text = render(&doc).context("Failed to render document")?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Check { input } => {
            let bytes = read_input(input.as_deref())?;
            match parse_bytes(&bytes, &options) {
                Ok(doc) => println!("ok: {} document", doc.kind()),
                Err(err) => {
                    let name = input.as_deref().unwrap_or("<stdin>");
                    eprintln!("{}", describe_error(name, &bytes, &err));
                    process::exit(1);
                }
            }
        }
        Commands::Get { path, input } => {
            let doc = read_document(input.as_deref(), &options)?;
            let node = doc
                .pointer(&path)
                .with_context(|| format!("No value at path '{}'", path))?;
            println!("{}", render(node).context("Failed to render value")?);
        }
        Commands::ToJson { input, output } => {
            let doc = read_document(input.as_deref(), &options)?;
            let json = serde_json::to_string_pretty(&doc).context("Failed to convert to JSON")?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::FromJson { input, output } => {
            let json = read_input(input.as_deref())?;
            let value: serde_json::Value =
                serde_json::from_slice(&json).context("Input is not valid JSON")?;
            let doc = Node::from_json(&value).context("Failed to convert JSON to SJR")?;
            let text = render(&doc).context("Failed to render document")?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Stats { input, json } => {
            let doc = read_document(input.as_deref(), &options)?;
            let stats = Stats::collect(&doc);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                for (kind, count) in &stats.kinds {
                    println!("{:<8}{}", format!("{}:", kind), count);
                }
                println!("nodes:  {}", stats.nodes);
                println!("depth:  {}", stats.max_depth);
            }
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `SJR_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_env("SJR_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// `name:line:col: message` for format errors, the plain error otherwise.
fn describe_error(name: &str, bytes: &[u8], err: &SjrError) -> String {
    match err {
        SjrError::Format { offset, message } => {
            let prefix = String::from_utf8_lossy(&bytes[..(*offset).min(bytes.len())]);
            let (line, col) = line_col(&prefix, prefix.len());
            format!("{}:{}:{}: {}", name, line, col, message)
        }
        other => format!("{}: {}", name, other),
    }
}

#[derive(Serialize)]
struct Stats {
    nodes: usize,
    max_depth: usize,
    kinds: BTreeMap<&'static str, usize>,
}

impl Stats {
    fn collect(doc: &Node) -> Self {
        let mut stats = Stats {
            nodes: 0,
            max_depth: 0,
            kinds: BTreeMap::new(),
        };
        stats.visit(doc, 0);
        stats
    }

    fn visit(&mut self, node: &Node, depth: usize) {
        self.nodes += 1;
        self.max_depth = self.max_depth.max(depth);
        *self.kinds.entry(node.kind().as_str()).or_insert(0) += 1;
        match node.kind() {
            Kind::Array => {
                for element in node.elements() {
                    self.visit(element, depth + 1);
                }
            }
            Kind::Object => {
                for (_, child) in node.children() {
                    self.visit(child, depth + 1);
                }
            }
            _ => {}
        }
    }
}

fn read_document(path: Option<&str>, options: &ParseOptions) -> Result<Node> {
    let bytes = read_input(path)?;
    let name = path.unwrap_or("<stdin>");
    tracing::debug!(input = name, bytes = bytes.len(), "read input");
    parse_bytes(&bytes, options).map_err(|err| anyhow::anyhow!(describe_error(name, &bytes, &err)))
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, format!("{}\n", content))
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
