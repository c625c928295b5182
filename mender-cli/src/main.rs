//! mender CLI
//!
//! Loads a document, repairs it, and prints the resulting tree together with
//! its conformance status.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mender_browser::common::HttpOptions;
use mender_browser::common::url::Url;
use mender_browser::html::tree_to_string;
use mender_browser::{DefaultFetcher, Document};
use owo_colors::OwoColorize;
use serde_json::json;

/// How the parsed tree is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented outline, one node per line.
    Tree,
    /// Pseudo-HTML with bracketed text nodes.
    Debug,
    /// Tree, issues, and status as JSON.
    Json,
}

/// mender - lenient HTML-subset parser
#[derive(Parser, Debug)]
#[command(name = "mender")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Parse a local file and print the tree
    mender ./index.html

    # Parse a directory (opens index.html or index.htm)
    mender ./site

    # Parse inline markup and list every repair
    mender --issues --html '<td>x'

    # Resolve a link relative to the page it was found on
    mender --context https://example.com/docs/ ../about.html

    # Dump as JSON
    mender --format json https://example.com
"#)]
struct Cli {
    /// Path to an HTML file, a directory, or a URL
    #[arg(value_name = "FILE|URL", required_unless_present = "html")]
    path: Option<String>,

    /// Parse this markup instead of loading a document
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Location that a relative FILE|URL is resolved against
    #[arg(long, value_name = "URL")]
    context: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// List every conformance issue
    #[arg(short, long)]
    issues: bool,

    /// Count case-insensitive occurrences of TERM in the document text
    #[arg(long, value_name = "TERM")]
    find: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    timeout: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let cli = Cli::parse();
    let doc = load_doc(&cli)?;

    match cli.format {
        Format::Json => print_json(&doc, cli.find.as_deref())?,
        Format::Tree | Format::Debug => {
            if cli.format == Format::Tree {
                print!("{}", tree_to_string(doc.node_tree()));
            } else {
                println!("{}", doc.node_tree().to_debug_string());
            }
            if cli.issues {
                print_issues(&doc);
            }
            if let Some(term) = &cli.find {
                println!("\n{} match(es) for {term:?}", doc.count_matches(term));
            }
            print_summary(&doc);
        }
    }
    Ok(())
}

/// Load document from CLI arguments
fn load_doc(cli: &Cli) -> Result<Document> {
    if let Some(markup) = &cli.html {
        return Ok(Document::from_markup(markup));
    }
    let Some(path) = &cli.path else {
        anyhow::bail!("no document given: pass FILE|URL or --html");
    };

    let context = cli
        .context
        .as_deref()
        .map(Url::parse)
        .transpose()
        .context("invalid --context URL")?;
    let fetcher = DefaultFetcher::with_options(HttpOptions {
        timeout: Duration::from_secs(cli.timeout),
        ..HttpOptions::default()
    });
    Ok(Document::load(path, context.as_ref(), &fetcher))
}

fn print_issues(doc: &Document) {
    println!("\n=== Conformance Issues ===");
    if doc.issues().is_empty() {
        println!("  (none)");
    }
    for issue in doc.issues() {
        println!("  - {issue}");
    }
}

fn print_summary(doc: &Document) {
    println!();
    if doc.is_conformant() {
        println!("{}", "conformant".green());
    } else {
        let summary = format!("not conformant ({} issue(s))", doc.issues().len());
        println!("{}", summary.red());
    }
    if doc.error_code() != 0 {
        let status = format!("error {}", doc.error_code());
        println!("{}", status.yellow());
    }
}

fn print_json(doc: &Document, find: Option<&str>) -> Result<()> {
    let mut value = json!({
        "path": doc.path(),
        "url": doc.url().map(Url::as_str),
        "conformant": doc.is_conformant(),
        "error_code": doc.error_code(),
        "title": doc.title(),
        "issues": doc.issues(),
        "tree": doc.node_tree(),
    });
    if let Some(term) = find {
        value["matches"] = json!(doc.count_matches(term));
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
