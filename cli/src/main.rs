//! fxzhihu CLI - Zhihu content normalization tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use fxzhihu::{
    build_page, extract_references, normalize, parse_document_file, render_segments_with_result,
    ContentKind, JsonFormat, PageOptions, RenderOptions,
};

#[derive(Parser)]
#[command(name = "fxzhihu")]
#[command(version)]
#[command(about = "Normalize Zhihu content into self-contained HTML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize an HTML fragment (images, gateway links, underlines)
    Normalize {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the bibliography for the footnotes in an HTML fragment
    #[command(alias = "refs")]
    References {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Render structured content JSON to HTML
    Segments {
        /// Input JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Fail on the first malformed segment
        #[arg(long)]
        strict: bool,

        /// Print rendering statistics to stderr
        #[arg(long)]
        stats: bool,

        /// Keep newlines in paragraphs instead of converting them to <br>
        #[arg(long)]
        keep_newlines: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Build a full page from an upstream payload
    Page {
        /// Content kind: answer, article, question or pin
        #[arg(value_name = "KIND")]
        kind: String,

        /// Content id
        #[arg(value_name = "ID")]
        id: String,

        /// Upstream JSON payload file
        #[arg(value_name = "PAYLOAD")]
        payload: PathBuf,

        /// Omit the redirect to the original page
        #[arg(long, env = "FXZHIHU_NO_REDIRECT")]
        no_redirect: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Dump decoded structured content as JSON
    Json {
        /// Input JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Normalize { input, output } => cmd_normalize(&input, output.as_deref()),
        Commands::References { input } => cmd_references(&input),
        Commands::Segments {
            input,
            strict,
            stats,
            keep_newlines,
            output,
        } => cmd_segments(&input, strict, stats, keep_newlines, output.as_deref()),
        Commands::Page {
            kind,
            id,
            payload,
            no_redirect,
            output,
        } => cmd_page(&kind, &id, &payload, no_redirect, output.as_deref()),
        Commands::Json {
            input,
            output,
            compact,
        } => cmd_json(&input, output.as_deref(), compact),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn write_output(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_normalize(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let html = fs::read_to_string(input)?;
    write_output(&normalize(&html), output)
}

fn cmd_references(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let html = fs::read_to_string(input)?;
    let block = extract_references(&html);
    if block.is_empty() {
        eprintln!("{}", "No references found".yellow());
    } else {
        println!("{}", block);
    }
    Ok(())
}

fn cmd_segments(
    input: &Path,
    strict: bool,
    stats: bool,
    keep_newlines: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_document_file(input)?;
    log::debug!("loaded {} segments from {}", doc.len(), input.display());

    let mut options = RenderOptions::new()
        .with_line_breaks(!keep_newlines)
        .with_stats(stats);
    if strict {
        options = options.strict();
    }

    let result = render_segments_with_result(&doc, &options)?;

    for issue in &result.issues {
        eprintln!(
            "{}: segment {} ({}): {}",
            "Skipped".yellow().bold(),
            issue.index,
            issue.kind,
            issue.message
        );
    }

    if stats {
        eprintln!("{}", "Rendering Statistics".cyan().bold());
        eprintln!("{}", "─".repeat(40).dimmed());
        for (kind, count) in &result.stats.segments {
            eprintln!("{}: {}", kind.bold(), count);
        }
        eprintln!("{}: {}", "Skipped".bold(), result.stats.skipped);
        eprintln!("{}: {}", "Marks".bold(), result.stats.marks);
        eprintln!("{}: {}", "Formulas".bold(), result.stats.formulas);
        eprintln!("{}: {}", "Footnotes".bold(), result.stats.footnotes);
    }

    write_output(&result.content, output)
}

fn cmd_page(
    kind: &str,
    id: &str,
    payload: &Path,
    no_redirect: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: ContentKind = kind.parse()?;
    let payload = fs::read_to_string(payload)?;
    let options = PageOptions::new().with_redirect(!no_redirect);

    let html = build_page(kind, id, &payload, &options)?;
    write_output(&html, output)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_document_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = fxzhihu::render::to_json(&doc, format)?;
    write_output(&json, output)
}

fn cmd_version() {
    println!("{} {}", "fxzhihu".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Zhihu content normalization tool");
    println!();
    println!("License: MIT");
}
