use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use fragscout::{
    config::{EncodingMode, SearchConfig},
    search::{discover_with_source, search},
    FileEntry, LocalFs, SearchOutput, SearchQuery,
};
use std::{num::NonZeroUsize, path::PathBuf, sync::Arc};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that walks the corpus
#[derive(Args)]
struct CorpusArgs {
    /// Corpus root directory
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// Configuration file (YAML), layered over the global and local ones
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Only report documents under this root-relative directory (repeatable)
    #[arg(short = 's', long = "scope")]
    scopes: Vec<PathBuf>,

    /// Patterns to ignore (glob format, root-relative)
    #[arg(short = 'x', long = "ignore")]
    ignore: Vec<String>,

    /// How to handle invalid UTF-8 sequences (failfast|lossy)
    #[arg(long)]
    encoding: Option<EncodingMode>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the corpus for a pattern
    Search {
        /// Text (or regular expression with --regex) to search for
        #[arg(short = 'p', long)]
        pattern: String,

        /// Treat the pattern as a regular expression
        #[arg(short = 'r', long)]
        regex: bool,

        /// Ignore case
        #[arg(short = 'i', long)]
        ignore_case: bool,

        /// Match whole words only
        #[arg(short = 'w', long)]
        word: bool,

        /// Show only statistics, not matches
        #[arg(long)]
        stats: bool,

        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// List the recognized documents of the corpus
    List {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            pattern,
            regex,
            ignore_case,
            word,
            stats,
            corpus,
        } => {
            let config = load_config(&corpus)?;
            init_tracing(&config.log_level)?;

            let query = SearchQuery::new(pattern)
                .regex(regex)
                .case_insensitive(ignore_case)
                .whole_word(word);

            let runtime = build_runtime(&config)?;
            let output = runtime.block_on(search(&config, &query))?;

            if corpus.json {
                print_search_json(&output)?;
            } else {
                print_search_results(&output, &config, stats);
            }
            Ok(())
        }
        Commands::List { corpus } => {
            let config = load_config(&corpus)?;
            init_tracing(&config.log_level)?;

            let runtime = build_runtime(&config)?;
            let source = Arc::new(LocalFs::new(config.encoding_mode));
            let files = runtime.block_on(discover_with_source(source, &config))?;

            if corpus.json {
                println!("{}", serde_json::to_string_pretty(&files)?);
            } else {
                print_file_list(&files, &config);
            }
            Ok(())
        }
    }
}

/// Configuration files overlaid with the command line
fn load_config(args: &CorpusArgs) -> Result<SearchConfig> {
    let file_config =
        SearchConfig::load_from(args.config.as_deref()).context("Failed to load configuration")?;

    let mut cli_config = SearchConfig::default();
    if let Some(root) = &args.root {
        cli_config.root_path = root.clone();
    }
    cli_config.scopes = args.scopes.clone();
    cli_config.ignore_patterns = args.ignore.clone();
    if let Some(encoding) = args.encoding {
        cli_config.encoding_mode = encoding;
    }
    if let Some(threads) = args.threads {
        cli_config.thread_count = threads;
    }
    if let Some(level) = &args.log_level {
        cli_config.log_level = level.clone();
    }

    Ok(file_config.merge_with_cli(cli_config))
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .with_context(|| format!("Invalid log level '{}'", log_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    debug!("Logging initialized at '{}'", log_level);
    Ok(())
}

fn build_runtime(config: &SearchConfig) -> Result<tokio::runtime::Runtime> {
    debug!("Using {} worker threads", config.thread_count);
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.thread_count.get())
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn print_search_json(output: &SearchOutput) -> Result<()> {
    let report = serde_json::json!({
        "matches": output.sorted(),
        "total_matches": output.total_matches,
        "files_scanned": output.files_scanned,
        "files_with_matches": output.files_with_matches,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_search_results(output: &SearchOutput, config: &SearchConfig, stats_only: bool) {
    if !stats_only {
        for m in output.sorted() {
            let shown = m.file.relative_to(&config.root_path);
            // 1-based line, 1-based inclusive column range
            println!(
                "{}:{}:{}-{}: {}",
                shown.display().to_string().blue(),
                (m.line + 1).to_string().green(),
                m.start_column + 1,
                m.end_column,
                m.matched_text.red().bold()
            );
        }
        if !output.is_empty() {
            println!();
        }
    }

    println!(
        "Found {} matches in {} files ({} files scanned)",
        output.total_matches, output.files_with_matches, output.files_scanned
    );
}

fn print_file_list(files: &[FileEntry], config: &SearchConfig) {
    let mut sorted: Vec<&FileEntry> = files.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    for entry in &sorted {
        println!(
            "{:<8} {}",
            entry.kind.to_string().green(),
            entry.relative_to(&config.root_path).display()
        );
    }
    println!("\n{} documents", sorted.len());
}
