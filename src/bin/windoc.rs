//! windoc: look up and inspect cached Win32 API documentation.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use windoc::{DocResult, DocSections, Windoc};

/// Windoc CLI
#[derive(Parser)]
#[command(name = "windoc")]
#[command(version = windoc::PKG_VERSION)]
#[command(about = "Cached Win32 API documentation lookups")]
struct Args {
    /// Cache file (default: <user cache dir>/windoc/cache.json)
    #[arg(long, env = "WINDOC_CACHE_PATH")]
    cache_path: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "WINDOC_TIMEOUT_SECS", default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a function (cache first)
    Lookup {
        /// Function or import symbol name (e.g. "KERNEL32.dll!CloseHandle")
        name: String,
    },

    /// Fetch a function again, replacing its cached entry
    Refresh {
        /// Function or import symbol name
        name: String,
    },

    /// Remove a function from the cache
    Forget {
        /// Function or import symbol name
        name: String,
    },

    /// List cached entries
    List,

    /// Remove every cached entry
    Clear,
}

fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("windoc")
        .join("cache.json")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let lookup = Windoc::builder()
        .cache_path(args.cache_path.unwrap_or_else(default_cache_path))
        .timeout(Duration::from_secs(args.timeout.max(1)))
        .build()?;

    match args.command {
        Command::Lookup { name } => {
            let result = lookup.get_docs(&name).await;
            print_result(&name, &result);
        }
        Command::Refresh { name } => {
            let result = lookup.refresh(&name).await;
            print_result(&name, &result);
        }
        Command::Forget { name } => {
            if lookup.forget(&name)? {
                println!("Removed {name}");
            } else {
                println!("{name} was not cached");
            }
        }
        Command::List => {
            let entries = lookup.store().entries();
            if entries.is_empty() {
                println!("Cache is empty ({})", lookup.store().path().display());
            }
            for record in entries {
                let status = if record.found { "documented" } else { "undocumented" };
                let fetched = record
                    .fetched_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<40} {:<13} {}", record.identifier, status, fetched);
            }
        }
        Command::Clear => {
            let count = lookup.store().len();
            lookup.clear_cache()?;
            println!("Removed {count} entries");
        }
    }

    Ok(())
}

fn print_result(name: &str, result: &DocResult) {
    match result {
        DocResult::Documented(docs) => print_sections(name, docs),
        DocResult::Undocumented => println!("No Win32 docs found for {name}"),
        DocResult::Unavailable { reason } => {
            eprintln!("Documentation unavailable for {name}: {reason}");
        }
    }
}

fn print_sections(name: &str, docs: &DocSections) {
    match &docs.resolved_as {
        Some(resolved) => println!("==== {name} (documented as {resolved}) ===="),
        None => println!("==== {name} ===="),
    }
    if let Some(description) = &docs.description {
        println!("\n{description}");
    }
    if let Some(syntax) = &docs.syntax {
        println!("\n---- syntax ----\n{syntax}");
    }
    if let Some(parameters) = &docs.parameters {
        println!("\n---- parameters ----");
        for paragraph in parameters {
            println!("{paragraph}");
        }
    }
    if let Some(return_value) = &docs.return_value {
        println!("\n---- return value ----\n{return_value}");
    }
}
