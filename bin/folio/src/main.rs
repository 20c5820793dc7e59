//! folio CLI
//!
//! Generates typed content registries for documentation sites.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for folio.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Typed content collections for documentation sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "folio.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate the typed registry module
    Sync {
        /// Output file (defaults to codegen.output)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Regenerate whenever content changes
        #[arg(short, long)]
        watch: bool,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// List collections, or the entries of one collection
    List {
        /// Collection to list
        collection: Option<String>,
    },
    /// Create a new entry
    New {
        /// Collection and path of the new entry (e.g., docs/guides/faq)
        path: std::path::PathBuf,
        /// Entry title (defaults to one derived from the file name)
        #[arg(short, long)]
        title: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Sync { output, watch } => {
            if watch {
                folio::cmd::sync::watch(&cli.config, output.as_deref()).await?;
            } else {
                folio::cmd::sync::run(&cli.config, output.as_deref())?;
            }
        }
        Commands::Check { strict } => {
            folio::cmd::check::run(&cli.config, strict)?;
        }
        Commands::List { collection } => {
            folio::cmd::list::run(&cli.config, collection.as_deref())?;
        }
        Commands::New { path, title } => {
            folio::cmd::new::run(&cli.config, &path, title.as_deref())?;
        }
    }

    Ok(())
}
