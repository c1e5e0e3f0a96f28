mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use concatenate_core::config::ConfigFormat;
use concatenate_core::paths::DEFAULT_CONFIG_NAME;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "concatenate",
    about = "Run named sets of shell actions in series or in parallel",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .concatenate/ or .git/)
    #[arg(long, global = true, env = "CONCATENATE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a configuration, optionally narrowed to some action ids
    Run {
        /// Configuration name (file stem inside .concatenate/)
        #[arg(default_value = DEFAULT_CONFIG_NAME)]
        name: String,

        /// Only run the actions with these ids
        ids: Vec<String>,
    },

    /// List the configurations found in .concatenate/
    List,

    /// Validate a configuration and print its actions
    Show {
        /// Configuration name
        #[arg(default_value = DEFAULT_CONFIG_NAME)]
        name: String,
    },

    /// Write the default `check` and `fix` configurations
    Init {
        /// File format for new configurations (yaml or json)
        #[arg(long, default_value = "yaml")]
        format: ConfigFormat,

        /// Overwrite configurations that already exist
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Run { name, ids } => cmd::run::run(&root, &name, &ids, cli.json),
        Commands::List => cmd::list::run(&root, cli.json),
        Commands::Show { name } => cmd::show::run(&root, &name, cli.json),
        Commands::Init { format, force } => cmd::init::run(&root, format, force, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
