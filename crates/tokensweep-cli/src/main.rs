mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use cmd::process::ProcessArgs;
use std::path::PathBuf;

const ACCESS_TOKEN_HELP: &str = "Chat uses Vertex AI and needs GCLOUD_PROJECT, GCLOUD_LOCATION and an \
OAuth bearer token in GCLOUD_ACCESS_TOKEN (e.g. `gcloud auth print-access-token`). \
Application Default Credentials are not read; without a token chat replies report a 401.";

#[derive(Parser)]
#[command(
    name = "tokensweep",
    about = "Find customer memberships by email and disable their payment instrument tokens",
    version,
    propagate_version = true
)]
struct Cli {
    /// Working root (default: auto-detect from .tokensweep/)
    #[arg(long, global = true, env = "TOKENSWEEP_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single entry or a CSV export
    Process(ProcessArgs),

    /// Ask the assistant about a previous run
    #[command(after_help = ACCESS_TOKEN_HELP)]
    Chat {
        /// Log file written by `process --log-out`
        #[arg(long)]
        log: PathBuf,

        /// The CSV that was processed
        #[arg(long)]
        file: Option<PathBuf>,

        /// The question
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },

    /// Start the HTTP API
    #[command(after_help = ACCESS_TOKEN_HELP)]
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value_t = 3141)]
        port: u16,
    },

    /// Show or validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Process(args) => cmd::process::run(&root, args, cli.json),
        Commands::Chat {
            log,
            file,
            question,
        } => cmd::chat::run(&root, &log, file.as_deref(), &question.join(" "), cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
