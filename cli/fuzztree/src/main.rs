//! fuzztree: configuration and reliability analysis of variability fault trees.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::analyze::AnalyzeOptions;

#[derive(Parser)]
#[command(name = "fuzztree", version, about = "Variability-aware fault tree analysis")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every configuration of a tree
    Configurations {
        /// Tree document (JSON)
        #[arg(long)]
        input: PathBuf,
        /// Output format (human, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Analyze every configuration of a tree
    Analyze {
        /// Tree document (JSON)
        #[arg(long)]
        input: PathBuf,
        /// Alpha level for fuzzy probabilities (default: core, alpha = 1)
        #[arg(long)]
        alpha: Option<f64>,
        /// Number of alpha steps for decomposed results
        #[arg(long)]
        decomposition: Option<u32>,
        /// Mission time for failure rates without their own
        #[arg(long)]
        mission_time: Option<f64>,
        /// Analyze configurations one after another
        #[arg(long)]
        sequential: bool,
        /// Settings file (default: ./fuzztree.toml when present)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Output format (human, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Print the template tree or one instantiated configuration
    Inspect {
        /// Tree document (JSON)
        #[arg(long)]
        input: PathBuf,
        /// Position of the configuration to instantiate
        #[arg(long)]
        config: Option<usize>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Configurations { input, format } => {
            commands::configurations::run(&input, format.as_deref())
        }

        Commands::Analyze {
            input,
            alpha,
            decomposition,
            mission_time,
            sequential,
            settings,
            format,
        } => {
            let options = AnalyzeOptions {
                alpha,
                decomposition,
                mission_time,
                sequential,
                settings,
            };
            commands::analyze::run(&cwd, &input, &options, format.as_deref())
        }

        Commands::Inspect {
            input,
            config,
            format,
        } => commands::inspect::run(&input, config, format.as_deref()),
    }
}
