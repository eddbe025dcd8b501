use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use unibuild_cli::commands;
use unibuild_cli::console::{print_batch_summary, ConsoleEvents};

#[derive(Parser)]
#[command(name = "unibuild", version, about = "Engine build orchestration CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build one or more platforms, in order.
    Build {
        /// Platform keys to build (windows, mac, android, webgl).
        platforms: Vec<String>,
        /// Build every known platform.
        #[arg(long, short = 'a')]
        all: bool,
        /// Project root containing unibuild.yaml.
        #[arg(long, default_value = ".")]
        project_root: PathBuf,
        /// Pre-build hook to execute (overrides the configured one).
        #[arg(long)]
        hook: Option<String>,
        /// Skip the pre-build hook even if one is configured.
        #[arg(long)]
        no_hook: bool,
        /// Where to write the JSON result records.
        #[arg(long)]
        results_out: Option<PathBuf>,
    },
    /// Ship a finished build to a local distribution directory.
    Upload {
        /// Platform key the build belongs to.
        #[arg(long)]
        platform: String,
        /// Build folder to ship (defaults to the most recent one).
        #[arg(long)]
        path: Option<PathBuf>,
        /// Project root containing unibuild.yaml.
        #[arg(long, default_value = ".")]
        project_root: PathBuf,
        /// Directory the artifact is shipped into.
        #[arg(long)]
        out_dir: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    if let Err(message) = run_cli() {
        eprintln!("{}", message);
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build {
            platforms,
            all,
            project_root,
            hook,
            no_hook,
            results_out,
        } => {
            let events = ConsoleEvents;
            let outcome = commands::build::run(
                commands::build::BuildArgs {
                    project_root,
                    platforms,
                    all,
                    hook,
                    no_hook,
                    results_out,
                },
                &events,
            )?;
            print_batch_summary(&outcome.batch);
            println!("results: {}", outcome.results_path.display());
            if outcome.batch.success_count == 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Upload {
            platform,
            path,
            project_root,
            out_dir,
        } => {
            let result = commands::upload::run(commands::upload::UploadArgs {
                project_root,
                platform,
                path,
                out_dir,
            })?;
            println!("{}", result.message);
            if !result.success {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
