mod cmd;
mod repo;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Repository maintenance tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the local quality gate (fetch/check/test/fmt/clippy/build).
    Preflight {
        /// Skip `cargo test`; the integration suite spawns both binaries.
        #[arg(long, default_value_t = false)]
        skip_tests: bool,
    },
    /// Print the commands `preflight` would run.
    PreflightPlan,
}

fn main() {
    if let Err(err) = real_main() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Preflight { skip_tests } => {
            cmd::preflight::run(skip_tests)?;
        }
        Command::PreflightPlan => {
            for (label, _) in cmd::preflight::STEPS {
                println!("{label}");
            }
        }
    }
    Ok(())
}
