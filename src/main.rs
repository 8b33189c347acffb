use anyhow::Result;
use clap::Parser;
use moodmap::cli::{Cli, Commands};
use moodmap::commands::analyze::{handle_analyze, AnalyzeConfig};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
        } => handle_analyze(AnalyzeConfig {
            path,
            format,
            output,
        }),
    }
}
