use clap::Parser;
use tracing_subscriber::EnvFilter;

use cigar_fix::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Progress lines are info-level, so they show without --verbose
    let filter = if cli.verbose {
        EnvFilter::new("cigar_fix=debug,info")
    } else {
        EnvFilter::new("cigar_fix=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Fix(args) => {
            cli::fix::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Classify(args) => {
            cli::classify::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
