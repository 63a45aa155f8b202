//! `boxscore` - crawl boxscore team totals and average them per matchup.

mod browser;
mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "boxscore",
    version,
    about = "Crawl boxscore team totals and average them per matchup"
)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON logs and machine-readable summaries
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl boxscore pages into a team-totals corpus
    Crawl(cli::crawl_cmd::CrawlArgs),

    /// Average a corpus into per-matchup stats
    Aggregate {
        /// Corpus written by `crawl`
        #[arg(long, default_value = "team_totals_all_teams.json")]
        input: PathBuf,

        /// Where to write the matchup averages
        #[arg(long, default_value = "matchup_averages.json")]
        output: PathBuf,
    },

    /// List the franchise table
    Teams,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json)?;
    let mode = cli::output::Mode { json: cli.json };

    match cli.command {
        Command::Crawl(args) => cli::crawl_cmd::run(args, mode).await,
        Command::Aggregate { input, output } => cli::aggregate_cmd::run(&input, &output, mode),
        Command::Teams => {
            cli::teams_cmd::run(mode);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool, json: bool) -> Result<()> {
    let directive = if verbose {
        "boxscore=debug"
    } else {
        "boxscore=info"
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
