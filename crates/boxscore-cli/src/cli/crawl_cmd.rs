//! `boxscore crawl` - collect team totals from boxscore pages.

use crate::browser::{ChromeFetcher, LaunchOptions};
use crate::cli::output::{self, Mode, Styled};
use anyhow::{bail, Context, Result};
use boxscore::{CrawlConfig, CrawlReport, CrawlScope, Crawler};
use clap::{ArgGroup, Args};
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

#[derive(Args, Debug, Default)]
#[command(group(ArgGroup::new("scope").args(["team", "all_teams", "vs"])))]
pub struct CrawlArgs {
    /// One team's season, by site code (e.g. ATL)
    #[arg(long, value_name = "CODE")]
    pub team: Option<String>,

    /// Every franchise in the built-in table
    #[arg(long)]
    pub all_teams: bool,

    /// Head-to-head games only, crawled from the first team's schedule
    #[arg(long, value_name = "A,B", value_parser = parse_pair)]
    pub vs: Option<(String, String)>,

    /// Season end year (2025 is the 2024-25 season)
    #[arg(long)]
    pub season: Option<u16>,

    /// Corpus file to write
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Flush the checkpoint after every N attempted games
    #[arg(long, value_name = "N")]
    pub flush_every: Option<usize>,

    /// Browser-session attempts per schedule page
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    #[arg(long, value_name = "MS")]
    pub min_delay_ms: Option<u64>,

    #[arg(long, value_name = "MS")]
    pub max_delay_ms: Option<u64>,

    /// JSON config file; flags given here override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(',') {
        Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() && !b.contains(',') => {
            Ok((a.trim().to_string(), b.trim().to_string()))
        }
        _ => Err(format!("expected two team codes as A,B, got {raw:?}")),
    }
}

impl CrawlArgs {
    fn scope(&self) -> Option<CrawlScope> {
        if let Some(code) = &self.team {
            return Some(CrawlScope::Team { code: code.clone() });
        }
        if let Some((a, b)) = &self.vs {
            return Some(CrawlScope::Matchup {
                a: a.clone(),
                b: b.clone(),
            });
        }
        self.all_teams.then_some(CrawlScope::AllTeams)
    }

    /// Layer the flags over the config file (or defaults) and validate.
    pub fn resolve_config(&self) -> Result<CrawlConfig> {
        let mut config = match &self.config {
            Some(path) => CrawlConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => CrawlConfig::default(),
        };

        match self.scope() {
            Some(scope) => config.scope = scope,
            None if self.config.is_none() => {
                bail!("choose what to crawl: --team CODE, --all-teams, or --vs A,B")
            }
            None => {}
        }
        if let Some(season) = self.season {
            config.season = season;
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(n) = self.flush_every {
            config.flush_cadence = n;
        }
        if let Some(n) = self.retries {
            config.retry_limit = n;
        }
        if let Some(ms) = self.min_delay_ms {
            config.delay_range.min_ms = ms;
        }
        if let Some(ms) = self.max_delay_ms {
            config.delay_range.max_ms = ms;
        }
        Ok(config.validate()?)
    }
}

pub async fn run(args: CrawlArgs, mode: Mode) -> Result<()> {
    let config = args.resolve_config()?;
    let started = Instant::now();

    let fetcher = ChromeFetcher::launch(LaunchOptions {
        headless: !args.headful,
        navigation_timeout: config.page_timeout(),
    })
    .await
    .context("failed to launch browser")?;

    let mut crawler = Crawler::new(fetcher, config);
    let result = crawler.run_to_file().await;
    let output_path = crawler.config().output_path.clone();
    let label = crawler.config().scope.label();
    crawler.into_fetcher().close().await;
    let report = result.with_context(|| format!("failed to write {}", output_path.display()))?;

    let elapsed = started.elapsed().as_secs();
    if mode.json {
        output::print_json(&serde_json::json!({
            "scope": label,
            "output": output_path,
            "games": report.records.len(),
            "abandoned": report.abandoned,
            "elapsed_secs": elapsed,
        }));
        return Ok(());
    }
    print_summary(&report, &output_path, elapsed);
    Ok(())
}

fn print_summary(report: &CrawlReport, output_path: &std::path::Path, elapsed: u64) {
    let s = Styled::new();
    eprintln!();
    eprintln!(
        "  {} {} games saved to {} {}",
        s.ok_sym(),
        s.green(&report.records.len().to_string()),
        s.bold(&output_path.display().to_string()),
        s.dim(&format!("({})", output::format_duration(elapsed)))
    );
    if !report.abandoned.is_empty() {
        warn!("checkpoints kept for {}", report.abandoned.join(", "));
        eprintln!(
            "  {} schedule unavailable for {}; rerun to resume",
            s.warn_sym(),
            s.yellow(&report.abandoned.join(", "))
        );
    }
}
