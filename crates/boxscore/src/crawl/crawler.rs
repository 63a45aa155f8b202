//! Sequential, checkpointed crawler over boxscore pages.

use crate::config::{CrawlConfig, CrawlScope};
use crate::corpus;
use crate::crawl::checkpoint::Checkpoint;
use crate::crawl::fetcher::{PageFetcher, ReadyCondition};
use crate::error::{BoxscoreError, Result};
use crate::extract::{boxscore_links, extract_team_totals};
use crate::model::GameRecord;
use crate::teams;
use std::collections::HashSet;
use tracing::{error, info, warn};

/// Outcome of crawling one team's schedule.
#[derive(Debug)]
pub struct TeamCrawl {
    pub label: String,
    pub checkpoint: Checkpoint,
    /// Every planned target was attempted.
    pub completed: bool,
}

/// Outcome of a whole run, across every team in scope.
#[derive(Debug, Default)]
pub struct CrawlReport {
    pub records: Vec<GameRecord>,
    /// Checkpoints of completed crawls, to clear once the corpus is saved.
    pub finished: Vec<Checkpoint>,
    /// Labels whose schedule page never loaded. Their checkpoints are kept.
    pub abandoned: Vec<String>,
}

impl CrawlReport {
    fn absorb(&mut self, crawl: TeamCrawl) {
        self.records.extend_from_slice(crawl.checkpoint.records());
        if crawl.completed {
            self.finished.push(crawl.checkpoint);
        } else {
            self.abandoned.push(crawl.label);
        }
    }

    fn collected_urls(&self) -> HashSet<String> {
        self.records.iter().map(|r| r.game_url.clone()).collect()
    }
}

/// Drives a [`PageFetcher`] over the boxscores in a [`CrawlScope`].
///
/// One crawler owns one fetcher session, so fetches never overlap.
pub struct Crawler<F> {
    fetcher: F,
    config: CrawlConfig,
}

impl<F: PageFetcher> Crawler<F> {
    /// `config` is expected to have passed [`CrawlConfig::validate`].
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        Self { fetcher, config }
    }

    /// Settings this crawler runs with.
    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Give back the fetcher, e.g. to close its session.
    pub fn into_fetcher(self) -> F {
        self.fetcher
    }

    /// Crawl the configured scope, write the corpus, then clear finished checkpoints.
    pub async fn run_to_file(&mut self) -> Result<CrawlReport> {
        let report = self.run().await;
        let output = &self.config.output_path;
        corpus::write_records(output, &report.records)?;
        info!("saved {} games to {}", report.records.len(), output.display());

        for checkpoint in &report.finished {
            if let Err(e) = checkpoint.clear() {
                warn!(
                    "could not remove checkpoint {}: {e}",
                    checkpoint.path().display()
                );
            }
        }
        Ok(report)
    }

    /// Crawl the configured scope without touching the output file.
    pub async fn run(&mut self) -> CrawlReport {
        let mut report = CrawlReport::default();
        match self.config.scope.clone() {
            CrawlScope::Team { code } => {
                let scope = CrawlScope::Team { code: code.clone() };
                let crawl = self.crawl_team(&code, &scope, &HashSet::new()).await;
                report.absorb(crawl);
            }
            CrawlScope::Matchup { a, b } => {
                let scope = CrawlScope::Matchup { a: a.clone(), b };
                let crawl = self.crawl_team(&a, &scope, &HashSet::new()).await;
                report.absorb(crawl);
            }
            CrawlScope::AllTeams => {
                for code in teams::all_codes() {
                    let name = teams::franchise_name(code).unwrap_or(code);
                    info!("=== starting {name} ({code}) ===");
                    let scope = CrawlScope::Team {
                        code: code.to_string(),
                    };
                    let skip = report.collected_urls();
                    let crawl = self.crawl_team(code, &scope, &skip).await;
                    report.absorb(crawl);
                }
            }
        }
        if !report.abandoned.is_empty() {
            warn!("schedule unavailable for: {}", report.abandoned.join(", "));
        }
        report
    }

    /// Crawl one team's schedule, keeping games `scope` accepts.
    ///
    /// URLs in `skip` are not fetched. A schedule that never loads ends this
    /// crawl early with whatever the checkpoint already held.
    pub async fn crawl_team(
        &mut self,
        team: &str,
        scope: &CrawlScope,
        skip: &HashSet<String>,
    ) -> TeamCrawl {
        let label = scope.label();
        let mut checkpoint = Checkpoint::open(
            self.config.checkpoint_path(&label),
            self.config.flush_cadence,
        );

        let targets = match self.discover_targets(team).await {
            Ok(targets) => targets,
            Err(e) => {
                error!("[{label}] {e}; skipping");
                return TeamCrawl {
                    label,
                    checkpoint,
                    completed: false,
                };
            }
        };
        info!("[{label}] found {} boxscore links", targets.len());

        checkpoint.plan(targets, skip);
        let total = checkpoint.state().pending();
        let mut idx = 0;
        while let Some(url) = checkpoint.next_target().map(str::to_string) {
            idx += 1;
            info!("[{label}] [{idx}/{total}] visiting {url}");
            let record = self.visit(&url, team, scope, &label).await;
            if let Err(e) = checkpoint.record_attempt(record) {
                warn!("[{label}] checkpoint flush failed: {e}");
            }
            if checkpoint.next_target().is_some() {
                tokio::time::sleep(self.config.delay_range.sample()).await;
            }
        }

        if let Err(e) = checkpoint.flush() {
            warn!("[{label}] final checkpoint flush failed: {e}");
        }
        info!(
            "[{label}] done: {} games collected",
            checkpoint.records().len()
        );
        TeamCrawl {
            label,
            checkpoint,
            completed: true,
        }
    }

    /// Load a team's schedule page and list its boxscore links.
    pub async fn discover_targets(&mut self, team: &str) -> Result<Vec<String>> {
        let url = teams::schedule_url(&self.config.base_url, team, self.config.season);
        let html = self.load_schedule(team, &url).await?;
        Ok(boxscore_links(&html, &url))
    }

    async fn load_schedule(&mut self, team: &str, url: &str) -> Result<String> {
        let attempts = self.config.retry_limit;
        let ready = ReadyCondition::schedule_page();
        for attempt in 1..=attempts {
            if attempt > 1 {
                if let Err(e) = self.fetcher.restart().await {
                    warn!("[{team}] session restart failed: {e}");
                }
            }
            info!("[{team}] opening schedule page (attempt {attempt}/{attempts})");
            match self
                .fetcher
                .fetch_when_ready(url, &ready, self.config.page_timeout())
                .await
            {
                Ok(html) => return Ok(html),
                Err(e) => {
                    warn!("[{team}] failed to load schedule page: {e}");
                    if attempt < attempts {
                        tokio::time::sleep(self.config.session_retry_backoff()).await;
                    }
                }
            }
        }
        Err(BoxscoreError::ScheduleUnavailable {
            team: team.to_string(),
            attempts,
        })
    }

    /// Fetch and parse one game page. Every failure is logged and yields `None`.
    async fn visit(
        &mut self,
        url: &str,
        team: &str,
        scope: &CrawlScope,
        label: &str,
    ) -> Option<GameRecord> {
        let html = match self
            .fetcher
            .fetch_when_ready(
                url,
                &ReadyCondition::boxscore_page(),
                self.config.element_timeout(),
            )
            .await
        {
            Ok(html) => html,
            Err(e) => {
                warn!("[{label}] error scraping {url}: {e}");
                return None;
            }
        };

        match extract_team_totals(&html) {
            Some(totals) if scope.accepts(&totals) => {
                info!("[{label}] saved totals from {url}");
                Some(GameRecord::new(Some(team.to_string()), url, totals))
            }
            Some(totals) => {
                let found: Vec<&str> = totals.keys().collect();
                warn!(
                    "[{label}] skipping {url}: no totals for {} (found {})",
                    scope.missing_teams(&totals).join(", "),
                    found.join(", ")
                );
                None
            }
            None => {
                warn!("[{label}] no totals found for {url}");
                None
            }
        }
    }
}
