//! Crawl configuration.

use crate::aggregate::matchup_key;
use crate::error::{BoxscoreError, Result};
use crate::model::TeamTotals;
use crate::teams;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which games a crawl collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrawlScope {
    /// One team's season schedule.
    Team { code: String },
    /// Every franchise in the built-in table.
    AllTeams,
    /// Team `a`'s schedule, keeping only games against `b`.
    Matchup { a: String, b: String },
}

impl CrawlScope {
    /// Label used in log lines and checkpoint file names.
    pub fn label(&self) -> String {
        match self {
            Self::Team { code } => code.clone(),
            Self::AllTeams => "ALL".to_string(),
            Self::Matchup { a, b } => matchup_key(a, b),
        }
    }

    /// Whether extracted totals belong to this scope.
    pub fn accepts(&self, totals: &TeamTotals) -> bool {
        match self {
            Self::Team { code } => totals.contains_key(code),
            Self::AllTeams => !totals.is_empty(),
            Self::Matchup { a, b } => totals.contains_key(a) && totals.contains_key(b),
        }
    }

    /// Scope teams with no entry in `totals`. Empty for `AllTeams`.
    pub fn missing_teams(&self, totals: &TeamTotals) -> Vec<String> {
        let required: Vec<&String> = match self {
            Self::Team { code } => vec![code],
            Self::AllTeams => Vec::new(),
            Self::Matchup { a, b } => vec![a, b],
        };
        required
            .into_iter()
            .filter(|code| !totals.contains_key(code))
            .cloned()
            .collect()
    }

    fn normalized(&self) -> Result<Self> {
        let code = |raw: &str| {
            teams::normalize_code(raw)
                .ok_or_else(|| BoxscoreError::Config(format!("invalid team code {raw:?}")))
        };
        Ok(match self {
            Self::Team { code: c } => Self::Team { code: code(c)? },
            Self::AllTeams => Self::AllTeams,
            Self::Matchup { a, b } => {
                let (a, b) = (code(a)?, code(b)?);
                if a == b {
                    return Err(BoxscoreError::Config(format!(
                        "matchup needs two different teams, got {a} twice"
                    )));
                }
                Self::Matchup { a, b }
            }
        })
    }
}

/// Inclusive bounds for the randomized pause between targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    /// Range from `min_ms` to `max_ms`, inclusive.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// No pause at all.
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Draw a delay uniformly from the range.
    pub fn sample(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        let ms = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::new(1500, 3000)
    }
}

/// Settings for one crawl run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    #[serde(default = "default_scope")]
    pub scope: CrawlScope,
    #[serde(default = "default_season")]
    pub season: u16,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Flush the checkpoint after every Nth attempted target.
    #[serde(default = "default_flush_cadence")]
    pub flush_cadence: usize,
    /// Whole-session attempts for the schedule page.
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,
    #[serde(default)]
    pub delay_range: DelayRange,
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
    #[serde(default = "default_element_timeout_secs")]
    pub element_timeout_secs: u64,
    #[serde(default = "default_session_retry_backoff_ms")]
    pub session_retry_backoff_ms: u64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_scope() -> CrawlScope {
    CrawlScope::AllTeams
}

fn default_season() -> u16 {
    2025
}

fn default_output_path() -> PathBuf {
    PathBuf::from("team_totals_all_teams.json")
}

fn default_flush_cadence() -> usize {
    1
}

fn default_retry_limit() -> u32 {
    3
}

fn default_page_timeout_secs() -> u64 {
    12
}

fn default_element_timeout_secs() -> u64 {
    10
}

fn default_session_retry_backoff_ms() -> u64 {
    3000
}

fn default_base_url() -> String {
    "https://www.basketball-reference.com".to_string()
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            scope: default_scope(),
            season: default_season(),
            output_path: default_output_path(),
            flush_cadence: default_flush_cadence(),
            retry_limit: default_retry_limit(),
            delay_range: DelayRange::default(),
            page_timeout_secs: default_page_timeout_secs(),
            element_timeout_secs: default_element_timeout_secs(),
            session_retry_backoff_ms: default_session_retry_backoff_ms(),
            base_url: default_base_url(),
        }
    }
}

impl CrawlConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| BoxscoreError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| BoxscoreError::json(path, e))
    }

    /// Check every field and normalize team codes to upper case.
    pub fn validate(mut self) -> Result<Self> {
        self.scope = self.scope.normalized()?;
        if !(1947..=2100).contains(&self.season) {
            return Err(BoxscoreError::Config(format!(
                "season {} out of range 1947..=2100",
                self.season
            )));
        }
        if self.flush_cadence == 0 {
            return Err(BoxscoreError::Config("flush cadence must be at least 1".into()));
        }
        if self.retry_limit == 0 {
            return Err(BoxscoreError::Config("retry limit must be at least 1".into()));
        }
        if self.delay_range.min_ms > self.delay_range.max_ms {
            return Err(BoxscoreError::Config(format!(
                "delay range {}..{} ms is inverted",
                self.delay_range.min_ms, self.delay_range.max_ms
            )));
        }
        if self.output_path.file_stem().is_none() {
            return Err(BoxscoreError::Config(format!(
                "output path {} has no file name",
                self.output_path.display()
            )));
        }
        if self.base_url.trim().is_empty() {
            return Err(BoxscoreError::Config("base url is empty".into()));
        }
        Ok(self)
    }

    /// Readiness wait for schedule pages.
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    /// Readiness wait for boxscore pages.
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    /// Pause between whole-session schedule attempts.
    pub fn session_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.session_retry_backoff_ms)
    }

    /// Checkpoint file for a crawl label, next to the output file.
    ///
    /// `out/team_totals.json` with label `ATL` → `out/team_totals.ATL.progress.json`.
    pub fn checkpoint_path(&self, label: &str) -> PathBuf {
        let stem = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "team_totals".to_string());
        self.output_path
            .with_file_name(format!("{stem}.{label}.progress.json"))
    }
}
