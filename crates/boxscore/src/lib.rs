//! Boxscore team-totals pipeline.
//!
//! Turns per-game boxscore pages into structured team totals, crawls them
//! with crash-resumable checkpoints, and folds the resulting corpus into
//! per-matchup averages. Page loading is abstracted behind
//! [`crawl::PageFetcher`] so no browser technology is assumed here.

pub mod aggregate;
pub mod config;
pub mod corpus;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod model;
pub mod teams;

pub use aggregate::{aggregate, aggregate_file, matchup_key, MatchupAverages, MatchupTable};
pub use config::{CrawlConfig, CrawlScope, DelayRange};
pub use crawl::{Checkpoint, CrawlReport, Crawler, PageFetcher, ReadyCondition};
pub use error::{BoxscoreError, Result};
pub use extract::{boxscore_links, extract_team_totals};
pub use model::{GameRecord, OrderedMap, StatValue, TeamStats, TeamTotals};
