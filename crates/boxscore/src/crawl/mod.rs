//! Crawl orchestration: fetcher capability, checkpointing, and the crawl loop.

pub mod checkpoint;
pub mod crawler;
pub mod fetcher;

pub use checkpoint::{Checkpoint, CrawlState};
pub use crawler::{CrawlReport, Crawler, TeamCrawl};
pub use fetcher::{PageFetcher, ReadyCondition};
