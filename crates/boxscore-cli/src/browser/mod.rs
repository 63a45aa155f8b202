//! Chromium-backed page loading for the crawler.

mod chrome;
mod stealth;

pub use chrome::{ChromeFetcher, LaunchOptions};
