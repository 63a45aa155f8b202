//! Shared test doubles for the integration suites.

#![allow(dead_code)]

use async_trait::async_trait;
use boxscore::{BoxscoreError, PageFetcher, ReadyCondition, Result};
use std::collections::HashMap;
use std::time::Duration;

pub const BASE: &str = "https://www.basketball-reference.com";

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"))
}

pub fn schedule_url(code: &str) -> String {
    format!("{BASE}/teams/{code}/2025_games.html")
}

pub fn game_url(id: &str) -> String {
    format!("{BASE}/boxscores/{id}.html")
}

/// A schedule page linking to each of `game_ids`.
pub fn schedule_page(game_ids: &[String]) -> String {
    let rows: String = game_ids
        .iter()
        .map(|id| format!(r#"<tr><td><a href="/boxscores/{id}.html">Box Score</a></td></tr>"#))
        .collect();
    format!(r#"<html><body><table id="games"><tbody>{rows}</tbody></table></body></html>"#)
}

/// A minimal game page with one basic table per team.
pub fn game_page(home: &str, home_pts: u32, away: &str, away_pts: u32) -> String {
    let table = |code: &str, pts: u32| {
        format!(
            r#"<table id="box-{code}-game-basic">
                <thead><tr><th data-stat="player">Starters</th><th data-stat="mp">MP</th><th data-stat="pts">PTS</th></tr></thead>
                <tfoot><tr><th data-stat="player">Team Totals</th><td>240</td><td>{pts}</td></tr></tfoot>
            </table>"#
        )
    };
    format!(
        "<html><body>{}{}</body></html>",
        table(away, away_pts),
        table(home, home_pts)
    )
}

/// Serves canned pages and logs every request.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, String>,
    failures: HashMap<String, usize>,
    pub requests: Vec<String>,
    pub restarts: usize,
}

impl ScriptedFetcher {
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Fail the next `n` requests for `url` before serving it.
    pub fn with_failures(mut self, url: impl Into<String>, n: usize) -> Self {
        self.failures.insert(url.into(), n);
        self
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.requests.iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&mut self, url: &str) -> Result<String> {
        self.requests.push(url.to_string());
        if let Some(left) = self.failures.get_mut(url).filter(|n| **n > 0) {
            *left -= 1;
            return Err(BoxscoreError::Fetch {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_RESET".into(),
            });
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| BoxscoreError::Fetch {
                url: url.to_string(),
                reason: "404 Not Found".into(),
            })
    }

    async fn fetch_when_ready(
        &mut self,
        url: &str,
        ready: &ReadyCondition,
        timeout: Duration,
    ) -> Result<String> {
        let html = self.fetch(url).await?;
        if ready.is_met(&html) {
            Ok(html)
        } else {
            Err(BoxscoreError::ReadyTimeout {
                url: url.to_string(),
                condition: ready.to_string(),
                timeout,
            })
        }
    }

    async fn restart(&mut self) -> Result<()> {
        self.restarts += 1;
        Ok(())
    }
}
