//! The page-fetching capability the crawler drives.
//!
//! Implementations own a stateful browser session; one fetch is in flight at
//! a time, which the `&mut self` receivers enforce.

use crate::error::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::fmt;
use std::time::Duration;

/// A condition on rendered HTML that marks a page as ready to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyCondition {
    /// CSS selector that must match at least one element.
    pub selector: String,
    /// Exact trimmed text one matching element must carry, if set.
    pub text: Option<String>,
}

impl ReadyCondition {
    pub fn element(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            text: None,
        }
    }

    pub fn element_with_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            text: Some(text.into()),
        }
    }

    /// Schedule pages are ready once the games table exists.
    pub fn schedule_page() -> Self {
        Self::element("#games")
    }

    /// Game pages are ready once a Team Totals row has rendered.
    pub fn boxscore_page() -> Self {
        Self::element_with_text(
            r#"th[data-stat="player"]"#,
            crate::extract::TEAM_TOTALS_LABEL,
        )
    }

    /// Evaluate the condition against a rendered document.
    ///
    /// An unparseable selector never matches.
    pub fn is_met(&self, html: &str) -> bool {
        let Ok(selector) = Selector::parse(&self.selector) else {
            return false;
        };
        let document = Html::parse_document(html);
        let mut matches = document.select(&selector);
        match &self.text {
            None => matches.next().is_some(),
            Some(expected) => matches.any(|el| el.text().collect::<String>().trim() == expected),
        }
    }
}

impl fmt::Display for ReadyCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{} with text {text:?}", self.selector),
            None => f.write_str(&self.selector),
        }
    }
}

/// Loads rendered pages for the crawler.
#[async_trait]
pub trait PageFetcher: Send {
    /// Load `url` and return its rendered HTML.
    async fn fetch(&mut self, url: &str) -> Result<String>;

    /// Load `url` and wait up to `timeout` for `ready` to hold.
    ///
    /// Fails with [`crate::BoxscoreError::ReadyTimeout`] when it never does.
    async fn fetch_when_ready(
        &mut self,
        url: &str,
        ready: &ReadyCondition,
        timeout: Duration,
    ) -> Result<String>;

    /// Tear down and recreate the underlying session before a retry.
    async fn restart(&mut self) -> Result<()> {
        Ok(())
    }
}
