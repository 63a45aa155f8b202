//! A [`PageFetcher`] over one chromiumoxide browser session.

use super::stealth;
use async_trait::async_trait;
use boxscore::{BoxscoreError, PageFetcher, ReadyCondition, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy)]
pub struct LaunchOptions {
    pub headless: bool,
    /// Upper bound on a single navigation.
    pub navigation_timeout: Duration,
}

struct Session {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl Session {
    async fn launch(options: &LaunchOptions) -> Result<Self> {
        let user_agent = stealth::random_user_agent();
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--user-agent={user_agent}"))
            .window_size(1920, 1080);
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(launch_error)?;

        let (browser, mut events) = Browser::launch(config).await.map_err(launch_error)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!("browser event error: {e}");
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(launch_error)?;
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            stealth::STEALTH_SCRIPT,
        ))
        .await
        .map_err(launch_error)?;

        info!("browser session started (headless: {})", options.headless);
        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!("browser close failed: {e}");
        }
        let _ = self.browser.wait().await;
        self.handler.abort();
    }
}

fn launch_error(e: impl Display) -> BoxscoreError {
    BoxscoreError::Fetch {
        url: "about:blank".to_string(),
        reason: format!("browser launch failed: {e}"),
    }
}

/// Await `read`, giving up once `deadline` passes. A read that is already
/// ready still completes.
async fn before_deadline<T>(deadline: Instant, read: impl Future<Output = T>) -> Option<T> {
    tokio::time::timeout_at(deadline, read).await.ok()
}

fn fetch_error(url: &str, e: impl Display) -> BoxscoreError {
    BoxscoreError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    }
}

/// Loads pages in a single reused tab; one navigation at a time.
pub struct ChromeFetcher {
    options: LaunchOptions,
    session: Option<Session>,
}

impl ChromeFetcher {
    pub async fn launch(options: LaunchOptions) -> Result<Self> {
        let session = Session::launch(&options).await?;
        Ok(Self {
            options,
            session: Some(session),
        })
    }

    pub async fn close(mut self) {
        if let Some(session) = self.session.take() {
            session.shutdown().await;
        }
    }

    /// Navigate the shared tab, relaunching first if a restart left no session.
    async fn navigate(&mut self, url: &str) -> Result<Page> {
        let session = match self.session.take() {
            Some(session) => session,
            None => Session::launch(&self.options).await?,
        };
        let page = self.session.insert(session).page.clone();

        match tokio::time::timeout(self.options.navigation_timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(page),
            Ok(Err(e)) => Err(fetch_error(url, e)),
            Err(_) => Err(fetch_error(
                url,
                format!(
                    "navigation timed out after {:?}",
                    self.options.navigation_timeout
                ),
            )),
        }
    }
}

#[async_trait]
impl PageFetcher for ChromeFetcher {
    async fn fetch(&mut self, url: &str) -> Result<String> {
        let page = self.navigate(url).await?;
        page.content().await.map_err(|e| fetch_error(url, e))
    }

    async fn fetch_when_ready(
        &mut self,
        url: &str,
        ready: &ReadyCondition,
        timeout: Duration,
    ) -> Result<String> {
        let page = self.navigate(url).await?;
        let deadline = Instant::now() + timeout;
        let timed_out = || BoxscoreError::ReadyTimeout {
            url: url.to_string(),
            condition: ready.to_string(),
            timeout,
        };
        loop {
            let html = before_deadline(deadline, page.content())
                .await
                .ok_or_else(timed_out)?
                .map_err(|e| fetch_error(url, e))?;
            if ready.is_met(&html) {
                return Ok(html);
            }
            if Instant::now() >= deadline {
                return Err(timed_out());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn restart(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            session.shutdown().await;
        }
        self.session = Some(Session::launch(&self.options).await?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hung_read_gives_up_at_deadline() {
        let deadline = Instant::now() + Duration::from_millis(20);
        let started = Instant::now();
        let read = before_deadline(deadline, std::future::pending::<String>()).await;
        assert!(read.is_none());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_ready_read_completes_even_past_deadline() {
        let deadline = Instant::now();
        let read = before_deadline(deadline, async { 42 }).await;
        assert_eq!(read, Some(42));
    }
}
