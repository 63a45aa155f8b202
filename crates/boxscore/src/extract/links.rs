//! Boxscore link discovery on schedule pages.

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

fn boxscore_path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/boxscores/[0-9A-Za-z]+\.html$").expect("static pattern"))
}

/// Whether a resolved URL has the shape of a single-game boxscore page.
pub fn is_boxscore_url(url: &Url) -> bool {
    boxscore_path_pattern().is_match(url.path())
}

/// Collect boxscore links from a schedule page, de-duplicated in first-seen order.
///
/// Relative hrefs are resolved against `page_url`; fragments and query strings
/// are dropped. If `page_url` itself does not parse, only absolute hrefs count.
pub fn boxscore_links(html: &str, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(anchor) = Selector::parse(r#"a[href*="/boxscores/"]"#) else {
        return Vec::new();
    };
    let base = Url::parse(page_url).ok();

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for el in document.select(&anchor) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let resolved = match &base {
            Some(base) => base.join(href.trim()),
            None => Url::parse(href.trim()),
        };
        let Ok(mut url) = resolved else {
            continue;
        };
        if !is_boxscore_url(&url) {
            continue;
        }
        url.set_fragment(None);
        url.set_query(None);
        let url = url.to_string();
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE: &str = "https://www.basketball-reference.com/teams/ATL/2025_games.html";

    #[test]
    fn test_boxscore_links_resolve_and_dedupe() {
        let html = r##"<table id="games">
            <tr><td><a href="/boxscores/202410230BRK.html">Box Score</a></td></tr>
            <tr><td><a href="https://www.basketball-reference.com/boxscores/202410250ATL.html#top">Box Score</a></td></tr>
            <tr><td><a href="/boxscores/202410230BRK.html">Box Score</a></td></tr>
            <tr><td><a href="/boxscores/?month=10&day=23&year=2024">Scores</a></td></tr>
            <tr><td><a href="/boxscores/pbp/202410230BRK.html">Play-by-play</a></td></tr>
            <tr><td><a href="/players/y/youngtr01.html">Trae Young</a></td></tr>
        </table>"##;

        let links = boxscore_links(html, SCHEDULE);
        assert_eq!(
            links,
            vec![
                "https://www.basketball-reference.com/boxscores/202410230BRK.html",
                "https://www.basketball-reference.com/boxscores/202410250ATL.html",
            ]
        );
    }

    #[test]
    fn test_boxscore_links_without_base() {
        let html = r#"<a href="/boxscores/1.html">rel</a><a href="https://x.test/boxscores/2.html">abs</a>"#;
        assert_eq!(boxscore_links(html, "not a url"), vec!["https://x.test/boxscores/2.html"]);
    }

    #[test]
    fn test_no_links() {
        assert!(boxscore_links("<p>nothing</p>", SCHEDULE).is_empty());
    }
}
