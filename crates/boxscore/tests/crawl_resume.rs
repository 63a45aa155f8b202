mod common;

use boxscore::corpus;
use boxscore::{CrawlConfig, CrawlScope, Crawler, DelayRange, GameRecord};
use common::{game_page, game_url, schedule_page, schedule_url, ScriptedFetcher};
use std::path::Path;

fn config(dir: &Path, scope: CrawlScope) -> CrawlConfig {
    CrawlConfig {
        scope,
        output_path: dir.join("team_totals.json"),
        delay_range: DelayRange::none(),
        session_retry_backoff_ms: 0,
        ..Default::default()
    }
    .validate()
    .unwrap()
}

fn team(code: &str) -> CrawlScope {
    CrawlScope::Team { code: code.into() }
}

fn game_ids(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix}{i:03}")).collect()
}

/// ATL's schedule with one page per game, all against BOS.
fn atl_season(ids: &[String]) -> ScriptedFetcher {
    ids.iter().enumerate().fold(
        ScriptedFetcher::default().with_page(schedule_url("ATL"), schedule_page(ids)),
        |f, (i, id)| f.with_page(game_url(id), game_page("ATL", 100 + i as u32, "BOS", 95)),
    )
}

fn already_collected(url: &str) -> GameRecord {
    let html = game_page("ATL", 1, "BOS", 1);
    GameRecord::new(
        Some("ATL".into()),
        url,
        boxscore::extract_team_totals(&html).unwrap(),
    )
}

#[tokio::test]
async fn test_resume_skips_checkpointed_games() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), team("ATL"));
    let ids = game_ids("2024110", 10);
    let checkpoint = config.checkpoint_path("ATL");
    let seeded: Vec<GameRecord> = ids[..3]
        .iter()
        .map(|id| already_collected(&game_url(id)))
        .collect();
    corpus::write_records(&checkpoint, &seeded).unwrap();

    let mut crawler = Crawler::new(atl_season(&ids), config.clone());
    let report = crawler.run_to_file().await.unwrap();
    let fetcher = crawler.into_fetcher();

    for id in &ids[..3] {
        assert_eq!(fetcher.fetch_count(&game_url(id)), 0, "{id} re-fetched");
    }
    for id in &ids[3..] {
        assert_eq!(fetcher.fetch_count(&game_url(id)), 1);
    }

    let saved = corpus::read_records(&config.output_path).unwrap();
    assert_eq!(saved.len(), 10);
    assert_eq!(report.records.len(), 10);
    assert_eq!(&saved[..3], &seeded[..]);
    assert!(!checkpoint.exists());
}

#[tokio::test]
async fn test_failed_game_does_not_abort_crawl() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), team("ATL"));
    let ids = game_ids("2024120", 5);
    let broken = game_url(&ids[1]);
    let fetcher = atl_season(&ids).with_page(broken.clone(), "<html><body>rate limited</body></html>");

    let mut crawler = Crawler::new(fetcher, config);
    let report = crawler.run_to_file().await.unwrap();

    assert_eq!(report.records.len(), 4);
    assert!(report.records.iter().all(|r| r.game_url != broken));
    assert!(report.abandoned.is_empty());
    assert_eq!(report.finished.len(), 1);
}

#[tokio::test]
async fn test_schedule_exhaustion_keeps_partial_results_and_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), team("ATL"));
    let checkpoint = config.checkpoint_path("ATL");
    let seeded = vec![already_collected(&game_url("202410230BRK"))];
    corpus::write_records(&checkpoint, &seeded).unwrap();

    let mut crawler = Crawler::new(ScriptedFetcher::default(), config.clone());
    let report = crawler.run_to_file().await.unwrap();
    let fetcher = crawler.into_fetcher();

    assert_eq!(fetcher.fetch_count(&schedule_url("ATL")), 3);
    assert_eq!(fetcher.restarts, 2);
    assert_eq!(report.abandoned, vec!["ATL".to_string()]);
    assert_eq!(corpus::read_records(&config.output_path).unwrap(), seeded);
    assert!(checkpoint.exists());
}

#[tokio::test]
async fn test_schedule_retry_recovers_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), team("ATL"));
    let ids = game_ids("2024130", 2);
    let fetcher = atl_season(&ids).with_failures(schedule_url("ATL"), 2);

    let mut crawler = Crawler::new(fetcher, config);
    let targets = crawler.discover_targets("ATL").await.unwrap();
    let fetcher = crawler.into_fetcher();

    assert_eq!(targets, vec![game_url(&ids[0]), game_url(&ids[1])]);
    assert_eq!(fetcher.fetch_count(&schedule_url("ATL")), 3);
    assert_eq!(fetcher.restarts, 2);
}

#[tokio::test]
async fn test_team_scope_skips_games_without_the_team() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), team("ATL"));
    let ids = game_ids("2024140", 2);
    let fetcher = atl_season(&ids).with_page(game_url(&ids[1]), game_page("MIA", 110, "BOS", 101));

    let mut crawler = Crawler::new(fetcher, config);
    let report = crawler.run().await;

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].game_url, game_url(&ids[0]));
    assert_eq!(report.records[0].team.as_deref(), Some("ATL"));
}

#[tokio::test]
async fn test_matchup_scope_keeps_only_head_to_head_games() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(
        dir.path(),
        CrawlScope::Matchup {
            a: "atl".into(),
            b: "bos".into(),
        },
    );
    let ids = game_ids("2024150", 3);
    let fetcher = atl_season(&ids).with_page(game_url(&ids[2]), game_page("ATL", 99, "MIA", 98));

    let mut crawler = Crawler::new(fetcher, config.clone());
    let report = crawler.run_to_file().await.unwrap();

    assert_eq!(report.records.len(), 2);
    assert!(report
        .records
        .iter()
        .all(|r| r.totals.contains_key("ATL") && r.totals.contains_key("BOS")));
    assert!(!config.checkpoint_path("ATL_vs_BOS").exists());
}

#[tokio::test]
async fn test_all_teams_fetches_shared_games_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = CrawlConfig {
        retry_limit: 1,
        ..config(dir.path(), CrawlScope::AllTeams)
    };
    let shared = "202410230BRK".to_string();
    let brk_only = "202410250BRK".to_string();
    let fetcher = ScriptedFetcher::default()
        .with_page(schedule_url("ATL"), schedule_page(&[shared.clone()]))
        .with_page(
            schedule_url("BRK"),
            schedule_page(&[shared.clone(), brk_only.clone()]),
        )
        .with_page(game_url(&shared), game_page("BRK", 116, "ATL", 120))
        .with_page(game_url(&brk_only), game_page("BRK", 101, "BOS", 99));

    let mut crawler = Crawler::new(fetcher, config);
    let report = crawler.run_to_file().await.unwrap();
    let fetcher = crawler.into_fetcher();

    assert_eq!(fetcher.fetch_count(&game_url(&shared)), 1);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].team.as_deref(), Some("ATL"));
    assert_eq!(report.records[1].team.as_deref(), Some("BRK"));
    assert_eq!(report.finished.len(), 2);
    assert_eq!(report.abandoned.len(), 28);
    assert_eq!(fetcher.restarts, 0);
}
