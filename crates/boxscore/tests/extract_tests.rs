mod common;

use boxscore::{boxscore_links, extract_team_totals};
use common::{fixture, schedule_url};

#[test]
fn test_fixture_merges_basic_and_advanced_per_team() {
    let totals = extract_team_totals(&fixture("boxscore_atl_brk.html")).unwrap();

    assert_eq!(totals.keys().collect::<Vec<_>>(), vec!["ATL", "BRK"]);
    let atl = totals.get("ATL").unwrap();
    assert_eq!(
        atl.keys().collect::<Vec<_>>(),
        vec!["mp", "fg", "fga", "fg_pct", "pts", "ts_pct", "off_rtg", "def_rtg", "bpm"]
    );
    assert_eq!(atl.get("pts").map(String::as_str), Some("120"));
    assert_eq!(atl.get("off_rtg").map(String::as_str), Some("118.6"));
    assert_eq!(atl.get("bpm").map(String::as_str), Some(""));

    let brk = totals.get("BRK").unwrap();
    assert_eq!(brk.get("fg").map(String::as_str), Some("42"));
    assert_eq!(brk.get("ts_pct").map(String::as_str), Some(".552"));
}

#[test]
fn test_quarter_tables_do_not_leak_into_game_totals() {
    let totals = extract_team_totals(&fixture("boxscore_atl_brk.html")).unwrap();
    let atl = totals.get("ATL").unwrap();
    assert_ne!(atl.get("pts").map(String::as_str), Some("30"));
}

#[test]
fn test_extraction_is_deterministic() {
    let html = fixture("boxscore_atl_brk.html");
    let first = serde_json::to_string(&extract_team_totals(&html)).unwrap();
    let second = serde_json::to_string(&extract_team_totals(&html)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_page_without_boxscore_tables_yields_nothing() {
    assert!(extract_team_totals(&fixture("schedule_atl.html")).is_none());
    assert!(extract_team_totals("").is_none());
}

#[test]
fn test_schedule_links_resolved_and_deduplicated() {
    let links = boxscore_links(&fixture("schedule_atl.html"), &schedule_url("ATL"));
    assert_eq!(
        links,
        vec![
            "https://www.basketball-reference.com/boxscores/202410230BRK.html",
            "https://www.basketball-reference.com/boxscores/202410250CHO.html",
            "https://www.basketball-reference.com/boxscores/202410260ATL.html",
        ]
    );
}

#[test]
fn test_header_offset_detected_per_table_and_later_table_overrides() {
    let html = r#"
    <table id="box-ATL-game-basic">
        <thead><tr><th data-stat="player">Starters</th><th data-stat="mp">MP</th><th data-stat="pts">PTS</th></tr></thead>
        <tfoot><tr><th data-stat="player">Team Totals</th><td>240</td><td>110</td></tr></tfoot>
    </table>
    <table id="box-ATL-game-advanced">
        <thead><tr><th>PTS</th><th>ORtg</th><th>DRtg</th></tr></thead>
        <tbody><tr><th>Team Totals</th><td>111</td><td>118</td><td>112</td></tr></tbody>
    </table>"#;

    let totals = extract_team_totals(html).unwrap();
    let atl = totals.get("ATL").unwrap();

    assert_eq!(atl.keys().collect::<Vec<_>>(), vec!["mp", "pts", "ortg", "drtg"]);
    assert_eq!(atl.get("mp").map(String::as_str), Some("240"));
    assert_eq!(atl.get("pts").map(String::as_str), Some("111"));
    assert_eq!(atl.get("ortg").map(String::as_str), Some("118"));
    assert_eq!(atl.get("drtg").map(String::as_str), Some("112"));
}
