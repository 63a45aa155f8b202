//! Team Totals extraction from boxscore tables.
//!
//! A game page carries one or more `box-<TEAM>-game-<kind>` tables per team
//! (basic, advanced). Each table's header row is resolved to stat names, the
//! leading identity column is detected, and the single "Team Totals" row is
//! mapped cell by cell onto those names. Tables for the same team are merged
//! in document order.

use crate::model::{TeamStats, TeamTotals};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::debug;

/// Leading-cell text that identifies the totals row.
pub const TEAM_TOTALS_LABEL: &str = "Team Totals";

struct Selectors {
    table: Selector,
    thead: Selector,
    row: Selector,
    header_cell: Selector,
    player_cell: Selector,
    th: Selector,
    td: Selector,
}

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| {
        let parse = |css: &str| Selector::parse(css).expect("static selector");
        Selectors {
            table: parse("table"),
            thead: parse("thead"),
            row: parse("tr"),
            header_cell: parse("th, td"),
            player_cell: parse(r#"th[data-stat="player"]"#),
            th: parse("th"),
            td: parse("td"),
        }
    })
}

fn boxscore_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^box-([A-Za-z0-9]+)-game-[A-Za-z0-9_-]+$").expect("static pattern")
    })
}

/// Team code from a `box-<TEAM>-game-<kind>` table id, upper-cased.
pub fn boxscore_team_code(table_id: &str) -> Option<String> {
    boxscore_id_pattern()
        .captures(table_id)
        .map(|caps| caps[1].to_ascii_uppercase())
}

/// Extract merged Team Totals for every team on a game page.
///
/// Returns `None` when no qualifying table produced a totals row.
pub fn extract_team_totals(html: &str) -> Option<TeamTotals> {
    let document = Html::parse_document(html);
    let sel = selectors();
    let mut totals = TeamTotals::new();

    for table in document.select(&sel.table) {
        let Some(table_id) = table.value().attr("id") else {
            continue;
        };
        let Some(team_code) = boxscore_team_code(table_id) else {
            continue;
        };

        let headers = resolve_headers(table);
        if headers.iter().all(String::is_empty) {
            debug!("skipping table {table_id}: no usable headers");
            continue;
        }
        let offset = header_offset(&headers);

        for row in table.select(&sel.row) {
            if !is_team_totals_row(row) {
                continue;
            }
            let stats = map_row(row, &headers, offset);
            totals
                .get_or_insert_with(&team_code, TeamStats::new)
                .merge(stats);
        }
    }

    if totals.is_empty() {
        None
    } else {
        Some(totals)
    }
}

/// Stat names from the last header row, or from the first row when the
/// table has no `<thead>`.
pub(crate) fn resolve_headers(table: ElementRef<'_>) -> Vec<String> {
    let sel = selectors();
    let header_row = match table.select(&sel.thead).next() {
        Some(thead) => thead.select(&sel.row).last(),
        None => table.select(&sel.row).next(),
    };
    let Some(header_row) = header_row else {
        return Vec::new();
    };
    header_row.select(&sel.header_cell).map(header_label).collect()
}

fn header_label(cell: ElementRef<'_>) -> String {
    if let Some(stat) = cell.value().attr("data-stat") {
        let stat = stat.trim();
        if !stat.is_empty() {
            return stat.to_string();
        }
    }
    cell_text(cell).to_lowercase().replace(' ', "_")
}

/// 1 when the first label is a player/starter name column (or blank), else 0.
pub(crate) fn header_offset(headers: &[String]) -> usize {
    let Some(lead) = headers.first() else {
        return 0;
    };
    let lead = lead.to_lowercase();
    if lead.is_empty() || lead.contains("player") || lead.contains("starter") {
        1
    } else {
        0
    }
}

fn is_team_totals_row(row: ElementRef<'_>) -> bool {
    let sel = selectors();
    let lead = row
        .select(&sel.player_cell)
        .next()
        .or_else(|| row.select(&sel.th).next());
    lead.is_some_and(|cell| cell_text(cell) == TEAM_TOTALS_LABEL)
}

fn map_row(row: ElementRef<'_>, headers: &[String], offset: usize) -> TeamStats {
    let mut stats = TeamStats::new();
    for (idx, cell) in row.select(&selectors().td).enumerate() {
        let name = match headers.get(idx + offset) {
            Some(label) if !label.is_empty() => label.clone(),
            _ => format!("col_{idx}"),
        };
        stats.insert(name, cell_text(cell));
    }
    stats
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().map(str::trim).collect()
}
