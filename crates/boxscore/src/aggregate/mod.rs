//! Matchup aggregation: fold per-game team totals into per-matchup averages.
//!
//! Games are grouped by the unordered pair of teams they involve. Within a
//! group every numeric stat observation is averaged per team; absent values
//! are dropped observation by observation. Groups are independent, so they
//! are averaged on the rayon pool and merged into a sorted map.

use crate::corpus;
use crate::error::Result;
use crate::model::{GameRecord, OrderedMap, StatValue};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Canonical key for an unordered pair of team codes, e.g. `ATL_vs_BRK`.
pub fn matchup_key(a: &str, b: &str) -> String {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    format!("{first}_vs_{second}")
}

/// Averages for one matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupAverages {
    /// Team code → stat name → mean rounded to 3 places.
    #[serde(flatten)]
    pub teams: BTreeMap<String, OrderedMap<f64>>,
    /// Always 1: a sanity signal that the matchup pairs two teams, not a
    /// game tally.
    pub games_count: usize,
}

/// Matchup key → averages, sorted by key.
pub type MatchupTable = BTreeMap<String, MatchupAverages>;

#[derive(Debug, Clone, Copy, Default)]
struct Running {
    sum: f64,
    count: usize,
}

impl Running {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| round3(self.sum / self.count as f64))
    }
}

/// Round the exact binary value to 3 places, ties to even.
fn round3(value: f64) -> f64 {
    format!("{value:.3}").parse().unwrap_or(value)
}

/// Average every matchup in `records`.
///
/// Records without exactly two teams are skipped, as are matchups with no
/// numeric observation at all. Each group is folded in game-URL order, so the
/// result does not depend on the order of `records`.
pub fn aggregate(records: &[GameRecord]) -> MatchupTable {
    let mut groups: BTreeMap<String, Vec<&GameRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.is_well_formed()) {
        let codes: Vec<&str> = record.totals.keys().collect();
        groups
            .entry(matchup_key(codes[0], codes[1]))
            .or_default()
            .push(record);
    }

    groups
        .into_par_iter()
        .filter_map(|(key, mut games)| {
            games.sort_by(|a, b| a.game_url.cmp(&b.game_url));
            average_group(&games).map(|averages| (key, averages))
        })
        .collect()
}

fn average_group(games: &[&GameRecord]) -> Option<MatchupAverages> {
    let mut running: BTreeMap<String, OrderedMap<Running>> = BTreeMap::new();
    for game in games {
        for (team, stats) in game.totals.iter() {
            for (stat, raw) in stats.iter() {
                if let Some(value) = StatValue::parse(raw).as_f64() {
                    running
                        .entry(team.to_string())
                        .or_default()
                        .get_or_insert_with(stat, Running::default)
                        .push(value);
                }
            }
        }
    }

    let teams: BTreeMap<String, OrderedMap<f64>> = running
        .into_iter()
        .map(|(team, stats)| {
            let means = stats
                .into_iter()
                .filter_map(|(stat, r)| r.mean().map(|m| (stat, m)))
                .collect();
            (team, means)
        })
        .collect();

    if teams.is_empty() {
        return None;
    }
    Some(MatchupAverages {
        teams,
        games_count: 1,
    })
}

/// Read a corpus, aggregate it, and write the averages atomically.
///
/// Any read or parse failure is returned before anything is written.
pub fn aggregate_file(input: &Path, output: &Path) -> Result<MatchupTable> {
    let records = corpus::read_records(input)?;
    info!("processing {} games from {}", records.len(), input.display());
    let table = aggregate(&records);
    corpus::write_json_atomic(output, &table)?;
    info!(
        "saved {} matchup averages to {}",
        table.len(),
        output.display()
    );
    Ok(table)
}
