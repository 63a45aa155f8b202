//! `boxscore aggregate` - fold a corpus into matchup averages.

use crate::cli::output::{self, Mode, Styled};
use anyhow::{Context, Result};
use std::path::Path;

/// Aggregate `input` into `output_path` and report the matchup count.
pub fn run(input: &Path, output_path: &Path, mode: Mode) -> Result<()> {
    let table = boxscore::aggregate_file(input, output_path)
        .with_context(|| format!("failed to aggregate {}", input.display()))?;

    if mode.json {
        output::print_json(&serde_json::json!({
            "input": input,
            "output": output_path,
            "matchups": table.len(),
        }));
        return Ok(());
    }

    let s = Styled::new();
    eprintln!(
        "  {} {} matchups written to {}",
        s.ok_sym(),
        s.bold(&table.len().to_string()),
        output_path.display()
    );
    Ok(())
}
