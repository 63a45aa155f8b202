//! `boxscore teams` - print the franchise table.

use crate::cli::output::{self, Mode};
use boxscore::teams::FRANCHISES;

/// Print every franchise code and name.
pub fn run(mode: Mode) {
    if mode.json {
        let rows: Vec<_> = FRANCHISES
            .iter()
            .map(|(name, code)| serde_json::json!({ "code": code, "name": name }))
            .collect();
        output::print_json(&serde_json::Value::Array(rows));
        return;
    }
    for (name, code) in FRANCHISES {
        println!("{code:<4} {name}");
    }
}
