//! HTML extraction: Team Totals tables on game pages, boxscore links on schedule pages.
//!
//! All entry points are synchronous; `scraper` documents are not `Send`, so
//! callers parse and drop them between awaits.

pub mod links;
pub mod table;

pub use links::boxscore_links;
pub use table::{extract_team_totals, TEAM_TOTALS_LABEL};
