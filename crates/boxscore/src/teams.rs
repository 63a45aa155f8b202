//! Franchise table and team-code helpers.

/// Every current franchise, full name → site team code, in crawl order.
pub const FRANCHISES: &[(&str, &str)] = &[
    ("Atlanta Hawks", "ATL"),
    ("Boston Celtics", "BOS"),
    ("Brooklyn Nets", "BRK"),
    ("Charlotte Hornets", "CHO"),
    ("Chicago Bulls", "CHI"),
    ("Cleveland Cavaliers", "CLE"),
    ("Dallas Mavericks", "DAL"),
    ("Denver Nuggets", "DEN"),
    ("Detroit Pistons", "DET"),
    ("Golden State Warriors", "GSW"),
    ("Houston Rockets", "HOU"),
    ("Indiana Pacers", "IND"),
    ("LA Clippers", "LAC"),
    ("Los Angeles Lakers", "LAL"),
    ("Memphis Grizzlies", "MEM"),
    ("Miami Heat", "MIA"),
    ("Milwaukee Bucks", "MIL"),
    ("Minnesota Timberwolves", "MIN"),
    ("New Orleans Pelicans", "NOP"),
    ("New York Knicks", "NYK"),
    ("Oklahoma City Thunder", "OKC"),
    ("Orlando Magic", "ORL"),
    ("Philadelphia 76ers", "PHI"),
    ("Phoenix Suns", "PHO"),
    ("Portland Trail Blazers", "POR"),
    ("Sacramento Kings", "SAC"),
    ("San Antonio Spurs", "SAS"),
    ("Toronto Raptors", "TOR"),
    ("Utah Jazz", "UTA"),
    ("Washington Wizards", "WAS"),
];

/// All franchise codes in table order.
pub fn all_codes() -> impl Iterator<Item = &'static str> {
    FRANCHISES.iter().map(|(_, code)| *code)
}

/// Full franchise name for a code, if it is in the table.
pub fn franchise_name(code: &str) -> Option<&'static str> {
    FRANCHISES
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(code))
        .map(|(name, _)| *name)
}

/// Normalize a team code to upper case, rejecting anything that is not 2-4 ASCII letters.
pub fn normalize_code(raw: &str) -> Option<String> {
    let code = raw.trim();
    let valid = (2..=4).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic());
    valid.then(|| code.to_ascii_uppercase())
}

/// Season schedule page for one team.
pub fn schedule_url(base_url: &str, code: &str, season: u16) -> String {
    format!(
        "{}/teams/{}/{}_games.html",
        base_url.trim_end_matches('/'),
        code,
        season
    )
}
