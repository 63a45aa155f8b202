//! Terminal summaries: colored symbols on stderr, JSON on stdout.

use std::io::IsTerminal;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Output mode chosen by the global flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mode {
    pub json: bool,
}

/// Color only when stderr is a terminal and `NO_COLOR` is unset.
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

/// Colored string builder.
pub struct Styled {
    use_color: bool,
}

impl Styled {
    /// Styling that follows [`color_enabled`].
    pub fn new() -> Self {
        Self {
            use_color: color_enabled(),
        }
    }

    /// Green checkmark symbol.
    pub fn ok_sym(&self) -> &str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    /// Yellow warning symbol.
    pub fn warn_sym(&self) -> &str {
        if self.use_color {
            "\x1b[33m\u{26a0}\x1b[0m"
        } else {
            "??"
        }
    }

    /// Green text.
    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    /// Yellow text.
    pub fn yellow(&self, s: &str) -> String {
        self.paint(YELLOW, s)
    }

    /// Dimmed text.
    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    /// Bold text.
    pub fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

/// Print JSON output to stdout.
pub fn print_json(value: &serde_json::Value) {
    if let Ok(s) = serde_json::to_string_pretty(value) {
        println!("{s}");
    }
}

/// Format a duration in seconds, e.g. "2h 14m".
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(8040), "2h 14m");
    }

    #[test]
    fn test_plain_styling_passes_text_through() {
        let s = Styled { use_color: false };
        assert_eq!(s.green("done"), "done");
        assert_eq!(s.ok_sym(), "OK");
    }
}
