// steward-core/src/domain/mapping/script.rs

/// Iterates over the meaningful lines of a pasted script.
///
/// Blank lines and lines opening a `--` or `/*` comment are skipped, and a
/// single trailing comma is removed from what remains.
pub fn logical_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter_map(clean_line)
}

pub fn clean_line(raw: &str) -> Option<&str> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with("--") || line.starts_with("/*") {
        return None;
    }
    let line = line.strip_suffix(',').unwrap_or(line).trim_end();
    if line.is_empty() { None } else { Some(line) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blanks_are_skipped() {
        let text = "\n  -- a comment\n/* block */\n   \nCOL_A VARCHAR(10),\n";
        let lines: Vec<&str> = logical_lines(text).collect();
        assert_eq!(lines, vec!["COL_A VARCHAR(10)"]);
    }

    #[test]
    fn test_only_one_trailing_comma_is_removed() {
        assert_eq!(clean_line("  A AS B,, "), Some("A AS B,"));
        assert_eq!(clean_line(","), None);
    }
}
