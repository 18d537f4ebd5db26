//! Published-results parsing: one record per line, the item code being the
//! leading decimal digits of the second field. Mirrors the shape of the
//! upstream results table after it has been flattened to text.

use std::sync::OnceLock;

use regex::Regex;
use swx_engine::PublishedCodes;

fn code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)").expect("static regex"))
}

/// Parse the published-results text into a code set. Lines are split on tabs
/// or pipes; the code is the leading digits of the second field (falling back
/// to the first when a line has only one). Malformed lines are skipped, never
/// fatal: a missing results feed simply yields an empty set.
pub fn parse_published_codes(text: &str) -> PublishedCodes {
    let mut codes = PublishedCodes::new();
    for line in text.lines() {
        let fields: Vec<&str> = line.split(['\t', '|']).map(str::trim).collect();
        let candidate = match fields.as_slice() {
            [] | [""] => continue,
            [only] => *only,
            [_, second, ..] => *second,
        };
        if let Some(m) = code_re().captures(candidate) {
            codes.insert(m[1].to_string());
        }
    }
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_come_from_the_second_field() {
        let text = "1\t412 - Oppana (Girls)\tHSS\n2\t507 Kathakali\tHS\n";
        let codes = parse_published_codes(text);
        assert_eq!(codes.len(), 2);
        assert!(codes.contains("412"));
        assert!(codes.contains("507"));
    }

    #[test]
    fn pipe_separated_lines_also_parse() {
        let codes = parse_published_codes("3 | 230 Mangalam Kali | UP\n");
        assert!(codes.contains("230"));
    }

    #[test]
    fn single_field_lines_use_that_field() {
        let codes = parse_published_codes("412\n507\n");
        assert!(codes.contains("412"));
        assert!(codes.contains("507"));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let text = "no code here\n\n4\tItem Without Code\n5\t101 Nadakam\n";
        let codes = parse_published_codes(text);
        assert_eq!(codes.len(), 1);
        assert!(codes.contains("101"));
    }

    #[test]
    fn duplicate_codes_collapse() {
        let codes = parse_published_codes("1\t412 A\n2\t412 B\n");
        assert_eq!(codes.len(), 1);
    }

    #[test]
    fn empty_text_is_an_empty_set() {
        assert!(parse_published_codes("").is_empty());
    }
}
