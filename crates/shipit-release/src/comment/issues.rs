//! Issue-closing keyword scanning.

use std::sync::LazyLock;

use regex::Regex;

static CLOSING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:close[sd]?|fix(?:e[sd])?|resolve[sd]?):?\s+(#\d+(?:\s*,\s*#\d+)*)")
        .expect("closing keyword pattern is valid")
});

static ISSUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("issue reference pattern is valid"));

/// Issue numbers referenced with a closing keyword, in order of first appearance.
///
/// Recognises `close`, `closes`, `closed`, `fix`, `fixes`, `fixed`,
/// `resolve`, `resolves`, `resolved` (any case) followed by one or more
/// comma-separated `#number` references.
pub fn closing_issue_numbers(text: &str) -> Vec<u64> {
    let mut numbers = Vec::new();
    for captures in CLOSING_RE.captures_iter(text) {
        let Some(list) = captures.get(1) else {
            continue;
        };
        for reference in ISSUE_RE.captures_iter(list.as_str()) {
            if let Ok(number) = reference[1].parse::<u64>() {
                if !numbers.contains(&number) {
                    numbers.push(number);
                }
            }
        }
    }
    numbers
}
