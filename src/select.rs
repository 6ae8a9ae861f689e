// Parsers for free-text menu selections: comma-separated 1-based indices and
// year lists with inclusive `Y1:Y2` ranges.
//
// Both parsers are permissive: invalid tokens are dropped, never fatal, and
// an empty result is a valid outcome the caller reports as "no data". The
// `_report` variants also return the dropped tokens so tests (and curious
// callers) can see what was ignored.

/// Resolve an index selection like `"1,3,5"` against a list of `max_count`
/// items. Empty input selects everything. Tokens are 1-based on the way in
/// and 0-based on the way out; duplicates collapse and the result is sorted.
pub fn parse_index_selection(text: &str, max_count: usize) -> Vec<usize> {
    parse_index_selection_report(text, max_count).0
}

pub fn parse_index_selection_report(text: &str, max_count: usize) -> (Vec<usize>, Vec<String>) {
    if text.trim().is_empty() {
        return ((0..max_count).collect(), Vec::new());
    }
    let mut picked: Vec<usize> = Vec::new();
    let mut ignored: Vec<String> = Vec::new();
    for token in text.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match token.parse::<usize>() {
            Ok(n) if (1..=max_count).contains(&n) => picked.push(n - 1),
            _ => ignored.push(token.to_string()),
        }
    }
    picked.sort_unstable();
    picked.dedup();
    (picked, ignored)
}

/// Resolve a year selection against the years actually present in the data.
///
/// Empty input selects all years. Each comma-separated token is tried as,
/// in order:
/// - an inclusive range `Y1:Y2` (ends swapped if reversed; a non-integer
///   bound invalidates the whole token),
/// - a literal year present in `available`,
/// - a 1-based index into `available`,
/// - a raw literal match.
///
/// The result is deduplicated and sorted by integer year value.
pub fn parse_year_selection(text: &str, available: &[String]) -> Vec<String> {
    parse_year_selection_report(text, available).0
}

pub fn parse_year_selection_report(
    text: &str,
    available: &[String],
) -> (Vec<String>, Vec<String>) {
    let mut picked: Vec<String> = Vec::new();
    let mut ignored: Vec<String> = Vec::new();
    if text.trim().is_empty() {
        picked = available.to_vec();
    } else {
        for token in text.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if token.contains(':') {
                match parse_range(token) {
                    Some((lo, hi)) => {
                        for year in available {
                            if let Ok(y) = year.parse::<i32>() {
                                if (lo..=hi).contains(&y) {
                                    picked.push(year.clone());
                                }
                            }
                        }
                    }
                    None => ignored.push(token.to_string()),
                }
            } else if token.chars().all(|c| c.is_ascii_digit()) {
                if available.iter().any(|y| y == token) {
                    picked.push(token.to_string());
                } else {
                    // Not a literal year; reinterpret as a 1-based index.
                    match token.parse::<usize>() {
                        Ok(n) if (1..=available.len()).contains(&n) => {
                            picked.push(available[n - 1].clone())
                        }
                        _ => ignored.push(token.to_string()),
                    }
                }
            } else if available.iter().any(|y| y == token) {
                picked.push(token.to_string());
            } else {
                ignored.push(token.to_string());
            }
        }
    }
    picked.sort_by_key(|y| y.parse::<i64>().unwrap_or(0));
    picked.dedup();
    (picked, ignored)
}

fn parse_range(token: &str) -> Option<(i32, i32)> {
    let (a, b) = token.split_once(':')?;
    let a = a.trim().parse::<i32>().ok()?;
    let b = b.trim().parse::<i32>().ok()?;
    Some((a.min(b), a.max(b)))
}
