const JOIN_SUFFIXES: [&str; 2] = ["_cr", "_ag"];

/// Lowercase, collapse whitespace, and drop the join suffix a merged export appends.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase();

    JOIN_SUFFIXES
        .iter()
        .find_map(|suffix| collapsed.strip_suffix(suffix))
        .map(str::to_string)
        .unwrap_or(collapsed)
}

/// Trim a free-text cell; blank cells become `None`.
pub(crate) fn clean_text(value: &str) -> Option<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Two-letter postal abbreviation, uppercased.
pub(crate) fn clean_state(value: &str) -> Option<String> {
    clean_text(value).map(|state| state.to_ascii_uppercase())
}

/// Parse a numeric cell, tolerating thousands separators, currency and percent signs.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let stripped: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '%'))
        .collect();
    if stripped.is_empty() {
        return None;
    }
    stripped.parse::<f64>().ok().filter(|number| number.is_finite())
}

pub(crate) fn parse_flag(value: &str) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => true,
        other => parse_number(other).is_some_and(|number| number == 1.0),
    }
}
