// src/normalize/headers.rs

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static header pattern"));

/// Canonical form of a column header: trimmed, lowercased, and every run of
/// characters outside `[a-z0-9]` collapsed to one `_`.
pub fn normalize_header(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    NON_ALNUM_RUN.replace_all(&lowered, "_").into_owned()
}
