//! Slug normalisation shared by author profiles and post metadata

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^a-z0-9_\-]+").unwrap();
    static ref HYPHEN_RUN: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Turn a display string into a URL-safe slug
///
/// Lowercases, turns whitespace runs into `-`, drops everything outside
/// `[a-z0-9_-]`, collapses repeated hyphens and trims them from both ends.
/// The result is a fixed point: slugifying a slug returns it unchanged.
///
/// # Examples
/// ```
/// use quire::helpers::slugify;
/// assert_eq!(slugify("Jane Doe"), "jane-doe");
/// assert_eq!(slugify("jane-doe"), "jane-doe");
/// ```
pub fn slugify(s: &str) -> String {
    let lower = s.to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lower, "-");
    let stripped = NON_WORD.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUN.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}
