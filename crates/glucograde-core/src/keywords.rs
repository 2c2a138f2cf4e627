//! Keyword spotting for identifiable objects
//!
//! Finds which known object (usually a food name) an utterance mentions,
//! e.g. "is this banana ok" → "banana".

/// Return the first keyword, in list order, contained in `sentence`.
///
/// Matching is case-insensitive substring matching. Empty keywords never match.
pub fn find_keyword<'k, S: AsRef<str>>(sentence: Option<&str>, keywords: &'k [S]) -> Option<&'k str> {
    let sentence = sentence.filter(|s| !s.is_empty())?;
    let lower = sentence.to_lowercase();

    keywords
        .iter()
        .map(|keyword| AsRef::<str>::as_ref(keyword))
        .filter(|keyword| !keyword.is_empty())
        .find(|keyword| lower.contains(&keyword.to_lowercase()))
}
