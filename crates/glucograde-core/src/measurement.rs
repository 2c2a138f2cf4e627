//! Utterance → measurement
//!
//! Normalizes spoken number words, then reads the first numeral.

use crate::extract::first_number;
use crate::numbers::normalize;

/// Extract a numeric measurement from a transcribed utterance.
///
/// Works for digits ("My score is 42") as well as words
/// ("ninety nine point zero one"). `None` means the caller should ask the
/// user to repeat.
pub fn measurement_from_utterance(sentence: Option<&str>) -> Option<f64> {
    let sentence = sentence?;
    let normalized = normalize(sentence);
    tracing::debug!("Normalized utterance: {}", normalized);
    first_number(&normalized)
}
