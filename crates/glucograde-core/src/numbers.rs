//! Spoken number normalization
//!
//! Rewrites English number words in a transcribed sentence into digits,
//! e.g. "one hundred and thirty four point twelve" → "134.12". Every other
//! token passes through untouched, and punctuation trailing the last
//! number word is carried over to the digits.

/// A token of the original sentence alongside its matching form
struct Token<'a> {
    text: &'a str,
    clean: String,
}

fn tokenize(sentence: &str) -> Vec<Token<'_>> {
    sentence
        .split(' ')
        .map(|text| Token {
            text,
            clean: clean_token(text),
        })
        .collect()
}

/// Lowercase and strip surrounding characters outside `[A-Za-z0-9-]`
fn clean_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .to_lowercase()
}

/// Trailing run of characters that are neither word characters nor hyphens
fn trailing_punct(token: &str) -> &str {
    let trimmed = token.trim_end_matches(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'));
    &token[trimmed.len()..]
}

//=============================================================================
// Number Tables
//=============================================================================

pub(crate) const UNITS: &[(&str, u64)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

pub(crate) const TENS: &[(&str, u64)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

fn parse_unit(w: &str) -> Option<u64> {
    UNITS.iter().find(|(name, _)| *name == w).map(|(_, v)| *v)
}

fn parse_tens(w: &str) -> Option<u64> {
    TENS.iter().find(|(name, _)| *name == w).map(|(_, v)| *v)
}

//=============================================================================
// Core Number Parser
//=============================================================================

/// Whole part plus the digit string spoken after "point"
#[derive(Debug, Default, PartialEq)]
struct ParsedNumber {
    whole: u64,
    fraction: String,
}

impl ParsedNumber {
    fn render(&self) -> String {
        if self.fraction.is_empty() {
            self.whole.to_string()
        } else {
            format!("{}.{}", self.whole, self.fraction)
        }
    }
}

/// Parse a whole number starting at `start`.
/// Returns (value, index just past the run)
fn parse_whole(tokens: &[Token], start: usize) -> Option<(u64, usize)> {
    let mut acc: u64 = 0;
    let mut found = false;
    let mut i = start;

    while i < tokens.len() {
        let t = tokens[i].clean.as_str();

        if t.is_empty() {
            break;
        }

        if t == "and" {
            i += 1;
            continue;
        }

        if let Some(unit) = parse_unit(t) {
            acc = acc.saturating_add(unit);
            found = true;
            i += 1;
            continue;
        }

        if let Some(tens) = parse_tens(t) {
            acc = acc.saturating_add(tens);
            found = true;
            i += 1;
            // "twenty one"
            if let Some(extra) = tokens.get(i).and_then(|next| parse_unit(&next.clean)) {
                acc = acc.saturating_add(extra);
                i += 1;
            }
            continue;
        }

        if t == "hundred" {
            acc = if acc == 0 { 100 } else { acc.saturating_mul(100) };
            found = true;
            i += 1;
            continue;
        }

        break;
    }

    if found {
        Some((acc, i))
    } else {
        None
    }
}

/// Collect the digits spoken after "point". Each word contributes its digit
/// string, so "point one two" is ".12" and "point twelve" is ".12" as well.
/// Returns (digits, index just past the run)
fn parse_fraction(tokens: &[Token], start: usize) -> (String, usize) {
    let mut digits = String::new();
    let mut i = start;

    while i < tokens.len() {
        let t = tokens[i].clean.as_str();

        if let Some(unit) = parse_unit(t) {
            digits.push_str(&unit.to_string());
            i += 1;
        } else if let Some(tens) = parse_tens(t) {
            i += 1;
            match tokens.get(i).and_then(|next| parse_unit(&next.clean)) {
                Some(ones @ 1..=9) => {
                    digits.push_str(&(tens + ones).to_string());
                    i += 1;
                }
                _ => digits.push_str(&tens.to_string()),
            }
        } else {
            break;
        }
    }

    (digits, i)
}

/// Parse one number-word run, with at most one decimal section.
/// Returns (number, index just past the run)
fn parse_number(tokens: &[Token], start: usize) -> Option<(ParsedNumber, usize)> {
    let (whole, mut end) = parse_whole(tokens, start)?;
    let mut number = ParsedNumber {
        whole,
        fraction: String::new(),
    };

    if tokens.get(end).is_some_and(|t| t.clean == "point") {
        let (fraction, fraction_end) = parse_fraction(tokens, end + 1);
        number.fraction = fraction;
        end = fraction_end;
    }

    Some((number, end))
}

//=============================================================================
// Orchestration
//=============================================================================

/// Replace every number-word run in `sentence` with its decimal form
pub fn normalize(sentence: &str) -> String {
    if sentence.is_empty() {
        return String::new();
    }

    let tokens = tokenize(sentence);
    let mut output: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        match parse_number(&tokens, i) {
            Some((number, end)) => {
                let punct = trailing_punct(tokens[end - 1].text);
                output.push(format!("{}{}", number.render(), punct));
                i = end;
            }
            None => {
                output.push(tokens[i].text.to_string());
                i += 1;
            }
        }
    }

    let result = output.join(" ");
    let trimmed = result.trim();
    if trimmed != sentence {
        tracing::trace!("Normalized number words: {:?} → {:?}", sentence, trimmed);
    }
    trimmed.to_string()
}
