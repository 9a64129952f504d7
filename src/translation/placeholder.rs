/*!
 * Placeholder tokens and numbering prefixes.
 *
 * A template paragraph carries `{{ N }}` where its translatable text used to
 * be. Extraction writes tokens with [`encode`] and reassembly finds them with
 * [`decode_all`], so both sides share the exact byte shape defined here.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Strict token shape: one space inside each brace pair, no leading zeros
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{ (0|[1-9][0-9]*) \}\}").unwrap()
});

/// Leading `2.3.1 ` style numbering, whitespace included
static NUMBERING_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^([0-9]+(?:\.[0-9]+)*\s+)(.*)$").unwrap()
});

/// Encode a placeholder number as a token
pub fn encode(number: u64) -> String {
    format!("{{{{ {} }}}}", number)
}

/// Every valid token in `text` with its byte span and number
///
/// Tokens whose number does not fit in a `u64` are not reported.
pub fn decode_all(text: &str) -> Vec<(Range<usize>, u64)> {
    TOKEN_REGEX
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let number = captures.get(1)?.as_str().parse::<u64>().ok()?;
            Some((whole.range(), number))
        })
        .collect()
}

/// Whether `text` holds at least one valid token
pub fn contains_token(text: &str) -> bool {
    TOKEN_REGEX.is_match(text)
}

/// Split a leading numbering prefix from the content after it
///
/// The prefix keeps its trailing whitespace so it can be written back verbatim.
pub fn match_numbering_prefix(text: &str) -> Option<(&str, &str)> {
    let captures = NUMBERING_PREFIX_REGEX.captures(text)?;
    let prefix = captures.get(1)?.as_str();
    let remainder = captures.get(2).map_or("", |m| m.as_str());
    Some((prefix, remainder))
}
