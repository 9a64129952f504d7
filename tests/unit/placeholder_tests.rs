/*!
 * Tests for the placeholder token codec
 */

use docxlate::translation::placeholder::{contains_token, decode_all, encode, match_numbering_prefix};

/// Test that every encoded token is found again inside surrounding text
#[test]
fn test_decode_all_withTokensInProse_shouldReturnNumbersInOrder() {
    let text = format!("See {} then {}, not {{{{ 3 }}", encode(12), encode(4));
    let numbers: Vec<u64> = decode_all(&text).into_iter().map(|(_, n)| n).collect();

    assert_eq!(numbers, vec![12, 4]);
}

/// Test that zero is a valid placeholder number on the wire
#[test]
fn test_decode_all_withZero_shouldDecode() {
    assert_eq!(decode_all("{{ 0 }}").len(), 1);
}

/// Test that ordinary braces in documents are not mistaken for tokens
#[test]
fn test_contains_token_withTemplateLikeText_shouldBeStrict() {
    assert!(contains_token("Total: {{ 5 }}"));
    assert!(!contains_token("Use {{name}} in mail merge"));
    assert!(!contains_token("{{ 5}}"));
    assert!(!contains_token("{{\t5 }}"));
}

/// Test that a year followed by text counts as a numbering prefix
#[test]
fn test_match_numbering_prefix_withLeadingYear_shouldSplit() {
    assert_eq!(match_numbering_prefix("2024 was a good year"), Some(("2024 ", "was a good year")));
}

/// Test that a prefix with nothing after it is not split
#[test]
fn test_match_numbering_prefix_withOnlyNumber_shouldReturnNone() {
    assert_eq!(match_numbering_prefix("10"), None);
    assert_eq!(match_numbering_prefix("1.2.3"), None);
}
