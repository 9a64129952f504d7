/*!
 * Tests for ISO language code utilities
 */

use docxlate::language_utils::{get_language_name, normalize_to_part2t, validate_language_code, LanguageCodeType};

/// Test code type detection
#[test]
fn test_validate_language_code_withVariousCodes_shouldDetectType() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("FRA").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("ger").unwrap(), LanguageCodeType::Part2B);
    assert!(validate_language_code("zz").is_err());
    assert!(validate_language_code("english").is_err());
}

/// Test normalization to three-letter terminology codes
#[test]
fn test_normalize_to_part2t_withAllForms_shouldReturnTerminologyCode() {
    assert_eq!(normalize_to_part2t("de").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t(" deu ").unwrap(), "deu");
    assert!(normalize_to_part2t("xx").is_err());
}

/// Test English names used in prompts
#[test]
fn test_get_language_name_withCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("chi").unwrap(), "Chinese");
    assert!(get_language_name("qq").is_err());
}
