/*!
 * Tests for language tag utilities
 */

use yamt::language_utils::{get_language_name, language_codes_match, validate_language_tag, COMMON_LANGUAGES};

#[test]
fn test_validate_language_tag_withValidTags_shouldSucceed() {
    for tag in ["en", "pt", "por", "zh-CN", "zh_TW", "pt-BR", "es-419", "sr-Latn"] {
        assert!(validate_language_tag(tag).is_ok(), "{} should be valid", tag);
    }
}

#[test]
fn test_validate_language_tag_withInvalidTags_shouldFail() {
    for tag in ["", "  ", "english", "e", "zh-", "pt-B", "en-12", "en-Latin"] {
        assert!(validate_language_tag(tag).is_err(), "{:?} should be invalid", tag);
    }
}

#[test]
fn test_language_codes_match_shouldCompareBaseAndRegion() {
    assert!(language_codes_match("en", "en"));
    assert!(language_codes_match("pt", "por"));
    assert!(language_codes_match("zh-CN", "zh-cn"));
    assert!(!language_codes_match("zh-CN", "zh-TW"));
    assert!(!language_codes_match("pt", "pt-BR"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("nope", "nope"));
}

#[test]
fn test_get_language_name_shouldPreferCommonNames() {
    assert_eq!(get_language_name("pt").unwrap(), "Portuguese");
    assert_eq!(get_language_name("zh-tw").unwrap(), "Chinese (Traditional)");
    assert_eq!(get_language_name("nl").unwrap(), "Dutch");
    assert!(get_language_name("english").is_err());
}

#[test]
fn test_common_languages_shouldAllBeValid() {
    for (code, _) in COMMON_LANGUAGES {
        assert!(validate_language_tag(code).is_ok(), "{} should be valid", code);
    }
}
