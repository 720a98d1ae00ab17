use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for language tag handling
///
/// Mod translators pass the codes straight to the provider, so tags are kept
/// as written (`pt`, `zh-CN`). These helpers only validate them and look up
/// display names.
/// Languages offered by the `languages` command, as `(tag, english name)`
pub const COMMON_LANGUAGES: &[(&str, &str)] = &[
    ("pt", "Portuguese"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh-CN", "Chinese (Simplified)"),
    ("zh-TW", "Chinese (Traditional)"),
];

/// Split a tag into its base language and optional region/script subtag
fn split_tag(tag: &str) -> (&str, Option<&str>) {
    match tag.find(['-', '_']) {
        Some(idx) => (&tag[..idx], Some(&tag[idx + 1..])),
        None => (tag, None),
    }
}

/// Resolve the base language of a tag (ISO 639-1 or ISO 639-3)
fn base_language(base: &str) -> Option<Language> {
    let normalized = base.trim().to_lowercase();
    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }
}

/// Validate a language tag such as `en`, `por` or `zh-CN`
///
/// The subtag after `-` (or `_`) must be a 2-letter region, a 3-digit UN M.49
/// area or a 4-letter script.
pub fn validate_language_tag(tag: &str) -> Result<()> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(anyhow!("Language code cannot be empty"));
    }

    let (base, subtag) = split_tag(tag);
    if base_language(base).is_none() {
        return Err(anyhow!("Invalid language code: {}", tag));
    }

    if let Some(subtag) = subtag {
        let valid = match subtag.len() {
            2 => subtag.chars().all(|c| c.is_ascii_alphabetic()),
            3 => subtag.chars().all(|c| c.is_ascii_digit()),
            4 => subtag.chars().all(|c| c.is_ascii_alphabetic()),
            _ => false,
        };
        if !valid {
            return Err(anyhow!("Invalid region or script in language code: {}", tag));
        }
    }

    Ok(())
}

/// Check if two language tags name the same base language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let (base1, region1) = split_tag(code1.trim());
    let (base2, region2) = split_tag(code2.trim());

    match (base_language(base1), base_language(base2)) {
        (Some(lang1), Some(lang2)) => {
            lang1 == lang2
                && region1.map(str::to_lowercase) == region2.map(str::to_lowercase)
        }
        _ => false,
    }
}

/// Get the English language name for a tag
pub fn get_language_name(tag: &str) -> Result<String> {
    let trimmed = tag.trim();
    if let Some((_, name)) = COMMON_LANGUAGES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(trimmed))
    {
        return Ok((*name).to_string());
    }

    let (base, _) = split_tag(trimmed);
    let lang = base_language(base)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", tag))?;

    Ok(lang.to_name().to_string())
}
