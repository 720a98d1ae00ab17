/*!
 * Tests for the skip classifier
 */

use yamt::app_config::ClassifierConfig;
use yamt::translation::cache::TranslationCache;
use yamt::translation::classifier::SkipClassifier;

use crate::common;

const MIXED_TEXTS: [&str; 12] = [
    "Sword",
    "Welcome to the forge",
    "piece_wood_01",
    "42",
    "-3.5",
    "https://example.com",
    "Assets/Textures/sword.png",
    "$item_sword",
    "A",
    "",
    "player_name_TW",
    "Press E to open the chest",
];

#[test]
fn test_should_skip_withNaturalLanguage_shouldTranslate() {
    let classifier = SkipClassifier::default();

    assert!(!classifier.should_skip("Sword"));
    assert!(!classifier.should_skip("Iron Sword"));
    assert!(!classifier.should_skip("Welcome to the forge"));
    assert!(!classifier.should_skip("OK"));
    assert!(!classifier.should_skip("Hello_world"));
}

#[test]
fn test_should_skip_withShortText_shouldSkip() {
    let classifier = SkipClassifier::default();

    assert!(classifier.should_skip(""));
    assert!(classifier.should_skip("   "));
    assert!(classifier.should_skip("A"));
    assert!(classifier.should_skip(" x "));
}

#[test]
fn test_should_skip_withNumbers_shouldSkip() {
    let classifier = SkipClassifier::default();

    assert!(classifier.should_skip("42"));
    assert!(classifier.should_skip("-5"));
    assert!(classifier.should_skip("3.14"));
    assert!(classifier.should_skip("1,000"));
    assert!(classifier.should_skip("1 000 000"));
    assert!(!classifier.should_skip("42 arrows"));
}

#[test]
fn test_should_skip_withPathsAndUrls_shouldSkip() {
    let classifier = SkipClassifier::default();

    assert!(classifier.should_skip("https://example.com/mod"));
    assert!(classifier.should_skip("www.nexusmods.com"));
    assert!(classifier.should_skip("author@example.com"));
    assert!(classifier.should_skip("Assets/Textures/sword.png"));
    assert!(classifier.should_skip(r"C:\Games\Valheim"));
    assert!(classifier.should_skip(r"icons\sword"));
}

#[test]
fn test_should_skip_withIdentifiers_shouldSkip() {
    let classifier = SkipClassifier::default();

    assert!(classifier.should_skip("piece_wood_01"));
    assert!(classifier.should_skip("item_iron_sword"));
    assert!(classifier.should_skip("item_iron-sword[2]_x"));
    // Two underscores but not a bare identifier
    assert!(!classifier.should_skip("Press the use_item_key button"));
}

#[test]
fn test_should_skip_withTechnicalAffixes_shouldSkip() {
    let classifier = SkipClassifier::default();

    assert!(classifier.should_skip("$item_sword"));
    assert!(classifier.should_skip("sapling_birch"));
    assert!(classifier.should_skip("Pickable_Stone"));
    assert!(classifier.should_skip("Sword_TW"));
    assert!(classifier.should_skip("weapon_id"));
}

#[test]
fn test_should_skip_withCustomConfig_shouldUseConfiguredRules() {
    let config = ClassifierConfig {
        min_length: 4,
        identifier_pattern: r"^[a-z_]+$".to_string(),
        technical_prefixes: vec!["npc.".to_string()],
        technical_suffixes: vec![".ogg".to_string()],
    };
    let classifier = SkipClassifier::new(&config).unwrap();

    assert!(classifier.should_skip("Axe"));
    assert!(!classifier.should_skip("Hammer"));
    assert!(classifier.should_skip("npc.blacksmith"));
    assert!(classifier.should_skip("forge_hit.ogg"));
    assert!(classifier.should_skip("lower_case_id"));
    // Upper case letters no longer match the identifier pattern
    assert!(!classifier.should_skip("Lower_Case_Id"));
}

#[test]
fn test_new_withInvalidPattern_shouldFail() {
    let config = ClassifierConfig {
        identifier_pattern: "([unclosed".to_string(),
        ..ClassifierConfig::default()
    };

    assert!(SkipClassifier::new(&config).is_err());
}

#[test]
fn test_should_skip_withRepeatedCallsAndFilledCache_shouldGiveSameAnswers() {
    let dir = common::create_temp_dir().unwrap();
    let classifier = SkipClassifier::default();
    let first: Vec<bool> = MIXED_TEXTS.iter().map(|t| classifier.should_skip(t)).collect();
    let second: Vec<bool> = MIXED_TEXTS.iter().map(|t| classifier.should_skip(t)).collect();
    assert_eq!(first, second);

    let cache = TranslationCache::new(dir.path().join("cache.json"));
    for text in MIXED_TEXTS {
        cache.put("en", "pt", text, &format!("pt({})", text));
    }
    assert!(!cache.is_empty());

    let after_cache: Vec<bool> = MIXED_TEXTS.iter().map(|t| classifier.should_skip(t)).collect();
    let fresh: Vec<bool> = MIXED_TEXTS.iter().map(|t| SkipClassifier::default().should_skip(t)).collect();
    assert_eq!(after_cache, first);
    assert_eq!(fresh, first);
    assert!(first.iter().any(|skip| *skip));
    assert!(first.iter().any(|skip| !*skip));
}
