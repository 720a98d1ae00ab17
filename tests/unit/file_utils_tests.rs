/*!
 * Tests for file utilities
 */

use std::fs;

use yamt::file_utils::FileManager;

use crate::common;

#[test]
fn test_file_exists_withDirectory_shouldReturnFalse() {
    let dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(dir.path(), "a.yml", "a: b").unwrap();

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(dir.path()));
    assert!(!FileManager::file_exists(dir.path().join("missing.yml")));
}

#[test]
fn test_read_to_string_withBom_shouldStripIt() {
    let dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(dir.path(), "bom.yml", "\u{feff}Hello: Hello\n").unwrap();

    assert_eq!(FileManager::read_to_string(&file).unwrap(), "Hello: Hello\n");
}

#[test]
fn test_write_atomic_shouldCreateParentsAndReplaceContent() {
    let dir = common::create_temp_dir().unwrap();
    let target = dir.path().join("out").join("English_translated.yml");

    FileManager::write_atomic(&target, "first").unwrap();
    FileManager::write_atomic(&target, "second").unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "second");
    let leftovers = fs::read_dir(target.parent().unwrap()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn test_ensure_dir_withExistingDir_shouldSucceed() {
    let dir = common::create_temp_dir().unwrap();
    let nested = dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested).unwrap();
    FileManager::ensure_dir(&nested).unwrap();

    assert!(nested.is_dir());
}
