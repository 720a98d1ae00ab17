/*!
 * Tests for the CSV, INI and plain text adapters
 */

use yamt::formats::csv::CsvAdapter;
use yamt::formats::ini::IniAdapter;
use yamt::formats::txt::TxtAdapter;
use yamt::formats::FormatAdapter;

use crate::common::{dictionary, translate_document};

#[test]
fn test_csv_decompose_shouldKeyCellsByRowAndColumn() {
    let content = "id,name\n1,Sword\n";

    let units = CsvAdapter.decompose(content).unwrap();

    let keys: Vec<&str> = units.iter().filter_map(|u| u.key.as_deref()).collect();
    assert_eq!(keys, vec!["0:0", "0:1", "1:0", "1:1"]);
    assert_eq!(units[3].normalized_text, "Sword");
}

#[test]
fn test_csv_recompose_shouldTranslateCellsAndKeepQuoting() {
    let content = "id,name,desc\n1,Sword,\"Hello, world\"\n2,Shield,Axe\n";

    let output = translate_document(&CsvAdapter, content, dictionary);

    assert_eq!(output, "id,name,desc\n1,Espada,\"Hello, world\"\n2,Escudo,Machado\n");
}

#[test]
fn test_csv_recompose_withCrlfAndNoFinalNewline_shouldKeepLayout() {
    let content = "a,Sword\r\nb,Shield";

    let output = translate_document(&CsvAdapter, content, dictionary);

    assert_eq!(output, "a,Espada\r\nb,Escudo");
}

#[test]
fn test_csv_recompose_withRaggedRows_shouldKeepRowLengths() {
    let content = "Sword\nShield,Axe,extra\n";

    let output = translate_document(&CsvAdapter, content, dictionary);

    assert_eq!(output, "Espada\nEscudo,Machado,extra\n");
}

#[test]
fn test_csv_recompose_withUntranslatedQuotedRows_shouldCopyThemVerbatim() {
    let content = "\"id\",\"name\"\r\n\"7\",\"Torch\"\r\n\"8\",\"Sword\"\r\n\r\n\"9\",\"Lamp\"\r\n";

    let output = translate_document(&CsvAdapter, content, dictionary);

    assert_eq!(output, "\"id\",\"name\"\r\n\"7\",\"Torch\"\r\n8,Espada\r\n\r\n\"9\",\"Lamp\"\r\n");
}

#[test]
fn test_ini_decompose_shouldKeySectionProperties() {
    let content = "; comment\nglobal = ignored\n[General]\ntitle = Sword\nquoted = \"Shield\"\npath: Axe\nempty =\n";

    let units = IniAdapter.decompose(content).unwrap();

    let translatable: Vec<(&str, &str)> = units
        .iter()
        .filter(|u| u.is_translatable())
        .map(|u| (u.key.as_deref().unwrap_or(""), u.normalized_text.as_str()))
        .collect();
    assert_eq!(
        translatable,
        vec![
            ("General.title", "Sword"),
            ("General.quoted", "Shield"),
            ("General.path", "Axe"),
        ]
    );
}

#[test]
fn test_ini_recompose_shouldOnlyRewriteValues() {
    let content = "; Sword\n[General]\ntitle   =   Sword  \nquoted = \"Shield\"\r\n# Axe\npath: Axe";

    let output = translate_document(&IniAdapter, content, dictionary);

    assert_eq!(
        output,
        "; Sword\n[General]\ntitle   =   Espada  \nquoted = \"Escudo\"\r\n# Axe\npath: Machado"
    );
}

#[test]
fn test_txt_recompose_shouldTranslateLinesAndKeepPadding() {
    let content = "  Hello  \n\nSword\r\n\tIron Sword";

    let units = TxtAdapter.decompose(content).unwrap();
    assert_eq!(units.len(), 4);
    assert_eq!(units[0].key.as_deref(), Some("1"));
    assert!(!units[1].is_translatable());
    assert_eq!(units[2].key.as_deref(), Some("3"));

    let output = translate_document(&TxtAdapter, content, dictionary);

    assert_eq!(output, "  Olá  \n\nEspada\r\n\tEspada de Ferro");
}
