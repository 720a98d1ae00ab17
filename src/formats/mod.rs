/*!
 * Format adapters.
 *
 * Every supported file format is handled by a stateless adapter that
 * decomposes a document into an ordered list of translation units and
 * recomposes a document from the original text plus the translated units.
 *
 * - `yaml`: line-oriented key/value files with block scalars
 * - `tree`: shared traversal for the tree formats (`json`, `toml`)
 * - `xml`: event-stream rewriting of text nodes
 * - `csv`: tabular files
 * - `ini`: section/property files
 * - `txt`: plain text, one unit per line
 */

use std::fmt;
use std::path::Path;

use crate::errors::{FormatError, PipelineError};

pub mod csv;
pub mod ini;
pub mod json;
#[cfg(feature = "toml")]
pub mod toml;
pub mod tree;
pub mod txt;
pub mod xml;
pub mod yaml;

pub use self::yaml::{BlockState, KeyValuePolicy, LineKind, YamlAdapter};

/// File formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
    /// `.xml`
    Xml,
    /// `.toml`
    Toml,
    /// `.csv`
    Csv,
    /// `.ini` / `.cfg`
    Ini,
    /// `.txt`
    Txt,
}

impl FileFormat {
    /// Map a file extension (without the dot, any case) to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "toml" => Some(Self::Toml),
            "csv" => Some(Self::Csv),
            "ini" | "cfg" => Some(Self::Ini),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    /// Detect the format of a path
    ///
    /// Fails with `UnsupportedFormat` for unknown extensions and for formats
    /// whose support was not compiled in.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();

        let format = Self::from_extension(&ext)
            .ok_or_else(|| PipelineError::UnsupportedFormat(format!(".{}", ext)))?;

        if !format.is_available() {
            return Err(PipelineError::UnsupportedFormat(format!(
                ".{} (support not compiled in)",
                ext
            )));
        }

        Ok(format)
    }

    /// Whether support for the format is compiled in
    pub fn is_available(self) -> bool {
        match self {
            Self::Toml => cfg!(feature = "toml"),
            _ => true,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Xml => "XML",
            Self::Toml => "TOML",
            Self::Csv => "CSV",
            Self::Ini => "INI",
            Self::Txt => "TXT",
        };
        write!(f, "{}", name)
    }
}

/// One addressable piece of a document
///
/// Units keep the order of the original file. A unit without a key is
/// structure and is always written back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    /// Index of the unit in document order
    pub position: usize,
    /// Logical address of the text (dotted path, `row:col`, line number...)
    pub key: Option<String>,
    /// Text as it appears in the file
    pub raw_text: String,
    /// Text handed to the classifier, cache and provider
    pub normalized_text: String,
    /// Translation filled in during substitution
    pub translation: Option<String>,
}

impl TranslationUnit {
    /// A unit that is emitted verbatim and never translated
    pub fn passthrough(position: usize, raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        Self {
            position,
            key: None,
            normalized_text: raw_text.clone(),
            raw_text,
            translation: None,
        }
    }

    /// A unit carrying translatable text
    pub fn translatable(
        position: usize,
        key: impl Into<String>,
        raw_text: impl Into<String>,
        normalized_text: impl Into<String>,
    ) -> Self {
        Self {
            position,
            key: Some(key.into()),
            raw_text: raw_text.into(),
            normalized_text: normalized_text.into(),
            translation: None,
        }
    }

    /// Whether the unit takes part in translation
    pub fn is_translatable(&self) -> bool {
        self.key.is_some()
    }

    /// The translation if it differs from the source text
    pub fn changed_translation(&self) -> Option<&str> {
        match &self.translation {
            Some(t) if self.key.is_some() && *t != self.normalized_text => Some(t.as_str()),
            _ => None,
        }
    }

    /// Text to emit for this unit: the translation when present, else the source
    pub fn output_text(&self) -> &str {
        self.translation.as_deref().unwrap_or(&self.normalized_text)
    }
}

/// Decomposes documents into units and writes them back
pub trait FormatAdapter: Send + Sync {
    /// Format handled by the adapter
    fn format(&self) -> FileFormat;

    /// Split a document into an ordered list of units
    fn decompose(&self, content: &str) -> Result<Vec<TranslationUnit>, FormatError>;

    /// Rebuild the document from the original text and the (translated) units
    ///
    /// `units` must be the output of `decompose(original)`, possibly with
    /// `translation` filled in.
    fn recompose(&self, original: &str, units: &[TranslationUnit]) -> Result<String, FormatError>;
}

/// Get the adapter for a format
pub fn adapter_for(
    format: FileFormat,
    policy: KeyValuePolicy,
) -> Result<Box<dyn FormatAdapter>, PipelineError> {
    let adapter: Box<dyn FormatAdapter> = match format {
        FileFormat::Yaml => Box::new(YamlAdapter::new(policy)),
        FileFormat::Json => Box::new(self::json::JsonAdapter),
        FileFormat::Xml => Box::new(self::xml::XmlAdapter),
        #[cfg(feature = "toml")]
        FileFormat::Toml => Box::new(self::toml::TomlAdapter),
        #[cfg(not(feature = "toml"))]
        FileFormat::Toml => {
            return Err(PipelineError::UnsupportedFormat(
                ".toml (support not compiled in)".to_string(),
            ));
        }
        FileFormat::Csv => Box::new(self::csv::CsvAdapter),
        FileFormat::Ini => Box::new(self::ini::IniAdapter),
        FileFormat::Txt => Box::new(self::txt::TxtAdapter),
    };
    Ok(adapter)
}

/// Split text into `(line, ending)` pairs
///
/// The ending is `"\r\n"`, `"\n"` or `""` for a last line without newline, so
/// concatenating every pair reproduces the input exactly.
pub(crate) fn split_lines(content: &str) -> Vec<(&str, &str)> {
    content
        .split_inclusive('\n')
        .map(|line| {
            if let Some(body) = line.strip_suffix("\r\n") {
                (body, "\r\n")
            } else if let Some(body) = line.strip_suffix('\n') {
                (body, "\n")
            } else {
                (line, "")
            }
        })
        .collect()
}

/// Check that the caller handed back as many units as the original yields
pub(crate) fn ensure_unit_count(expected: usize, units: &[TranslationUnit]) -> Result<(), FormatError> {
    if expected != units.len() {
        return Err(FormatError::UnitMismatch {
            expected,
            actual: units.len(),
        });
    }
    Ok(())
}

/// Split `text` into leading whitespace, core and trailing whitespace
pub(crate) fn split_padding(text: &str) -> (&str, &str, &str) {
    let core_start = text.len() - text.trim_start().len();
    let core_end = text.trim_end().len();
    if core_start >= core_end {
        return (text, "", "");
    }
    (&text[..core_start], &text[core_start..core_end], &text[core_end..])
}
