/*!
 * Line-oriented key/value adapter for YAML localisation files.
 *
 * Mod localisation files are mostly flat `key: value` lines, sometimes nested
 * by indentation, with the odd multi-line block scalar. The adapter never
 * builds a YAML tree: every line is one unit and untranslated lines are
 * written back byte for byte.
 */

use serde::{Deserialize, Serialize};

use super::{split_lines, ensure_unit_count, FileFormat, FormatAdapter, TranslationUnit};
use crate::errors::FormatError;

/// Block scalar indicators that open a multi-line block
const BLOCK_INDICATORS: [&str; 6] = ["|", "|-", "|+", ">", ">-", ">+"];

/// Unquoted scalars that carry data rather than text
const DATA_SCALARS: [&str; 4] = ["true", "false", "null", "~"];

/// Which key/value lines are offered for translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyValuePolicy {
    /// Translate every non-empty value
    #[default]
    Values,
    /// Translate only lines whose key equals their value (`Hello: Hello`)
    ///
    /// Collected-string dumps list the source text as both key and value;
    /// any other line there has already been translated by hand.
    SymmetricEntries,
}

/// State of the multi-line block tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Normal,
    InBlock,
}

/// Structural classification of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    /// Opens a multi-line block (`key: >-`, bare `|`...)
    BlockStart,
    /// Indented continuation of an open block
    BlockBody,
    /// Anything else; may or may not hold a `key: value` pair
    Content,
}

impl BlockState {
    /// Classify `line` and compute the state for the next line
    ///
    /// Inside a block, indented non-blank lines are body. A blank or
    /// non-indented line closes the block and is classified as usual.
    pub fn step(self, line: &str) -> (LineKind, BlockState) {
        if self == BlockState::InBlock {
            let indented = line.starts_with(' ') || line.starts_with('\t');
            if indented && !line.trim().is_empty() {
                return (LineKind::BlockBody, BlockState::InBlock);
            }
        }

        if is_block_start(line) {
            return (LineKind::BlockStart, BlockState::InBlock);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            (LineKind::Blank, BlockState::Normal)
        } else if trimmed.starts_with('#') {
            (LineKind::Comment, BlockState::Normal)
        } else {
            (LineKind::Content, BlockState::Normal)
        }
    }
}

/// Whether `line` opens a multi-line block scalar
pub fn is_block_start(line: &str) -> bool {
    let trimmed = line.trim();
    BLOCK_INDICATORS.iter().any(|indicator| {
        trimmed == *indicator
            || trimmed.ends_with(&format!(": {}", indicator))
            || trimmed.starts_with(&format!("? {}", indicator))
            || trimmed.starts_with(&format!(": {}", indicator))
    })
}

/// Strip surrounding whitespace and one layer of matching quotes
///
/// Returns the inner text (with quote escapes resolved) and the quote used.
pub fn strip_quotes(text: &str) -> (String, Option<char>) {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && (first == '"' || first == '\'') => {
            let inner = &trimmed[1..trimmed.len() - 1];
            (unescape(inner, first), Some(first))
        }
        _ => (trimmed.to_string(), None),
    }
}

/// Wrap a value in double quotes, escaping backslashes, quotes and line breaks
pub fn quote_value(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04X}", c as u32)),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// All `(key, value)` pairs with a non-empty value, skipping comments and blocks
pub fn parse_entries(content: &str) -> Vec<(String, String)> {
    let mut state = BlockState::Normal;
    let mut entries = Vec::new();

    for (line, _) in split_lines(content) {
        let (kind, next) = state.step(line);
        state = next;
        if kind != LineKind::Content {
            continue;
        }
        if let Some(entry) = Entry::parse(line) {
            if !entry.value.is_empty() {
                entries.push((entry.key, entry.value));
            }
        }
    }

    entries
}

fn unescape(inner: &str, quote: char) -> String {
    if quote != '"' {
        return inner.replace("''", "'");
    }

    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some('r') => text.push('\r'),
            Some('t') => text.push('\t'),
            Some('0') => text.push('\0'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit()) => {
                        text.push(decoded);
                        chars.nth(3);
                    }
                    _ => text.push_str("\\u"),
                }
            }
            Some(other @ ('\\' | '"' | '/' | ' ')) => text.push(other),
            // Escapes we do not model stay as written
            Some(other) => {
                text.push('\\');
                text.push(other);
            }
            None => text.push('\\'),
        }
    }
    text
}

/// Byte index of the quote closing the quoted string that starts `text`
fn closing_quote(text: &str, quote: char) -> Option<usize> {
    let mut chars = text.char_indices().skip(1).peekable();
    while let Some((idx, c)) = chars.next() {
        if quote == '"' && c == '\\' {
            chars.next();
            continue;
        }
        if c == quote {
            if quote == '\'' && matches!(chars.peek(), Some((_, '\''))) {
                chars.next();
                continue;
            }
            return Some(idx);
        }
    }
    None
}

/// Byte index of a ` #` comment marker in an unquoted value
fn comment_start(value: &str) -> Option<usize> {
    let mut previous_is_space = false;
    for (idx, c) in value.char_indices() {
        if c == '#' && previous_is_space {
            return Some(idx);
        }
        previous_is_space = c == ' ' || c == '\t';
    }
    None
}

/// Leading whitespace plus any `- ` sequence markers
fn split_indent(line: &str) -> (&str, &str) {
    let mut idx = line.len() - line.trim_start().len();
    while let Some(after) = line[idx..].strip_prefix("- ") {
        idx += 2 + (after.len() - after.trim_start().len());
    }
    (&line[..idx], &line[idx..])
}

/// A parsed `key: value` line
#[derive(Debug, Clone)]
struct Entry<'a> {
    indent: &'a str,
    /// Key exactly as written, quotes and spacing before the colon included
    key_raw: &'a str,
    key: String,
    /// Whitespace between the colon and the value
    gap: &'a str,
    value: String,
    quote: Option<char>,
    /// Comment (and its leading whitespace) following the value
    trailing: &'a str,
}

impl<'a> Entry<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let (indent, body) = split_indent(line);

        let search_from = match body.chars().next() {
            Some(q @ ('"' | '\'')) => closing_quote(body, q).map(|i| i + 1).unwrap_or(0),
            _ => 0,
        };
        let delimiter = body[search_from..].find(':')? + search_from;

        let key_raw = &body[..delimiter];
        let (key, _) = strip_quotes(key_raw);
        if key.is_empty() {
            return None;
        }

        let value_part = &body[delimiter + 1..];
        let value_text = value_part.trim_start();
        let gap = &value_part[..value_part.len() - value_text.len()];
        let value_text = value_text.trim_end();

        if let Some(q @ ('"' | '\'')) = value_text.chars().next() {
            if let Some(close) = closing_quote(value_text, q) {
                let rest = &value_text[close + 1..];
                let rest_trimmed = rest.trim_start();
                if rest_trimmed.is_empty() || rest_trimmed.starts_with('#') {
                    return Some(Self {
                        indent,
                        key_raw,
                        key,
                        gap,
                        value: unescape(&value_text[1..close], q),
                        quote: Some(q),
                        trailing: rest,
                    });
                }
            }
        }

        let (value, trailing) = match comment_start(value_text) {
            Some(idx) => {
                let value = value_text[..idx].trim_end();
                (value, &value_text[value.len()..])
            }
            None => (value_text, ""),
        };

        Some(Self {
            indent,
            key_raw,
            key,
            gap,
            value: value.to_string(),
            quote: None,
            trailing,
        })
    }

    /// Whether the value is structure or data rather than text
    fn is_data_value(&self) -> bool {
        if self.quote.is_some() {
            return false;
        }
        let lowered = self.value.to_lowercase();
        self.value.starts_with(['[', '{', '&', '*', '!', '|', '>'])
            || DATA_SCALARS.contains(&lowered.as_str())
    }

    fn render(&self, translation: &str, policy: KeyValuePolicy) -> String {
        let value = match (policy, self.quote) {
            (KeyValuePolicy::SymmetricEntries, _) | (_, Some('"')) => quote_value(translation),
            (_, Some(_)) if translation.contains(char::is_control) => quote_value(translation),
            (_, Some(_)) => format!("'{}'", translation.replace('\'', "''")),
            (_, None) if needs_quotes(translation) => quote_value(translation),
            (_, None) => translation.to_string(),
        };
        let gap = if self.gap.is_empty() { " " } else { self.gap };
        format!("{}{}:{}{}{}", self.indent, self.key_raw, gap, value, self.trailing)
    }
}

/// Whether an unquoted value must be quoted to stay parseable
fn needs_quotes(value: &str) -> bool {
    value.contains(':')
        || value.contains('#')
        || value.contains(char::is_control)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.starts_with(['-', '?', '[', ']', '{', '}', ',', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`'])
}

/// One scanned line of a document
struct ScannedLine<'a> {
    text: &'a str,
    ending: &'a str,
    entry: Option<Entry<'a>>,
}

/// Adapter for `.yaml` / `.yml` files
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlAdapter {
    policy: KeyValuePolicy,
}

impl YamlAdapter {
    pub fn new(policy: KeyValuePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> KeyValuePolicy {
        self.policy
    }

    /// Classify every line; `entry` is set only on translatable lines
    fn scan<'a>(&self, content: &'a str) -> Vec<ScannedLine<'a>> {
        let mut state = BlockState::Normal;

        split_lines(content)
            .into_iter()
            .map(|(text, ending)| {
                let (kind, next) = state.step(text);
                state = next;

                let entry = match kind {
                    LineKind::Content => Entry::parse(text).filter(|entry| self.is_translatable(entry)),
                    _ => None,
                };

                ScannedLine { text, ending, entry }
            })
            .collect()
    }

    fn is_translatable(&self, entry: &Entry<'_>) -> bool {
        if entry.value.trim().is_empty() || entry.is_data_value() {
            return false;
        }
        match self.policy {
            KeyValuePolicy::Values => true,
            KeyValuePolicy::SymmetricEntries => entry.key == entry.value,
        }
    }
}

impl FormatAdapter for YamlAdapter {
    fn format(&self) -> FileFormat {
        FileFormat::Yaml
    }

    fn decompose(&self, content: &str) -> Result<Vec<TranslationUnit>, FormatError> {
        Ok(self
            .scan(content)
            .into_iter()
            .enumerate()
            .map(|(position, line)| match line.entry {
                Some(entry) => TranslationUnit::translatable(position, entry.key, line.text, entry.value),
                None => TranslationUnit::passthrough(position, line.text),
            })
            .collect())
    }

    fn recompose(&self, original: &str, units: &[TranslationUnit]) -> Result<String, FormatError> {
        let lines = self.scan(original);
        ensure_unit_count(lines.len(), units)?;

        let mut output = String::with_capacity(original.len());
        for (line, unit) in lines.iter().zip(units) {
            match (&line.entry, unit.changed_translation()) {
                (Some(entry), Some(translation)) => output.push_str(&entry.render(translation, self.policy)),
                _ => output.push_str(line.text),
            }
            output.push_str(line.ending);
        }

        Ok(output)
    }
}
