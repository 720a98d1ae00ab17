use super::{ensure_unit_count, split_lines, FileFormat, FormatAdapter, TranslationUnit};
use crate::errors::FormatError;

/// Adapter for `.ini` / `.cfg` files
///
/// Every `key = value` (or `key: value`) inside a `[section]` is a unit keyed
/// `section.key`. Only the value span is rewritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniAdapter;

/// Location of a translatable value inside a line
struct Property {
    key: String,
    /// Byte range of the value, quotes excluded
    start: usize,
    end: usize,
}

fn section_name(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

fn parse_property(line: &str, section: &str) -> Option<Property> {
    let delimiter = line.find(['=', ':'])?;
    let key = line[..delimiter].trim();
    if key.is_empty() {
        return None;
    }

    let after = &line[delimiter + 1..];
    let mut start = delimiter + 1 + (after.len() - after.trim_start().len());
    let mut end = line.trim_end().len();
    if start >= end {
        return None;
    }

    let value = &line[start..end];
    let quoted = value.len() >= 2
        && (value.starts_with('"') && value.ends_with('"') || value.starts_with('\'') && value.ends_with('\''));
    if quoted {
        start += 1;
        end -= 1;
        if start >= end {
            return None;
        }
    }

    Some(Property {
        key: format!("{}.{}", section, key),
        start,
        end,
    })
}

/// One `Option<Property>` per line, in order
fn scan(content: &str) -> Vec<(&str, &str, Option<Property>)> {
    let mut section: Option<String> = None;

    split_lines(content)
        .into_iter()
        .map(|(line, ending)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                return (line, ending, None);
            }
            if let Some(name) = section_name(trimmed) {
                section = Some(name.to_string());
                return (line, ending, None);
            }
            let property = section.as_deref().and_then(|s| parse_property(line, s));
            (line, ending, property)
        })
        .collect()
}

impl FormatAdapter for IniAdapter {
    fn format(&self) -> FileFormat {
        FileFormat::Ini
    }

    fn decompose(&self, content: &str) -> Result<Vec<TranslationUnit>, FormatError> {
        Ok(scan(content)
            .into_iter()
            .enumerate()
            .map(|(position, (line, _, property))| match property {
                Some(p) => TranslationUnit::translatable(position, p.key, line, &line[p.start..p.end]),
                None => TranslationUnit::passthrough(position, line),
            })
            .collect())
    }

    fn recompose(&self, original: &str, units: &[TranslationUnit]) -> Result<String, FormatError> {
        let lines = scan(original);
        ensure_unit_count(lines.len(), units)?;

        let mut output = String::with_capacity(original.len());
        for ((line, ending, property), unit) in lines.iter().zip(units) {
            match (property, unit.changed_translation()) {
                (Some(p), Some(translation)) => {
                    output.push_str(&line[..p.start]);
                    output.push_str(translation);
                    output.push_str(&line[p.end..]);
                }
                _ => output.push_str(line),
            }
            output.push_str(ending);
        }
        Ok(output)
    }
}
