use super::{ensure_unit_count, split_lines, split_padding, FileFormat, FormatAdapter, TranslationUnit};
use crate::errors::FormatError;

/// Adapter for `.txt` files; each non-blank line is a unit keyed by its line number
#[derive(Debug, Clone, Copy, Default)]
pub struct TxtAdapter;

impl FormatAdapter for TxtAdapter {
    fn format(&self) -> FileFormat {
        FileFormat::Txt
    }

    fn decompose(&self, content: &str) -> Result<Vec<TranslationUnit>, FormatError> {
        Ok(split_lines(content)
            .into_iter()
            .enumerate()
            .map(|(position, (line, _))| {
                let (_, core, _) = split_padding(line);
                if core.is_empty() {
                    TranslationUnit::passthrough(position, line)
                } else {
                    TranslationUnit::translatable(position, (position + 1).to_string(), line, core)
                }
            })
            .collect())
    }

    fn recompose(&self, original: &str, units: &[TranslationUnit]) -> Result<String, FormatError> {
        let lines = split_lines(original);
        ensure_unit_count(lines.len(), units)?;

        let mut output = String::with_capacity(original.len());
        for ((line, ending), unit) in lines.iter().zip(units) {
            match unit.changed_translation() {
                Some(translation) => {
                    let (leading, _, trailing) = split_padding(line);
                    output.push_str(leading);
                    output.push_str(translation);
                    output.push_str(trailing);
                }
                None => output.push_str(line),
            }
            output.push_str(ending);
        }
        Ok(output)
    }
}
