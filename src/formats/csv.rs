use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use super::{ensure_unit_count, FileFormat, FormatAdapter, TranslationUnit};
use crate::errors::FormatError;

/// Adapter for `.csv` tables; every cell is a unit keyed `row:col`
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvAdapter;

fn read_records(content: &str) -> Result<Vec<StringRecord>, FormatError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| FormatError::Parse(format!("CSV: {}", e)))
}

impl FormatAdapter for CsvAdapter {
    fn format(&self) -> FileFormat {
        FileFormat::Csv
    }

    fn decompose(&self, content: &str) -> Result<Vec<TranslationUnit>, FormatError> {
        let mut units = Vec::new();
        for (row, record) in read_records(content)?.iter().enumerate() {
            for (col, cell) in record.iter().enumerate() {
                let position = units.len();
                units.push(TranslationUnit::translatable(position, format!("{}:{}", row, col), cell, cell));
            }
        }
        Ok(units)
    }

    /// Rows without a changed cell are copied from `original` byte for byte;
    /// changed rows are re-encoded and keep their original line ending.
    fn recompose(&self, original: &str, units: &[TranslationUnit]) -> Result<String, FormatError> {
        let records = read_records(original)?;
        let cell_count: usize = records.iter().map(StringRecord::len).sum();
        ensure_unit_count(cell_count, units)?;

        let starts = records
            .iter()
            .map(|record| {
                record
                    .position()
                    .and_then(|pos| usize::try_from(pos.byte()).ok())
                    .ok_or_else(|| FormatError::Parse("CSV: record without position".to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut output = String::with_capacity(original.len());
        output.push_str(&original[..starts.first().copied().unwrap_or(original.len())]);

        let mut outputs = units.iter().map(TranslationUnit::output_text);
        for (index, record) in records.iter().enumerate() {
            let end = starts.get(index + 1).copied().unwrap_or(original.len());
            let span = &original[starts[index]..end];

            let row: Vec<&str> = record.iter().map(|cell| outputs.next().unwrap_or(cell)).collect();
            if row.iter().zip(record.iter()).all(|(out, cell)| *out == cell) {
                output.push_str(span);
                continue;
            }

            let text = span.trim_end_matches(['\r', '\n']);
            output.push_str(&encode_row(&row)?);
            output.push_str(&span[text.len()..]);
        }

        Ok(output)
    }
}

/// A single CSV row without its terminator
fn encode_row(row: &[&str]) -> Result<String, FormatError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record(row)
        .map_err(|e| FormatError::Serialize(format!("CSV: {}", e)))?;

    let bytes = writer
        .into_inner()
        .map_err(|e| FormatError::Serialize(format!("CSV: {}", e)))?;
    let encoded = String::from_utf8(bytes).map_err(|e| FormatError::Serialize(format!("CSV: {}", e)))?;
    Ok(encoded.strip_suffix('\n').unwrap_or(&encoded).to_string())
}
