use std::io::Cursor;

use quick_xml::events::{BytesCData, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::{ensure_unit_count, split_padding, FileFormat, FormatAdapter, TranslationUnit};
use crate::errors::FormatError;

/// Adapter for `.xml` documents
///
/// Every text or CDATA node is a unit keyed by its element path. Markup,
/// attributes, comments and declarations are streamed back as read.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlAdapter;

/// A text-bearing node found while streaming the document
struct TextNode {
    path: String,
    text: Option<String>,
}

/// Stream the document, reporting every text node and copying all other events
fn stream<F>(content: &str, mut on_text: F) -> Result<Vec<u8>, FormatError>
where
    F: FnMut(TextNode, Event<'static>, &mut Writer<Vec<u8>>) -> Result<(), FormatError>,
{
    let mut reader = Reader::from_reader(Cursor::new(content.as_bytes()));
    reader.trim_text(false);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| FormatError::Parse(format!("XML at byte {}: {}", reader.buffer_position(), e)))?
            .into_owned();

        // Undecodable text nodes are still reported, with `text: None`
        let text = match &event {
            Event::Eof => break,
            Event::Start(start) => {
                path.push(String::from_utf8_lossy(start.name().as_ref()).to_string());
                None
            }
            Event::End(_) => {
                path.pop();
                None
            }
            Event::Text(text) => Some(text.unescape().ok().map(|t| t.to_string())),
            Event::CData(cdata) => Some(std::str::from_utf8(cdata.as_ref()).ok().map(str::to_string)),
            _ => None,
        };

        match text {
            Some(text) => on_text(TextNode { path: path.join("/"), text }, event, &mut writer)?,
            None => write(&mut writer, event)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), FormatError> {
    writer
        .write_event(event)
        .map_err(|e| FormatError::Serialize(format!("XML: {}", e)))
}

impl FormatAdapter for XmlAdapter {
    fn format(&self) -> FileFormat {
        FileFormat::Xml
    }

    fn decompose(&self, content: &str) -> Result<Vec<TranslationUnit>, FormatError> {
        let mut units = Vec::new();
        stream(content, |node, event, writer| {
            let position = units.len();
            let unit = match node.text {
                Some(text) if !text.trim().is_empty() => {
                    let (_, core, _) = split_padding(&text);
                    let core = core.to_string();
                    TranslationUnit::translatable(position, node.path, text, core)
                }
                Some(text) => TranslationUnit::passthrough(position, text),
                None => TranslationUnit::passthrough(position, String::new()),
            };
            units.push(unit);
            write(writer, event)
        })?;
        Ok(units)
    }

    fn recompose(&self, original: &str, units: &[TranslationUnit]) -> Result<String, FormatError> {
        let expected = self.decompose(original)?.len();
        ensure_unit_count(expected, units)?;

        let mut remaining = units.iter();
        let bytes = stream(original, |node, event, writer| {
            let translation = remaining.next().and_then(|unit| unit.changed_translation());
            let (Some(text), Some(translation)) = (node.text, translation) else {
                return write(writer, event);
            };

            let (leading, _, trailing) = split_padding(&text);
            let padded = format!("{}{}{}", leading, translation, trailing);
            match event {
                Event::CData(_) if !padded.contains("]]>") => {
                    write(writer, Event::CData(BytesCData::new(padded.as_str())))
                }
                _ => write(writer, Event::Text(BytesText::new(&padded))),
            }
        })?;

        String::from_utf8(bytes).map_err(|e| FormatError::Serialize(format!("XML: {}", e)))
    }
}
