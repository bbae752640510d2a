//! Shared OOXML container plumbing for the Excel and Word renderers.
//!
//! Both `.xlsx` and `.docx` are zip archives of XML parts. Token replacement
//! happens on XML character data only, streamed through quick-xml so markup
//! is never touched and replacement values are re-escaped on write. The
//! container keeps every part byte-for-byte except the ones a renderer asks
//! to rewrite.

use std::io::{Cursor, Read, Write};

use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::placeholders::apply_tokens;

#[derive(Debug, Error)]
pub enum OoxmlError {
    #[error("not a valid OOXML container: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("missing document part: {0}")]
    MissingPart(String),
    #[error("failed to rebuild archive: {0}")]
    Io(#[from] std::io::Error),
}

/// An OOXML archive loaded into memory as an ordered list of named parts.
pub struct Container {
    parts: Vec<(String, Vec<u8>)>,
}

impl Container {
    pub fn open(blob: &[u8]) -> Result<Self, OoxmlError> {
        let mut archive = ZipArchive::new(Cursor::new(blob.to_vec()))?;
        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)?;
            parts.push((file.name().to_string(), bytes));
        }
        Ok(Self { parts })
    }

    pub fn part(&self, name: &str) -> Result<&[u8], OoxmlError> {
        self.parts
            .iter()
            .find(|(part_name, _)| part_name == name)
            .map(|(_, bytes)| bytes.as_slice())
            .ok_or_else(|| OoxmlError::MissingPart(name.to_string()))
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    /// Run placeholder replacement over the text nodes of every part whose
    /// name matches `select`.
    pub fn rewrite_text<F>(
        &mut self,
        select: F,
        table: &[(String, String)],
    ) -> Result<(), OoxmlError>
    where
        F: Fn(&str) -> bool,
    {
        for (name, bytes) in &mut self.parts {
            if select(name) {
                *bytes = replace_text_nodes(bytes, table)?;
            }
        }
        Ok(())
    }

    /// Re-pack the parts into a zip archive, preserving part order.
    pub fn to_bytes(&self) -> Result<Vec<u8>, OoxmlError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, bytes) in &self.parts {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(bytes)?;
        }
        Ok(writer.finish()?.into_inner())
    }
}

/// Replace placeholder tokens inside the character data of an XML part.
/// Element and attribute markup passes through untouched; rewritten text is
/// escaped again on output, so a replacement value containing `&` or `<`
/// cannot corrupt the document.
pub fn replace_text_nodes(
    xml: &[u8],
    table: &[(String, String)],
) -> Result<Vec<u8>, OoxmlError> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Text(text) => {
                let raw = text.unescape()?.into_owned();
                let replaced = apply_tokens(&raw, table);
                writer.write_event(Event::Text(BytesText::new(&replaced)))?;
            }
            event => writer.write_event(event)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}
