//! Ordered zip I/O for OOXML packages.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::DocxError;

/// One package part: its zip entry name and raw bytes.
pub type Part = (String, Vec<u8>);

/// Read every entry of a package, preserving archive order.
pub fn read_parts(bytes: &[u8]) -> Result<Vec<Part>, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut parts = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        parts.push((name, data));
    }
    Ok(parts)
}

/// Read a single part as UTF-8 text.
pub fn read_part_string(bytes: &[u8], name: &str) -> Result<String, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(DocxError::MissingPart(name.to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    let mut data = Vec::new();
    entry.read_to_end(&mut data)?;
    Ok(String::from_utf8(data)?)
}

/// Write parts into a fresh in-memory package.
///
/// Media is stored uncompressed, everything else is deflated, matching what Word
/// itself produces.
pub fn write_parts(parts: &[Part]) -> Result<Vec<u8>, DocxError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, data) in parts {
        let options = if name.starts_with("word/media/") {
            stored
        } else {
            deflated
        };
        zip.start_file(name.as_str(), options)?;
        zip.write_all(data)?;
    }

    Ok(zip.finish()?.into_inner())
}
