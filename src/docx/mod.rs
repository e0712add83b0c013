//! Minimal WordprocessingML (`.docx`) toolkit.
//!
//! Covers what the attendance generators need and nothing more:
//! - `model` - in-memory document tree (paragraphs, runs, tables)
//! - `writer` - serializes a [`Document`] into a complete OOXML package
//! - `reader` - parses a package back into a [`Document`]
//! - `package` - ordered zip entry I/O shared by the writer and the template patcher

pub mod model;
pub mod package;
pub mod reader;
pub mod writer;

pub use model::{
    Alignment, Block, Document, PageSetup, Paragraph, ParagraphFormat, Run, RunFormat, Table,
    TableCell, TableRow,
};
pub use reader::read_document;
pub use writer::write_document;

use thiserror::Error;

/// MIME type of a WordprocessingML document.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Main namespace of WordprocessingML parts.
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Path of the main document part inside the package.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Errors raised while reading or writing a `.docx` package.
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("malformed XML: {0}")]
    Parse(#[from] roxmltree::Error),
    #[error("part is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("package has no {0} part")]
    MissingPart(String),
    #[error("unbalanced element in {0}")]
    Unbalanced(&'static str),
}

/// Convert centimetres to twips the same way Word does (via EMU, truncating).
pub fn cm_to_twips(cm: f64) -> u32 {
    let emu = (cm * 360_000.0).round() as u64;
    (emu / 635) as u32
}

/// Convert points to the half-point unit used by `w:sz`.
pub fn pt_to_half_points(pt: f64) -> u32 {
    (pt * 2.0).round() as u32
}

/// Convert points to the twentieth-of-a-point unit used by `w:spacing`.
pub fn pt_to_twentieths(pt: f64) -> u32 {
    (pt * 20.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm_to_twips_matches_word_rounding() {
        assert_eq!(cm_to_twips(18.0), 10204);
        assert_eq!(cm_to_twips(11.0), 6236);
        assert_eq!(cm_to_twips(7.0), 3968);
        assert_eq!(cm_to_twips(1.5), 850);
    }

    #[test]
    fn test_point_conversions() {
        assert_eq!(pt_to_half_points(14.0), 28);
        assert_eq!(pt_to_half_points(12.0), 24);
        assert_eq!(pt_to_twentieths(0.0), 0);
        assert_eq!(pt_to_twentieths(6.0), 120);
    }
}
