//! Attendance documents for the local rehearsal (ensaio local).
//!
//! Two generators share the `docx` toolkit:
//! - `AttendanceListGenerator` - builds the musicians/organists signature list from scratch
//! - `ComparecimentoGenerator` - patches the date into the comparecimento template
//!
//! `handlers` exposes both over HTTP and `download` packages the bytes as an attachment.

pub mod assembler;
pub mod comparecimento;
pub mod download;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod patcher;
pub mod traits;

pub use assembler::AttendanceListGenerator;
pub use comparecimento::ComparecimentoGenerator;
pub use models::{AttendanceRequest, AttendanceSheet, ComparecimentoRequest};
pub use patcher::{PatchOutcome, TemplatePatcher};
pub use traits::Generator;

use thiserror::Error;

use crate::docx::DocxError;

/// Download name of the musicians/organists list.
pub const ATTENDANCE_FILENAME: &str = "LISTA_ENSAIO_LOCAL_EDITADO.docx";

/// Download name of the patched comparecimento template.
pub const COMPARECIMENTO_FILENAME: &str = "COMPARCIMENTO_ENSAIO_LOCAL.docx";

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to load template {path}: {source}")]
    TemplateIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("document error: {0}")]
    Docx(#[from] DocxError),
    #[error("blocking task failed: {0}")]
    Blocking(String),
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: &'static str,
    pub bytes: Vec<u8>,
}
