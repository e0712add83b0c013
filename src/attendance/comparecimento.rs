//! Generator for the comparecimento (attendance confirmation) document.
//!
//! The document is a fixed template; only its printed date changes.

use std::fs;
use std::path::Path;

use crate::config::ComparecimentoStyle;

use super::models::ComparecimentoRequest;
use super::patcher::TemplatePatcher;
use super::traits::Generator;
use super::{GeneratedDocument, GenerationError, COMPARECIMENTO_FILENAME};

pub struct ComparecimentoGenerator {
    template: Vec<u8>,
    style: ComparecimentoStyle,
}

impl ComparecimentoGenerator {
    /// Load the template from disk.
    pub fn load(path: &Path, style: ComparecimentoStyle) -> Result<Self, GenerationError> {
        let template = fs::read(path).map_err(|source| GenerationError::TemplateIo {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_bytes(template, style))
    }

    pub fn from_bytes(template: Vec<u8>, style: ComparecimentoStyle) -> Self {
        Self { template, style }
    }
}

impl Generator<ComparecimentoRequest> for ComparecimentoGenerator {
    fn generate(
        &self,
        request: ComparecimentoRequest,
    ) -> Result<GeneratedDocument, GenerationError> {
        let new_date = request.normalized_date();
        let outcome = TemplatePatcher::new(&self.style).patch(&self.template, &new_date)?;

        if outcome.replacements == 0 {
            log::warn!(
                "Template date {} not found; returning template unchanged",
                self.style.template_date
            );
        } else {
            log::debug!(
                "Replaced {} occurrence(s) of {} with {}",
                outcome.replacements,
                self.style.template_date,
                new_date
            );
        }

        Ok(GeneratedDocument {
            filename: COMPARECIMENTO_FILENAME,
            bytes: outcome.bytes,
        })
    }
}
