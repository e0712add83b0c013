//! Traits for generator system standardization.

use super::{GeneratedDocument, GenerationError};

/// Trait for document generators.
pub trait Generator<Req> {
    /// Generate a document from the request.
    fn generate(&self, request: Req) -> Result<GeneratedDocument, GenerationError>;
}
