//! Error type for [`super::PreProcessor`] operations.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PreProcessorError {
    /// A symbol/side mismatch between a submitted order and this pre-processor.
    SideMismatch,
}

impl fmt::Display for PreProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreProcessorError::SideMismatch => write!(f, "order side does not match this pre-processor"),
        }
    }
}

impl std::error::Error for PreProcessorError {}
