//! Per-side staging area: type-ranked admission, session gating, flush policy.

mod error;
mod processor;
mod types;

pub use error::PreProcessorError;
pub use processor::{FlushThresholds, PreProcessor};
pub use types::{Action, OrderActionInfo};
