//! Recognition domain module.
//!
//! Holds the recognizer's output shape and the extraction logic that maps it
//! onto report fields.

mod extractor;
mod result;

pub use extractor::{get_date_time, EntityExtractor, ExtractedEntity, DEFAULT_QUALIFIER};
pub use result::{IntentScore, RecognizerResult, DATETIME_KEY, INSTANCE_KEY};
