//! Recognizer calls made on behalf of a turn.
//!
//! Recognition only ever enriches a turn. When the recognizer is unconfigured
//! it is skipped, and when a call fails the failure is logged and the turn
//! carries on as if no recognizer existed.

use tracing::warn;

use crate::domain::recognition::RecognizerResult;
use crate::ports::Recognizer;

/// Recognizes `text`, or returns `None` when the recognizer is off or fails.
pub(crate) async fn try_recognize(recognizer: &dyn Recognizer, text: &str) -> Option<RecognizerResult> {
    if !recognizer.is_configured() || text.trim().is_empty() {
        return None;
    }

    match recognizer.recognize(text).await {
        Ok(result) => Some(result),
        Err(err) => {
            warn!(error = %err, "Recognizer call failed, continuing without recognition");
            None
        }
    }
}
