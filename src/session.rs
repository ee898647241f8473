//! Per-scan session state
//!
//! Delivery problems are never allowed to abort an otherwise-successful
//! scan, so the pipeline records a single user-facing message here instead
//! of returning an error. The session is passed by mutable reference
//! through the pipeline; there is no process-wide state.

use uuid::Uuid;

/// Mutable state for one scan invocation
#[derive(Debug)]
pub struct ScanSession {
    id: Uuid,
    error: Option<String>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Record a user-facing delivery error.
    ///
    /// The first message wins; the pipeline short-circuits after a failure
    /// so later stages never overwrite the cause.
    pub fn record_error(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_error_wins() {
        let mut session = ScanSession::new();
        assert!(session.error().is_none());

        session.record_error("Could not compress report.");
        session.record_error("Report upload failed.");

        assert_eq!(session.error(), Some("Could not compress report."));
    }
}
