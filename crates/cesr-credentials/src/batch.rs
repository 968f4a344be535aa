//! Batch validation over a parsed event list.

use crate::errors::CredentialError;
use crate::validator::Validator;
use cesr_stream::{display_field, Event};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// One event that failed validation.
#[derive(Debug)]
pub struct EventFailure {
    /// Zero-based position in the event list.
    pub index: usize,
    /// Sequence identifier (`s`) as displayed, `?` when absent.
    pub sequence: String,
    /// Why validation failed.
    pub error: CredentialError,
}

impl fmt::Display for EventFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "event {} (sn={}) ⇒ {}",
            self.index + 1,
            self.sequence,
            self.error
        )
    }
}

/// Result of validating every event in a list.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Credentials accepted by some schema version.
    pub accepted: usize,
    /// Events that failed, in list order.
    pub failures: Vec<EventFailure>,
}

impl BatchReport {
    /// Returns true when no event failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Converts the report into the accepted count or a combined error.
    pub fn into_result(self) -> Result<usize, BatchError> {
        if self.failures.is_empty() {
            Ok(self.accepted)
        } else {
            Err(BatchError {
                accepted: self.accepted,
                failures: self.failures,
            })
        }
    }
}

/// Combined report for a batch with at least one failure.
#[derive(Error, Debug)]
#[error("validation errors:\n{}", join_failures(.failures))]
pub struct BatchError {
    /// Credentials accepted before and after the failures.
    pub accepted: usize,
    /// Every failing event.
    pub failures: Vec<EventFailure>,
}

fn join_failures(failures: &[EventFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validates every event; a failing event never stops the batch.
pub fn validate_batch(validator: &mut Validator, events: &[Event]) -> BatchReport {
    let mut report = BatchReport::default();

    for (index, event) in events.iter().enumerate() {
        match validator.validate_event(event) {
            Ok(outcome) if outcome.is_accepted() => report.accepted += 1,
            Ok(_) => {}
            Err(error) => report.failures.push(EventFailure {
                index,
                sequence: display_field(event.sequence()),
                error,
            }),
        }
    }

    debug!(
        events = events.len(),
        accepted = report.accepted,
        failed = report.failures.len(),
        "batch validated"
    );
    report
}
