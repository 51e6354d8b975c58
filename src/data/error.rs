//! Errors raised while reconstructing a timeline.

use thiserror::Error;

/// Errors that make a monitor's timeline impossible to compute.
///
/// Only the affected monitor is lost; the page keeps rendering the others
/// and shows this one as unavailable, never as healthy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// The events payload does not have the expected outer shape.
    #[error("invalid upstream format: {0}")]
    InvalidUpstreamFormat(String),
}
