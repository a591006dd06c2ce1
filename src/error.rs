//! Error taxonomy for the measurement core.
//!
//! None of these are fatal: every variant means "drop this interaction step".

use thiserror::Error;

/// Errors raised while turning pointer input into measurements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// A native point could not be turned into a canonical coordinate.
    /// Callers ignore the triggering event.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// An operation referenced a stale or unknown record id or position.
    /// Callers abort the current gesture.
    #[error("Measurement not found: {0}")]
    RecordNotFound(String),

    /// The drawing collaborator could not create or update a graphic.
    /// Callers skip the visual update but still commit the data change.
    #[error("Drawing collaborator failed: {0}")]
    CollaboratorFailure(String),
}
