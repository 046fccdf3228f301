//! Errors shared by every engine operation.
//!
//! Whole-call failures surface as [`EngineError`]. Batch operations that
//! isolate failures per item wrap the error in a [`HitError`] carrying the
//! offending row's position and identifier.

use thiserror::Error;

/// Broad category of an [`EngineError`].
///
/// Hosts that only need to branch on the failure class can match on the kind
/// instead of the full error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Buffer shape or length mismatch.
    InvalidInput,
    /// Non-finite or out-of-range latitude/longitude.
    InvalidCoordinate,
    /// Ring or polygon too small or self-contradicting.
    DegenerateGeometry,
    /// Missing or out-of-range weights, threshold or world size.
    InvalidConfig,
}

impl ErrorKind {
    /// Return the kind as a stable identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "InvalidInput",
            Self::InvalidCoordinate => "InvalidCoordinate",
            Self::DegenerateGeometry => "DegenerateGeometry",
            Self::InvalidConfig => "InvalidConfig",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A buffer's shape or length did not match the operation's arity.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of the mismatch.
        reason: String,
    },
    /// A coordinate was non-finite or outside the WGS84 range.
    #[error("invalid coordinate ({lat}, {lng}): {reason}")]
    InvalidCoordinate {
        /// Latitude as supplied.
        lat: f64,
        /// Longitude as supplied.
        lng: f64,
        /// Which constraint was violated.
        reason: &'static str,
    },
    /// A ring or polygon could not enclose any area.
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry {
        /// Description of the defect.
        reason: String,
    },
    /// A configuration value was missing or out of range.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: String,
        /// Which constraint was violated.
        reason: String,
    },
}

impl EngineError {
    /// Build an [`EngineError::InvalidInput`].
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Build an [`EngineError::InvalidCoordinate`].
    #[must_use]
    pub const fn invalid_coordinate(lat: f64, lng: f64, reason: &'static str) -> Self {
        Self::InvalidCoordinate { lat, lng, reason }
    }

    /// Build an [`EngineError::DegenerateGeometry`].
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    /// Build an [`EngineError::InvalidConfig`].
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Return the broad category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::InvalidCoordinate { .. } => ErrorKind::InvalidCoordinate,
            Self::DegenerateGeometry { .. } => ErrorKind::DegenerateGeometry,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }
}

/// A failure isolated to a single row of a batch.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("hit #{index} ({id}): {error}")]
pub struct HitError {
    /// Position of the row in the caller's batch.
    pub index: usize,
    /// Identifier of the offending hit.
    pub id: String,
    /// Underlying failure.
    #[source]
    pub error: EngineError,
}

impl HitError {
    /// Attach row context to an [`EngineError`].
    pub fn new(index: usize, id: impl Into<String>, error: EngineError) -> Self {
        Self {
            index,
            id: id.into(),
            error,
        }
    }

    /// Return the broad category of the underlying failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EngineError::invalid_input("odd"), ErrorKind::InvalidInput)]
    #[case(
        EngineError::invalid_coordinate(f64::NAN, 0.0, "latitude is not finite"),
        ErrorKind::InvalidCoordinate
    )]
    #[case(EngineError::degenerate("two points"), ErrorKind::DegenerateGeometry)]
    #[case(
        EngineError::invalid_config("threshold_px", "must be positive"),
        ErrorKind::InvalidConfig
    )]
    fn kind_matches_variant(#[case] error: EngineError, #[case] expected: ErrorKind) {
        assert_eq!(error.kind(), expected);
    }

    #[rstest]
    fn hit_error_mentions_row_and_cause() {
        let err = HitError::new(3, "venue-9", EngineError::invalid_input("bad row"));
        let message = err.to_string();
        assert!(message.contains("#3"));
        assert!(message.contains("venue-9"));
        assert!(message.contains("bad row"));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[rstest]
    fn config_error_names_field() {
        let err = EngineError::invalid_config("world_size", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration for `world_size`: must be positive"
        );
    }
}
