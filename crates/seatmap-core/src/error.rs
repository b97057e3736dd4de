//! Error types for the seat-map core.
//!
//! Two classes exist. An [`InvariantViolation`] means the caller broke a
//! documented precondition; the operation halts before mutating anything and
//! is never retried. A [`Rejection`] means the user supplied geometrically
//! invalid input; the surrounding UI shows a notice and reverts to its
//! default state.

use crate::id::ObjectId;
use thiserror::Error;

/// Caller contract violations. Fatal for the current operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("editing mode requires exactly one selected sector, found {selected} selected object(s)")]
    NoSectorSelected { selected: usize },

    #[error("object {0} is not a sector")]
    NotASector(ObjectId),

    #[error("cannot leave editing mode: no sector is being edited")]
    NotEditing,

    #[error("a top-level seat {0} was found outside of any sector")]
    LooseSeat(ObjectId),

    #[error("object {id} of kind `{kind}` cannot be exported")]
    UnsupportedObject { id: ObjectId, kind: &'static str },

    #[error("seat {id} has invalid grid coordinates ({row}, {col})")]
    InvalidGridCoordinates { id: ObjectId, row: u32, col: u32 },

    #[error("no object with id {0} exists on the canvas")]
    UnknownObject(ObjectId),

    #[error("editing session references seat {0} which is no longer on the canvas")]
    MissingEditingSeat(ObjectId),

    #[error("the document cannot be saved or replaced while a sector is being edited")]
    EditingInProgress,
}

/// Recoverable user-input rejections.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("a sector must be at least {min_rows}x{min_cols} seats, got {rows}x{cols}")]
    SectorTooSmall {
        rows: u32,
        cols: u32,
        min_rows: u32,
        min_cols: u32,
    },

    #[error("a sector may be at most {max_rows}x{max_cols} seats, got {rows}x{cols}")]
    SectorTooLarge {
        rows: u32,
        cols: u32,
        max_rows: u32,
        max_cols: u32,
    },

    #[error("gap must be a non-negative number, got {0}")]
    NegativeGap(f64),

    #[error("venue size must be positive, got {width}x{height}")]
    InvalidVenueSize { width: f64, height: f64 },

    #[error("seat rows and columns start at 1")]
    ZeroGridCoordinate,

    #[error("`{0}` is not a valid color")]
    InvalidColor(String),

    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),
}

#[derive(Debug, Error)]
pub enum SeatMapError {
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("clipboard encode: {0}")]
    ClipboardEncode(#[from] rmp_serde::encode::Error),

    #[error("clipboard decode: {0}")]
    ClipboardDecode(#[from] rmp_serde::decode::Error),
}

impl SeatMapError {
    /// True for contract violations that indicate a caller bug.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SeatMapError::Invariant(_))
    }

    /// The user-facing rejection, if this error is one.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            SeatMapError::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

pub type Result<T, E = SeatMapError> = std::result::Result<T, E>;

/// Log and wrap an invariant violation.
pub fn violation(v: InvariantViolation) -> SeatMapError {
    log::error!("invariant violation: {v}");
    SeatMapError::Invariant(v)
}

/// Log and wrap a user-input rejection.
pub fn rejection(r: Rejection) -> SeatMapError {
    log::warn!("rejected: {r}");
    SeatMapError::Rejected(r)
}
