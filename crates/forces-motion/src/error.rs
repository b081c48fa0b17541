//! Error types for model operations.

use std::fmt;

use crate::api::types::{ItemId, KnotId, PullerId, Side};

/// Errors returned by model operations. None of them leave the model in a
/// partially-updated state: a failed operation mutates nothing.
#[derive(Debug)]
pub enum ModelError {
    UnknownPuller(PullerId),
    UnknownKnot(KnotId),
    UnknownItem(ItemId),
    /// The knot already holds a different puller.
    KnotOccupied { knot: KnotId, holder: PullerId },
    /// Pullers only attach to knots on their own team's side.
    SideMismatch { puller: Side, knot: Side },
    ItemAlreadyStacked(ItemId),
    ItemNotStacked(ItemId),
    /// Move or drop for a puller that was never grabbed.
    NotDragging(PullerId),
    /// A config field is out of range.
    InvalidConfig { field: &'static str, reason: &'static str },
    /// A snapshot did not describe a reachable model state.
    InvalidState(String),
    Json(serde_json::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownPuller(id) => write!(f, "no puller with index {}", id.0),
            ModelError::UnknownKnot(id) => write!(f, "no knot with index {}", id.0),
            ModelError::UnknownItem(id) => write!(f, "no item with index {}", id.0),
            ModelError::KnotOccupied { knot, holder } => {
                write!(f, "knot {} is already held by puller {}", knot.0, holder.0)
            }
            ModelError::SideMismatch { puller, knot } => write!(
                f,
                "a {} puller cannot hold a {} knot",
                puller.team(),
                knot.team()
            ),
            ModelError::ItemAlreadyStacked(id) => write!(f, "item {} is already on the stack", id.0),
            ModelError::ItemNotStacked(id) => write!(f, "item {} is not on the stack", id.0),
            ModelError::NotDragging(id) => write!(f, "puller {} is not being dragged", id.0),
            ModelError::InvalidConfig { field, reason } => write!(f, "config {} {}", field, reason),
            ModelError::InvalidState(reason) => write!(f, "invalid state: {}", reason),
            ModelError::Json(err) => write!(f, "json: {}", err),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Json(err)
    }
}
