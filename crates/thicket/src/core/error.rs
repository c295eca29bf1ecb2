use std::result::Result as StdResult;

use thiserror::Error;

use crate::{WidgetId, geom};

/// Result type for thicket operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("geometry: {0}")]
    /// Non-positive sizes and other geometry failures.
    Geometry(String),
    #[error("layout: {0}")]
    /// Layout failure, e.g. a grid with no free cell.
    Layout(String),
    #[error("schedule: {0}")]
    /// Scheduler misuse, e.g. rescheduling a live task.
    Schedule(String),
    #[error("task: {0}")]
    /// A task body failed.
    Task(String),
    #[error("backend: {0}")]
    /// Terminal backend failure.
    Backend(String),
    #[error("widget not found: {0:?}")]
    /// A widget identifier does not refer to a live widget.
    NodeNotFound(WidgetId),
    #[error("invalid: {0}")]
    /// Structural misuse of the widget tree.
    Invalid(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}
