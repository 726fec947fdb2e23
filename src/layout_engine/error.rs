use thiserror::Error;

use crate::layout_engine::Direction;
use crate::model::WindowId;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Window not found: {0}")]
    WindowNotFound(WindowId),
    #[error("Window already bound: {0}")]
    WindowAlreadyBound(WindowId),
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),
    #[error("Workspace {0} has no focused window")]
    NoFocusedWindow(String),
    #[error("No window to the {0} of the focused one")]
    BoundaryReached(Direction),
    #[error("Layout description has an empty nested container")]
    EmptyContainer,
    #[error("Invalid layout command: {0}")]
    InvalidCommand(#[from] serde_json::Error),
}
