mod boundaries;
mod commands;
pub mod description;
pub mod engine;
mod error;
pub(crate) mod graph;
mod insertion;
mod navigator;
mod normalize;

pub use boundaries::{BoundariesAction, BoundaryResolution, BoundaryStrategy};
pub use commands::CommandOutcome;
pub use description::LayoutDescription;
pub use engine::{EventResponse, LayoutCommand, LayoutEngine, LayoutEvent};
pub use error::LayoutError;
pub use graph::{Direction, LayoutKind, Orientation};
pub use insertion::split_orientation;
pub use navigator::find_spatial_target;
pub use normalize::normalize_workspace;
