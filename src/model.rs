mod invariants;
pub mod layout_tree;
pub mod node;
pub mod selection;
mod traversal;
pub mod tree;

pub use invariants::InvariantViolation;
pub use layout_tree::LayoutTree;
pub use node::{NodeKind, SpecialContainer, TilingContainer, WindowId};
pub use tree::NodeId;
