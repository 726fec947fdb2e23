use tracing::debug;

use crate::layout_engine::boundaries::{BoundariesAction, BoundaryResolution};
use crate::layout_engine::navigator::find_spatial_target;
use crate::layout_engine::{Direction, LayoutError};
use crate::model::{LayoutTree, NodeId, WindowId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Focused(WindowId),
    Swapped { moved: WindowId, displaced: WindowId },
    Normalized { collapsed: usize },
    /// Hit the edge of the workspace and left everything as it was.
    Stopped,
}

fn resolve_target(
    tree: &LayoutTree,
    from: NodeId,
    direction: Direction,
    boundaries_action: BoundariesAction,
) -> Result<Option<NodeId>, LayoutError> {
    if let Some(target) = find_spatial_target(tree, from, direction) {
        return Ok(Some(target));
    }
    debug!(?from, %direction, %boundaries_action, "no window in direction");
    match boundaries_action.strategy().resolve(tree, from, direction)? {
        BoundaryResolution::Stop => Ok(None),
        BoundaryResolution::Retarget(target) => Ok(Some(target)),
    }
}

fn window_of(tree: &LayoutTree, node: NodeId) -> WindowId {
    match tree.window_id(node) {
        Some(wid) => wid,
        None => crate::model::layout_tree::broken_invariant(format_args!(
            "navigation ended on non-window {node:?}"
        )),
    }
}

/// Moves focus from the leaf `from` to the window in `direction`.
pub fn focus(
    tree: &mut LayoutTree,
    from: NodeId,
    direction: Direction,
    boundaries_action: BoundariesAction,
) -> Result<CommandOutcome, LayoutError> {
    let Some(target) = resolve_target(tree, from, direction, boundaries_action)? else {
        return Ok(CommandOutcome::Stopped);
    };
    tree.mark_as_most_recent(target);
    Ok(CommandOutcome::Focused(window_of(tree, target)))
}

/// Swaps the leaf `from` with the window in `direction`. The moved window
/// stays focused.
pub fn move_node(
    tree: &mut LayoutTree,
    from: NodeId,
    direction: Direction,
    boundaries_action: BoundariesAction,
) -> Result<CommandOutcome, LayoutError> {
    let Some(target) = resolve_target(tree, from, direction, boundaries_action)? else {
        return Ok(CommandOutcome::Stopped);
    };
    let moved = window_of(tree, from);
    let displaced = window_of(tree, target);
    tree.swap_leaves(from, target);
    tree.mark_as_most_recent(from);
    Ok(CommandOutcome::Swapped { moved, displaced })
}
