use tracing::trace;

use crate::common::config::LayoutSettings;
use crate::common::geometry::Rect;
use crate::layout_engine::{LayoutError, LayoutKind, Orientation};
use crate::model::{LayoutTree, NodeId, WindowId};

/// Wide or square areas split side by side, tall ones top to bottom. Without
/// a rect to go on, split horizontally.
pub fn split_orientation(rect: Option<Rect>) -> Orientation {
    match rect {
        Some(rect) if !rect.is_wide() => Orientation::Vertical,
        _ => Orientation::Horizontal,
    }
}

/// Binds `wid` into the tiling tree of `ws`, next to the workspace's most
/// recent window.
///
/// In a dwindle root the focused leaf's slot is split: a new container with
/// an orientation picked from the leaf's last rect takes its place, holding
/// the old leaf first and the new window second. An empty root takes the
/// window as its direct child. Other root layouts get the window right after
/// the focused one. The new window ends up most recent at every level.
pub fn insert_window(
    tree: &mut LayoutTree,
    ws: NodeId,
    wid: WindowId,
    settings: &LayoutSettings,
) -> Result<NodeId, LayoutError> {
    if tree.window_node(wid).is_some() {
        return Err(LayoutError::WindowAlreadyBound(wid));
    }
    let root = tree.ensure_root_container(
        ws,
        settings.default_root_container_orientation,
        settings.default_root_container_layout,
    );
    let root_layout = tree.container(root).map(|c| c.layout);

    let node = match tree.most_recent_window_recursive(root) {
        None => tree.new_window(root, wid)?,
        Some(focused) if root_layout == Some(LayoutKind::Dwindle) => {
            let orientation = split_orientation(tree.window_rect(focused));
            trace!(?focused, ?orientation, "splitting focused leaf");
            let split = tree.wrap_in_container(focused, orientation, LayoutKind::Dwindle);
            tree.new_window(split, wid)?
        }
        Some(focused) => tree.new_window_after(focused, wid)?,
    };
    tree.mark_as_most_recent(node);
    Ok(node)
}
