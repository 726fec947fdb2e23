use tracing::{debug, trace};

use crate::model::{LayoutTree, NodeId};

/// Collapses every tiling container under the workspace's root that is left
/// with a single child, splicing the child into the container's slot.
///
/// Containers are visited children first, so one pass handles cascades. The
/// root container is only replaced when its single child is itself a
/// container; a root holding one window stays. Returns how many containers
/// were removed, which is zero on an already normalized tree.
pub fn normalize_workspace(tree: &mut LayoutTree, ws: NodeId) -> usize {
    let Some(root) = tree.root_container(ws) else {
        return 0;
    };
    let containers: Vec<NodeId> = root
        .traverse_postorder(tree.map())
        .filter(|&node| tree.container(node).is_some())
        .collect();

    let mut collapsed = 0;
    for node in containers {
        let map = tree.map();
        let (Some(child), None) = (node.first_child(map), node.nth_child(map, 1)) else {
            continue;
        };
        if node == root && tree.container(child).is_none() {
            continue;
        }
        trace!(?node, ?child, "flattening single-child container");
        tree.flatten_into_parent(node);
        collapsed += 1;
    }
    if collapsed > 0 {
        debug!(collapsed, "normalized workspace");
    }
    collapsed
}
