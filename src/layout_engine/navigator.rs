//! Directional targeting inside dwindle trees.
//!
//! Picking the most recent child of the neighbouring subtree is not enough:
//! moving up from the right half of a bottom row has to land on the right
//! half of the row above, whatever was focused there last. So the descent
//! into the neighbour replays the index path that led from the shared
//! ancestor down to the source window.

use crate::layout_engine::{Direction, LayoutKind};
use crate::model::{LayoutTree, NodeId};

/// The window `direction` leads to from the leaf `from`, or `None` when
/// `from` is at the edge of its workspace's dwindle tree.
pub fn find_spatial_target(tree: &LayoutTree, from: NodeId, direction: Direction) -> Option<NodeId> {
    let (container, index) = tree.closest_parent(from, direction, Some(LayoutKind::Dwindle))?;
    let map = tree.map();
    let neighbour_index = direction.step(index, container.child_count(map))?;
    let branch = container.nth_child(map, index)?;
    let neighbour = container.nth_child(map, neighbour_index)?;
    let path = tree.index_path(branch, from);
    descend_mirrored(tree, neighbour, direction, &path)
}

/// Walks from `start` down to a window, one level per step.
///
/// A container laid out along `direction` is entered from the side we come
/// from: its first child when moving right or down, its last otherwise. A
/// perpendicular container keeps the source's position by taking the next
/// index of `path`, clamped to its children. Every level consumes one path
/// element; once the path runs out, perpendicular containers fall back to
/// their most recent child.
pub(crate) fn descend_mirrored(
    tree: &LayoutTree,
    start: NodeId,
    direction: Direction,
    path: &[usize],
) -> Option<NodeId> {
    let map = tree.map();
    let mut path = path.iter().copied();
    let mut node = start;
    loop {
        if tree.kind(node).is_window() {
            return Some(node);
        }
        let container = tree.container(node)?;
        let len = node.child_count(map);
        let mirrored = path.next();
        let child = if container.orientation == direction.orientation() {
            if direction.is_positive() {
                node.first_child(map)
            } else {
                node.last_child(map)
            }
        } else if let Some(index) = mirrored {
            node.nth_child(map, index.min(len.checked_sub(1)?))
        } else {
            tree.most_recent_child(node)
        };
        node = child?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_engine::description::*;
    use crate::model::WindowId;

    /// v[h[v[1, 2], v[3, 4]], h[5, 6]]
    fn grid() -> LayoutTree {
        let mut tree = LayoutTree::new();
        let ws = tree.get_or_create_workspace("main");
        tree.build_from_description(
            ws,
            &v_dwindle(vec![
                h_dwindle(vec![
                    v_dwindle(vec![window(1), window(2)]),
                    v_dwindle(vec![window(3), window(4)]),
                ]),
                h_dwindle(vec![window(5), window(6)]),
            ]),
        )
        .unwrap();
        tree
    }

    fn target(tree: &LayoutTree, from: u32, direction: Direction) -> Option<u32> {
        let node = tree.window_node(WindowId(from)).unwrap();
        find_spatial_target(tree, node, direction)
            .and_then(|n| tree.window_id(n))
            .map(|w| w.0)
    }

    #[test]
    fn mirrors_position_across_branches() {
        let mut tree = grid();
        // Recency must not matter for any of these.
        for id in [1, 3, 5] {
            let node = tree.window_node(WindowId(id)).unwrap();
            tree.mark_as_most_recent(node);
        }
        assert_eq!(target(&tree, 6, Direction::Up), Some(4));
        assert_eq!(target(&tree, 5, Direction::Up), Some(2));
        assert_eq!(target(&tree, 2, Direction::Right), Some(4));
        assert_eq!(target(&tree, 4, Direction::Down), Some(6));
        assert_eq!(target(&tree, 3, Direction::Left), Some(1));
    }

    #[test]
    fn sibling_and_edge_targets() {
        let tree = grid();
        assert_eq!(target(&tree, 1, Direction::Down), Some(2));
        assert_eq!(target(&tree, 2, Direction::Down), Some(5));
        assert_eq!(target(&tree, 5, Direction::Right), Some(6));
        assert_eq!(target(&tree, 6, Direction::Left), Some(5));
        assert_eq!(target(&tree, 1, Direction::Up), None);
        assert_eq!(target(&tree, 1, Direction::Left), None);
        assert_eq!(target(&tree, 6, Direction::Down), None);
        assert_eq!(target(&tree, 4, Direction::Right), None);
    }

    #[test]
    fn exhausted_path_falls_back_to_most_recent_child() {
        let mut tree = LayoutTree::new();
        let ws = tree.get_or_create_workspace("main");
        tree.build_from_description(
            ws,
            &h_dwindle(vec![window(1), v_dwindle(vec![window(2), window(3)])]),
        )
        .unwrap();
        assert_eq!(target(&tree, 1, Direction::Right), Some(2));
        let three = tree.window_node(WindowId(3)).unwrap();
        tree.mark_as_most_recent(three);
        assert_eq!(target(&tree, 1, Direction::Right), Some(3));
    }

    #[test]
    fn path_index_is_clamped() {
        let mut tree = LayoutTree::new();
        let ws = tree.get_or_create_workspace("main");
        tree.build_from_description(
            ws,
            &v_dwindle(vec![
                h_dwindle(vec![window(1)]),
                h_dwindle(vec![window(2), window(3), window(4)]),
            ]),
        )
        .unwrap();
        assert_eq!(target(&tree, 4, Direction::Up), Some(1));
        assert_eq!(target(&tree, 1, Direction::Down), Some(2));
    }

    #[test]
    fn non_dwindle_containers_are_not_crossed() {
        let mut tree = LayoutTree::new();
        let ws = tree.get_or_create_workspace("main");
        tree.build_from_description(ws, &h_tiles(vec![window(1), window(2)])).unwrap();
        assert_eq!(target(&tree, 1, Direction::Right), None);
    }
}
