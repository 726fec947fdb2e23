//! Read-only walks over the layout tree used by insertion and navigation.

use crate::layout_engine::{Direction, LayoutKind};
use crate::model::layout_tree::{LayoutTree, broken_invariant};
use crate::model::node::{NodeKind, WindowId};
use crate::model::tree::NodeId;

impl LayoutTree {
    /// Position of `node` among its parent's children, or `None` for roots.
    ///
    /// Panics if the parent does not list `node` as a child.
    #[track_caller]
    pub fn own_index(&self, node: NodeId) -> Option<usize> {
        let parent = node.parent(self.map())?;
        match self.children(parent).position(|c| c == node) {
            Some(index) => Some(index),
            None => broken_invariant(format_args!(
                "{node:?} is missing from the children of its parent {parent:?}"
            )),
        }
    }

    /// Ancestors of `node`, nearest first, excluding `node` itself.
    pub fn parents(&self, node: NodeId) -> Vec<NodeId> {
        node.ancestors(self.map()).skip(1).collect()
    }

    pub fn parents_with_self(&self, node: NodeId) -> Vec<NodeId> {
        node.ancestors(self.map()).collect()
    }

    pub fn node_workspace(&self, node: NodeId) -> Option<NodeId> {
        node.ancestors(self.map()).find(|&n| self.kind(n).is_workspace())
    }

    /// Follows most-recent-child links from `node` down to a window.
    pub fn most_recent_window_recursive(&self, node: NodeId) -> Option<NodeId> {
        let mut node = node;
        loop {
            if self.kind(node).is_window() {
                return Some(node);
            }
            node = self.most_recent_child(node)?;
        }
    }

    /// The first window under `node` in depth-first order.
    pub fn any_leaf_window_recursive(&self, node: NodeId) -> Option<NodeId> {
        node.traverse_preorder(self.map()).find(|&n| self.kind(n).is_window())
    }

    pub fn is_effectively_empty(&self, node: NodeId) -> bool {
        self.any_leaf_window_recursive(node).is_none()
    }

    /// Every window under `node`, depth-first, left to right.
    pub fn all_leaf_windows_recursive(&self, node: NodeId) -> Vec<WindowId> {
        node.traverse_preorder(self.map()).filter_map(|n| self.window_id(n)).collect()
    }

    /// Child indices leading from `ancestor` down to `descendant`.
    ///
    /// If `descendant` is not below `ancestor`, the walk runs up to the root
    /// and the path describes `descendant` relative to that root instead.
    pub fn index_path(&self, ancestor: NodeId, descendant: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = descendant;
        while current != ancestor {
            let Some(index) = self.own_index(current) else {
                break;
            };
            path.push(index);
            let Some(parent) = current.parent(self.map()) else {
                break;
            };
            current = parent;
        }
        path.reverse();
        path
    }

    /// The nearest ancestor container of `node` laid out along `direction`
    /// (and with `layout`, if given) that has a sibling on the `direction`
    /// side of the branch we came up through. Returns that container and the
    /// index of the branch.
    ///
    /// The search gives up at the workspace and at special containers.
    pub fn closest_parent(
        &self,
        node: NodeId,
        direction: Direction,
        layout: Option<LayoutKind>,
    ) -> Option<(NodeId, usize)> {
        let map = self.map();
        for current in node.ancestors(map) {
            let parent = current.parent(map)?;
            match self.kind(parent) {
                NodeKind::TilingContainer(container) => {
                    if container.orientation != direction.orientation()
                        || layout.is_some_and(|layout| layout != container.layout)
                    {
                        continue;
                    }
                    let index = self.own_index(current)?;
                    if direction.step(index, parent.child_count(map)).is_some() {
                        return Some((parent, index));
                    }
                }
                NodeKind::Workspace(_)
                | NodeKind::MinimizedWindows
                | NodeKind::FullscreenWindows
                | NodeKind::PopupWindows => return None,
                NodeKind::Window(_) => {
                    broken_invariant(format_args!("window {parent:?} has children"))
                }
            }
        }
        None
    }
}
