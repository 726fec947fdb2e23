//! Structural consistency checks for the layout tree.

use thiserror::Error;

use crate::model::layout_tree::LayoutTree;
use crate::model::node::{NodeKind, WindowId};
use crate::model::tree::NodeId;

#[derive(Debug, Error, PartialEq)]
pub enum InvariantViolation {
    #[error("{0:?} has no node kind")]
    MissingKind(NodeId),
    #[error("{child:?} is listed under {parent:?} but points at {actual:?}")]
    ParentMismatch {
        parent: NodeId,
        child: NodeId,
        actual: Option<NodeId>,
    },
    #[error("{child:?} is listed more than once under {parent:?}")]
    DuplicateChild { parent: NodeId, child: NodeId },
    #[error("{node:?} reports index {reported:?} but sits at {actual}")]
    IndexMismatch {
        node: NodeId,
        reported: Option<usize>,
        actual: usize,
    },
    #[error("window {0:?} has children")]
    WindowWithChildren(NodeId),
    #[error("{0} is not indexed at its node")]
    WindowNotIndexed(WindowId),
    #[error("{window} is indexed at {node:?}, which is not that window")]
    StaleWindowIndex { window: WindowId, node: NodeId },
    #[error("non-root container {0:?} is empty")]
    EmptyContainer(NodeId),
    #[error("most recent child {child:?} of {parent:?} is not one of its children")]
    StaleMostRecentChild { parent: NodeId, child: NodeId },
    #[error("weight of {node:?} is {weight}")]
    NonPositiveWeight { node: NodeId, weight: f64 },
    #[error("{0:?} is a root but not a workspace")]
    StrayRoot(NodeId),
}

impl LayoutTree {
    /// Checks every structural rule of the tree and reports the first one
    /// that does not hold.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for name in self.workspace_names() {
            let Some(ws) = self.workspace(name) else { continue };
            if ws.parent(self.map()).is_some() {
                return Err(InvariantViolation::StrayRoot(ws));
            }
            for node in ws.traverse_preorder(self.map()) {
                self.check_node(node)?;
            }
        }
        self.check_window_index()
    }

    fn check_node(&self, node: NodeId) -> Result<(), InvariantViolation> {
        let map = self.map();
        let Some(kind) = self.try_kind(node) else {
            return Err(InvariantViolation::MissingKind(node));
        };

        let children: Vec<_> = node.children(map).collect();
        for (actual, &child) in children.iter().enumerate() {
            if children[..actual].contains(&child) {
                return Err(InvariantViolation::DuplicateChild { parent: node, child });
            }
            let parent = child.parent(map);
            if parent != Some(node) {
                return Err(InvariantViolation::ParentMismatch {
                    parent: node,
                    child,
                    actual: parent,
                });
            }
            let reported = child.position_in_parent(map);
            if reported != Some(actual) {
                return Err(InvariantViolation::IndexMismatch { node: child, reported, actual });
            }
        }

        match kind {
            NodeKind::Window(leaf) => {
                if !children.is_empty() {
                    return Err(InvariantViolation::WindowWithChildren(node));
                }
                if self.window_node(leaf.id) != Some(node) {
                    return Err(InvariantViolation::WindowNotIndexed(leaf.id));
                }
            }
            NodeKind::TilingContainer(_) => {
                let is_root = node.parent(map).is_some_and(|p| self.kind(p).is_workspace());
                if children.is_empty() && !is_root {
                    return Err(InvariantViolation::EmptyContainer(node));
                }
            }
            NodeKind::Workspace(_)
            | NodeKind::MinimizedWindows
            | NodeKind::FullscreenWindows
            | NodeKind::PopupWindows => {}
        }

        if node.parent(map).is_some() {
            let weight = self.weight(node);
            if weight.is_nan() || weight <= 0.0 {
                return Err(InvariantViolation::NonPositiveWeight { node, weight });
            }
        }

        if let Some(child) = self.most_recent_child(node) {
            if !children.contains(&child) {
                return Err(InvariantViolation::StaleMostRecentChild { parent: node, child });
            }
        }
        Ok(())
    }

    fn check_window_index(&self) -> Result<(), InvariantViolation> {
        for name in self.workspace_names() {
            let Some(ws) = self.workspace(name) else { continue };
            for window in self.all_leaf_windows_recursive(ws) {
                let Some(node) = self.window_node(window) else {
                    return Err(InvariantViolation::WindowNotIndexed(window));
                };
                if self.window_id(node) != Some(window) {
                    return Err(InvariantViolation::StaleWindowIndex { window, node });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_engine::{LayoutKind, Orientation};

    #[test]
    fn empty_tree_is_consistent() {
        let tree = LayoutTree::new();
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn detects_empty_nested_container() {
        let mut tree = LayoutTree::new();
        let ws = tree.get_or_create_workspace("main");
        let root = tree.ensure_root_container(ws, Orientation::Horizontal, LayoutKind::Dwindle);
        assert_eq!(tree.check_invariants(), Ok(()));

        tree.new_window(root, WindowId(1)).unwrap();
        let nested = tree.new_container(root, Orientation::Vertical, LayoutKind::Dwindle);
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantViolation::EmptyContainer(nested))
        );
        tree.new_window(nested, WindowId(2)).unwrap();
        assert_eq!(tree.check_invariants(), Ok(()));
    }
}
