use serde::{Deserialize, Serialize};

use crate::model::tree::{NodeId, NodeMap};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TreeEvent {
    AddedToForest(NodeId),
    AddedToParent(NodeId),
    RemovingFromParent(NodeId),
    RemovedFromForest(NodeId),
}

/// Most-recently-used bookkeeping.
///
/// For every node with children this keeps the children ordered from most to
/// least recently part of the focused path. The head of that order is the
/// node's most recent child. A child that gets attached joins at the tail, so
/// attaching never steals focus; removing a child hands recency to whichever
/// sibling was used before it.
#[derive(Default, Serialize, Deserialize)]
pub struct Selection {
    nodes: slotmap::SecondaryMap<NodeId, Vec<NodeId>>,
}

impl Selection {
    pub fn most_recent_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|order| order.first().copied())
    }

    /// How many siblings were used more recently than `child`.
    pub fn rank(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes.get(parent)?.iter().position(|&c| c == child)
    }

    /// Moves `child` to position `rank` in its parent's recency order. Used when
    /// a node takes over the slot of another one and should inherit its recency.
    pub fn set_rank(&mut self, parent: NodeId, child: NodeId, rank: usize) {
        let Some(order) = self.nodes.get_mut(parent) else {
            return;
        };
        order.retain(|&c| c != child);
        order.insert(rank.min(order.len()), child);
    }

    /// Makes `node` the most recent child of its parent. Returns whether that
    /// changed anything.
    pub fn select_locally(&mut self, map: &NodeMap, node: NodeId) -> bool {
        let Some(parent) = node.parent(map) else {
            return false;
        };
        let Some(entry) = self.nodes.entry(parent) else {
            return false;
        };
        let order = entry.or_default();
        if order.first() == Some(&node) {
            return false;
        }
        order.retain(|&c| c != node);
        order.insert(0, node);
        true
    }

    /// Makes `selection` the most recent child at every level up to its root.
    pub fn select(&mut self, map: &NodeMap, selection: NodeId) {
        for node in selection.ancestors(map) {
            self.select_locally(map, node);
        }
    }

    pub fn handle_event(&mut self, map: &NodeMap, event: TreeEvent) {
        use TreeEvent::*;
        match event {
            AddedToForest(_node) => {}
            AddedToParent(node) => {
                let Some(parent) = node.parent(map) else {
                    return;
                };
                if let Some(entry) = self.nodes.entry(parent) {
                    let order = entry.or_default();
                    if !order.contains(&node) {
                        order.push(node);
                    }
                }
            }
            RemovingFromParent(node) => {
                let Some(parent) = node.parent(map) else {
                    return;
                };
                if let Some(order) = self.nodes.get_mut(parent) {
                    order.retain(|&c| c != node);
                    if order.is_empty() {
                        self.nodes.remove(parent);
                    }
                }
            }
            RemovedFromForest(node) => {
                self.nodes.remove(node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tree::{Observer, Tree};

    #[derive(Default)]
    struct Components {
        selection: Selection,
    }

    impl Observer for Components {
        fn added_to_forest(&mut self, map: &NodeMap, node: NodeId) {
            self.selection.handle_event(map, TreeEvent::AddedToForest(node))
        }
        fn added_to_parent(&mut self, map: &NodeMap, node: NodeId) {
            self.selection.handle_event(map, TreeEvent::AddedToParent(node))
        }
        fn removing_from_parent(&mut self, map: &NodeMap, node: NodeId) {
            self.selection.handle_event(map, TreeEvent::RemovingFromParent(node))
        }
        fn removed_child(_tree: &mut Tree<Self>, _parent: NodeId) {}
        fn removed_from_forest(&mut self, map: &NodeMap, node: NodeId) {
            self.selection.handle_event(map, TreeEvent::RemovedFromForest(node))
        }
    }

    fn tree() -> (Tree<Components>, NodeId, [NodeId; 3]) {
        let mut tree = Tree::with_observer(Components::default());
        let root = tree.mk_node().into_root();
        let a = tree.mk_node().push_back(root);
        let b = tree.mk_node().push_back(root);
        let c = tree.mk_node().push_back(root);
        (tree, root, [a, b, c])
    }

    #[test]
    fn first_attached_child_is_most_recent_until_selected() {
        let (mut tree, root, [a, b, c]) = tree();
        assert_eq!(tree.data.selection.most_recent_child(root), Some(a));
        assert!(tree.data.selection.select_locally(&tree.map, c));
        assert_eq!(tree.data.selection.most_recent_child(root), Some(c));
        assert!(!tree.data.selection.select_locally(&tree.map, c));
        assert_eq!(tree.data.selection.rank(root, b), Some(2));
    }

    #[test]
    fn select_marks_every_ancestor() {
        let (mut tree, root, [_, b, _]) = tree();
        let leaf = tree.mk_node().push_back(b);
        tree.data.selection.select(&tree.map, leaf);
        assert_eq!(tree.data.selection.most_recent_child(root), Some(b));
        assert_eq!(tree.data.selection.most_recent_child(b), Some(leaf));
    }

    #[test]
    fn removal_falls_back_to_previously_used_sibling() {
        let (mut tree, root, [a, b, c]) = tree();
        tree.data.selection.select(&tree.map, c);
        tree.data.selection.select(&tree.map, b);
        b.detach(&mut tree).remove();
        assert_eq!(tree.data.selection.most_recent_child(root), Some(c));
        c.detach(&mut tree).remove();
        assert_eq!(tree.data.selection.most_recent_child(root), Some(a));
        a.detach(&mut tree).remove();
        assert_eq!(tree.data.selection.most_recent_child(root), None);
    }

    #[test]
    fn set_rank_moves_child_within_order() {
        let (mut tree, root, [a, b, c]) = tree();
        tree.data.selection.set_rank(root, c, 0);
        assert_eq!(tree.data.selection.most_recent_child(root), Some(c));
        tree.data.selection.set_rank(root, c, 10);
        assert_eq!(tree.data.selection.rank(root, c), Some(2));
        assert_eq!(tree.data.selection.rank(root, a), Some(0));
        assert_eq!(tree.data.selection.rank(root, b), Some(1));
    }
}
