//! Arena-backed n-ary tree.
//!
//! The tree only stores structure. Anything attached to a node (its kind,
//! weight, most recent child) lives in secondary maps keyed by [`NodeId`] and
//! is kept up to date through the [`Observer`].

use slotmap::SlotMap;

pub struct Tree<O> {
    pub map: NodeMap,
    pub data: O,
}

impl<O: Observer> Tree<O> {
    pub fn with_observer(data: O) -> Self { Tree { map: NodeMap::default(), data } }

    pub fn mk_node(&mut self) -> UnattachedNode<'_, O> {
        let id = self.map.nodes.insert(Node::default());
        self.data.added_to_forest(&self.map, id);
        UnattachedNode { id, tree: self }
    }

    /// Frees `id` and everything below it, parents before children. `id` must
    /// already be unlinked from its parent.
    fn delete_subtree(&mut self, id: NodeId) {
        let doomed: Vec<_> = id.traverse_preorder(&self.map).collect();
        for node in doomed {
            self.data.removed_from_forest(&self.map, node);
            self.map.nodes.remove(node);
        }
    }
}

/// Holds the structure of every tree in the forest. Each workspace is its own
/// root here, so branches move between workspaces without copying.
#[derive(Default)]
pub struct NodeMap {
    nodes: SlotMap<NodeId, Node>,
}

#[derive(Default, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

slotmap::new_key_type! {
    /// Represents a node somewhere in the forest.
    pub struct NodeId;
}

impl NodeMap {
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn contains(&self, id: NodeId) -> bool { self.nodes.contains_key(id) }

    fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    /// Puts `id` at `index` among the children of `parent`.
    fn link(&mut self, id: NodeId, parent: NodeId, index: usize) {
        let Some(parent_node) = self.nodes.get_mut(parent) else { return };
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Some(parent);
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|&c| c != id);
        }
    }

    /// Parent and index a new sibling of `sibling` gets, `offset` places after it.
    #[track_caller]
    fn slot_next_to(&self, sibling: NodeId, offset: usize) -> (NodeId, usize) {
        let parent = sibling.parent(self);
        let index = sibling.position_in_parent(self);
        match parent.zip(index) {
            Some((parent, index)) => (parent, index + offset),
            None => panic!("{sibling:?} is a root or not in the tree; it cannot have siblings"),
        }
    }
}

impl NodeId {
    pub fn detach<O: Observer>(self, tree: &mut Tree<O>) -> DetachedNode<'_, O> {
        DetachedNode { id: self, tree }
    }

    pub fn parent(self, map: &NodeMap) -> Option<NodeId> {
        map.nodes.get(self).and_then(|n| n.parent)
    }

    pub fn children(self, map: &NodeMap) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        map.children_of(self).iter().copied()
    }

    pub fn first_child(self, map: &NodeMap) -> Option<NodeId> {
        map.children_of(self).first().copied()
    }

    pub fn last_child(self, map: &NodeMap) -> Option<NodeId> {
        map.children_of(self).last().copied()
    }

    pub fn nth_child(self, map: &NodeMap, index: usize) -> Option<NodeId> {
        map.children_of(self).get(index).copied()
    }

    pub fn child_count(self, map: &NodeMap) -> usize { map.children_of(self).len() }

    pub fn is_empty(self, map: &NodeMap) -> bool { map.children_of(self).is_empty() }

    /// Index of this node among its siblings. `None` for roots.
    pub fn position_in_parent(self, map: &NodeMap) -> Option<usize> {
        let parent = self.parent(map)?;
        map.children_of(parent).iter().position(|&c| c == self)
    }

    /// This node, then its parent, and so on up to the root.
    pub fn ancestors(self, map: &NodeMap) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(self), move |&node| node.parent(map))
    }

    /// Parents before children, children left to right.
    pub fn traverse_preorder(self, map: &NodeMap) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children(map).rev());
            Some(node)
        })
    }

    /// Children before parents, children left to right.
    pub fn traverse_postorder(self, map: &NodeMap) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![(self, false)];
        std::iter::from_fn(move || {
            loop {
                let (node, expanded) = stack.pop()?;
                if expanded {
                    return Some(node);
                }
                stack.push((node, true));
                stack.extend(node.children(map).rev().map(|child| (child, false)));
            }
        })
    }

    #[track_caller]
    pub fn remove_root<O: Observer>(self, tree: &mut Tree<O>) {
        assert!(
            self.parent(&tree.map).is_none(),
            "remove_root called on non-root node {self:?}"
        );
        if tree.map.contains(self) {
            tree.delete_subtree(self);
        }
    }
}

pub trait Observer
where Self: Sized {
    fn added_to_forest(&mut self, map: &NodeMap, node: NodeId);
    fn added_to_parent(&mut self, map: &NodeMap, node: NodeId);
    /// Called while `node` is still linked to its parent.
    fn removing_from_parent(&mut self, map: &NodeMap, node: NodeId);
    fn removed_child(tree: &mut Tree<Self>, parent: NodeId);
    fn removed_from_forest(&mut self, map: &NodeMap, node: NodeId);
}

#[must_use = "Unattached nodes should be inserted into the tree or kept as a root"]
pub struct UnattachedNode<'a, O> {
    id: NodeId,
    tree: &'a mut Tree<O>,
}

impl<O: Observer> UnattachedNode<'_, O> {
    pub fn into_root(self) -> NodeId { self.id }

    pub fn push_back(self, parent: NodeId) -> NodeId {
        let index = parent.child_count(&self.tree.map);
        self.attach(parent, index)
    }

    #[track_caller]
    pub fn insert_before(self, sibling: NodeId) -> NodeId {
        let (parent, index) = self.tree.map.slot_next_to(sibling, 0);
        self.attach(parent, index)
    }

    #[track_caller]
    pub fn insert_after(self, sibling: NodeId) -> NodeId {
        let (parent, index) = self.tree.map.slot_next_to(sibling, 1);
        self.attach(parent, index)
    }

    fn attach(self, parent: NodeId, index: usize) -> NodeId {
        self.tree.map.link(self.id, parent, index);
        self.tree.data.added_to_parent(&self.tree.map, self.id);
        self.id
    }
}

#[must_use = "Detached nodes should be reattached to the tree or removed"]
pub struct DetachedNode<'a, O> {
    id: NodeId,
    tree: &'a mut Tree<O>,
}

impl<O: Observer> DetachedNode<'_, O> {
    pub fn push_back(self, parent: NodeId) -> NodeId {
        let mut index = parent.child_count(&self.tree.map);
        if self.id.parent(&self.tree.map) == Some(parent) {
            index -= 1;
        }
        self.reattach(parent, index)
    }

    #[track_caller]
    pub fn insert_before(self, sibling: NodeId) -> NodeId {
        if sibling == self.id {
            return self.id;
        }
        let (parent, mut index) = self.tree.map.slot_next_to(sibling, 0);
        let own = self.id.position_in_parent(&self.tree.map);
        if self.id.parent(&self.tree.map) == Some(parent) && own.is_some_and(|own| own < index) {
            index -= 1;
        }
        self.reattach(parent, index)
    }

    /// Unlinks the node and deletes it together with its whole subtree.
    pub fn remove(self) {
        if let Some(parent) = self.id.parent(&self.tree.map) {
            self.tree.data.removing_from_parent(&self.tree.map, self.id);
            self.tree.map.unlink(self.id);
            O::removed_child(self.tree, parent);
        }
        if self.tree.map.contains(self.id) {
            self.tree.delete_subtree(self.id);
        }
    }

    /// Moves the node to `index` under `new_parent`, where `index` counts the
    /// children of `new_parent` without this node. Observers only hear about
    /// it when the parent actually changes.
    fn reattach(self, new_parent: NodeId, index: usize) -> NodeId {
        if self.id == new_parent {
            return self.id;
        }
        let old_parent = self.id.parent(&self.tree.map);
        let reparented = old_parent != Some(new_parent);
        if reparented && old_parent.is_some() {
            self.tree.data.removing_from_parent(&self.tree.map, self.id);
        }
        self.tree.map.unlink(self.id);
        self.tree.map.link(self.id, new_parent, index);
        if reparented {
            self.tree.data.added_to_parent(&self.tree.map, self.id);
        }
        if reparented && let Some(old) = old_parent {
            O::removed_child(self.tree, old);
        }
        self.id
    }
}
