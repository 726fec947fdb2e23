//! The layout tree: node kinds, weights and the window index on top of the
//! arena [`Tree`], plus every structural mutation the layout engine performs.
//!
//! Each workspace is a separate root in one arena. A workspace owns at most one
//! root tiling container and, lazily, one of each special container.

use std::fmt;

use slotmap::SecondaryMap;
use tracing::trace;

use crate::common::collections::{HashMap, hash_map};
use crate::common::geometry::Rect;
use crate::layout_engine::{LayoutError, LayoutKind, Orientation};
use crate::model::node::{
    NodeKind, SpecialContainer, TilingContainer, WindowId, WindowLeaf, WorkspaceNode,
};
use crate::model::selection::{Selection, TreeEvent};
use crate::model::tree::{NodeId, NodeMap, Observer, Tree};

/// Weight given to nodes that do not inherit one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

pub struct LayoutTree {
    tree: Tree<Components>,
    kind: SecondaryMap<NodeId, NodeKind>,
    weight: SecondaryMap<NodeId, f64>,
    window_to_node: HashMap<WindowId, NodeId>,
    workspaces: HashMap<String, NodeId>,
}

#[derive(Default)]
struct Components {
    selection: Selection,
}

impl Observer for Components {
    fn added_to_forest(&mut self, map: &NodeMap, node: NodeId) {
        self.dispatch_event(map, TreeEvent::AddedToForest(node))
    }
    fn added_to_parent(&mut self, map: &NodeMap, node: NodeId) {
        self.dispatch_event(map, TreeEvent::AddedToParent(node))
    }
    fn removing_from_parent(&mut self, map: &NodeMap, node: NodeId) {
        self.dispatch_event(map, TreeEvent::RemovingFromParent(node))
    }
    fn removed_child(_tree: &mut Tree<Self>, _parent: NodeId) {}
    fn removed_from_forest(&mut self, map: &NodeMap, node: NodeId) {
        self.dispatch_event(map, TreeEvent::RemovedFromForest(node))
    }
}

impl Components {
    fn dispatch_event(&mut self, map: &NodeMap, event: TreeEvent) {
        self.selection.handle_event(map, event);
    }
}

/// Aborts on a structural inconsistency. These are never recoverable.
#[track_caller]
pub(crate) fn broken_invariant(what: impl fmt::Display) -> ! {
    panic!("layout tree invariant violated: {what}")
}

impl Default for LayoutTree {
    fn default() -> Self { Self::new() }
}

impl LayoutTree {
    pub fn new() -> Self {
        LayoutTree {
            tree: Tree::with_observer(Components::default()),
            kind: SecondaryMap::new(),
            weight: SecondaryMap::new(),
            window_to_node: HashMap::default(),
            workspaces: HashMap::default(),
        }
    }

    pub fn map(&self) -> &NodeMap { &self.tree.map }

    pub(crate) fn selection(&self) -> &Selection { &self.tree.data.selection }

    pub fn try_kind(&self, node: NodeId) -> Option<&NodeKind> { self.kind.get(node) }

    #[track_caller]
    pub fn kind(&self, node: NodeId) -> &NodeKind {
        match self.kind.get(node) {
            Some(kind) => kind,
            None => broken_invariant(format_args!("{node:?} has no kind")),
        }
    }

    pub fn container(&self, node: NodeId) -> Option<&TilingContainer> {
        self.kind.get(node).and_then(NodeKind::as_container)
    }

    pub fn weight(&self, node: NodeId) -> f64 {
        self.weight.get(node).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.children(&self.tree.map)
    }

    pub fn most_recent_child(&self, node: NodeId) -> Option<NodeId> {
        self.selection().most_recent_child(node)
    }

    pub fn window_node(&self, wid: WindowId) -> Option<NodeId> {
        self.window_to_node.get(&wid).copied()
    }

    pub fn window_id(&self, node: NodeId) -> Option<WindowId> {
        self.kind.get(node).and_then(NodeKind::as_window).map(|w| w.id)
    }

    pub fn window_rect(&self, node: NodeId) -> Option<Rect> {
        self.kind
            .get(node)
            .and_then(NodeKind::as_window)
            .and_then(|w| w.last_applied_layout_virtual_rect)
    }

    fn expect_window(&self, wid: WindowId) -> Result<NodeId, LayoutError> {
        self.window_node(wid).ok_or(LayoutError::WindowNotFound(wid))
    }

    pub fn window_count(&self) -> usize { self.window_to_node.len() }

    // Workspaces

    pub fn workspace(&self, name: &str) -> Option<NodeId> { self.workspaces.get(name).copied() }

    pub fn workspace_names(&self) -> impl Iterator<Item = &str> {
        self.workspaces.keys().map(String::as_str)
    }

    pub fn get_or_create_workspace(&mut self, name: &str) -> NodeId {
        match self.workspaces.entry(name.to_owned()) {
            hash_map::Entry::Occupied(entry) => *entry.get(),
            hash_map::Entry::Vacant(entry) => {
                let ws = self.tree.mk_node().into_root();
                self.kind.insert(ws, NodeKind::Workspace(WorkspaceNode { name: name.to_owned() }));
                trace!(?ws, name, "created workspace");
                *entry.insert(ws)
            }
        }
    }

    /// Removes a workspace together with every window it holds.
    pub fn remove_workspace(&mut self, name: &str) -> Vec<WindowId> {
        let Some(ws) = self.workspaces.remove(name) else {
            return Vec::new();
        };
        let windows = self.all_leaf_windows_recursive(ws);
        self.forget_subtree(ws);
        ws.remove_root(&mut self.tree);
        windows
    }

    pub fn root_container(&self, ws: NodeId) -> Option<NodeId> {
        self.children(ws).find(|&c| self.container(c).is_some())
    }

    /// The root tiling container of `ws`, created with the given shape if the
    /// workspace does not have one yet.
    pub fn ensure_root_container(
        &mut self,
        ws: NodeId,
        orientation: Orientation,
        layout: LayoutKind,
    ) -> NodeId {
        if let Some(root) = self.root_container(ws) {
            return root;
        }
        let first = ws.first_child(&self.tree.map);
        let node = self.tree.mk_node();
        let root = match first {
            Some(first) => node.insert_before(first),
            None => node.push_back(ws),
        };
        self.kind
            .insert(root, NodeKind::TilingContainer(TilingContainer { orientation, layout }));
        self.weight.insert(root, DEFAULT_WEIGHT);
        trace!(?ws, ?root, ?orientation, ?layout, "created root container");
        root
    }

    pub fn special_container(&self, ws: NodeId, special: SpecialContainer) -> Option<NodeId> {
        self.children(ws).find(|&c| self.kind(c).special() == Some(special))
    }

    fn ensure_special_container(&mut self, ws: NodeId, special: SpecialContainer) -> NodeId {
        if let Some(node) = self.special_container(ws, special) {
            return node;
        }
        let node = self.tree.mk_node().push_back(ws);
        self.kind.insert(node, special.node_kind());
        self.weight.insert(node, DEFAULT_WEIGHT);
        node
    }

    // Node creation

    pub fn new_container(
        &mut self,
        parent: NodeId,
        orientation: Orientation,
        layout: LayoutKind,
    ) -> NodeId {
        let node = self.tree.mk_node().push_back(parent);
        self.kind
            .insert(node, NodeKind::TilingContainer(TilingContainer { orientation, layout }));
        self.weight.insert(node, DEFAULT_WEIGHT);
        node
    }

    /// Binds `wid` as the last child of `parent`.
    pub fn new_window(&mut self, parent: NodeId, wid: WindowId) -> Result<NodeId, LayoutError> {
        self.ensure_unbound(wid)?;
        let node = self.tree.mk_node().push_back(parent);
        self.register_window(node, wid);
        Ok(node)
    }

    /// Binds `wid` right after `sibling`, in the same parent.
    pub fn new_window_after(
        &mut self,
        sibling: NodeId,
        wid: WindowId,
    ) -> Result<NodeId, LayoutError> {
        self.ensure_unbound(wid)?;
        let node = self.tree.mk_node().insert_after(sibling);
        self.register_window(node, wid);
        Ok(node)
    }

    fn ensure_unbound(&self, wid: WindowId) -> Result<(), LayoutError> {
        if self.window_to_node.contains_key(&wid) {
            return Err(LayoutError::WindowAlreadyBound(wid));
        }
        Ok(())
    }

    fn register_window(&mut self, node: NodeId, wid: WindowId) {
        self.kind.insert(
            node,
            NodeKind::Window(WindowLeaf {
                id: wid,
                last_applied_layout_virtual_rect: None,
            }),
        );
        self.weight.insert(node, DEFAULT_WEIGHT);
        self.window_to_node.insert(wid, node);
    }

    /// Records the rect `wid` was just laid out in. Returns whether it changed.
    pub fn set_window_rect(&mut self, wid: WindowId, rect: Rect) -> Result<bool, LayoutError> {
        let node = self.expect_window(wid)?;
        let Some(NodeKind::Window(leaf)) = self.kind.get_mut(node) else {
            broken_invariant(format_args!("{wid} maps to non-window node {node:?}"));
        };
        if leaf.last_applied_layout_virtual_rect.is_some_and(|old| old.same_as(rect)) {
            return Ok(false);
        }
        leaf.last_applied_layout_virtual_rect = Some(rect);
        Ok(true)
    }

    // Structural mutations

    /// Makes `node` the most recent child at every level up to its workspace.
    pub fn mark_as_most_recent(&mut self, node: NodeId) {
        self.tree.data.selection.select(&self.tree.map, node);
    }

    /// Replaces `leaf` by a new container holding it, so that the container
    /// takes over the leaf's index, weight and recency in the old parent.
    pub fn wrap_in_container(
        &mut self,
        leaf: NodeId,
        orientation: Orientation,
        layout: LayoutKind,
    ) -> NodeId {
        let Some(parent) = leaf.parent(&self.tree.map) else {
            broken_invariant(format_args!("cannot wrap parentless {leaf:?}"));
        };
        let rank = self.selection().rank(parent, leaf);
        let weight = self.weight(leaf);

        let container = self.tree.mk_node().insert_before(leaf);
        self.kind.insert(
            container,
            NodeKind::TilingContainer(TilingContainer { orientation, layout }),
        );
        self.weight.insert(container, weight);
        leaf.detach(&mut self.tree).push_back(container);
        self.weight.insert(leaf, DEFAULT_WEIGHT);

        if let Some(rank) = rank {
            self.tree.data.selection.set_rank(parent, container, rank);
        }
        container
    }

    /// Splices the only child of `container` into the container's slot and
    /// discards the container. Returns the child.
    pub fn flatten_into_parent(&mut self, container: NodeId) -> NodeId {
        let map = &self.tree.map;
        let Some(parent) = container.parent(map) else {
            broken_invariant(format_args!("cannot flatten parentless {container:?}"));
        };
        let (Some(child), None) = (container.first_child(map), container.nth_child(map, 1)) else {
            broken_invariant(format_args!("{container:?} does not have exactly one child"));
        };
        let rank = self.selection().rank(parent, container);
        let weight = self.weight(container);

        child.detach(&mut self.tree).insert_before(container);
        self.kind.remove(container);
        self.weight.remove(container);
        container.detach(&mut self.tree).remove();

        self.weight.insert(child, weight);
        if let Some(rank) = rank {
            self.tree.data.selection.set_rank(parent, child, rank);
        }
        child
    }

    /// Exchanges the slots of two leaves: each one takes the other's parent,
    /// index, weight and recency. Nothing else in the tree moves.
    pub fn swap_leaves(&mut self, a: NodeId, b: NodeId) {
        let map = &self.tree.map;
        let (Some(parent_a), Some(parent_b)) = (a.parent(map), b.parent(map)) else {
            broken_invariant(format_args!("cannot swap parentless {a:?} / {b:?}"));
        };
        let rank_a = self.selection().rank(parent_a, a);
        let rank_b = self.selection().rank(parent_b, b);
        let (weight_a, weight_b) = (self.weight(a), self.weight(b));

        let placeholder = self.tree.mk_node().insert_before(a);
        a.detach(&mut self.tree).insert_before(b);
        b.detach(&mut self.tree).insert_before(placeholder);
        placeholder.detach(&mut self.tree).remove();

        self.weight.insert(a, weight_b);
        self.weight.insert(b, weight_a);
        if let Some(rank) = rank_b {
            self.tree.data.selection.set_rank(parent_b, a, rank);
        }
        if let Some(rank) = rank_a {
            self.tree.data.selection.set_rank(parent_a, b, rank);
        }
    }

    /// Unbinds `wid`. Containers left without children are removed on the way
    /// up, except the workspace's root container. Returns the workspace the
    /// window was in.
    pub fn remove_window(&mut self, wid: WindowId) -> Result<Option<NodeId>, LayoutError> {
        let node = self.expect_window(wid)?;
        let workspace = self.node_workspace(node);
        let parent = node.parent(&self.tree.map);
        self.forget_subtree(node);
        node.detach(&mut self.tree).remove();
        if let Some(parent) = parent {
            self.prune_empty_containers(parent);
        }
        Ok(workspace)
    }

    /// Moves `wid` out of tiling into one of its workspace's special containers.
    pub fn park_window(
        &mut self,
        wid: WindowId,
        special: SpecialContainer,
    ) -> Result<Option<NodeId>, LayoutError> {
        let node = self.expect_window(wid)?;
        let Some(ws) = self.node_workspace(node) else {
            return Ok(None);
        };
        let target = self.ensure_special_container(ws, special);
        let Some(old_parent) = node.parent(&self.tree.map) else {
            return Ok(Some(ws));
        };
        if old_parent == target {
            return Ok(Some(ws));
        }
        node.detach(&mut self.tree).push_back(target);
        self.weight.insert(node, DEFAULT_WEIGHT);
        self.prune_empty_containers(old_parent);
        Ok(Some(ws))
    }

    fn prune_empty_containers(&mut self, mut node: NodeId) {
        loop {
            let map = &self.tree.map;
            let Some(parent) = node.parent(map) else {
                return;
            };
            if !node.is_empty(map) {
                return;
            }
            // A root container stays even when empty; a special container
            // goes with its last window so the workspace focus falls back
            // to tiling.
            let prunable = match self.container(node) {
                Some(_) => !self.kind(parent).is_workspace(),
                None => self.kind(node).special().is_some(),
            };
            if !prunable {
                return;
            }
            trace!(?node, "removing empty container");
            self.kind.remove(node);
            self.weight.remove(node);
            node.detach(&mut self.tree).remove();
            node = parent;
        }
    }

    /// Drops the kind, weight and window index entries of everything under
    /// `node`. The arena nodes themselves are removed by the caller.
    pub(crate) fn forget_subtree(&mut self, node: NodeId) {
        let ids: Vec<_> = node.traverse_preorder(&self.tree.map).collect();
        for id in ids {
            if let Some(NodeKind::Window(leaf)) = self.kind.remove(id) {
                self.window_to_node.remove(&leaf.id);
            }
            self.weight.remove(id);
        }
    }

    /// Deletes `node` and its subtree, without any pruning.
    pub(crate) fn remove_subtree(&mut self, node: NodeId) {
        self.forget_subtree(node);
        node.detach(&mut self.tree).remove();
    }
}
