//! A serializable snapshot of a tree's shape: containers with their
//! orientation and layout kind, windows by id, in child order. Weights, rects
//! and recency are not part of it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout_engine::{LayoutError, LayoutKind, Orientation};
use crate::model::layout_tree::LayoutTree;
use crate::model::node::NodeKind;
use crate::model::{NodeId, WindowId};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDescription {
    Window(WindowId),
    Container {
        orientation: Orientation,
        layout: LayoutKind,
        children: Vec<LayoutDescription>,
    },
}

pub fn window(id: u32) -> LayoutDescription { LayoutDescription::Window(WindowId(id)) }

fn container(
    orientation: Orientation,
    layout: LayoutKind,
    children: Vec<LayoutDescription>,
) -> LayoutDescription {
    LayoutDescription::Container { orientation, layout, children }
}

pub fn h_dwindle(children: Vec<LayoutDescription>) -> LayoutDescription {
    container(Orientation::Horizontal, LayoutKind::Dwindle, children)
}

pub fn v_dwindle(children: Vec<LayoutDescription>) -> LayoutDescription {
    container(Orientation::Vertical, LayoutKind::Dwindle, children)
}

pub fn h_tiles(children: Vec<LayoutDescription>) -> LayoutDescription {
    container(Orientation::Horizontal, LayoutKind::Tiles, children)
}

pub fn v_tiles(children: Vec<LayoutDescription>) -> LayoutDescription {
    container(Orientation::Vertical, LayoutKind::Tiles, children)
}

pub fn h_accordion(children: Vec<LayoutDescription>) -> LayoutDescription {
    container(Orientation::Horizontal, LayoutKind::Accordion, children)
}

pub fn v_accordion(children: Vec<LayoutDescription>) -> LayoutDescription {
    container(Orientation::Vertical, LayoutKind::Accordion, children)
}

impl LayoutDescription {
    /// Window ids in depth-first order.
    pub fn windows(&self) -> Vec<WindowId> {
        let mut out = Vec::new();
        self.collect_windows(&mut out);
        out
    }

    fn collect_windows(&self, out: &mut Vec<WindowId>) {
        match self {
            LayoutDescription::Window(id) => out.push(*id),
            LayoutDescription::Container { children, .. } => {
                for child in children {
                    child.collect_windows(out);
                }
            }
        }
    }

    /// Only the outermost container may be empty: every nested one needs at
    /// least one child.
    pub fn validate(&self) -> Result<(), LayoutError> {
        match self {
            LayoutDescription::Window(_) => Ok(()),
            LayoutDescription::Container { children, .. } => {
                children.iter().try_for_each(|child| child.validate_nested())
            }
        }
    }

    fn validate_nested(&self) -> Result<(), LayoutError> {
        match self {
            LayoutDescription::Container { children, .. } if children.is_empty() => {
                Err(LayoutError::EmptyContainer)
            }
            _ => self.validate(),
        }
    }

    fn name(&self) -> String {
        match self {
            LayoutDescription::Window(_) => "window".to_owned(),
            LayoutDescription::Container { orientation, layout, .. } => {
                let prefix = match orientation {
                    Orientation::Horizontal => "h",
                    Orientation::Vertical => "v",
                };
                format!("{prefix}_{layout}")
            }
        }
    }
}

/// Prints in constructor form, `h_dwindle([window(1), window(2)])`, so that
/// test failures read like the expected value.
impl fmt::Debug for LayoutDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutDescription::Window(id) => f.debug_tuple("window").field(&id.0).finish(),
            LayoutDescription::Container { children, .. } => {
                f.debug_tuple(&self.name()).field(children).finish()
            }
        }
    }
}

impl LayoutTree {
    /// Describes the tiling subtree rooted at `node`. Workspaces and special
    /// containers have no orientation or layout and give `None`.
    pub fn describe(&self, node: NodeId) -> Option<LayoutDescription> {
        match self.kind(node) {
            NodeKind::Window(leaf) => Some(LayoutDescription::Window(leaf.id)),
            NodeKind::TilingContainer(c) => Some(LayoutDescription::Container {
                orientation: c.orientation,
                layout: c.layout,
                children: self
                    .children(node)
                    .map(|child| self.describe(child))
                    .collect::<Option<_>>()?,
            }),
            NodeKind::Workspace(_)
            | NodeKind::MinimizedWindows
            | NodeKind::FullscreenWindows
            | NodeKind::PopupWindows => None,
        }
    }

    /// Builds `description` as the last child of `parent`. Every window in it
    /// must be unbound. A container placed directly under a workspace may be
    /// empty; any other empty container is rejected before anything is built.
    pub fn build_from_description(
        &mut self,
        parent: NodeId,
        description: &LayoutDescription,
    ) -> Result<NodeId, LayoutError> {
        if self.kind(parent).is_workspace() {
            description.validate()?;
        } else {
            description.validate_nested()?;
        }
        self.build_node(parent, description)
    }

    fn build_node(
        &mut self,
        parent: NodeId,
        description: &LayoutDescription,
    ) -> Result<NodeId, LayoutError> {
        match description {
            LayoutDescription::Window(id) => self.new_window(parent, *id),
            LayoutDescription::Container { orientation, layout, children } => {
                let node = self.new_container(parent, *orientation, *layout);
                for child in children {
                    self.build_node(node, child)?;
                }
                Ok(node)
            }
        }
    }

    /// Renders the subtree under `node`, marking each parent's most recent
    /// child with ☒.
    pub fn draw_tree(&self, node: NodeId) -> String {
        let tree = self.ascii_tree(node);
        let mut out = String::new();
        let _ = ascii_tree::write_tree(&mut out, &tree);
        out
    }

    fn ascii_tree(&self, node: NodeId) -> ascii_tree::Tree {
        let status = match node.parent(self.map()) {
            None => "",
            Some(parent) if self.most_recent_child(parent) == Some(node) => "☒ ",
            _ => "☐ ",
        };
        let desc = match self.kind(node) {
            NodeKind::Window(leaf) => format!("{status}{}", leaf.id),
            NodeKind::TilingContainer(c) => {
                let prefix = match c.orientation {
                    Orientation::Horizontal => "h",
                    Orientation::Vertical => "v",
                };
                format!("{status}{prefix}_{} weight={}", c.layout, self.weight(node))
            }
            NodeKind::Workspace(ws) => format!("workspace {}", ws.name),
            special => format!("{status}{special:?}"),
        };
        let children: Vec<_> = self.children(node).map(|c| self.ascii_tree(c)).collect();
        if children.is_empty() {
            ascii_tree::Tree::Leaf(vec![desc])
        } else {
            ascii_tree::Tree::Node(desc, children)
        }
    }
}
