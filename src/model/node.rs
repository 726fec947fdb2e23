use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::geometry::Rect;
use crate::layout_engine::{LayoutKind, Orientation};

/// Identity of a window as handed to us by the window binding layer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "window {}", self.0) }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowLeaf {
    pub id: WindowId,
    /// Where the window was last laid out. The only geometry the insertion
    /// policy looks at.
    pub last_applied_layout_virtual_rect: Option<Rect>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilingContainer {
    pub orientation: Orientation,
    pub layout: LayoutKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceNode {
    pub name: String,
}

/// Everything a node in the layout tree can be.
///
/// The three special containers hold windows that are not tiled. Navigation
/// never descends into them and never walks out of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Window(WindowLeaf),
    TilingContainer(TilingContainer),
    Workspace(WorkspaceNode),
    MinimizedWindows,
    FullscreenWindows,
    PopupWindows,
}

impl NodeKind {
    pub fn as_window(&self) -> Option<&WindowLeaf> {
        match self {
            NodeKind::Window(window) => Some(window),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&TilingContainer> {
        match self {
            NodeKind::TilingContainer(container) => Some(container),
            _ => None,
        }
    }

    pub fn is_window(&self) -> bool { matches!(self, NodeKind::Window(_)) }

    pub fn is_workspace(&self) -> bool { matches!(self, NodeKind::Workspace(_)) }

    pub fn special(&self) -> Option<SpecialContainer> {
        match self {
            NodeKind::MinimizedWindows => Some(SpecialContainer::Minimized),
            NodeKind::FullscreenWindows => Some(SpecialContainer::Fullscreen),
            NodeKind::PopupWindows => Some(SpecialContainer::Popup),
            NodeKind::Window(_) | NodeKind::TilingContainer(_) | NodeKind::Workspace(_) => None,
        }
    }
}

/// Names one of a workspace's special containers.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpecialContainer {
    Minimized,
    Fullscreen,
    Popup,
}

impl SpecialContainer {
    pub fn node_kind(self) -> NodeKind {
        match self {
            SpecialContainer::Minimized => NodeKind::MinimizedWindows,
            SpecialContainer::Fullscreen => NodeKind::FullscreenWindows,
            SpecialContainer::Popup => NodeKind::PopupWindows,
        }
    }
}
