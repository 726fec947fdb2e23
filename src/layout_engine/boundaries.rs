use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout_engine::navigator::descend_mirrored;
use crate::layout_engine::{Direction, LayoutError, LayoutKind};
use crate::model::{LayoutTree, NodeId};

/// What a directional command does when nothing lies in its direction.
#[derive(
    Default,
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
pub enum BoundariesAction {
    #[default]
    Stop,
    Fail,
    WrapAroundTheWorkspace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryResolution {
    /// Leave everything as it is and report success.
    Stop,
    /// Continue the command with this window instead.
    Retarget(NodeId),
}

pub trait BoundaryStrategy {
    fn resolve(
        &self,
        tree: &LayoutTree,
        from: NodeId,
        direction: Direction,
    ) -> Result<BoundaryResolution, LayoutError>;
}

struct StopAtBoundary;
struct FailAtBoundary;
struct WrapAround;

impl BoundaryStrategy for StopAtBoundary {
    fn resolve(
        &self,
        _tree: &LayoutTree,
        _from: NodeId,
        _direction: Direction,
    ) -> Result<BoundaryResolution, LayoutError> {
        Ok(BoundaryResolution::Stop)
    }
}

impl BoundaryStrategy for FailAtBoundary {
    fn resolve(
        &self,
        _tree: &LayoutTree,
        _from: NodeId,
        direction: Direction,
    ) -> Result<BoundaryResolution, LayoutError> {
        Err(LayoutError::BoundaryReached(direction))
    }
}

impl BoundaryStrategy for WrapAround {
    /// Re-enters the workspace's dwindle root from the far edge, keeping the
    /// source window's position on the other axis.
    fn resolve(
        &self,
        tree: &LayoutTree,
        from: NodeId,
        direction: Direction,
    ) -> Result<BoundaryResolution, LayoutError> {
        let Some(root) = tree.node_workspace(from).and_then(|ws| tree.root_container(ws)) else {
            return Ok(BoundaryResolution::Stop);
        };
        let is_dwindle = tree.container(root).is_some_and(|c| c.layout == LayoutKind::Dwindle);
        let is_tiled = from.ancestors(tree.map()).any(|node| node == root);
        if !is_dwindle || !is_tiled {
            return Ok(BoundaryResolution::Stop);
        }
        let path = tree.index_path(root, from);
        match descend_mirrored(tree, root, direction, &path) {
            Some(target) if target != from => {
                debug!(?from, ?target, %direction, "wrapping around the workspace");
                Ok(BoundaryResolution::Retarget(target))
            }
            _ => Ok(BoundaryResolution::Stop),
        }
    }
}

impl BoundariesAction {
    pub fn strategy(self) -> &'static dyn BoundaryStrategy {
        match self {
            BoundariesAction::Stop => &StopAtBoundary,
            BoundariesAction::Fail => &FailAtBoundary,
            BoundariesAction::WrapAroundTheWorkspace => &WrapAround,
        }
    }
}
