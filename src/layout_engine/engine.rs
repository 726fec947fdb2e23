use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{
    BoundariesAction, CommandOutcome, Direction, LayoutDescription, LayoutError, commands,
    insertion, normalize,
};
use crate::common::collections::HashSet;
use crate::common::config::LayoutSettings;
use crate::common::geometry::Rect;
use crate::model::layout_tree::broken_invariant;
use crate::model::{LayoutTree, NodeId, SpecialContainer, WindowId};

/// Notifications from the window binding layer.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    /// A new window should be tiled in `workspace`. `rect` is where it ends
    /// up, if already known.
    WindowBound {
        workspace: String,
        window: WindowId,
        rect: Option<Rect>,
    },
    WindowUnbound(WindowId),
    WindowFocused(WindowId),
    GeometryApplied { window: WindowId, rect: Rect },
    /// The window left tiling, e.g. it was minimized or went fullscreen.
    WindowParked {
        window: WindowId,
        container: SpecialContainer,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    MoveFocus {
        direction: Direction,
        #[serde(default)]
        boundaries_action: Option<BoundariesAction>,
    },
    MoveNode {
        direction: Direction,
        #[serde(default)]
        boundaries_action: Option<BoundariesAction>,
    },
    NormalizeContainers,
}

impl LayoutCommand {
    pub fn from_json(json: &str) -> Result<LayoutCommand, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventResponse {
    /// The window that should have focus afterwards, if the event changed it.
    pub focus_window: Option<WindowId>,
    pub layout_changed: bool,
}

/// Owns the layout trees of all workspaces and applies events and commands
/// to them.
pub struct LayoutEngine {
    tree: LayoutTree,
    layout_settings: LayoutSettings,
}

static_assertions::assert_impl_all!(LayoutEngine: Send);

impl Default for LayoutEngine {
    fn default() -> Self { Self::new(&LayoutSettings::default()) }
}

impl LayoutEngine {
    pub fn new(layout_settings: &LayoutSettings) -> LayoutEngine {
        LayoutEngine {
            tree: LayoutTree::new(),
            layout_settings: layout_settings.clone(),
        }
    }

    pub fn set_layout_settings(&mut self, settings: &LayoutSettings) {
        self.layout_settings = settings.clone();
    }

    pub fn layout_settings(&self) -> &LayoutSettings { &self.layout_settings }

    pub fn tree(&self) -> &LayoutTree { &self.tree }

    fn workspace(&self, name: &str) -> Result<NodeId, LayoutError> {
        self.tree.workspace(name).ok_or_else(|| LayoutError::WorkspaceNotFound(name.to_owned()))
    }

    /// The most recent window of a workspace, tiled or not.
    pub fn focused_window(&self, workspace: &str) -> Option<WindowId> {
        self.focused_window_in(self.tree.workspace(workspace)?)
    }

    fn focused_window_in(&self, ws: NodeId) -> Option<WindowId> {
        self.tree
            .most_recent_window_recursive(ws)
            .and_then(|node| self.tree.window_id(node))
    }

    /// The shape of a workspace's tiling tree.
    pub fn describe_workspace(&self, workspace: &str) -> Option<LayoutDescription> {
        let ws = self.tree.workspace(workspace)?;
        self.tree.root_container(ws).and_then(|root| self.tree.describe(root))
    }

    pub fn draw_tree(&self, workspace: &str) -> Option<String> {
        self.tree.workspace(workspace).map(|ws| self.tree.draw_tree(ws))
    }

    pub fn debug_tree(&self, workspace: &str) {
        match self.draw_tree(workspace) {
            Some(tree) => debug!("Tree {workspace}\n{}", tree.trim()),
            None => debug!("No workspace {workspace}"),
        }
    }

    /// Replaces the tiling tree of `workspace` with `description`, creating
    /// the workspace if needed. Windows in the description must be unbound or
    /// belong to the tree being replaced, and only the outermost container may
    /// be empty. A bare window is placed in a new root container with the
    /// configured defaults. On error nothing is changed.
    pub fn load_description(
        &mut self,
        workspace: &str,
        description: &LayoutDescription,
    ) -> Result<(), LayoutError> {
        description.validate()?;
        let old_root = self.tree.workspace(workspace).and_then(|ws| self.tree.root_container(ws));
        let mut seen = HashSet::default();
        for wid in description.windows() {
            if !seen.insert(wid) {
                return Err(LayoutError::WindowAlreadyBound(wid));
            }
            let Some(node) = self.tree.window_node(wid) else { continue };
            let replaced = old_root
                .is_some_and(|root| node.ancestors(self.tree.map()).any(|n| n == root));
            if !replaced {
                return Err(LayoutError::WindowAlreadyBound(wid));
            }
        }

        let ws = self.tree.get_or_create_workspace(workspace);
        if let Some(old_root) = old_root {
            self.tree.remove_subtree(old_root);
        }
        match description {
            LayoutDescription::Container { .. } => {
                self.tree.build_from_description(ws, description)?;
            }
            LayoutDescription::Window(_) => {
                let root = self.tree.ensure_root_container(
                    ws,
                    self.layout_settings.default_root_container_orientation,
                    self.layout_settings.default_root_container_layout,
                );
                self.tree.build_from_description(root, description)?;
            }
        }
        self.debug_tree(workspace);
        self.check_invariants();
        Ok(())
    }

    /// Drops a workspace and every window in it. Returns the dropped windows.
    pub fn remove_workspace(&mut self, workspace: &str) -> Vec<WindowId> {
        let removed = self.tree.remove_workspace(workspace);
        self.check_invariants();
        removed
    }

    /// Collapses single-child containers in `workspace` if normalization is
    /// enabled. Returns how many were removed.
    pub fn normalize_workspace(&mut self, workspace: &str) -> Result<usize, LayoutError> {
        let ws = self.workspace(workspace)?;
        Ok(self.normalize(ws))
    }

    fn normalize(&mut self, ws: NodeId) -> usize {
        if !self.layout_settings.enable_normalization_flatten_containers {
            return 0;
        }
        normalize::normalize_workspace(&mut self.tree, ws)
    }

    pub fn handle_event(&mut self, event: LayoutEvent) -> Result<EventResponse, LayoutError> {
        debug!(?event);
        let response = match event {
            LayoutEvent::WindowBound { workspace, window, rect } => {
                if self.tree.window_node(window).is_some() {
                    return Err(LayoutError::WindowAlreadyBound(window));
                }
                let ws = self.tree.get_or_create_workspace(&workspace);
                insertion::insert_window(&mut self.tree, ws, window, &self.layout_settings)?;
                if let Some(rect) = rect {
                    self.tree.set_window_rect(window, rect)?;
                }
                self.debug_tree(&workspace);
                EventResponse {
                    focus_window: Some(window),
                    layout_changed: true,
                }
            }
            LayoutEvent::WindowUnbound(window) => {
                let ws = self.tree.remove_window(window)?;
                let focus_window = ws.and_then(|ws| {
                    self.normalize(ws);
                    self.focused_window_in(ws)
                });
                EventResponse { focus_window, layout_changed: true }
            }
            LayoutEvent::WindowFocused(window) => {
                let node =
                    self.tree.window_node(window).ok_or(LayoutError::WindowNotFound(window))?;
                self.tree.mark_as_most_recent(node);
                EventResponse {
                    focus_window: Some(window),
                    layout_changed: false,
                }
            }
            LayoutEvent::GeometryApplied { window, rect } => {
                if !self.tree.set_window_rect(window, rect)? {
                    debug!(%window, "geometry unchanged");
                }
                EventResponse::default()
            }
            LayoutEvent::WindowParked { window, container } => {
                let ws = self.tree.park_window(window, container)?;
                let focus_window = ws.and_then(|ws| {
                    self.normalize(ws);
                    self.focused_window_in(ws)
                });
                EventResponse { focus_window, layout_changed: true }
            }
        };
        self.check_invariants();
        Ok(response)
    }

    #[instrument(name = "layout_engine::handle_command", skip(self))]
    pub fn handle_command(
        &mut self,
        workspace: &str,
        command: LayoutCommand,
    ) -> Result<CommandOutcome, LayoutError> {
        let ws = self.workspace(workspace)?;
        self.debug_tree(workspace);

        let default_action = self.layout_settings.boundaries_action;
        let outcome = match command {
            LayoutCommand::MoveFocus { direction, boundaries_action } => {
                let from = self.focused_leaf(ws, workspace)?;
                commands::focus(
                    &mut self.tree,
                    from,
                    direction,
                    boundaries_action.unwrap_or(default_action),
                )
            }
            LayoutCommand::MoveNode { direction, boundaries_action } => {
                let from = self.focused_leaf(ws, workspace)?;
                commands::move_node(
                    &mut self.tree,
                    from,
                    direction,
                    boundaries_action.unwrap_or(default_action),
                )
            }
            LayoutCommand::NormalizeContainers => {
                Ok(CommandOutcome::Normalized { collapsed: self.normalize(ws) })
            }
        };
        match &outcome {
            Ok(outcome) => debug!(?outcome),
            Err(e) => warn!("Layout command failed: {e}"),
        }
        self.check_invariants();
        outcome
    }

    /// Parses `json` as a [`LayoutCommand`] and runs it.
    pub fn handle_command_json(
        &mut self,
        workspace: &str,
        json: &str,
    ) -> Result<CommandOutcome, LayoutError> {
        let command = LayoutCommand::from_json(json)?;
        self.handle_command(workspace, command)
    }

    fn focused_leaf(&self, ws: NodeId, workspace: &str) -> Result<NodeId, LayoutError> {
        self.tree
            .most_recent_window_recursive(ws)
            .ok_or_else(|| LayoutError::NoFocusedWindow(workspace.to_owned()))
    }

    fn check_invariants(&self) {
        if cfg!(debug_assertions) {
            if let Err(violation) = self.tree.check_invariants() {
                broken_invariant(violation);
            }
        }
    }
}
