use serde::Serialize;
use tracing::info;

use super::tree::{CategoryNode, CategoryTree, ROOT_ID};

/// Where the drill-down view is. Zoom and selection live in one value so
/// impossible combinations cannot be expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DrillState {
    #[default]
    Root,
    Zoomed {
        group: String,
    },
    ZoomedWithSelection {
        group: String,
        leaf: String,
    },
    SelectedLeafAtRoot {
        leaf: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillPhase {
    Root,
    GroupSelected,
    LeafSelected,
}

impl DrillPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::GroupSelected => "group_selected",
            Self::LeafSelected => "leaf_selected",
        }
    }
}

impl DrillState {
    pub fn zoomed_group(&self) -> Option<&str> {
        match self {
            Self::Zoomed { group } | Self::ZoomedWithSelection { group, .. } => Some(group),
            Self::Root | Self::SelectedLeafAtRoot { .. } => None,
        }
    }

    /// Node whose transactions are listed. A zoomed group is its own
    /// selection until a leaf is picked.
    pub fn selected_id(&self) -> Option<&str> {
        match self {
            Self::Root => None,
            Self::Zoomed { group } => Some(group),
            Self::ZoomedWithSelection { leaf, .. } | Self::SelectedLeafAtRoot { leaf } => {
                Some(leaf)
            }
        }
    }

    pub fn phase(&self) -> DrillPhase {
        match self {
            Self::Root => DrillPhase::Root,
            Self::Zoomed { .. } => DrillPhase::GroupSelected,
            Self::ZoomedWithSelection { .. } | Self::SelectedLeafAtRoot { .. } => {
                DrillPhase::LeafSelected
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillEvent {
    /// A node at `depth` relative to the displayed view was activated.
    Click { node_id: String, depth: usize },
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrillNotice {
    pub code: String,
    pub message: String,
}

impl DrillNotice {
    fn group_vanished(group: &str) -> Self {
        Self {
            code: "zoom_target_missing".to_string(),
            message: format!("No transactions for \"{group}\" in the selected time frame."),
        }
    }
}

/// Applies one event. Unknown or invisible nodes leave the state unchanged.
pub fn transition(state: &DrillState, tree: &CategoryTree, event: &DrillEvent) -> DrillState {
    let (node_id, depth) = match event {
        DrillEvent::Back => return DrillState::Root,
        DrillEvent::Click { node_id, depth } => (node_id.as_str(), *depth),
    };

    match (depth, state.zoomed_group()) {
        (0, _) => DrillState::Root,
        (1, Some(group)) => DrillState::Zoomed {
            group: group.to_string(),
        },
        (1, None) => match tree.group(node_id) {
            Some(group) if group.is_leaf() => DrillState::SelectedLeafAtRoot {
                leaf: group.id.clone(),
            },
            Some(group) => DrillState::Zoomed {
                group: group.id.clone(),
            },
            None => state.clone(),
        },
        (_, Some(group)) => match tree.group(group).and_then(|node| node.child(node_id)) {
            Some(leaf) => DrillState::ZoomedWithSelection {
                group: group.to_string(),
                leaf: leaf.id.clone(),
            },
            None => state.clone(),
        },
        (_, None) => match leaf_under_any_group(tree, node_id) {
            Some(leaf) => DrillState::SelectedLeafAtRoot {
                leaf: leaf.id.clone(),
            },
            None => state.clone(),
        },
    }
}

fn leaf_under_any_group<'a>(tree: &'a CategoryTree, id: &str) -> Option<&'a CategoryNode> {
    tree.root
        .children
        .iter()
        .find_map(|group| group.child(id))
}

/// Depth of `node_id` in the view the state currently displays, or `None`
/// when the node is not visible there.
/// A visible group wins over the root when their ids collide.
pub fn view_depth(state: &DrillState, tree: &CategoryTree, node_id: &str) -> Option<usize> {
    match state.zoomed_group() {
        Some(group) if node_id == group => Some(1),
        Some(_) if node_id == ROOT_ID => Some(0),
        Some(group) => tree
            .group(group)
            .and_then(|node| node.child(node_id))
            .map(|_| 2),
        None if tree.group(node_id).is_some() => Some(1),
        None if node_id == ROOT_ID => Some(0),
        None => leaf_under_any_group(tree, node_id).map(|_| 2),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub state: DrillState,
    pub notice: Option<DrillNotice>,
}

/// Re-validates a state against a freshly built tree. A vanished zoom group
/// falls back to the root with a notice; a vanished leaf is dropped quietly.
pub fn reconcile(state: &DrillState, tree: &CategoryTree) -> Reconciled {
    let quiet = |state: DrillState| Reconciled {
        state,
        notice: None,
    };

    match state {
        DrillState::Root => quiet(DrillState::Root),
        DrillState::Zoomed { group } | DrillState::ZoomedWithSelection { group, .. } => {
            let Some(node) = tree.group(group) else {
                info!(group = %group, "zoomed group vanished after rebuild");
                return Reconciled {
                    state: DrillState::Root,
                    notice: Some(DrillNotice::group_vanished(group)),
                };
            };
            if node.is_leaf() {
                return quiet(DrillState::SelectedLeafAtRoot {
                    leaf: group.clone(),
                });
            }
            match state {
                DrillState::ZoomedWithSelection { leaf, .. } if node.child(leaf).is_some() => {
                    quiet(state.clone())
                }
                _ => quiet(DrillState::Zoomed {
                    group: group.clone(),
                }),
            }
        }
        DrillState::SelectedLeafAtRoot { leaf } => match tree.group(leaf) {
            Some(group) if !group.is_leaf() => quiet(DrillState::Zoomed {
                group: group.id.clone(),
            }),
            Some(_) => quiet(state.clone()),
            None if leaf_under_any_group(tree, leaf).is_some() => quiet(state.clone()),
            None => quiet(DrillState::Root),
        },
    }
}

/// The node drawn as the chart's center: the zoomed group, or the root.
pub fn display_node<'a>(state: &DrillState, tree: &'a CategoryTree) -> &'a CategoryNode {
    state
        .zoomed_group()
        .and_then(|group| tree.group(group))
        .unwrap_or(&tree.root)
}

pub fn selected_node<'a>(state: &DrillState, tree: &'a CategoryTree) -> Option<&'a CategoryNode> {
    state.selected_id().and_then(|id| tree.find(id))
}

/// Root-to-focus chain: the selection if any, else the zoom, else the root.
pub fn breadcrumb<'a>(state: &DrillState, tree: &'a CategoryTree) -> Vec<&'a CategoryNode> {
    match state.selected_id().or(state.zoomed_group()) {
        Some(id) => {
            let path = tree.path_to(id);
            if path.is_empty() { vec![&tree.root] } else { path }
        }
        None => vec![&tree.root],
    }
}
