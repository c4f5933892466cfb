//! Editor actions the engine reacts to.
//!
//! A closed tagged union mirroring the editor's `{type, payload}` action
//! objects. Dispatch tables over action kinds become exhaustive matches;
//! actions without a dedicated arm fall through to general validation.

use serde::{Deserialize, Serialize};

use crate::project::types::{LinkId, NodeId, PatchPath};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    ProjectCreate,
    ProjectOpen,
    ProjectImport,

    #[serde(rename_all = "camelCase")]
    PatchAdd { patch_path: PatchPath },
    #[serde(rename_all = "camelCase")]
    PatchRename {
        patch_path: PatchPath,
        prev_patch_path: PatchPath,
    },
    #[serde(rename_all = "camelCase")]
    PatchDescriptionUpdate {
        patch_path: PatchPath,
        description: String,
    },
    #[serde(rename_all = "camelCase")]
    PatchNativeImplementationUpdate {
        patch_path: PatchPath,
        source: String,
    },

    #[serde(rename_all = "camelCase")]
    NodeAdd {
        patch_path: PatchPath,
        node_type: PatchPath,
    },
    #[serde(rename_all = "camelCase")]
    NodeUpdateProperty {
        patch_path: PatchPath,
        id: NodeId,
        key: String,
        value: String,
    },
    #[serde(rename_all = "camelCase")]
    LinkAdd { patch_path: PatchPath, id: LinkId },

    #[serde(rename_all = "camelCase")]
    BulkDeleteEntities {
        patch_path: PatchPath,
        #[serde(default)]
        node_ids: Vec<NodeId>,
        #[serde(default)]
        link_ids: Vec<LinkId>,
        #[serde(default)]
        comment_ids: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    BulkMoveNodesAndComments {
        patch_path: PatchPath,
        #[serde(default)]
        node_ids: Vec<NodeId>,
        #[serde(default)]
        comment_ids: Vec<String>,
    },

    #[serde(rename_all = "camelCase")]
    InstallLibrariesComplete {
        #[serde(default)]
        lib_names: Vec<String>,
    },
}

impl Action {
    /// The patch the action acts upon, when its payload names one.
    pub fn acting_patch_path(&self) -> Option<&PatchPath> {
        match self {
            Action::PatchAdd { patch_path }
            | Action::PatchRename { patch_path, .. }
            | Action::PatchDescriptionUpdate { patch_path, .. }
            | Action::PatchNativeImplementationUpdate { patch_path, .. }
            | Action::NodeAdd { patch_path, .. }
            | Action::NodeUpdateProperty { patch_path, .. }
            | Action::LinkAdd { patch_path, .. }
            | Action::BulkDeleteEntities { patch_path, .. }
            | Action::BulkMoveNodesAndComments { patch_path, .. } => Some(patch_path),
            Action::ProjectCreate
            | Action::ProjectOpen
            | Action::ProjectImport
            | Action::InstallLibrariesComplete { .. } => None,
        }
    }
}
