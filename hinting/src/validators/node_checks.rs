//! Built-in node-level checks: dead references, terminal labels, and the
//! variadic / abstract / constructor marker rules.

use std::collections::BTreeMap;

use crate::project::paths;
use crate::project::queries::get_patch_by_path;
use crate::project::rules::{
    validate_abstract_patch, validate_constructor_patch, validate_patch_for_variadics,
    validate_pin_labels,
};
use crate::project::types::{Node, NodeId, Patch, Project};
use crate::report::{ErrorIndex, ErrorKind, ErrorsByType, ValidationError};

/// Marker and terminal types are built into the graph layer rather than
/// stored as project patches, so they always resolve.
fn node_type_resolves(node: &Node, project: &Project) -> bool {
    paths::is_terminal_patch_path(&node.node_type)
        || paths::is_variadic_path(&node.node_type)
        || node.node_type == paths::ABSTRACT_MARKER_PATH
        || node.node_type == paths::OUTPUT_SELF_PATH
        || get_patch_by_path(&node.node_type, project).is_some()
}

/// Every node gets a `DeadReference` entry: an error when its type patch is
/// missing from the project, an empty list otherwise. The empty lists let a
/// later merge clear errors that a newly supplied patch resolves.
pub fn dead_ref_errors(
    patch: &Patch,
    project: &Project,
    _prev: &ErrorIndex,
) -> BTreeMap<NodeId, ErrorsByType> {
    patch
        .nodes
        .values()
        .map(|node| {
            let errors = if node_type_resolves(node, project) {
                Vec::new()
            } else {
                let mut err = ValidationError::new(
                    "DEAD_REFERENCE__PATCH_FOR_NODE_NOT_FOUND",
                    format!(
                        "Node '{}' references patch '{}' which does not exist",
                        node.id, node.node_type
                    ),
                );
                err.node_type = Some(node.node_type.clone());
                err.trace = vec![patch.path.clone()];
                vec![err]
            };
            (
                node.id.clone(),
                BTreeMap::from([(ErrorKind::DeadReference, errors)]),
            )
        })
        .collect()
}

/// Pin-label failures are keyed by the terminal node ids the underlying rule
/// reports in `pin_keys`.
pub fn terminal_label_errors(
    patch: &Patch,
    _project: &Project,
    _prev: &ErrorIndex,
) -> BTreeMap<NodeId, ErrorsByType> {
    match validate_pin_labels(patch) {
        Ok(()) => BTreeMap::new(),
        Err(err) => err
            .pin_keys
            .iter()
            .map(|node_id| {
                (
                    node_id.clone(),
                    BTreeMap::from([(ErrorKind::PinLabels, vec![err.clone()])]),
                )
            })
            .collect(),
    }
}

/// Shared shape of the marker checks: find the marker nodes, short-circuit to
/// no errors when there are none, otherwise run the patch-wide rule and pin
/// its outcome on every marker node.
fn marker_nodes_error_map(
    patch: &Patch,
    is_marker: fn(&str) -> bool,
    rule: fn(&Patch) -> Result<(), ValidationError>,
    kind: ErrorKind,
) -> BTreeMap<NodeId, ErrorsByType> {
    let marker_ids: Vec<&NodeId> = patch
        .nodes
        .values()
        .filter(|n| is_marker(&n.node_type))
        .map(|n| &n.id)
        .collect();

    if marker_ids.is_empty() {
        return BTreeMap::new();
    }

    let errors = match rule(patch) {
        Ok(()) => Vec::new(),
        Err(err) => vec![err],
    };

    marker_ids
        .into_iter()
        .map(|id| (id.clone(), BTreeMap::from([(kind, errors.clone())])))
        .collect()
}

pub fn variadic_marker_errors(
    patch: &Patch,
    _project: &Project,
    _prev: &ErrorIndex,
) -> BTreeMap<NodeId, ErrorsByType> {
    marker_nodes_error_map(
        patch,
        paths::is_variadic_path,
        validate_patch_for_variadics,
        ErrorKind::Variadics,
    )
}

pub fn abstract_marker_errors(
    patch: &Patch,
    _project: &Project,
    _prev: &ErrorIndex,
) -> BTreeMap<NodeId, ErrorsByType> {
    marker_nodes_error_map(
        patch,
        |path| path == paths::ABSTRACT_MARKER_PATH,
        validate_abstract_patch,
        ErrorKind::AbstractMarkers,
    )
}

pub fn constructor_marker_errors(
    patch: &Patch,
    _project: &Project,
    _prev: &ErrorIndex,
) -> BTreeMap<NodeId, ErrorsByType> {
    marker_nodes_error_map(
        patch,
        paths::is_terminal_self,
        validate_constructor_patch,
        ErrorKind::ConstructorMarkers,
    )
}
