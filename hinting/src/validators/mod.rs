//! Validator pipeline: pluggable node/pin/link checks composed into per-patch
//! error reports.
//!
//! Validators of the same kind are merged additively — per error-kind key the
//! result is the concatenation of every producing validator's output, so no
//! validator can clobber another's findings.

pub mod link_checks;
pub mod node_checks;
pub mod pin_checks;

use std::collections::BTreeMap;

use crate::actions::Action;
use crate::deduce::AllDeducedTypes;
use crate::error::Fault;
use crate::merge::{ErrorsUpdate, UpdatePolicy};
use crate::project::paths::is_path_local;
use crate::project::queries::{
    get_patch_by_path_unsafe, has_node_with_type, list_local_patches, list_patches,
};
use crate::project::types::{Link, Node, NodeId, Patch, PinKey, Project};
use crate::report::{
    concat_errors_by_type, ErrorIndex, ErrorsByType, LinkErrors, NodeErrors, PatchErrors,
};

pub type NodeValidator = fn(&Patch, &Project, &ErrorIndex) -> BTreeMap<NodeId, ErrorsByType>;
pub type PinValidator = fn(&Patch, &Project, &Node, &ErrorIndex) -> BTreeMap<PinKey, ErrorsByType>;
pub type LinkValidator =
    fn(&Link, &Patch, &Project, &AllDeducedTypes, &ErrorIndex) -> ErrorsByType;

pub const GENERAL_NODE_VALIDATORS: [NodeValidator; 5] = [
    node_checks::dead_ref_errors,
    node_checks::terminal_label_errors,
    node_checks::variadic_marker_errors,
    node_checks::abstract_marker_errors,
    node_checks::constructor_marker_errors,
];

pub const GENERAL_PIN_VALIDATORS: [PinValidator; 1] = [pin_checks::bound_value_errors];

pub const GENERAL_LINK_VALIDATORS: [LinkValidator; 1] = [link_checks::link_type_errors];

fn validate_nodes(
    node_validators: &[NodeValidator],
    pin_validators: &[PinValidator],
    patch: &Patch,
    project: &Project,
    prev: &ErrorIndex,
) -> BTreeMap<NodeId, NodeErrors> {
    let mut nodes: BTreeMap<NodeId, NodeErrors> = BTreeMap::new();

    for validator in node_validators {
        for (node_id, errors) in validator(patch, project, prev) {
            let entry = nodes.entry(node_id).or_default();
            entry.errors = concat_errors_by_type(std::mem::take(&mut entry.errors), errors);
        }
    }

    for node in patch.nodes.values() {
        for validator in pin_validators {
            for (pin_key, errors) in validator(patch, project, node, prev) {
                let node_entry = nodes.entry(node.id.clone()).or_default();
                let pin_entry = node_entry.pins.entry(pin_key).or_default();
                pin_entry.errors =
                    concat_errors_by_type(std::mem::take(&mut pin_entry.errors), errors);
            }
        }
    }

    nodes
}

fn validate_links(
    link_validators: &[LinkValidator],
    patch: &Patch,
    project: &Project,
    all_deduced: &AllDeducedTypes,
    prev: &ErrorIndex,
) -> BTreeMap<String, LinkErrors> {
    patch
        .links
        .values()
        .map(|link| {
            let errors = link_validators.iter().fold(ErrorsByType::new(), |acc, v| {
                concat_errors_by_type(acc, v(link, patch, project, all_deduced, prev))
            });
            (link.id.clone(), LinkErrors { errors })
        })
        .collect()
}

/// Run explicit validator lists over a set of patches. Patch keys are kept
/// even when their subtree is empty: downstream, an `Assoc` merge uses the
/// presence of a clean entry to clear that patch from the index, and the
/// merger owns pruning.
pub fn validate_patches(
    node_validators: &[NodeValidator],
    pin_validators: &[PinValidator],
    link_validators: &[LinkValidator],
    project: &Project,
    all_deduced: &AllDeducedTypes,
    prev: &ErrorIndex,
    patches: &[&Patch],
) -> ErrorIndex {
    patches
        .iter()
        .map(|patch| {
            let report = PatchErrors {
                errors: ErrorsByType::new(),
                nodes: validate_nodes(node_validators, pin_validators, patch, project, prev),
                links: validate_links(link_validators, patch, project, all_deduced, prev),
            };
            (patch.path.clone(), report)
        })
        .collect()
}

/// `validate_patches` pre-bound to the five built-in checks.
pub fn validate_patches_generally(
    project: &Project,
    all_deduced: &AllDeducedTypes,
    prev: &ErrorIndex,
    patches: &[&Patch],
) -> ErrorIndex {
    validate_patches(
        &GENERAL_NODE_VALIDATORS,
        &GENERAL_PIN_VALIDATORS,
        &GENERAL_LINK_VALIDATORS,
        project,
        all_deduced,
        prev,
        patches,
    )
}

/// Keep only the changed patch and its first-order dependents (patches
/// instancing it). With no changed path, keep everything.
fn filter_dependent_patches<'a>(
    changed_path: Option<&str>,
    patches: Vec<&'a Patch>,
) -> Vec<&'a Patch> {
    match changed_path {
        None => patches,
        Some(path) => patches
            .into_iter()
            .filter(|p| p.path == path || has_node_with_type(path, p))
            .collect(),
    }
}

pub fn validate_local_patches(
    project: &Project,
    all_deduced: &AllDeducedTypes,
    changed_path: Option<&str>,
    prev: &ErrorIndex,
) -> ErrorIndex {
    let patches = filter_dependent_patches(changed_path, list_local_patches(project));
    validate_patches_generally(project, all_deduced, prev, &patches)
}

pub fn validate_all_patches(
    project: &Project,
    all_deduced: &AllDeducedTypes,
    changed_path: Option<&str>,
    prev: &ErrorIndex,
) -> ErrorIndex {
    let patches = filter_dependent_patches(changed_path, list_patches(project));
    validate_patches_generally(project, all_deduced, prev, &patches)
}

/// Default validation strategy when no short-circuit applies.
///
/// Without an acting patch the whole project is revalidated and overwrites the
/// index. With one, the changed patch is checked in isolation first; only when
/// it is dirty, or used to be, does the scope widen to its dependents — local
/// edits stay local (`Assoc`), library edits rebuild the whole index
/// (`Overwrite`).
pub fn general_validator(
    action: &Action,
    project: &Project,
    all_deduced: &AllDeducedTypes,
    prev: &ErrorIndex,
) -> Result<ErrorsUpdate, Fault> {
    let Some(patch_path) = action.acting_patch_path() else {
        return Ok(ErrorsUpdate {
            policy: UpdatePolicy::Overwrite,
            errors: validate_all_patches(project, all_deduced, None, prev),
        });
    };

    let patch = get_patch_by_path_unsafe(patch_path, project)?;
    let single = validate_patches_generally(project, all_deduced, prev, &[patch]);
    let clean = single.values().all(PatchErrors::is_empty);

    if clean && !prev.contains_key(patch_path) {
        return Ok(ErrorsUpdate {
            policy: UpdatePolicy::Assoc,
            errors: single,
        });
    }

    if is_path_local(patch_path) {
        Ok(ErrorsUpdate {
            policy: UpdatePolicy::Assoc,
            errors: validate_local_patches(project, all_deduced, Some(patch_path), prev),
        })
    } else {
        Ok(ErrorsUpdate {
            policy: UpdatePolicy::Overwrite,
            errors: validate_all_patches(project, all_deduced, Some(patch_path), prev),
        })
    }
}
