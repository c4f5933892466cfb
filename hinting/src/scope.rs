//! Change-scope selection: which patches must be revalidated for an action,
//! and whether validation is needed at all.

use crate::actions::Action;
use crate::deduce::AllDeducedTypes;
use crate::error::Fault;
use crate::merge::{merge_errors, ErrorsUpdate, UpdatePolicy};
use crate::project::paths::{is_terminal_patch_path, is_terminal_self, lib_name_of_path, strip_version};
use crate::project::queries::{
    get_node_by_id, get_patch_by_path, get_patch_by_path_unsafe, is_variadic_patch, list_patches,
};
use crate::project::types::{Node, Patch, Project};
use crate::report::{DeepMerge, ErrorIndex};
use crate::validators::{
    self, general_validator, validate_local_patches, validate_patches,
    validate_patches_generally, LinkValidator, NodeValidator, PinValidator,
};

fn is_node_terminal_or_self(node: &Node) -> bool {
    is_terminal_patch_path(&node.node_type) || is_terminal_self(&node.node_type)
}

/// Gate run before any validation. Defaults to `true`; the exceptions are
/// edits that cannot change validity.
pub fn shall_validate(action: &Action, project: &Project) -> bool {
    match action {
        // Free-text edits never affect validity.
        Action::PatchDescriptionUpdate { .. }
        | Action::PatchNativeImplementationUpdate { .. } => false,

        // Moving entities only matters in variadic patches, where marker
        // placement participates in arity checks.
        Action::BulkMoveNodesAndComments {
            patch_path,
            node_ids,
            ..
        } => {
            if node_ids.is_empty() {
                return false;
            }
            get_patch_by_path(patch_path, project).is_some_and(is_variadic_patch)
        }

        Action::NodeUpdateProperty {
            patch_path,
            id,
            key,
            ..
        } => {
            if key == "description" {
                return false;
            }
            let node = get_patch_by_path(patch_path, project)
                .and_then(|patch| get_node_by_id(id, patch));
            match node {
                // Label edits matter only on terminals and `output-self`,
                // where the label becomes a pin label.
                Some(node) => key != "label" || is_node_terminal_or_self(node),
                // Cannot resolve the node — default to validating.
                None => true,
            }
        }

        _ => true,
    }
}

const INSTALL_RECHECK_NODE_VALIDATORS: [NodeValidator; 1] =
    [validators::node_checks::dead_ref_errors];
const INSTALL_RECHECK_PIN_VALIDATORS: [PinValidator; 1] =
    [validators::pin_checks::bound_value_errors];
const INSTALL_RECHECK_LINK_VALIDATORS: [LinkValidator; 1] =
    [validators::link_checks::link_type_errors];

/// Installing libraries can resolve previously dead references anywhere, and
/// the new library patches themselves have never been validated. Recheck the
/// reference-sensitive kinds on every currently erroring patch, run the full
/// pipeline over the freshly installed patches, and merge both.
fn install_libraries_update(
    lib_names: &[String],
    project: &Project,
    all_deduced: &AllDeducedTypes,
    prev: &ErrorIndex,
) -> ErrorsUpdate {
    let erroring: Vec<&Patch> = prev
        .keys()
        .filter_map(|path| get_patch_by_path(path, project))
        .collect();
    let rechecked = validate_patches(
        &INSTALL_RECHECK_NODE_VALIDATORS,
        &INSTALL_RECHECK_PIN_VALIDATORS,
        &INSTALL_RECHECK_LINK_VALIDATORS,
        project,
        all_deduced,
        prev,
        &erroring,
    );

    let installed_names: Vec<&str> = lib_names.iter().map(|n| strip_version(n)).collect();
    let installed: Vec<&Patch> = list_patches(project)
        .into_iter()
        .filter(|p| lib_name_of_path(&p.path).is_some_and(|lib| installed_names.contains(&lib)))
        .collect();
    let fresh = validate_patches_generally(project, all_deduced, prev, &installed);

    ErrorsUpdate {
        policy: UpdatePolicy::Merge,
        errors: rechecked.deep_merge(fresh),
    }
}

/// Map an action to its validation pass and fold the outcome into the index.
///
/// Dedicated short-circuits cover the actions where the general rule would be
/// either wasteful or wrong; everything else goes through `general_validator`.
pub fn validate_project(
    action: &Action,
    project: &Project,
    all_deduced: &AllDeducedTypes,
    prev: &ErrorIndex,
) -> Result<ErrorIndex, Fault> {
    let update = match action {
        // A new or renamed patch can fix or break dead references in any
        // local patch, not just dependents of the acted-on path.
        Action::PatchAdd { .. } | Action::PatchRename { .. } => ErrorsUpdate {
            policy: UpdatePolicy::Assoc,
            errors: validate_local_patches(project, all_deduced, None, prev),
        },

        Action::BulkMoveNodesAndComments { patch_path, .. } => {
            let patch = get_patch_by_path_unsafe(patch_path, project)?;
            ErrorsUpdate {
                policy: UpdatePolicy::Merge,
                errors: validate_patches(
                    &[validators::node_checks::variadic_marker_errors],
                    &[],
                    &[],
                    project,
                    all_deduced,
                    prev,
                    &[patch],
                ),
            }
        }

        Action::InstallLibrariesComplete { lib_names } => {
            install_libraries_update(lib_names, project, all_deduced, prev)
        }

        _ => general_validator(action, project, all_deduced, prev)?,
    };

    Ok(merge_errors(prev, update))
}
