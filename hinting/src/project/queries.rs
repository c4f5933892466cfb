//! Read-only queries over the project graph.

use std::collections::BTreeMap;

use super::paths;
use super::types::{Link, Node, NodeId, Patch, Pin, PinKey, Project};
use crate::error::Fault;

pub fn list_patches(project: &Project) -> Vec<&Patch> {
    project.patches.values().collect()
}

pub fn list_local_patches(project: &Project) -> Vec<&Patch> {
    project
        .patches
        .values()
        .filter(|p| paths::is_path_local(&p.path))
        .collect()
}

pub fn get_patch_by_path<'a>(path: &str, project: &'a Project) -> Option<&'a Patch> {
    project.patches.get(path)
}

/// Resolves a patch path that the caller asserts is present. An absent path is
/// a caller contract violation (an action referenced a patch the project does
/// not contain) and faults instead of being swallowed.
pub fn get_patch_by_path_unsafe<'a>(path: &str, project: &'a Project) -> Result<&'a Patch, Fault> {
    get_patch_by_path(path, project).ok_or_else(|| Fault::PatchNotFound {
        patch_path: path.to_string(),
    })
}

pub fn list_nodes(patch: &Patch) -> Vec<&Node> {
    patch.nodes.values().collect()
}

pub fn get_node_by_id<'a>(id: &str, patch: &'a Patch) -> Option<&'a Node> {
    patch.nodes.get(id)
}

pub fn list_links(patch: &Patch) -> Vec<&Link> {
    patch.links.values().collect()
}

/// Does the patch contain a node instancing `path`? Used to find first-order
/// dependents of a changed patch.
pub fn has_node_with_type(path: &str, patch: &Patch) -> bool {
    patch.nodes.values().any(|n| n.node_type == path)
}

/// Does the patch contain a variadic marker node?
pub fn is_variadic_patch(patch: &Patch) -> bool {
    patch
        .nodes
        .values()
        .any(|n| paths::is_variadic_path(&n.node_type))
}

/// The pins a node exposes, resolved from its type patch. Terminal markers are
/// not real patches; they synthesize their single proxy pin (`__out__` for an
/// input terminal, `__in__` for an output terminal). `None` means the node's
/// type does not resolve — a dead reference.
pub fn pins_for_node(node: &Node, project: &Project) -> Option<BTreeMap<PinKey, Pin>> {
    if let Some((direction, pin_type)) = paths::terminal_pin(&node.node_type) {
        let (key, dir) = match direction {
            // An input terminal feeds the patch's input into the body.
            super::types::Direction::Input => ("__out__", super::types::Direction::Output),
            super::types::Direction::Output => ("__in__", super::types::Direction::Input),
        };
        let pin = Pin {
            key: key.to_string(),
            pin_type,
            direction: dir,
            label: String::new(),
            order: 0,
        };
        return Some(BTreeMap::from([(key.to_string(), pin)]));
    }

    // Marker nodes have no pins of their own.
    if paths::is_variadic_path(&node.node_type)
        || node.node_type == paths::ABSTRACT_MARKER_PATH
        || node.node_type == paths::OUTPUT_SELF_PATH
    {
        return Some(BTreeMap::new());
    }

    get_patch_by_path(&node.node_type, project).map(|p| p.pins.clone())
}

#[cfg(test)]
mod tests {
    use super::super::types::*;
    use super::*;

    fn node(id: &str, node_type: &str) -> Node {
        Node {
            id: id.into(),
            node_type: node_type.into(),
            label: String::new(),
            description: String::new(),
            bound_literals: BTreeMap::new(),
            position: Position::default(),
        }
    }

    #[test]
    fn unsafe_lookup_faults_on_missing_patch() {
        let project = Project::default();
        let err = get_patch_by_path_unsafe("@/nope", &project).unwrap_err();
        assert!(err.to_string().contains("@/nope"));
    }

    #[test]
    fn terminal_node_pins_are_synthesized() {
        let project = Project::default();
        let n = node("t", "core/patch-nodes/input-number");
        let pins = pins_for_node(&n, &project).unwrap();
        let pin = &pins["__out__"];
        assert_eq!(pin.pin_type, PinType::Number);
        assert_eq!(pin.direction, Direction::Output);
    }

    #[test]
    fn dead_reference_has_no_pins() {
        let project = Project::default();
        let n = node("x", "ghost-lib/nothing");
        assert!(pins_for_node(&n, &project).is_none());
    }
}
