//! Pin-type deduction for generic pins.
//!
//! Links and shared generic markers tie pins together into connected
//! components; a component anchored by exactly one concrete type resolves all
//! of its generic pins to that type. Ambiguously anchored components stay
//! undeduced and are left for the link-type check to report.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::unionfind::UnionFind;

use crate::actions::Action;
use crate::project::queries::{get_patch_by_path, list_patches, pins_for_node};
use crate::project::rules::infer_literal_type;
use crate::project::types::{NodeId, Patch, PatchPath, PinKey, PinType, Project};

/// Deduced concrete types for a patch's generic pins, keyed by node then pin.
/// Absence of a key means "not deducible, leave as declared".
pub type DeducedPinTypes = BTreeMap<NodeId, BTreeMap<PinKey, PinType>>;

pub type AllDeducedTypes = BTreeMap<PatchPath, DeducedPinTypes>;

struct PinSlot {
    node_id: NodeId,
    pin_key: PinKey,
    declared: PinType,
    literal_seed: Option<PinType>,
}

/// Deduce concrete types for the generic pins of one patch. Pure: identical
/// snapshots always produce the identical map, and nothing is mutated.
pub fn deduce_pin_types(patch: &Patch, project: &Project) -> DeducedPinTypes {
    let mut slots: Vec<PinSlot> = Vec::new();
    let mut index: HashMap<(NodeId, PinKey), usize> = HashMap::new();

    for node in patch.nodes.values() {
        // Dead references contribute nothing; the dead-ref check reports them.
        let Some(pins) = pins_for_node(node, project) else {
            continue;
        };
        for (pin_key, pin) in pins {
            let literal_seed = if pin.pin_type.is_generic() {
                node.bound_literals
                    .get(&pin_key)
                    .and_then(|lit| infer_literal_type(lit))
            } else {
                None
            };
            index.insert((node.id.clone(), pin_key.clone()), slots.len());
            slots.push(PinSlot {
                node_id: node.id.clone(),
                pin_key,
                declared: pin.pin_type,
                literal_seed,
            });
        }
    }

    let mut components: UnionFind<usize> = UnionFind::new(slots.len());

    // Links connect pins across nodes. Endpoints referencing unknown pins are
    // dead and skipped.
    for link in patch.links.values() {
        let from = index.get(&(link.output.node_id.clone(), link.output.pin_key.clone()));
        let to = index.get(&(link.input.node_id.clone(), link.input.pin_key.clone()));
        if let (Some(&a), Some(&b)) = (from, to) {
            components.union(a, b);
        }
    }

    // Pins of one node sharing a generic marker resolve together, which is
    // what carries a type across a polymorphic node from input to output.
    let mut by_node_generic: HashMap<(&str, PinType), usize> = HashMap::new();
    for (i, slot) in slots.iter().enumerate() {
        if !slot.declared.is_generic() {
            continue;
        }
        match by_node_generic.get(&(slot.node_id.as_str(), slot.declared)) {
            Some(&first) => {
                components.union(first, i);
            }
            None => {
                by_node_generic.insert((slot.node_id.as_str(), slot.declared), i);
            }
        }
    }

    // Every concrete declared type and every typed literal bound to a generic
    // pin anchors its component.
    let mut anchors: BTreeMap<usize, BTreeSet<PinType>> = BTreeMap::new();
    for (i, slot) in slots.iter().enumerate() {
        let seed = if slot.declared.is_generic() {
            slot.literal_seed
        } else {
            Some(slot.declared)
        };
        if let Some(seed) = seed {
            anchors.entry(components.find(i)).or_default().insert(seed);
        }
    }

    let mut deduced: DeducedPinTypes = BTreeMap::new();
    for (i, slot) in slots.iter().enumerate() {
        if !slot.declared.is_generic() {
            continue;
        }
        let Some(types) = anchors.get(&components.find(i)) else {
            continue;
        };
        // A component with conflicting anchors is not deducible.
        if types.len() != 1 {
            continue;
        }
        let Some(&resolved) = types.first() else {
            continue;
        };
        deduced
            .entry(slot.node_id.clone())
            .or_default()
            .insert(slot.pin_key.clone(), resolved);
    }

    deduced
}

/// Gate checked by the host before recomputing deduction: only these actions
/// can change what the deduction depends on.
pub fn shall_deduce_types(action: &Action) -> bool {
    matches!(
        action,
        Action::ProjectCreate
            | Action::ProjectOpen
            | Action::ProjectImport
            | Action::BulkDeleteEntities { .. }
            | Action::LinkAdd { .. }
            | Action::NodeUpdateProperty { .. }
    )
}

fn is_project_level(action: &Action) -> bool {
    matches!(
        action,
        Action::ProjectCreate | Action::ProjectOpen | Action::ProjectImport
    )
}

/// Incrementally maintain the per-patch deduction map. Project create/open/
/// import rebuild everything; any other relevant action recomputes only the
/// patch it acts on and splices the entry into the previous map. An action
/// with no target patch leaves the map untouched.
pub fn deduce_pin_types_for_project(
    project: &Project,
    action: &Action,
    prev: &AllDeducedTypes,
) -> AllDeducedTypes {
    if is_project_level(action) {
        return list_patches(project)
            .into_iter()
            .map(|patch| (patch.path.clone(), deduce_pin_types(patch, project)))
            .filter(|(_, types)| !types.is_empty())
            .collect();
    }

    let recomputed = action
        .acting_patch_path()
        .and_then(|path| get_patch_by_path(path, project))
        .map(|patch| (patch.path.clone(), deduce_pin_types(patch, project)));

    match recomputed {
        Some((path, types)) => {
            let mut next = prev.clone();
            if types.is_empty() {
                next.remove(&path);
            } else {
                next.insert(path, types);
            }
            next
        }
        None => prev.clone(),
    }
}
