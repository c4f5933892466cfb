use std::collections::BTreeMap;

use hinting::project::paths::terminal_path;
use hinting::project::types::*;

// =============================================================================
// Project builders
// =============================================================================

pub fn project(patches: Vec<Patch>) -> Project {
    Project {
        patches: patches.into_iter().map(|p| (p.path.clone(), p)).collect(),
    }
}

pub fn patch(path: &str, nodes: Vec<Node>, links: Vec<Link>, pins: Vec<Pin>) -> Patch {
    Patch {
        path: path.into(),
        nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        links: links.into_iter().map(|l| (l.id.clone(), l)).collect(),
        pins: pins.into_iter().map(|p| (p.key.clone(), p)).collect(),
        description: String::new(),
        native_impl: None,
    }
}

pub fn native_patch(path: &str, pins: Vec<Pin>) -> Patch {
    let mut p = patch(path, vec![], vec![], pins);
    p.native_impl = Some("// native".into());
    p
}

// =============================================================================
// Node / pin / link builders
// =============================================================================

pub fn node(id: &str, node_type: &str) -> Node {
    Node {
        id: id.into(),
        node_type: node_type.into(),
        label: String::new(),
        description: String::new(),
        bound_literals: BTreeMap::new(),
        position: Position::default(),
    }
}

pub fn labeled_node(id: &str, node_type: &str, label: &str) -> Node {
    let mut n = node(id, node_type);
    n.label = label.into();
    n
}

pub fn bound_node(id: &str, node_type: &str, bindings: Vec<(&str, &str)>) -> Node {
    let mut n = node(id, node_type);
    n.bound_literals = bindings
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    n
}

pub fn terminal_node(id: &str, direction: Direction, pin_type: PinType) -> Node {
    node(id, &terminal_path(direction, pin_type))
}

pub fn pin(key: &str, pin_type: PinType, direction: Direction, order: u32) -> Pin {
    Pin {
        key: key.into(),
        pin_type,
        direction,
        label: String::new(),
        order,
    }
}

pub fn link(id: &str, from: (&str, &str), to: (&str, &str)) -> Link {
    Link {
        id: id.into(),
        output: PinRef {
            node_id: from.0.into(),
            pin_key: from.1.into(),
        },
        input: PinRef {
            node_id: to.0.into(),
            pin_key: to.1.into(),
        },
    }
}

// =============================================================================
// Common library patches
// =============================================================================

/// A polymorphic pass-through: one generic input `in`, one generic output `out`.
pub fn poly_patch(path: &str) -> Patch {
    native_patch(
        path,
        vec![
            pin("in", PinType::Generic1, Direction::Input, 0),
            pin("out", PinType::Generic1, Direction::Output, 1),
        ],
    )
}

/// A constant number source: single output `val`.
pub fn const_number_patch(path: &str) -> Patch {
    native_patch(path, vec![pin("val", PinType::Number, Direction::Output, 0)])
}

/// A string sink: single input `str`.
pub fn string_sink_patch(path: &str) -> Patch {
    native_patch(path, vec![pin("str", PinType::String, Direction::Input, 0)])
}
