//! Built-in pin-level check: literals bound to node pins must fit the pin type.

use std::collections::BTreeMap;

use crate::project::rules::get_invalid_bound_node_pins;
use crate::project::types::{Node, Patch, PinKey, Project};
use crate::report::{ErrorIndex, ErrorKind, ErrorsByType};

pub fn bound_value_errors(
    patch: &Patch,
    project: &Project,
    node: &Node,
    _prev: &ErrorIndex,
) -> BTreeMap<PinKey, ErrorsByType> {
    get_invalid_bound_node_pins(project, patch, node)
        .into_iter()
        .map(|(pin_key, err)| {
            (
                pin_key,
                BTreeMap::from([(ErrorKind::BoundValues, vec![err])]),
            )
        })
        .collect()
}
