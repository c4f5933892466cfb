//! Built-in link-level check: pin types on both ends of a link must be
//! compatible, taking deduced types into account.

use std::collections::BTreeMap;

use crate::deduce::{AllDeducedTypes, DeducedPinTypes};
use crate::project::rules::validate_link_pins;
use crate::project::types::{Link, Patch, Project};
use crate::report::{ErrorIndex, ErrorKind, ErrorsByType};

pub fn link_type_errors(
    link: &Link,
    patch: &Patch,
    project: &Project,
    all_deduced: &AllDeducedTypes,
    _prev: &ErrorIndex,
) -> ErrorsByType {
    let fallback = DeducedPinTypes::new();
    let deduced = all_deduced.get(&patch.path).unwrap_or(&fallback);
    let errors = match validate_link_pins(link, patch, project, deduced) {
        Ok(()) => Vec::new(),
        Err(err) => vec![err],
    };
    BTreeMap::from([(ErrorKind::LinkTypes, errors)])
}
