//! Structural patch rules: variadics, abstract/constructor markers, terminal
//! labels, link pin compatibility, bound literals.
//!
//! Every rule returns `Result<(), ValidationError>` (or a map of offenders) —
//! expected invalid input is data, never a panic.

use std::collections::{BTreeMap, BTreeSet};

use super::paths;
use super::queries::pins_for_node;
use super::types::{Direction, Link, Node, Patch, Pin, PinKey, PinType, Project};
use crate::deduce::DeducedPinTypes;
use crate::report::ValidationError;

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

const PULSE_LITERALS: [&str; 3] = ["Never", "Continuously", "On Boot"];

fn is_byte_literal(value: &str) -> bool {
    if let Some(dec) = value.strip_suffix('d') {
        return dec.parse::<u8>().is_ok();
    }
    if let Some(hex) = value.strip_suffix('h') {
        return !hex.is_empty() && hex.len() <= 2 && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if let Some(bin) = value.strip_suffix('b') {
        return bin.len() == 8 && bin.chars().all(|c| c == '0' || c == '1');
    }
    value.len() == 3 && value.starts_with('\'') && value.ends_with('\'')
}

/// Is `value` a legal literal for a pin of the given type? Generic pins accept
/// anything — until deduction resolves them there is nothing to check against.
pub fn is_valid_literal(pin_type: PinType, value: &str) -> bool {
    match pin_type {
        PinType::Boolean => value == "true" || value == "false",
        PinType::Number => value.parse::<f64>().is_ok(),
        PinType::String => value.len() >= 2 && value.starts_with('"') && value.ends_with('"'),
        PinType::Byte => is_byte_literal(value),
        PinType::Pulse => PULSE_LITERALS.contains(&value),
        PinType::Generic1 | PinType::Generic2 | PinType::Generic3 => true,
    }
}

/// The concrete type a bound literal spells, if it unambiguously spells one.
/// Used to seed deduction from literals bound to generic pins.
pub fn infer_literal_type(value: &str) -> Option<PinType> {
    if value == "true" || value == "false" {
        return Some(PinType::Boolean);
    }
    if value.parse::<f64>().is_ok() {
        return Some(PinType::Number);
    }
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return Some(PinType::String);
    }
    if is_byte_literal(value) {
        return Some(PinType::Byte);
    }
    if PULSE_LITERALS.contains(&value) {
        return Some(PinType::Pulse);
    }
    None
}

// ---------------------------------------------------------------------------
// Pin type compatibility
// ---------------------------------------------------------------------------

/// Implicit casts allowed on a link, besides identity: boolean↔number,
/// byte→number, and anything but pulse widens to string.
pub fn can_cast_types(from: PinType, to: PinType) -> bool {
    if from == to {
        return true;
    }
    matches!(
        (from, to),
        (PinType::Boolean, PinType::Number)
            | (PinType::Number, PinType::Boolean)
            | (PinType::Byte, PinType::Number)
            | (PinType::Boolean, PinType::String)
            | (PinType::Number, PinType::String)
            | (PinType::Byte, PinType::String)
    )
}

// ---------------------------------------------------------------------------
// Variadics
// ---------------------------------------------------------------------------

fn sorted_pins(patch: &Patch, direction: Direction) -> Vec<&Pin> {
    let mut pins: Vec<&Pin> = patch
        .pins
        .values()
        .filter(|p| p.direction == direction)
        .collect();
    pins.sort_by(|a, b| (a.order, &a.key).cmp(&(b.order, &b.key)));
    pins
}

/// A variadic patch needs exactly one marker, at least one output, and enough
/// inputs for `arity_step` value pins plus one accumulator pin per output; the
/// accumulator pins' types must mirror the output types.
pub fn validate_patch_for_variadics(patch: &Patch) -> Result<(), ValidationError> {
    let markers: Vec<&Node> = patch
        .nodes
        .values()
        .filter(|n| paths::is_variadic_path(&n.node_type))
        .collect();

    let [marker] = markers.as_slice() else {
        return Err(ValidationError::new(
            "TOO_MANY_VARIADIC_MARKERS",
            format!(
                "Patch '{}' must have exactly one variadic marker, found {}",
                patch.path,
                markers.len()
            ),
        ));
    };

    // Marker paths are validated before arity extraction, so this cannot miss.
    let arity_step = paths::arity_step_from_path(&marker.node_type).unwrap_or(1);

    let outputs = sorted_pins(patch, Direction::Output);
    if outputs.is_empty() {
        return Err(ValidationError::new(
            "VARIADIC_HAS_NO_OUTPUTS",
            format!("Variadic patch '{}' must have at least one output", patch.path),
        ));
    }

    let inputs = sorted_pins(patch, Direction::Input);
    if inputs.len() < arity_step + outputs.len() {
        return Err(ValidationError::new(
            "NOT_ENOUGH_VARIADIC_INPUTS",
            format!(
                "Variadic patch '{}' with arity step {} needs at least {} inputs, found {}",
                patch.path,
                arity_step,
                arity_step + outputs.len(),
                inputs.len()
            ),
        ));
    }

    // The last `arity_step` inputs are the value pins; the accumulator pins
    // sit right before them and must mirror the outputs.
    let acc_start = inputs.len() - arity_step - outputs.len();
    let acc_pins = &inputs[acc_start..inputs.len() - arity_step];
    for (acc, out) in acc_pins.iter().zip(outputs.iter()) {
        if acc.pin_type != out.pin_type {
            return Err(ValidationError::new(
                "WRONG_VARIADIC_PIN_TYPES",
                format!(
                    "Accumulator pin '{}' of patch '{}' must have the same type as output '{}'",
                    acc.key, patch.path, out.key
                ),
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Abstract patches
// ---------------------------------------------------------------------------

fn generic_types(pins: &[&Pin]) -> BTreeSet<PinType> {
    pins.iter()
        .map(|p| p.pin_type)
        .filter(|t| t.is_generic())
        .collect()
}

/// An abstract patch must take at least one generic input, and every generic
/// appearing on an output must be resolvable from some input.
pub fn validate_abstract_patch(patch: &Patch) -> Result<(), ValidationError> {
    let inputs = sorted_pins(patch, Direction::Input);
    let input_generics = generic_types(&inputs);
    if input_generics.is_empty() {
        return Err(ValidationError::new(
            "ABSTRACT_PATCH_WITHOUT_GENERIC_INPUTS",
            format!(
                "Abstract patch '{}' must have at least one generic input pin",
                patch.path
            ),
        ));
    }

    let outputs = sorted_pins(patch, Direction::Output);
    for generic in generic_types(&outputs) {
        if !input_generics.contains(&generic) {
            return Err(ValidationError::new(
                "ORPHAN_GENERIC_OUTPUTS",
                format!(
                    "Abstract patch '{}' has a generic output type not present on any input",
                    patch.path
                ),
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Constructor patches
// ---------------------------------------------------------------------------

/// An `output-self` marker turns a patch into a constructor for its own type;
/// that only makes sense for natively implemented patches with an output.
pub fn validate_constructor_patch(patch: &Patch) -> Result<(), ValidationError> {
    if patch.native_impl.is_none() {
        return Err(ValidationError::new(
            "CONSTRUCTOR_PATCH_WITHOUT_IMPLEMENTATION",
            format!(
                "Constructor patch '{}' must have a native implementation",
                patch.path
            ),
        ));
    }
    if sorted_pins(patch, Direction::Output).is_empty() {
        return Err(ValidationError::new(
            "CONSTRUCTOR_PATCH_WITHOUT_OUTPUTS",
            format!("Constructor patch '{}' must have at least one output", patch.path),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Terminal pin labels
// ---------------------------------------------------------------------------

fn is_well_formed_label(label: &str) -> bool {
    let mut chars = label.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Labels of terminal nodes become pin labels of the patch; they must be
/// well-formed identifiers and unique per direction. The failure carries the
/// offending terminal node ids in `pin_keys`.
pub fn validate_pin_labels(patch: &Patch) -> Result<(), ValidationError> {
    let mut malformed: Vec<String> = Vec::new();
    let mut by_label: BTreeMap<(Direction, &str), Vec<&str>> = BTreeMap::new();

    for node in patch.nodes.values() {
        let Some((direction, _)) = paths::terminal_pin(&node.node_type) else {
            continue;
        };
        if node.label.is_empty() {
            continue; // unlabeled terminals get generated labels downstream
        }
        if !is_well_formed_label(&node.label) {
            malformed.push(node.id.clone());
            continue;
        }
        by_label
            .entry((direction, node.label.as_str()))
            .or_default()
            .push(&node.id);
    }

    if !malformed.is_empty() {
        let mut err = ValidationError::new(
            "MALFORMED_PIN_LABELS",
            format!("Patch '{}' has malformed terminal pin labels", patch.path),
        );
        err.pin_keys = malformed;
        return Err(err);
    }

    let duplicated: Vec<String> = by_label
        .into_values()
        .filter(|ids| ids.len() > 1)
        .flatten()
        .map(String::from)
        .collect();
    if !duplicated.is_empty() {
        let mut err = ValidationError::new(
            "DUPLICATE_PIN_LABELS",
            format!("Patch '{}' has duplicate terminal pin labels", patch.path),
        );
        err.pin_keys = duplicated;
        return Err(err);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Link pin types
// ---------------------------------------------------------------------------

fn pin_type_at(
    node: &Node,
    pin_key: &PinKey,
    project: &Project,
    deduced: &DeducedPinTypes,
) -> Option<PinType> {
    if let Some(t) = deduced.get(&node.id).and_then(|pins| pins.get(pin_key)) {
        return Some(*t);
    }
    pins_for_node(node, project)?.get(pin_key).map(|p| p.pin_type)
}

/// Checks that a link connects compatible pin types, with deduced types
/// overriding declared ones. Unresolvable endpoints are skipped here — the
/// dead-reference check owns that failure.
pub fn validate_link_pins(
    link: &Link,
    patch: &Patch,
    project: &Project,
    deduced: &DeducedPinTypes,
) -> Result<(), ValidationError> {
    let (Some(from_node), Some(to_node)) = (
        patch.nodes.get(&link.output.node_id),
        patch.nodes.get(&link.input.node_id),
    ) else {
        return Ok(());
    };

    let (Some(from), Some(to)) = (
        pin_type_at(from_node, &link.output.pin_key, project, deduced),
        pin_type_at(to_node, &link.input.pin_key, project, deduced),
    ) else {
        return Ok(());
    };

    // A still-generic side stays compatible until deduction pins it down.
    if from.is_generic() || to.is_generic() || can_cast_types(from, to) {
        return Ok(());
    }

    Err(ValidationError::new(
        "INCOMPATIBLE_PINS__CANT_CAST_TYPES_DIRECTLY",
        format!(
            "Link '{}' in patch '{}' connects incompatible pin types {:?} -> {:?}",
            link.id, patch.path, from, to
        ),
    ))
}

// ---------------------------------------------------------------------------
// Bound literals
// ---------------------------------------------------------------------------

/// The node's bound literals that are illegal for their pin's declared type,
/// keyed by pin. Pins of an unresolvable node type cannot be checked and are
/// skipped.
pub fn get_invalid_bound_node_pins(
    project: &Project,
    _patch: &Patch,
    node: &Node,
) -> BTreeMap<PinKey, ValidationError> {
    let Some(pins) = pins_for_node(node, project) else {
        return BTreeMap::new();
    };

    node.bound_literals
        .iter()
        .filter_map(|(pin_key, literal)| {
            let pin = pins.get(pin_key)?;
            if is_valid_literal(pin.pin_type, literal) {
                return None;
            }
            Some((
                pin_key.clone(),
                ValidationError::new(
                    "BAD_LITERAL_VALUE",
                    format!(
                        "Literal '{}' bound to pin '{}' of node '{}' is not a valid {:?}",
                        literal, pin_key, node.id, pin.pin_type
                    ),
                ),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_legality() {
        assert!(is_valid_literal(PinType::Number, "3.14"));
        assert!(!is_valid_literal(PinType::Number, "abc"));
        assert!(is_valid_literal(PinType::Boolean, "true"));
        assert!(!is_valid_literal(PinType::Boolean, "yes"));
        assert!(is_valid_literal(PinType::String, "\"hi\""));
        assert!(!is_valid_literal(PinType::String, "hi"));
        assert!(is_valid_literal(PinType::Byte, "255d"));
        assert!(is_valid_literal(PinType::Byte, "ffh"));
        assert!(is_valid_literal(PinType::Byte, "00001111b"));
        assert!(is_valid_literal(PinType::Byte, "'c'"));
        assert!(!is_valid_literal(PinType::Byte, "999d"));
        assert!(is_valid_literal(PinType::Pulse, "On Boot"));
        assert!(is_valid_literal(PinType::Generic1, "anything"));
    }

    #[test]
    fn literal_type_inference() {
        assert_eq!(infer_literal_type("42"), Some(PinType::Number));
        assert_eq!(infer_literal_type("true"), Some(PinType::Boolean));
        assert_eq!(infer_literal_type("\"s\""), Some(PinType::String));
        assert_eq!(infer_literal_type("Never"), Some(PinType::Pulse));
        assert_eq!(infer_literal_type("nonsense"), None);
    }

    #[test]
    fn casts() {
        assert!(can_cast_types(PinType::Number, PinType::Number));
        assert!(can_cast_types(PinType::Boolean, PinType::Number));
        assert!(can_cast_types(PinType::Number, PinType::String));
        assert!(!can_cast_types(PinType::Pulse, PinType::String));
        assert!(!can_cast_types(PinType::String, PinType::Number));
    }

    #[test]
    fn labels_must_be_identifiers() {
        assert!(is_well_formed_label("IN1"));
        assert!(is_well_formed_label("acc_value"));
        assert!(!is_well_formed_label("1st"));
        assert!(!is_well_formed_label("bad label"));
    }
}
