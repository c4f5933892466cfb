//! Patch path conventions: locality, marker paths, terminal paths.
//!
//! A path starting with `@/` is local to the project; anything else is a
//! library path of the form `lib-name/patch-name`. Marker patches live under
//! `core/patch-nodes/`.

use super::types::{Direction, PatchPath, PinType};

pub const LOCAL_PREFIX: &str = "@/";
pub const PATCH_NODES_LIB: &str = "core/patch-nodes";

pub const ABSTRACT_MARKER_PATH: &str = "core/patch-nodes/abstract";
pub const OUTPUT_SELF_PATH: &str = "core/patch-nodes/output-self";

const VARIADIC_PATHS: [&str; 3] = [
    "core/patch-nodes/variadic-1",
    "core/patch-nodes/variadic-2",
    "core/patch-nodes/variadic-3",
];

pub fn is_path_local(path: &str) -> bool {
    path.starts_with(LOCAL_PREFIX)
}

pub fn is_variadic_path(path: &str) -> bool {
    VARIADIC_PATHS.contains(&path)
}

/// Arity step encoded in a variadic marker path (`variadic-2` → 2).
pub fn arity_step_from_path(path: &str) -> Option<usize> {
    if !is_variadic_path(path) {
        return None;
    }
    path.rsplit('-').next()?.parse().ok()
}

/// `core/patch-nodes/input-number` → `(Input, Number)`, and the `output-*`
/// counterparts. `output-self` is not a typed terminal and yields `None`.
pub fn terminal_pin(path: &str) -> Option<(Direction, PinType)> {
    let name = path.strip_prefix(PATCH_NODES_LIB)?.strip_prefix('/')?;
    let (direction, type_name) = if let Some(t) = name.strip_prefix("input-") {
        (Direction::Input, t)
    } else if let Some(t) = name.strip_prefix("output-") {
        (Direction::Output, t)
    } else {
        return None;
    };

    let pin_type = match type_name {
        "boolean" => PinType::Boolean,
        "number" => PinType::Number,
        "string" => PinType::String,
        "byte" => PinType::Byte,
        "pulse" => PinType::Pulse,
        "t1" => PinType::Generic1,
        "t2" => PinType::Generic2,
        "t3" => PinType::Generic3,
        _ => return None,
    };
    Some((direction, pin_type))
}

pub fn is_terminal_patch_path(path: &str) -> bool {
    terminal_pin(path).is_some()
}

pub fn is_terminal_self(path: &str) -> bool {
    path == OUTPUT_SELF_PATH
}

/// Library a path belongs to (`acme-lib/foo` → `acme-lib`). Local and
/// single-segment paths have no library.
pub fn lib_name_of_path(path: &str) -> Option<&str> {
    if is_path_local(path) {
        return None;
    }
    path.rsplit_once('/').map(|(lib, _)| lib)
}

/// Strips an `@version` suffix from an installed library name
/// (`acme-lib@1.2.0` → `acme-lib`).
pub fn strip_version(lib_name: &str) -> &str {
    lib_name.split_once('@').map_or(lib_name, |(name, _)| name)
}

pub fn terminal_path(direction: Direction, pin_type: PinType) -> PatchPath {
    let dir = match direction {
        Direction::Input => "input",
        Direction::Output => "output",
    };
    let type_name = match pin_type {
        PinType::Boolean => "boolean",
        PinType::Number => "number",
        PinType::String => "string",
        PinType::Byte => "byte",
        PinType::Pulse => "pulse",
        PinType::Generic1 => "t1",
        PinType::Generic2 => "t2",
        PinType::Generic3 => "t3",
    };
    format!("{PATCH_NODES_LIB}/{dir}-{type_name}")
}
