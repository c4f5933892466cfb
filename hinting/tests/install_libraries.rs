//! Library installation: dead references heal, fresh library errors surface.

mod helpers;

use helpers::*;
use hinting::actions::Action;
use hinting::deduce::AllDeducedTypes;
use hinting::project::types::{Direction, PinType};
use hinting::report::{ErrorIndex, ErrorKind};
use hinting::scope::validate_project;

fn no_deduced() -> AllDeducedTypes {
    AllDeducedTypes::new()
}

/// A local patch referencing `acme-lib/foo` before the library exists.
fn project_before_install() -> hinting::project::types::Project {
    project(vec![patch(
        "@/x",
        vec![node("n1", "acme-lib/foo")],
        vec![],
        vec![],
    )])
}

#[test]
fn installing_a_library_heals_dead_references() {
    let before = project_before_install();
    let prev = validate_project(
        &Action::ProjectOpen,
        &before,
        &no_deduced(),
        &ErrorIndex::new(),
    )
    .unwrap();
    assert_eq!(
        prev["@/x"].nodes["n1"].errors[&ErrorKind::DeadReference][0].code,
        "DEAD_REFERENCE__PATCH_FOR_NODE_NOT_FOUND"
    );

    // The snapshot after installation contains the once-missing patch.
    let after = project(vec![
        patch("@/x", vec![node("n1", "acme-lib/foo")], vec![], vec![]),
        const_number_patch("acme-lib/foo"),
    ]);
    let action = Action::InstallLibrariesComplete {
        lib_names: vec!["acme-lib@1.2.0".into()],
    };

    let next = validate_project(&action, &after, &no_deduced(), &prev).unwrap();
    assert!(
        !next.contains_key("@/x"),
        "the healed patch must disappear from the index"
    );
}

#[test]
fn installed_library_errors_surface_immediately() {
    let prev = ErrorIndex::new();
    // The freshly installed library ships a broken variadic patch.
    let broken_lib = patch(
        "acme-lib/bad-variadic",
        vec![
            node("m1", "core/patch-nodes/variadic-1"),
            node("m2", "core/patch-nodes/variadic-2"),
        ],
        vec![],
        vec![
            pin("a", PinType::Number, Direction::Input, 0),
            pin("b", PinType::Number, Direction::Input, 1),
            pin("out", PinType::Number, Direction::Output, 2),
        ],
    );
    let after = project(vec![patch("@/main", vec![], vec![], vec![]), broken_lib]);
    let action = Action::InstallLibrariesComplete {
        lib_names: vec!["acme-lib@1.2.0".into()],
    };

    let next = validate_project(&action, &after, &no_deduced(), &prev).unwrap();
    let markers = &next["acme-lib/bad-variadic"].nodes;
    for marker in ["m1", "m2"] {
        assert_eq!(
            markers[marker].errors[&ErrorKind::Variadics][0].code,
            "TOO_MANY_VARIADIC_MARKERS"
        );
    }
}

#[test]
fn unrelated_errors_survive_installation() {
    // @/y has a bad bound literal unrelated to the installed library. Its
    // entry was recorded before, is rechecked, and stays.
    let lib = native_patch(
        "num-lib/in",
        vec![pin("num", PinType::Number, Direction::Input, 0)],
    );
    let before = project(vec![
        patch(
            "@/y",
            vec![bound_node("n1", "num-lib/in", vec![("num", "oops")])],
            vec![],
            vec![],
        ),
        lib.clone(),
    ]);
    let prev = validate_project(
        &Action::ProjectOpen,
        &before,
        &no_deduced(),
        &ErrorIndex::new(),
    )
    .unwrap();
    assert!(prev.contains_key("@/y"));

    let after = project(vec![
        patch(
            "@/y",
            vec![bound_node("n1", "num-lib/in", vec![("num", "oops")])],
            vec![],
            vec![],
        ),
        lib,
        const_number_patch("acme-lib/foo"),
    ]);
    let action = Action::InstallLibrariesComplete {
        lib_names: vec!["acme-lib@1.2.0".into()],
    };

    let next = validate_project(&action, &after, &no_deduced(), &prev).unwrap();
    let pin_errors = &next["@/y"].nodes["n1"].pins["num"].errors[&ErrorKind::BoundValues];
    assert_eq!(pin_errors[0].code, "BAD_LITERAL_VALUE");
}
