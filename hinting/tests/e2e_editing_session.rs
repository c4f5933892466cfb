//! End-to-end editing session: parse a project snapshot, run the gates,
//! deduce types, validate, then fix the project and watch the index clear.

use std::collections::BTreeMap;

use hinting::actions::Action;
use hinting::deduce::{deduce_pin_types_for_project, shall_deduce_types};
use hinting::project::types::{PinType, Project};
use hinting::report::ErrorKind;
use hinting::scope::{shall_validate, validate_project};

#[test]
fn open_deduce_validate_then_fix() {
    let project: Project =
        serde_json::from_str(include_str!("fixtures/editing_session.json")).unwrap();
    let open: Action = serde_json::from_str(r#"{"type":"PROJECT_OPEN"}"#).unwrap();

    assert!(shall_validate(&open, &project));
    assert!(shall_deduce_types(&open));

    let deduced = deduce_pin_types_for_project(&project, &open, &BTreeMap::new());
    assert_eq!(deduced["@/main"]["tail"]["out"], PinType::Number);

    let index = validate_project(&open, &project, &deduced, &BTreeMap::new()).unwrap();
    let ghost = &index["@/main"].nodes["ghost"].errors[&ErrorKind::DeadReference];
    assert_eq!(ghost[0].code, "DEAD_REFERENCE__PATCH_FOR_NODE_NOT_FOUND");
    // The linked chain itself is healthy.
    assert!(index["@/main"].links["l1"].errors[&ErrorKind::LinkTypes].is_empty());

    // The user deletes the dead node; the editor sends the bulk delete.
    let mut fixed = project.clone();
    fixed
        .patches
        .get_mut("@/main")
        .unwrap()
        .nodes
        .remove("ghost");
    let delete: Action = serde_json::from_str(
        r#"{"type":"BULK_DELETE_ENTITIES","payload":{"patchPath":"@/main","nodeIds":["ghost"]}}"#,
    )
    .unwrap();

    assert!(shall_validate(&delete, &fixed));
    let deduced = deduce_pin_types_for_project(&fixed, &delete, &deduced);
    let index = validate_project(&delete, &fixed, &deduced, &index).unwrap();
    assert!(index.is_empty(), "fixed project must leave an empty index");
}
