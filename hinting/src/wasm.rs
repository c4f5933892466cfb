//! WASM entry points for the editor frontend.

use wasm_bindgen::prelude::*;

use crate::actions::Action;
use crate::deduce::AllDeducedTypes;
use crate::project::types::Project;
use crate::report::ErrorIndex;

fn parse<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Failed to parse {what} JSON: {e}"))
}

/// Should this action trigger validation at all?
#[wasm_bindgen]
pub fn shall_validate(action_json: &str, project_json: &str) -> JsValue {
    let result = shall_validate_inner(action_json, project_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn shall_validate_inner(action_json: &str, project_json: &str) -> GateResult {
    let action: Action = match parse(action_json, "action") {
        Ok(a) => a,
        Err(message) => return GateResult::Fault { message },
    };
    let project: Project = match parse(project_json, "project") {
        Ok(p) => p,
        Err(message) => return GateResult::Fault { message },
    };
    GateResult::Ok {
        value: crate::scope::shall_validate(&action, &project),
    }
}

/// Should this action trigger pin-type deduction?
#[wasm_bindgen]
pub fn shall_deduce_types(action_json: &str) -> JsValue {
    let result = match parse::<Action>(action_json, "action") {
        Ok(action) => GateResult::Ok {
            value: crate::deduce::shall_deduce_types(&action),
        },
        Err(message) => GateResult::Fault { message },
    };
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Full validation pass: change-scope selection, pipeline, index merge.
/// Returns `{status: "ok", errors}` or `{status: "fault", message}`.
#[wasm_bindgen]
pub fn validate_project(
    action_json: &str,
    project_json: &str,
    deduced_types_json: &str,
    prev_errors_json: &str,
) -> JsValue {
    let result = validate_project_inner(
        action_json,
        project_json,
        deduced_types_json,
        prev_errors_json,
    );
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_project_inner(
    action_json: &str,
    project_json: &str,
    deduced_types_json: &str,
    prev_errors_json: &str,
) -> ValidateResult {
    let parsed: Result<_, String> = (|| {
        let action: Action = parse(action_json, "action")?;
        let project: Project = parse(project_json, "project")?;
        let deduced: AllDeducedTypes = parse(deduced_types_json, "deduced types")?;
        let prev: ErrorIndex = parse(prev_errors_json, "previous errors")?;
        Ok((action, project, deduced, prev))
    })();
    let (action, project, deduced, prev) = match parsed {
        Ok(inputs) => inputs,
        Err(message) => return ValidateResult::Fault { message },
    };

    match crate::scope::validate_project(&action, &project, &deduced, &prev) {
        Ok(errors) => ValidateResult::Ok { errors },
        Err(fault) => ValidateResult::Fault {
            message: fault.to_string(),
        },
    }
}

/// Incremental per-patch type deduction. Returns the next full map.
#[wasm_bindgen]
pub fn deduce_pin_types_for_project(
    action_json: &str,
    project_json: &str,
    prev_deduced_json: &str,
) -> JsValue {
    let result: Result<AllDeducedTypes, String> = (|| {
        let action: Action = parse(action_json, "action")?;
        let project: Project = parse(project_json, "project")?;
        let prev: AllDeducedTypes = parse(prev_deduced_json, "previous deduced types")?;
        Ok(crate::deduce::deduce_pin_types_for_project(
            &project, &action, &prev,
        ))
    })();
    match result {
        Ok(types) => serde_wasm_bindgen::to_value(&types).unwrap_or(JsValue::NULL),
        Err(message) => {
            let fault = ValidateResult::Fault { message };
            serde_wasm_bindgen::to_value(&fault).unwrap_or(JsValue::NULL)
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

/// Envelope for the boolean gates (`shall_validate`, `shall_deduce_types`).
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum GateResult {
    #[serde(rename = "ok")]
    Ok { value: bool },
    #[serde(rename = "fault")]
    Fault { message: String },
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "status")]
enum ValidateResult {
    #[serde(rename = "ok")]
    Ok { errors: ErrorIndex },
    #[serde(rename = "fault")]
    Fault { message: String },
}
