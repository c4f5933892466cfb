//! Programming-invariant faults.
//!
//! Distinct from validation errors: a `Fault` means the caller's action was
//! malformed relative to the project snapshot (a contract violation), so the
//! whole pass aborts with a diagnostic instead of producing an error report.

use thiserror::Error;

use crate::project::types::PatchPath;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("action references patch '{patch_path}' which is missing from the project")]
    PatchNotFound { patch_path: PatchPath },
}
