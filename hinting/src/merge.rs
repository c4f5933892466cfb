//! Error-index merger: folds one validation pass into the running index.

use serde::{Deserialize, Serialize};

use crate::report::{prune_empty_patches, DeepMerge, ErrorIndex};

/// How a pass's errors combine with the previous index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdatePolicy {
    /// The pass covered everything; its result replaces the index.
    Overwrite,
    /// The pass recomputed some error kinds; deep-merge them in, patch by
    /// patch, node by node, pin by pin.
    Merge,
    /// The pass fully revalidated some patches; replace exactly those keys.
    Assoc,
}

/// The transient outcome of one validation pass, consumed exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorsUpdate {
    pub policy: UpdatePolicy,
    pub errors: ErrorIndex,
}

/// Produce the next authoritative index. The output is freshly allocated and
/// pruned with the shared emptiness predicate, whatever the policy; patch
/// entries are added, replaced, or removed atomically.
pub fn merge_errors(prev: &ErrorIndex, update: ErrorsUpdate) -> ErrorIndex {
    let merged = match update.policy {
        UpdatePolicy::Overwrite => update.errors,
        UpdatePolicy::Merge => prev.clone().deep_merge(update.errors),
        UpdatePolicy::Assoc => {
            let mut next = prev.clone();
            for (patch_path, patch_errors) in update.errors {
                next.insert(patch_path, patch_errors);
            }
            next
        }
    };
    prune_empty_patches(merged)
}
