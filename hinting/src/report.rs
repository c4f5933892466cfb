//! Nested error report model and the index it rolls up into.
//!
//! Validation errors are data, never panics: every level of the report is a
//! map from an entity id to its error collections, and the authoritative
//! `ErrorIndex` holds only patches with at least one error somewhere in their
//! subtree. Inner empty lists are allowed inside a kept entry — they mark
//! "this error kind was recomputed and came up clean", which is what lets a
//! `Merge`-policy update clear stale errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::project::types::{LinkId, NodeId, PatchPath, PinKey};

/// Which check produced an error. Keys of `ErrorsByType`; one list per kind so
/// that re-running a single check replaces only its own findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    DeadReference,
    PinLabels,
    Variadics,
    AbstractMarkers,
    ConstructorMarkers,
    BoundValues,
    LinkTypes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub code: String,
    pub message: String,
    /// For dead references: the patch path the node failed to resolve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<PatchPath>,
    /// Referencing patch paths, innermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<PatchPath>,
    /// Affected terminal node ids for pin-label failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pin_keys: Vec<String>,
}

impl ValidationError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        ValidationError {
            code: code.to_string(),
            message: message.into(),
            node_type: None,
            trace: Vec::new(),
            pin_keys: Vec::new(),
        }
    }
}

pub type ErrorsByType = BTreeMap<ErrorKind, Vec<ValidationError>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PinErrors {
    #[serde(default)]
    pub errors: ErrorsByType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LinkErrors {
    #[serde(default)]
    pub errors: ErrorsByType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NodeErrors {
    #[serde(default)]
    pub errors: ErrorsByType,
    #[serde(default)]
    pub pins: BTreeMap<PinKey, PinErrors>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PatchErrors {
    #[serde(default)]
    pub errors: ErrorsByType,
    #[serde(default)]
    pub nodes: BTreeMap<NodeId, NodeErrors>,
    #[serde(default)]
    pub links: BTreeMap<LinkId, LinkErrors>,
}

pub type ErrorIndex = BTreeMap<PatchPath, PatchErrors>;

fn errors_by_type_is_empty(errors: &ErrorsByType) -> bool {
    errors.values().all(Vec::is_empty)
}

impl PinErrors {
    pub fn is_empty(&self) -> bool {
        errors_by_type_is_empty(&self.errors)
    }
}

impl LinkErrors {
    pub fn is_empty(&self) -> bool {
        errors_by_type_is_empty(&self.errors)
    }
}

impl NodeErrors {
    pub fn is_empty(&self) -> bool {
        errors_by_type_is_empty(&self.errors) && self.pins.values().all(PinErrors::is_empty)
    }
}

impl PatchErrors {
    /// The single emptiness predicate behind index pruning: a patch has no
    /// errors iff its own list, every node (and its pins), and every link are
    /// all empty.
    pub fn is_empty(&self) -> bool {
        errors_by_type_is_empty(&self.errors)
            && self.nodes.values().all(NodeErrors::is_empty)
            && self.links.values().all(LinkErrors::is_empty)
    }
}

/// Drops patch entries whose whole subtree is empty. Applied after every
/// merge, identically for every update policy.
pub fn prune_empty_patches(index: ErrorIndex) -> ErrorIndex {
    index.into_iter().filter(|(_, e)| !e.is_empty()).collect()
}

// ---------------------------------------------------------------------------
// Deep merging
// ---------------------------------------------------------------------------

/// Structural merge of two report trees: recurse at map branches, and at the
/// error-list leaves the right side wins. A kind present on the right — even
/// with an empty list — is a recomputation of that kind and replaces the left;
/// a kind absent from the right keeps the left's findings.
pub trait DeepMerge {
    fn deep_merge(self, next: Self) -> Self;
}

impl DeepMerge for Vec<ValidationError> {
    fn deep_merge(self, next: Self) -> Self {
        next
    }
}

impl DeepMerge for PinErrors {
    fn deep_merge(self, next: Self) -> Self {
        PinErrors {
            errors: self.errors.deep_merge(next.errors),
        }
    }
}

impl DeepMerge for LinkErrors {
    fn deep_merge(self, next: Self) -> Self {
        LinkErrors {
            errors: self.errors.deep_merge(next.errors),
        }
    }
}

impl DeepMerge for NodeErrors {
    fn deep_merge(self, next: Self) -> Self {
        NodeErrors {
            errors: self.errors.deep_merge(next.errors),
            pins: self.pins.deep_merge(next.pins),
        }
    }
}

impl DeepMerge for PatchErrors {
    fn deep_merge(self, next: Self) -> Self {
        PatchErrors {
            errors: self.errors.deep_merge(next.errors),
            nodes: self.nodes.deep_merge(next.nodes),
            links: self.links.deep_merge(next.links),
        }
    }
}

impl<K: Ord, V: DeepMerge> DeepMerge for BTreeMap<K, V> {
    fn deep_merge(mut self, next: Self) -> Self {
        for (key, value) in next {
            match self.remove(&key) {
                Some(prev) => {
                    self.insert(key, prev.deep_merge(value));
                }
                None => {
                    self.insert(key, value);
                }
            }
        }
        self
    }
}

/// Additive merge used when combining outputs of several validators of the
/// same kind within one pass: per error-kind lists concatenate, so validators
/// never clobber each other.
pub fn concat_errors_by_type(mut acc: ErrorsByType, next: ErrorsByType) -> ErrorsByType {
    for (kind, mut errors) in next {
        acc.entry(kind).or_default().append(&mut errors);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(code: &str) -> ValidationError {
        ValidationError::new(code, "boom")
    }

    #[test]
    fn emptiness_sees_through_nesting() {
        let mut patch_errors = PatchErrors::default();
        assert!(patch_errors.is_empty());

        patch_errors
            .nodes
            .insert("n1".into(), NodeErrors::default());
        patch_errors
            .links
            .insert("l1".into(), LinkErrors::default());
        assert!(patch_errors.is_empty());

        patch_errors
            .nodes
            .get_mut("n1")
            .unwrap()
            .pins
            .insert("in".into(), PinErrors {
                errors: BTreeMap::from([(ErrorKind::BoundValues, vec![err("BAD_LITERAL")])]),
            });
        assert!(!patch_errors.is_empty());
    }

    #[test]
    fn deep_merge_replaces_recomputed_kinds_and_keeps_the_rest() {
        let prev = PatchErrors {
            nodes: BTreeMap::from([(
                "n1".to_string(),
                NodeErrors {
                    errors: BTreeMap::from([
                        (ErrorKind::DeadReference, vec![err("DEAD_REFERENCE")]),
                        (ErrorKind::Variadics, vec![err("TOO_MANY_MARKERS")]),
                    ]),
                    pins: BTreeMap::new(),
                },
            )]),
            ..Default::default()
        };
        let next = PatchErrors {
            nodes: BTreeMap::from([(
                "n1".to_string(),
                NodeErrors {
                    errors: BTreeMap::from([(ErrorKind::DeadReference, vec![])]),
                    pins: BTreeMap::new(),
                },
            )]),
            ..Default::default()
        };

        let merged = prev.deep_merge(next);
        let node = &merged.nodes["n1"];
        assert!(node.errors[&ErrorKind::DeadReference].is_empty());
        assert_eq!(node.errors[&ErrorKind::Variadics].len(), 1);
    }

    #[test]
    fn concat_is_additive() {
        let a = BTreeMap::from([(ErrorKind::LinkTypes, vec![err("A")])]);
        let b = BTreeMap::from([(ErrorKind::LinkTypes, vec![err("B")])]);
        let merged = concat_errors_by_type(a, b);
        let codes: Vec<_> = merged[&ErrorKind::LinkTypes]
            .iter()
            .map(|e| e.code.as_str())
            .collect();
        assert_eq!(codes, ["A", "B"]);
    }
}
