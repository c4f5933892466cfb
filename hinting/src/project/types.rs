//! Core project model: patches, nodes, pins, links.
//!
//! These types are the serde target for the editor's project JSON. The engine
//! treats a `Project` as an immutable snapshot — every validation pass reads it,
//! none mutates it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type PatchPath = String;
pub type NodeId = String;
pub type LinkId = String;
pub type PinKey = String;

/// Static pin types. `Generic1..Generic3` are the polymorphic markers that the
/// deduction engine resolves to concrete types through link topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinType {
    Boolean,
    Number,
    String,
    Byte,
    Pulse,
    #[serde(rename = "t1")]
    Generic1,
    #[serde(rename = "t2")]
    Generic2,
    #[serde(rename = "t3")]
    Generic3,
}

impl PinType {
    pub fn is_generic(self) -> bool {
        matches!(self, PinType::Generic1 | PinType::Generic2 | PinType::Generic3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

/// An interface pin of a patch. When the patch is instanced as a node, these
/// pins become the node's pins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub key: PinKey,
    pub pin_type: PinType,
    pub direction: Direction,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    /// A `PatchPath` — instancing a node dereferences to the patch it names.
    pub node_type: PatchPath,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Literal values bound directly to pins, keyed by pin key.
    #[serde(default)]
    pub bound_literals: BTreeMap<PinKey, String>,
    #[serde(default)]
    pub position: Position,
}

/// One endpoint of a link: a pin on a concrete node instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRef {
    pub node_id: NodeId,
    pub pin_key: PinKey,
}

/// Connects an output pin of one node to an input pin of another node within
/// the same patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: LinkId,
    pub output: PinRef,
    pub input: PinRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    pub path: PatchPath,
    #[serde(default)]
    pub nodes: BTreeMap<NodeId, Node>,
    #[serde(default)]
    pub links: BTreeMap<LinkId, Link>,
    /// The patch's interface pins, derived from its terminal nodes by the
    /// graph layer. Stored denormalized so the engine can query them directly.
    #[serde(default)]
    pub pins: BTreeMap<PinKey, Pin>,
    #[serde(default)]
    pub description: String,
    /// Source of a native implementation, for patches not built out of nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_impl: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub patches: BTreeMap<PatchPath, Patch>,
}
