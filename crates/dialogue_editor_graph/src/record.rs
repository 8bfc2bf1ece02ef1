// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flat, persisted description of a dialogue graph.
//!
//! [`DialogueContainer`] is what gets written to disk and what the runtime
//! walks. It never refers back into the live editing graph; nodes and ports
//! are cross-referenced purely by id.
//!
//! Containers written by older builds may still carry an `input_guid` on
//! their ports. That field is ignored on read and never written back;
//! [`PortRecord::output_guid`] is the only connection target.

use crate::language::{LanguageTable, LanguageTag};
use crate::node::NodeId;
use crate::port::PortId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Reference to a portrait image asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(pub String);

/// Reference to an audio clip asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioRef(pub String);

/// Key of a dialogue event handler
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRef(pub String);

impl EventRef {
    /// Create an event reference from a key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The event key
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AudioRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of the dialogue box the portrait is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PortraitSide {
    /// Left of the text box
    #[default]
    Left,
    /// Right of the text box
    Right,
}

/// What happens when playback reaches an end node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EndKind {
    /// Close the dialogue
    #[default]
    End,
    /// Show the current dialogue node again
    Repeat,
    /// Show the previously visited dialogue node
    GoBack,
    /// Follow the start node's link again
    ReturnToStart,
}

/// Entry point of a dialogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartNodeRecord {
    /// Node identity
    pub node_id: NodeId,
    /// Position in the editor
    #[serde(default)]
    pub position: [f32; 2],
}

/// A line of dialogue with its choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNodeRecord {
    /// Node identity
    pub node_id: NodeId,
    /// Position in the editor
    #[serde(default)]
    pub position: [f32; 2],
    /// Speaker shown above the text
    #[serde(default)]
    pub speaker_name: String,
    /// Speaker portrait
    #[serde(default)]
    pub portrait: Option<ImageRef>,
    /// Portrait placement
    #[serde(default)]
    pub portrait_side: PortraitSide,
    /// Localized body text
    #[serde(default)]
    pub text: LanguageTable<String>,
    /// Localized voice clip
    #[serde(default)]
    pub audio: LanguageTable<Option<AudioRef>>,
    /// Choices, in display order
    #[serde(default)]
    pub ports: Vec<PortRecord>,
}

/// A callback fired when playback passes through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventNodeRecord {
    /// Node identity
    pub node_id: NodeId,
    /// Position in the editor
    #[serde(default)]
    pub position: [f32; 2],
    /// Event to fire, if one is bound
    #[serde(default)]
    pub event: Option<EventRef>,
}

/// Terminal or redirecting node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndNodeRecord {
    /// Node identity
    pub node_id: NodeId,
    /// Position in the editor
    #[serde(default)]
    pub position: [f32; 2],
    /// Behavior on arrival
    #[serde(default)]
    pub end_kind: EndKind,
}

/// One choice of a dialogue node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortRecord {
    /// Stable choice identity, also the identity of the live output port
    pub port_id: PortId,
    /// Secondary identity, kept for spreadsheets keyed by it
    #[serde(default = "PortId::nil")]
    pub port_guid: PortId,
    /// Correlates the choice with its editing field; meaningless outside the editor
    #[serde(default = "PortId::nil")]
    pub text_field_id: PortId,
    /// Node reached when this choice is taken; `None` is a dead end
    #[serde(default)]
    pub output_guid: Option<NodeId>,
    /// Localized choice label
    #[serde(default)]
    pub labels: LanguageTable<String>,
}

/// A persisted edge between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Node the edge leaves
    pub source: NodeId,
    /// Node the edge enters
    pub target: NodeId,
}

/// Borrowed view of any node record
#[derive(Debug, Clone, Copy)]
pub enum NodeRecordRef<'a> {
    /// Start node
    Start(&'a StartNodeRecord),
    /// Dialogue node
    Dialogue(&'a DialogueNodeRecord),
    /// Event node
    Event(&'a EventNodeRecord),
    /// End node
    End(&'a EndNodeRecord),
}

impl<'a> NodeRecordRef<'a> {
    /// Node identity
    pub fn id(&self) -> NodeId {
        match self {
            NodeRecordRef::Start(r) => r.node_id,
            NodeRecordRef::Dialogue(r) => r.node_id,
            NodeRecordRef::Event(r) => r.node_id,
            NodeRecordRef::End(r) => r.node_id,
        }
    }

    /// Position in the editor
    pub fn position(&self) -> [f32; 2] {
        match self {
            NodeRecordRef::Start(r) => r.position,
            NodeRecordRef::Dialogue(r) => r.position,
            NodeRecordRef::Event(r) => r.position,
            NodeRecordRef::End(r) => r.position,
        }
    }

    /// Kind name for logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeRecordRef::Start(_) => "Start",
            NodeRecordRef::Dialogue(_) => "Dialogue",
            NodeRecordRef::Event(_) => "Event",
            NodeRecordRef::End(_) => "End",
        }
    }
}

/// Structural problem found by [`DialogueContainer::validate`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    /// The container needs exactly one start node
    #[error("Expected exactly one start node, found {0}")]
    StartNodeCount(usize),

    /// Two records share a node id
    #[error("Duplicate node id {0}")]
    DuplicateNodeId(NodeId),

    /// A choice has the empty id
    #[error("Node {node} has a choice with an empty port id")]
    EmptyPortId {
        /// Owning node
        node: NodeId,
    },

    /// A port id is used more than once
    #[error("Port id {port} on node {node} is not unique")]
    DuplicatePortId {
        /// Node holding the repeated port
        node: NodeId,
        /// Repeated port id
        port: PortId,
    },

    /// A link endpoint names no node
    #[error("Link {from} -> {target} refers to a missing node")]
    DanglingLink {
        /// Link source
        from: NodeId,
        /// Link target
        target: NodeId,
    },

    /// A choice leads to a node that does not exist
    #[error("Choice {port} on node {node} leads to missing node {target}")]
    DanglingChoice {
        /// Owning node
        node: NodeId,
        /// Choice
        port: PortId,
        /// Missing target
        target: NodeId,
    },

    /// A localized table lacks entries for some tags
    #[error("Node {node} has an incomplete {field} table")]
    IncompleteLanguageTable {
        /// Owning node
        node: NodeId,
        /// Which table
        field: &'static str,
    },
}

/// All records of one dialogue
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DialogueContainer {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Edges between nodes
    #[serde(default)]
    pub links: Vec<LinkRecord>,
    /// Start nodes (exactly one in a valid container)
    #[serde(default)]
    pub start_nodes: Vec<StartNodeRecord>,
    /// Dialogue nodes
    #[serde(default)]
    pub dialogue_nodes: Vec<DialogueNodeRecord>,
    /// Event nodes
    #[serde(default)]
    pub event_nodes: Vec<EventNodeRecord>,
    /// End nodes
    #[serde(default)]
    pub end_nodes: Vec<EndNodeRecord>,
}

impl DialogueContainer {
    /// Create an empty container
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Remove every node and link
    pub fn clear(&mut self) {
        self.links.clear();
        self.start_nodes.clear();
        self.dialogue_nodes.clear();
        self.event_nodes.clear();
        self.end_nodes.clear();
    }

    /// All node records: start, dialogue, event, then end
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeRecordRef<'_>> {
        self.start_nodes
            .iter()
            .map(NodeRecordRef::Start)
            .chain(self.dialogue_nodes.iter().map(NodeRecordRef::Dialogue))
            .chain(self.event_nodes.iter().map(NodeRecordRef::Event))
            .chain(self.end_nodes.iter().map(NodeRecordRef::End))
    }

    /// Total number of node records
    pub fn node_count(&self) -> usize {
        self.start_nodes.len()
            + self.dialogue_nodes.len()
            + self.event_nodes.len()
            + self.end_nodes.len()
    }

    /// Find any node record by id
    pub fn node(&self, id: NodeId) -> Option<NodeRecordRef<'_>> {
        self.all_nodes().find(|node| node.id() == id)
    }

    /// Find a dialogue node record by id
    pub fn dialogue_node(&self, id: NodeId) -> Option<&DialogueNodeRecord> {
        self.dialogue_nodes.iter().find(|node| node.node_id == id)
    }

    /// Find a mutable dialogue node record by id
    pub fn dialogue_node_mut(&mut self, id: NodeId) -> Option<&mut DialogueNodeRecord> {
        self.dialogue_nodes.iter_mut().find(|node| node.node_id == id)
    }

    /// Links leaving a node, in stored order
    pub fn links_from(&self, source: NodeId) -> impl Iterator<Item = &LinkRecord> {
        self.links.iter().filter(move |link| link.source == source)
    }

    /// The single-successor link of a node (the first one stored)
    pub fn link_from(&self, source: NodeId) -> Option<&LinkRecord> {
        self.links_from(source).next()
    }

    /// Resolve the node reached over a node's first link
    pub fn next_node(&self, source: NodeId) -> Option<NodeRecordRef<'_>> {
        self.link_from(source).and_then(|link| self.node(link.target))
    }

    /// Find a choice and its owning node by port id
    pub fn port(&self, port_id: PortId) -> Option<(&DialogueNodeRecord, &PortRecord)> {
        self.dialogue_nodes.iter().find_map(|node| {
            node.ports
                .iter()
                .find(|port| port.port_id == port_id)
                .map(|port| (node, port))
        })
    }

    /// Reconcile every localized table with `tags`
    pub fn ensure_languages(&mut self, tags: &[LanguageTag]) {
        for node in &mut self.dialogue_nodes {
            node.text.ensure_complete(tags);
            node.audio.ensure_complete(tags);
            for port in &mut node.ports {
                port.labels.ensure_complete(tags);
            }
        }
    }

    /// Check structural invariants, returning every problem found
    pub fn validate(&self, tags: &[LanguageTag]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.start_nodes.len() != 1 {
            issues.push(ValidationIssue::StartNodeCount(self.start_nodes.len()));
        }

        let mut node_ids = HashSet::new();
        for node in self.all_nodes() {
            if !node_ids.insert(node.id()) {
                issues.push(ValidationIssue::DuplicateNodeId(node.id()));
            }
        }

        let mut port_owners: HashMap<PortId, NodeId> = HashMap::new();
        for node in &self.dialogue_nodes {
            if !node.text.is_complete(tags) {
                issues.push(ValidationIssue::IncompleteLanguageTable {
                    node: node.node_id,
                    field: "text",
                });
            }
            if !node.audio.is_complete(tags) {
                issues.push(ValidationIssue::IncompleteLanguageTable {
                    node: node.node_id,
                    field: "audio",
                });
            }

            for port in &node.ports {
                if port.port_id.is_nil() {
                    issues.push(ValidationIssue::EmptyPortId { node: node.node_id });
                } else if port_owners.insert(port.port_id, node.node_id).is_some() {
                    issues.push(ValidationIssue::DuplicatePortId {
                        node: node.node_id,
                        port: port.port_id,
                    });
                }

                if let Some(target) = port.output_guid {
                    if !node_ids.contains(&target) {
                        issues.push(ValidationIssue::DanglingChoice {
                            node: node.node_id,
                            port: port.port_id,
                            target,
                        });
                    }
                }

                if !port.labels.is_complete(tags) {
                    issues.push(ValidationIssue::IncompleteLanguageTable {
                        node: node.node_id,
                        field: "label",
                    });
                }
            }
        }

        for link in &self.links {
            if !node_ids.contains(&link.source) || !node_ids.contains(&link.target) {
                issues.push(ValidationIssue::DanglingLink {
                    from: link.source,
                    target: link.target,
                });
            }
        }

        issues
    }
}
