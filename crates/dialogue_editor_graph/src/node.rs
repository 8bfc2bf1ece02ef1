// SPDX-License-Identifier: MIT OR Apache-2.0
//! Live node definitions for the editable dialogue graph.

use crate::language::{LanguageTable, LanguageTag};
use crate::port::{Port, PortId};
use crate::record::{AudioRef, EndKind, EventRef, ImageRef, PortRecord, PortraitSide};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Editable state of a dialogue node
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueContent {
    /// Speaker shown above the text
    pub speaker_name: String,
    /// Speaker portrait
    pub portrait: Option<ImageRef>,
    /// Portrait placement
    pub portrait_side: PortraitSide,
    /// Localized body text
    pub text: LanguageTable<String>,
    /// Localized voice clip
    pub audio: LanguageTable<Option<AudioRef>>,
    /// One record per choice port, in port order
    pub choices: Vec<PortRecord>,
}

impl DialogueContent {
    /// Empty content with complete language tables
    pub fn new(languages: &[LanguageTag]) -> Self {
        Self {
            speaker_name: String::new(),
            portrait: None,
            portrait_side: PortraitSide::default(),
            text: LanguageTable::complete(languages),
            audio: LanguageTable::complete(languages),
            choices: Vec::new(),
        }
    }

    /// Find a choice by its port id
    pub fn choice(&self, port_id: PortId) -> Option<&PortRecord> {
        self.choices.iter().find(|choice| choice.port_id == port_id)
    }
}

/// Kind-specific node state
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Entry point
    Start,
    /// Line of dialogue with choices
    Dialogue(DialogueContent),
    /// Pass-through callback
    Event {
        /// Bound event, if any
        event: Option<EventRef>,
    },
    /// Terminal or redirecting node
    End {
        /// Behavior on arrival
        end_kind: EndKind,
    },
}

impl NodeKind {
    /// Title shown in the node header
    pub fn title(&self) -> &'static str {
        match self {
            NodeKind::Start => "Start",
            NodeKind::Dialogue(_) => "Dialogue",
            NodeKind::Event { .. } => "Event",
            NodeKind::End { .. } => "End",
        }
    }
}

/// A node instance in the live graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique instance ID, persisted as the record's node id
    pub id: NodeId,
    /// Position in the graph UI
    pub position: [f32; 2],
    /// Input ports
    pub inputs: Vec<Port>,
    /// Output ports
    pub outputs: Vec<Port>,
    /// Kind-specific state
    pub kind: NodeKind,
}

impl Node {
    /// Create a start node with a single output
    pub fn start() -> Self {
        Self {
            id: NodeId::new(),
            position: [0.0, 0.0],
            inputs: Vec::new(),
            outputs: vec![Port::output("Output")],
            kind: NodeKind::Start,
        }
    }

    /// Create a dialogue node with no choices yet
    pub fn dialogue(languages: &[LanguageTag]) -> Self {
        Self {
            id: NodeId::new(),
            position: [0.0, 0.0],
            inputs: vec![Port::input("Input")],
            outputs: Vec::new(),
            kind: NodeKind::Dialogue(DialogueContent::new(languages)),
        }
    }

    /// Create an event node with one input and one output
    pub fn event() -> Self {
        Self {
            id: NodeId::new(),
            position: [0.0, 0.0],
            inputs: vec![Port::input("Input")],
            outputs: vec![Port::output("Output")],
            kind: NodeKind::Event { event: None },
        }
    }

    /// Create an end node
    pub fn end() -> Self {
        Self {
            id: NodeId::new(),
            position: [0.0, 0.0],
            inputs: vec![Port::input("Input")],
            outputs: Vec::new(),
            kind: NodeKind::End {
                end_kind: EndKind::End,
            },
        }
    }

    /// Set the position
    pub fn with_position(mut self, position: [f32; 2]) -> Self {
        self.position = position;
        self
    }

    /// Replace the generated id with a persisted one
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    /// Get an input port by index
    pub fn input(&self, index: usize) -> Option<&Port> {
        self.inputs.get(index)
    }

    /// Get an output port by index
    pub fn output(&self, index: usize) -> Option<&Port> {
        self.outputs.get(index)
    }

    /// Get an output port by ID
    pub fn output_by_id(&self, port_id: PortId) -> Option<&Port> {
        self.outputs.iter().find(|p| p.id == port_id)
    }

    /// Get a port by ID
    pub fn port(&self, port_id: &PortId) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id == *port_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == *port_id))
    }

    /// Dialogue state, if this is a dialogue node
    pub fn dialogue_content(&self) -> Option<&DialogueContent> {
        match &self.kind {
            NodeKind::Dialogue(content) => Some(content),
            _ => None,
        }
    }

    /// Mutable dialogue state, if this is a dialogue node
    pub fn dialogue_content_mut(&mut self) -> Option<&mut DialogueContent> {
        match &mut self.kind {
            NodeKind::Dialogue(content) => Some(content),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortDirection;

    #[test]
    fn test_port_layout_per_kind() {
        let start = Node::start();
        assert!(start.inputs.is_empty());
        assert_eq!(start.outputs.len(), 1);

        let event = Node::event();
        assert_eq!(event.inputs.len(), 1);
        assert_eq!(event.outputs.len(), 1);

        let end = Node::end();
        assert_eq!(end.inputs.len(), 1);
        assert!(end.outputs.is_empty());

        let dialogue = Node::dialogue(&LanguageTag::ALL);
        assert_eq!(dialogue.input(0).unwrap().direction, PortDirection::Input);
        assert!(dialogue.outputs.is_empty());
        let content = dialogue.dialogue_content().unwrap();
        assert!(content.text.is_complete(&LanguageTag::ALL));
        assert!(content.audio.is_complete(&LanguageTag::ALL));
    }

    #[test]
    fn test_port_lookup() {
        let node = Node::event();
        let output = node.output(0).unwrap().id;
        assert!(node.port(&output).is_some());
        assert!(node.output_by_id(output).is_some());
        assert!(node.output_by_id(node.input(0).unwrap().id).is_none());
    }
}
