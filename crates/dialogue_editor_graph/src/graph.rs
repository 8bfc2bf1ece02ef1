// SPDX-License-Identifier: MIT OR Apache-2.0
//! Live, editable dialogue graph containing nodes and connections.

use crate::connection::{Connection, ConnectionId};
use crate::language::{LanguageTable, LanguageTag};
use crate::node::{Node, NodeId, NodeKind};
use crate::port::{Port, PortCapacity, PortDirection, PortId};
use crate::record::PortRecord;
use indexmap::IndexMap;

/// Label given to every language of a freshly added choice
pub const DEFAULT_CHOICE_LABEL: &str = "Continue";

/// A dialogue graph being edited.
///
/// Nodes and connections are owned here and addressed by id; nothing outside
/// the graph holds references into it.
#[derive(Debug, Clone)]
pub struct DialogueGraph {
    /// Graph name
    pub name: String,
    /// Languages new nodes and choices are completed against
    languages: Vec<LanguageTag>,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl DialogueGraph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>, languages: &[LanguageTag]) -> Self {
        Self {
            name: name.into(),
            languages: languages.to_vec(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Languages new nodes are completed against
    pub fn languages(&self) -> &[LanguageTag] {
        &self.languages
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Create and add a start node
    pub fn create_start_node(&mut self, position: [f32; 2]) -> NodeId {
        self.add_node(Node::start().with_position(position))
    }

    /// Create and add a dialogue node without choices
    pub fn create_dialogue_node(&mut self, position: [f32; 2]) -> NodeId {
        let node = Node::dialogue(&self.languages).with_position(position);
        self.add_node(node)
    }

    /// Create and add an event node
    pub fn create_event_node(&mut self, position: [f32; 2]) -> NodeId {
        self.add_node(Node::event().with_position(position))
    }

    /// Create and add an end node
    pub fn create_end_node(&mut self, position: [f32; 2]) -> NodeId {
        self.add_node(Node::end().with_position(position))
    }

    /// Remove a node and its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections.retain(|_, c| !c.involves_node(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Remove every connection, then every node
    pub fn clear(&mut self) {
        self.connections.clear();
        self.nodes.clear();
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add a connection from an output port to an input port
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
        to_port: PortId,
    ) -> Result<ConnectionId, ConnectionError> {
        let source_node = self.nodes.get(&from_node)
            .ok_or(ConnectionError::NodeNotFound(from_node))?;
        let target_node = self.nodes.get(&to_node)
            .ok_or(ConnectionError::NodeNotFound(to_node))?;

        let source_port = source_node.port(&from_port)
            .ok_or(ConnectionError::PortNotFound(from_port))?;
        let target_port = target_node.port(&to_port)
            .ok_or(ConnectionError::PortNotFound(to_port))?;

        if source_port.direction != PortDirection::Output || !source_port.can_connect(target_port) {
            return Err(ConnectionError::IncompatiblePorts);
        }

        if from_node == to_node {
            return Err(ConnectionError::SelfLoop);
        }

        if !source_port.accepts_connection(self.connections_from(from_port).count()) {
            return Err(ConnectionError::PortAlreadyConnected(from_port));
        }
        if !target_port.accepts_connection(self.connections_to(to_port).count()) {
            return Err(ConnectionError::PortAlreadyConnected(to_port));
        }

        let connection = Connection::new(from_node, from_port, to_node, to_port);
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Get all connections in insertion order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections from a specific port
    pub fn connections_from(&self, port_id: PortId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.from_port == port_id)
    }

    /// Get connections to a specific port
    pub fn connections_to(&self, port_id: PortId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.to_port == port_id)
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Add a choice port to a dialogue node.
    ///
    /// With `reuse` set, the choice keeps the record's `port_id`, `port_guid`,
    /// `output_guid` and labels. If the node already has a choice with that
    /// `port_id` nothing is added and `None` is returned. A fresh
    /// `text_field_id` is allocated either way.
    pub fn add_choice_port(&mut self, node_id: NodeId, reuse: Option<&PortRecord>) -> Option<PortId> {
        let mut labels = LanguageTable::filled(&self.languages, DEFAULT_CHOICE_LABEL.to_string());
        let node = self.nodes.get_mut(&node_id)?;
        let NodeKind::Dialogue(content) = &mut node.kind else {
            tracing::warn!("Cannot add a choice to non-dialogue node {node_id}");
            return None;
        };

        let port_id = match reuse {
            Some(existing) if existing.port_id.is_nil() => {
                tracing::warn!("Choice on node {node_id} has an empty port id; allocating one");
                PortId::new()
            }
            Some(existing) => {
                if content.choice(existing.port_id).is_some()
                    || node.outputs.iter().any(|p| p.id == existing.port_id)
                {
                    tracing::debug!("Choice {} already exists on node {node_id}", existing.port_id);
                    return None;
                }
                existing.port_id
            }
            None => PortId::new(),
        };

        let mut port_guid = PortId::new();
        let mut output_guid = None;
        if let Some(existing) = reuse {
            if !existing.port_guid.is_nil() {
                port_guid = existing.port_guid;
            }
            output_guid = existing.output_guid;
            for entry in existing.labels.iter() {
                if labels.contains(entry.language) {
                    labels.set(entry.language, entry.value.clone());
                }
            }
        }

        content.choices.push(PortRecord {
            port_id,
            port_guid,
            text_field_id: PortId::new(),
            output_guid,
            labels,
        });
        node.outputs.push(Port::new(port_id, "", PortDirection::Output, PortCapacity::Single));
        Some(port_id)
    }

    /// Remove a choice port, its record and its edge
    pub fn remove_choice_port(&mut self, node_id: NodeId, port_id: PortId) -> Option<PortRecord> {
        let node = self.nodes.get_mut(&node_id)?;
        let content = node.dialogue_content_mut()?;
        let index = content.choices.iter().position(|c| c.port_id == port_id)?;
        let record = content.choices.remove(index);
        node.outputs.retain(|p| p.id != port_id);
        self.connections.retain(|_, c| !c.leaves(node_id, port_id));
        Some(record)
    }

    /// Node reached from a node's output port, if connected
    pub fn choice_target(&self, node_id: NodeId, port_id: PortId) -> Option<NodeId> {
        self.connections
            .values()
            .find(|c| c.leaves(node_id, port_id) && self.nodes.contains_key(&c.to_node))
            .map(|c| c.to_node)
    }

    /// Reset and re-derive `output_guid` for each choice from the live edges
    pub fn resolve_choice_targets(&self, node_id: NodeId, choices: &mut [PortRecord]) {
        for choice in choices.iter_mut() {
            choice.output_guid = self.choice_target(node_id, choice.port_id);
        }
    }

    /// Bring a dialogue node's choice records in line with its edges.
    ///
    /// Returns `false` if the node is missing or not a dialogue node.
    pub fn refresh_port_connections(&mut self, node_id: NodeId) -> bool {
        let Some(mut choices) = self.node(node_id)
            .and_then(Node::dialogue_content)
            .map(|content| content.choices.clone())
        else {
            return false;
        };
        self.resolve_choice_targets(node_id, &mut choices);
        if let Some(content) = self.node_mut(node_id).and_then(Node::dialogue_content_mut) {
            content.choices = choices;
        }
        true
    }
}

impl Default for DialogueGraph {
    fn default() -> Self {
        Self::new("Untitled", &LanguageTag::ALL)
    }
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0}")]
    PortNotFound(PortId),

    /// Ports are not an output/input pair
    #[error("Incompatible ports")]
    IncompatiblePorts,

    /// Port is already connected
    #[error("Port already connected: {0}")]
    PortAlreadyConnected(PortId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}
