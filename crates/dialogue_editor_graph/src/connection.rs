// SPDX-License-Identifier: MIT OR Apache-2.0
//! Live edges between node ports.

use crate::node::NodeId;
use crate::port::PortId;
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// An edge from an output port to an input port.
///
/// Edges exist only in the live graph; the persisted form is a
/// [`LinkRecord`](crate::record::LinkRecord) plus the choice's `output_guid`.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Node owning the output port
    pub from_node: NodeId,
    /// Output port
    pub from_port: PortId,
    /// Node owning the input port
    pub to_node: NodeId,
    /// Input port
    pub to_port: PortId,
}

impl Connection {
    /// Create a new connection
    pub fn new(
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
        to_port: PortId,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            from_node,
            from_port,
            to_node,
            to_port,
        }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }

    /// Whether this edge starts at `port_id` on `node_id`
    pub fn leaves(&self, node_id: NodeId, port_id: PortId) -> bool {
        self.from_node == node_id && self.from_port == port_id
    }
}
