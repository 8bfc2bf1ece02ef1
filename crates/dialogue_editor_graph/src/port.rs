// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a port.
///
/// For dialogue choices this is also the choice identity persisted in
/// [`PortRecord::port_id`](crate::record::PortRecord::port_id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortId(pub Uuid);

impl PortId {
    /// Create a new random port ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The empty identity
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Whether this is the empty identity
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// How many connections a port accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortCapacity {
    /// At most one connection
    Single,
    /// Any number of connections
    Multi,
}

/// A port on a live node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Unique port ID
    pub id: PortId,
    /// Port name
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Connection capacity
    pub capacity: PortCapacity,
}

impl Port {
    /// Create a new port
    pub fn new(
        id: PortId,
        name: impl Into<String>,
        direction: PortDirection,
        capacity: PortCapacity,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            direction,
            capacity,
        }
    }

    /// Create a new input port that accepts any number of edges
    pub fn input(name: impl Into<String>) -> Self {
        Self::new(PortId::new(), name, PortDirection::Input, PortCapacity::Multi)
    }

    /// Create a new single-connection output port
    pub fn output(name: impl Into<String>) -> Self {
        Self::new(PortId::new(), name, PortDirection::Output, PortCapacity::Single)
    }

    /// Check if a connection to another port is valid
    pub fn can_connect(&self, other: &Port) -> bool {
        self.id != other.id && self.direction != other.direction
    }

    /// Whether the port accepts another edge given its current edge count
    pub fn accepts_connection(&self, existing: usize) -> bool {
        match self.capacity {
            PortCapacity::Single => existing == 0,
            PortCapacity::Multi => true,
        }
    }
}
