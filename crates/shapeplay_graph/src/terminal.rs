// SPDX-License-Identifier: MIT OR Apache-2.0
//! Terminal definitions: the typed attachment points on a node.

use crate::connection::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerminalId(pub Uuid);

impl TerminalId {
    /// Create a new random terminal ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TerminalId {
    fn default() -> Self {
        Self::new()
    }
}

/// Side of the node a terminal sits on.
///
/// `Top`/`Bottom` carry the behavior hierarchy (child/parent), `Left`/`Right`
/// carry data bindings between variables and property nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connector {
    /// Data input of a variable
    Left,
    /// Behavior input (link to the parent)
    Top,
    /// Data output of a property node
    Right,
    /// Behavior output (link to a child)
    Bottom,
}

impl Connector {
    /// The connector a terminal on this side must pair with
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Compatibility tag of a terminal; both ends of a connection must agree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalBrand {
    /// Unspecified
    All,
    /// Generic property data
    Properties,
    /// Behavior hierarchy
    Behavior,
    /// Single float register
    FloatVariable,
    /// Two component float register
    Float2Variable,
    /// Direction (angle in degrees) register
    DirectionVariable,
    /// Three component float register
    Float3Variable,
}

impl TerminalBrand {
    /// Check if this brand can be wired to another one
    pub fn can_connect_to(self, other: TerminalBrand) -> bool {
        self == other
    }
}

/// A typed connection point on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terminal {
    /// Unique terminal ID
    pub id: TerminalId,
    /// Terminal name. For data terminals this is the bound property key.
    pub name: String,
    /// Side of the node
    pub connector: Connector,
    /// Compatibility tag
    pub brand: TerminalBrand,
    /// Whether more than one connection may leave this terminal
    pub multi_connect: bool,
    /// Outgoing halves of the connections attached here, in authoring order
    pub connections: Vec<Connection>,
}

impl Terminal {
    /// Create a new single-connect terminal
    pub fn new(name: impl Into<String>, connector: Connector, brand: TerminalBrand) -> Self {
        Self {
            id: TerminalId::new(),
            name: name.into(),
            connector,
            brand,
            multi_connect: false,
            connections: Vec::new(),
        }
    }

    /// The behavior input every tree node has on its top edge
    pub fn behavior_in() -> Self {
        Self::new("In", Connector::Top, TerminalBrand::Behavior)
    }

    /// A behavior output slot on the bottom edge
    pub fn behavior_out(name: impl Into<String>) -> Self {
        Self::new(name, Connector::Bottom, TerminalBrand::Behavior)
    }

    /// Allow multiple connections on this terminal
    pub fn multi(mut self) -> Self {
        self.multi_connect = true;
        self
    }

    /// Whether this terminal already holds a connection
    pub fn is_connected(&self) -> bool {
        !self.connections.is_empty()
    }

    /// Check if a connection to another terminal is valid
    pub fn can_connect(&self, other: &Terminal) -> bool {
        if self.connector.opposite() != other.connector {
            return false;
        }

        self.brand.can_connect_to(other.brand)
    }

    /// Whether this terminal can accept one more connection
    pub fn has_free_slot(&self) -> bool {
        self.multi_connect || self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behavior_terminals_pair_top_and_bottom() {
        let child_in = Terminal::behavior_in();
        let parent_out = Terminal::behavior_out("Behavior1");
        assert!(parent_out.can_connect(&child_in));
        assert!(child_in.can_connect(&parent_out));

        let other_out = Terminal::behavior_out("Behavior2");
        assert!(!parent_out.can_connect(&other_out));
    }

    #[test]
    fn test_brands_must_match() {
        let float_in = Terminal::new("In", Connector::Left, TerminalBrand::FloatVariable);
        let float_out = Terminal::new("posX", Connector::Right, TerminalBrand::FloatVariable);
        let float2_out = Terminal::new("pos", Connector::Right, TerminalBrand::Float2Variable);

        assert!(float_out.can_connect(&float_in));
        assert!(!float2_out.can_connect(&float_in));
    }
}
