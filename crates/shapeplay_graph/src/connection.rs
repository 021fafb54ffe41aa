// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.
//!
//! Connections always exist in mirrored pairs: the half stored on terminal A
//! points at terminal B and at B's half, and vice versa. This lets traversal
//! start from either end without back-references.

use crate::node::NodeId;
use crate::terminal::TerminalId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one half of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

/// One half of a mirrored connection, stored on the terminal it leaves from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique ID of this half
    pub id: ConnectionId,
    /// Node owning the terminal at the other end
    pub to_node: NodeId,
    /// Terminal at the other end
    pub to_terminal: TerminalId,
    /// The mirrored half stored on the other terminal
    pub to_connection: ConnectionId,
}

impl Connection {
    /// Create both halves of a connection between two terminals.
    ///
    /// The first returned half belongs on `from_terminal`, the second on
    /// `to_terminal`.
    pub fn pair(
        from_node: NodeId,
        from_terminal: TerminalId,
        to_node: NodeId,
        to_terminal: TerminalId,
    ) -> (Connection, Connection) {
        let forward_id = ConnectionId::new();
        let backward_id = ConnectionId::new();

        let forward = Connection {
            id: forward_id,
            to_node,
            to_terminal,
            to_connection: backward_id,
        };
        let backward = Connection {
            id: backward_id,
            to_node: from_node,
            to_terminal: from_terminal,
            to_connection: forward_id,
        };
        (forward, backward)
    }

    /// Check if this half points at a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.to_node == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_mirrored() {
        let (a, b) = (NodeId::new(), NodeId::new());
        let (ta, tb) = (TerminalId::new(), TerminalId::new());

        let (forward, backward) = Connection::pair(a, ta, b, tb);
        assert_eq!(forward.to_node, b);
        assert_eq!(forward.to_terminal, tb);
        assert_eq!(backward.to_node, a);
        assert_eq!(backward.to_terminal, ta);
        assert_eq!(forward.to_connection, backward.id);
        assert_eq!(backward.to_connection, forward.id);
    }
}
