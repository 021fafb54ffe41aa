// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure: an arena of nodes wired through terminal connections.

use crate::connection::{Connection, ConnectionId};
use crate::node::{Node, NodeId, NodeKind};
use crate::target;
use crate::terminal::{Connector, Terminal, TerminalId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A behavior graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph, in insertion order
    nodes: IndexMap<NodeId, Node>,
    /// Owning node of every terminal
    #[serde(skip)]
    terminal_index: HashMap<TerminalId, NodeId>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            terminal_index: HashMap::new(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        for terminal in &node.terminals {
            self.terminal_index.insert(terminal.id, id);
        }
        self.nodes.insert(id, node);
        id
    }

    /// Add a node and register it in the subset of a root node
    pub fn add_owned_node(&mut self, root: NodeId, node: Node) -> NodeId {
        let id = self.add_node(node);
        if let Some(subset) = self.nodes.get_mut(&root).and_then(|r| r.subset.as_mut()) {
            subset.push(id);
        }
        id
    }

    /// Place an object instance in a scene
    pub fn add_instance(&mut self, scene: NodeId, object: NodeId) -> bool {
        match self.nodes.get_mut(&scene) {
            Some(node) if node.kind == NodeKind::Scene => {
                if !node.instances.contains(&object) {
                    node.instances.push(object);
                }
                true
            }
            _ => false,
        }
    }

    /// Remove a node, tearing down both halves of every connection it holds
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&node_id)?;

        for terminal in &node.terminals {
            self.terminal_index.remove(&terminal.id);
            for connection in &terminal.connections {
                self.remove_half(
                    connection.to_node,
                    connection.to_terminal,
                    connection.to_connection,
                );
            }
        }

        for other in self.nodes.values_mut() {
            if let Some(subset) = other.subset.as_mut() {
                subset.retain(|id| *id != node_id);
            }
            other.instances.retain(|id| *id != node_id);
        }

        Some(node)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get a node by its raw UUID
    pub fn node_for_uuid(&self, uuid: Uuid) -> Option<&Node> {
        self.nodes.get(&NodeId(uuid))
    }

    /// Get a terminal and its owning node by the terminal's raw UUID
    pub fn terminal_of_uuid(&self, uuid: Uuid) -> Option<(NodeId, &Terminal)> {
        let terminal_id = TerminalId(uuid);
        let node_id = *self.terminal_index.get(&terminal_id)?;
        let terminal = self.nodes.get(&node_id)?.terminal(terminal_id)?;
        Some((node_id, terminal))
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all nodes mutably
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get nodes with a given display name
    pub fn nodes_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.values().filter(move |n| n.name == name)
    }

    /// Get the number of connections (each mirrored pair counts once)
    pub fn connection_count(&self) -> usize {
        self.nodes
            .values()
            .flat_map(|n| n.terminals.iter())
            .map(|t| t.connections.len())
            .sum::<usize>()
            / 2
    }

    /// Connect two terminals, storing a mirrored half on each
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_terminal: TerminalId,
        to_node: NodeId,
        to_terminal: TerminalId,
    ) -> Result<ConnectionId, ConnectionError> {
        let source = self.terminal_on(from_node, from_terminal)?;
        let target = self.terminal_on(to_node, to_terminal)?;

        if from_node == to_node {
            return Err(ConnectionError::SelfLoop);
        }
        if !source.brand.can_connect_to(target.brand) {
            return Err(ConnectionError::IncompatibleBrands);
        }
        if source.connector.opposite() != target.connector {
            return Err(ConnectionError::IncompatibleConnectors);
        }
        if !source.has_free_slot() {
            return Err(ConnectionError::TerminalAlreadyConnected(from_terminal));
        }
        if !target.has_free_slot() {
            return Err(ConnectionError::TerminalAlreadyConnected(to_terminal));
        }

        let hierarchy = match source.connector {
            Connector::Bottom => Some((from_node, to_node)),
            Connector::Top => Some((to_node, from_node)),
            Connector::Left | Connector::Right => None,
        };
        if let Some((parent, child)) = hierarchy {
            if self.reaches(child, parent) {
                return Err(ConnectionError::Cycle);
            }
        }

        let (forward, backward) = Connection::pair(from_node, from_terminal, to_node, to_terminal);
        let id = forward.id;
        if let Some(terminal) = self
            .nodes
            .get_mut(&from_node)
            .and_then(|n| n.terminal_mut(from_terminal))
        {
            terminal.connections.push(forward);
        }
        if let Some(terminal) = self
            .nodes
            .get_mut(&to_node)
            .and_then(|n| n.terminal_mut(to_terminal))
        {
            terminal.connections.push(backward);
        }
        Ok(id)
    }

    /// Connect two terminals by name
    pub fn connect_named(
        &mut self,
        from_node: NodeId,
        from_terminal: &str,
        to_node: NodeId,
        to_terminal: &str,
    ) -> Result<ConnectionId, ConnectionError> {
        let from = self
            .node(from_node)
            .ok_or(ConnectionError::NodeNotFound(from_node))?
            .terminal_named(from_terminal)
            .ok_or_else(|| ConnectionError::TerminalNameNotFound(from_terminal.to_string()))?
            .id;
        let to = self
            .node(to_node)
            .ok_or(ConnectionError::NodeNotFound(to_node))?
            .terminal_named(to_terminal)
            .ok_or_else(|| ConnectionError::TerminalNameNotFound(to_terminal.to_string()))?
            .id;
        self.connect(from_node, from, to_node, to)
    }

    /// Wire a behavior child under the first free Bottom slot of a parent
    pub fn attach_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Result<ConnectionId, ConnectionError> {
        let parent_node = self.node(parent).ok_or(ConnectionError::NodeNotFound(parent))?;
        let slot = parent_node
            .bottom_terminals()
            .find(|t| t.has_free_slot())
            .ok_or(ConnectionError::NoFreeSlot(parent))?
            .id;
        let input = self
            .node(child)
            .ok_or(ConnectionError::NodeNotFound(child))?
            .input_terminal()
            .ok_or(ConnectionError::NoFreeSlot(child))?
            .id;
        self.connect(parent, slot, child, input)
    }

    /// Remove a connection given the id of either of its halves
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        let (owner, terminal_id) = self.nodes.values().find_map(|n| {
            n.terminals
                .iter()
                .find(|t| t.connections.iter().any(|c| c.id == connection_id))
                .map(|t| (n.id, t.id))
        })?;

        let removed = self.remove_half(owner, terminal_id, connection_id)?;
        self.remove_half(removed.to_node, removed.to_terminal, removed.to_connection);
        Some(removed)
    }

    fn remove_half(
        &mut self,
        node_id: NodeId,
        terminal_id: TerminalId,
        connection_id: ConnectionId,
    ) -> Option<Connection> {
        let terminal = self.nodes.get_mut(&node_id)?.terminal_mut(terminal_id)?;
        let index = terminal.connections.iter().position(|c| c.id == connection_id)?;
        Some(terminal.connections.remove(index))
    }

    fn terminal_on(
        &self,
        node_id: NodeId,
        terminal_id: TerminalId,
    ) -> Result<&Terminal, ConnectionError> {
        self.nodes
            .get(&node_id)
            .ok_or(ConnectionError::NodeNotFound(node_id))?
            .terminal(terminal_id)
            .ok_or(ConnectionError::TerminalNotFound(terminal_id))
    }

    /// Behavior children of a node: every connection of every Bottom terminal, in order
    pub fn behavior_children(&self, node_id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node_id)
            .map(|node| {
                node.bottom_terminals()
                    .flat_map(|t| t.connections.iter().map(|c| c.to_node))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The first connected child of each Bottom slot, in slot order
    pub fn behavior_slots(&self, node_id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node_id)
            .map(|node| {
                node.bottom_terminals()
                    .filter_map(|t| t.connections.first().map(|c| c.to_node))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn reaches(&self, start: NodeId, goal: NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if current == goal {
                return true;
            }
            if visited.insert(current) {
                stack.extend(self.behavior_children(current));
            }
        }
        false
    }

    /// Behavior trees owned by a root node, in subset order
    pub fn behavior_trees_for(&self, root: NodeId) -> Vec<NodeId> {
        let Some(subset) = self.nodes.get(&root).and_then(|r| r.subset.as_ref()) else {
            return Vec::new();
        };
        subset
            .iter()
            .filter(|id| {
                self.nodes
                    .get(*id)
                    .is_some_and(|n| n.kind == NodeKind::BehaviorTree)
            })
            .copied()
            .collect()
    }

    /// The root whose subset contains a node
    pub fn root_of(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|n| n.subset.as_ref().is_some_and(|s| s.contains(&node_id)))
            .map(|n| n.id)
    }

    /// Record, on every node reachable below a behavior tree, which tree it belongs to
    pub fn assign_tree_membership(&mut self) {
        for node in self.nodes.values_mut() {
            node.behavior_tree = None;
        }

        let trees: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.kind == NodeKind::BehaviorTree)
            .map(|n| n.id)
            .collect();

        for tree in trees {
            let mut visited = HashSet::new();
            let mut stack = self.behavior_children(tree);
            while let Some(current) = stack.pop() {
                if !visited.insert(current) {
                    continue;
                }
                stack.extend(self.behavior_children(current));
                if let Some(node) = self.nodes.get_mut(&current) {
                    node.behavior_tree.get_or_insert(tree);
                }
            }
        }
    }

    /// Turn every node's UI connection slots into typed targets
    pub fn resolve_targets(&mut self) {
        let resolved: Vec<(NodeId, Vec<target::Target>)> = self
            .nodes
            .values()
            .map(|node| {
                let targets = node
                    .ui_connections
                    .iter()
                    .map(|slot| target::resolve(slot, |id| self.nodes.get(&id).map(|n| n.kind)))
                    .collect();
                (node.id, targets)
            })
            .collect();

        for (id, targets) in resolved {
            if let Some(node) = self.nodes.get_mut(&id) {
                if node.targets.iter().zip(&targets).any(|(a, b)| a != b) {
                    tracing::debug!(node = %node.name, "UI targets changed");
                }
                node.targets = targets;
            }
        }
    }

    /// Reset the per-tick result of every node
    pub fn reset_play_results(&mut self) {
        for node in self.nodes.values_mut() {
            node.play_result = Default::default();
        }
    }

    /// Rebuild the terminal index after deserialization
    pub fn rebuild_index(&mut self) {
        self.terminal_index = self
            .nodes
            .values()
            .flat_map(|n| n.terminals.iter().map(move |t| (t.id, n.id)))
            .collect();
    }

    fn check(&self) -> Vec<GraphError> {
        let mut problems = Vec::new();

        for node in self.nodes.values() {
            for terminal in &node.terminals {
                for connection in &terminal.connections {
                    let peer = self
                        .nodes
                        .get(&connection.to_node)
                        .and_then(|n| n.terminal(connection.to_terminal));
                    match peer {
                        None => problems.push(GraphError::DanglingConnection {
                            node: node.id,
                            connection: connection.id,
                        }),
                        Some(peer) => {
                            let mirrored = peer.connections.iter().any(|c| {
                                c.id == connection.to_connection
                                    && c.to_connection == connection.id
                            });
                            if !mirrored {
                                problems.push(GraphError::MissingMirror {
                                    node: node.id,
                                    connection: connection.id,
                                });
                            }
                        }
                    }
                }
            }

            let owned = node.subset.iter().flatten().chain(node.instances.iter());
            for id in owned {
                if !self.nodes.contains_key(id) {
                    problems.push(GraphError::UnknownOwnedNode {
                        root: node.id,
                        node: *id,
                    });
                }
            }
        }
        problems
    }

    /// Check referential integrity of terminals, connections and ownership lists
    pub fn validate(&self) -> Result<(), GraphError> {
        match self.check().into_iter().next() {
            Some(problem) => Err(problem),
            None => Ok(()),
        }
    }

    /// Drop dangling or unmirrored connection halves and unknown owned ids.
    ///
    /// Returns the number of problems fixed.
    pub fn repair(&mut self) -> usize {
        let problems = self.check();
        let fixed = problems.len();

        for problem in problems {
            match problem {
                GraphError::DanglingConnection { node, connection }
                | GraphError::MissingMirror { node, connection } => {
                    if let Some(owner) = self.nodes.get_mut(&node) {
                        for terminal in &mut owner.terminals {
                            terminal.connections.retain(|c| c.id != connection);
                        }
                    }
                    tracing::warn!(%node, "Removed broken connection half");
                }
                GraphError::UnknownOwnedNode { root, node } => {
                    if let Some(owner) = self.nodes.get_mut(&root) {
                        if let Some(subset) = owner.subset.as_mut() {
                            subset.retain(|id| *id != node);
                        }
                        owner.instances.retain(|id| *id != node);
                    }
                    tracing::warn!(%root, %node, "Removed unknown owned node");
                }
                GraphError::NodeNotFound(_) => {}
            }
        }
        fixed
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Terminal not found on the given node
    #[error("Terminal not found: {0:?}")]
    TerminalNotFound(TerminalId),

    /// No terminal with this name on the given node
    #[error("Terminal not found: {0}")]
    TerminalNameNotFound(String),

    /// Terminal brands differ
    #[error("Incompatible terminal brands")]
    IncompatibleBrands,

    /// Connectors do not pair Bottom with Top or Right with Left
    #[error("Incompatible connectors")]
    IncompatibleConnectors,

    /// Terminal is single-connect and already holds a connection
    #[error("Terminal already connected: {0:?}")]
    TerminalAlreadyConnected(TerminalId),

    /// Node has no free behavior slot
    #[error("No free behavior slot on node {0:?}")]
    NoFreeSlot(NodeId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// Link would make a node its own behavior ancestor
    #[error("Connection would create a cycle")]
    Cycle,
}

/// Referential integrity problem in a graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Connection half pointing at a node or terminal that does not exist
    #[error("Dangling connection {connection:?} on node {node:?}")]
    DanglingConnection {
        /// Node holding the half
        node: NodeId,
        /// The dangling half
        connection: ConnectionId,
    },

    /// Connection half whose mirror is missing on the peer terminal
    #[error("Connection {connection:?} on node {node:?} has no mirrored half")]
    MissingMirror {
        /// Node holding the half
        node: NodeId,
        /// The unmirrored half
        connection: ConnectionId,
    },

    /// Subset or instance list referencing a node that does not exist
    #[error("Root {root:?} owns unknown node {node:?}")]
    UnknownOwnedNode {
        /// Owning root
        root: NodeId,
        /// Missing node
        node: NodeId,
    },
}
