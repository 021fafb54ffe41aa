// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per execution root bookkeeping: the run-once ledger and in-flight async nodes.

use super::animate::AnimateState;
use crate::node::NodeId;

/// Resumable state of an async node
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncState {
    /// A running float animation
    Animate(AnimateState),
}

/// Execution state of one root (object instance, scene or game) during play
#[derive(Debug, Clone)]
pub struct BehaviorTreeRoot {
    /// The node that owns the trees executed under this root
    pub root_node: NodeId,
    /// Last node that reported `Running`
    pub running_node: Option<NodeId>,
    /// Nodes that already completed and must not fire again until re-armed
    pub has_run: Vec<NodeId>,
    async_nodes: Vec<(NodeId, AsyncState)>,
}

impl BehaviorTreeRoot {
    /// Create the state for a root node
    pub fn new(root_node: NodeId) -> Self {
        Self {
            root_node,
            running_node: None,
            has_run: Vec::new(),
            async_nodes: Vec::new(),
        }
    }

    /// Register an async node. Returns `false`, keeping the existing state, when already present.
    pub fn install_async_node(&mut self, node: NodeId, state: AsyncState) -> bool {
        if self.is_async_installed(node) {
            return false;
        }
        tracing::debug!(%node, "Installed async node");
        self.async_nodes.push((node, state));
        true
    }

    /// Remove every entry of an async node; absent nodes are ignored
    pub fn deinstall_async_node(&mut self, node: NodeId) {
        let before = self.async_nodes.len();
        self.async_nodes.retain(|(id, _)| *id != node);
        if self.async_nodes.len() != before {
            tracing::debug!(%node, "Deinstalled async node");
        }
    }

    /// Whether a node is in the async ledger
    pub fn is_async_installed(&self, node: NodeId) -> bool {
        self.async_nodes.iter().any(|(id, _)| *id == node)
    }

    /// Ids of the installed async nodes in registration order
    pub fn async_node_ids(&self) -> Vec<NodeId> {
        self.async_nodes.iter().map(|(id, _)| *id).collect()
    }

    /// Number of installed async nodes
    pub fn async_count(&self) -> usize {
        self.async_nodes.len()
    }

    /// Mutable state of an installed async node
    pub fn async_state_mut(&mut self, node: NodeId) -> Option<&mut AsyncState> {
        self.async_nodes
            .iter_mut()
            .find(|(id, _)| *id == node)
            .map(|(_, state)| state)
    }

    /// Drop every async node
    pub fn clear_async_nodes(&mut self) {
        self.async_nodes.clear();
    }

    /// Record that a node completed
    pub fn mark_run(&mut self, node: NodeId) {
        if !self.has_run.contains(&node) {
            self.has_run.push(node);
        }
    }

    /// Whether a node already completed
    pub fn has_run(&self, node: NodeId) -> bool {
        self.has_run.contains(&node)
    }
}
