// SPDX-License-Identifier: MIT OR Apache-2.0
//! Everything a node may read or write while it is evaluated.

use super::runner::SceneRun;
use crate::clock::Clock;
use crate::graph::Graph;
use crate::input::InputState;
use crate::node::{NodeId, NodeKind};
use crate::target::Target;
use crate::world::PhysicsWorld;
use rand::rngs::StdRng;
use std::collections::HashMap;

/// Side effects raised during a tick that the host has to act on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayEvents {
    /// `PlayScene` nodes whose scene reported it is finished
    pub finished_scenes: Vec<NodeId>,
    /// A top level `SceneFinished` asked the session to stop
    pub stop_requested: bool,
}

/// State threaded through every `execute` call
pub struct ExecutionContext<'a> {
    /// The graph being played
    pub graph: &'a mut Graph,
    /// Physics bodies of object instances
    pub world: &'a mut PhysicsWorld,
    /// Input snapshot for this tick
    pub input: &'a InputState,
    /// Time source for async nodes
    pub clock: &'a dyn Clock,
    /// Random source for random directions and spread
    pub rng: &'a mut StdRng,
    /// Nested scene runs, keyed by the `PlayScene` node driving them
    pub scene_runs: &'a mut HashMap<NodeId, SceneRun>,
    /// Events raised so far
    pub events: PlayEvents,
    tree_stack: Vec<NodeId>,
    scene_stack: Vec<NodeId>,
}

impl<'a> ExecutionContext<'a> {
    /// Create a context over the given session state
    pub fn new(
        graph: &'a mut Graph,
        world: &'a mut PhysicsWorld,
        input: &'a InputState,
        clock: &'a dyn Clock,
        rng: &'a mut StdRng,
        scene_runs: &'a mut HashMap<NodeId, SceneRun>,
    ) -> Self {
        Self {
            graph,
            world,
            input,
            clock,
            rng,
            scene_runs,
            events: PlayEvents::default(),
            tree_stack: Vec::new(),
            scene_stack: Vec::new(),
        }
    }

    /// Read a property of a node, `0.0` when missing
    pub fn param(&self, node: NodeId, key: &str) -> f32 {
        self.graph.node(node).map_or(0.0, |n| n.property(key))
    }

    /// Resolved target of a node's UI connection slot
    pub fn target(&self, node: NodeId, index: usize) -> Target {
        self.graph.node(node).map_or(Target::Unbound, |n| n.target(index))
    }

    /// Kind of a node
    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.graph.node(node).map(|n| n.kind)
    }

    /// Enter a behavior tree. Returns `false` when the tree is already being evaluated.
    pub(crate) fn enter_tree(&mut self, tree: NodeId) -> bool {
        if self.tree_stack.contains(&tree) {
            return false;
        }
        self.tree_stack.push(tree);
        true
    }

    /// Leave the innermost behavior tree
    pub(crate) fn leave_tree(&mut self) {
        self.tree_stack.pop();
    }

    /// Enter the nested scene run driven by a `PlayScene` node.
    /// Returns `false` when that node is already playing further up.
    pub(crate) fn enter_scene(&mut self, play_node: NodeId) -> bool {
        if self.scene_stack.contains(&play_node) {
            return false;
        }
        self.scene_stack.push(play_node);
        true
    }

    /// Leave the innermost nested scene run
    pub(crate) fn leave_scene(&mut self) {
        self.scene_stack.pop();
    }

    /// The `PlayScene` node driving the scene being evaluated, if nested
    pub(crate) fn current_scene_player(&self) -> Option<NodeId> {
        self.scene_stack.last().copied()
    }
}
