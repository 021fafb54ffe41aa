// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared fixtures for behavior tests.

use super::{execute, BehaviorTreeRoot, ExecutionContext, PlayEvents, PlayResult, SceneRun};
use crate::clock::ManualClock;
use crate::graph::Graph;
use crate::input::InputState;
use crate::node::{LeafKind, Node, NodeId, NodeKind};
use crate::variables;
use crate::world::PhysicsWorld;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

/// A subtree that bumps a counter variable and then reports a fixed result
pub(crate) struct CounterLeaf {
    pub node: NodeId,
    pub counter: NodeId,
}

/// Session state for driving single evaluations
pub(crate) struct Harness {
    pub graph: Graph,
    pub world: PhysicsWorld,
    pub input: InputState,
    pub clock: ManualClock,
    pub rng: StdRng,
    pub scene_runs: HashMap<NodeId, SceneRun>,
    pub root: BehaviorTreeRoot,
    pub events: PlayEvents,
}

impl Harness {
    pub fn new() -> Self {
        let mut graph = Graph::new("test");
        let owner = graph.add_node(Node::new(NodeKind::Scene));
        Self {
            graph,
            world: PhysicsWorld::new(),
            input: InputState::default(),
            clock: ManualClock::new(),
            rng: StdRng::seed_from_u64(1),
            scene_runs: HashMap::new(),
            root: BehaviorTreeRoot::new(owner),
            events: PlayEvents::default(),
        }
    }

    /// Use an object instance as the executing root
    pub fn with_object_root() -> (Self, NodeId) {
        let mut h = Self::new();
        let object = h.add(Node::new(NodeKind::Object));
        h.world.add_body(object);
        h.root = BehaviorTreeRoot::new(object);
        (h, object)
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        self.graph.add_node(node)
    }

    pub fn float(&mut self, value: f32) -> NodeId {
        self.add(Node::new(NodeKind::FloatVariable).with_property("value", value))
    }

    pub fn float2(&mut self, x: f32, y: f32) -> NodeId {
        self.add(
            Node::new(NodeKind::Float2Variable)
                .with_property("x", x)
                .with_property("y", y),
        )
    }

    /// A leaf node with its UI slots pointed at `targets`
    pub fn leaf(&mut self, kind: LeafKind, targets: &[NodeId]) -> NodeId {
        let mut node = Node::new(NodeKind::Leaf(kind));
        for (index, target) in targets.iter().enumerate() {
            node.set_ui_target(index, None, Some(*target));
        }
        self.add(node)
    }

    pub fn counter_leaf(&mut self, result: PlayResult) -> CounterLeaf {
        let counter = self.float(0.0);
        let wrapper = self.add(Node::new(NodeKind::Sequence));

        let mut bump = Node::new(NodeKind::Leaf(LeafKind::AddConstFloatVariable))
            .with_property("value", 1.0)
            .with_property("max", f32::MAX);
        bump.set_ui_target(0, None, Some(counter));
        let bump = self.add(bump);
        self.graph.attach_child(wrapper, bump).unwrap();

        if result.is_failure() {
            let fail = self.add(Node::new(NodeKind::Leaf(LeafKind::TestFloatVariable)));
            self.graph.attach_child(wrapper, fail).unwrap();
        }
        CounterLeaf { node: wrapper, counter }
    }

    pub fn count(&self, leaf: &CounterLeaf) -> f32 {
        self.value(leaf.counter)
    }

    pub fn value(&self, variable: NodeId) -> f32 {
        variables::float(&self.graph, variable).unwrap()
    }

    pub fn result(&self, node: NodeId) -> PlayResult {
        self.graph.node(node).unwrap().play_result
    }

    /// Reset results and evaluate one node under the harness root
    pub fn run(&mut self, node: NodeId) -> PlayResult {
        self.graph.reset_play_results();
        let mut ctx = ExecutionContext::new(
            &mut self.graph,
            &mut self.world,
            &self.input,
            &self.clock,
            &mut self.rng,
            &mut self.scene_runs,
        );
        let result = execute(&mut ctx, &mut self.root, node, None);
        self.events = ctx.events;
        result
    }

    /// Poll every installed async node once
    pub fn poll_async(&mut self) {
        let mut ctx = ExecutionContext::new(
            &mut self.graph,
            &mut self.world,
            &self.input,
            &self.clock,
            &mut self.rng,
            &mut self.scene_runs,
        );
        for id in self.root.async_node_ids() {
            super::execute_async(&mut ctx, &mut self.root, id);
        }
    }
}
