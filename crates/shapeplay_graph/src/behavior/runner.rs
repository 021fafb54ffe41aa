// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per root tick driver.
//!
//! A tick runs the root's read bindings, then polls its async nodes in
//! registration order, then evaluates its Always trees. Async nodes are
//! polled first so trees observe the latest animated values.

use super::context::ExecutionContext;
use super::execute::{execute, execute_async};
use super::root::BehaviorTreeRoot;
use super::PlayResult;
use crate::node::{ExecutionMode, NodeId};
use crate::variables;

/// One execution root and the trees it evaluates every tick
#[derive(Debug, Clone)]
pub struct RootRunner {
    /// Run-once ledger and async nodes of this root
    pub root: BehaviorTreeRoot,
    /// Trees in `Always` mode, in subset order
    pub trees: Vec<NodeId>,
    /// `ObjectProperties` nodes read at the start of every tick
    pub bindings: Vec<NodeId>,
}

impl RootRunner {
    /// Collect the trees and bindings of `owner` and fire its On Startup trees once
    pub fn start(ctx: &mut ExecutionContext<'_>, owner: NodeId) -> Self {
        let subset = ctx
            .graph
            .node(owner)
            .and_then(|n| n.subset.clone())
            .unwrap_or_default();

        let mut runner = Self {
            root: BehaviorTreeRoot::new(owner),
            trees: Vec::new(),
            bindings: variables::collect_bindings(ctx.graph, &subset),
        };

        for tree in ctx.graph.behavior_trees_for(owner) {
            let mode = ctx
                .graph
                .node(tree)
                .map(|n| n.execution_mode())
                .unwrap_or_default();
            match mode {
                ExecutionMode::Always => runner.trees.push(tree),
                ExecutionMode::OnStartup => {
                    let result = execute(ctx, &mut runner.root, tree, None);
                    tracing::debug!(%tree, ?result, "Fired startup tree");
                }
                ExecutionMode::OnDemand => {}
            }
        }
        runner
    }

    /// Run one tick and return each Always tree's result
    pub fn tick(&mut self, ctx: &mut ExecutionContext<'_>) -> Vec<(NodeId, PlayResult)> {
        for binding in &self.bindings {
            variables::read_binding(ctx.graph, *binding);
        }

        for node in self.root.async_node_ids() {
            execute_async(ctx, &mut self.root, node);
        }

        self.trees
            .iter()
            .map(|tree| (*tree, execute(ctx, &mut self.root, *tree, None)))
            .collect()
    }
}

/// A scene playing together with all of its object instances
#[derive(Debug, Clone)]
pub struct SceneRun {
    /// The scene node
    pub scene: NodeId,
    /// One runner per instance, then the scene's own runner
    pub runners: Vec<RootRunner>,
}

impl SceneRun {
    /// Create bodies for the scene's instances and start a runner for each root
    pub fn start(ctx: &mut ExecutionContext<'_>, scene: NodeId) -> Self {
        let instances = ctx
            .graph
            .node(scene)
            .map(|n| n.instances.clone())
            .unwrap_or_default();

        let mut runners = Vec::with_capacity(instances.len() + 1);
        for instance in instances {
            ctx.world.add_body(instance);
            runners.push(RootRunner::start(ctx, instance));
        }
        runners.push(RootRunner::start(ctx, scene));

        tracing::debug!(%scene, roots = runners.len(), "Started scene run");
        Self { scene, runners }
    }

    /// Tick every runner in order
    pub fn tick(&mut self, ctx: &mut ExecutionContext<'_>) -> Vec<(NodeId, PlayResult)> {
        self.runners.iter_mut().flat_map(|runner| runner.tick(ctx)).collect()
    }

    /// Async nodes in flight across all runners
    pub fn async_count(&self) -> usize {
        self.runners.iter().map(|r| r.root.async_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::test_support::Harness;
    use crate::node::{LeafKind, Node, NodeKind};

    fn context(h: &mut Harness) -> ExecutionContext<'_> {
        ExecutionContext::new(
            &mut h.graph,
            &mut h.world,
            &h.input,
            &h.clock,
            &mut h.rng,
            &mut h.scene_runs,
        )
    }

    fn owned_tree(h: &mut Harness, owner: NodeId, mode: ExecutionMode) -> NodeId {
        h.graph.add_owned_node(
            owner,
            Node::new(NodeKind::BehaviorTree).with_property("status", mode.to_property()),
        )
    }

    #[test]
    fn test_execution_modes() {
        let mut h = Harness::new();
        let owner = h.root.root_node;
        let always = owned_tree(&mut h, owner, ExecutionMode::Always);
        let startup = owned_tree(&mut h, owner, ExecutionMode::OnStartup);
        let demand = owned_tree(&mut h, owner, ExecutionMode::OnDemand);
        let counters: Vec<_> = [always, startup, demand]
            .into_iter()
            .map(|tree| {
                let leaf = h.counter_leaf(PlayResult::Success);
                h.graph.attach_child(tree, leaf.node).unwrap();
                leaf
            })
            .collect();
        h.graph.resolve_targets();

        let mut ctx = context(&mut h);
        let mut runner = RootRunner::start(&mut ctx, owner);
        assert_eq!(runner.trees, vec![always]);
        for _ in 0..3 {
            assert_eq!(runner.tick(&mut ctx), vec![(always, PlayResult::Success)]);
        }
        drop(ctx);

        assert_eq!(h.count(&counters[0]), 3.0);
        assert_eq!(h.count(&counters[1]), 1.0);
        assert_eq!(h.count(&counters[2]), 0.0);
    }

    #[test]
    fn test_async_nodes_update_before_trees() {
        let mut h = Harness::new();
        let owner = h.root.root_node;
        let tree = owned_tree(&mut h, owner, ExecutionMode::Always);
        let variable = h.float(0.0);

        let animate = h.leaf(LeafKind::AnimateFloatVariable, &[variable]);
        for (key, value) in [("from", 0.0), ("to", 10.0), ("duration", 1.0)] {
            h.graph.node_mut(animate).unwrap().set_property(key, value);
        }
        let test = h.leaf(LeafKind::TestFloatVariable, &[variable]);
        h.graph.node_mut(test).unwrap().set_property("mode", 2.0);
        h.graph.node_mut(test).unwrap().set_property("value", 4.0);

        h.graph.attach_child(tree, test).unwrap();
        h.graph.attach_child(tree, animate).unwrap();
        h.graph.resolve_targets();

        let clock = h.clock.clone();
        let mut ctx = context(&mut h);
        let mut runner = RootRunner::start(&mut ctx, owner);
        runner.tick(&mut ctx);
        assert_eq!(runner.root.async_count(), 1);

        clock.advance(500.0);
        runner.tick(&mut ctx);
        assert_eq!(ctx.graph.node(test).unwrap().play_result, PlayResult::Success);
    }

    #[test]
    fn test_scene_run_starts_instances() {
        let mut h = Harness::new();
        let scene = h.add(Node::new(NodeKind::Scene));
        let object = h.add(Node::new(NodeKind::Object));
        h.graph.add_instance(scene, object);
        let tree = owned_tree(&mut h, object, ExecutionMode::Always);

        let mut ctx = context(&mut h);
        let mut run = SceneRun::start(&mut ctx, scene);
        assert_eq!(run.runners.len(), 2);
        assert_eq!(run.runners[0].root.root_node, object);
        assert!(ctx.world.body(object).is_some());
        assert_eq!(run.tick(&mut ctx), vec![(tree, PlayResult::Success)]);
        assert_eq!(run.async_count(), 0);
    }

    #[test]
    fn test_finished_scene_stays_gated_across_ticks() {
        let mut h = Harness::new();
        let owner = h.root.root_node;
        let tree = owned_tree(&mut h, owner, ExecutionMode::Always);

        let nested = h.add(Node::new(NodeKind::Scene));
        let nested_tree = owned_tree(&mut h, nested, ExecutionMode::Always);
        let counter = h.counter_leaf(PlayResult::Success);
        let finished = h.add(Node::new(NodeKind::Leaf(LeafKind::SceneFinished)));
        h.graph.attach_child(nested_tree, counter.node).unwrap();
        h.graph.attach_child(nested_tree, finished).unwrap();

        let play = h.leaf(LeafKind::PlayScene, &[nested]);
        h.graph.attach_child(tree, play).unwrap();
        h.graph.resolve_targets();

        let mut ctx = context(&mut h);
        let mut runner = RootRunner::start(&mut ctx, owner);
        assert_eq!(runner.tick(&mut ctx), vec![(tree, PlayResult::Running)]);
        assert!(runner.root.has_run(play));
        assert!(ctx.scene_runs.is_empty());

        for _ in 0..3 {
            assert_eq!(runner.tick(&mut ctx), vec![(tree, PlayResult::Success)]);
            assert!(runner.root.has_run(play));
            assert!(ctx.scene_runs.is_empty());
        }
        drop(ctx);

        assert_eq!(h.count(&counter), 1.0);
        assert_eq!(h.result(play), PlayResult::Success);
    }
}
