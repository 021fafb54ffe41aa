// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dispatch from node kind to evaluator.

use super::context::ExecutionContext;
use super::root::BehaviorTreeRoot;
use super::{actions, animate, composite, conditions, scene_play, PlayResult};
use crate::graph::Graph;
use crate::node::{LeafKind, NodeId, NodeKind};
use crate::variables;

/// Evaluate a node and record its result in the node's `play_result`.
///
/// Kinds without behavior semantics (roots, variables, property nodes)
/// succeed without doing anything. Missing nodes fail.
pub fn execute(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node_id: NodeId,
    parent: Option<NodeId>,
) -> PlayResult {
    let Some(kind) = ctx.kind(node_id) else {
        return PlayResult::Failure;
    };

    let result = if kind.is_run_once() && root.has_run(node_id) {
        if kind == NodeKind::Leaf(LeafKind::PlayScene) {
            scene_play::release(ctx, node_id);
        }
        PlayResult::Success
    } else {
        match kind {
            NodeKind::BehaviorTree => composite::behavior_tree(ctx, root, node_id),
            NodeKind::Sequence => composite::sequence(ctx, root, node_id),
            NodeKind::Selector => composite::selector(ctx, root, node_id),
            NodeKind::Inverter => composite::inverter(ctx, root, node_id),
            NodeKind::Succeeder => composite::succeeder(ctx, root, node_id),
            NodeKind::Repeater => composite::repeater(ctx, root, node_id),
            NodeKind::ExecuteBehaviorTree => composite::execute_tree(ctx, root, node_id),
            NodeKind::Leaf(LeafKind::AnimateFloatVariable) => {
                animate::execute(ctx, root, node_id)
            }
            NodeKind::Leaf(LeafKind::PlayScene) => scene_play::play_scene(ctx, root, node_id),
            NodeKind::Leaf(LeafKind::SceneFinished) => scene_play::scene_finished(ctx),
            NodeKind::Leaf(leaf) if conditions::is_condition(leaf) => {
                conditions::evaluate(ctx, root, node_id, leaf)
            }
            NodeKind::Leaf(leaf) => actions::execute(ctx, root, node_id, leaf),
            _ => PlayResult::Success,
        }
    };

    if let Some(node) = ctx.graph.node_mut(node_id) {
        tracing::trace!(node = %node.name, ?parent, ?result, "Executed");
        node.play_result = result;
    }
    result
}

/// Advance an async node by one tick
pub fn execute_async(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node_id: NodeId,
) {
    match ctx.kind(node_id) {
        Some(NodeKind::Leaf(LeafKind::AnimateFloatVariable)) => {
            animate::execute_async(ctx, root, node_id)
        }
        Some(_) => {}
        None => root.deinstall_async_node(node_id),
    }
}

/// Clean up a node when play stops
pub fn finish_execution(graph: &mut Graph, node_id: NodeId) {
    let Some(node) = graph.node_mut(node_id) else {
        return;
    };
    node.play_result = PlayResult::Unused;
    if node.kind.is_variable() {
        variables::restore_default(graph, node_id);
    }
}
