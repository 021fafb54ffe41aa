// SPDX-License-Identifier: MIT OR Apache-2.0
//! Control flow nodes that fold the results of their behavior children.
//!
//! Composites visit the first connection of each Bottom terminal in slot
//! order. A behavior tree node visits every connection of its Bottom
//! terminal and reports the result of the last child it ran.

use super::context::ExecutionContext;
use super::execute::execute;
use super::root::BehaviorTreeRoot;
use super::PlayResult;
use crate::node::NodeId;

pub(super) fn behavior_tree(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    tree: NodeId,
) -> PlayResult {
    if !ctx.enter_tree(tree) {
        tracing::warn!(%tree, "Behavior tree is already executing");
        return PlayResult::Failure;
    }

    let mut result = PlayResult::Success;
    for child in ctx.graph.behavior_children(tree) {
        result = execute(ctx, root, child, Some(tree));
    }

    ctx.leave_tree();
    result
}

pub(super) fn sequence(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node: NodeId,
) -> PlayResult {
    for child in ctx.graph.behavior_slots(node) {
        match execute(ctx, root, child, Some(node)) {
            PlayResult::Failure => return PlayResult::Failure,
            PlayResult::Running => return PlayResult::Running,
            _ => {}
        }
    }
    PlayResult::Success
}

pub(super) fn selector(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node: NodeId,
) -> PlayResult {
    for child in ctx.graph.behavior_slots(node) {
        match execute(ctx, root, child, Some(node)) {
            PlayResult::Success => return PlayResult::Success,
            PlayResult::Running => return PlayResult::Running,
            _ => {}
        }
    }
    PlayResult::Failure
}

pub(super) fn inverter(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node: NodeId,
) -> PlayResult {
    let mut result = PlayResult::Success;
    for child in ctx.graph.behavior_slots(node) {
        result = execute(ctx, root, child, Some(node)).invert();
    }
    result
}

pub(super) fn succeeder(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node: NodeId,
) -> PlayResult {
    for child in ctx.graph.behavior_slots(node) {
        execute(ctx, root, child, Some(node));
    }
    PlayResult::Success
}

pub(super) fn repeater(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node: NodeId,
) -> PlayResult {
    let mut result = PlayResult::Success;
    for child in ctx.graph.behavior_slots(node) {
        result = execute(ctx, root, child, Some(node));
        if !result.is_running() {
            root.has_run.clear();
        }
    }
    result
}

pub(super) fn execute_tree(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node: NodeId,
) -> PlayResult {
    match ctx.target(node, 0).tree() {
        Some(tree) => execute(ctx, root, tree, Some(node)),
        None => {
            tracing::debug!(%node, "Execute tree without a target tree");
            PlayResult::Failure
        }
    }
}
