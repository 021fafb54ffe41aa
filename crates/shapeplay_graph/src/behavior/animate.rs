// SPDX-License-Identifier: MIT OR Apache-2.0
//! `AnimateFloatVariable`: moves a float register to a target value over time.
//!
//! The first evaluation installs the node in the root's async ledger and
//! captures curve, start, end and duration. Every evaluation restarts the
//! timer. The driver then polls the node once per tick until the duration
//! has elapsed, at which point the end value is written and the node leaves
//! the ledger.

use super::context::ExecutionContext;
use super::root::{AsyncState, BehaviorTreeRoot};
use super::PlayResult;
use crate::interpolation::AnimationCurve;
use crate::node::NodeId;
use crate::variables;

/// Captured parameters of a running animation
#[derive(Debug, Clone, PartialEq)]
pub struct AnimateState {
    /// The float register being animated
    pub variable: NodeId,
    /// Interpolation curve
    pub curve: AnimationCurve,
    /// Value at the start of the animation
    pub start: f32,
    /// Value at the end of the animation
    pub end: f32,
    /// Length of the animation in milliseconds
    pub duration_ms: f32,
    /// Clock time of the last (re)start, in milliseconds
    pub start_time: f64,
}

impl AnimateState {
    /// Value at a given clock time, or `None` once the animation is over
    pub fn value_at(&self, now_ms: f64) -> Option<f32> {
        let elapsed = (now_ms - self.start_time) as f32;
        if elapsed >= self.duration_ms {
            return None;
        }
        Some(self.curve.sample(self.start, self.end, self.duration_ms, elapsed.max(0.0)))
    }
}

pub(super) fn execute(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node: NodeId,
) -> PlayResult {
    let Some(variable) = ctx.target(node, 0).float() else {
        return PlayResult::Failure;
    };
    let now = ctx.clock.now_ms();

    let state = AnimateState {
        variable,
        curve: AnimationCurve::from_property(ctx.param(node, "mode")),
        start: ctx.param(node, "from"),
        end: ctx.param(node, "to"),
        duration_ms: ctx.param(node, "duration") * 1000.0,
        start_time: now,
    };
    if !root.install_async_node(node, AsyncState::Animate(state)) {
        if let Some(AsyncState::Animate(running)) = root.async_state_mut(node) {
            running.start_time = now;
        }
    }
    PlayResult::Success
}

pub(super) fn execute_async(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node: NodeId,
) {
    let Some(AsyncState::Animate(state)) = root.async_state_mut(node).cloned() else {
        return;
    };

    match state.value_at(ctx.clock.now_ms()) {
        Some(value) => {
            if !variables::set_float(ctx.graph, state.variable, value) {
                root.deinstall_async_node(node);
            }
        }
        None => {
            variables::set_float(ctx.graph, state.variable, state.end);
            root.deinstall_async_node(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::behavior::test_support::Harness;
    use crate::behavior::PlayResult;
    use crate::node::{LeafKind, NodeId};

    fn animation(h: &mut Harness, mode: f32) -> (NodeId, NodeId) {
        let variable = h.float(0.0);
        let animate = h.leaf(LeafKind::AnimateFloatVariable, &[variable]);
        {
            let node = h.graph.node_mut(animate).unwrap();
            node.set_property("mode", mode);
            node.set_property("from", 0.0);
            node.set_property("to", 10.0);
            node.set_property("duration", 1.0);
        }
        h.graph.resolve_targets();
        (animate, variable)
    }

    #[test]
    fn test_linear_animation_runs_to_completion() {
        let mut h = Harness::new();
        let (animate, variable) = animation(&mut h, 0.0);

        assert_eq!(h.run(animate), PlayResult::Success);
        assert_eq!(h.root.async_node_ids(), vec![animate]);

        h.clock.advance(250.0);
        h.poll_async();
        assert_eq!(h.value(variable), 2.5);

        h.clock.advance(1000.0);
        h.poll_async();
        assert_eq!(h.value(variable), 10.0);
        assert_eq!(h.root.async_count(), 0);
    }

    #[test]
    fn test_reexecution_restarts_the_timer() {
        let mut h = Harness::new();
        let (animate, variable) = animation(&mut h, 0.0);

        h.run(animate);
        h.clock.advance(500.0);
        h.poll_async();
        assert_eq!(h.value(variable), 5.0);

        h.run(animate);
        assert_eq!(h.root.async_count(), 1);
        h.poll_async();
        assert_eq!(h.value(variable), 0.0);

        h.clock.advance(250.0);
        h.poll_async();
        assert_eq!(h.value(variable), 2.5);
    }

    #[test]
    fn test_parameters_are_captured_on_install() {
        let mut h = Harness::new();
        let (animate, variable) = animation(&mut h, 0.0);

        h.run(animate);
        h.graph.node_mut(animate).unwrap().set_property("to", 100.0);
        h.run(animate);
        h.clock.advance(500.0);
        h.poll_async();
        assert_eq!(h.value(variable), 5.0);
    }

    #[test]
    fn test_spline_animation_eases_in() {
        let mut h = Harness::new();
        let (animate, variable) = animation(&mut h, 1.0);

        h.run(animate);
        h.clock.advance(250.0);
        h.poll_async();
        let eased = h.value(variable);
        assert!(eased > 0.0 && eased < 2.5);
    }

    #[test]
    fn test_unbound_animation_fails() {
        let mut h = Harness::new();
        let animate = h.leaf(LeafKind::AnimateFloatVariable, &[]);
        assert_eq!(h.run(animate), PlayResult::Failure);
        assert_eq!(h.root.async_count(), 0);
    }
}
