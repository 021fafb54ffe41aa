// SPDX-License-Identifier: MIT OR Apache-2.0
//! Action leaves: write variables, bodies or scene properties.
//!
//! Every action fails when a required target is unbound and succeeds once
//! its write went through.

use super::context::ExecutionContext;
use super::root::BehaviorTreeRoot;
use super::PlayResult;
use crate::interpolation::Interpolation;
use crate::node::{LeafKind, NodeId, NodeKind};
use crate::shape::direction_vector;
use crate::variables;
use rand::Rng;

pub(super) fn execute(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node: NodeId,
    leaf: LeafKind,
) -> PlayResult {
    let done = match leaf {
        LeafKind::ResetFloatVariable => reset_float(ctx, node),
        LeafKind::AddConstFloatVariable => update_float(ctx, node, |value, ctx| {
            (value + ctx.param(node, "value")).min(ctx.param(node, "max"))
        }),
        LeafKind::SubtractConstFloatVariable => update_float(ctx, node, |value, ctx| {
            (value - ctx.param(node, "value")).max(ctx.param(node, "min"))
        }),
        LeafKind::SetFloatVariable => update_float(ctx, node, |_, ctx| ctx.param(node, "value")),
        LeafKind::CopyFloatVariables => copy_float(ctx, node),
        LeafKind::RandomDirection => random_direction(ctx, node),
        LeafKind::AddFloat2Variables => {
            combine_float2(ctx, node, |a, b| [a[0] + b[0], a[1] + b[1]])
        }
        LeafKind::SubtractFloat2Variables => {
            combine_float2(ctx, node, |subtrahend, minuend| {
                [minuend[0] - subtrahend[0], minuend[1] - subtrahend[1]]
            })
        }
        LeafKind::ReflectFloat2Variables => combine_float2(ctx, node, Interpolation::reflect),
        LeafKind::CopyFloat2Variables => copy_float2(ctx, node),
        LeafKind::MultiplyConstFloat2Variable => multiply_float2(ctx, node),
        LeafKind::LimitFloat2Range => limit_float2(ctx, node),
        LeafKind::StopVariableAnimations => {
            root.clear_async_nodes();
            true
        }
        LeafKind::ObjectApplyForce => apply_force(ctx, root, node, false),
        LeafKind::ObjectApplyDirectionalForce => apply_force(ctx, root, node, true),
        LeafKind::ResetObject => reset_object(ctx, root, node),
        LeafKind::SceneGravity => scene_gravity(ctx, root, node),
        _ => false,
    };
    PlayResult::from_bool(done)
}

fn reset_float(ctx: &mut ExecutionContext<'_>, node: NodeId) -> bool {
    let Some(variable) = ctx.target(node, 0).float() else {
        return false;
    };
    let default = ctx.param(variable, "defaultValue");
    variables::set_float(ctx.graph, variable, default)
}

fn update_float(
    ctx: &mut ExecutionContext<'_>,
    node: NodeId,
    apply: impl FnOnce(f32, &ExecutionContext<'_>) -> f32,
) -> bool {
    let Some(variable) = ctx.target(node, 0).float() else {
        return false;
    };
    let Some(value) = variables::float(ctx.graph, variable) else {
        return false;
    };
    let value = apply(value, &*ctx);
    variables::set_float(ctx.graph, variable, value)
}

fn copy_float(ctx: &mut ExecutionContext<'_>, node: NodeId) -> bool {
    let (Some(from), Some(to)) = (ctx.target(node, 0).float(), ctx.target(node, 1).float()) else {
        return false;
    };
    match variables::float(ctx.graph, from) {
        Some(value) => variables::set_float(ctx.graph, to, value),
        None => false,
    }
}

fn random_direction(ctx: &mut ExecutionContext<'_>, node: NodeId) -> bool {
    let (from, to) = (ctx.param(node, "from"), ctx.param(node, "to"));
    let angle = if from < to {
        ctx.rng.gen_range(from..=to)
    } else {
        from
    };
    if let Some(direction) = ctx.target(node, 0).direction() {
        variables::set_direction(ctx.graph, direction, angle);
    }
    true
}

/// Read slots 0 and 1, write `combine(slot0, slot1)` into slot 2
fn combine_float2(
    ctx: &mut ExecutionContext<'_>,
    node: NodeId,
    combine: impl FnOnce([f32; 2], [f32; 2]) -> [f32; 2],
) -> bool {
    let values = (
        ctx.target(node, 0).float2().and_then(|id| variables::float2(ctx.graph, id)),
        ctx.target(node, 1).float2().and_then(|id| variables::float2(ctx.graph, id)),
        ctx.target(node, 2).float2(),
    );
    let (Some(a), Some(b), Some(result)) = values else {
        return false;
    };
    variables::set_float2(ctx.graph, result, combine(a, b))
}

fn copy_float2(ctx: &mut ExecutionContext<'_>, node: NodeId) -> bool {
    let (Some(from), Some(to)) = (ctx.target(node, 0).float2(), ctx.target(node, 1).float2()) else {
        return false;
    };
    match variables::float2(ctx.graph, from) {
        Some(value) => variables::set_float2(ctx.graph, to, value),
        None => false,
    }
}

fn multiply_float2(ctx: &mut ExecutionContext<'_>, node: NodeId) -> bool {
    let Some(variable) = ctx.target(node, 0).float2() else {
        return false;
    };
    let Some(mut value) = variables::float2(ctx.graph, variable) else {
        return false;
    };
    let (x, y) = (ctx.param(node, "x"), ctx.param(node, "y"));
    match ctx.param(node, "coordinate").round() as i32 {
        0 => {
            value[0] *= x;
            value[1] *= y;
        }
        1 => value[0] *= x,
        2 => value[1] *= y,
        _ => {}
    }
    variables::set_float2(ctx.graph, variable, value)
}

fn limit_float2(ctx: &mut ExecutionContext<'_>, node: NodeId) -> bool {
    let Some(variable) = ctx.target(node, 0).float2() else {
        return false;
    };
    let Some(mut value) = variables::float2(ctx.graph, variable) else {
        return false;
    };
    let index = if ctx.param(node, "coordinate") == 0.0 { 0 } else { 1 };
    let (lower, upper) = (ctx.param(node, "lower"), ctx.param(node, "upper"));
    value[index] = value[index].max(lower).min(upper);
    variables::set_float2(ctx.graph, variable, value)
}

fn apply_force(
    ctx: &mut ExecutionContext<'_>,
    root: &BehaviorTreeRoot,
    node: NodeId,
    directional: bool,
) -> bool {
    if ctx.kind(root.root_node) != Some(NodeKind::Object) {
        return false;
    }
    let scale = ctx.param(node, "scale");
    let power = ctx
        .target(node, 1)
        .float()
        .and_then(|id| variables::float(ctx.graph, id))
        .map_or(0.0, |value| value * scale);

    let direction = if directional {
        let angle = match ctx.target(node, 2).direction() {
            Some(id) => variables::direction(ctx.graph, id, &mut *ctx.rng),
            None => None,
        };
        angle.map_or([0.0, 0.0], direction_vector)
    } else {
        [1.0, 1.0]
    };

    if let Some(body) = ctx.target(node, 0).instance().and_then(|id| ctx.world.body_mut(id)) {
        body.force = [direction[0] * power * scale, direction[1] * power * scale];
    }
    true
}

fn reset_object(ctx: &mut ExecutionContext<'_>, root: &BehaviorTreeRoot, node: NodeId) -> bool {
    if ctx.kind(root.root_node) != Some(NodeKind::Object) {
        return false;
    }
    let Some(instance) = ctx.target(node, 0).instance() else {
        return false;
    };
    if let Some(object) = ctx.graph.node_mut(instance) {
        for key in ["posX", "posY", "rotate"] {
            let saved = object.property(&format!("copy_{key}"));
            object.set_property(key, saved);
        }
    }
    match ctx.world.body_mut(instance) {
        Some(body) => {
            body.velocity = [0.0, 0.0];
            body.angular_velocity = 0.0;
            true
        }
        None => false,
    }
}

fn scene_gravity(ctx: &mut ExecutionContext<'_>, root: &BehaviorTreeRoot, node: NodeId) -> bool {
    let strength = ctx.param(node, "strength") * 10.0;
    let direction = direction_vector(ctx.param(node, "angle"));
    match ctx.graph.node_mut(root.root_node) {
        Some(scene) if scene.kind == NodeKind::Scene => {
            scene.set_property("physicsGravityX", direction[0] * strength);
            scene.set_property("physicsGravityY", direction[1] * strength);
            true
        }
        _ => false,
    }
}
