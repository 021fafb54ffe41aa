// SPDX-License-Identifier: MIT OR Apache-2.0
//! Condition leaves: read input, variables or physics and report whether a test holds.

use super::context::ExecutionContext;
use super::root::BehaviorTreeRoot;
use super::PlayResult;
use crate::node::{LeafKind, NodeId, NodeKind};
use crate::shape::BoxArea;
use crate::variables;
use crate::world::CONTACT_DISTANCE;

pub(super) fn is_condition(leaf: LeafKind) -> bool {
    matches!(
        leaf,
        LeafKind::KeyDown
            | LeafKind::ClickInSceneArea
            | LeafKind::TestFloatVariable
            | LeafKind::TestFloat2Variable
            | LeafKind::ObjectDistanceTo
            | LeafKind::ObjectCollisionAny
            | LeafKind::ObjectCollisionWith
            | LeafKind::ObjectTouchSceneArea
    )
}

/// Compare using the `mode` selector: 0 equal, 1 smaller than, 2 bigger than
fn compare(mode: f32, value: f32, reference: f32) -> bool {
    match mode.round() as i32 {
        0 => value == reference,
        1 => value < reference,
        2 => value > reference,
        _ => false,
    }
}

pub(super) fn evaluate(
    ctx: &ExecutionContext<'_>,
    root: &BehaviorTreeRoot,
    node: NodeId,
    leaf: LeafKind,
) -> PlayResult {
    let holds = match leaf {
        LeafKind::KeyDown => {
            let code = ctx.param(node, "keyCode");
            code >= 0.0 && ctx.input.is_key_down(code.round() as u32)
        }
        LeafKind::ClickInSceneArea => click_in_area(ctx, node).unwrap_or(false),
        LeafKind::TestFloatVariable => ctx
            .target(node, 0)
            .float()
            .and_then(|id| variables::float(ctx.graph, id))
            .is_some_and(|value| compare(ctx.param(node, "mode"), value, ctx.param(node, "value"))),
        LeafKind::TestFloat2Variable => ctx
            .target(node, 0)
            .float2()
            .and_then(|id| variables::float2(ctx.graph, id))
            .is_some_and(|value| {
                let component = if ctx.param(node, "coordinate") == 0.0 {
                    value[0]
                } else {
                    value[1]
                };
                compare(ctx.param(node, "mode"), component, ctx.param(node, "value"))
            }),
        LeafKind::ObjectDistanceTo => distance_between(ctx, node)
            .is_some_and(|d| compare(ctx.param(node, "mode"), d, ctx.param(node, "value"))),
        LeafKind::ObjectCollisionAny => {
            is_object_root(ctx, root)
                && ctx
                    .target(node, 0)
                    .instance()
                    .and_then(|id| ctx.world.body(id))
                    .is_some_and(|body| body.manifold)
        }
        LeafKind::ObjectCollisionWith => {
            is_object_root(ctx, root)
                && distance_between(ctx, node).is_some_and(|d| d < CONTACT_DISTANCE)
        }
        LeafKind::ObjectTouchSceneArea => {
            is_object_root(ctx, root) && touches_area(ctx, node).unwrap_or(false)
        }
        _ => false,
    };
    PlayResult::from_bool(holds)
}

fn is_object_root(ctx: &ExecutionContext<'_>, root: &BehaviorTreeRoot) -> bool {
    ctx.kind(root.root_node) == Some(NodeKind::Object)
}

fn distance_between(ctx: &ExecutionContext<'_>, node: NodeId) -> Option<f32> {
    let from = ctx.target(node, 0).instance()?;
    let to = ctx.target(node, 1).instance()?;
    ctx.world.body(to)?;
    ctx.world.body(from)?.distance_infos.get(&to).copied()
}

fn click_in_area(ctx: &ExecutionContext<'_>, node: NodeId) -> Option<bool> {
    let area = ctx.graph.node(ctx.target(node, 0).area()?)?;
    let point = ctx.input.scene_click()?;
    Some(BoxArea::from_node(area).contains(point))
}

fn touches_area(ctx: &ExecutionContext<'_>, node: NodeId) -> Option<bool> {
    let instance = ctx.graph.node(ctx.target(node, 0).instance()?)?;
    let area = ctx.graph.node(ctx.target(node, 1).area()?)?;
    let center = [
        instance.property("posX") + instance.property("diskX"),
        instance.property("posY") + instance.property("diskY"),
    ];
    Some(BoxArea::from_node(area).touches_disk(center, instance.property("diskRadius")))
}
