// SPDX-License-Identifier: MIT OR Apache-2.0
//! Nested scene play.
//!
//! A `PlayScene` node keeps a [`SceneRun`] in the context while it reports
//! `Running`. When a `SceneFinished` node fires inside that run, the
//! `PlayScene` node lands in its root's run-once ledger and is released on
//! its next evaluation.

use super::context::ExecutionContext;
use super::root::BehaviorTreeRoot;
use super::runner::SceneRun;
use super::PlayResult;
use crate::node::NodeId;

pub(super) fn play_scene(
    ctx: &mut ExecutionContext<'_>,
    root: &mut BehaviorTreeRoot,
    node: NodeId,
) -> PlayResult {
    let Some(scene) = ctx.target(node, 0).scene() else {
        return PlayResult::Failure;
    };
    if !ctx.enter_scene(node) {
        tracing::warn!(%node, "Scene is already playing through this node");
        return PlayResult::Failure;
    }

    let mut run = match ctx.scene_runs.remove(&node) {
        Some(run) if run.scene == scene => run,
        _ => {
            tracing::info!(%scene, "Playing nested scene");
            SceneRun::start(ctx, scene)
        }
    };
    run.tick(ctx);
    ctx.leave_scene();

    if ctx.events.finished_scenes.contains(&node) {
        tracing::info!(%scene, "Nested scene finished");
        root.mark_run(node);
    } else {
        ctx.scene_runs.insert(node, run);
    }
    root.running_node = Some(node);
    PlayResult::Running
}

pub(super) fn scene_finished(ctx: &mut ExecutionContext<'_>) -> PlayResult {
    match ctx.current_scene_player() {
        Some(player) => {
            if !ctx.events.finished_scenes.contains(&player) {
                ctx.events.finished_scenes.push(player);
            }
        }
        None => ctx.events.stop_requested = true,
    }
    PlayResult::Success
}

pub(super) fn release(ctx: &mut ExecutionContext<'_>, node: NodeId) {
    if let Some(run) = ctx.scene_runs.remove(&node) {
        tracing::debug!(%node, scene = %run.scene, "Released nested scene");
    }
}

#[cfg(test)]
mod tests {
    use crate::behavior::test_support::{CounterLeaf, Harness};
    use crate::behavior::PlayResult;
    use crate::node::{LeafKind, Node, NodeId, NodeKind};

    /// A scene whose Always tree bumps a counter and then finishes the scene
    fn finishing_scene(h: &mut Harness) -> (NodeId, CounterLeaf) {
        let scene = h.add(Node::new(NodeKind::Scene));
        let tree = h.graph.add_owned_node(scene, Node::new(NodeKind::BehaviorTree));
        let counter = h.counter_leaf(PlayResult::Success);
        let finished = h.add(Node::new(NodeKind::Leaf(LeafKind::SceneFinished)));
        h.graph.attach_child(tree, counter.node).unwrap();
        h.graph.attach_child(tree, finished).unwrap();
        (scene, counter)
    }

    #[test]
    fn test_finished_scene_is_not_replayed() {
        let mut h = Harness::new();
        let (scene, counter) = finishing_scene(&mut h);
        let play = h.leaf(LeafKind::PlayScene, &[scene]);
        h.graph.resolve_targets();

        assert_eq!(h.run(play), PlayResult::Running);
        assert_eq!(h.count(&counter), 1.0);
        assert!(h.root.has_run(play));
        assert_eq!(h.events.finished_scenes, vec![play]);
        assert!(!h.events.stop_requested);
        assert!(h.scene_runs.is_empty());

        assert_eq!(h.run(play), PlayResult::Success);
        assert_eq!(h.run(play), PlayResult::Success);
        assert_eq!(h.count(&counter), 1.0);
    }

    #[test]
    fn test_running_scene_keeps_its_run() {
        let mut h = Harness::new();
        let scene = h.add(Node::new(NodeKind::Scene));
        let tree = h.graph.add_owned_node(scene, Node::new(NodeKind::BehaviorTree));
        let counter = h.counter_leaf(PlayResult::Success);
        h.graph.attach_child(tree, counter.node).unwrap();
        let play = h.leaf(LeafKind::PlayScene, &[scene]);
        h.graph.resolve_targets();

        for _ in 0..3 {
            assert_eq!(h.run(play), PlayResult::Running);
        }
        assert_eq!(h.count(&counter), 3.0);
        assert_eq!(h.scene_runs.len(), 1);
        assert!(!h.root.has_run(play));
        assert_eq!(h.root.running_node, Some(play));
    }

    #[test]
    fn test_repeater_replays_a_finished_scene() {
        let mut h = Harness::new();
        let (scene, counter) = finishing_scene(&mut h);
        let repeater = h.add(Node::new(NodeKind::Repeater));
        let play = h.leaf(LeafKind::PlayScene, &[scene]);
        h.graph.attach_child(repeater, play).unwrap();
        h.graph.resolve_targets();

        assert_eq!(h.run(repeater), PlayResult::Running);
        assert!(h.root.has_run(play));

        assert_eq!(h.run(repeater), PlayResult::Success);
        assert!(h.root.has_run.is_empty());

        assert_eq!(h.run(repeater), PlayResult::Running);
        assert_eq!(h.count(&counter), 2.0);
    }

    #[test]
    fn test_top_level_finish_requests_stop() {
        let mut h = Harness::new();
        let finished = h.add(Node::new(NodeKind::Leaf(LeafKind::SceneFinished)));
        assert_eq!(h.run(finished), PlayResult::Success);
        assert!(h.events.stop_requested);
        assert!(h.events.finished_scenes.is_empty());
    }

    #[test]
    fn test_unbound_play_scene_fails() {
        let mut h = Harness::new();
        let play = h.leaf(LeafKind::PlayScene, &[]);
        assert_eq!(h.run(play), PlayResult::Failure);
        assert!(h.scene_runs.is_empty());
    }

    #[test]
    fn test_scene_playing_itself_stops_at_one_level() {
        let mut h = Harness::new();
        let scene = h.add(Node::new(NodeKind::Scene));
        let tree = h.graph.add_owned_node(scene, Node::new(NodeKind::BehaviorTree));
        let play = h.leaf(LeafKind::PlayScene, &[scene]);
        h.graph.attach_child(tree, play).unwrap();
        h.graph.resolve_targets();

        assert_eq!(h.run(play), PlayResult::Running);
        assert_eq!(h.scene_runs.len(), 1);
    }
}
