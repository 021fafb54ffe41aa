// SPDX-License-Identifier: MIT OR Apache-2.0
//! Play sessions.
//!
//! This module handles:
//! - Starting play on a game, scene or object node
//! - Ticking every execution root with a fixed timestep
//! - Pausing, single stepping and time scaling
//! - Restoring object transforms and variable defaults on stop

use crate::behavior::{
    finish_execution, ExecutionContext, PlayEvents, PlayResult, RootRunner, SceneRun,
};
use crate::clock::{Clock, SystemClock};
use crate::graph::Graph;
use crate::input::{InputState, SharedInput};
use crate::node::{NodeId, NodeKind};
use crate::world::PhysicsWorld;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Most fixed steps a single `update` may run
pub const MAX_STEPS_PER_UPDATE: u32 = 8;

/// Transform keys snapshotted when play starts
const TRANSFORM_KEYS: [(&str, &str); 3] = [
    ("posX", "copy_posX"),
    ("posY", "copy_posY"),
    ("rotate", "copy_rotate"),
];

/// Errors that can occur when driving a session
#[derive(Debug, Error)]
pub enum SessionError {
    /// The play target is not in the graph
    #[error("Play target not found: {0}")]
    TargetNotFound(NodeId),
    /// The play target cannot own behavior trees
    #[error("Node {0} is not a game, scene or object")]
    NotARoot(NodeId),
    /// `start` was called while playing
    #[error("A play session is already active")]
    AlreadyPlaying,
    /// A tick was requested while stopped
    #[error("No play session is active")]
    NotPlaying,
}

/// Play state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlayState {
    /// Not playing, the graph is editable
    #[default]
    Stopped,
    /// Ticking
    Playing,
    /// Started but not ticking
    Paused,
}

impl PlayState {
    /// Check if we're in any play mode (playing or paused)
    pub fn is_active(&self) -> bool {
        matches!(self, PlayState::Playing | PlayState::Paused)
    }
}

/// Result of one tree in one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeReport {
    /// The behavior tree node
    pub tree: NodeId,
    /// Its display name
    pub name: String,
    /// What it returned
    pub result: PlayResult,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub frame: u64,
    /// Every Always tree evaluated this tick, in root order
    pub trees: Vec<TreeReport>,
    /// Async nodes still in flight, per root
    pub async_nodes: Vec<(NodeId, usize)>,
    /// Whether a top level `SceneFinished` ended the session
    pub stop_requested: bool,
}

/// Drives behavior trees of a graph over time
pub struct PlaySession {
    state: PlayState,
    graph: Graph,
    world: PhysicsWorld,
    input: SharedInput,
    clock: Arc<dyn Clock>,
    seed: u64,
    rng: StdRng,
    target: Option<NodeId>,
    scene: Option<NodeId>,
    runners: Vec<RootRunner>,
    scene_runs: HashMap<NodeId, SceneRun>,
    pending: PlayEvents,
    timestep: f64,
    accumulated_time: f64,
    /// Time scale for simulation (1.0 = normal speed)
    pub time_scale: f32,
    /// Ticks run since play started
    pub frame_count: u64,
    /// Scaled time since play started, in seconds
    pub elapsed_time: f64,
}

impl PlaySession {
    /// Create a stopped session over a graph, using the wall clock and seed 0
    pub fn new(graph: Graph) -> Self {
        Self {
            state: PlayState::Stopped,
            graph,
            world: PhysicsWorld::new(),
            input: InputState::shared(),
            clock: Arc::new(SystemClock),
            seed: 0,
            rng: StdRng::seed_from_u64(0),
            target: None,
            scene: None,
            runners: Vec::new(),
            scene_runs: HashMap::new(),
            pending: PlayEvents::default(),
            timestep: 1.0 / 60.0,
            accumulated_time: 0.0,
            time_scale: 1.0,
            frame_count: 0,
            elapsed_time: 0.0,
        }
    }

    /// Use a different time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed the random source used by direction nodes
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Current state
    pub fn state(&self) -> PlayState {
        self.state
    }

    /// The node being played
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// The graph being played
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access to the graph
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Give the graph back, stopping first if needed
    pub fn into_graph(mut self) -> Graph {
        self.stop();
        self.graph
    }

    /// Physics bodies of the running session
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Handle for feeding input into the session
    pub fn input(&self) -> SharedInput {
        Arc::clone(&self.input)
    }

    /// Execution roots of the running session
    pub fn runners(&self) -> &[RootRunner] {
        &self.runners
    }

    /// Start playing a game, scene or object node
    pub fn start(&mut self, target: NodeId) -> Result<(), SessionError> {
        if self.state.is_active() {
            return Err(SessionError::AlreadyPlaying);
        }
        let kind = self
            .graph
            .node(target)
            .map(|n| n.kind)
            .ok_or(SessionError::TargetNotFound(target))?;
        if !kind.is_root() {
            return Err(SessionError::NotARoot(target));
        }

        self.graph.resolve_targets();
        self.graph.assign_tree_membership();
        self.snapshot_transforms();
        self.world.clear();
        self.scene_runs.clear();
        self.rng = StdRng::seed_from_u64(self.seed);
        self.scene = match kind {
            NodeKind::Scene => Some(target),
            NodeKind::Object => self
                .graph
                .nodes()
                .find(|n| n.kind == NodeKind::Scene && n.instances.contains(&target))
                .map(|n| n.id),
            _ => None,
        };

        let input = self.input.read().clone();
        let mut ctx = ExecutionContext::new(
            &mut self.graph,
            &mut self.world,
            &input,
            self.clock.as_ref(),
            &mut self.rng,
            &mut self.scene_runs,
        );
        self.runners = match kind {
            NodeKind::Scene => SceneRun::start(&mut ctx, target).runners,
            NodeKind::Object => {
                ctx.world.add_body(target);
                vec![RootRunner::start(&mut ctx, target)]
            }
            _ => vec![RootRunner::start(&mut ctx, target)],
        };
        self.pending = ctx.events;

        self.target = Some(target);
        self.state = PlayState::Playing;
        self.frame_count = 0;
        self.elapsed_time = 0.0;
        self.accumulated_time = 0.0;
        tracing::info!(%target, ?kind, roots = self.runners.len(), "Started play session");
        Ok(())
    }

    /// Run one tick of every root, then step physics
    pub fn tick(&mut self) -> Result<TickReport, SessionError> {
        if !self.state.is_active() {
            return Err(SessionError::NotPlaying);
        }
        self.graph.reset_play_results();

        let input = self.input.read().clone();
        let mut ctx = ExecutionContext::new(
            &mut self.graph,
            &mut self.world,
            &input,
            self.clock.as_ref(),
            &mut self.rng,
            &mut self.scene_runs,
        );
        let mut results = Vec::new();
        for runner in &mut self.runners {
            results.extend(runner.tick(&mut ctx));
        }
        let stop_requested =
            std::mem::take(&mut self.pending).stop_requested || ctx.events.stop_requested;

        if let Some(scene) = self.scene.and_then(|id| self.graph.node(id)) {
            self.world.gravity = [
                scene.property("physicsGravityX"),
                scene.property("physicsGravityY"),
            ];
        }
        self.world.step(&mut self.graph, self.timestep as f32);
        self.frame_count += 1;

        let report = TickReport {
            frame: self.frame_count,
            trees: results
                .into_iter()
                .map(|(tree, result)| TreeReport {
                    tree,
                    name: self.graph.node(tree).map(|n| n.name.clone()).unwrap_or_default(),
                    result,
                })
                .collect(),
            async_nodes: self
                .runners
                .iter()
                .map(|r| (r.root.root_node, r.root.async_count()))
                .collect(),
            stop_requested,
        };

        if stop_requested {
            tracing::info!(frame = self.frame_count, "Scene finished");
            self.stop();
        }
        Ok(report)
    }

    /// Advance by `delta_time` seconds and tick once per elapsed fixed step
    pub fn update(
        &mut self,
        delta_time: f64,
        fixed_timestep: f64,
    ) -> Result<Vec<TickReport>, SessionError> {
        if self.state != PlayState::Playing || fixed_timestep <= 0.0 {
            return Ok(Vec::new());
        }
        self.timestep = fixed_timestep;

        let scaled_delta = delta_time * self.time_scale as f64;
        self.elapsed_time += scaled_delta;
        self.accumulated_time += scaled_delta;

        let mut steps = 0;
        while self.accumulated_time >= fixed_timestep {
            self.accumulated_time -= fixed_timestep;
            steps += 1;

            if steps >= MAX_STEPS_PER_UPDATE {
                self.accumulated_time = 0.0;
                break;
            }
        }

        let mut reports = Vec::with_capacity(steps as usize);
        for _ in 0..steps {
            if !self.state.is_active() {
                break;
            }
            reports.push(self.tick()?);
        }
        Ok(reports)
    }

    /// Pause ticking
    pub fn pause(&mut self) -> bool {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
            tracing::info!("Paused play session");
            true
        } else {
            false
        }
    }

    /// Resume after a pause
    pub fn resume(&mut self) -> bool {
        if self.state == PlayState::Paused {
            self.state = PlayState::Playing;
            tracing::info!("Resumed play session");
            true
        } else {
            false
        }
    }

    /// Run exactly one tick while paused
    pub fn step_frame(&mut self, fixed_timestep: f64) -> Result<Option<TickReport>, SessionError> {
        if self.state != PlayState::Paused {
            return Ok(None);
        }
        self.timestep = fixed_timestep;
        self.elapsed_time += fixed_timestep;
        self.tick().map(Some)
    }

    /// Set time scale (clamped to reasonable range)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.clamp(0.0, 10.0);
    }

    /// Stop play, restoring variables and object transforms.
    /// Returns `false` when nothing was playing.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }

        let ids: Vec<NodeId> = self.graph.node_ids().collect();
        for id in ids {
            finish_execution(&mut self.graph, id);
        }
        self.restore_transforms();

        self.runners.clear();
        self.scene_runs.clear();
        self.world.clear();
        self.pending = PlayEvents::default();
        self.state = PlayState::Stopped;
        self.target = None;
        self.scene = None;
        self.accumulated_time = 0.0;

        tracing::info!(frames = self.frame_count, "Stopped play session");
        true
    }

    fn snapshot_transforms(&mut self) {
        for node in self.graph.nodes_mut().filter(|n| n.kind == NodeKind::Object) {
            for (key, copy) in TRANSFORM_KEYS {
                let value = node.property(key);
                node.set_property(copy, value);
            }
        }
    }

    fn restore_transforms(&mut self) {
        for node in self.graph.nodes_mut().filter(|n| n.kind == NodeKind::Object) {
            for (key, copy) in TRANSFORM_KEYS {
                if let Some(value) = node.properties.shift_remove(copy) {
                    node.set_property(key, value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::input::InputEvent;
    use crate::node::{ExecutionMode, LeafKind, Node};

    struct Fixture {
        session: PlaySession,
        scene: NodeId,
        object: NodeId,
        counter: NodeId,
        tree: NodeId,
    }

    /// A scene with one object whose Always tree counts ticks
    fn fixture() -> Fixture {
        let mut graph = Graph::new("session");
        let scene = graph.add_node(Node::new(NodeKind::Scene));
        let object = graph.add_node(Node::new(NodeKind::Object).with_property("posY", 5.0));
        graph.add_instance(scene, object);

        let tree =
            graph.add_owned_node(object, Node::new(NodeKind::BehaviorTree).with_name("Counter"));
        let counter = graph.add_owned_node(
            object,
            Node::new(NodeKind::FloatVariable)
                .with_property("value", 0.0)
                .with_property("defaultValue", 0.0),
        );
        let mut add = Node::new(NodeKind::Leaf(LeafKind::AddConstFloatVariable));
        add.set_ui_target(0, None, Some(counter));
        let add = graph.add_node(add);
        graph.attach_child(tree, add).unwrap();

        Fixture {
            session: PlaySession::new(graph).with_clock(Arc::new(ManualClock::new())),
            scene,
            object,
            counter,
            tree,
        }
    }

    fn counter(session: &PlaySession, id: NodeId) -> f32 {
        session.graph().node(id).unwrap().property("value")
    }

    #[test]
    fn test_start_rejects_bad_targets() {
        let mut f = fixture();
        assert!(matches!(
            f.session.start(NodeId::new()),
            Err(SessionError::TargetNotFound(_))
        ));
        assert!(matches!(f.session.start(f.tree), Err(SessionError::NotARoot(_))));
        assert!(matches!(f.session.tick(), Err(SessionError::NotPlaying)));

        f.session.start(f.scene).unwrap();
        assert!(matches!(f.session.start(f.scene), Err(SessionError::AlreadyPlaying)));
    }

    #[test]
    fn test_ticks_run_instance_trees() {
        let mut f = fixture();
        f.session.start(f.scene).unwrap();
        assert_eq!(f.session.runners().len(), 2);

        for frame in 1..=3 {
            let report = f.session.tick().unwrap();
            assert_eq!(report.frame, frame);
            assert_eq!(report.trees.len(), 1);
            assert_eq!(report.trees[0].name, "Counter");
            assert_eq!(report.trees[0].result, PlayResult::Success);
        }
        assert_eq!(counter(&f.session, f.counter), 3.0);
    }

    #[test]
    fn test_stop_restores_transforms_and_defaults() {
        let mut f = fixture();
        f.session.start(f.scene).unwrap();
        for _ in 0..10 {
            f.session.tick().unwrap();
        }
        let object = f.session.graph().node(f.object).unwrap();
        assert!(object.property("posY") < 5.0);
        assert!(f.session.world().body(f.object).is_some());

        assert!(f.session.stop());
        assert!(!f.session.stop());
        let object = f.session.graph().node(f.object).unwrap();
        assert_eq!(object.property("posY"), 5.0);
        assert!(!object.properties.contains_key("copy_posY"));
        assert_eq!(counter(&f.session, f.counter), 0.0);
        assert!(f.session.world().is_empty());
    }

    #[test]
    fn test_update_runs_fixed_steps() {
        let mut f = fixture();
        f.session.start(f.scene).unwrap();

        assert_eq!(f.session.update(1.0, 0.25).unwrap().len(), 4);
        assert_eq!(f.session.update(10.0, 0.25).unwrap().len(), 8);
        assert_eq!(f.session.frame_count, 12);

        f.session.set_time_scale(0.0);
        assert!(f.session.update(1.0, 0.25).unwrap().is_empty());
        f.session.set_time_scale(50.0);
        assert_eq!(f.session.time_scale, 10.0);
    }

    #[test]
    fn test_pause_and_step() {
        let mut f = fixture();
        f.session.start(f.scene).unwrap();
        assert!(f.session.pause());
        assert_eq!(f.session.state(), PlayState::Paused);
        assert!(f.session.update(1.0, 0.25).unwrap().is_empty());

        let report = f.session.step_frame(0.25).unwrap();
        assert_eq!(report.map(|r| r.frame), Some(1));
        assert!(f.session.resume());
        assert_eq!(f.session.step_frame(0.25).unwrap(), None);
    }

    #[test]
    fn test_scene_finished_stops_the_session() {
        let mut f = fixture();
        let graph = f.session.graph_mut();
        let tree = graph.add_owned_node(f.scene, Node::new(NodeKind::BehaviorTree));
        let key = graph.add_node(
            Node::new(NodeKind::Leaf(LeafKind::KeyDown)).with_property("keyCode", 13.0),
        );
        let finished = graph.add_node(Node::new(NodeKind::Leaf(LeafKind::SceneFinished)));
        let gate = graph.add_node(Node::new(NodeKind::Sequence));
        graph.attach_child(tree, gate).unwrap();
        graph.attach_child(gate, key).unwrap();
        graph.attach_child(gate, finished).unwrap();

        f.session.start(f.scene).unwrap();
        assert!(!f.session.tick().unwrap().stop_requested);

        f.session.input().write().apply(InputEvent::KeyDown(13));
        let report = f.session.tick().unwrap();
        assert!(report.stop_requested);
        assert_eq!(f.session.state(), PlayState::Stopped);
    }

    #[test]
    fn test_startup_trees_fire_once_on_start() {
        let mut f = fixture();
        let graph = f.session.graph_mut();
        graph
            .node_mut(f.tree)
            .unwrap()
            .set_property("status", ExecutionMode::OnStartup.to_property());

        f.session.start(f.object).unwrap();
        assert_eq!(counter(&f.session, f.counter), 1.0);
        assert!(f.session.tick().unwrap().trees.is_empty());
        assert_eq!(counter(&f.session, f.counter), 1.0);
    }
}
