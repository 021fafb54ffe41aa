// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sample graph and config written by `shapeplay demo`.
//!
//! A ball falls in a scene. Holding space counts jumps on the ball's tree;
//! the scene finishes once three jumps were counted.

use crate::config::{PlayerConfig, ReportFormat, ScriptedInput};
use crate::error::PlayerError;
use shapeplay_graph::{
    ExecutionMode, Graph, GraphDocument, InputEvent, LeafKind, Node, NodeId, NodeKind,
};
use std::path::{Path, PathBuf};

/// Name of the demo scene node
pub const SCENE_NAME: &str = "Demo Scene";
/// Name of the ball's tree
pub const JUMP_TREE: &str = "Jump";
/// Key code that counts a jump
pub const JUMP_KEY: u32 = 32;

fn leaf(kind: LeafKind) -> Node {
    Node::new(NodeKind::Leaf(kind))
}

fn bound(mut node: Node, target: NodeId) -> Node {
    node.set_ui_target(0, None, Some(target));
    node
}

/// Build the demo graph
pub fn graph() -> Graph {
    let mut graph = Graph::new("Demo");
    let scene = graph.add_node(Node::new(NodeKind::Scene).with_name(SCENE_NAME));
    let ball = graph.add_node(
        Node::new(NodeKind::Object)
            .with_name("Ball")
            .with_property("posY", 10.0)
            .with_property("diskRadius", 1.0),
    );
    graph.add_instance(scene, ball);

    let jumps = graph.add_owned_node(scene, Node::new(NodeKind::FloatVariable).with_name("Jumps"));
    let fade = graph.add_owned_node(scene, Node::new(NodeKind::FloatVariable).with_name("Fade"));

    // Ball: count a jump every tick the key is held
    let jump_tree =
        graph.add_owned_node(ball, Node::new(NodeKind::BehaviorTree).with_name(JUMP_TREE));
    let jump = graph.add_node(Node::new(NodeKind::Sequence));
    let key = graph.add_node(leaf(LeafKind::KeyDown).with_property("keyCode", JUMP_KEY as f32));
    let count = graph.add_node(bound(leaf(LeafKind::AddConstFloatVariable), jumps));

    // Scene: fade in once, finish after three jumps
    let fade_tree = graph.add_owned_node(
        scene,
        Node::new(NodeKind::BehaviorTree)
            .with_name("Fade In")
            .with_property("status", ExecutionMode::OnStartup.to_property()),
    );
    let fade_in = graph.add_node(bound(
        leaf(LeafKind::AnimateFloatVariable).with_property("to", 1.0),
        fade,
    ));
    let finish_tree =
        graph.add_owned_node(scene, Node::new(NodeKind::BehaviorTree).with_name("Finish"));
    let finish = graph.add_node(Node::new(NodeKind::Sequence));
    let enough = graph.add_node(bound(
        leaf(LeafKind::TestFloatVariable)
            .with_property("mode", 2.0)
            .with_property("value", 2.0),
        jumps,
    ));
    let finished = graph.add_node(leaf(LeafKind::SceneFinished));

    let links = [
        (jump_tree, jump),
        (jump, key),
        (jump, count),
        (fade_tree, fade_in),
        (finish_tree, finish),
        (finish, enough),
        (finish, finished),
    ];
    for (parent, child) in links {
        if let Err(e) = graph.attach_child(parent, child) {
            tracing::warn!("Demo link rejected: {e}");
        }
    }
    graph
}

/// A config that holds the jump key long enough to finish the scene
pub fn config(graph_file: &str) -> PlayerConfig {
    PlayerConfig {
        graph: PathBuf::from(graph_file),
        play_target: SCENE_NAME.to_string(),
        ticks: 120,
        input_script: vec![
            ScriptedInput {
                tick: 30,
                event: InputEvent::KeyDown(JUMP_KEY),
            },
            ScriptedInput {
                tick: 40,
                event: InputEvent::KeyUp(JUMP_KEY),
            },
        ],
        report: ReportFormat::Text,
        ..Default::default()
    }
}

/// Write `demo.ron` and `player.ron` into `dir`; returns the config path
pub fn write(dir: &Path) -> Result<PathBuf, PlayerError> {
    std::fs::create_dir_all(dir).map_err(|e| PlayerError::io(dir, e))?;

    let graph_path = dir.join("demo.ron");
    GraphDocument::new(graph()).save(&graph_path)?;

    let config_path = dir.join("player.ron");
    config("demo.ron").save(&config_path)?;
    tracing::info!(path = %config_path.display(), "Wrote demo");
    Ok(config_path)
}
