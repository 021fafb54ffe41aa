// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless playback of a graph document.

use crate::config::PlayerConfig;
use crate::error::PlayerError;
use serde::Serialize;
use shapeplay_graph::{Graph, ManualClock, NodeId, PlaySession, TickReport};
use std::sync::Arc;

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct PlayReport {
    /// Name of the played node
    pub target: String,
    /// Frames actually run
    pub frames: u64,
    /// Whether a `SceneFinished` ended the run early
    pub finished: bool,
    /// Per tick reports
    pub ticks: Vec<TickReport>,
}

/// Find the root node to play by name
pub fn find_target(graph: &Graph, name: &str) -> Result<NodeId, PlayerError> {
    graph
        .nodes_by_name(name)
        .find(|n| n.kind.is_root())
        .map(|n| n.id)
        .ok_or_else(|| PlayerError::TargetNotFound(name.to_string()))
}

/// Play `graph` according to `config`.
///
/// Time is simulated: the clock moves by one scaled fixed timestep per
/// frame, so async nodes behave the same on every run.
pub fn play(graph: Graph, config: &PlayerConfig) -> Result<PlayReport, PlayerError> {
    let target = find_target(&graph, &config.play_target)?;
    let clock = ManualClock::new();
    let mut session = PlaySession::new(graph)
        .with_clock(Arc::new(clock.clone()))
        .with_seed(config.seed);
    session.set_time_scale(config.time_scale);
    session.start(target)?;

    let input = session.input();
    let step_ms = config.fixed_timestep * 1000.0 * f64::from(session.time_scale);
    let mut ticks = Vec::new();
    let mut finished = false;

    for frame in 1..=config.ticks {
        for event in config.events_for(frame) {
            tracing::debug!(frame, ?event, "Injected input");
            input.write().apply(event);
        }
        clock.advance(step_ms);

        let reports = session.update(config.fixed_timestep, config.fixed_timestep)?;
        finished = reports.iter().any(|r| r.stop_requested);
        ticks.extend(reports);
        if finished {
            break;
        }
    }

    let frames = session.frame_count;
    session.stop();
    tracing::info!(frames, finished, "Playback complete");

    Ok(PlayReport {
        target: config.play_target.clone(),
        frames,
        finished,
        ticks,
    })
}
