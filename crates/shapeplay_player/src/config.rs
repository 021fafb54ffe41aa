// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player configuration.
//!
//! The config is a RON file naming the graph document to play, the root
//! node to start, how long to run and which input to inject at which tick.

use crate::error::PlayerError;
use serde::{Deserialize, Serialize};
use shapeplay_graph::InputEvent;
use std::path::{Path, PathBuf};

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Default tracing directives when neither `RUST_LOG` nor the config set one
pub const DEFAULT_LOG_FILTER: &str = "shapeplay_player=info,shapeplay_graph=info";

/// How tick reports are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportFormat {
    /// One line per tick
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// An input event injected before a given tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    /// Tick the event is applied before, starting at 1
    pub tick: u64,
    /// The event
    pub event: InputEvent,
}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Format version
    pub version: u32,
    /// Graph document path, relative to the config file
    pub graph: PathBuf,
    /// Name of the game, scene or object node to play
    pub play_target: String,
    /// Number of frames to run
    pub ticks: u64,
    /// Fixed timestep in seconds
    pub fixed_timestep: f64,
    /// Simulation speed multiplier
    pub time_scale: f32,
    /// Seed for random directions
    pub seed: u64,
    /// Tracing directives, overridden by `RUST_LOG`
    pub log_filter: Option<String>,
    /// Input injected during the run
    pub input_script: Vec<ScriptedInput>,
    /// Report format
    pub report: ReportFormat,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            graph: PathBuf::from("graph.ron"),
            play_target: "Scene".to_string(),
            ticks: 60,
            fixed_timestep: 1.0 / 60.0,
            time_scale: 1.0,
            seed: 0,
            log_filter: None,
            input_script: Vec::new(),
            report: ReportFormat::Text,
        }
    }
}

impl PlayerConfig {
    /// Parse a config from RON text
    pub fn from_ron(content: &str) -> Result<Self, PlayerError> {
        let config: PlayerConfig = ron::from_str(content)?;

        if config.version > CONFIG_FORMAT_VERSION {
            return Err(PlayerError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, PlayerError> {
        let content = std::fs::read_to_string(path).map_err(|e| PlayerError::io(path, e))?;
        Self::from_ron(&content)
    }

    /// Save the config to a file
    pub fn save(&self, path: &Path) -> Result<(), PlayerError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content).map_err(|e| PlayerError::io(path, e))
    }

    /// Graph path resolved against the directory holding the config
    pub fn graph_path(&self, config_path: &Path) -> PathBuf {
        match config_path.parent() {
            Some(dir) if self.graph.is_relative() => dir.join(&self.graph),
            _ => self.graph.clone(),
        }
    }

    /// Events scheduled for a tick, in file order
    pub fn events_for(&self, tick: u64) -> impl Iterator<Item = InputEvent> + '_ {
        self.input_script
            .iter()
            .filter(move |s| s.tick == tick)
            .map(|s| s.event)
    }
}
