// SPDX-License-Identifier: MIT OR Apache-2.0
//! Behavior tree runtime.
//!
//! Evaluation walks the graph from a `BehaviorTree` node down its Bottom
//! terminals. Composite nodes fold their children's results, leaf nodes read
//! or write shared state and report a [`PlayResult`] directly. Nodes that
//! span several ticks park their state in the [`BehaviorTreeRoot`] async
//! ledger and are polled by the driver before the trees run.
//!
//! - [`execute`]: the single dispatch entry for every node kind
//! - [`RootRunner`]: one execution root (object, scene or game) and its trees
//! - [`SceneRun`]: a scene and all of its instances playing together

mod actions;
mod animate;
mod composite;
mod conditions;
mod context;
mod execute;
mod root;
mod runner;
mod scene_play;

pub use animate::AnimateState;
pub use context::{ExecutionContext, PlayEvents};
pub use execute::{execute, execute_async, finish_execution};
pub use root::{AsyncState, BehaviorTreeRoot};
pub use runner::{RootRunner, SceneRun};

use serde::{Deserialize, Serialize};

/// Outcome of evaluating a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayResult {
    /// The condition held or the action completed
    Success,
    /// The condition did not hold or the action could not run
    Failure,
    /// The node needs more ticks
    Running,
    /// Not evaluated since the last reset
    #[default]
    Unused,
}

impl PlayResult {
    /// Returns `true` if this result is `Success`
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, PlayResult::Success)
    }

    /// Returns `true` if this result is `Failure`
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, PlayResult::Failure)
    }

    /// Returns `true` if this result is `Running`
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, PlayResult::Running)
    }

    /// Swap `Success` and `Failure`; other values pass through
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            PlayResult::Success => PlayResult::Failure,
            PlayResult::Failure => PlayResult::Success,
            other => other,
        }
    }

    /// `Success` when `condition` holds, `Failure` otherwise
    #[inline]
    pub fn from_bool(condition: bool) -> Self {
        if condition {
            PlayResult::Success
        } else {
            PlayResult::Failure
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;
