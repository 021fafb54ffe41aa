// SPDX-License-Identifier: MIT OR Apache-2.0
//! Behavior graphs for `ShapePlay` scenes.
//!
//! This crate provides:
//! - A node graph of games, scenes, objects and behavior trees
//! - Typed variable registers bound to object properties
//! - A tick-driven behavior tree runtime with multi-tick (async) nodes
//! - Play sessions and RON graph documents
//!
//! ## Architecture
//!
//! Nodes live in an arena keyed by [`NodeId`]. Terminals hold both halves of
//! every connection by id, and UI references are resolved into typed
//! [`Target`]s once per (re)wire. Evaluation dispatches on the closed
//! [`NodeKind`] enum and threads an explicit
//! [`ExecutionContext`](behavior::ExecutionContext) through every call.

pub mod behavior;
pub mod clock;
pub mod connection;
pub mod document;
pub mod graph;
pub mod input;
pub mod interpolation;
pub mod node;
pub mod session;
pub mod shape;
pub mod target;
pub mod terminal;
pub mod variables;
pub mod world;

pub use behavior::{BehaviorTreeRoot, PlayResult};
pub use clock::{Clock, ManualClock, SystemClock};
pub use connection::{Connection, ConnectionId};
pub use document::{DocumentError, GraphDocument};
pub use graph::{ConnectionError, Graph, GraphError};
pub use input::{InputEvent, InputState, SharedInput};
pub use node::{ExecutionMode, LeafKind, Node, NodeId, NodeKind, NodeRegistry};
pub use session::{PlaySession, PlayState, SessionError, TickReport};
pub use target::{Target, VariableRef};
pub use terminal::{Connector, Terminal, TerminalBrand, TerminalId};
