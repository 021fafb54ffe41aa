// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyboard and mouse state read by condition nodes.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Input state shared between the host and a running session
pub type SharedInput = Arc<RwLock<InputState>>;

/// A single input change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Key with the given code pressed
    KeyDown(u32),
    /// Key with the given code released
    KeyUp(u32),
    /// Primary button pressed at a position (y grows downward)
    MouseDown(f32, f32),
    /// Primary button released
    MouseUp,
}

/// Current keyboard and mouse state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Codes of keys currently held
    pub keys_down: BTreeSet<u32>,
    /// Whether the primary button is held
    pub mouse_down: bool,
    /// Position of the last press
    pub mouse_down_pos: [f32; 2],
}

impl InputState {
    /// Create a new shared input state
    pub fn shared() -> SharedInput {
        Arc::new(RwLock::new(Self::default()))
    }

    /// Apply an input change
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(code) => {
                self.keys_down.insert(code);
            }
            InputEvent::KeyUp(code) => {
                self.keys_down.remove(&code);
            }
            InputEvent::MouseDown(x, y) => {
                self.mouse_down = true;
                self.mouse_down_pos = [x, y];
            }
            InputEvent::MouseUp => self.mouse_down = false,
        }
    }

    /// Whether a key is held
    pub fn is_key_down(&self, code: u32) -> bool {
        self.keys_down.contains(&code)
    }

    /// The press position in scene space (y grows upward), if the button is held
    pub fn scene_click(&self) -> Option<[f32; 2]> {
        self.mouse_down
            .then_some([self.mouse_down_pos[0], -self.mouse_down_pos[1]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_events() {
        let input = InputState::shared();
        input.write().apply(InputEvent::KeyDown(32));
        input.write().apply(InputEvent::MouseDown(4.0, 6.0));

        let state = input.read().clone();
        assert!(state.is_key_down(32));
        assert_eq!(state.scene_click(), Some([4.0, -6.0]));

        input.write().apply(InputEvent::KeyUp(32));
        input.write().apply(InputEvent::MouseUp);
        assert!(!input.read().is_key_down(32));
        assert_eq!(input.read().scene_click(), None);
    }
}
