use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Current input state for the window.
///
/// Holds "is down" information; per-frame transitions are recorded into
/// an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and
    /// writes transitions to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // On focus loss, clear the "down" set so keys held
                    // across a focus change do not stick.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            code: 0,
            repeat: false,
        }
    }

    fn release(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Released,
            code: 0,
            repeat: false,
        }
    }

    #[test]
    fn press_and_release_track_transitions() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(Key::Space));
        assert!(state.key_down(Key::Space));
        assert!(frame.keys_pressed.contains(&Key::Space));

        // A repeat press of a held key is not a new transition.
        frame.clear();
        state.apply_event(&mut frame, press(Key::Space));
        assert!(frame.keys_pressed.is_empty());

        state.apply_event(&mut frame, release(Key::Space));
        assert!(!state.key_down(Key::Space));
        assert!(frame.keys_released.contains(&Key::Space));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(Key::W));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.focused);
        assert!(!state.key_down(Key::W));
    }
}
