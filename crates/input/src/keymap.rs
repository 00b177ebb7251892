use std::collections::HashMap;

use crate::{Action, InputState};

/// Character key bindings.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<char, Action>,
}

impl Default for KeyMap {
    /// `i/k/j/l` move, `w/s/a/d` look, `x` removes, space places, `q` quits.
    fn default() -> Self {
        let mut map = Self::empty();
        for (key, action) in [
            ('i', Action::MoveForward),
            ('k', Action::MoveBackward),
            ('j', Action::StrafeLeft),
            ('l', Action::StrafeRight),
            ('w', Action::LookUp),
            ('s', Action::LookDown),
            ('a', Action::LookLeft),
            ('d', Action::LookRight),
            ('x', Action::RemoveBlock),
            (' ', Action::PlaceBlock),
            ('q', Action::Quit),
            ('Q', Action::Quit),
        ] {
            map.bind(key, action);
        }
        map
    }
}

impl KeyMap {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `key` to `action`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: char, action: Action) {
        self.bindings.insert(key, action);
    }

    pub fn action_for(&self, key: char) -> Option<Action> {
        self.bindings.get(&key).copied()
    }

    /// Fold a batch of pending keys into one tick's snapshot. Unbound keys are ignored.
    pub fn snapshot(&self, keys: impl IntoIterator<Item = char>) -> InputState {
        let mut state = InputState::new();
        for key in keys {
            match self.action_for(key) {
                Some(action) => state.press(action),
                None => tracing::trace!(?key, "unbound key"),
            }
        }
        state
    }

    /// Keys bound to `action`, sorted.
    pub fn keys_for(&self, action: Action) -> Vec<char> {
        let mut keys: Vec<char> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect();
        keys.sort_unstable();
        keys
    }
}
