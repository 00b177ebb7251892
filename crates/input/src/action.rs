use serde::{Deserialize, Serialize};

/// A logical action the player can request during one tick.
///
/// The player and the game session consume actions, never raw key codes, so
/// bindings can change without touching simulation logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    LookUp,
    LookDown,
    LookLeft,
    LookRight,
    /// Clear the targeted block.
    RemoveBlock,
    /// Place a block against the targeted face.
    PlaceBlock,
    /// End the session.
    Quit,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::LookUp,
        Action::LookDown,
        Action::LookLeft,
        Action::LookRight,
        Action::RemoveBlock,
        Action::PlaceBlock,
        Action::Quit,
    ];

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Snapshot of which actions are active this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InputState {
    bits: u16,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        let mut state = Self::new();
        for action in actions {
            state.press(action);
        }
        state
    }

    pub fn press(&mut self, action: Action) {
        self.bits |= action.bit();
    }

    pub fn release(&mut self, action: Action) {
        self.bits &= !action.bit();
    }

    pub fn is_active(&self, action: Action) -> bool {
        self.bits & action.bit() != 0
    }

    /// True if no action is active.
    pub fn is_idle(&self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Active actions in [`Action::ALL`] order.
    pub fn active(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.is_active(*a))
    }
}
