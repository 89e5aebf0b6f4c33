//! Input Capture
//!
//! The input source hands the simulation a snapshot of held inputs once per
//! tick. Movement and actions are packed into a single bitset.

use serde::{Serialize, Deserialize};

// =============================================================================
// INPUT ACTIONS
// =============================================================================

/// A held-input identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move left
    Left,
    /// Move right
    Right,
    /// Jump (only from the ground)
    Jump,
    /// Light attack
    LightAttack,
    /// Heavy attack
    HeavyAttack,
    /// Raise shield
    Shield,
    /// Dash roll
    Dash,
}

impl InputAction {
    /// All actions, in flag-bit order.
    pub const ALL: [InputAction; 7] = [
        InputAction::Left,
        InputAction::Right,
        InputAction::Jump,
        InputAction::LightAttack,
        InputAction::HeavyAttack,
        InputAction::Shield,
        InputAction::Dash,
    ];

    /// Flag bit for this action.
    #[inline]
    pub const fn flag(self) -> u8 {
        match self {
            InputAction::Left => InputFrame::FLAG_LEFT,
            InputAction::Right => InputFrame::FLAG_RIGHT,
            InputAction::Jump => InputFrame::FLAG_JUMP,
            InputAction::LightAttack => InputFrame::FLAG_LIGHT,
            InputAction::HeavyAttack => InputFrame::FLAG_HEAVY,
            InputAction::Shield => InputFrame::FLAG_SHIELD,
            InputAction::Dash => InputFrame::FLAG_DASH,
        }
    }

    /// Default keyboard binding for a DOM `KeyboardEvent.code`.
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(InputAction::Left),
            "ArrowRight" | "KeyD" => Some(InputAction::Right),
            "Space" | "KeyW" => Some(InputAction::Jump),
            "KeyJ" => Some(InputAction::LightAttack),
            "KeyK" => Some(InputAction::HeavyAttack),
            "KeyL" => Some(InputAction::Shield),
            "ShiftLeft" | "ShiftRight" | "Shift" => Some(InputAction::Dash),
            _ => None,
        }
    }
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Inputs held during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Held action flags (packed bits, see `FLAG_*`)
    pub flags: u8,
}

impl InputFrame {
    /// Move left flag bit
    pub const FLAG_LEFT: u8 = 0x01;
    /// Move right flag bit
    pub const FLAG_RIGHT: u8 = 0x02;
    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x04;
    /// Light attack flag bit
    pub const FLAG_LIGHT: u8 = 0x08;
    /// Heavy attack flag bit
    pub const FLAG_HEAVY: u8 = 0x10;
    /// Shield flag bit
    pub const FLAG_SHIELD: u8 = 0x20;
    /// Dash flag bit
    pub const FLAG_DASH: u8 = 0x40;

    /// Create an empty frame (nothing held).
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Create a frame holding the given actions.
    pub fn with(actions: &[InputAction]) -> Self {
        let mut frame = Self::new();
        for &action in actions {
            frame.set(action, true);
        }
        frame
    }

    /// Build a frame from the DOM key codes currently held.
    /// Unbound keys are ignored.
    pub fn from_key_codes<'a, I>(codes: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut frame = Self::new();
        for code in codes {
            if let Some(action) = InputAction::from_key_code(code) {
                frame.set(action, true);
            }
        }
        frame
    }

    /// Check whether an action is held.
    #[inline]
    pub fn is_held(&self, action: InputAction) -> bool {
        self.flags & action.flag() != 0
    }

    /// Set or clear an action.
    #[inline]
    pub fn set(&mut self, action: InputAction, held: bool) {
        if held {
            self.flags |= action.flag();
        } else {
            self.flags &= !action.flag();
        }
    }

    /// Horizontal direction: -1, 0 or +1. Right wins when both are held.
    #[inline]
    pub fn horizontal(&self) -> f32 {
        if self.is_held(InputAction::Right) {
            1.0
        } else if self.is_held(InputAction::Left) {
            -1.0
        } else {
            0.0
        }
    }

    /// Check if this is an idle frame (nothing held).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }
}
