//! Raw input accumulation: key bindings, held keys, and the per-frame
//! [`InputSnapshot`] the controller consumes.

use bevy_input::keyboard::KeyCode;
use bevy_math::prelude::*;
use bevy_platform::collections::HashSet;
use bevy_reflect::prelude::*;

use super::touch::TouchGestures;

/// Key bindings for the four logical movement directions.
///
/// Each direction carries two synonyms, a letter key and an arrow key, and is
/// active while *any* of its bound keys is held. Keys outside the table are
/// ignored.
#[derive(Debug, Clone, Reflect)]
pub struct Keymap {
    /// Keys that move along the view direction.
    pub forward: [KeyCode; 2],
    /// Keys that move against the view direction.
    pub back: [KeyCode; 2],
    /// Keys that strafe left.
    pub left: [KeyCode; 2],
    /// Keys that strafe right.
    pub right: [KeyCode; 2],
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            forward: [KeyCode::KeyW, KeyCode::ArrowUp],
            back: [KeyCode::KeyS, KeyCode::ArrowDown],
            left: [KeyCode::KeyA, KeyCode::ArrowLeft],
            right: [KeyCode::KeyD, KeyCode::ArrowRight],
        }
    }
}

impl Keymap {
    fn binds(&self, key: KeyCode) -> bool {
        self.forward.contains(&key)
            || self.back.contains(&key)
            || self.left.contains(&key)
            || self.right.contains(&key)
    }
}

/// Normalized intent for one frame, produced by
/// [`InputState::take_snapshot`] and consumed exactly once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// Movement along the flattened view direction, in `[-1, 1]`.
    pub move_forward: f32,
    /// Strafe movement, in `[-1, 1]`.
    pub move_right: f32,
    /// Look rotation for this frame, radians: `x` is yaw, `y` is pitch.
    pub look_delta: Vec2,
    /// Zoom input accumulated since the previous tick.
    pub zoom_delta: f32,
}

/// Accumulates raw input events between frames.
///
/// Event handlers write this state; the controller reads it once per tick
/// through [`take_snapshot`](Self::take_snapshot), which drains the pending
/// look and zoom deltas. Held keys and the joystick offset persist for as
/// long as their source input does.
#[derive(Debug, Clone, Default, Reflect)]
pub struct InputState {
    /// Movement key bindings.
    pub keymap: Keymap,
    /// Touch gesture recognition state.
    pub touch: TouchGestures,
    #[reflect(ignore)]
    held: HashSet<KeyCode>,
    look: Vec2,
    zoom: f32,
    stick: Option<Vec2>,
}

impl InputState {
    /// Record a key press. Unbound keys are ignored.
    pub fn key_down(&mut self, key: KeyCode) {
        if self.keymap.binds(key) {
            self.held.insert(key);
        }
    }

    /// Record a key release.
    pub fn key_up(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Add a look rotation, radians, to the pending per-frame delta.
    pub fn add_look(&mut self, delta: Vec2) {
        self.look += delta;
    }

    /// Add a zoom amount to the pending per-frame delta.
    pub fn add_zoom(&mut self, delta: f32) {
        self.zoom += delta;
    }

    /// Replace the joystick offset, normalized to `[-1, 1]` per axis.
    pub fn set_stick(&mut self, offset: Option<Vec2>) {
        self.stick = offset;
    }

    /// The current joystick offset, if a joystick touch is active.
    pub fn joystick(&self) -> Option<Vec2> {
        self.stick
    }

    /// Is there look input waiting to be consumed?
    pub fn look_pending(&self) -> bool {
        self.look != Vec2::ZERO
    }

    /// Discard all transient state: held keys, pending deltas, the joystick,
    /// and touch baselines. Bindings and layout settings are kept.
    pub fn reset(&mut self) {
        self.held.clear();
        self.look = Vec2::ZERO;
        self.zoom = 0.0;
        self.stick = None;
        self.touch.clear();
    }

    /// Combine held keys, the joystick, and pending deltas into this frame's
    /// intent. Pending look and zoom deltas are cleared by the take, so each
    /// is consumed exactly once.
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        let mut move_forward = axis(
            self.any_held(&self.keymap.forward),
            self.any_held(&self.keymap.back),
        );
        let mut move_right = axis(
            self.any_held(&self.keymap.right),
            self.any_held(&self.keymap.left),
        );
        if let Some(stick) = self.stick {
            // Screen-space joystick offsets mirror the keyboard convention:
            // up on the stick is along +forward, so down and right negate.
            move_forward -= stick.y;
            move_right -= stick.x;
        }
        InputSnapshot {
            move_forward: move_forward.clamp(-1.0, 1.0),
            move_right: move_right.clamp(-1.0, 1.0),
            look_delta: core::mem::take(&mut self.look),
            zoom_delta: core::mem::take(&mut self.zoom),
        }
    }

    fn any_held(&self, keys: &[KeyCode; 2]) -> bool {
        keys.iter().any(|key| self.held.contains(key))
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i8 - negative as i8) as f32
}
