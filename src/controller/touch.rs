//! Touch gesture recognition: a virtual joystick, drag-to-look, and
//! pinch-to-zoom, folded into the controller's per-frame intent.

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// A single active touch point, in logical window coordinates (origin top
/// left, `y` growing downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Stable identifier of the touch for its whole press-move-release life.
    pub id: u64,
    /// Current position of the touch.
    pub position: Vec2,
}

impl TouchPoint {
    /// Convenience constructor.
    pub fn new(id: u64, position: Vec2) -> Self {
        Self { id, position }
    }
}

/// How raw touches are assigned to gestures. Selected once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum TouchLayout {
    /// The screen is split in half: touches on the left half drive a movement
    /// joystick, touches on the right half rotate the view, and two touches
    /// on the right half pinch-zoom.
    #[default]
    SplitScreen,
    /// Touch count alone decides: one finger rotates the view, two fingers
    /// pinch-zoom. No movement joystick.
    DragAndPinch,
}

impl TouchLayout {
    fn max_touches(&self) -> usize {
        match self {
            // One joystick finger plus a two-finger pinch.
            TouchLayout::SplitScreen => 3,
            TouchLayout::DragAndPinch => 2,
        }
    }
}

/// What a tracked touch is currently driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
enum TouchRole {
    Stick,
    Look,
}

#[derive(Debug, Clone, Copy, Reflect)]
struct TrackedTouch {
    id: u64,
    role: TouchRole,
    origin: Vec2,
    last: Vec2,
}

/// Deltas produced by one batch of touch movement, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureDeltas {
    /// Frame-to-frame drag of the look touch.
    pub look: Vec2,
    /// Change of the inter-finger distance since the previous pinch sample.
    pub pinch: f32,
}

/// Gesture state for touch input.
///
/// Look deltas are frame-to-frame: the baseline rebases to the new touch
/// position on every move, so identical drags produce identical deltas
/// regardless of where the gesture started. The joystick instead reports a
/// continuous offset from its start point while the finger is down. All
/// baselines clear when the last finger lifts; touch batches larger than the
/// layout supports are absorbed by clearing the baselines so the next touch
/// starts fresh.
#[derive(Debug, Clone, Reflect)]
pub struct TouchGestures {
    /// Gesture assignment policy.
    pub layout: TouchLayout,
    /// Radius, in pixels, at which the joystick offset saturates.
    pub stick_radius: f32,
    tracked: Vec<TrackedTouch>,
    prev_spread: Option<f32>,
}

impl Default for TouchGestures {
    fn default() -> Self {
        Self {
            layout: TouchLayout::default(),
            stick_radius: 64.0,
            tracked: Vec::new(),
            prev_spread: None,
        }
    }
}

impl TouchGestures {
    /// Seed gesture baselines for newly-pressed touches. `touches` is the
    /// full list of currently-active points.
    pub fn begin(&mut self, touches: &[TouchPoint], viewport: Vec2) {
        if touches.is_empty() || touches.len() > self.layout.max_touches() {
            self.clear();
            return;
        }
        self.tracked
            .retain(|t| touches.iter().any(|p| p.id == t.id));
        for point in touches {
            if self.tracked.iter().any(|t| t.id == point.id) {
                continue;
            }
            let role = match self.layout {
                TouchLayout::SplitScreen if point.position.x < viewport.x * 0.5 => TouchRole::Stick,
                _ => TouchRole::Look,
            };
            let capacity = match role {
                TouchRole::Stick => 1,
                TouchRole::Look => 2,
            };
            if self.count(role) >= capacity {
                continue;
            }
            self.tracked.push(TrackedTouch {
                id: point.id,
                role,
                origin: point.position,
                last: point.position,
            });
        }
        self.reseed_spread();
    }

    /// Fold a batch of touch movement into look/pinch deltas, rebasing the
    /// baselines. Untracked ids are ignored.
    pub fn moved(&mut self, touches: &[TouchPoint]) -> GestureDeltas {
        let mut deltas = GestureDeltas::default();
        if touches.is_empty() {
            return deltas;
        }
        if touches.len() > self.layout.max_touches() {
            self.clear();
            return deltas;
        }
        let look_count = self.count(TouchRole::Look);
        for point in touches {
            let Some(tracked) = self.tracked.iter_mut().find(|t| t.id == point.id) else {
                continue;
            };
            if tracked.role == TouchRole::Look && look_count == 1 {
                deltas.look += point.position - tracked.last;
            }
            tracked.last = point.position;
        }
        if look_count == 2 {
            let spread = self.spread();
            if let (Some(spread), Some(prev)) = (spread, self.prev_spread) {
                deltas.pinch = spread - prev;
            }
            self.prev_spread = spread;
        }
        deltas
    }

    /// Drop tracking for lifted touches. `touches` is the list of points that
    /// remain active; when it is empty every baseline clears so stale intent
    /// cannot outlive the gesture.
    pub fn ended(&mut self, touches: &[TouchPoint]) {
        if touches.is_empty() {
            self.clear();
            return;
        }
        self.tracked
            .retain(|t| touches.iter().any(|p| p.id == t.id));
        self.reseed_spread();
    }

    /// Discard all tracked touches and baselines.
    pub fn clear(&mut self) {
        self.tracked.clear();
        self.prev_spread = None;
    }

    /// Current joystick offset, normalized so the stick radius maps to length
    /// one. `None` while no joystick touch is active.
    pub fn stick_offset(&self) -> Option<Vec2> {
        self.tracked
            .iter()
            .find(|t| t.role == TouchRole::Stick)
            .map(|t| ((t.last - t.origin) / self.stick_radius.max(1.0)).clamp_length_max(1.0))
    }

    fn count(&self, role: TouchRole) -> usize {
        self.tracked.iter().filter(|t| t.role == role).count()
    }

    fn spread(&self) -> Option<f32> {
        let mut looks = self.tracked.iter().filter(|t| t.role == TouchRole::Look);
        let (a, b) = (looks.next()?, looks.next()?);
        Some((a.last - b.last).length())
    }

    fn reseed_spread(&mut self) {
        self.prev_spread = (self.count(TouchRole::Look) == 2)
            .then(|| self.spread())
            .flatten();
    }
}
