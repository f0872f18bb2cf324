//! Provides [`ZoomRange`] and [`DollyZoom`] settings.

use bevy_reflect::prelude::*;

/// Bounds for the accumulated zoom level.
///
/// The level is a distance-like quantity: zooming in lowers it toward
/// [`ZoomRange::min`], zooming out raises it toward [`ZoomRange::max`]. Pinch
/// or scroll input can never push the level outside this range.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ZoomRange {
    /// Closest the accumulated zoom level may reach.
    pub min: f32,
    /// Farthest the accumulated zoom level may reach.
    pub max: f32,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: 2.0, max: 15.0 }
    }
}

impl ZoomRange {
    /// Clamp a level onto the range.
    pub fn clamp(&self, level: f32) -> f32 {
        level.clamp(self.min.min(self.max), self.max.max(self.min))
    }
}

/// Accumulated zoom state, applied as a damped dolly along the view direction.
///
/// Pinch and scroll-wheel input move the accumulated [`level`](Self::level)
/// within its [`ZoomRange`]. Each frame the controller translates the camera
/// along its facing by a fraction (`damping`) of the offset that has not been
/// applied yet, so the dolly eases toward its target instead of jumping with
/// every input event.
#[derive(Debug, Clone, Reflect)]
pub struct DollyZoom {
    /// Limits on the accumulated zoom level.
    pub range: ZoomRange,
    /// The level at which the dolly is at rest. Levels below move the camera
    /// forward, levels above move it back.
    pub neutral: f32,
    /// Fraction of the remaining dolly offset applied per reference tick, in
    /// `(0, 1]`.
    pub damping: f32,
    level: f32,
    applied: f32,
}

impl Default for DollyZoom {
    fn default() -> Self {
        Self {
            range: ZoomRange::default(),
            neutral: 8.0,
            damping: 0.1,
            level: 8.0,
            applied: 0.0,
        }
    }
}

impl DollyZoom {
    /// Fold a zoom input into the accumulated level. Positive input zooms in.
    pub fn accumulate(&mut self, delta: f32) {
        if delta != 0.0 && delta.is_finite() {
            self.level = self.range.clamp(self.level - delta);
        }
    }

    /// The current accumulated zoom level.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Advance the damped dolly by `steps` reference ticks and return the
    /// distance to translate along the facing direction this frame.
    pub fn dolly_step(&mut self, steps: f32) -> f32 {
        let target = self.neutral - self.level;
        let remaining = target - self.applied;
        if remaining.abs() < 1e-4 {
            return 0.0;
        }
        let fraction = 1.0 - (1.0 - self.damping.clamp(0.0, 1.0)).powf(steps.max(0.0));
        let step = remaining * fraction;
        self.applied += step;
        step
    }
}
