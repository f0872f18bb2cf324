//! Provides [`RoomBounds`], the axis-aligned volume the camera may occupy.

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// The interior volume of the room, as an axis-aligned box.
///
/// The camera's position is clamped against this box every frame, which is the
/// only form of collision the controller performs. Out-of-bounds positions are
/// corrected silently rather than reported.
///
/// Construct with [`RoomBounds::new`], which normalizes the corners so that
/// `min <= max` holds on every axis. The bounds are never mutated by the
/// controller after construction.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct RoomBounds {
    /// Lowest corner of the interior volume.
    pub min: Vec3,
    /// Highest corner of the interior volume.
    pub max: Vec3,
}

impl Default for RoomBounds {
    fn default() -> Self {
        // A 20x20 room with half a meter of margin from the walls, floor, and
        // ceiling, matching the default gallery scene.
        Self::new(Vec3::new(-9.5, 0.5, -9.5), Vec3::new(9.5, 5.5, 9.5))
    }
}

impl RoomBounds {
    /// Create bounds from two opposite corners, in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Clamp a point onto the interior volume on all three axes.
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Clamp a point against the walls only (`x` and `z`), leaving `y`
    /// untouched. Used when the vertical axis is governed by a
    /// [`HeightPolicy`](super::component::HeightPolicy) instead.
    pub fn clamp_horizontal(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y,
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Does the volume contain this point?
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_normalize() {
        let bounds = RoomBounds::new(Vec3::new(5.0, -1.0, 2.0), Vec3::new(-5.0, 1.0, -2.0));
        assert_eq!(bounds.min, Vec3::new(-5.0, -1.0, -2.0));
        assert_eq!(bounds.max, Vec3::new(5.0, 1.0, 2.0));
    }

    #[test]
    fn clamp_is_exact_at_the_wall() {
        let bounds = RoomBounds::default();
        let clamped = bounds.clamp(Vec3::new(11.2, 1.6, -42.0));
        assert_eq!(clamped, Vec3::new(9.5, 1.6, -9.5));
        // Interior points pass through untouched.
        let inside = Vec3::new(0.25, 1.6, -3.0);
        assert_eq!(bounds.clamp(inside), inside);
    }

    #[test]
    fn horizontal_clamp_leaves_y_alone() {
        let bounds = RoomBounds::default();
        let clamped = bounds.clamp_horizontal(Vec3::new(-20.0, 99.0, 20.0));
        assert_eq!(clamped, Vec3::new(-9.5, 99.0, 9.5));
    }

    #[test]
    fn contains_matches_clamp() {
        let bounds = RoomBounds::default();
        assert!(bounds.contains(Vec3::new(0.0, 1.6, 0.0)));
        assert!(!bounds.contains(Vec3::new(0.0, 0.0, 0.0)));
        assert!(bounds.contains(bounds.clamp(Vec3::splat(100.0))));
    }
}
