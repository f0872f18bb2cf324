//! The primary [`Component`] of the controller, [`GalleryCam`].

use std::{f32::consts::FRAC_PI_2, time::Duration};

use bevy_ecs::prelude::*;
use bevy_input::keyboard::KeyCode;
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_render::prelude::*;
use bevy_time::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::RequestRedraw;

use super::{
    bounds::RoomBounds,
    inputs::InputState,
    touch::{TouchLayout, TouchPoint},
    zoom::DollyZoom,
};

/// Ticks per second of the reference cadence that movement speed is measured
/// against. Hosts running at other rates are compensated by scaling with
/// elapsed time.
pub const REFERENCE_TICK_RATE: f32 = 60.0;

/// Margin kept between the pitch limits and straight up/down, so the facing
/// direction always has a usable horizontal component.
pub const GIMBAL_LOCK_EPSILON: f32 = 1e-3;

/// Tracks all state of a camera's controller, including its inputs, motion
/// settings, and room bounds.
///
/// See the documentation on the contained fields and types to learn more
/// about each setting.
///
/// # Moving the camera
///
/// The [`DefaultGalleryCamPlugins`](crate::DefaultGalleryCamPlugins) will
/// automatically feed keyboard, mouse, scroll, and touch input to the
/// controller for whichever [`ControlMode`](crate::input::ControlMode) was
/// selected at startup. To drive the camera manually instead, call
/// [`GalleryCam::key_down`]/[`key_up`](GalleryCam::key_up),
/// [`GalleryCam::send_look_input`], [`GalleryCam::send_zoom_input`], and the
/// [`GalleryCam::touch_start`]/[`touch_move`](GalleryCam::touch_move)/
/// [`touch_end`](GalleryCam::touch_end) family, then let
/// [`GalleryCam::update_camera_positions`] run as usual.
///
/// Every frame the controller integrates the pending intent into the entity's
/// [`Transform`] and clamps the result against [`RoomBounds`], so the camera
/// can never leave the room no matter what sequence of inputs arrives.
#[derive(Debug, Clone, Reflect, Component)]
pub struct GalleryCam {
    /// What input motions are currently allowed?
    pub enabled_motion: EnabledMotion,
    /// The volume the camera is confined to.
    pub bounds: RoomBounds,
    /// How the vertical axis is governed.
    pub height: HeightPolicy,
    /// Walk speed, in world units per reference tick.
    pub speed: f32,
    /// Input sensitivity of the camera.
    pub sensitivity: Sensitivity,
    /// Limits on the look pitch, radians.
    pub pitch_limits: PitchLimits,
    /// Accumulated zoom state, applied as a damped dolly.
    pub zoom: DollyZoom,
    /// Raw input state. Managed by the camera controller and its input
    /// plugin, though it is exposed publicly so overlays can read the
    /// joystick offset and manual integrations can feed it directly.
    pub input: InputState,
}

impl Default for GalleryCam {
    fn default() -> Self {
        Self {
            enabled_motion: EnabledMotion::default(),
            bounds: RoomBounds::default(),
            height: HeightPolicy::default(),
            speed: 0.3,
            sensitivity: Sensitivity::default(),
            pitch_limits: PitchLimits::default(),
            zoom: DollyZoom::default(),
            input: InputState::default(),
        }
    }
}

impl GalleryCam {
    /// Create a controller confined to the given bounds, with default
    /// settings otherwise.
    pub fn new(bounds: RoomBounds) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    /// Set the vertical-axis policy.
    pub fn with_height(mut self, height: HeightPolicy) -> Self {
        self.height = height;
        self
    }

    /// Set the walk speed, in world units per reference tick.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the touch gesture layout.
    pub fn with_touch_layout(mut self, layout: TouchLayout) -> Self {
        self.input.touch.layout = layout;
        self
    }

    /// Record a key press. Keys outside the movement bindings are ignored.
    pub fn key_down(&mut self, key: KeyCode) {
        if self.enabled_motion.walk {
            self.input.key_down(key);
        }
    }

    /// Record a key release.
    pub fn key_up(&mut self, key: KeyCode) {
        self.input.key_up(key);
    }

    /// Send a look input in pixels of pointer or touch motion. Scaled by
    /// [`Sensitivity::look`] and consumed on the next tick.
    pub fn send_look_input(&mut self, pixels: Vec2) {
        if self.enabled_motion.look {
            self.input
                .add_look(-pixels * self.sensitivity.look);
        }
    }

    /// Send a zoom input in pixels of pinch spread (or the scroll-wheel
    /// equivalent). Positive zooms in. Scaled by [`Sensitivity::zoom`].
    pub fn send_zoom_input(&mut self, amount: f32) {
        if self.enabled_motion.zoom {
            self.input.add_zoom(amount * self.sensitivity.zoom);
        }
    }

    /// Seed touch gesture baselines for newly-pressed touches. `touches` is
    /// the full active-touch list; `viewport` is the logical window size used
    /// to classify gesture zones.
    pub fn touch_start(&mut self, touches: &[TouchPoint], viewport: Vec2) {
        self.input.touch.begin(touches, viewport);
        let stick = self.input.touch.stick_offset();
        self.input.set_stick(stick);
    }

    /// Fold touch movement into look, zoom, and joystick intent.
    pub fn touch_move(&mut self, touches: &[TouchPoint]) {
        let deltas = self.input.touch.moved(touches);
        if deltas.look != Vec2::ZERO {
            self.send_look_input(deltas.look);
        }
        if deltas.pinch != 0.0 {
            self.send_zoom_input(deltas.pinch);
        }
        let stick = self.input.touch.stick_offset();
        self.input.set_stick(stick);
    }

    /// Drop tracking for lifted touches. `touches` is the list of points
    /// that remain active.
    pub fn touch_end(&mut self, touches: &[TouchPoint]) {
        self.input.touch.ended(touches);
        let stick = self.input.touch.stick_offset();
        self.input.set_stick(stick);
    }

    /// The current joystick offset, normalized to the unit disc, if a
    /// joystick touch is active. Exposed for on-screen overlays.
    pub fn joystick_offset(&self) -> Option<Vec2> {
        self.input.joystick()
    }

    /// The accumulated zoom level, within the configured
    /// [`ZoomRange`](super::zoom::ZoomRange).
    pub fn zoom_level(&self) -> f32 {
        self.zoom.level()
    }

    /// Is there look input waiting to be applied on the next tick?
    pub fn look_pending(&self) -> bool {
        self.input.look_pending()
    }

    /// Update transforms for all camera entities with a controller. Runs once
    /// per frame; entities without a [`Camera`] yet are skipped silently.
    pub fn update_camera_positions(
        mut cameras: Query<(&mut GalleryCam, &mut Transform), With<Camera>>,
        time: Res<Time>,
        mut redraw: EventWriter<RequestRedraw>,
    ) {
        for (mut controller, mut transform) in &mut cameras {
            if controller.update_transform(&mut transform, time.delta()) {
                redraw.write(RequestRedraw);
            }
        }
    }

    /// Integrate this frame's intent into `transform` and clamp the result
    /// against the room bounds. Returns whether the pose changed.
    ///
    /// This consumes the pending input snapshot, so call it exactly once per
    /// frame when driving the controller manually.
    pub fn update_transform(&mut self, transform: &mut Transform, delta: Duration) -> bool {
        if !transform.translation.is_finite() || !transform.rotation.is_finite() {
            warn_once!("camera transform is not finite, skipping controller update");
            return false;
        }
        let snapshot = self.input.take_snapshot();
        let start = *transform;
        let steps = delta.as_secs_f32() * REFERENCE_TICK_RATE;

        if snapshot.look_delta != Vec2::ZERO {
            let (yaw, pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);
            let yaw = yaw + snapshot.look_delta.x;
            let pitch = self.pitch_limits.clamp(pitch + snapshot.look_delta.y);
            // Yaw about world up, then pitch about local right: composing in
            // this order keeps roll at zero.
            transform.rotation = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);
        }

        let facing = *transform.forward();
        let mut translation = transform.translation;

        if self.enabled_motion.walk {
            let heading = match self.height {
                // Walking stays level no matter where the camera looks.
                HeightPolicy::EyeLocked { .. } => {
                    Vec3::new(facing.x, 0.0, facing.z).try_normalize()
                }
                HeightPolicy::FreeFly => Some(facing),
            };
            if let Some(forward) = heading {
                let right = forward.cross(Vec3::Y).normalize_or_zero();
                let velocity = forward * snapshot.move_forward + right * snapshot.move_right;
                translation += velocity * self.speed * steps;
            }
        }

        self.zoom.accumulate(snapshot.zoom_delta);
        translation += facing * self.zoom.dolly_step(steps);

        translation = self.bounds.clamp_horizontal(translation);
        translation.y = match self.height {
            HeightPolicy::EyeLocked { eye_height } => eye_height,
            HeightPolicy::FreeFly => translation.y.clamp(self.bounds.min.y, self.bounds.max.y),
        };
        transform.translation = translation;

        transform.translation != start.translation || transform.rotation != start.rotation
    }
}

/// How the camera's vertical position is governed.
///
/// The two policies are behaviorally incompatible (one forbids flying, the
/// other allows it), so the choice is explicit rather than inferred:
/// [`EyeLocked`](HeightPolicy::EyeLocked) is the walking-simulation default,
/// [`FreeFly`](HeightPolicy::FreeFly) suits unconstrained inspection.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum HeightPolicy {
    /// The camera is pinned to a fixed eye height every frame, regardless of
    /// intent, and movement stays level.
    EyeLocked {
        /// Height of the camera above the floor plane, world units.
        eye_height: f32,
    },
    /// The camera may move vertically along its facing direction; its height
    /// is clamped to the vertical extent of the room bounds.
    FreeFly,
}

impl Default for HeightPolicy {
    fn default() -> Self {
        Self::EyeLocked { eye_height: 1.6 }
    }
}

/// The sensitivity of the camera controller to inputs.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct Sensitivity {
    /// Radians of yaw/pitch per pixel of look input, multiplied per axis.
    pub look: Vec2,
    /// Zoom level change per pixel of pinch spread, multiplied.
    pub zoom: f32,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            look: Vec2::splat(0.002),
            zoom: 0.01,
        }
    }
}

/// Inclusive limits on the look pitch, radians.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PitchLimits {
    /// Lowest allowed pitch (looking down).
    pub min: f32,
    /// Highest allowed pitch (looking up).
    pub max: f32,
}

impl PitchLimits {
    /// Create limits from two pitches, in any order.
    pub fn new(a: f32, b: f32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Limits reaching `half` radians both up and down.
    pub fn symmetric(half: f32) -> Self {
        Self::new(-half, half)
    }

    /// Clamp a pitch onto the limits.
    pub fn clamp(&self, pitch: f32) -> f32 {
        pitch.clamp(self.min, self.max)
    }
}

impl Default for PitchLimits {
    fn default() -> Self {
        Self::symmetric(FRAC_PI_2 - GIMBAL_LOCK_EPSILON)
    }
}

/// Controls what kinds of motions are allowed to initiate.
#[derive(Debug, Clone, Reflect)]
pub struct EnabledMotion {
    /// Should walking be enabled?
    pub walk: bool,
    /// Should look rotation be enabled?
    pub look: bool,
    /// Should zoom be enabled?
    pub zoom: bool,
}

impl Default for EnabledMotion {
    fn default() -> Self {
        Self {
            walk: true,
            look: true,
            zoom: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_nanos(16_666_667);

    fn camera_at(x: f32, y: f32, z: f32) -> Transform {
        // Default orientation faces -Z.
        Transform::from_xyz(x, y, z)
    }

    #[test]
    fn one_tick_of_forward_intent_moves_one_speed_unit() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(0.0, 1.6, 0.0);
        controller.key_down(KeyCode::KeyW);

        assert!(controller.update_transform(&mut transform, TICK));
        assert!((transform.translation.z + 0.3).abs() < 1e-5);
        assert_eq!(transform.translation.x, 0.0);
        assert_eq!(transform.translation.y, 1.6);
    }

    #[test]
    fn rightward_overshoot_clamps_to_the_wall_exactly() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(9.4, 1.6, 0.0);
        controller.key_down(KeyCode::KeyD);

        controller.update_transform(&mut transform, TICK);
        assert_eq!(transform.translation.x, 9.5);
    }

    #[test]
    fn position_stays_in_bounds_for_any_intent_sequence() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(0.0, 1.6, 0.0);
        let keys = [KeyCode::KeyW, KeyCode::KeyA, KeyCode::KeyS, KeyCode::KeyD];
        for i in 0..600 {
            controller.key_down(keys[i % keys.len()]);
            if i % 7 == 0 {
                controller.key_up(keys[(i + 2) % keys.len()]);
            }
            controller.send_look_input(Vec2::new((i as f32).sin() * 50.0, 20.0));
            controller.update_transform(&mut transform, TICK);
            assert!(controller.bounds.contains(transform.translation));
            assert_eq!(transform.translation.y, 1.6);
        }
    }

    #[test]
    fn touch_drag_lowers_yaw_by_sensitivity_scaled_delta() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(0.0, 1.6, 0.0);
        controller.send_look_input(Vec2::new(100.0, 0.0));
        controller.update_transform(&mut transform, TICK);

        let (yaw, _, _) = transform.rotation.to_euler(EulerRot::YXZ);
        assert!((yaw + 0.2).abs() < 1e-5);

        // The delta was consumed; an identical drag turns by the same amount
        // again rather than doubling.
        controller.send_look_input(Vec2::new(100.0, 0.0));
        controller.update_transform(&mut transform, TICK);
        let (yaw, _, _) = transform.rotation.to_euler(EulerRot::YXZ);
        assert!((yaw + 0.4).abs() < 1e-5);
    }

    #[test]
    fn touch_look_gesture_flows_through_to_yaw() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(0.0, 1.6, 0.0);
        let viewport = Vec2::new(800.0, 600.0);
        controller.touch_start(&[TouchPoint::new(1, Vec2::new(600.0, 300.0))], viewport);
        controller.touch_move(&[TouchPoint::new(1, Vec2::new(700.0, 300.0))]);
        controller.update_transform(&mut transform, TICK);

        let (yaw, _, _) = transform.rotation.to_euler(EulerRot::YXZ);
        assert!((yaw + 0.2).abs() < 1e-5);
    }

    #[test]
    fn joystick_gesture_drives_movement_until_the_finger_lifts() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(0.0, 1.6, 0.0);
        let viewport = Vec2::new(800.0, 600.0);
        controller.touch_start(&[TouchPoint::new(1, Vec2::new(100.0, 500.0))], viewport);
        // Push the stick fully up: screen-up maps to +forward.
        controller.touch_move(&[TouchPoint::new(1, Vec2::new(100.0, 436.0))]);
        controller.update_transform(&mut transform, TICK);
        assert!((transform.translation.z + 0.3).abs() < 1e-4);

        controller.touch_end(&[]);
        let parked = transform.translation.z;
        controller.update_transform(&mut transform, TICK);
        assert_eq!(transform.translation.z, parked);
    }

    #[test]
    fn pitch_never_leaves_its_limits() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(0.0, 1.6, 0.0);
        for _ in 0..50 {
            controller.send_look_input(Vec2::new(0.0, -10_000.0));
            controller.update_transform(&mut transform, TICK);
            let (_, pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);
            assert!(pitch <= controller.pitch_limits.max + 1e-5);
        }
        for _ in 0..50 {
            controller.send_look_input(Vec2::new(0.0, 10_000.0));
            controller.update_transform(&mut transform, TICK);
            let (_, pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);
            assert!(pitch >= controller.pitch_limits.min - 1e-5);
        }
    }

    #[test]
    fn look_composes_without_roll() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(0.0, 1.6, 0.0);
        controller.send_look_input(Vec2::new(321.0, -123.0));
        controller.update_transform(&mut transform, TICK);
        let (_, _, roll) = transform.rotation.to_euler(EulerRot::YXZ);
        assert!(roll.abs() < 1e-5);
    }

    #[test]
    fn eye_lock_holds_height_even_when_looking_up() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(0.0, 1.6, 0.0);
        // Pitch up steeply, then walk forward; the walk must stay level.
        controller.send_look_input(Vec2::new(0.0, -400.0));
        controller.update_transform(&mut transform, TICK);
        controller.key_down(KeyCode::ArrowUp);
        for _ in 0..30 {
            controller.update_transform(&mut transform, TICK);
            assert_eq!(transform.translation.y, 1.6);
        }
    }

    #[test]
    fn free_fly_climbs_along_the_view_but_respects_the_ceiling() {
        let mut controller = GalleryCam::default().with_height(HeightPolicy::FreeFly);
        let mut transform = camera_at(0.0, 1.6, 0.0);
        controller.send_look_input(Vec2::new(0.0, -300.0));
        controller.update_transform(&mut transform, TICK);
        controller.key_down(KeyCode::KeyW);
        let mut last_y = transform.translation.y;
        controller.update_transform(&mut transform, TICK);
        assert!(transform.translation.y > last_y);
        for _ in 0..600 {
            controller.update_transform(&mut transform, TICK);
            last_y = transform.translation.y;
            assert!(last_y <= controller.bounds.max.y);
        }
        assert_eq!(last_y, controller.bounds.max.y);
    }

    #[test]
    fn zoom_input_is_clamped_and_dollies_within_bounds() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(0.0, 1.6, 0.0);
        controller.send_zoom_input(1e6);
        controller.update_transform(&mut transform, TICK);
        assert_eq!(controller.zoom_level(), controller.zoom.range.min);
        for _ in 0..600 {
            controller.update_transform(&mut transform, TICK);
            assert!(controller.bounds.contains(transform.translation));
        }
        // The dolly eased forward along -Z.
        assert!(transform.translation.z < -1.0);
    }

    #[test]
    fn idle_controller_reports_no_change() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(0.0, 1.6, 0.0);
        assert!(!controller.update_transform(&mut transform, TICK));
    }

    #[test]
    fn non_finite_transform_is_skipped() {
        let mut controller = GalleryCam::default();
        let mut transform = camera_at(f32::NAN, 1.6, 0.0);
        controller.key_down(KeyCode::KeyW);
        assert!(!controller.update_transform(&mut transform, TICK));
        assert!(transform.translation.x.is_nan());
    }

    #[test]
    fn disabled_motion_gates_each_input_class() {
        let mut controller = GalleryCam {
            enabled_motion: EnabledMotion {
                walk: false,
                look: false,
                zoom: false,
            },
            ..Default::default()
        };
        let mut transform = camera_at(0.0, 1.6, 0.0);
        controller.key_down(KeyCode::KeyW);
        controller.send_look_input(Vec2::splat(100.0));
        controller.send_zoom_input(100.0);
        assert!(!controller.update_transform(&mut transform, TICK));
        assert_eq!(transform.translation, Vec3::new(0.0, 1.6, 0.0));
    }
}
