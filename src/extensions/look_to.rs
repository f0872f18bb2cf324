//! A `bevy_gallery_cam` extension that adds the ability to smoothly turn the
//! camera until it is facing a point of interest, such as an artwork.

use std::time::Duration;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_math::prelude::*;
use bevy_platform::collections::HashMap;
use bevy_reflect::prelude::*;
use bevy_time::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::RequestRedraw;

use crate::prelude::*;

/// See the [module](self) docs.
pub struct LookToPlugin;

impl Plugin for LookToPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LookTo>()
            .add_event::<LookToTrigger>()
            .add_systems(
                PreUpdate,
                LookTo::update.before(GalleryCam::update_camera_positions),
            )
            .add_systems(PostUpdate, LookToTrigger::receive)
            .register_type::<LookTo>();
    }
}

/// Send this event to turn the camera until it faces the given world point.
/// Animation speed is configured with the [`LookTo`] resource; user look
/// input interrupts the animation.
#[derive(Debug, Event)]
pub struct LookToTrigger {
    /// The point to face.
    pub target: Vec3,
    /// The camera to update.
    pub camera: Entity,
}

impl LookToTrigger {
    fn receive(
        mut events: EventReader<Self>,
        mut state: ResMut<LookTo>,
        cameras: Query<(&GalleryCam, &Transform)>,
    ) {
        for event in events.read() {
            let Ok((controller, transform)) = cameras.get(event.camera) else {
                continue;
            };
            let Some(direction) = (event.target - transform.translation).try_normalize() else {
                continue;
            };
            let (target_yaw, target_pitch) = yaw_pitch_toward(direction);
            let (initial_yaw, initial_pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);
            state.map.insert(
                event.camera,
                LookToEntry {
                    elapsed: Duration::ZERO,
                    initial_yaw,
                    initial_pitch,
                    target_yaw,
                    target_pitch: controller.pitch_limits.clamp(target_pitch),
                    complete: false,
                },
            );
        }
    }
}

struct LookToEntry {
    elapsed: Duration,
    initial_yaw: f32,
    initial_pitch: f32,
    target_yaw: f32,
    target_pitch: f32,
    complete: bool,
}

/// Stores settings and state for the look-to extension.
#[derive(Resource, Reflect)]
pub struct LookTo {
    /// The duration of the turn animation.
    pub animation_duration: Duration,
    /// The easing applied over the animation's progress.
    pub easing: EaseFunction,
    #[reflect(ignore)]
    map: HashMap<Entity, LookToEntry>,
}

impl Default for LookTo {
    fn default() -> Self {
        Self {
            animation_duration: Duration::from_millis(400),
            easing: EaseFunction::CubicInOut,
            map: Default::default(),
        }
    }
}

impl LookTo {
    fn update(
        mut state: ResMut<Self>,
        mut cameras: Query<(&mut Transform, &GalleryCam)>,
        time: Res<Time>,
        mut redraw: EventWriter<RequestRedraw>,
    ) {
        let animation_duration = state.animation_duration;
        let easing = state.easing;

        for (camera, entry) in state.map.iter_mut() {
            let Ok((mut transform, controller)) = cameras.get_mut(*camera) else {
                entry.complete = true;
                continue;
            };
            // The user grabbing the view wins over the animation.
            if controller.look_pending() {
                entry.complete = true;
                continue;
            }
            entry.elapsed += time.delta();
            let progress_t = if animation_duration.is_zero() {
                1.0
            } else {
                (entry.elapsed.as_secs_f32() / animation_duration.as_secs_f32()).clamp(0.0, 1.0)
            };
            let progress = EasingCurve::new(0.0, 1.0, easing).sample_clamped(progress_t);

            let yaw =
                entry.initial_yaw + wrap_angle(entry.target_yaw - entry.initial_yaw) * progress;
            let pitch =
                entry.initial_pitch + (entry.target_pitch - entry.initial_pitch) * progress;
            transform.rotation = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);

            if progress_t >= 1.0 {
                entry.complete = true;
            }
            redraw.write(RequestRedraw);
        }
        state.map.retain(|_, entry| !entry.complete);
    }
}

/// Yaw and pitch that make the camera's forward axis point along `direction`.
fn yaw_pitch_toward(direction: Vec3) -> (f32, f32) {
    let pitch = direction.y.clamp(-1.0, 1.0).asin();
    let yaw = (-direction.x).atan2(-direction.z);
    (yaw, pitch)
}

/// Wrap an angle onto `(-PI, PI]` so interpolation takes the short way round.
fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut wrapped = angle;
    while wrapped > PI {
        wrapped -= TAU;
    }
    while wrapped < -PI {
        wrapped += TAU;
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn wrap_angle_takes_the_short_way() {
        assert!((wrap_angle(PI + 0.1) + PI - 0.1).abs() < 1e-5);
        assert!((wrap_angle(-PI - 0.1) - (PI - 0.1)).abs() < 1e-5);
        assert_eq!(wrap_angle(0.3), 0.3);
    }

    #[test]
    fn yaw_pitch_toward_cardinal_directions() {
        let (yaw, pitch) = yaw_pitch_toward(Vec3::NEG_Z);
        assert!(yaw.abs() < 1e-6 && pitch.abs() < 1e-6);

        let (yaw, _) = yaw_pitch_toward(Vec3::X);
        assert!((yaw + FRAC_PI_2).abs() < 1e-6);

        let (_, pitch) = yaw_pitch_toward(Vec3::new(0.0, 1.0, -1.0).normalize());
        assert!((pitch - FRAC_PI_2 / 2.0).abs() < 1e-5);
    }

    #[test]
    fn derived_angles_rebuild_the_same_direction() {
        let direction = Vec3::new(0.3, 0.4, -0.85).normalize();
        let (yaw, pitch) = yaw_pitch_toward(direction);
        let rebuilt = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0) * Vec3::NEG_Z;
        assert!(rebuilt.abs_diff_eq(direction, 1e-5));
    }
}
