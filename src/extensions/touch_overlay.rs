//! A `bevy_gallery_cam` extension that draws on-screen gesture affordances on
//! touch devices: a ring-and-knob joystick on the movement half of the screen
//! and a matching ring on the look half. This makes it more obvious to users
//! where each gesture zone is and how far the joystick is deflected.
//!
//! The drawing consumes only the controller's public overlay state
//! ([`ControlMode`] and [`GalleryCam::joystick_offset`]); apps that want
//! richer affordances can read the same state and render their own.

use bevy_app::prelude::*;
use bevy_color::Color;
use bevy_ecs::prelude::*;
use bevy_gizmos::{config::GizmoConfigStore, prelude::Gizmos};
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_window::{PrimaryWindow, Window};

use crate::{
    controller::touch::TouchLayout,
    prelude::{ControlMode, GalleryCam},
};

/// See the [module](self) docs.
pub struct TouchOverlayPlugin;

impl Plugin for TouchOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GizmoConfigStore>()
            .add_systems(PostUpdate, draw_touch_overlay)
            .register_type::<TouchOverlay>();
    }
}

/// Optional. Configures whether a [`GalleryCam`] should show the touch
/// overlay. The overlay is enabled if this component is not present.
#[derive(Debug, Clone, Component, Reflect)]
pub struct TouchOverlay {
    /// Should the overlay be visible for this camera?
    pub enabled: bool,
    /// Distance from the screen edges to the gesture rings, in pixels.
    pub margin: f32,
    /// Ring and knob color.
    pub color: Color,
}

impl Default for TouchOverlay {
    fn default() -> Self {
        Self {
            enabled: true,
            margin: 16.0,
            color: Color::srgba(1.0, 1.0, 1.0, 0.3),
        }
    }
}

/// Use gizmos to draw the gesture rings in screen space.
pub fn draw_touch_overlay(
    mode: Option<Res<ControlMode>>,
    cameras: Query<(&GalleryCam, Option<&TouchOverlay>)>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut gizmos: Gizmos,
) {
    if !matches!(mode.as_deref(), Some(ControlMode::Touch)) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let half = Vec2::new(window.width(), window.height()) / 2.0;

    for (controller, overlay) in cameras
        .iter()
        .filter(|(controller, _)| controller.input.touch.layout == TouchLayout::SplitScreen)
    {
        let settings = overlay.cloned().unwrap_or_default();
        if !settings.enabled {
            continue;
        }
        let radius = controller.input.touch.stick_radius;
        let offset = Vec2::new(settings.margin + radius, settings.margin + radius);

        // Movement ring and knob, bottom left. Gizmo space has its origin at
        // the screen center with y up, so the stick's screen-space y flips.
        let stick_center = Vec2::new(-half.x, -half.y) + offset;
        gizmos.circle_2d(
            Isometry2d::from_translation(stick_center),
            radius,
            settings.color,
        );
        let deflection = controller.joystick_offset().unwrap_or(Vec2::ZERO);
        let knob = stick_center + deflection * radius * Vec2::new(1.0, -1.0);
        gizmos.circle_2d(
            Isometry2d::from_translation(knob),
            radius * 0.35,
            settings.color,
        );

        // Look ring, bottom right.
        let look_center = Vec2::new(half.x - offset.x, -half.y + offset.y);
        gizmos.circle_2d(
            Isometry2d::from_translation(look_center),
            radius,
            settings.color,
        );
    }
}
