//! Translates raw `bevy_input` events into controller intent.
//!
//! [`DefaultInputPlugin`] is constructed with a [`ControlMode`], and only the
//! systems for that mode are registered: desktop input is keyboard movement
//! plus pointer-lock mouse look and scroll-wheel zoom; touch input is the
//! gesture layout configured on the controller. Users with bespoke input
//! needs can skip this plugin and call the feed methods on
//! [`GalleryCam`](crate::prelude::GalleryCam) directly.

use bevy_app::prelude::*;
use bevy_ecs::{prelude::*, schedule::common_conditions::any_with_component};
use bevy_input::{
    mouse::{AccumulatedMouseMotion, MouseButton, MouseScrollUnit, MouseWheel},
    prelude::*,
    touch::Touches,
    InputSystem,
};
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_window::{CursorGrabMode, PrimaryWindow, Window};

use crate::controller::{component::GalleryCam, touch::TouchPoint};

/// Pixels of zoom input attributed to one scroll-wheel line.
const SCROLL_LINE_PIXELS: f32 = 16.0;

/// Which input surface drives the controller. Decided once at startup from
/// the host's touch-capability flag; re-deriving that flag (e.g. by sniffing
/// device identifiers) is explicitly not this crate's business.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ControlMode {
    /// Keyboard movement, pointer-lock mouse look, scroll-wheel zoom.
    #[default]
    Desktop,
    /// On-screen gesture zones for movement, look, and pinch zoom.
    Touch,
}

impl ControlMode {
    /// Map the injected capability flag onto a mode.
    pub fn from_touch_capability(touch_capable: bool) -> Self {
        if touch_capable {
            Self::Touch
        } else {
            Self::Desktop
        }
    }
}

/// See the [module](self) docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInputPlugin {
    /// The input surface to register systems for.
    pub mode: ControlMode,
}

impl DefaultInputPlugin {
    /// An input plugin for touch-capable devices.
    pub fn touch() -> Self {
        Self {
            mode: ControlMode::Touch,
        }
    }
}

impl Plugin for DefaultInputPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.mode);
        match self.mode {
            ControlMode::Desktop => {
                app.init_resource::<ButtonInput<KeyCode>>()
                    .init_resource::<ButtonInput<MouseButton>>()
                    .init_resource::<AccumulatedMouseMotion>()
                    .add_event::<MouseWheel>()
                    .add_systems(
                        PreUpdate,
                        (
                            (keyboard_input, mouse_look_input, wheel_zoom_input, pointer_lock)
                                .run_if(any_with_component::<GalleryCam>),
                            release_pointer_on_detach,
                        )
                            .after(InputSystem)
                            .before(GalleryCam::update_camera_positions),
                    );
            }
            ControlMode::Touch => {
                app.init_resource::<Touches>().add_systems(
                    PreUpdate,
                    touch_gesture_input
                        .run_if(any_with_component::<GalleryCam>)
                        .after(InputSystem)
                        .before(GalleryCam::update_camera_positions),
                );
            }
        }
    }
}

/// Forward key transitions into the controllers' held-key state.
fn keyboard_input(mut controllers: Query<&mut GalleryCam>, keyboard: Res<ButtonInput<KeyCode>>) {
    for mut controller in &mut controllers {
        for key in keyboard.get_just_pressed() {
            controller.key_down(*key);
        }
        for key in keyboard.get_just_released() {
            controller.key_up(*key);
        }
    }
}

/// Forward relative mouse motion as look input while the pointer is locked.
fn mouse_look_input(
    mut controllers: Query<&mut GalleryCam>,
    motion: Res<AccumulatedMouseMotion>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    if window.cursor_options.grab_mode == CursorGrabMode::None || motion.delta == Vec2::ZERO {
        return;
    }
    for mut controller in &mut controllers {
        controller.send_look_input(motion.delta);
    }
}

/// Forward scroll-wheel motion as zoom input.
fn wheel_zoom_input(mut controllers: Query<&mut GalleryCam>, mut wheel: EventReader<MouseWheel>) {
    let amount: f32 = wheel
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y * SCROLL_LINE_PIXELS,
            MouseScrollUnit::Pixel => event.y,
        })
        .sum();
    if amount == 0.0 {
        return;
    }
    for mut controller in &mut controllers {
        controller.send_zoom_input(amount);
    }
}

/// Capture the pointer on click and release it on Escape, so mouse motion
/// reports relative deltas with a hidden cursor while looking around.
fn pointer_lock(
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    if buttons.just_pressed(MouseButton::Left)
        && window.cursor_options.grab_mode == CursorGrabMode::None
    {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
    if keyboard.just_pressed(KeyCode::Escape)
        && window.cursor_options.grab_mode != CursorGrabMode::None
    {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Detaching the controller must undo everything attaching set up, including
/// the pointer lock, so the cursor is never stranded hidden.
fn release_pointer_on_detach(
    mut removed: RemovedComponents<GalleryCam>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if removed.read().next().is_none() {
        return;
    }
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    window.cursor_options.grab_mode = CursorGrabMode::None;
    window.cursor_options.visible = true;
}

/// Forward touch activity into the controllers' gesture state.
fn touch_gesture_input(
    mut controllers: Query<&mut GalleryCam>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let viewport = Vec2::new(window.width(), window.height());
    let active: Vec<TouchPoint> = touches
        .iter()
        .map(|touch| TouchPoint::new(touch.id(), touch.position()))
        .collect();

    let began = touches.iter_just_pressed().next().is_some();
    let moved = touches.iter().any(|touch| touch.delta() != Vec2::ZERO);
    let ended = touches.iter_just_released().next().is_some()
        || touches.iter_just_canceled().next().is_some();

    for mut controller in &mut controllers {
        if began {
            controller.touch_start(&active, viewport);
        }
        if moved {
            controller.touch_move(&active);
        }
        if ended {
            controller.touch_end(&active);
        }
    }
}
