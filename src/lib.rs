//! A bounded first-person camera controller for interior walkthroughs, such
//! as virtual gallery rooms.
//!
//! The controller translates keyboard, pointer-lock mouse, and touch gesture
//! input into camera pose changes, while guaranteeing the camera never leaves
//! an axis-aligned volume representing the room interior. Walking is pinned
//! to eye height by default; a free-fly policy is available for inspection
//! use.
//!
//! # Usage
//!
//! Add [`DefaultGalleryCamPlugins`] and spawn a camera with a
//! [`GalleryCam`](prelude::GalleryCam) component:
//!
//! ```rust,ignore
//! app.add_plugins(DefaultGalleryCamPlugins);
//!
//! commands.spawn((
//!     Camera3d::default(),
//!     Transform::from_xyz(0.0, 1.6, 8.0),
//!     GalleryCam::default(),
//! ));
//! ```
//!
//! On a touch-capable device, swap the input plugin for its touch variant:
//!
//! ```rust,ignore
//! app.add_plugins(
//!     DefaultGalleryCamPlugins
//!         .build()
//!         .set(DefaultInputPlugin::touch()),
//! );
//! ```
//!
//! Detaching is removing the component: the input systems stop matching, the
//! controller's input state drops with it, and the pointer lock is released.

#![warn(missing_docs)]

pub mod controller;
pub mod extensions;
pub mod input;

/// Common imports.
pub mod prelude {
    #[cfg(feature = "extension_touch_overlay")]
    pub use crate::extensions::touch_overlay::{TouchOverlay, TouchOverlayPlugin};
    pub use crate::{
        controller::{
            bounds::RoomBounds,
            component::{EnabledMotion, GalleryCam, HeightPolicy, PitchLimits, Sensitivity},
            inputs::{InputSnapshot, InputState, Keymap},
            touch::{TouchGestures, TouchLayout, TouchPoint},
            zoom::{DollyZoom, ZoomRange},
        },
        extensions::look_to::{LookTo, LookToPlugin, LookToTrigger},
        input::{ControlMode, DefaultInputPlugin},
        DefaultGalleryCamPlugins, GalleryCamPlugin,
    };
}

use bevy_app::{prelude::*, PluginGroupBuilder};
use bevy_window::RequestRedraw;

use crate::prelude::*;

/// Adds the camera controller update system and registers the controller
/// types for reflection. Input must be provided separately, either by
/// [`DefaultInputPlugin`] or by feeding [`GalleryCam`] manually.
pub struct GalleryCamPlugin;

impl Plugin for GalleryCamPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RequestRedraw>()
            .add_systems(PreUpdate, GalleryCam::update_camera_positions)
            .register_type::<GalleryCam>()
            .register_type::<ControlMode>();
    }
}

/// The full camera controller: [`GalleryCamPlugin`], [`DefaultInputPlugin`]
/// in desktop mode, the look-to extension, and (by default) the touch
/// overlay. Use [`PluginGroup::build`] with
/// [`set`](PluginGroupBuilder::set) to swap the input plugin for
/// [`DefaultInputPlugin::touch`] on touch-capable devices.
pub struct DefaultGalleryCamPlugins;

impl PluginGroup for DefaultGalleryCamPlugins {
    fn build(self) -> PluginGroupBuilder {
        let builder = PluginGroupBuilder::start::<Self>()
            .add(GalleryCamPlugin)
            .add(DefaultInputPlugin::default())
            .add(LookToPlugin);
        #[cfg(feature = "extension_touch_overlay")]
        let builder = builder.add(TouchOverlayPlugin);
        builder
    }
}
