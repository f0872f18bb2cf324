//! Optional extensions to the base camera controller.

pub mod look_to;
#[cfg(feature = "extension_touch_overlay")]
pub mod touch_overlay;
