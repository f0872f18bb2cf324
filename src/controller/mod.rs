//! Core camera controller: input accumulation, per-frame motion integration,
//! touch gesture recognition, and room-bounds clamping.

pub mod bounds;
pub mod component;
pub mod inputs;
pub mod touch;
pub mod zoom;
