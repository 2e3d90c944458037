//! Vista Visual - time-based presentation of directives
//!
//! The sequencer decides what changes; this crate turns those decisions
//! into short tweens written through the rendering and overlay surfaces.
//!
//! - `tween`: one tween per property, last writer wins
//! - `surface`: the traits the host implements
//! - `controller`: the two-variant scene transition state machine
//! - `reveal`: staged overlay reveals

pub mod controller;
pub mod reveal;
pub mod surface;
pub mod tween;

pub use controller::*;
pub use reveal::*;
pub use surface::*;
pub use tween::*;
