//! Vista Scroll Tracker - scroll position to normalized progress
//!
//! This crate implements the Viewport Scroll Tracker:
//! - Anchor resolution against trigger regions (`"top center"` style)
//! - Progress clamping and direction detection
//! - Pin engage / release reporting
//! - Scrub smoothing (low-pass filtered progress)
//! - Viewport class detection on resize

pub mod anchor;
pub mod binding;
pub mod layout;
pub mod smoothing;
pub mod tracker;

pub use anchor::*;
pub use binding::*;
pub use layout::*;
pub use smoothing::*;
pub use tracker::*;
