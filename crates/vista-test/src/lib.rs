//! Vista Test Harness - page simulation and scroll scenarios
//!
//! This crate provides:
//! - In-memory scene, overlay and media surfaces
//! - A page layout with the product page's trigger regions
//! - `PageSimulator`, which drives a `Stage` frame by frame
//! - Seeded scroll scripts with jitter
//! - End-to-end scenarios

pub mod page;
pub mod scenarios;
pub mod script;
pub mod simulator;
pub mod surfaces;

pub use page::*;
pub use scenarios::*;
pub use script::*;
pub use simulator::*;
pub use surfaces::*;
