//! Vista Core - Fundamental types shared by every Vista crate
//!
//! This crate defines:
//! - Identifiers (TriggerId, SectionId, TargetId)
//! - Generational arena handles (NodeHandle, MaterialRef)
//! - Frame time and normalized scroll progress
//! - Value types carried by the visual state (MediaUri, ColorToken, ScaleVariant)
//! - Directives, the only way decisions leave the sequencer
//! - The fixed easing vocabulary
//! - Error taxonomy

pub mod arena;
pub mod directive;
pub mod easing;
pub mod error;
pub mod id;
pub mod progress;
pub mod time;
pub mod value;

pub use arena::*;
pub use directive::*;
pub use easing::*;
pub use error::*;
pub use id::*;
pub use progress::*;
pub use time::*;
pub use value::*;
