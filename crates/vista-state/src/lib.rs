//! Vista Visual State Store
//!
//! One `VisualState` per page: color, scale variant and screen texture.
//! It changes only through the enumerated `StoreAction`s, every action is
//! applied whole before listeners are told about it, and there is no
//! history to undo into.

pub mod state;
pub mod store;

pub use state::*;
pub use store::*;
