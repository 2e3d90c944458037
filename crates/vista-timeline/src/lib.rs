//! Vista Timeline Sequencer
//!
//! A timeline is data: an ordered list of offset-staged segments, a set of
//! continuous tracks and optional nested child timelines. `advance(progress)`
//! is a reducer over that data, so forward and backward replay follow from
//! the offsets rather than from call order.
//!
//! - Segments fire once per forward crossing of their offset and reverse
//!   once per backward crossing
//! - Tracks are recomputed from progress on every advance
//! - Children receive the parent's progress remapped into their window

pub mod segment;
pub mod sequencer;
pub mod timeline;
pub mod track;

pub use segment::*;
pub use sequencer::*;
pub use timeline::*;
pub use track::*;
