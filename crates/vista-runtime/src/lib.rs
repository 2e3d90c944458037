//! Vista Runtime - the stage that ties the engine together
//!
//! A `Stage` owns the tracker, the sequencer, the visual store, the scene
//! controller and the reveal synchronizer. Each frame runs them in causal
//! order:
//!
//! ```text
//! scroll -> ScrollTracker -> Sequencer -> { VisualStore, SceneTransitionController,
//!                                           RevealSynchronizer }
//! ```
//!
//! Page sections are mounted as data (`SectionSpec`) and the `presets`
//! module carries the ones the product page uses.

pub mod config;
pub mod diagnostics;
pub mod presets;
pub mod section;
pub mod stage;
pub mod telemetry;

pub use config::*;
pub use diagnostics::*;
pub use section::*;
pub use stage::*;
pub use telemetry::*;
