//! Domain events emitted by the engine after each transition.
//!
//! ## Design Philosophy
//!
//! Narration is data, not output. The turn engine and the controller append
//! events to the game's `EventLog`; console renderers, replay writers and
//! training pipelines consume the log. Each appended event is also traced at
//! `debug` level through `tracing`.

pub mod event;

pub use event::{EventLog, EventRecord, GameEvent};
