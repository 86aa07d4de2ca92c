//! Core types of the engine.
//!
//! This module contains the contracts everything else is built from:
//! - State definitions via the `State` trait
//! - The `Emitter`, `EmitterDecorator`, and `ErrorHandler` function contracts
//! - The shared `TransitionError` type
//! - Immutable history tracking for runs that want a trace

mod emitter;
mod history;
mod state;

pub use emitter::{Emitter, EmitterDecorator, ErrorHandler, TransitionError};
pub use history::{StateHistory, StateRecord};
pub use state::State;
