//! Statewalk: a composable finite state machine engine
//!
//! Statewalk drives a process through named states. Each state has an
//! emitter, a function that computes the next state or fails, and the
//! machine walks from an initial state until it reaches one with no emitter
//! registered. That absence is the terminal condition; there is no other
//! success marker.
//!
//! The engine owns no I/O, no persistence, and no domain semantics. Domain
//! behavior lives in the emitters the caller supplies; cross-cutting
//! behavior (logging, tracing, cancellation, retry bookkeeping) is layered
//! with decorators at build time; failure policy is a pluggable error
//! handler that retries, redirects, or stops the run.
//!
//! # Core Concepts
//!
//! - **State**: an opaque, comparable identifier via the [`State`] trait
//! - **Emitter**: a unit of work mapping the current state to the next
//! - **Decorator**: a wrapping transform composed around emitters once, at
//!   build time
//! - **Error handler**: the policy deciding what a failed transition means
//!
//! # Example
//!
//! ```rust
//! use statewalk::builder::to;
//! use statewalk::{state_enum, MachineBuilder};
//!
//! state_enum! {
//!     enum Order {
//!         Received,
//!         Packed,
//!         Shipped,
//!     }
//! }
//!
//! let mut machine = MachineBuilder::default()
//!     .with_emitter(Order::Received, to(Order::Packed))
//!     .with_emitter(Order::Packed, to(Order::Shipped))
//!     .build();
//!
//! machine.start(Order::Received);
//! assert_eq!(machine.current(), Some(&Order::Shipped));
//! ```

pub mod builder;
pub mod core;
pub mod decorators;
pub mod handlers;
pub mod machine;

// Re-export commonly used types
pub use builder::MachineBuilder;
pub use core::{
    Emitter, EmitterDecorator, ErrorHandler, State, StateHistory, StateRecord, TransitionError,
};
pub use machine::Machine;
