//! Builder API for assembling machines.
//!
//! This module provides the fluent [`MachineBuilder`] plus small emitter
//! constructors for the common cases: an emitter that always advances to a
//! fixed state, and one that always fails.

pub mod machine;
pub mod macros;

pub use machine::MachineBuilder;

use crate::core::{State, TransitionError};

/// Create an emitter that always succeeds into `next`.
///
/// # Example
///
/// ```
/// use statewalk::builder::{to, MachineBuilder};
/// use statewalk::state_enum;
///
/// state_enum! {
///     enum MyState {
///         Start,
///         End,
///     }
/// }
///
/// let mut machine = MachineBuilder::default()
///     .with_emitter(MyState::Start, to(MyState::End))
///     .build();
///
/// machine.start(MyState::Start);
/// assert_eq!(machine.current(), Some(&MyState::End));
/// ```
pub fn to<S: State>(next: S) -> impl FnMut(&S) -> Result<S, TransitionError> + Send {
    move |_: &S| Ok(next.clone())
}

/// Create an emitter that always fails with the given reason.
///
/// Useful in tests and demos for driving the error handler.
pub fn fail_with<S: State>(
    reason: impl Into<String>,
) -> impl FnMut(&S) -> Result<S, TransitionError> + Send {
    let reason = reason.into();
    move |state: &S| Err(TransitionError::failed(state, reason.clone()))
}
