//! Emitter, decorator, and error handler contracts.
//!
//! These are the function-valued extension points of the engine. An emitter
//! computes the next state from the current one, a decorator wraps an emitter
//! to layer behavior around it, and an error handler decides whether a failed
//! transition is retried, redirected, or fatal.

use super::state::State;
use std::error::Error;
use thiserror::Error as ThisError;

/// A unit of work: given the current state, produce the next state or fail.
///
/// Emitters may be closures capturing arbitrary mutable context, which is why
/// the alias is `FnMut`. The builder takes ownership of each emitter at
/// registration and composes decorators around it exactly once in
/// [`build`](crate::builder::MachineBuilder::build); the composed value is
/// what the machine invokes on every visit to the state.
pub type Emitter<S> = Box<dyn FnMut(&S) -> Result<S, TransitionError> + Send>;

/// A transform that wraps one emitter to produce another.
///
/// Decorators layer cross-cutting behavior (logging, instrumentation, retry
/// bookkeeping) without modifying the wrapped emitter. A single decorator
/// value may wrap many emitters, so the alias is `Fn` over owned emitters:
/// each application consumes one emitter and yields its replacement.
pub type EmitterDecorator<S> = Box<dyn Fn(Emitter<S>) -> Emitter<S> + Send>;

/// The policy invoked when an emitter fails.
///
/// `Ok(next)` continues the run from `next`, which may equal the failing
/// state (retry) or any other state (redirect). `Err(fatal)` stops the run;
/// the machine keeps the state it held before the failed transition.
///
/// Stateful policies such as [`RetryLimiter`](crate::handlers::RetryLimiter)
/// own their own counters. The engine never inspects or resets them.
pub type ErrorHandler<S> = Box<dyn FnMut(&S, TransitionError) -> Result<S, TransitionError> + Send>;

/// Errors produced by emitters, handlers, and the built-in decorators.
///
/// The engine routes these without inspecting them; the variants exist for
/// callers and policies. Domain errors flow through the `Other` variant.
#[derive(Debug, ThisError)]
pub enum TransitionError {
    /// An emitter could not produce a next state.
    #[error("emitter failed at state '{state}': {reason}")]
    Failed { state: String, reason: String },

    /// Produced by [`RetryLimiter`](crate::handlers::RetryLimiter) when
    /// consecutive failures at one state exhaust its budget.
    #[error("retry limit of {limit} reached at state '{state}'")]
    RetryLimitExceeded { state: String, limit: usize },

    /// Produced by the [`cancellation`](crate::decorators::cancellation)
    /// decorator once its flag is raised.
    #[error("run cancelled at state '{state}'")]
    Cancelled { state: String },

    /// A domain error carried through unchanged.
    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}

impl TransitionError {
    /// Shorthand for a [`TransitionError::Failed`] at a named state.
    pub fn failed<S: State>(state: &S, reason: impl Into<String>) -> Self {
        Self::Failed {
            state: state.name().to_string(),
            reason: reason.into(),
        }
    }
}
