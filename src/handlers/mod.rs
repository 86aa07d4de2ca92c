//! Error handler policies.
//!
//! The error handler is a strategy, not a fixed behavior: the machine hands
//! it every emitter failure and follows whatever it decides. This module
//! holds the default policy and a reference bounding policy.

use crate::core::{ErrorHandler, State, TransitionError};
use tracing::{error, warn};

/// The default error handler: log the failure and retry the same state.
///
/// Retries are unbounded. A state whose emitter fails forever will be
/// re-invoked forever under this policy; bound it with [`RetryLimiter`] or a
/// handler of your own.
pub fn log_and_retry<S: State + 'static>() -> ErrorHandler<S> {
    Box::new(|state: &S, err: TransitionError| {
        error!(
            state = state.name(),
            error = %err,
            "transition failed, retrying the same state"
        );
        Ok(state.clone())
    })
}

/// Bounds consecutive failures at a single state.
///
/// The limiter remembers the last state it was invoked for. Another failure
/// at that same state increments its counter; a failure at any other state
/// resets the counter to one. When the counter reaches `max_attempts` the
/// limiter returns [`TransitionError::RetryLimitExceeded`], which stops the
/// run. Until then it returns the failing state unchanged, so the machine
/// retries it.
///
/// The counter is private to the limiter instance and survives across
/// invocations; the machine never resets it.
///
/// # Example
///
/// ```
/// use statewalk::builder::{fail_with, MachineBuilder};
/// use statewalk::handlers::RetryLimiter;
/// use statewalk::state_enum;
///
/// state_enum! {
///     enum Job {
///         Fetch,
///     }
/// }
///
/// let mut limiter = RetryLimiter::new(3);
/// let mut machine = MachineBuilder::default()
///     .with_emitter(Job::Fetch, fail_with("upstream down"))
///     .with_error_handler(move |state: &Job, err| limiter.handle(state, err))
///     .build();
///
/// machine.start(Job::Fetch);
/// // Stopped after the third consecutive failure, still at Fetch.
/// assert_eq!(machine.current(), Some(&Job::Fetch));
/// ```
pub struct RetryLimiter<S: State> {
    max_attempts: usize,
    attempts: usize,
    last_state: Option<S>,
}

impl<S: State> RetryLimiter<S> {
    /// Create a limiter that turns fatal on the `max_attempts`-th
    /// consecutive failure at one state.
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            attempts: 0,
            last_state: None,
        }
    }

    /// Handle one failure. Matches the [`ErrorHandler`] contract, so move
    /// the limiter into a closure to install it:
    /// `.with_error_handler(move |s, e| limiter.handle(s, e))`.
    pub fn handle(&mut self, state: &S, err: TransitionError) -> Result<S, TransitionError> {
        if self.last_state.as_ref() == Some(state) {
            self.attempts += 1;
        } else {
            self.last_state = Some(state.clone());
            self.attempts = 1;
        }

        if self.attempts >= self.max_attempts {
            return Err(TransitionError::RetryLimitExceeded {
                state: state.name().to_string(),
                limit: self.max_attempts,
            });
        }

        warn!(
            state = state.name(),
            attempt = self.attempts,
            error = %err,
            "transition failed, retrying"
        );
        Ok(state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Alpha,
        Beta,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Alpha => "Alpha",
                Self::Beta => "Beta",
            }
        }
    }

    fn failure(state: &TestState) -> TransitionError {
        TransitionError::failed(state, "boom")
    }

    #[test]
    fn log_and_retry_returns_the_same_state() {
        let mut handler = log_and_retry::<TestState>();

        let next = handler(&TestState::Alpha, failure(&TestState::Alpha)).unwrap();
        assert_eq!(next, TestState::Alpha);
    }

    #[test]
    fn limiter_turns_fatal_on_the_nth_consecutive_failure() {
        let mut limiter = RetryLimiter::new(3);

        assert!(limiter
            .handle(&TestState::Alpha, failure(&TestState::Alpha))
            .is_ok());
        assert!(limiter
            .handle(&TestState::Alpha, failure(&TestState::Alpha))
            .is_ok());

        let err = limiter
            .handle(&TestState::Alpha, failure(&TestState::Alpha))
            .unwrap_err();
        assert!(matches!(
            err,
            TransitionError::RetryLimitExceeded { limit: 3, .. }
        ));
    }

    #[test]
    fn failure_at_another_state_resets_the_counter() {
        let mut limiter = RetryLimiter::new(3);

        assert!(limiter
            .handle(&TestState::Alpha, failure(&TestState::Alpha))
            .is_ok());
        assert!(limiter
            .handle(&TestState::Alpha, failure(&TestState::Alpha))
            .is_ok());

        // The consecutive run at Alpha is broken here.
        assert!(limiter
            .handle(&TestState::Beta, failure(&TestState::Beta))
            .is_ok());

        assert!(limiter
            .handle(&TestState::Alpha, failure(&TestState::Alpha))
            .is_ok());
        assert!(limiter
            .handle(&TestState::Alpha, failure(&TestState::Alpha))
            .is_ok());

        let err = limiter
            .handle(&TestState::Alpha, failure(&TestState::Alpha))
            .unwrap_err();
        assert!(matches!(
            err,
            TransitionError::RetryLimitExceeded { limit: 3, .. }
        ));
    }

    #[test]
    fn limiter_retries_return_the_failing_state() {
        let mut limiter = RetryLimiter::new(5);

        let next = limiter
            .handle(&TestState::Beta, failure(&TestState::Beta))
            .unwrap();
        assert_eq!(next, TestState::Beta);
    }
}
