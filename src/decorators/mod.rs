//! Built-in emitter decorators.
//!
//! Observability and control are layered around emitters, never baked into
//! the dispatch loop. Each constructor here returns a decorator suitable for
//! [`with_decorator`](crate::builder::MachineBuilder::with_decorator) or
//! [`with_state_decorator`](crate::builder::MachineBuilder::with_state_decorator).

use crate::core::{Emitter, State, StateHistory, StateRecord, TransitionError};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Log entry and exit around every invocation of the wrapped emitter.
///
/// Events go through `tracing` at debug level; with no subscriber installed
/// they cost nearly nothing.
pub fn logging<S: State + 'static>() -> impl Fn(Emitter<S>) -> Emitter<S> + Send {
    |mut emitter: Emitter<S>| -> Emitter<S> {
        Box::new(move |state: &S| {
            debug!(state = state.name(), "emitter started");
            let result = emitter(state);
            match &result {
                Ok(next) => debug!(state = state.name(), next = next.name(), "emitter finished"),
                Err(err) => debug!(state = state.name(), error = %err, "emitter failed"),
            }
            result
        })
    }
}

/// Append every successful emission to a shared [`StateHistory`].
///
/// Failed invocations record nothing but count toward the `attempt` field of
/// the next successful record, so a transition that needed two retries shows
/// `attempt: 3`.
///
/// # Example
///
/// ```
/// use statewalk::builder::{to, MachineBuilder};
/// use statewalk::core::StateHistory;
/// use statewalk::decorators::recording;
/// use statewalk::state_enum;
/// use std::sync::{Arc, Mutex};
///
/// state_enum! {
///     enum Step {
///         A,
///         B,
///     }
/// }
///
/// let history = Arc::new(Mutex::new(StateHistory::new()));
/// let mut machine = MachineBuilder::default()
///     .with_emitter(Step::A, to(Step::B))
///     .with_decorator(recording(Arc::clone(&history)))
///     .build();
///
/// machine.start(Step::A);
///
/// let trace = history.lock().unwrap();
/// assert_eq!(trace.path(), vec![&Step::A, &Step::B]);
/// ```
pub fn recording<S: State + 'static>(
    history: Arc<Mutex<StateHistory<S>>>,
) -> impl Fn(Emitter<S>) -> Emitter<S> + Send {
    move |mut emitter: Emitter<S>| -> Emitter<S> {
        let history = Arc::clone(&history);
        let mut attempts: usize = 0;
        Box::new(move |state: &S| {
            attempts += 1;
            let result = emitter(state);
            if let Ok(next) = &result {
                let record = StateRecord {
                    from: state.clone(),
                    to: next.clone(),
                    timestamp: Utc::now(),
                    attempt: attempts,
                };
                let mut guard = history.lock().expect("history lock poisoned");
                let updated = guard.record(record);
                *guard = updated;
                attempts = 0;
            }
            result
        })
    }
}

/// Fail with [`TransitionError::Cancelled`] once the flag is raised.
///
/// The engine has no cancellation primitive of its own; this decorator is
/// the caller-side pattern. Checked before delegating, so a raised flag
/// stops the walk at the next transition boundary. Pair it with an error
/// handler that treats [`TransitionError::Cancelled`] as fatal, otherwise
/// the default handler will keep retrying into the raised flag.
pub fn cancellation<S: State + 'static>(
    flag: Arc<AtomicBool>,
) -> impl Fn(Emitter<S>) -> Emitter<S> + Send {
    move |mut emitter: Emitter<S>| -> Emitter<S> {
        let flag = Arc::clone(&flag);
        Box::new(move |state: &S| {
            if flag.load(Ordering::Relaxed) {
                return Err(TransitionError::Cancelled {
                    state: state.name().to_string(),
                });
            }
            emitter(state)
        })
    }
}
