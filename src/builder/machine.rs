//! Builder for assembling emitters, decorators, and the error policy.

use crate::core::{Emitter, EmitterDecorator, ErrorHandler, State, TransitionError};
use crate::handlers;
use crate::machine::Machine;
use std::collections::HashMap;
use tracing::debug;

/// Builder that composes a state-to-emitter map, per-state and global
/// decorators, and an error handler into an immutable [`Machine`].
///
/// The error handler defaults to
/// [`handlers::log_and_retry`](crate::handlers::log_and_retry): log the
/// failure and retry the same state indefinitely. Replace it with
/// [`with_error_handler`](MachineBuilder::with_error_handler) to bound or
/// redirect retries.
pub struct MachineBuilder<S: State + 'static> {
    emitters: HashMap<S, Emitter<S>>,
    error_handler: ErrorHandler<S>,
    state_decorators: HashMap<S, Vec<EmitterDecorator<S>>>,
    decorators: Vec<EmitterDecorator<S>>,
}

impl<S: State + 'static> MachineBuilder<S> {
    /// Create a builder from an initial state-to-emitter map.
    ///
    /// The map may be empty; starting the resulting machine then terminates
    /// immediately at its initial state.
    pub fn new(emitters: HashMap<S, Emitter<S>>) -> Self {
        Self {
            emitters,
            error_handler: handlers::log_and_retry(),
            state_decorators: HashMap::new(),
            decorators: Vec::new(),
        }
    }

    /// Register the emitter for a state, replacing any existing one.
    pub fn with_emitter<F>(mut self, state: S, emitter: F) -> Self
    where
        F: FnMut(&S) -> Result<S, TransitionError> + Send + 'static,
    {
        self.emitters.insert(state, Box::new(emitter));
        self
    }

    /// Replace the error handler. The last call wins; handlers do not
    /// compose.
    pub fn with_error_handler<H>(mut self, handler: H) -> Self
    where
        H: FnMut(&S, TransitionError) -> Result<S, TransitionError> + Send + 'static,
    {
        self.error_handler = Box::new(handler);
        self
    }

    /// Append a decorator scoped to one state.
    ///
    /// Repeated calls for the same state accumulate in call order, and the
    /// first-added decorator ends up outermost: it executes first on every
    /// invocation of that state's emitter.
    pub fn with_state_decorator<D>(mut self, state: S, decorator: D) -> Self
    where
        D: Fn(Emitter<S>) -> Emitter<S> + Send + 'static,
    {
        self.state_decorators
            .entry(state)
            .or_default()
            .push(Box::new(decorator));
        self
    }

    /// Append a decorator applied to every state's emitter.
    ///
    /// Global decorators wrap state-scoped ones, so they execute outside
    /// them at call time. Among globals the first-added is outermost.
    pub fn with_decorator<D>(mut self, decorator: D) -> Self
    where
        D: Fn(Emitter<S>) -> Emitter<S> + Send + 'static,
    {
        self.decorators.push(Box::new(decorator));
        self
    }

    /// Compose decorators around every emitter and freeze the result into a
    /// [`Machine`].
    ///
    /// Composition order is a hard contract. Per state, the state-scoped
    /// decorators fold over the raw emitter with the first-added outermost.
    /// Then every global decorator folds over every state's emitter, same
    /// convention, so the effective call order for globals `[d1, d2]` plus a
    /// state decorator `d0` is `d1 -> d2 -> d0 -> emitter`. Decorators run
    /// exactly once here; nothing re-wraps at call time.
    pub fn build(self) -> Machine<S> {
        let MachineBuilder {
            mut emitters,
            error_handler,
            state_decorators,
            decorators,
        } = self;

        for (state, stack) in state_decorators {
            let Some(base) = emitters.remove(&state) else {
                debug!(
                    state = state.name(),
                    "state decorator targets an unregistered state, dropped"
                );
                continue;
            };
            let composed = stack
                .into_iter()
                .rev()
                .fold(base, |emitter, decorate| decorate(emitter));
            emitters.insert(state, composed);
        }

        for decorate in decorators.into_iter().rev() {
            let states: Vec<S> = emitters.keys().cloned().collect();
            for state in states {
                if let Some(base) = emitters.remove(&state) {
                    emitters.insert(state, decorate(base));
                }
            }
        }

        Machine::from_parts(emitters, error_handler)
    }
}

impl<S: State + 'static> Default for MachineBuilder<S> {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::to;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        First,
        Second,
        Third,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::First => "First",
                Self::Second => "Second",
                Self::Third => "Third",
            }
        }
    }

    fn tagged(
        log: Arc<Mutex<Vec<&'static str>>>,
        tag: &'static str,
    ) -> impl Fn(Emitter<TestState>) -> Emitter<TestState> + Send {
        move |mut emitter| {
            let log = Arc::clone(&log);
            Box::new(move |state: &TestState| {
                log.lock().unwrap().push(tag);
                emitter(state)
            })
        }
    }

    #[test]
    fn new_accepts_a_prebuilt_map() {
        let mut map: HashMap<TestState, Emitter<TestState>> = HashMap::new();
        map.insert(TestState::First, Box::new(to(TestState::Second)));

        let mut machine = MachineBuilder::new(map).build();
        machine.start(TestState::First);

        assert_eq!(machine.current(), Some(&TestState::Second));
    }

    #[test]
    fn with_emitter_replaces_an_existing_registration() {
        let mut machine = MachineBuilder::default()
            .with_emitter(TestState::First, to(TestState::Second))
            .with_emitter(TestState::First, to(TestState::Third))
            .build();

        machine.start(TestState::First);

        assert_eq!(machine.current(), Some(&TestState::Third));
    }

    #[test]
    fn global_decorator_wraps_every_emitter_once() {
        let applications = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&applications);

        let mut machine = MachineBuilder::default()
            .with_emitter(TestState::First, to(TestState::Second))
            .with_emitter(TestState::Second, to(TestState::Third))
            .with_decorator(move |emitter: Emitter<TestState>| {
                counter.fetch_add(1, Ordering::SeqCst);
                emitter
            })
            .build();

        // One application per registered state, all at build time.
        assert_eq!(applications.load(Ordering::SeqCst), 2);

        machine.start(TestState::First);
        assert_eq!(applications.load(Ordering::SeqCst), 2);
        assert_eq!(machine.current(), Some(&TestState::Third));
    }

    #[test]
    fn state_decorator_wraps_only_its_state() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut machine = MachineBuilder::default()
            .with_emitter(TestState::First, to(TestState::Second))
            .with_emitter(TestState::Second, to(TestState::Third))
            .with_state_decorator(TestState::Second, tagged(Arc::clone(&log), "second-only"))
            .build();

        machine.start(TestState::First);

        // Two transitions ran but the decorator fired once, on Second.
        assert_eq!(*log.lock().unwrap(), vec!["second-only"]);
        assert_eq!(machine.current(), Some(&TestState::Third));
    }

    #[test]
    fn decorators_execute_globals_then_state_then_emitter() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let base_log = Arc::clone(&log);

        let mut machine = MachineBuilder::default()
            .with_emitter(TestState::First, move |_: &TestState| {
                base_log.lock().unwrap().push("emitter");
                Ok(TestState::Second)
            })
            .with_state_decorator(TestState::First, tagged(Arc::clone(&log), "d0"))
            .with_decorator(tagged(Arc::clone(&log), "d1"))
            .with_decorator(tagged(Arc::clone(&log), "d2"))
            .build();

        machine.start(TestState::First);

        assert_eq!(*log.lock().unwrap(), vec!["d1", "d2", "d0", "emitter"]);
    }

    #[test]
    fn state_decorators_accumulate_first_added_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut machine = MachineBuilder::default()
            .with_emitter(TestState::First, to(TestState::Second))
            .with_state_decorator(TestState::First, tagged(Arc::clone(&log), "s1"))
            .with_state_decorator(TestState::First, tagged(Arc::clone(&log), "s2"))
            .build();

        machine.start(TestState::First);

        assert_eq!(*log.lock().unwrap(), vec!["s1", "s2"]);
    }

    #[test]
    fn decorator_for_unregistered_state_is_dropped() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut machine = MachineBuilder::default()
            .with_emitter(TestState::First, to(TestState::Second))
            .with_state_decorator(TestState::Third, tagged(Arc::clone(&log), "orphan"))
            .build();

        machine.start(TestState::First);

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(machine.current(), Some(&TestState::Second));
    }

    #[test]
    fn default_error_handler_retries_the_failing_state() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut machine = MachineBuilder::default()
            .with_emitter(TestState::First, move |state: &TestState| {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    Err(TransitionError::failed(state, "warming up"))
                } else {
                    Ok(TestState::Second)
                }
            })
            .build();

        machine.start(TestState::First);

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(machine.current(), Some(&TestState::Second));
    }

    #[test]
    fn with_error_handler_replaces_the_default() {
        let handled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&handled);

        let mut machine = MachineBuilder::default()
            .with_emitter(TestState::First, |state: &TestState| {
                Err(TransitionError::failed(state, "broken"))
            })
            .with_error_handler(move |_: &TestState, err| {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(err)
            })
            .build();

        machine.start(TestState::First);

        assert_eq!(handled.load(Ordering::SeqCst), 1);
        assert_eq!(machine.current(), Some(&TestState::First));
    }
}
