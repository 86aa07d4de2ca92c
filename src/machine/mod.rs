//! The machine runtime: a frozen emitter map driven by a dispatch loop.

use crate::core::{Emitter, ErrorHandler, State};
use std::collections::HashMap;
use tracing::{debug, trace};

/// An immutable runtime produced by
/// [`MachineBuilder::build`](crate::builder::MachineBuilder::build).
///
/// The machine owns its current state, the composed emitter map, and one
/// error handler. The map is frozen: nothing mutates it after construction,
/// and a state's decorated emitter is fixed before the first run.
///
/// A machine is single-threaded by contract. [`start`](Machine::start) runs
/// the whole walk on the caller's thread, so one instance must not be started
/// from two threads at once; independent machines run concurrently without
/// coordination.
///
/// # Example
///
/// ```rust
/// use statewalk::builder::to;
/// use statewalk::{state_enum, MachineBuilder};
///
/// state_enum! {
///     enum Step {
///         First,
///         Second,
///     }
/// }
///
/// let mut machine = MachineBuilder::default()
///     .with_emitter(Step::First, to(Step::Second))
///     .build();
///
/// machine.start(Step::First);
/// assert_eq!(machine.current(), Some(&Step::Second));
/// ```
pub struct Machine<S: State + 'static> {
    current: Option<S>,
    emitters: HashMap<S, Emitter<S>>,
    error_handler: ErrorHandler<S>,
}

impl<S: State + 'static> Machine<S> {
    pub(crate) fn from_parts(
        emitters: HashMap<S, Emitter<S>>,
        error_handler: ErrorHandler<S>,
    ) -> Self {
        Self {
            current: None,
            emitters,
            error_handler,
        }
    }

    /// Run the machine from `initial` until it stops.
    ///
    /// Each iteration looks up the emitter for the current state and invokes
    /// it. A state with no emitter ends the run: that is the success path,
    /// and the only one. A failing emitter is routed through the error
    /// handler, which either supplies the next state (commit and continue,
    /// whether or not that state is registered) or returns an error of its
    /// own, which stops the run with the pre-failure state still current.
    ///
    /// `start` returns nothing. A fatal error is observable only through the
    /// handler's side effects and through [`current`](Machine::current) no
    /// longer advancing. A machine whose states route back to themselves
    /// forever will loop forever; bounding retries is the error handler's
    /// job, not the loop's.
    pub fn start(&mut self, initial: S) {
        let mut state = initial;
        self.current = Some(state.clone());

        loop {
            let Some(emitter) = self.emitters.get_mut(&state) else {
                debug!(state = state.name(), "no emitter registered, run complete");
                return;
            };

            let next = match emitter(&state) {
                Ok(next) => next,
                Err(err) => match (self.error_handler)(&state, err) {
                    Ok(next) => next,
                    Err(fatal) => {
                        debug!(
                            state = state.name(),
                            error = %fatal,
                            "error handler stopped the run"
                        );
                        return;
                    }
                },
            };

            trace!(from = state.name(), to = next.name(), "transition committed");
            state = next;
            self.current = Some(state.clone());
        }
    }

    /// The most recently committed state.
    ///
    /// `None` only before the first call to [`start`](Machine::start). After
    /// a run stops this is its final state; after a fatal error it is the
    /// state held before the failed transition.
    pub fn current(&self) -> Option<&S> {
        self.current.as_ref()
    }
}
