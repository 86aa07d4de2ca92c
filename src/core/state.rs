//! Core State trait for machine states.
//!
//! States are opaque identifiers: the engine compares them for equality and
//! uses them as map keys, but never interprets their value. A run ends when
//! the current state has no registered emitter, so states carry no finality
//! flags of their own.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for machine states.
///
/// States are immutable values that identify a point in a process. The
/// engine looks them up, compares them, and hands them to emitters; it
/// attaches no further meaning to them. Richer context belongs in the
/// closures supplied as emitters, not in the state itself.
///
/// # Required Traits
///
/// - `Clone`: states are committed by value on every transition
/// - `Eq` + `Hash`: states key the emitter map
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states appear in exported histories
///
/// The [`state_enum!`](crate::state_enum) macro generates all of this for a
/// plain enum.
///
/// # Example
///
/// ```rust
/// use statewalk::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum TaskState {
///     Pending,
///     Running,
///     Complete,
/// }
///
/// impl State for TaskState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Pending => "Pending",
///             Self::Running => "Running",
///             Self::Complete => "Complete",
///         }
///     }
/// }
///
/// assert_eq!(TaskState::Running.name(), "Running");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    ///
    /// Returns a static string reference for zero-cost naming.
    fn name(&self) -> &str;
}
