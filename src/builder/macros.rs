//! Macros for ergonomic state definitions.

/// Generate a `State` implementation for a plain enum.
///
/// Expands to the derives the engine needs (`Clone`, `Copy`, `Eq`, `Hash`,
/// `Debug`, serde) plus a `name` impl that stringifies each variant. States
/// carry no finality markers: a run ends wherever no emitter is registered.
///
/// # Example
///
/// ```
/// use statewalk::core::State;
/// use statewalk::state_enum;
///
/// state_enum! {
///     pub enum WorkflowState {
///         Start,
///         Processing,
///         Done,
///     }
/// }
///
/// assert_eq!(WorkflowState::Processing.name(), "Processing");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
