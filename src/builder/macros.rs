//! Macros for ergonomic state identifier definitions.

/// Generate a state identifier enum and its `StateId` implementation.
///
/// Each variant's identifier name is the variant name.
///
/// # Example
///
/// ```
/// use tickstate::core::StateId;
/// use tickstate::state_id;
///
/// state_id! {
///     pub enum EnemyState {
///         Patrol,
///         Chase,
///         Attack,
///     }
/// }
///
/// assert_eq!(EnemyState::Chase.name(), "Chase");
/// ```
#[macro_export]
macro_rules! state_id {
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
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateId for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::StateId::name(self))
            }
        }
    };
}
