//! Macros for declaring state sets and input alphabets.

/// Generate `State` and `Enumerable` implementations for a fieldless enum.
///
/// # Example
///
/// ```
/// use logic_dojo::state_enum;
/// use logic_dojo::core::{Enumerable, State};
///
/// state_enum! {
///     pub enum LatchState {
///         Reset,
///         Set,
///         Forbidden,
///     }
///     error: [Forbidden]
/// }
///
/// assert_eq!(LatchState::Set.name(), "Set");
/// assert!(LatchState::Forbidden.is_error());
/// assert_eq!(LatchState::all().len(), 3);
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

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
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

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }

        impl $crate::core::Enumerable for $name {
            fn all() -> &'static [Self] {
                const ALL: &[$name] = &[$($name::$variant),*];
                ALL
            }
        }
    };
}

/// Generate a copyable input alphabet with an `Enumerable` implementation.
///
/// # Example
///
/// ```
/// use logic_dojo::symbol_enum;
/// use logic_dojo::core::Enumerable;
///
/// symbol_enum! {
///     pub enum Coin {
///         Nickel,
///         Dime,
///     }
/// }
///
/// assert_eq!(Coin::all(), &[Coin::Nickel, Coin::Dime]);
/// ```
#[macro_export]
macro_rules! symbol_enum {
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
        #[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Enumerable for $name {
            fn all() -> &'static [Self] {
                const ALL: &[$name] = &[$($name::$variant),*];
                ALL
            }
        }
    };
}
