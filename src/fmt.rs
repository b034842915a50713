//! Logging shim.
//!
//! Forwards to `defmt` or `log` depending on the enabled feature. With
//! neither enabled the macros evaluate their arguments by reference and
//! compile to nothing.
#![macro_use]
#![allow(unused_macros)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("You may not enable both `defmt` and `log` features.");

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        macro_rules! trace {
            ($s:literal $(, $x:expr)* $(,)?) => {
                ::defmt::trace!($s $(, $x)*)
            };
        }

        macro_rules! debug {
            ($s:literal $(, $x:expr)* $(,)?) => {
                ::defmt::debug!($s $(, $x)*)
            };
        }

        macro_rules! warn {
            ($s:literal $(, $x:expr)* $(,)?) => {
                ::defmt::warn!($s $(, $x)*)
            };
        }
    } else if #[cfg(feature = "log")] {
        macro_rules! trace {
            ($s:literal $(, $x:expr)* $(,)?) => {
                ::log::trace!($s $(, $x)*)
            };
        }

        macro_rules! debug {
            ($s:literal $(, $x:expr)* $(,)?) => {
                ::log::debug!($s $(, $x)*)
            };
        }

        macro_rules! warn {
            ($s:literal $(, $x:expr)* $(,)?) => {
                ::log::warn!($s $(, $x)*)
            };
        }
    } else {
        macro_rules! trace {
            ($s:literal $(, $x:expr)* $(,)?) => {{
                let _ = ($( & $x ),*);
            }};
        }

        macro_rules! debug {
            ($s:literal $(, $x:expr)* $(,)?) => {{
                let _ = ($( & $x ),*);
            }};
        }

        macro_rules! warn {
            ($s:literal $(, $x:expr)* $(,)?) => {{
                let _ = ($( & $x ),*);
            }};
        }
    }
}
