//! Macro for implementing Display and FromStr for configuration enums
//!
//! Configuration enums are read from environment variables and config files,
//! so they need a stable string form and case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use alacrity_domain::impl_config_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Mode {
//!     Fast,
//!     Safe,
//! }
//!
//! impl_config_enum_conversions!(Mode {
//!     Fast => "fast",
//!     Safe => "safe",
//! });
//!
//! assert_eq!("SAFE".parse::<Mode>().unwrap(), Mode::Safe);
//! ```

/// Implements Display and FromStr traits for configuration enums
///
/// This macro generates:
/// - Display trait: writes the lowercase string form
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// The string forms must be lowercase for parsing to round-trip.
#[macro_export]
macro_rules! impl_config_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => ::std::write!(f, $str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!(
                        "Invalid {}: {}",
                        ::std::stringify!($enum_name),
                        s
                    )),
                }
            }
        }
    };
}
