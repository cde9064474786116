//! # AlaCrity Domain
//!
//! Wire and model types for the Alacran platform-management API.
//!
//! This crate contains:
//! - The response envelope and its status taxonomy
//! - Data models returned by the typed API methods
//! - Client configuration structures
//! - Domain error types and constants
//!
//! ## Architecture
//! - No dependencies on other AlaCrity crates
//! - No I/O: serde types and pure helpers only

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
