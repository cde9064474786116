//! # AlaCrity Infrastructure
//!
//! Async client for the Alacran platform-management API.
//!
//! This crate contains:
//! - The request transport (auth headers, token-expiry retry, envelope
//!   validation, destroy handling)
//! - Token providers and the typed API methods
//! - The HTTP client wrapper and error conversions
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Depends on `alacrity-domain` for wire types and configuration
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{
    AddDockerNodeRequest, AlacrityApi, ApiError, ApiErrorCategory, ApiRequest, Credentials,
    FilePart, HeaderConfig, Payload, SimpleTokenProvider, TokenProvider, Transport,
    TransportBuilder, Verb,
};
pub use http::{HttpClient, HttpClientBuilder};
