//! Platform-management API client
//!
//! # Architecture
//!
//! - [`Transport`] issues authenticated requests through the crate's
//!   [`HttpClient`](crate::http::HttpClient), unwraps response envelopes,
//!   re-authenticates once on an expired token, and withholds results after
//!   destroy
//! - [`TokenProvider`] supplies tokens and login credentials
//! - [`AlacrityApi`] wraps one endpoint per method

pub mod auth;
pub mod client;
pub mod commands;
pub mod errors;
pub mod request;

pub use auth::{Credentials, SimpleTokenProvider, TokenProvider};
pub use client::{Transport, TransportBuilder};
pub use commands::{AddDockerNodeRequest, AlacrityApi};
pub use errors::{ApiError, ApiErrorCategory};
pub use request::{ApiRequest, FilePart, HeaderConfig, Payload, Verb};
