//! Error conversions
//!
//! Keeps the mapping from third-party error types (reqwest, serde_json) into
//! [`ApiError`](crate::api::ApiError) in one place.

mod conversions;
