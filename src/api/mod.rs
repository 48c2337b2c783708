//! HTTP client module for the query service.
//!
//! This module provides the `ApiClient` for the login, query, registration,
//! password-recovery, and suggestion endpoints, and the
//! `RequestAuthenticator` hook that attaches the session's bearer token to
//! every outbound request.

pub mod authenticator;
pub mod client;
pub mod error;

pub use authenticator::RequestAuthenticator;
pub use client::{ApiClient, QueryResponse, ServerMessage};
pub use error::ApiError;
