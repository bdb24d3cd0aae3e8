//! # adminhub-api
//!
//! HTTP API layer for AdminHub built on Axum.
//!
//! Exposes the session lifecycle over JSON: login, refresh, logout, the
//! current principal, and the admin view of online sessions. Credential
//! failures map to 401, store outages to 503.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
