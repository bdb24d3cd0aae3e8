//! # adminhub-core
//!
//! Core crate for the AdminHub session service. Contains the configuration
//! schemas, the cache provider trait backing the session store, session
//! domain events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AdminHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
