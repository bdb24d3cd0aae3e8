//! HTTP-level integration tests for the AdminHub session service.

mod auth_test;
mod helpers;
mod monitor_test;
