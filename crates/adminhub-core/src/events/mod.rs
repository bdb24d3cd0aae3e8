//! Domain events emitted by AdminHub operations.
//!
//! Events are handed to the session auditor, which logs or records them.

pub mod session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use session::SessionEvent;

/// Wrapper for domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: SessionEvent,
}

impl DomainEvent {
    /// Create a new domain event stamped with the current time.
    pub fn new(payload: SessionEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}
