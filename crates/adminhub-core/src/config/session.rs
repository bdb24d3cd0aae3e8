//! Session store access configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Session store access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Deadline for each individual store round-trip, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout(),
        }
    }
}

impl SessionConfig {
    /// Per-call store deadline.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Rejects a zero deadline.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.store_timeout_ms == 0 {
            return Err(AppError::configuration(
                "session.store_timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_store_timeout() -> u64 {
    2000
}
