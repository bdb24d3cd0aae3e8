//! Eviction and anomaly auditing.
//!
//! Auditing is side-effect only: an auditor never fails the operation that
//! produced the event.

use std::collections::VecDeque;
use std::sync::Mutex;

use tracing::{info, warn};

use adminhub_core::events::{DomainEvent, SessionEvent};

/// Receives session lifecycle events.
pub trait SessionAuditor: Send + Sync + std::fmt::Debug + 'static {
    /// Record one event.
    fn record(&self, event: SessionEvent);
}

/// Auditor that writes events to the structured log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditor;

impl SessionAuditor for TracingAuditor {
    fn record(&self, event: SessionEvent) {
        let name = event.name();
        match &event {
            SessionEvent::Created {
                session_id,
                user_id,
                client_ip,
            } => {
                info!(event = name, %session_id, %user_id, %client_ip, "Session created");
            }
            SessionEvent::Evicted {
                old_session_id,
                new_session_id,
                user_id,
            } => {
                warn!(
                    event = name,
                    %old_session_id,
                    %new_session_id,
                    %user_id,
                    "Prior session evicted by single-login policy"
                );
            }
            SessionEvent::Rotated {
                old_session_id,
                new_session_id,
                user_id,
            } => {
                info!(event = name, %old_session_id, %new_session_id, %user_id, "Session refreshed");
            }
            SessionEvent::Revoked {
                session_id,
                user_id,
            } => {
                info!(event = name, %session_id, %user_id, "Session revoked by logout");
            }
            SessionEvent::ForcedLogout {
                session_id,
                user_id,
            } => {
                warn!(event = name, %session_id, %user_id, "Session forcibly logged out");
            }
            SessionEvent::Anomaly { token_id, detail } => {
                warn!(event = name, %token_id, %detail, "Session store anomaly");
            }
        }
    }
}

/// Auditor that keeps the most recent events in memory.
#[derive(Debug)]
pub struct MemoryAuditor {
    events: Mutex<VecDeque<DomainEvent>>,
    capacity: usize,
}

impl MemoryAuditor {
    /// Creates an auditor retaining at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
        }
    }

    /// Snapshot of retained events, oldest first.
    pub fn events(&self) -> Vec<DomainEvent> {
        let events = self.events.lock().unwrap_or_else(|p| p.into_inner());
        events.iter().cloned().collect()
    }

    /// Retained payloads, oldest first.
    pub fn payloads(&self) -> Vec<SessionEvent> {
        self.events().into_iter().map(|e| e.payload).collect()
    }
}

impl Default for MemoryAuditor {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl SessionAuditor for MemoryAuditor {
    fn record(&self, event: SessionEvent) {
        let mut events = self.events.lock().unwrap_or_else(|p| p.into_inner());
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(DomainEvent::new(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revoked(n: usize) -> SessionEvent {
        SessionEvent::Revoked {
            session_id: format!("s{n}"),
            user_id: "u".to_string(),
        }
    }

    #[test]
    fn test_memory_auditor_is_bounded() {
        let auditor = MemoryAuditor::new(2);
        for n in 0..3 {
            auditor.record(revoked(n));
        }
        assert_eq!(auditor.payloads(), vec![revoked(1), revoked(2)]);
    }

    #[test]
    fn test_tracing_auditor_accepts_every_event() {
        let auditor = TracingAuditor;
        auditor.record(SessionEvent::Anomaly {
            token_id: "t".to_string(),
            detail: "mismatch".to_string(),
        });
        auditor.record(revoked(0));
    }
}
