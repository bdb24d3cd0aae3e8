//! Session lifecycle: the store, the record, the manager, and auditing.

pub mod audit;
pub mod manager;
pub mod monitor;
pub mod record;
pub mod store;

pub use audit::{MemoryAuditor, SessionAuditor, TracingAuditor};
pub use manager::{SessionManager, SessionPolicy, TokenPair};
pub use record::SessionRecord;
pub use store::SessionStore;
