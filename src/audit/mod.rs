//! Append-only audit log
//!
//! Every committed change to a stored key (transaction added or removed,
//! settings rewritten, preference changed) is appended to `audit.log` as one
//! JSON line.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
