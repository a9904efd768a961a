//! Live collection: parse passes, the per-page session and its scheduler.

pub mod pass;
pub mod scheduler;
pub mod session;
