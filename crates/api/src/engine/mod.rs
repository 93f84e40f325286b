//! Project-hierarchy engine: validation, progress, and permission decisions
//! layered over the repositories.

pub mod hierarchy;
pub mod permissions;
pub mod progress;
