//! Domain logic for the Loreforge campaign-management platform.
//!
//! This crate has no database or HTTP dependencies so the project-hierarchy
//! rules, progress math, and tree assembly can be exercised directly by unit
//! tests and reused by any future worker or CLI tooling.

pub mod error;
pub mod hierarchy;
pub mod history;
pub mod progress;
pub mod roles;
pub mod tree;
pub mod types;
