//! Row structs and DTOs for each table.

pub mod campaign;
pub mod character;
pub mod encounter;
pub mod project;
pub mod user;
