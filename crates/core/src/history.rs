//! Project history action constants.
//!
//! Every mutating operation against a project appends exactly one history
//! entry tagged with one of these actions. History rows are append-only;
//! there is no update or delete path for them anywhere in the codebase.

/// Known action tags for project history entries.
pub mod actions {
    pub const CREATED: &str = "created";
    pub const UPDATED_PROGRESS: &str = "updated_progress";
    pub const UPDATED_GOAL: &str = "updated_goal";
    pub const COMPLETED: &str = "completed";
    pub const DELETED: &str = "deleted";
}

/// All valid history actions.
pub const VALID_ACTIONS: &[&str] = &[
    actions::CREATED,
    actions::UPDATED_PROGRESS,
    actions::UPDATED_GOAL,
    actions::COMPLETED,
    actions::DELETED,
];

/// Check whether an action string is one of the known history actions.
pub fn is_valid_action(action: &str) -> bool {
    VALID_ACTIONS.contains(&action)
}
