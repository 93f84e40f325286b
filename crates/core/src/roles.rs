//! Campaign role name constants.
//!
//! Roles are consumed from `campaign_members` rows; a user with no row in a
//! campaign has no role there at all.

/// Game master: elevated role granting edit rights over the campaign's projects.
pub const ROLE_GM: &str = "gm";
/// Regular campaign member.
pub const ROLE_PLAYER: &str = "player";

/// All valid campaign roles.
pub const VALID_ROLES: &[&str] = &[ROLE_GM, ROLE_PLAYER];

/// Check whether a role string is one of the known campaign roles.
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}
