//! Well-known role name constants.
//!
//! These must match the role names the upstream gateway places in the
//! `X-User-Role` header.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_TRANSLATOR: &str = "translator";
pub const ROLE_REVIEWER: &str = "reviewer";

/// Roles allowed to release or complete another actor's claim, reopen
/// completed projects and delete projects.
const PRIVILEGED_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER];

/// Whether `role` carries elevated lifecycle privileges.
pub fn is_privileged(role: &str) -> bool {
    PRIVILEGED_ROLES.contains(&role)
}
