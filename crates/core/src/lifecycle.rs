//! Project claim lifecycle rules.
//!
//! ```text
//!   Unclaimed --claim--> Claimed --complete--> Completed
//!       ^                  |                      |
//!       +-----release------+        reopen -------+--> Claimed (historical claimant)
//!                                                 +--> Unclaimed (no claimant known)
//!   (any) --delete/archive--> removed
//! ```
//!
//! The functions here decide whether a command is allowed given a snapshot
//! of the project. Committing the change is the store's job, and the store
//! re-checks the snapshot atomically so a concurrent writer cannot slip in
//! between the decision and the write.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles;
use crate::status::ProjectStatus;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// The identity issuing a lifecycle command or viewing a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: String,
}

impl Actor {
    pub fn new(user_id: DbId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    /// Whether this actor may act on claims it does not own.
    pub fn is_privileged(&self) -> bool {
        roles::is_privileged(&self.role)
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Every command that may change a project's lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleCommand {
    Claim,
    Release,
    Complete,
    Reopen,
    /// Same destructive operation as `Delete`; no retained archived state.
    Archive,
    Delete,
}

impl LifecycleCommand {
    /// Dot-separated event name published after a successful command.
    pub fn event_type(self) -> &'static str {
        match self {
            Self::Claim => "project.claimed",
            Self::Release => "project.released",
            Self::Complete => "project.completed",
            Self::Reopen => "project.reopened",
            Self::Archive => "project.archived",
            Self::Delete => "project.deleted",
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The lifecycle-relevant fields of a project at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub status: ProjectStatus,
    pub claimed_by: Option<DbId>,
}

/// Outcome of validating a claim request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDecision {
    /// The project is unclaimed; attempt the conditional write.
    Acquire,
    /// The actor already owns the project; nothing to write.
    AlreadyHeld,
}

/// Validate `claim`. A project held by someone else, or already completed,
/// is a conflict.
pub fn check_claim(
    project_id: DbId,
    current: Ownership,
    actor: &Actor,
) -> Result<ClaimDecision, CoreError> {
    match current.status {
        ProjectStatus::Unclaimed => Ok(ClaimDecision::Acquire),
        ProjectStatus::Claimed if current.claimed_by == Some(actor.user_id) => {
            Ok(ClaimDecision::AlreadyHeld)
        }
        ProjectStatus::Claimed => Err(CoreError::Conflict(format!(
            "Project {project_id} is already claimed by another user"
        ))),
        ProjectStatus::Completed => Err(CoreError::Conflict(format!(
            "Project {project_id} is completed and cannot be claimed"
        ))),
    }
}

/// Validate `release`. Returns the current owner, which the store uses as
/// the compare-and-set guard.
pub fn check_release(
    project_id: DbId,
    current: Ownership,
    actor: &Actor,
) -> Result<DbId, CoreError> {
    check_owner_or_privileged(project_id, current, actor, "release")
}

/// Validate `complete`. Same ownership rule as `release`.
pub fn check_complete(
    project_id: DbId,
    current: Ownership,
    actor: &Actor,
) -> Result<DbId, CoreError> {
    check_owner_or_privileged(project_id, current, actor, "complete")
}

fn check_owner_or_privileged(
    project_id: DbId,
    current: Ownership,
    actor: &Actor,
    verb: &str,
) -> Result<DbId, CoreError> {
    let owner = match (current.status, current.claimed_by) {
        (ProjectStatus::Claimed, Some(owner)) => owner,
        (ProjectStatus::Claimed, None) => {
            return Err(CoreError::Internal(format!(
                "Project {project_id} is claimed but has no owner"
            )))
        }
        (status, _) => {
            return Err(CoreError::Conflict(format!(
                "Cannot {verb} project {project_id}: it is {status:?}, not Claimed"
            )))
        }
    };

    if owner == actor.user_id || actor.is_privileged() {
        Ok(owner)
    } else {
        Err(CoreError::Forbidden(format!(
            "Only the owner or a manager may {verb} project {project_id}"
        )))
    }
}

/// Validate `reopen`. Privileged only, and only from Completed.
pub fn check_reopen(
    project_id: DbId,
    status: ProjectStatus,
    actor: &Actor,
) -> Result<(), CoreError> {
    if !actor.is_privileged() {
        return Err(CoreError::Forbidden(format!(
            "Only a manager may reopen project {project_id}"
        )));
    }
    if status != ProjectStatus::Completed {
        return Err(CoreError::Conflict(format!(
            "Cannot reopen project {project_id}: it is {status:?}, not Completed"
        )));
    }
    Ok(())
}

/// Validate `delete`/`archive`. Privileged only.
pub fn check_delete(project_id: DbId, actor: &Actor) -> Result<(), CoreError> {
    if actor.is_privileged() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Only a manager may delete project {project_id}"
        )))
    }
}

/// Status a completed project returns to when reopened.
pub fn reopen_target(last_claimed_by: Option<DbId>) -> ProjectStatus {
    if last_claimed_by.is_some() {
        ProjectStatus::Claimed
    } else {
        ProjectStatus::Unclaimed
    }
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

/// Presence of every lifecycle field on a stored project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleFields {
    pub status: ProjectStatus,
    pub claimed_by: Option<DbId>,
    pub has_claimed_at: bool,
    pub has_completed_at: bool,
    pub last_claimed_by: Option<DbId>,
}

/// Check the data-model invariants:
///
/// - `claimed_by` and `claimed_at` are set iff status is Claimed;
/// - `completed_at` is set iff status is Completed;
/// - `last_claimed_by` is only set while Completed.
pub fn verify_invariants(fields: &LifecycleFields) -> Result<(), String> {
    let claimed = fields.status == ProjectStatus::Claimed;
    let completed = fields.status == ProjectStatus::Completed;

    if fields.claimed_by.is_some() != claimed {
        return Err(format!(
            "claimed_by presence does not match status {:?}",
            fields.status
        ));
    }
    if fields.has_claimed_at != claimed {
        return Err(format!(
            "claimed_at presence does not match status {:?}",
            fields.status
        ));
    }
    if fields.has_completed_at != completed {
        return Err(format!(
            "completed_at presence does not match status {:?}",
            fields.status
        ));
    }
    if fields.last_claimed_by.is_some() && !completed {
        return Err(format!(
            "last_claimed_by set while status is {:?}",
            fields.status
        ));
    }
    Ok(())
}
