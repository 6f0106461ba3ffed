//! Claim manager.
//!
//! Every lifecycle command follows the same three steps: load the project,
//! validate the command against the loaded snapshot, then ask the store for
//! a compare-and-set write guarded by that snapshot. If the write loses a
//! race the project is re-read so the caller gets the precise reason.

use std::sync::Arc;

use linguist_core::error::CoreError;
use linguist_core::lifecycle::{
    check_claim, check_complete, check_delete, check_release, check_reopen, verify_invariants,
    Actor, ClaimDecision, LifecycleCommand,
};
use linguist_core::types::DbId;
use linguist_db::models::project::{CreateProject, Project, ProjectWithFiles};
use linguist_db::ProjectStore;
use linguist_events::{EventBus, PlatformEvent};

pub struct ClaimService {
    store: Arc<dyn ProjectStore>,
    events: Arc<EventBus>,
}

impl ClaimService {
    pub fn new(store: Arc<dyn ProjectStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    /// Validate and insert a new, unclaimed project.
    pub async fn create(
        &self,
        input: &CreateProject,
        actor: &Actor,
    ) -> Result<ProjectWithFiles, CoreError> {
        input.validate()?;
        let created = self.store.create(input).await?;

        tracing::info!(
            project_id = created.project.id,
            actor_id = actor.user_id,
            files = created.files.len(),
            "Project created",
        );
        self.events.publish(
            PlatformEvent::new("project.created")
                .with_source("project", created.project.id)
                .with_actor(actor.user_id),
        );
        Ok(created)
    }

    /// Run `command` against one project.
    ///
    /// Returns the project after the transition, or `None` for removals.
    pub async fn execute(
        &self,
        command: LifecycleCommand,
        project_id: DbId,
        actor: &Actor,
    ) -> Result<Option<Project>, CoreError> {
        match command {
            LifecycleCommand::Claim => self.claim(project_id, actor).await.map(Some),
            LifecycleCommand::Release => self.release(project_id, actor).await.map(Some),
            LifecycleCommand::Complete => self.complete(project_id, actor).await.map(Some),
            LifecycleCommand::Reopen => self.reopen(project_id, actor).await.map(Some),
            LifecycleCommand::Archive | LifecycleCommand::Delete => {
                self.remove(command, project_id, actor).await.map(|()| None)
            }
        }
    }

    /// Take ownership of an unclaimed project.
    ///
    /// Claiming a project the actor already holds succeeds without writing.
    pub async fn claim(&self, project_id: DbId, actor: &Actor) -> Result<Project, CoreError> {
        let current = self.load(project_id).await?;
        if check_claim(project_id, current.ownership()?, actor)? == ClaimDecision::AlreadyHeld {
            return Ok(current);
        }

        match self.store.try_claim(project_id, actor.user_id).await? {
            Some(project) => {
                self.committed(LifecycleCommand::Claim, &project, actor);
                Ok(project)
            }
            None => {
                // Lost the race. Judge the request again against the winner's state.
                let latest = self.load(project_id).await?;
                match check_claim(project_id, latest.ownership()?, actor)? {
                    ClaimDecision::AlreadyHeld => Ok(latest),
                    ClaimDecision::Acquire => Err(concurrent_change(project_id)),
                }
            }
        }
    }

    /// Give a claimed project back to the pool.
    pub async fn release(&self, project_id: DbId, actor: &Actor) -> Result<Project, CoreError> {
        let current = self.load(project_id).await?;
        let owner = check_release(project_id, current.ownership()?, actor)?;

        match self.store.try_release(project_id, owner).await? {
            Some(project) => {
                self.committed(LifecycleCommand::Release, &project, actor);
                Ok(project)
            }
            None => Err(self.lost_race(project_id).await),
        }
    }

    /// Mark a claimed project as finished.
    pub async fn complete(&self, project_id: DbId, actor: &Actor) -> Result<Project, CoreError> {
        let current = self.load(project_id).await?;
        let owner = check_complete(project_id, current.ownership()?, actor)?;

        match self.store.try_complete(project_id, owner).await? {
            Some(project) => {
                self.committed(LifecycleCommand::Complete, &project, actor);
                Ok(project)
            }
            None => Err(self.lost_race(project_id).await),
        }
    }

    /// Return a completed project to its last claimant, or to the pool if
    /// no claimant is recorded.
    pub async fn reopen(&self, project_id: DbId, actor: &Actor) -> Result<Project, CoreError> {
        let current = self.load(project_id).await?;
        check_reopen(project_id, current.status()?, actor)?;

        match self.store.try_reopen(project_id).await? {
            Some(project) => {
                self.committed(LifecycleCommand::Reopen, &project, actor);
                Ok(project)
            }
            None => Err(self.lost_race(project_id).await),
        }
    }

    /// Delete (or archive) a project regardless of status.
    ///
    /// Removing a project that no longer exists succeeds.
    pub async fn remove(
        &self,
        command: LifecycleCommand,
        project_id: DbId,
        actor: &Actor,
    ) -> Result<(), CoreError> {
        check_delete(project_id, actor)?;

        if self.store.delete(project_id).await? {
            tracing::info!(
                project_id,
                actor_id = actor.user_id,
                command = command.event_type(),
                "Project removed",
            );
            self.events.publish(PlatformEvent::lifecycle(
                command,
                project_id,
                actor.user_id,
                None,
            ));
        } else {
            tracing::debug!(project_id, "Project already removed");
        }
        Ok(())
    }

    async fn load(&self, project_id: DbId) -> Result<Project, CoreError> {
        self.store
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| CoreError::project_not_found(project_id))
    }

    /// Explain why a guarded write matched no row.
    async fn lost_race(&self, project_id: DbId) -> CoreError {
        match self.store.find_by_id(project_id).await {
            Ok(None) => CoreError::project_not_found(project_id),
            Ok(Some(_)) => concurrent_change(project_id),
            Err(e) => e.into(),
        }
    }

    fn committed(&self, command: LifecycleCommand, project: &Project, actor: &Actor) {
        let status = match project.lifecycle_fields() {
            Ok(fields) => {
                if let Err(violation) = verify_invariants(&fields) {
                    tracing::error!(project_id = project.id, %violation, "Lifecycle invariant violated");
                }
                Some(fields.status)
            }
            Err(e) => {
                tracing::error!(project_id = project.id, error = %e, "Unreadable project status");
                None
            }
        };

        tracing::info!(
            project_id = project.id,
            actor_id = actor.user_id,
            claimed_by = ?project.claimed_by,
            event = command.event_type(),
            "Project lifecycle transition",
        );
        self.events.publish(PlatformEvent::lifecycle(
            command,
            project.id,
            actor.user_id,
            status,
        ));
    }
}

fn concurrent_change(project_id: DbId) -> CoreError {
    CoreError::Conflict(format!(
        "Project {project_id} was modified concurrently; reload and retry"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use linguist_core::roles::{ROLE_MANAGER, ROLE_TRANSLATOR};
    use linguist_core::status::ProjectStatus;
    use linguist_db::MemoryStore;

    fn service() -> (ClaimService, Arc<EventBus>) {
        let bus = Arc::new(EventBus::default());
        let store: Arc<dyn ProjectStore> = Arc::new(MemoryStore::new());
        (ClaimService::new(store, Arc::clone(&bus)), bus)
    }

    fn input(name: &str) -> CreateProject {
        CreateProject {
            name: name.to_string(),
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            deadline: None,
            files: vec![],
        }
    }

    #[tokio::test]
    async fn claim_publishes_event_and_is_idempotent_for_owner() {
        let (svc, bus) = service();
        let alice = Actor::new(1, ROLE_TRANSLATOR);
        let id = svc.create(&input("A"), &alice).await.unwrap().project.id;
        let mut rx = bus.subscribe();

        let claimed = svc.claim(id, &alice).await.unwrap();
        assert_eq!(claimed.claimed_by, Some(1));
        assert_eq!(rx.recv().await.unwrap().event_type, "project.claimed");

        let again = svc.claim(id, &alice).await.unwrap();
        assert_eq!(again.claimed_at, claimed.claimed_at);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_claims_yield_one_owner_and_conflicts() {
        let (svc, _) = service();
        let svc = Arc::new(svc);
        let id = svc
            .create(&input("Contested"), &Actor::new(100, ROLE_MANAGER))
            .await
            .unwrap()
            .project
            .id;

        let handles: Vec<_> = (1..=8)
            .map(|user_id| {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move {
                    svc.claim(id, &Actor::new(user_id, ROLE_TRANSLATOR)).await
                })
            })
            .collect();

        let mut winners = Vec::new();
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.expect("task panicked") {
                Ok(project) => winners.push(project),
                Err(CoreError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(conflicts, 7);
        let owner = winners[0].claimed_by;
        assert!(owner.is_some());
        let stored = svc.load(id).await.unwrap();
        assert_eq!(stored.claimed_by, owner);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_releases_by_owner_and_manager_have_one_winner() {
        let (svc, _) = service();
        let svc = Arc::new(svc);
        let alice = Actor::new(1, ROLE_TRANSLATOR);
        let id = svc.create(&input("Handoff"), &alice).await.unwrap().project.id;
        svc.claim(id, &alice).await.unwrap();

        let handles: Vec<_> = [alice, Actor::new(9, ROLE_MANAGER)]
            .into_iter()
            .map(|actor| {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move { svc.release(id, &actor).await })
            })
            .collect();

        let mut released = 0;
        for handle in handles {
            match handle.await.expect("task panicked") {
                Ok(_) => released += 1,
                Err(e) => assert_matches!(e, CoreError::Conflict(_)),
            }
        }
        assert_eq!(released, 1);
    }

    #[tokio::test]
    async fn claim_held_by_other_is_conflict() {
        let (svc, _) = service();
        let alice = Actor::new(1, ROLE_TRANSLATOR);
        let bob = Actor::new(2, ROLE_TRANSLATOR);
        let id = svc.create(&input("B"), &alice).await.unwrap().project.id;
        svc.claim(id, &alice).await.unwrap();

        assert_matches!(svc.claim(id, &bob).await, Err(CoreError::Conflict(_)));
        assert_matches!(svc.release(id, &bob).await, Err(CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn manager_can_release_someone_elses_claim() {
        let (svc, _) = service();
        let alice = Actor::new(1, ROLE_TRANSLATOR);
        let boss = Actor::new(9, ROLE_MANAGER);
        let id = svc.create(&input("C"), &alice).await.unwrap().project.id;
        svc.claim(id, &alice).await.unwrap();

        let released = svc.release(id, &boss).await.unwrap();
        assert_eq!(released.status().unwrap(), ProjectStatus::Unclaimed);
        assert_eq!(released.claimed_by, None);
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let (svc, _) = service();
        let alice = Actor::new(1, ROLE_TRANSLATOR);
        assert_matches!(
            svc.claim(404, &alice).await,
            Err(CoreError::NotFound { id: 404, .. })
        );
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_the_store() {
        let (svc, _) = service();
        let mut bad = input("Same langs");
        bad.target_language = "en".to_string();
        assert_matches!(
            svc.create(&bad, &Actor::new(1, ROLE_MANAGER)).await,
            Err(CoreError::Validation(_))
        );
    }
}
