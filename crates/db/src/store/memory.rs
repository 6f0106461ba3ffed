use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use linguist_core::error::CoreError;
use linguist_core::lifecycle::reopen_target;
use linguist_core::status::{ProjectStatus, SegmentStatus};
use linguist_core::types::DbId;
use tokio::sync::Mutex;

use super::{ProjectStore, SegmentSource, StoreError};
use crate::models::file::ProjectFile;
use crate::models::project::{CreateProject, Project, ProjectWithFiles};
use crate::models::segment::ProjectSegment;

/// In-process store with the same semantics as [`super::PgStore`].
///
/// Every compare-and-set runs under a single mutex guard, which gives the
/// same first-writer-wins behaviour as the conditional `UPDATE`s.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    /// Number of upcoming segment reads that fail as unavailable.
    segment_outages: AtomicU32,
}

#[derive(Default)]
struct MemoryState {
    last_id: DbId,
    projects: BTreeMap<DbId, Project>,
    files: Vec<ProjectFile>,
    segments: Vec<ProjectSegment>,
}

impl MemoryState {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    /// Apply `change` to project `id` if `guard` accepts its current state.
    fn compare_and_set(
        &mut self,
        id: DbId,
        guard: impl FnOnce(&Project) -> bool,
        change: impl FnOnce(&mut Project),
    ) -> Option<Project> {
        let project = self.projects.get_mut(&id)?;
        if !guard(&*project) {
            return None;
        }
        change(project);
        project.updated_at = Utc::now();
        Some(project.clone())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `times` segment reads fail with
    /// [`StoreError::Unavailable`].
    pub fn fail_segment_reads(&self, times: u32) {
        self.segment_outages.store(times, Ordering::SeqCst);
    }

    /// Append a segment to an existing file. Stands in for the ingestion
    /// pipeline, which owns segment writes in production.
    pub async fn add_segment(
        &self,
        file_id: DbId,
        source_text: &str,
        status: SegmentStatus,
    ) -> Result<ProjectSegment, CoreError> {
        let mut state = self.state.lock().await;
        let file_kind_id = state
            .files
            .iter()
            .find(|f| f.id == file_id)
            .map(|f| f.kind_id)
            .ok_or(CoreError::NotFound {
                entity: "File",
                id: file_id,
            })?;
        let position = state.segments.iter().filter(|s| s.file_id == file_id).count() as i32;
        let segment = ProjectSegment {
            id: state.next_id(),
            file_id,
            file_kind_id,
            position,
            source_text: source_text.to_string(),
            target_text: String::new(),
            status_id: status.id(),
        };
        state.segments.push(segment.clone());
        Ok(segment)
    }

    /// Overwrite a project's lifecycle fields directly, bypassing the
    /// guards. Used to set up fixtures such as completed projects whose
    /// claimant record is gone.
    pub async fn overwrite_project(&self, project: Project) {
        let mut state = self.state.lock().await;
        state.projects.insert(project.id, project);
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        let state = self.state.lock().await;
        let mut projects: Vec<Project> = state.projects.values().cloned().collect();
        // Earliest deadline first, missing deadlines last, then newest first.
        projects.sort_by(|a, b| {
            match (a.deadline, b.deadline) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
        });
        Ok(projects)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Project>, StoreError> {
        Ok(self.state.lock().await.projects.get(&id).cloned())
    }

    async fn files(&self, project_id: DbId) -> Result<Vec<ProjectFile>, StoreError> {
        let state = self.state.lock().await;
        let mut files: Vec<ProjectFile> = state
            .files
            .iter()
            .filter(|f| f.project_id == project_id)
            .cloned()
            .collect();
        files.sort_by_key(|f| f.position);
        Ok(files)
    }

    async fn create(&self, input: &CreateProject) -> Result<ProjectWithFiles, StoreError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let project = Project {
            id: state.next_id(),
            name: input.name.trim().to_string(),
            source_language: input.source_language.clone(),
            target_language: input.target_language.clone(),
            status_id: ProjectStatus::Unclaimed.id(),
            claimed_by: None,
            claimed_at: None,
            last_claimed_by: None,
            completed_at: None,
            deadline: input.deadline,
            created_at: now,
            updated_at: now,
        };

        let mut files = Vec::with_capacity(input.files.len());
        for (position, file) in input.files.iter().enumerate() {
            files.push(ProjectFile {
                id: state.next_id(),
                project_id: project.id,
                name: file.name.trim().to_string(),
                kind_id: file.kind.id(),
                position: position as i32,
                created_at: now,
            });
        }

        state.projects.insert(project.id, project.clone());
        state.files.extend(files.iter().cloned());
        Ok(ProjectWithFiles { project, files })
    }

    async fn try_claim(&self, id: DbId, actor_id: DbId) -> Result<Option<Project>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.compare_and_set(
            id,
            |p| p.status_id == ProjectStatus::Unclaimed.id(),
            |p| {
                p.status_id = ProjectStatus::Claimed.id();
                p.claimed_by = Some(actor_id);
                p.claimed_at = Some(Utc::now());
            },
        ))
    }

    async fn try_release(&self, id: DbId, owner: DbId) -> Result<Option<Project>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.compare_and_set(
            id,
            |p| p.status_id == ProjectStatus::Claimed.id() && p.claimed_by == Some(owner),
            |p| {
                p.status_id = ProjectStatus::Unclaimed.id();
                p.claimed_by = None;
                p.claimed_at = None;
            },
        ))
    }

    async fn try_complete(&self, id: DbId, owner: DbId) -> Result<Option<Project>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.compare_and_set(
            id,
            |p| p.status_id == ProjectStatus::Claimed.id() && p.claimed_by == Some(owner),
            |p| {
                p.status_id = ProjectStatus::Completed.id();
                p.last_claimed_by = p.claimed_by.take();
                p.claimed_at = None;
                p.completed_at = Some(Utc::now());
            },
        ))
    }

    async fn try_reopen(&self, id: DbId) -> Result<Option<Project>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.compare_and_set(
            id,
            |p| p.status_id == ProjectStatus::Completed.id(),
            |p| {
                let claimant = p.last_claimed_by.take();
                p.status_id = reopen_target(claimant).id();
                p.claimed_by = claimant;
                p.claimed_at = claimant.map(|_| Utc::now());
                p.completed_at = None;
            },
        ))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        if state.projects.remove(&id).is_none() {
            return Ok(false);
        }
        let file_ids: Vec<DbId> = state
            .files
            .iter()
            .filter(|f| f.project_id == id)
            .map(|f| f.id)
            .collect();
        state.files.retain(|f| f.project_id != id);
        state.segments.retain(|s| !file_ids.contains(&s.file_id));
        Ok(true)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl SegmentSource for MemoryStore {
    async fn project_segments(&self, project_id: DbId) -> Result<Vec<ProjectSegment>, StoreError> {
        let outage = self
            .segment_outages
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if outage {
            return Err(StoreError::Unavailable(
                "segment store is not reachable".to_string(),
            ));
        }

        let state = self.state.lock().await;
        let mut files: Vec<&ProjectFile> = state
            .files
            .iter()
            .filter(|f| f.project_id == project_id)
            .collect();
        files.sort_by_key(|f| f.position);

        let mut segments = Vec::new();
        for file in files {
            let mut in_file: Vec<ProjectSegment> = state
                .segments
                .iter()
                .filter(|s| s.file_id == file.id)
                .cloned()
                .collect();
            in_file.sort_by_key(|s| s.position);
            segments.extend(in_file);
        }
        Ok(segments)
    }
}
