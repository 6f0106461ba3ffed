//! Stats aggregator service.
//!
//! Fetches a project's segments and reduces them with
//! [`linguist_core::stats::aggregate`]. Transient fetch failures are retried
//! with a fixed delay; once the retry budget is spent the caller gets
//! zero-valued statistics flagged as degraded instead of an error.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use linguist_core::error::CoreError;
use linguist_core::stats::{aggregate, ProjectStats, STATS_MAX_RETRIES};
use linguist_core::types::DbId;
use linguist_db::{ProjectStore, SegmentSource};
use serde::Serialize;

/// Statistics for one project as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub project_id: DbId,
    #[serde(flatten)]
    pub stats: ProjectStats,
    /// Set when segment data could not be fetched and `stats` is the
    /// zero-valued fallback.
    pub degraded: bool,
}

pub struct StatsService {
    projects: Arc<dyn ProjectStore>,
    segments: Arc<dyn SegmentSource>,
    retry_delay: Duration,
    max_retries: u32,
}

impl StatsService {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        segments: Arc<dyn SegmentSource>,
        retry_delay: Duration,
    ) -> Self {
        Self {
            projects,
            segments,
            retry_delay,
            max_retries: STATS_MAX_RETRIES,
        }
    }

    /// Aggregate statistics for one project.
    ///
    /// A missing project is an error. An unreachable segment store is not:
    /// after `max_retries` retries the result is [`ProjectStats::empty`]
    /// with `degraded` set.
    pub async fn project_stats(&self, project_id: DbId) -> Result<StatsReport, CoreError> {
        let mut attempt = 0u32;
        loop {
            match self.fetch_once(project_id).await {
                Ok(stats) => {
                    return Ok(StatsReport {
                        project_id,
                        stats,
                        degraded: false,
                    })
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        project_id,
                        attempt,
                        delay_ms = self.retry_delay.as_millis() as u64,
                        error = %e,
                        "Stats fetch failed, retrying",
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!(
                        project_id,
                        attempts = attempt + 1,
                        error = %e,
                        "Stats fetch retries exhausted, returning empty stats",
                    );
                    return Ok(StatsReport {
                        project_id,
                        stats: ProjectStats::empty(),
                        degraded: true,
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Aggregate statistics for several projects concurrently.
    ///
    /// Results come back in the order of `project_ids`; one project's
    /// failure does not affect the others.
    pub async fn many(&self, project_ids: &[DbId]) -> Vec<(DbId, Result<StatsReport, CoreError>)> {
        let results = join_all(project_ids.iter().map(|&id| self.project_stats(id))).await;
        project_ids.iter().copied().zip(results).collect()
    }

    async fn fetch_once(&self, project_id: DbId) -> Result<ProjectStats, CoreError> {
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(CoreError::project_not_found(project_id));
        }

        let segments = self.segments.project_segments(project_id).await?;
        let facts = segments
            .iter()
            .map(|s| s.facts())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(aggregate(facts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use linguist_core::status::{FileKind, SegmentStatus};
    use linguist_db::models::file::CreateProjectFile;
    use linguist_db::models::project::CreateProject;
    use linguist_db::MemoryStore;

    async fn fixture() -> (Arc<MemoryStore>, StatsService, DbId) {
        let store = Arc::new(MemoryStore::new());
        let created = store
            .create(&CreateProject {
                name: "Stats".to_string(),
                source_language: "en".to_string(),
                target_language: "it".to_string(),
                deadline: None,
                files: vec![
                    CreateProjectFile {
                        name: "body.xliff".to_string(),
                        kind: FileKind::Work,
                    },
                    CreateProjectFile {
                        name: "terms.pdf".to_string(),
                        kind: FileKind::Reference,
                    },
                ],
            })
            .await
            .unwrap();
        let (work, reference) = (created.files[0].id, created.files[1].id);
        store.add_segment(work, "hello world", SegmentStatus::ExactMatch).await.unwrap();
        store.add_segment(work, "one two three", SegmentStatus::Reviewed).await.unwrap();
        store.add_segment(work, "draft", SegmentStatus::Mt).await.unwrap();
        store.add_segment(work, "again", SegmentStatus::Mt).await.unwrap();
        store.add_segment(reference, "ignored entirely", SegmentStatus::Reviewed).await.unwrap();

        let svc = StatsService::new(store.clone(), store.clone(), Duration::ZERO);
        (store, svc, created.project.id)
    }

    #[tokio::test]
    async fn aggregates_work_file_segments_only() {
        let (_, svc, id) = fixture().await;
        let report = svc.project_stats(id).await.unwrap();

        assert!(!report.degraded);
        assert_eq!(report.stats.total_segments, 4);
        assert_eq!(report.stats.word_count, 7);
        assert_eq!(report.stats.count(SegmentStatus::Mt), 2);
        assert_eq!(report.stats.translated_percentage, 25.0);
        assert_eq!(report.stats.reviewed_percentage, 25.0);
    }

    #[tokio::test]
    async fn recovers_within_retry_budget() {
        let (store, svc, id) = fixture().await;
        store.fail_segment_reads(STATS_MAX_RETRIES);

        let report = svc.project_stats(id).await.unwrap();
        assert!(!report.degraded);
        assert_eq!(report.stats.total_segments, 4);
    }

    #[tokio::test]
    async fn degrades_after_retry_budget() {
        let (store, svc, id) = fixture().await;
        store.fail_segment_reads(STATS_MAX_RETRIES + 1);

        let report = svc.project_stats(id).await.unwrap();
        assert!(report.degraded);
        assert_eq!(report.stats, ProjectStats::empty());
    }

    #[tokio::test]
    async fn missing_project_is_not_retried_or_degraded() {
        let (_, svc, _) = fixture().await;
        assert_matches!(
            svc.project_stats(999).await,
            Err(CoreError::NotFound { id: 999, .. })
        );
    }

    #[tokio::test]
    async fn many_keeps_request_order() {
        let (_, svc, id) = fixture().await;
        let results = svc.many(&[999, id]).await;

        assert_eq!(results[0].0, 999);
        assert!(results[0].1.is_err());
        assert_eq!(results[1].0, id);
        assert_eq!(results[1].1.as_ref().unwrap().stats.total_segments, 4);
    }
}
