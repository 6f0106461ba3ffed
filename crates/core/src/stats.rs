//! Project progress aggregation.
//!
//! Rolls per-segment statuses up into the counts and percentages used for
//! prioritisation and reporting. Statistics are always recomputed from
//! segments and never persisted.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::status::{FileKind, SegmentStatus};

/// Maximum number of retries after the first failed fetch of segment data.
pub const STATS_MAX_RETRIES: u32 = 2;

/// Default fixed delay between stats fetch attempts, in milliseconds.
pub const DEFAULT_STATS_RETRY_DELAY_MS: u64 = 500;

/// The facts about one segment that aggregation needs.
#[derive(Debug, Clone, Copy)]
pub struct SegmentFacts<'a> {
    pub file_kind: FileKind,
    pub source_text: &'a str,
    pub status: SegmentStatus,
}

/// Aggregated progress for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStats {
    pub total_segments: u64,
    pub word_count: u64,
    /// Always contains every [`SegmentStatus`], zero-filled.
    pub status_counts: BTreeMap<SegmentStatus, u64>,
    /// Share of segments with an exact ("100%") match, in `[0, 100]`.
    pub translated_percentage: f64,
    /// Share of reviewed segments, in `[0, 100]`.
    pub reviewed_percentage: f64,
}

impl ProjectStats {
    /// All-zero statistics. Also the honest fallback when segment data
    /// cannot be fetched.
    pub fn empty() -> Self {
        Self {
            total_segments: 0,
            word_count: 0,
            status_counts: zero_filled_counts(),
            translated_percentage: 0.0,
            reviewed_percentage: 0.0,
        }
    }

    /// Count for a single status.
    pub fn count(&self, status: SegmentStatus) -> u64 {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

impl Default for ProjectStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Number of non-empty whitespace-delimited tokens in `text`.
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Reduce a project's segments into [`ProjectStats`].
///
/// Segments belonging to reference files are skipped entirely.
pub fn aggregate<'a, I>(segments: I) -> ProjectStats
where
    I: IntoIterator<Item = SegmentFacts<'a>>,
{
    let mut status_counts = zero_filled_counts();
    let mut total_segments = 0u64;
    let mut word_count = 0u64;

    for segment in segments
        .into_iter()
        .filter(|s| s.file_kind == FileKind::Work)
    {
        total_segments += 1;
        word_count += count_words(segment.source_text);
        *status_counts.entry(segment.status).or_insert(0) += 1;
    }

    let exact = status_counts[&SegmentStatus::ExactMatch];
    let reviewed = status_counts[&SegmentStatus::Reviewed];

    ProjectStats {
        total_segments,
        word_count,
        status_counts,
        translated_percentage: percentage(exact, total_segments),
        reviewed_percentage: percentage(reviewed, total_segments),
    }
}

/// `part / total` as a percentage, `0.0` when `total` is zero.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

fn zero_filled_counts() -> BTreeMap<SegmentStatus, u64> {
    SegmentStatus::ALL.iter().map(|s| (*s, 0)).collect()
}
