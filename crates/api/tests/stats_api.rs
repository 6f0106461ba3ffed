//! HTTP-level integration tests for project progress statistics.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_project, get_as, post_json_as, seed_work_segments, translator, ALICE,
};
use linguist_core::status::SegmentStatus;

// ---------------------------------------------------------------------------
// Single project
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stats_count_statuses_words_and_percentages() {
    let app = common::build_test_app();
    let id = create_project(&app, "Progress", None).await;
    seed_work_segments(
        &app,
        id,
        &[
            ("hello world", SegmentStatus::ExactMatch),
            ("a  b   c", SegmentStatus::Reviewed),
            ("", SegmentStatus::Mt),
            ("fuzzy one", SegmentStatus::Fuzzy),
        ],
    )
    .await;

    let response = get_as(app.router(), &format!("/api/v1/projects/{id}/stats"), translator(ALICE)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["project_id"], id);
    assert_eq!(json["degraded"], false);
    assert_eq!(json["total_segments"], 4);
    assert_eq!(json["word_count"], 7);
    assert_eq!(json["status_counts"]["100%"], 1);
    assert_eq!(json["status_counts"]["MT"], 1);
    assert_eq!(json["status_counts"]["Rejected"], 0);
    assert_eq!(json["translated_percentage"], 25.0);
    assert_eq!(json["reviewed_percentage"], 25.0);
}

#[tokio::test]
async fn project_without_segments_has_zero_stats() {
    let app = common::build_test_app();
    let id = create_project(&app, "Empty", None).await;

    let json = body_json(
        get_as(app.router(), &format!("/api/v1/projects/{id}/stats"), translator(ALICE)).await,
    )
    .await;
    assert_eq!(json["total_segments"], 0);
    assert_eq!(json["translated_percentage"], 0.0);
    assert_eq!(json["degraded"], false);
}

#[tokio::test]
async fn stats_for_missing_project_return_404() {
    let app = common::build_test_app();
    let response = get_as(app.router(), "/api/v1/projects/777/stats", translator(ALICE)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Retry and degradation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transient_outage_is_retried() {
    let app = common::build_test_app();
    let id = create_project(&app, "Flaky", None).await;
    seed_work_segments(&app, id, &[("one", SegmentStatus::Edited)]).await;
    app.store.fail_segment_reads(2);

    let json = body_json(
        get_as(app.router(), &format!("/api/v1/projects/{id}/stats"), translator(ALICE)).await,
    )
    .await;
    assert_eq!(json["degraded"], false);
    assert_eq!(json["total_segments"], 1);
}

#[tokio::test]
async fn persistent_outage_degrades_to_zero_stats() {
    let app = common::build_test_app();
    let id = create_project(&app, "Down", None).await;
    seed_work_segments(&app, id, &[("one", SegmentStatus::Edited)]).await;
    app.store.fail_segment_reads(3);

    let response = get_as(app.router(), &format!("/api/v1/projects/{id}/stats"), translator(ALICE)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["degraded"], true);
    assert_eq!(json["total_segments"], 0);
    assert_eq!(json["status_counts"]["Edited"], 0);
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn batch_stats_report_each_project_in_order() {
    let app = common::build_test_app();
    let first = create_project(&app, "First", None).await;
    let second = create_project(&app, "Second", None).await;
    seed_work_segments(&app, second, &[("x y", SegmentStatus::Reviewed)]).await;

    let body = serde_json::json!({ "project_ids": [second, 9999, first, second] });
    let response = post_json_as(app.router(), "/api/v1/projects/stats", translator(ALICE), body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["project_id"], second);
    assert_eq!(items[0]["stats"]["reviewed_percentage"], 100.0);
    assert_eq!(items[1]["project_id"], 9999);
    assert_eq!(items[1]["error"]["code"], "NOT_FOUND");
    assert!(items[1].get("stats").is_none());
    assert_eq!(items[2]["stats"]["total_segments"], 0);
}

#[tokio::test]
async fn batch_stats_require_ids() {
    let app = common::build_test_app();
    let body = serde_json::json!({ "project_ids": [] });

    let response = post_json_as(app.router(), "/api/v1/projects/stats", translator(ALICE), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.starts_with("Batch stats requires"), "unexpected message: {message}");
    assert!(!message.contains("Bulk"));
}
