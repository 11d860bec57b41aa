mod common;

use common::{planner_answer, record, FakeLLM};
use curator_core::llm::LLMError;
use curator_core::planner::{coverage, PlannerError};
use curator_core::{Planner, PlaylistStatus, TrackStatus};

#[tokio::test]
async fn test_plan_builds_groupings_from_indices() {
    let records: Vec<_> = (0..6).map(record).collect();
    let llm = FakeLLM::answering(planner_answer(&[
        ("Morning", vec![0, 1, 2]),
        ("Evening", vec![2, 3, 4, 5]),
    ]));
    let planner = Planner::new(&llm);

    let groupings = planner.plan(&records, 2).await.unwrap();

    assert_eq!(groupings.len(), 2);
    assert_eq!(groupings[0].title, "Morning");
    assert_eq!(groupings[0].description, "All about Morning");
    assert_eq!(groupings[1].tracks.len(), 4);
    for grouping in &groupings {
        assert_eq!(grouping.status, PlaylistStatus::Pending);
        assert!(grouping.remote_id.is_none());
        assert!(grouping.tracks.iter().all(|t| t.status == TrackStatus::Pending));
    }
    assert!(coverage(&groupings, records.len()).is_empty());
}

#[tokio::test]
async fn test_plan_prompt_carries_records_and_count() {
    let records: Vec<_> = (0..3).map(record).collect();
    let llm = FakeLLM::answering(planner_answer(&[("Only", vec![0, 1, 2])]));
    let planner = Planner::new(&llm);

    planner.plan(&records, 7).await.unwrap();

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("exactly 7"));
    assert!(prompts[0].contains("Track 2"));
    assert!(prompts[0].contains("vid001"));
}

#[tokio::test]
async fn test_plan_trusts_model_output() {
    // Out-of-range and uncovered indices are kept as-is; the executor
    // skips positions it cannot resolve.
    let records: Vec<_> = (0..4).map(record).collect();
    let llm = FakeLLM::answering(planner_answer(&[("Odd", vec![0, 9])]));
    let planner = Planner::new(&llm);

    let groupings = planner.plan(&records, 3).await.unwrap();

    assert_eq!(groupings.len(), 1);
    assert_eq!(groupings[0].tracks[1].position, 9);
    assert_eq!(coverage(&groupings, records.len()), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_plan_fails_on_llm_error() {
    let llm = FakeLLM::failing(500);
    let planner = Planner::new(&llm);

    let result = planner.plan(&[record(0)], 1).await;
    assert!(matches!(
        result,
        Err(PlannerError::LLM(LLMError::ApiError { status: 500, .. }))
    ));
}

#[tokio::test]
async fn test_plan_fails_on_empty_answer() {
    let planner_empty_text = Planner::new(FakeLLM::answering(""));
    assert!(matches!(
        planner_empty_text.plan(&[record(0)], 1).await,
        Err(PlannerError::Empty)
    ));

    let planner_no_playlists = Planner::new(FakeLLM::answering(r#"{"playlists": []}"#));
    assert!(matches!(
        planner_no_playlists.plan(&[record(0)], 1).await,
        Err(PlannerError::Empty)
    ));
}

#[tokio::test]
async fn test_plan_fails_on_malformed_answer() {
    let planner = Planner::new(FakeLLM::answering(r#"{"playlists": [{"playlist_title": 3}]}"#));
    assert!(matches!(
        planner.plan(&[record(0)], 1).await,
        Err(PlannerError::ParseError(_))
    ));
}
