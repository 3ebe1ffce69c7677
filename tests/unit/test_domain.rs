use food_lens::domain::{
    classification::{
        entity::ClassificationResult,
        ranking::{Selection, rank, select},
    },
    errors::{PipelineError, Stage},
    image::entity::{DecodedImage, PixelFormat},
    persistence::{
        entity::Capability,
        state::{SaveFlow, SaveFlowState},
        value_objects::DisplayName,
    },
    session::PipelineSession,
};
use chrono::{TimeZone, Utc};

fn result(label: &str, score: f32) -> ClassificationResult {
    ClassificationResult::new(label, score).expect("valid score")
}

#[test]
fn classification_result_rejects_scores_outside_unit_interval() {
    assert!(ClassificationResult::new("ramen", 0.0).is_ok());
    assert!(ClassificationResult::new("ramen", 1.0).is_ok());
    assert!(ClassificationResult::new("ramen", -0.01).is_err());
    assert!(ClassificationResult::new("ramen", 1.01).is_err());
    assert!(matches!(
        ClassificationResult::new("ramen", f32::NAN),
        Err(PipelineError::Inference(_))
    ));
}

#[test]
fn select_returns_the_maximum_score() {
    let top = select(vec![
        result("sushi", 0.10),
        result("pizza", 0.72),
        result("ramen", 0.18),
    ])
    .into_top()
    .expect("non-empty results");

    assert_eq!(top.label(), "pizza");
    assert!((top.score() - 0.72).abs() < f32::EPSILON);
}

#[test]
fn select_breaks_ties_by_model_order() {
    let top = select(vec![
        result("apple pie", 0.4),
        result("baklava", 0.4),
        result("churros", 0.2),
    ])
    .into_top()
    .expect("non-empty results");

    assert_eq!(top.label(), "apple pie");
}

#[test]
fn select_on_empty_output_is_empty_result() {
    let selection = select(Vec::new());
    assert!(matches!(selection, Selection::Empty));
    assert_eq!(selection.into_top().unwrap_err(), PipelineError::EmptyResult);
}

#[test]
fn rank_orders_scores_descending() {
    let ranked = rank(vec![result("a", 0.1), result("b", 0.9), result("c", 0.5)]);
    let labels: Vec<_> = ranked.iter().map(|r| r.label()).collect();
    assert_eq!(labels, ["b", "c", "a"]);
}

#[test]
fn display_name_follows_prefix_and_unix_seconds() {
    let at = Utc.timestamp_opt(1_718_000_000, 0).unwrap();
    assert_eq!(DisplayName::for_timestamp(at).as_str(), "Food_Images1718000000");

    assert!(DisplayName::new("Food_Images1718000000".to_string()).is_ok());
    assert!(DisplayName::new("Food_Images".to_string()).is_err());
    assert!(DisplayName::new("food_images1".to_string()).is_err());
    assert!(DisplayName::new("Food_Images12.png".to_string()).is_err());
}

#[test]
fn display_name_for_pre_epoch_clock_stays_valid() {
    let at = Utc.timestamp_opt(-5, 0).unwrap();
    let name = DisplayName::for_timestamp(at);

    assert_eq!(name.as_str(), "Food_Images0");
    assert!(DisplayName::new(name.value).is_ok());
}

#[test]
fn deserialized_classification_result_is_validated() {
    let valid: ClassificationResult =
        serde_json::from_str(r#"{"label":"ramen","score":0.5}"#).unwrap();
    assert_eq!(valid, result("ramen", 0.5));

    assert!(serde_json::from_str::<ClassificationResult>(r#"{"label":"ramen","score":1.5}"#).is_err());
    assert!(serde_json::from_str::<ClassificationResult>(r#"{"label":"ramen","score":-0.1}"#).is_err());
}

#[test]
fn decoded_image_checks_buffer_length() {
    assert!(DecodedImage::from_raw(2, 2, PixelFormat::Rgba8, vec![0u8; 16]).is_ok());
    assert!(matches!(
        DecodedImage::from_raw(2, 2, PixelFormat::Rgba8, vec![0u8; 15]),
        Err(PipelineError::Decode(_))
    ));

    let empty = DecodedImage::from_raw(0, 4, PixelFormat::Rgb8, Vec::<u8>::new())
        .expect("zero-sized rasters are representable");
    assert!(empty.is_empty());
}

#[test]
fn save_flow_walks_the_happy_path() {
    let mut flow = SaveFlow::new();
    for next in [
        SaveFlowState::PermissionRequested,
        SaveFlowState::PermissionGranted,
        SaveFlowState::ConfirmationRequested,
        SaveFlowState::ConfirmationAccepted,
        SaveFlowState::Writing,
        SaveFlowState::Saved,
    ] {
        flow.advance(next).expect("allowed transition");
    }
    flow.finish().expect("terminal state returns to idle");
    assert_eq!(flow.state(), SaveFlowState::Idle);
    assert_eq!(flow.history().len(), 8);
}

#[test]
fn save_flow_rejects_writing_without_confirmation() {
    let mut flow = SaveFlow::new();
    flow.advance(SaveFlowState::PermissionRequested).unwrap();
    flow.advance(SaveFlowState::PermissionGranted).unwrap();

    let err = flow.advance(SaveFlowState::Writing).unwrap_err();
    assert_eq!(err.from, SaveFlowState::PermissionGranted);
    assert_eq!(flow.state(), SaveFlowState::PermissionGranted);
    assert!(flow.finish().is_err(), "non-terminal state cannot finish");
}

#[test]
fn only_permission_denial_is_recoverable() {
    assert!(PipelineError::PermissionDenied(Capability::WriteMedia).is_recoverable());
    assert!(!PipelineError::EmptyResult.is_recoverable());
    assert!(!PipelineError::Cancelled(Stage::Inference).is_recoverable());
    assert_eq!(
        PipelineError::PermissionDenied(Capability::WriteMedia).user_message(),
        "Please allow permission to download image"
    );
    assert_eq!(
        PipelineError::PermissionDenied(Capability::Camera).user_message(),
        "Permission Denied !! Try again"
    );
}

#[test]
fn new_session_shows_nothing() {
    let session = PipelineSession::new();
    assert!(session.current_image().is_none());
    assert!(session.label().is_none());
}
