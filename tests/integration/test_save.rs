use crate::helpers::{
    CountingPrompt, FixedClock, PipelineOptions, RecordingNotifier, TestPipeline, png_bytes,
    spawn_pipeline, stored_files,
};
use async_trait::async_trait;
use bytes::Bytes;
use food_lens::{
    application::{
        classify_image::dto::ClassifyImageRequest, save_image::use_case::SaveImageUseCase,
    },
    domain::{
        errors::{PipelineError, Stage},
        events::PipelineEvent,
        image::{
            entity::{DecodedImage, PixelFormat},
            value_objects::{AcquisitionInput, ImageSource},
        },
        persistence::{
            entity::{Capability, Confirmation, SaveOutcome, SaveRequest, StoredImageHandle},
            state::SaveFlowState,
            value_objects::DisplayName,
        },
        session::PipelineSession,
    },
    infrastructure::{platform::permissions::StaticPermissionBroker, storage::traits::ImageStore},
};
use mockall::mock;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

mock! {
    pub Store {}

    #[async_trait]
    impl ImageStore for Store {
        async fn insert(&self, request: &SaveRequest, data: Bytes) -> anyhow::Result<StoredImageHandle>;
        async fn list(&self) -> anyhow::Result<Vec<StoredImageHandle>>;
        async fn read(&self, handle: &StoredImageHandle) -> anyhow::Result<Bytes>;
        async fn delete(&self, handle: &StoredImageHandle) -> anyhow::Result<()>;
    }
}

async fn session_showing(pipeline: &TestPipeline, rgb: [u8; 3]) -> PipelineSession {
    let mut session = PipelineSession::new();
    let request = ClassifyImageRequest {
        input: AcquisitionInput::Gallery(png_bytes(3, 2, rgb).into()),
    };
    pipeline
        .classify
        .execute(request, &mut session, &CancellationToken::new())
        .await
        .expect("classification should succeed");
    session
}

#[tokio::test]
async fn accepted_save_writes_one_png_named_from_timestamp() {
    let pipeline = spawn_pipeline(PipelineOptions::default());
    let session = session_showing(&pipeline, [200, 40, 40]).await;

    let outcome = pipeline
        .save
        .execute(&session, &CancellationToken::new())
        .await
        .expect("save should succeed");

    let SaveOutcome::Saved(handle) = outcome else {
        panic!("expected a stored image");
    };
    assert_eq!(handle.display_name, "Food_Images1718000000");
    assert!(DisplayName::new(handle.display_name.clone()).is_ok());
    assert_eq!(handle.file_name, "Food_Images1718000000.png");
    assert_eq!(handle.mime_type, "image/png");
    assert_eq!((handle.width, handle.height), (3, 2));
    assert!(handle.uri.starts_with("file://"));

    assert_eq!(
        stored_files(&pipeline),
        ["Food_Images1718000000.png", "Food_Images1718000000.png.json"]
    );
    assert_eq!(pipeline.store.list().await.unwrap(), vec![handle.clone()]);
    assert!(pipeline.notifier.notices().contains(&"Image Saved".to_string()));
    assert_eq!(pipeline.prompt.times_asked(), 1);
    assert_eq!(
        pipeline.save.last_states().await,
        [
            SaveFlowState::Idle,
            SaveFlowState::PermissionRequested,
            SaveFlowState::PermissionGranted,
            SaveFlowState::ConfirmationRequested,
            SaveFlowState::ConfirmationAccepted,
            SaveFlowState::Writing,
            SaveFlowState::Saved,
            SaveFlowState::Idle,
        ]
    );
}

#[tokio::test]
async fn denied_permission_writes_nothing_and_skips_dialog() {
    let pipeline = spawn_pipeline(PipelineOptions {
        granted: vec![Capability::Camera, Capability::ReadMedia],
        ..PipelineOptions::default()
    });
    let session = session_showing(&pipeline, [10, 10, 10]).await;

    let err = pipeline
        .save
        .execute(&session, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err, PipelineError::PermissionDenied(Capability::WriteMedia));
    assert!(stored_files(&pipeline).is_empty());
    assert_eq!(pipeline.prompt.times_asked(), 0);
    assert!(
        pipeline
            .notifier
            .notices()
            .contains(&"Please allow permission to download image".to_string())
    );
    assert!(pipeline.notifier.events().contains(&PipelineEvent::PermissionDenied {
        capability: Capability::WriteMedia
    }));
}

#[tokio::test]
async fn declined_dialog_is_not_an_error_and_writes_nothing() {
    let pipeline = spawn_pipeline(PipelineOptions {
        answer: Confirmation::Declined,
        ..PipelineOptions::default()
    });
    let session = session_showing(&pipeline, [10, 200, 10]).await;

    let outcome = pipeline
        .save
        .execute(&session, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, SaveOutcome::Declined);
    assert!(stored_files(&pipeline).is_empty());
    assert!(pipeline.notifier.events().contains(&PipelineEvent::SaveDeclined {
        session_id: session.id
    }));
}

#[tokio::test]
async fn two_saves_in_the_same_second_keep_both_files() {
    let pipeline = spawn_pipeline(PipelineOptions::default());
    let session = session_showing(&pipeline, [90, 90, 200]).await;
    let cancel = CancellationToken::new();

    let first = pipeline.save.execute(&session, &cancel).await.unwrap();
    let second = pipeline.save.execute(&session, &cancel).await.unwrap();

    let (SaveOutcome::Saved(first), SaveOutcome::Saved(second)) = (first, second) else {
        panic!("both saves should succeed");
    };
    assert_eq!(first.display_name, second.display_name);
    assert_ne!(first.file_name, second.file_name);
    assert_eq!(second.file_name, "Food_Images1718000000 (1).png");
    assert_eq!(pipeline.store.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn save_without_image_fails_before_asking_permission() {
    let pipeline = spawn_pipeline(PipelineOptions::default());
    let session = PipelineSession::new();

    let err = pipeline
        .save
        .execute(&session, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::WriteFailure(_)));
    assert_eq!(pipeline.prompt.times_asked(), 0);
    assert_eq!(pipeline.save.last_states().await, [SaveFlowState::Idle]);
}

#[tokio::test]
async fn zero_sized_image_fails_to_save_and_leaves_store_empty() {
    let pipeline = spawn_pipeline(PipelineOptions::default());
    let mut session = PipelineSession::new();
    let empty = DecodedImage::from_raw(0, 0, PixelFormat::Rgba8, Vec::<u8>::new()).unwrap();
    session.display(empty, ImageSource::Camera, None);

    let err = pipeline
        .save
        .execute(&session, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::WriteFailure(_)));
    assert!(stored_files(&pipeline).is_empty());
    assert_eq!(
        pipeline.save.last_states().await.iter().rev().nth(1),
        Some(&SaveFlowState::WriteFailed)
    );
}

#[tokio::test]
async fn cancelled_save_writes_nothing() {
    let pipeline = spawn_pipeline(PipelineOptions::default());
    let session = session_showing(&pipeline, [1, 2, 3]).await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = pipeline.save.execute(&session, &cancel).await.unwrap_err();

    assert_eq!(err, PipelineError::Cancelled(Stage::Write));
    assert!(stored_files(&pipeline).is_empty());
    assert_eq!(pipeline.save.last_states().await.last(), Some(&SaveFlowState::Idle));
}

#[tokio::test]
async fn failed_metadata_write_removes_the_image() {
    let pipeline = spawn_pipeline(PipelineOptions::default());
    let session = session_showing(&pipeline, [40, 40, 200]).await;
    // A non-empty directory where the metadata entry belongs makes its publish fail.
    let blocker = pipeline
        .store
        .root()
        .join("Food_Images1718000000.png.json");
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("occupied"), b"x").unwrap();

    let err = pipeline
        .save
        .execute(&session, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::WriteFailure(_)), "got {err:?}");
    assert_eq!(stored_files(&pipeline), ["Food_Images1718000000.png.json"]);
    assert!(pipeline.store.list().await.unwrap().is_empty());
    assert!(
        pipeline
            .notifier
            .events()
            .iter()
            .any(|e| matches!(e, PipelineEvent::SaveFailed { .. }))
    );
}

fn save_use_case(store: MockStore, granted: Vec<Capability>) -> (SaveImageUseCase, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let use_case = SaveImageUseCase::new(
        Arc::new(StaticPermissionBroker::new(granted)),
        Arc::new(CountingPrompt::new(Confirmation::Accepted)),
        Arc::new(store),
        notifier.clone(),
        Arc::new(FixedClock::at(1_700_000_000)),
    );
    (use_case, notifier)
}

fn displayed_session() -> PipelineSession {
    let mut session = PipelineSession::new();
    let image = DecodedImage::from_raw(1, 1, PixelFormat::Rgb8, vec![5, 6, 7]).unwrap();
    session.display(image, ImageSource::Gallery, None);
    session
}

#[tokio::test]
async fn store_is_never_touched_without_permission() {
    let mut store = MockStore::new();
    store.expect_insert().never();

    let (use_case, _) = save_use_case(store, vec![]);
    let err = use_case
        .execute(&displayed_session(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_recoverable());
}

#[tokio::test]
async fn store_failure_surfaces_as_write_failure() {
    let mut store = MockStore::new();
    store
        .expect_insert()
        .times(1)
        .withf(|request, data| {
            request.display_name.as_str() == "Food_Images1700000000"
                && request.mime_type == "image/png"
                && data.starts_with(b"\x89PNG")
        })
        .returning(|_, _| Err(anyhow::anyhow!("disk full")));

    let (use_case, notifier) = save_use_case(store, vec![Capability::WriteMedia]);
    let session = displayed_session();
    let err = use_case
        .execute(&session, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(&err, PipelineError::WriteFailure(reason) if reason.contains("disk full")));
    assert!(
        notifier
            .events()
            .iter()
            .any(|e| matches!(e, PipelineEvent::SaveFailed { .. }))
    );
    assert!(
        !notifier
            .events()
            .iter()
            .any(|e| matches!(e, PipelineEvent::Saved { .. }))
    );
}
