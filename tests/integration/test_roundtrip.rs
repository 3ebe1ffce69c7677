use crate::helpers::{PipelineOptions, png_bytes, spawn_pipeline};
use food_lens::{
    application::classify_image::dto::ClassifyImageRequest,
    domain::{
        image::{
            entity::PixelFormat,
            value_objects::{AcquisitionInput, CameraFrame},
        },
        persistence::entity::SaveOutcome,
        session::PipelineSession,
    },
    infrastructure::{image_source::adapter::ImageSourceAdapter, storage::traits::ImageStore},
};
use sha2::{Digest, Sha256};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn saved_gallery_image_decodes_to_same_pixels() {
    let pipeline = spawn_pipeline(PipelineOptions::default());
    let mut session = PipelineSession::new();
    let cancel = CancellationToken::new();
    let request = ClassifyImageRequest {
        input: AcquisitionInput::Gallery(png_bytes(7, 5, [12, 34, 56]).into()),
    };
    pipeline
        .classify
        .execute(request, &mut session, &cancel)
        .await
        .unwrap();

    let SaveOutcome::Saved(handle) = pipeline.save.execute(&session, &cancel).await.unwrap() else {
        panic!("expected a stored image");
    };
    let stored = pipeline.store.read(&handle).await.unwrap();
    assert_eq!(stored.len() as u64, handle.byte_len);
    assert_eq!(format!("{:x}", Sha256::digest(&stored)), handle.sha256);

    let decoded = ImageSourceAdapter.decode(&stored).unwrap();
    let shown = session.current_image().unwrap();
    assert_eq!(decoded.dimensions(), (7, 5));
    assert_eq!(decoded.dimensions(), shown.dimensions());
    assert_eq!(decoded.pixels(), shown.pixels());
}

#[tokio::test]
async fn camera_frame_alpha_survives_png_round_trip() {
    let pipeline = spawn_pipeline(PipelineOptions::default());
    let mut session = PipelineSession::new();
    let cancel = CancellationToken::new();
    let pixels = vec![255, 0, 0, 255, 0, 255, 0, 128];
    let request = ClassifyImageRequest {
        input: AcquisitionInput::Camera(CameraFrame::new(2, 1, PixelFormat::Rgba8, pixels.clone())),
    };
    pipeline
        .classify
        .execute(request, &mut session, &cancel)
        .await
        .unwrap();

    let SaveOutcome::Saved(handle) = pipeline.save.execute(&session, &cancel).await.unwrap() else {
        panic!("expected a stored image");
    };
    let decoded = ImageSourceAdapter
        .decode(&pipeline.store.read(&handle).await.unwrap())
        .unwrap();

    assert_eq!(decoded.format(), PixelFormat::Rgba8);
    assert_eq!(decoded.pixels().as_ref(), pixels.as_slice());
}

#[tokio::test]
async fn deleted_image_disappears_from_listing() {
    let pipeline = spawn_pipeline(PipelineOptions::default());
    let mut session = PipelineSession::new();
    let cancel = CancellationToken::new();
    let request = ClassifyImageRequest {
        input: AcquisitionInput::Gallery(png_bytes(2, 2, [1, 1, 1]).into()),
    };
    pipeline
        .classify
        .execute(request, &mut session, &cancel)
        .await
        .unwrap();
    let SaveOutcome::Saved(handle) = pipeline.save.execute(&session, &cancel).await.unwrap() else {
        panic!("expected a stored image");
    };

    pipeline.store.delete(&handle).await.unwrap();

    assert!(pipeline.store.list().await.unwrap().is_empty());
    assert!(pipeline.store.read(&handle).await.is_err());
}
