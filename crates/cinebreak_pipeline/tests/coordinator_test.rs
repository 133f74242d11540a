//! Tests for the pipeline coordinator.

mod test_utils;

use cinebreak_core::{CharacterRole, ImageHandle, ImageStyle, StructuredRequest};
use cinebreak_error::{CinebreakErrorKind, InputErrorKind, ProviderErrorKind};
use cinebreak_interface::SnapshotStore;
use cinebreak_pipeline::{
    BreakdownPipeline, CharacterPatch, PipelineCoordinator, PipelineSettings, RepairOutcome,
    SceneSyncOutcome,
};
use std::sync::Arc;
use std::time::Duration;
use test_utils::*;

fn coordinator(model: Arc<MockTransport>, images: Arc<MockImages>) -> PipelineCoordinator {
    PipelineCoordinator::new(pipeline(model, images))
}

fn gated_coordinator(model: Arc<GatedTransport>) -> PipelineCoordinator {
    PipelineCoordinator::new(BreakdownPipeline::new(
        model,
        Arc::new(MockImages::new()),
        PipelineSettings::default(),
    ))
}

fn input_kind(err: &cinebreak_error::CinebreakError) -> InputErrorKind {
    match err.kind() {
        CinebreakErrorKind::Input(e) => e.kind.clone(),
        other => panic!("expected input error, got {}", other),
    }
}

#[tokio::test]
async fn test_submit_sets_document_and_saves_snapshot() {
    let model = Arc::new(MockTransport::new_success(structure_response()));
    let history = Arc::new(MemoryHistory::default());
    let coordinator =
        coordinator(model, Arc::new(MockImages::new())).with_history(history.clone());

    let document = coordinator.submit(script()).await.unwrap();

    assert_eq!(coordinator.document().await, Some(document.clone()));
    let saved = history.load_all().await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].title, "O Casamento");
    assert_eq!(saved[0].document, document);
}

#[tokio::test]
async fn test_failed_submit_keeps_previous_document() {
    let model = Arc::new(MockTransport::new_sequence(vec![
        MockResponse::Success(structure_response()),
        MockResponse::Success(r#"{"scenes": []}"#.to_string()),
    ]));
    let history = Arc::new(MemoryHistory::default());
    let coordinator =
        coordinator(model, Arc::new(MockImages::new())).with_history(history.clone());

    let first = coordinator.submit(script()).await.unwrap();
    assert!(coordinator.submit(script()).await.is_err());

    assert_eq!(coordinator.document().await, Some(first));
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_snapshot_failure_does_not_fail_submit() {
    let model = Arc::new(MockTransport::new_success(structure_response()));
    let coordinator = coordinator(model, Arc::new(MockImages::new()))
        .with_history(Arc::new(MemoryHistory::read_only()));

    assert!(coordinator.submit(script()).await.is_ok());
    assert!(coordinator.document().await.is_some());
}

#[tokio::test]
async fn test_operations_need_a_document() {
    let model = Arc::new(MockTransport::new_success("{}"));
    let coordinator = coordinator(model.clone(), Arc::new(MockImages::new()));

    let err = coordinator.generate_shots_for_scene(0).await.unwrap_err();
    assert_eq!(input_kind(&err), InputErrorKind::NoDocument);
    let err = coordinator.sync_characters().await.unwrap_err();
    assert_eq!(input_kind(&err), InputErrorKind::NoDocument);
    let err = coordinator.export_json().await.unwrap_err();
    assert_eq!(input_kind(&err), InputErrorKind::NoDocument);
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_shot_generation_touches_only_its_scene() {
    let model = Arc::new(MockTransport::new_success(shots_response(2, "Girl at a window")));
    let coordinator = coordinator(model, Arc::new(MockImages::new()));
    let original = document_with_shots();
    coordinator.load_document(original.clone(), Some(script())).await;

    let shots = coordinator.generate_shots_for_scene(1).await.unwrap();

    let document = coordinator.document().await.unwrap();
    assert_eq!(shots.len(), 2);
    assert_eq!(document.scenes[1].shots, shots);
    assert_eq!(document.scenes[0], original.scenes[0]);
    assert_eq!(document.scenes[2], original.scenes[2]);
    assert_eq!(document.characters, original.characters);
}

#[tokio::test]
async fn test_scene_description_stands_in_for_missing_script() {
    let model = Arc::new(MockTransport::new_success(shots_response(1, "p")));
    let coordinator = coordinator(model.clone(), Arc::new(MockImages::new()));
    coordinator.load_document(document_with_shots(), None).await;

    coordinator.generate_shots_for_scene(2).await.unwrap();

    assert_eq!(
        request_text(&model.last_request()),
        "Scene: INT. LOCAL 3 - DIA\nSummary: Resumo 3"
    );
}

#[tokio::test]
async fn test_out_of_range_scene_is_rejected() {
    let model = Arc::new(MockTransport::new_success(shots_response(1, "p")));
    let coordinator = coordinator(model.clone(), Arc::new(MockImages::new()));
    coordinator.load_document(document_with_shots(), None).await;

    let err = coordinator.generate_shots_for_scene(3).await.unwrap_err();

    assert_eq!(
        input_kind(&err),
        InputErrorKind::SceneOutOfRange { index: 3, len: 3 }
    );
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_failed_shot_generation_keeps_previous_shots() {
    let model = Arc::new(MockTransport::new_error(ProviderErrorKind::EmptyResponse));
    let coordinator = coordinator(model, Arc::new(MockImages::new()));
    let original = document_with_shots();
    coordinator.load_document(original.clone(), None).await;

    assert!(coordinator.generate_shots_for_scene(0).await.is_err());
    assert_eq!(coordinator.document().await, Some(original));
}

#[tokio::test]
async fn test_costume_change_propagates_to_every_scene() {
    let model = Arc::new(MockTransport::new_handler(rewrite_responder(
        "red dress",
        "blue coat",
    )));
    let coordinator = coordinator(model.clone(), Arc::new(MockImages::new()));
    coordinator.load_document(document_with_shots(), None).await;

    let patch = CharacterPatch::builder()
        .costume_description("Woman in her 30s, blue coat")
        .build()
        .unwrap();
    assert!(coordinator.update_character("MARIA", &patch).await.unwrap());

    let report = coordinator.sync_characters().await.unwrap();
    let document = coordinator.document().await.unwrap();

    for index in [0, 2] {
        for shot in &document.scenes[index].shots {
            assert!(shot.visual_prompt.contains("blue coat"), "{}", shot.visual_prompt);
            assert!(!shot.visual_prompt.contains("red dress"));
            assert!(shot.image_url.is_none());
        }
    }
    assert_eq!(
        document.scenes[1].shots[0].image_url.as_deref(),
        Some("https://img.test/j.png")
    );
    assert_eq!(report.changed_shots(), 3);
    assert!(report.failures().is_empty());
    assert!(model.requests().iter().all(|r: &StructuredRequest| {
        !r.system_instruction().contains("MARIA: Woman in her 30s, red dress")
    }));
}

#[tokio::test]
async fn test_sync_isolates_scene_failures() {
    let rewrite = rewrite_responder("red dress", "blue coat");
    let model = Arc::new(MockTransport::new_handler(move |request: &StructuredRequest| {
        if request_text(request).contains("green scarf") {
            MockResponse::Success("Desculpe, não posso ajudar.".to_string())
        } else {
            rewrite(request)
        }
    }));
    let coordinator = coordinator(model.clone(), Arc::new(MockImages::new()));
    let original = document_with_shots();
    coordinator.load_document(original.clone(), None).await;

    let report = coordinator.sync_characters().await.unwrap();
    let document = coordinator.document().await.unwrap();

    assert_eq!(model.call_count(), 3);
    assert_eq!(report.failures(), vec![1]);
    assert_eq!(document.scenes[1], original.scenes[1]);
    assert!(document.scenes[0].shots[0].visual_prompt.contains("blue coat"));
    assert!(matches!(
        report.scenes[0].outcome,
        SceneSyncOutcome::Repaired(RepairOutcome::Updated(_))
    ));
}

#[tokio::test]
async fn test_sync_skips_scenes_without_shots() {
    let model = Arc::new(MockTransport::new_handler(echo_responder()));
    let coordinator = coordinator(model.clone(), Arc::new(MockImages::new()));
    let mut document = document_with_shots();
    document.scenes[1].shots.clear();
    coordinator.load_document(document.clone(), None).await;

    let report = coordinator.sync_characters().await.unwrap();

    assert_eq!(model.call_count(), 2);
    let indices: Vec<_> = report.scenes.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert_eq!(report.changed_shots(), 0);
    assert_eq!(coordinator.document().await, Some(document));
}

#[tokio::test]
async fn test_update_character_fields() {
    let model = Arc::new(MockTransport::new_success("{}"));
    let coordinator = coordinator(model, Arc::new(MockImages::new()));
    coordinator.load_document(document_with_shots(), None).await;

    let patch = CharacterPatch::builder()
        .role(CharacterRole::SupportingCast)
        .actor_name("Fernanda Souza")
        .notes("Disponível só às terças")
        .build()
        .unwrap();
    assert!(!coordinator.update_character("JUANA", &patch).await.unwrap());

    let clear = CharacterPatch::builder().actor_name("").build().unwrap();
    coordinator.update_character("JUANA", &clear).await.unwrap();

    let document = coordinator.document().await.unwrap();
    let juana = document.character("JUANA").unwrap();
    assert_eq!(juana.role, CharacterRole::SupportingCast);
    assert_eq!(juana.actor_name, None);
    assert_eq!(juana.notes.as_deref(), Some("Disponível só às terças"));
    assert_eq!(juana.costume_description, "Girl with green scarf");

    let err = coordinator
        .update_character("juana", &patch)
        .await
        .unwrap_err();
    assert_eq!(input_kind(&err), InputErrorKind::UnknownCharacter("juana".into()));
}

#[tokio::test]
async fn test_shot_image_is_stored_on_the_shot() {
    let images = Arc::new(MockImages::new());
    let coordinator = coordinator(Arc::new(MockTransport::new_success("{}")), images.clone());
    coordinator.load_document(document_with_shots(), None).await;

    let handle = coordinator
        .generate_shot_image(2, 1, ImageStyle::Realistic)
        .await
        .unwrap();

    assert!(matches!(handle, ImageHandle::DataUri(_)));
    let document = coordinator.document().await.unwrap();
    assert_eq!(document.scenes[2].shots[0].image_url.as_deref(), Some(handle.as_str()));
    assert_eq!(
        images.prompts(),
        vec![format!(
            "{}Woman in a red dress talks to a priest",
            ImageStyle::Realistic.prefix()
        )]
    );
}

#[tokio::test]
async fn test_failed_image_keeps_previous_image() {
    let coordinator = coordinator(
        Arc::new(MockTransport::new_success("{}")),
        Arc::new(MockImages::failing()),
    );
    let original = document_with_shots();
    coordinator.load_document(original.clone(), None).await;

    let err = coordinator
        .generate_shot_image(0, 1, ImageStyle::Sketch)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), CinebreakErrorKind::Image(_)));

    let err = coordinator
        .generate_shot_image(0, 9, ImageStyle::Sketch)
        .await
        .unwrap_err();
    assert_eq!(input_kind(&err), InputErrorKind::ShotNotFound { scene: 0, shot: 9 });
    assert_eq!(coordinator.document().await, Some(original));
}

#[tokio::test]
async fn test_export_then_import_restores_document() {
    let source = coordinator(
        Arc::new(MockTransport::new_success("{}")),
        Arc::new(MockImages::new()),
    );
    source.load_document(document_with_shots(), None).await;
    let json = source.export_json().await.unwrap();

    let target = coordinator(
        Arc::new(MockTransport::new_success("{}")),
        Arc::new(MockImages::new()),
    );
    target.import_json(&json).await.unwrap();

    assert_eq!(target.document().await, source.document().await);
    assert!(target.import_json("{\"title\": 1}").await.is_err());
}

#[tokio::test]
async fn test_shots_are_dropped_when_the_scene_was_replaced() {
    let model = Arc::new(GatedTransport::held(MockTransport::new_success(shots_response(
        2, "p",
    ))));
    let coordinator = gated_coordinator(model.clone());
    coordinator.load_document(document_with_shots(), None).await;

    let mut replaced = document_with_shots();
    replaced.scenes.remove(1);
    let (shots, _) = tokio::join!(coordinator.generate_shots_for_scene(1), async {
        model.wait_for_calls(1).await;
        coordinator.load_document(replaced.clone(), None).await;
        model.release(1);
    });

    assert_eq!(shots.unwrap().len(), 2);
    assert_eq!(coordinator.document().await, Some(replaced));
}

#[tokio::test]
async fn test_sync_repairs_scenes_concurrently() {
    let model = Arc::new(GatedTransport::barrier(
        MockTransport::new_handler(rewrite_responder("red dress", "blue coat")),
        3,
    ));
    let coordinator = gated_coordinator(model.clone());
    coordinator.load_document(document_with_shots(), None).await;

    let report = tokio::time::timeout(Duration::from_secs(5), coordinator.sync_characters())
        .await
        .expect("scenes were repaired one at a time")
        .unwrap();

    assert_eq!(model.inner().call_count(), 3);
    assert_eq!(report.scenes.len(), 3);
    assert_eq!(report.changed_shots(), 3);
}

#[tokio::test]
async fn test_sync_waits_for_every_scene_before_merging() {
    let rewrite = rewrite_responder("red dress", "blue coat");
    let inner = MockTransport::new_handler(move |request: &StructuredRequest| {
        if request_text(request).contains("green scarf") {
            MockResponse::Error(ProviderErrorKind::EmptyResponse)
        } else {
            rewrite(request)
        }
    });
    let model = Arc::new(GatedTransport::held(inner));
    let coordinator = gated_coordinator(model.clone());
    let original = document_with_shots();
    coordinator.load_document(original.clone(), None).await;

    let (report, during) = tokio::join!(coordinator.sync_characters(), async {
        model.wait_for_calls(3).await;
        model.release(2);
        tokio::task::yield_now().await;
        let during = coordinator.document().await;
        model.release(1);
        during
    });

    assert_eq!(during, Some(original.clone()));
    let report = report.unwrap();
    assert_eq!(report.failures(), vec![1]);
    let document = coordinator.document().await.unwrap();
    assert_eq!(document.scenes[1], original.scenes[1]);
    assert!(document.scenes[0].shots[1].visual_prompt.contains("blue coat"));
    assert!(document.scenes[2].shots[0].visual_prompt.contains("blue coat"));
}

#[tokio::test]
async fn test_sync_discards_repair_of_a_scene_whose_shots_changed() {
    let model = Arc::new(GatedTransport::held(MockTransport::new_handler(
        rewrite_responder("red dress", "blue coat"),
    )));
    let coordinator = gated_coordinator(model.clone());
    coordinator.load_document(document_with_shots(), None).await;

    let mut edited = document_with_shots();
    edited.scenes[0]
        .shots
        .push(shot(3, "Wide on woman in a red dress, doors open", None));
    let (report, _) = tokio::join!(coordinator.sync_characters(), async {
        model.wait_for_calls(3).await;
        coordinator.load_document(edited.clone(), None).await;
        model.release(3);
    });

    let report = report.unwrap();
    assert_eq!(report.stale(), vec![0]);
    assert_eq!(report.scenes[0].outcome, SceneSyncOutcome::Stale);
    let document = coordinator.document().await.unwrap();
    assert_eq!(document.scenes[0], edited.scenes[0]);
    assert!(document.scenes[2].shots[0].visual_prompt.contains("blue coat"));
}

#[tokio::test]
async fn test_scene_image_is_stored_on_the_scene() {
    let images = Arc::new(MockImages::new());
    let coordinator = coordinator(Arc::new(MockTransport::new_success("{}")), images.clone());
    let original = document_with_shots();
    coordinator.load_document(original.clone(), None).await;

    let handle = coordinator
        .generate_scene_image(1, ImageStyle::ColorStoryboard)
        .await
        .unwrap();

    let document = coordinator.document().await.unwrap();
    assert_eq!(document.scenes[1].scene_image_url.as_deref(), Some(handle.as_str()));
    assert_eq!(document.scenes[1].shots, original.scenes[1].shots);
    let prompt = &images.prompts()[0];
    assert!(prompt.starts_with(ImageStyle::ColorStoryboard.prefix()));
    assert!(prompt.contains("Wide master shot concept art"));
    assert!(prompt.contains("Location: LOCAL 2"));
    assert!(prompt.contains("Resumo 2"));
}

#[tokio::test]
async fn test_scene_image_needs_a_scene() {
    let images = Arc::new(MockImages::new());
    let coordinator = coordinator(Arc::new(MockTransport::new_success("{}")), images.clone());

    let err = coordinator
        .generate_scene_image(0, ImageStyle::Sketch)
        .await
        .unwrap_err();
    assert_eq!(input_kind(&err), InputErrorKind::NoDocument);

    coordinator.load_document(document_with_shots(), None).await;
    let err = coordinator
        .generate_scene_image(5, ImageStyle::Sketch)
        .await
        .unwrap_err();
    assert_eq!(input_kind(&err), InputErrorKind::SceneOutOfRange { index: 5, len: 3 });
    assert!(images.prompts().is_empty());
}

#[tokio::test]
async fn test_character_portrait_is_stored_on_the_character() {
    let images = Arc::new(MockImages::new());
    let coordinator = coordinator(Arc::new(MockTransport::new_success("{}")), images.clone());
    coordinator.load_document(document_with_shots(), None).await;

    let handle = coordinator
        .generate_character_image("MARIA", ImageStyle::Realistic)
        .await
        .unwrap();

    let document = coordinator.document().await.unwrap();
    let maria = document.character("MARIA").unwrap();
    assert_eq!(maria.portrait_url.as_deref(), Some(handle.as_str()));
    assert_eq!(document.character("JUANA").unwrap().portrait_url, None);
    let prompt = &images.prompts()[0];
    assert!(prompt.starts_with(ImageStyle::Realistic.prefix()));
    assert!(prompt.contains("Cinematic portrait, MARIA, Woman in her 30s, red dress"));

    let err = coordinator
        .generate_character_image("maria", ImageStyle::Realistic)
        .await
        .unwrap_err();
    assert_eq!(input_kind(&err), InputErrorKind::UnknownCharacter("maria".into()));
}

#[tokio::test]
async fn test_costume_change_clears_portrait() {
    let coordinator = coordinator(
        Arc::new(MockTransport::new_success("{}")),
        Arc::new(MockImages::new()),
    );
    coordinator.load_document(document_with_shots(), None).await;
    coordinator
        .generate_character_image("MARIA", ImageStyle::Sketch)
        .await
        .unwrap();

    let notes = CharacterPatch::builder().notes("Canhota").build().unwrap();
    coordinator.update_character("MARIA", &notes).await.unwrap();
    let document = coordinator.document().await.unwrap();
    assert!(document.character("MARIA").unwrap().portrait_url.is_some());

    let costume = CharacterPatch::builder()
        .costume_description("Woman in her 30s, blue coat")
        .build()
        .unwrap();
    coordinator.update_character("MARIA", &costume).await.unwrap();
    let document = coordinator.document().await.unwrap();
    assert_eq!(document.character("MARIA").unwrap().portrait_url, None);
}

#[tokio::test]
async fn test_failed_scene_and_portrait_images_change_nothing() {
    let coordinator = coordinator(
        Arc::new(MockTransport::new_success("{}")),
        Arc::new(MockImages::failing()),
    );
    let original = document_with_shots();
    coordinator.load_document(original.clone(), None).await;

    assert!(coordinator.generate_scene_image(0, ImageStyle::Sketch).await.is_err());
    assert!(coordinator
        .generate_character_image("JOÃO", ImageStyle::Sketch)
        .await
        .is_err());
    assert_eq!(coordinator.document().await, Some(original));
}

#[test]
fn test_patch_applies_to_a_document_by_exact_name() {
    let mut document = document_with_shots();
    let patch = CharacterPatch::builder()
        .costume_description("Girl with yellow raincoat")
        .build()
        .unwrap();

    assert!(patch.apply_to_document(&mut document, "JUANA").unwrap());
    assert!(!patch.apply_to_document(&mut document, "JUANA").unwrap());
    assert_eq!(
        document.character("JUANA").unwrap().costume_description,
        "Girl with yellow raincoat"
    );

    let err = patch.apply_to_document(&mut document, "Juana").unwrap_err();
    assert_eq!(input_kind(&err), InputErrorKind::UnknownCharacter("Juana".into()));
}
