//! Intents forwarded by the presentation layer

use std::sync::Arc;

use walkthrough::prelude::*;
use walkthrough::testing::{FakeDom, ImmediateFrame};

fn step(id: &str) -> TutorialStep {
    TutorialStep::new(id, id.to_uppercase(), "d")
}

fn engine() -> Engine {
    Engine::builder().pacer(Arc::new(ImmediateFrame)).build()
}

fn tour() -> TutorialConfig {
    TutorialConfig::new(
        "intents",
        vec![
            step("a").allow_skip_to(["c"]),
            step("b").block_interactions(true),
            step("c"),
        ],
    )
}

#[tokio::test]
async fn test_next_and_previous_intents() {
    let engine = engine();
    engine.start(tour()).await.unwrap();

    engine.dispatch(Intent::Next).await.unwrap();
    assert_eq!(engine.state().current_step_index, Some(1));

    engine.dispatch(Intent::Previous).await.unwrap();
    assert_eq!(engine.state().current_step_index, Some(0));
}

#[tokio::test]
async fn test_skip_intent_requires_offered_target() {
    let engine = engine();
    engine.start(tour()).await.unwrap();

    engine.dispatch(Intent::SkipTo("b".into())).await.unwrap();
    assert_eq!(engine.state().current_step_index, Some(0));

    engine.dispatch(Intent::SkipTo("c".into())).await.unwrap();
    assert_eq!(engine.state().current_step_index, Some(2));

    // Step c offers no jumps, but the engine API itself stays permissive
    engine.dispatch(Intent::SkipTo("a".into())).await.unwrap();
    assert_eq!(engine.state().current_step_index, Some(2));
    engine.skip_to("a").await.unwrap();
    assert_eq!(engine.state().current_step_index, Some(0));
}

#[tokio::test]
async fn test_close_intent_respects_allow_close() {
    let engine = engine();
    engine.start(tour().allow_close(false)).await.unwrap();

    engine.dispatch(Intent::Close).await.unwrap();
    engine.dispatch(Intent::BackgroundClicked).await.unwrap();
    assert!(engine.is_active());

    // Programmatic close is always honored
    engine.close();
    assert!(!engine.is_active());
}

#[tokio::test]
async fn test_background_click() {
    let engine = engine();
    engine.start(tour()).await.unwrap();

    engine.go_to_step(1).await.unwrap();
    engine.dispatch(Intent::BackgroundClicked).await.unwrap();
    assert!(engine.is_active());

    engine.go_to_step(0).await.unwrap();
    engine.dispatch(Intent::BackgroundClicked).await.unwrap();
    assert!(!engine.is_active());
}

#[tokio::test]
async fn test_complete_intent() {
    let engine = engine();
    engine.start(tour()).await.unwrap();

    engine.dispatch(Intent::Complete).await.unwrap();
    assert!(!engine.is_active());
    assert!(engine.is_completed("intents"));
}

#[tokio::test]
async fn test_intents_while_inactive_are_ignored() {
    let engine = engine();
    for intent in [
        Intent::Next,
        Intent::Previous,
        Intent::SkipTo("a".into()),
        Intent::Close,
        Intent::Complete,
        Intent::BackgroundClicked,
    ] {
        engine.dispatch(intent).await.unwrap();
    }
    assert!(!engine.is_active());
    assert!(!engine.is_completed("intents"));
}

#[tokio::test]
async fn test_popover_props_follow_navigation() {
    let dom = Arc::new(FakeDom::new());
    dom.insert("#save", Rect::new(40.0, 40.0, 80.0, 20.0));
    let engine = Engine::builder()
        .resolver(dom)
        .pacer(Arc::new(ImmediateFrame))
        .build();

    engine
        .start(TutorialConfig::new(
            "props",
            vec![
                step("intro"),
                step("save")
                    .target("#save")
                    .placement(Placement::Top)
                    .block_interactions(true)
                    .wait_for(WaitForAction::new("saved")),
            ],
        ))
        .await
        .unwrap();

    let props = engine.popover_props().unwrap();
    assert_eq!(props.placement, Placement::Center);
    assert!(props.flags.contains(NavFlags::NEXT | NavFlags::CLOSE));
    assert!(!engine.overlay_props().blocking);

    engine.dispatch(Intent::Next).await.unwrap();
    let props = engine.popover_props().unwrap();
    assert_eq!(props.step_id, "save");
    assert_eq!(props.placement, Placement::Top);
    assert_eq!(props.position_label, "2 / 2");
    assert!(!props.flags.contains(NavFlags::COMPLETE));

    let overlay = engine.overlay_props();
    assert!(overlay.blocking);
    assert_eq!(overlay.spotlight, Some(Rect::new(32.0, 32.0, 96.0, 36.0)));

    engine.trigger_action("saved", None);
    let props = engine.popover_props().unwrap();
    assert!(props.flags.contains(NavFlags::COMPLETE));

    engine.dispatch(Intent::Complete).await.unwrap();
    assert!(engine.popover_props().is_none());
    assert!(!engine.overlay_props().active);
}
