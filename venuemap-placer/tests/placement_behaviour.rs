#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for non-overlap selection and viewport sampling.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use venuemap_core::{Viewport, test_support::pixel_grid};
use venuemap_placer::{
    PlacementOptions, SampleOptions, pick_non_overlapping_indices, stable_viewport_sample,
};

/// Aggregate fixtures shared across the placement scenarios.
#[derive(Default)]
pub struct TestContext {
    xy: RefCell<Vec<f64>>,
    priorities: RefCell<Vec<f64>>,
    picked: RefCell<Vec<usize>>,
    samples: RefCell<Option<(Vec<usize>, Vec<usize>)>>,
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    TestContext::default()
}

#[given("three markers within a few pixels of each other")]
fn clustered_markers(context: &TestContext) {
    *context.xy.borrow_mut() = vec![100.0, 100.0, 102.0, 101.0, 99.0, 104.0];
    *context.priorities.borrow_mut() = vec![0.4, 0.9, 0.6];
}

#[when("I place markers with a ten pixel threshold")]
fn place_markers(context: &TestContext) {
    let picked = pick_non_overlapping_indices(
        &context.xy.borrow(),
        &context.priorities.borrow(),
        10.0,
        &PlacementOptions::default(),
    )
    .expect("valid markers");
    *context.picked.borrow_mut() = picked;
}

#[then("only the highest priority marker is kept")]
fn strongest_kept(context: &TestContext) {
    assert_eq!(*context.picked.borrow(), vec![1]);
}

#[given("a marker already on screen and a stronger marker next to it")]
fn locked_marker(context: &TestContext) {
    *context.xy.borrow_mut() = vec![50.0, 50.0, 53.0, 50.0];
    *context.priorities.borrow_mut() = vec![0.1, 0.95];
}

#[when("I place markers keeping the on-screen marker locked")]
fn place_locked(context: &TestContext) {
    let options = PlacementOptions {
        locked: vec![0],
        ..PlacementOptions::default()
    };
    let picked = pick_non_overlapping_indices(
        &context.xy.borrow(),
        &context.priorities.borrow(),
        10.0,
        &options,
    )
    .expect("valid markers");
    *context.picked.borrow_mut() = picked;
}

#[then("the on-screen marker is kept and the newcomer is dropped")]
fn locked_kept(context: &TestContext) {
    assert_eq!(*context.picked.borrow(), vec![0]);
}

#[given("a grid of scored markers")]
fn scored_grid(context: &TestContext) {
    let xy = pixel_grid(12, 9.0);
    let priorities = (0..144_u32).map(|i| f64::from((i * 37) & 63)).collect();
    *context.xy.borrow_mut() = xy;
    *context.priorities.borrow_mut() = priorities;
}

#[when("I sample the viewport before and after a small pan")]
fn sample_twice(context: &TestContext) {
    let xy = context.xy.borrow();
    let scores = context.priorities.borrow();
    let sample = |viewport: Viewport| {
        stable_viewport_sample(&xy, &scores, &viewport, 512.0, 20, &SampleOptions::default())
            .expect("valid sample")
    };
    // Both viewports touch the same 32 px cells.
    let before = sample(Viewport::new(2.0, 2.0, 70.0, 70.0));
    let after = sample(Viewport::new(6.0, 1.0, 74.0, 66.0));
    *context.samples.borrow_mut() = Some((before, after));
}

#[then("both samples are identical")]
fn samples_match(context: &TestContext) {
    let samples = context.samples.borrow();
    let (before, after) = samples.as_ref().expect("samples taken");
    assert!(!before.is_empty());
    assert_eq!(before, after);
}

#[scenario(path = "tests/features/placement.feature", index = 0)]
fn clustered_markers_collapse(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/placement.feature", index = 1)]
fn locked_markers_survive(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/placement.feature", index = 2)]
fn panning_keeps_sample(context: TestContext) {
    let _ = context;
}
