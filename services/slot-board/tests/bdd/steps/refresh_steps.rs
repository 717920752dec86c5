//! BDD step definitions for refresh cool-down feature

use std::time::Duration;

use cucumber::{given, then, when};
use slot_board::refresh::{RefreshController, RefreshDecision};

use crate::world::SlotBoardWorld;

/// Arbitrary anchor so that minute offsets are realistic epoch values
const BASE_MS: u64 = 1_768_600_000_000;

fn minute(m: u64) -> u64 {
    BASE_MS + m * 60_000
}

#[given(expr = "a refresh controller with a {int} minute cool-down")]
fn controller_with_cooldown(world: &mut SlotBoardWorld, minutes: u64) {
    world.controller = Some(RefreshController::new(Duration::from_secs(minutes * 60)));
}

#[given(expr = "a successful fetch at minute {int}")]
fn successful_fetch_at(world: &mut SlotBoardWorld, at: u64) {
    world
        .controller
        .as_mut()
        .expect("controller not set")
        .record_success(minute(at));
}

#[when(expr = "a refresh is requested at minute {int}")]
fn refresh_requested_at(world: &mut SlotBoardWorld, at: u64) {
    let controller = world.controller.as_ref().expect("controller not set");
    world.decision = Some(controller.request(minute(at)));
}

#[then("the request is accepted")]
fn request_accepted(world: &mut SlotBoardWorld) {
    assert_eq!(world.decision, Some(RefreshDecision::Allowed));
}

#[then(expr = "the request is rejected with {int} minutes remaining")]
fn request_rejected(world: &mut SlotBoardWorld, remaining: u64) {
    assert_eq!(
        world.decision,
        Some(RefreshDecision::CoolingDown {
            remaining_minutes: remaining
        })
    );
}
