//! BDD test entry point for slot board service

#[path = "bdd/world.rs"]
mod world;

#[path = "bdd/steps/mod.rs"]
mod steps;

use cucumber::World as _;
use world::SlotBoardWorld;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    SlotBoardWorld::run("tests/features").await;
}
