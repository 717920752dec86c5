//! BDD step definitions for slot board service

pub mod cycle_steps;
pub mod refresh_steps;
