//! Behavior engine for 2D side-scrolling actors.
//!
//! Each actor runs one [`fsm::StateMachine`] over a closed family of states:
//! the player family (grounded, airborne, wall, ledge, abilities) in
//! [`states::player`] and the AI family (patrol, alert, chase, search,
//! attack) in [`states::enemy`]. [`app::GameApp`] is a headless host that
//! wires them to a hecs world, fixed-step physics, and scripted input.

pub mod app;
pub mod components;
pub mod config;
pub mod engine;
pub mod fsm;
pub mod scene;
pub mod states;
pub mod systems;
