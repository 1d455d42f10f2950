pub mod animation;
pub mod collision;
mod enemy;
mod physics;
mod player;
pub mod raycast;

pub use collision::contact_system;
pub use enemy::{enemy_animation_system, enemy_logic_system, enemy_physics_system};
pub use physics::{integrate, physics_step, GRAVITY, PHYSICS_DT};
pub use player::{player_animation_system, player_bounds, player_logic_system, player_physics_system};
pub use raycast::{Level, SceneGeometry};
