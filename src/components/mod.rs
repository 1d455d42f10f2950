mod character;
mod physics;

pub use character::{
    Actor, Animator, ClipPlayer, Enemy, EnemyFsm, EnemyHandoff, EnemyMemory, Moveset, Player,
    PlayerFsm, PlayerHandoff,
};
pub use physics::{Body, Collider, Contacts, Facing, Sensors};
