//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (active list, newest first)
//! - No rendering or platform dependencies

pub mod actor;
mod behavior;
pub mod collision;
pub mod game;
pub mod pool;
pub mod ship;
pub mod tick;
pub mod tween;
pub mod weapon;

pub use actor::{Actor, ActorId, ActorRef, Body, Layer};
pub use collision::Rect;
pub use game::{ActorView, BulletSpawn, EnemySpawn, Game, GameEvent, SoundCue, Victim, World};
pub use ship::{
    ActorKind, ActorTag, AttackPhase, BossType, EnemyType, Pattern, PowerupKind,
};
pub use tick::{TickInput, tick};
pub use weapon::{Weapon, WeaponClass};
