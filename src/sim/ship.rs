//! Entity variants layered on the shared body
//!
//! Ships (player, enemies, bosses) carry a [`Ship`] capability with energy
//! and weapon. Bullets and powerups are plain data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::ActorRef;
use super::tween::TweenHandle;
use super::weapon::{Weapon, WeaponClass};
use crate::consts::*;
use crate::error::GameError;

/// Energy, weapon and firing cadence
#[derive(Debug, Clone)]
pub struct Ship {
    pub energy: i32,
    pub max_energy: i32,
    pub weapon: WeaponClass,
    /// Seconds between shots (usually the weapon's, bosses override it)
    pub fire_interval: f32,
    /// Simulation time of the next allowed shot
    pub next_fire_at: f64,
    /// Dies on contact with other actors, not only from bullets
    pub crashable: bool,
}

impl Ship {
    pub fn new(max_energy: i32, weapon: WeaponClass, crashable: bool) -> Self {
        Self {
            energy: max_energy,
            max_energy,
            weapon,
            fire_interval: Weapon::for_class(weapon).fire_interval,
            next_fire_at: 0.0,
            crashable,
        }
    }

    /// Switch weapon and adopt its cadence
    pub fn equip(&mut self, weapon: WeaponClass) {
        self.weapon = weapon;
        self.fire_interval = Weapon::for_class(weapon).fire_interval;
    }

    /// Subtract damage, flooring at zero
    pub fn take_damage(&mut self, damage: i32) {
        self.energy = (self.energy - damage).max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.energy = (self.energy + amount).min(self.max_energy);
    }

    pub fn is_dead(&self) -> bool {
        self.energy <= 0
    }

    #[inline]
    pub fn ready_to_fire(&self, now: f64) -> bool {
        now >= self.next_fire_at
    }

    pub fn mark_fired(&mut self, now: f64) {
        self.next_fire_at = now + self.fire_interval as f64;
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub ship: Ship,
    pub name: String,
    pub score: u64,
    /// Trigger held
    pub firing: bool,
    /// Pending revert of a timed weapon upgrade
    pub weapon_timer: Option<TweenHandle>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            ship: Ship::new(PLAYER_ENERGY, WeaponClass::Laser, true),
            name: name.into(),
            score: 0,
            firing: false,
            weapon_timer: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyType {
    #[default]
    Fighter,
    Bomber,
    Interceptor,
    /// Drifts and never fires
    Mine,
}

impl EnemyType {
    pub fn index(self) -> u8 {
        match self {
            EnemyType::Fighter => 0,
            EnemyType::Bomber => 1,
            EnemyType::Interceptor => 2,
            EnemyType::Mine => 3,
        }
    }

    pub fn size(self) -> Vec2 {
        match self {
            EnemyType::Mine => Vec2::splat(MINE_SIZE),
            _ => Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
        }
    }

    pub fn fires(self) -> bool {
        self != EnemyType::Mine
    }
}

impl TryFrom<u8> for EnemyType {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(EnemyType::Fighter),
            1 => Ok(EnemyType::Bomber),
            2 => Ok(EnemyType::Interceptor),
            3 => Ok(EnemyType::Mine),
            other => Err(GameError::UnknownEnemyType(other)),
        }
    }
}

/// Movement trajectory layered over the enemy's velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pattern {
    #[default]
    Straight,
    /// Sideways sine sway
    Sine,
    /// Wider sway with a cubic ease
    Cube,
}

impl Pattern {
    pub fn index(self) -> u8 {
        match self {
            Pattern::Straight => 0,
            Pattern::Sine => 1,
            Pattern::Cube => 2,
        }
    }
}

impl TryFrom<u8> for Pattern {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Pattern::Straight),
            1 => Ok(Pattern::Sine),
            2 => Ok(Pattern::Cube),
            other => Err(GameError::UnknownPattern(other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub ship: Ship,
    pub kind: EnemyType,
    pub pattern: Pattern,
    /// Trajectory tween, created on the first in-view tick
    pub pattern_tween: Option<TweenHandle>,
    pub activated: bool,
}

impl Enemy {
    pub fn new(kind: EnemyType, pattern: Pattern, energy: i32, weapon: WeaponClass) -> Self {
        let mut ship = Ship::new(energy, weapon, true);
        // Enemies never fire faster than the shared enemy cadence
        ship.fire_interval = ship.fire_interval.max(ENEMY_FIRE_INTERVAL);
        Self {
            ship,
            kind,
            pattern,
            pattern_tween: None,
            activated: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BossType {
    #[default]
    Dreadnought,
    Carrier,
    Hive,
}

impl BossType {
    pub fn index(self) -> u8 {
        match self {
            BossType::Dreadnought => 0,
            BossType::Carrier => 1,
            BossType::Hive => 2,
        }
    }

    /// Boss for a given level, cycling through the roster
    pub fn for_level(level: u32) -> Self {
        match level.saturating_sub(1) % 3 {
            0 => BossType::Dreadnought,
            1 => BossType::Carrier,
            _ => BossType::Hive,
        }
    }

    pub fn size(self) -> Vec2 {
        match self {
            BossType::Dreadnought => Vec2::new(160.0, 120.0),
            BossType::Carrier => Vec2::new(200.0, 110.0),
            BossType::Hive => Vec2::new(150.0, 150.0),
        }
    }

    /// Bosses get a larger hit-box than the default 25% inset
    pub fn hit_margin(self) -> f32 {
        match self {
            BossType::Dreadnought => 0.15,
            BossType::Carrier => 0.1,
            BossType::Hive => 0.2,
        }
    }
}

impl TryFrom<u8> for BossType {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(BossType::Dreadnought),
            1 => Ok(BossType::Carrier),
            2 => Ok(BossType::Hive),
            other => Err(GameError::UnknownBossType(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossStage {
    /// Descending to its station
    Entering,
    /// Cycling attack phases
    Attacking,
}

/// Attack phases, advanced every `BOSS_PHASE_SECS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPhase {
    Spray,
    Breather,
    Rapid,
}

impl AttackPhase {
    pub fn index(self) -> u8 {
        match self {
            AttackPhase::Spray => 0,
            AttackPhase::Breather => 1,
            AttackPhase::Rapid => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            AttackPhase::Spray => AttackPhase::Breather,
            AttackPhase::Breather => AttackPhase::Rapid,
            AttackPhase::Rapid => AttackPhase::Spray,
        }
    }

    pub fn weapon(self) -> WeaponClass {
        match self {
            AttackPhase::Spray => WeaponClass::Spray,
            AttackPhase::Breather | AttackPhase::Rapid => WeaponClass::Laser,
        }
    }

    pub fn fire_interval(self) -> f32 {
        match self {
            AttackPhase::Spray => BOSS_SPRAY_INTERVAL,
            AttackPhase::Breather => BOSS_BREATHER_INTERVAL,
            AttackPhase::Rapid => BOSS_RAPID_INTERVAL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub ship: Ship,
    pub kind: BossType,
    pub stage: BossStage,
    pub phase: AttackPhase,
    pub phase_timer: Option<TweenHandle>,
}

impl Boss {
    pub fn new(kind: BossType, energy: i32) -> Self {
        Self {
            // Ramming a boss kills the rammer, never the boss
            ship: Ship::new(energy, WeaponClass::Spray, false),
            kind,
            stage: BossStage::Entering,
            phase: AttackPhase::Spray,
            phase_timer: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub damage: i32,
    /// Firer, pinned to the acquisition that fired
    pub owner: Option<ActorRef>,
    pub from_player: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Restores `value` energy
    Energy,
    /// Timed upgrade to weapon class `value`
    Weapon,
    /// Adds `value` points
    Score,
}

#[derive(Debug, Clone)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub value: u32,
}

/// Pool key and render tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorTag {
    Player,
    Enemy,
    Boss,
    Bullet,
    Powerup,
}

#[derive(Debug, Clone)]
pub enum ActorKind {
    Player(Player),
    Enemy(Enemy),
    Boss(Boss),
    Bullet(Bullet),
    Powerup(Powerup),
}

impl ActorKind {
    pub fn tag(&self) -> ActorTag {
        match self {
            ActorKind::Player(_) => ActorTag::Player,
            ActorKind::Enemy(_) => ActorTag::Enemy,
            ActorKind::Boss(_) => ActorTag::Boss,
            ActorKind::Bullet(_) => ActorTag::Bullet,
            ActorKind::Powerup(_) => ActorTag::Powerup,
        }
    }

    pub fn ship(&self) -> Option<&Ship> {
        match self {
            ActorKind::Player(p) => Some(&p.ship),
            ActorKind::Enemy(e) => Some(&e.ship),
            ActorKind::Boss(b) => Some(&b.ship),
            ActorKind::Bullet(_) | ActorKind::Powerup(_) => None,
        }
    }

    pub fn ship_mut(&mut self) -> Option<&mut Ship> {
        match self {
            ActorKind::Player(p) => Some(&mut p.ship),
            ActorKind::Enemy(e) => Some(&mut e.ship),
            ActorKind::Boss(b) => Some(&mut b.ship),
            ActorKind::Bullet(_) | ActorKind::Powerup(_) => None,
        }
    }

    pub fn bullet(&self) -> Option<&Bullet> {
        match self {
            ActorKind::Bullet(b) => Some(b),
            _ => None,
        }
    }

    /// Sprite variant for the presentation layer
    pub fn variant(&self) -> u8 {
        match self {
            ActorKind::Player(p) => p.ship.weapon.index(),
            ActorKind::Enemy(e) => e.kind.index(),
            ActorKind::Boss(b) => b.kind.index(),
            ActorKind::Bullet(b) => b.from_player as u8,
            ActorKind::Powerup(p) => p.kind as u8,
        }
    }
}
