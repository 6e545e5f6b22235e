//! Depth Raider - a dual-layer arcade space shooter
//!
//! Core modules:
//! - `sim`: Simulation (actors, pools, collisions, animations, per-tick update)
//! - `action`: Scripted spawn playlist driving difficulty
//! - `session`: Frame driver tying the simulation, playlist and scoring together
//! - `highscores` / `settings` / `persistence`: JSON blobs in key-value storage
//! - `audio`: Sound cue mapping and Web Audio playback

pub mod action;
pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod random;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use highscores::HighScores;
pub use session::{Session, SessionPhase};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per displayed frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frame deltas above this are clamped (tab switches, breakpoints)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default world size; the shell overwrites it on resize
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Far layer renders at half scale and moves at 75% speed
    pub const FAR_LAYER_SCALE: f32 = 0.5;
    pub const FAR_LAYER_SPEED: f32 = 0.75;
    /// Hit-box inset per side, as a fraction of width/height
    pub const HIT_MARGIN: f32 = 0.25;

    /// Pool capacities
    pub const BULLET_POOL: usize = 160;
    pub const ENEMY_POOL: usize = 40;
    pub const BOSS_POOL: usize = 2;
    pub const POWERUP_POOL: usize = 8;

    /// Player
    pub const PLAYER_WIDTH: f32 = 64.0;
    pub const PLAYER_HEIGHT: f32 = 64.0;
    pub const PLAYER_SPEED: f32 = 360.0;
    pub const PLAYER_ENERGY: i32 = 20;
    pub const PLAYER_LAYER_SWITCH_SECS: f32 = 0.4;
    /// Weapon powerups revert to the laser after this long
    pub const WEAPON_UPGRADE_SECS: f32 = 10.0;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 48.0;
    pub const ENEMY_HEIGHT: f32 = 48.0;
    pub const MINE_SIZE: f32 = 40.0;
    pub const ENEMY_FIRE_INTERVAL: f32 = 1.8;
    pub const ENEMY_LAYER_SWITCH_SECS: f32 = 0.8;
    /// One leg of a yoyo movement pattern
    pub const PATTERN_SECS: f32 = 1.6;

    /// Bosses
    pub const BOSS_DESCENT_SPEED: f32 = 60.0;
    pub const BOSS_DRIFT_SPEED: f32 = 90.0;
    pub const BOSS_PHASE_SECS: f32 = 3.0;
    pub const BOSS_LAYER_SWITCH_SECS: f32 = 1.0;
    pub const BOSS_SPRAY_INTERVAL: f32 = 0.9;
    pub const BOSS_BREATHER_INTERVAL: f32 = 1.6;
    pub const BOSS_RAPID_INTERVAL: f32 = 0.15;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 6.0;
    pub const BULLET_HEIGHT: f32 = 16.0;
    pub const SPRAY_BULLET_SIZE: f32 = 10.0;
    pub const SPRAY_BULLETS: usize = 16;
    pub const SPRAY_SECS: f32 = 3.0;
    pub const ENEMY_BULLET_SPEED: f32 = 300.0;

    /// Powerups
    pub const POWERUP_SIZE: f32 = 32.0;
    pub const POWERUP_SPEED: f32 = 80.0;

    /// Scoring
    pub const BOSS_BONUS: u64 = 5000;
}
