//! Scripted spawn playlist
//!
//! A fixed sequence of (act, delay) entries walked by [`Action::execute`].
//! The playlist holds no timers: the caller waits the returned delay before
//! executing again. Spawn counts and enemy energy grow with the game level,
//! so each loop through the playlist is harder than the last.

use glam::Vec2;

use crate::consts::*;
use crate::random::{coin, level_range, range};
use crate::sim::{
    BossType, EnemySpawn, EnemyType, Game, Layer, Pattern, PowerupKind, Victim, WeaponClass,
};

/// One spawn step of the playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Act {
    /// A row of fighters across the field
    HorizontalWave,
    /// A column of swaying interceptors
    SineSquadron,
    /// Interceptors sweeping in diagonally from one side
    SidewaysSquadron,
    /// One tough bomber
    SingleEnemy,
    Mines,
    PowerupDrop,
    WeaponDrop,
    EnergyDrop,
    BossFight,
    /// End-of-playlist sentinel
    Nop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub act: Act,
    /// Seconds to wait before this entry runs
    pub delay: f32,
}

const fn entry(act: Act, delay: f32) -> Entry {
    Entry { act, delay }
}

pub const PLAYLIST: &[Entry] = &[
    entry(Act::HorizontalWave, 2.0),
    entry(Act::SineSquadron, 4.0),
    entry(Act::SingleEnemy, 3.0),
    entry(Act::SidewaysSquadron, 4.0),
    entry(Act::Mines, 3.0),
    entry(Act::PowerupDrop, 2.0),
    entry(Act::HorizontalWave, 4.0),
    entry(Act::SineSquadron, 3.0),
    entry(Act::WeaponDrop, 2.0),
    entry(Act::SidewaysSquadron, 3.0),
    entry(Act::SingleEnemy, 2.0),
    entry(Act::EnergyDrop, 3.0),
    entry(Act::Mines, 2.0),
    // Boss segment
    entry(Act::BossFight, 5.0),
    entry(Act::WeaponDrop, 8.0),
    entry(Act::Mines, 6.0),
    entry(Act::EnergyDrop, 8.0),
    entry(Act::Mines, 6.0),
    entry(Act::PowerupDrop, 8.0),
    entry(Act::Nop, 10.0),
];

/// Cursor into [`PLAYLIST`]
#[derive(Debug, Clone, Default)]
pub struct Action {
    index: usize,
}

impl Action {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the current entry, advance (wrapping after the sentinel) and
    /// return the delay before the next entry
    pub fn execute(&mut self, game: &mut Game) -> f32 {
        let act = PLAYLIST[self.index].act;
        log::debug!("Act {}: {act:?} at level {}", self.index, game.level);
        run(act, game);
        self.index = (self.index + 1) % PLAYLIST.len();
        PLAYLIST[self.index].delay
    }

    /// Rewind to the first entry and return its delay
    pub fn reset(&mut self) -> f32 {
        self.index = 0;
        PLAYLIST[0].delay
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Act {
        PLAYLIST[self.index].act
    }

    pub fn len(&self) -> usize {
        PLAYLIST.len()
    }

    pub fn is_empty(&self) -> bool {
        PLAYLIST.is_empty()
    }
}

/// Points awarded to the player for a kill
pub fn points_for_kill(victim: Victim, level: u32) -> u64 {
    match victim {
        Victim::Boss { .. } => BOSS_BONUS * level.max(1) as u64,
        Victim::Enemy {
            kind,
            weapon,
            pattern,
        } => 100 * (kind.index() as u64 + 1) + 50 * weapon.index() as u64 + 25 * pattern.index() as u64,
        Victim::Player => 0,
    }
}

fn run(act: Act, game: &mut Game) {
    match act {
        Act::HorizontalWave => horizontal_wave(game),
        Act::SineSquadron => sine_squadron(game),
        Act::SidewaysSquadron => sideways_squadron(game),
        Act::SingleEnemy => single_enemy(game),
        Act::Mines => mines(game),
        Act::PowerupDrop => drop_powerup(game, PowerupKind::Score),
        Act::WeaponDrop => drop_powerup(game, PowerupKind::Weapon),
        Act::EnergyDrop => drop_powerup(game, PowerupKind::Energy),
        Act::BossFight => {
            let energy = level_range(&mut game.rng, 40, 60, game.level, 20);
            game.create_boss(BossType::for_level(game.level), energy);
        }
        Act::Nop => {}
    }
}

fn random_layer(game: &mut Game) -> Layer {
    if coin(&mut game.rng) { Layer::Near } else { Layer::Far }
}

/// Random x for an actor of the given width, kept inside the field
fn random_x(game: &mut Game, width: f32) -> f32 {
    let max = (game.world.width - width).max(0.0) as i32;
    range(&mut game.rng, 0, max) as f32
}

fn horizontal_wave(game: &mut Game) {
    let level = game.level;
    let count = level_range(&mut game.rng, 3, 5, level, 1).clamp(1, 12);
    let layer = random_layer(game);
    let spacing = game.world.width / (count + 1) as f32;
    for i in 1..=count {
        let energy = level_range(&mut game.rng, 1, 2, level, 1);
        let x = spacing * i as f32 - ENEMY_WIDTH * 0.5;
        game.create_enemy(EnemySpawn {
            vel: Vec2::new(0.0, 90.0),
            layer,
            energy,
            ..EnemySpawn::new(EnemyType::Fighter, Vec2::new(x, -ENEMY_HEIGHT))
        });
    }
}

fn sine_squadron(game: &mut Game) {
    let level = game.level;
    let count = level_range(&mut game.rng, 3, 4, level, 1).clamp(1, 10);
    let layer = random_layer(game);
    let x = random_x(game, ENEMY_WIDTH);
    for i in 0..count {
        let energy = level_range(&mut game.rng, 1, 2, level, 1);
        let y = -ENEMY_HEIGHT * (1.0 + 1.5 * i as f32);
        game.create_enemy(EnemySpawn {
            pattern: Pattern::Sine,
            vel: Vec2::new(0.0, 100.0),
            layer,
            energy,
            ..EnemySpawn::new(EnemyType::Interceptor, Vec2::new(x, y))
        });
    }
}

fn sideways_squadron(game: &mut Game) {
    let level = game.level;
    let count = level_range(&mut game.rng, 3, 4, level, 1).clamp(1, 10);
    let layer = random_layer(game);
    let from_left = coin(&mut game.rng);
    let (start_x, dir) = if from_left {
        (0.0, 1.0)
    } else {
        (game.world.width - ENEMY_WIDTH, -1.0)
    };
    for i in 0..count {
        let energy = level_range(&mut game.rng, 1, 2, level, 1);
        let offset = ENEMY_WIDTH * 1.5 * i as f32;
        game.create_enemy(EnemySpawn {
            vel: Vec2::new(dir * 120.0, 70.0),
            layer,
            energy,
            ..EnemySpawn::new(
                EnemyType::Interceptor,
                Vec2::new(start_x - dir * offset, -ENEMY_HEIGHT - offset),
            )
        });
    }
}

fn single_enemy(game: &mut Game) {
    let level = game.level;
    let energy = level_range(&mut game.rng, 3, 5, level, 2);
    let weapon = if coin(&mut game.rng) {
        WeaponClass::Blaster
    } else {
        WeaponClass::Laser
    };
    let layer = random_layer(game);
    let x = random_x(game, ENEMY_WIDTH);
    game.create_enemy(EnemySpawn {
        pattern: Pattern::Cube,
        vel: Vec2::new(0.0, 70.0),
        layer,
        energy,
        weapon,
        ..EnemySpawn::new(EnemyType::Bomber, Vec2::new(x, -ENEMY_HEIGHT))
    });
}

fn mines(game: &mut Game) {
    let level = game.level;
    let count = level_range(&mut game.rng, 2, 4, level, 1).clamp(1, 10);
    for _ in 0..count {
        let layer = random_layer(game);
        let x = random_x(game, MINE_SIZE);
        let speed = range(&mut game.rng, 60, 90) as f32;
        // Stagger so they don't spawn stacked
        let y = -MINE_SIZE * range(&mut game.rng, 1, 6) as f32;
        let energy = level_range(&mut game.rng, 1, 1, level, 1);
        game.create_enemy(EnemySpawn {
            vel: Vec2::new(0.0, speed),
            layer,
            energy,
            ..EnemySpawn::new(EnemyType::Mine, Vec2::new(x, y))
        });
    }
}

fn drop_powerup(game: &mut Game, kind: PowerupKind) {
    let level = game.level;
    let value = match kind {
        PowerupKind::Score => 500 * level,
        PowerupKind::Energy => level_range(&mut game.rng, 3, 5, level, 1) as u32,
        PowerupKind::Weapon => {
            let class = if coin(&mut game.rng) {
                WeaponClass::Spray
            } else {
                WeaponClass::Blaster
            };
            class.index() as u32
        }
    };
    // Drops arrive on the player's layer
    let layer = game.player_layer();
    let x = random_x(game, POWERUP_SIZE) + POWERUP_SIZE * 0.5;
    game.create_powerup(kind, value, Vec2::new(x, -POWERUP_SIZE), layer);
}
