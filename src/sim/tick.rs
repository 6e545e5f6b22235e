//! Fixed timestep simulation tick
//!
//! Order within a tick: clock, input, animations, then every active actor
//! in reverse insertion order gets update, cull and collision checks.

use glam::Vec2;

use super::actor::ActorId;
use super::game::{Game, GameEvent};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering direction, each axis in -1..=1
    pub axis: Vec2,
    /// Trigger held
    pub fire: bool,
    /// Switch the player to the other layer (edge-triggered)
    pub switch_layer: bool,
}

/// Advance the game by one fixed timestep
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) {
    game.time += dt as f64;
    game.player_hits.clear();

    let player = game.player_id();
    if game.is_active(player) {
        game.steer_player(input.axis, input.fire);
        if input.switch_layer {
            game.switch_layer(player, PLAYER_LAYER_SWITCH_SECS);
        }
    }

    game.run_animations(dt);

    // Snapshot: spawns during this tick wait for the next one
    let order = game.active.clone();
    for &id in order.iter().rev() {
        if !game.is_active(id) {
            continue;
        }
        game.update_actor(id, dt);
        if !game.is_active(id) || cull(game, id) || !game.running {
            continue;
        }

        for other in game.broad_phase(id) {
            if !game.is_active(id) {
                break;
            }
            if !game.is_active(other) || !game.collides(id, other) {
                continue;
            }
            game.hit(id, other);
            if id == player {
                report_player_hit(game, other);
            } else if other == player {
                report_player_hit(game, id);
            }
        }
    }
}

/// Dispose an actor that has left the field. Returns true if culled.
fn cull(game: &mut Game, id: ActorId) -> bool {
    if id == game.player_id() {
        return false;
    }
    let world = game.world;
    let Some(actor) = game.actor(id) else {
        return false;
    };
    let body = &actor.body;
    let gone = if body.pos.y > world.height {
        true
    } else if let Some(bullet) = actor.kind.bullet() {
        body.pos.x + body.size.x < 0.0
            || body.pos.x > world.width
            || (bullet.from_player && body.pos.y + body.size.y < 0.0)
    } else {
        false
    };
    if gone {
        game.dispose(id);
    }
    gone
}

/// At most one report per impacting actor per tick
fn report_player_hit(game: &mut Game, by: ActorId) {
    if game.player_hits.contains(&by) {
        return;
    }
    game.player_hits.push(by);
    game.emit(GameEvent::PlayerHit { by });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::Layer;
    use crate::sim::game::{BulletSpawn, EnemySpawn, Victim};
    use crate::sim::ship::{ActorKind, ActorTag, EnemyType, PowerupKind};
    use crate::sim::weapon::WeaponClass;

    fn run(game: &mut Game, steps: usize) {
        for _ in 0..steps {
            tick(game, &TickInput::default(), SIM_DT);
        }
    }

    fn started() -> Game {
        let mut game = Game::new(42);
        game.start("ACE");
        game.drain_events();
        game
    }

    fn player_center(game: &Game) -> Vec2 {
        game.actor(game.player_id()).unwrap().body.center()
    }

    fn energy(game: &Game, id: ActorId) -> i32 {
        game.actor(id).unwrap().kind.ship().unwrap().energy
    }

    #[test]
    fn test_player_bullet_kills_enemy() {
        let mut game = started();
        let mut spawn = EnemySpawn::new(EnemyType::Fighter, Vec2::new(300.0, 200.0));
        spawn.energy = 5;
        let enemy = game.create_enemy(spawn).unwrap();
        let center = game.actor(enemy).unwrap().body.center();
        let player = game.player_id();
        let player = game.actor_ref(player);
        game.create_bullet(BulletSpawn {
            owner: Some(player),
            from_player: true,
            center,
            vel: Vec2::ZERO,
            layer: Layer::Near,
            damage: 5,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
        })
        .unwrap();
        game.drain_events();

        run(&mut game, 1);
        let events = game.drain_events();
        assert!(!game.is_active(enemy));
        assert!(events.contains(&GameEvent::ShipDestroyed {
            id: enemy,
            victim: Victim::Enemy {
                kind: EnemyType::Fighter,
                weapon: WeaponClass::Laser,
                pattern: Default::default(),
            },
            by_player: true,
        }));
        let exploded = events
            .iter()
            .position(|e| matches!(e, GameEvent::ActorExploded { id, .. } if *id == enemy));
        let removed = events
            .iter()
            .position(|e| *e == GameEvent::ActorRemoved(enemy));
        assert!(exploded.unwrap() < removed.unwrap());
    }

    #[test]
    fn test_off_screen_cull_is_quiet() {
        let mut game = started();
        let height = game.world.height;
        let enemy = game
            .create_enemy(EnemySpawn::new(EnemyType::Mine, Vec2::new(100.0, height + 1.0)))
            .unwrap();
        game.drain_events();

        run(&mut game, 1);
        let events = game.drain_events();
        assert!(!game.is_active(enemy));
        assert!(events.contains(&GameEvent::ActorRemoved(enemy)));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ActorExploded { .. })));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ShipDestroyed { .. })));
    }

    #[test]
    fn test_other_layer_passes_through() {
        let mut game = started();
        let center = player_center(&game);
        let mut spawn = EnemySpawn::new(EnemyType::Fighter, Vec2::ZERO);
        spawn.layer = Layer::Far;
        let enemy = game.create_enemy(spawn).unwrap();
        game.actor_mut(enemy).unwrap().body.set_center(center);

        run(&mut game, 3);
        assert!(game.is_active(enemy));
        assert!(game.is_active(game.player_id()));
        assert!(!game.drain_events().iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })));
    }

    #[test]
    fn test_crash_kills_both_and_reports_hit_once() {
        let mut game = started();
        let center = player_center(&game);
        let enemy = game
            .create_enemy(EnemySpawn::new(EnemyType::Bomber, Vec2::ZERO))
            .unwrap();
        game.actor_mut(enemy).unwrap().body.set_center(center);

        run(&mut game, 1);
        let events = game.drain_events();
        assert!(!game.is_active(enemy));
        assert!(!game.is_active(game.player_id()));
        assert!(events.contains(&GameEvent::PlayerDestroyed));
        let hits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_ramming_boss_only_kills_rammer() {
        let mut game = started();
        let center = player_center(&game);
        let boss = game
            .create_boss(crate::sim::ship::BossType::Hive, 30)
            .unwrap();
        // Same layer as the player
        game.switch_layer(boss, 0.0);
        let body = &mut game.actor_mut(boss).unwrap().body;
        body.vel = Vec2::ZERO;
        body.set_center(center);

        run(&mut game, 1);
        assert!(game.is_active(boss));
        assert_eq!(energy(&game, boss), 30);
        assert!(!game.is_active(game.player_id()));
    }

    #[test]
    fn test_powerup_collected_once() {
        let mut game = started();
        let center = player_center(&game);
        let powerup = game
            .create_powerup(PowerupKind::Weapon, 2, center, Layer::Near)
            .unwrap();

        run(&mut game, 1);
        let events = game.drain_events();
        assert!(!game.is_active(powerup));
        assert_eq!(game.player().ship.weapon, WeaponClass::Blaster);
        assert!(game.player().weapon_timer.is_some());
        let collected = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerupCollected { .. }))
            .count();
        assert_eq!(collected, 1);

        // Upgrade reverts after its timer
        run(&mut game, ((WEAPON_UPGRADE_SECS + 0.5) / SIM_DT) as usize);
        assert_eq!(game.player().ship.weapon, WeaponClass::Laser);
    }

    #[test]
    fn test_spray_volley_fires_sixteen_and_cleans_up() {
        let mut game = started();
        game.upgrade_weapon(WeaponClass::Spray);
        let player = game.player_id();
        let before = game.count_active(ActorTag::Bullet);
        game.fire_bullet(player);
        assert_eq!(game.count_active(ActorTag::Bullet) - before, SPRAY_BULLETS);

        run(&mut game, ((SPRAY_SECS + 0.2) / SIM_DT) as usize);
        assert_eq!(game.count_active(ActorTag::Bullet), 0);
        assert_eq!(game.pool_available(ActorTag::Bullet), Some(BULLET_POOL));
    }

    #[test]
    fn test_own_spray_does_not_hit_player() {
        let mut game = started();
        game.upgrade_weapon(WeaponClass::Spray);
        let player = game.player_id();
        game.fire_bullet(player);
        run(&mut game, 5);
        assert_eq!(energy(&game, player), PLAYER_ENERGY);
        assert!(!game.drain_events().iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })));
    }

    #[test]
    fn test_pooled_enemy_is_reset_on_reuse() {
        let mut game = started();
        let mut spawn = EnemySpawn::new(EnemyType::Fighter, Vec2::new(50.0, 50.0));
        spawn.layer = Layer::Far;
        spawn.energy = 3;
        let first = game.create_enemy(spawn).unwrap();
        if let ActorKind::Enemy(e) = &mut game.actor_mut(first).unwrap().kind {
            e.ship.take_damage(2);
        }
        let generation = game.actor(first).unwrap().generation;
        game.die(first, None);

        // Free list is LIFO: the released slot comes straight back
        let mut spawn = EnemySpawn::new(EnemyType::Interceptor, Vec2::new(200.0, 50.0));
        spawn.energy = 4;
        let second = game.create_enemy(spawn).unwrap();
        assert_eq!(second, first);

        let actor = game.actor(second).unwrap();
        assert_eq!(actor.generation, generation + 1);
        assert_eq!(actor.body.layer, Layer::Near);
        assert_eq!(actor.body.size, EnemyType::Interceptor.size());
        assert!(actor.body.collidable);
        assert_eq!(energy(&game, second), 4);
    }

    #[test]
    fn test_idle_game_skips_collisions() {
        let mut game = Game::new(5);
        let mut a = EnemySpawn::new(EnemyType::Fighter, Vec2::new(100.0, 100.0));
        a.energy = 1;
        let first = game.create_enemy(a).unwrap();
        let second = game
            .create_enemy(EnemySpawn::new(EnemyType::Fighter, Vec2::new(100.0, 100.0)))
            .unwrap();
        run(&mut game, 1);
        assert!(game.is_active(first) && game.is_active(second));
    }

    #[test]
    fn test_spray_radiates_from_firer_and_fits_pool() {
        let mut game = started();
        let filler = BulletSpawn {
            owner: None,
            from_player: false,
            center: Vec2::new(400.0, 60.0),
            vel: Vec2::ZERO,
            layer: Layer::Far,
            damage: 1,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
        };
        while game.pool_available(ActorTag::Bullet) > Some(5) {
            game.create_bullet(filler).unwrap();
        }

        game.upgrade_weapon(WeaponClass::Spray);
        let player = game.player_id();
        let origin = player_center(&game);
        let before = game.active_ids().to_vec();
        game.fire_bullet(player);
        let volley: Vec<ActorId> = game
            .active_ids()
            .iter()
            .copied()
            .filter(|id| !before.contains(id))
            .collect();
        assert_eq!(volley.len(), 5);
        assert_eq!(game.pool_available(ActorTag::Bullet), Some(0));
        for id in &volley {
            assert!(game.actor(*id).unwrap().body.center().distance(origin) < 1e-3);
        }

        run(&mut game, 10);
        let step = std::f32::consts::TAU / SPRAY_BULLETS as f32;
        for (i, id) in volley.iter().enumerate() {
            let dir = (game.actor(*id).unwrap().body.center() - origin).normalize();
            assert!(dir.distance(Vec2::from_angle(i as f32 * step)) < 1e-3, "bullet {i} off course");
        }

        // A short batch still cleans itself up
        run(&mut game, (SPRAY_SECS / SIM_DT) as usize);
        assert!(volley.iter().all(|id| !game.is_active(*id)));
    }

    #[test]
    fn test_exhausted_pools_spawn_nothing() {
        let mut game = started();
        while game.pool_available(ActorTag::Enemy) > Some(0) {
            game.create_enemy(EnemySpawn::new(EnemyType::Mine, Vec2::new(10.0, 10.0)))
                .unwrap();
        }
        while game.pool_available(ActorTag::Boss) > Some(0) {
            game.create_boss(crate::sim::ship::BossType::Hive, 1).unwrap();
        }
        while game.pool_available(ActorTag::Powerup) > Some(0) {
            game.create_powerup(PowerupKind::Score, 1, Vec2::new(10.0, 10.0), Layer::Far)
                .unwrap();
        }
        game.drain_events();
        let active = game.active_ids().len();

        assert_eq!(
            game.create_enemy(EnemySpawn::new(EnemyType::Fighter, Vec2::ZERO)),
            None
        );
        assert_eq!(game.create_boss(crate::sim::ship::BossType::Hive, 1), None);
        assert_eq!(
            game.create_powerup(PowerupKind::Energy, 1, Vec2::ZERO, Layer::Near),
            None
        );
        assert_eq!(game.active_ids().len(), active);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_bullet_from_dead_firer_hits_slot_successor() {
        let mut game = started();
        let mut spawn = EnemySpawn::new(EnemyType::Fighter, Vec2::new(300.0, 200.0));
        spawn.energy = 1;
        let firer = game.create_enemy(spawn).unwrap();
        let firer_ref = game.actor_ref(firer);
        game.dispose(firer);

        let successor = game.create_enemy(spawn).unwrap();
        assert_eq!(successor, firer);
        let center = game.actor(successor).unwrap().body.center();
        game.create_bullet(BulletSpawn {
            owner: Some(firer_ref),
            from_player: false,
            center,
            vel: Vec2::ZERO,
            layer: Layer::Near,
            damage: 1,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
        })
        .unwrap();
        game.drain_events();

        run(&mut game, 1);
        assert!(!game.is_active(successor));
        assert!(game.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::ShipDestroyed { id, by_player: false, .. } if *id == successor
        )));
    }
}
