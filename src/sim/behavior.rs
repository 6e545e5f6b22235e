//! Per-variant update rules: player steering, enemy patterns, boss phases

use glam::Vec2;

use super::actor::ActorId;
use super::game::Game;
use super::ship::{ActorKind, ActorTag, AttackPhase, BossStage, Pattern};
use super::tween::{Callback, Easing, Prop, TweenSpec};
use crate::consts::*;

impl Game {
    /// Advance one active actor by `dt`
    pub(crate) fn update_actor(&mut self, id: ActorId, dt: f32) {
        let Some(tag) = self.actor(id).map(|a| a.kind.tag()) else {
            return;
        };
        match tag {
            ActorTag::Player => self.update_player(id, dt),
            ActorTag::Enemy => self.update_enemy(id, dt),
            ActorTag::Boss => self.update_boss(id, dt),
            ActorTag::Bullet | ActorTag::Powerup => {
                if let Some(actor) = self.actor_mut(id) {
                    actor.body.integrate(dt);
                }
            }
        }
    }

    fn update_player(&mut self, id: ActorId, dt: f32) {
        let world = self.world;
        let now = self.time;
        let running = self.running;
        let actor = &mut self.actors[id.index()];
        let body = &mut actor.body;
        body.integrate(dt);
        let max = (Vec2::new(world.width, world.height) - body.size).max(Vec2::ZERO);
        // Clamp the drawn rect, which is shifted by the switch offset
        body.pos = (body.pos + body.offset).clamp(Vec2::ZERO, max) - body.offset;
        body.refresh_hit_box();

        let ActorKind::Player(player) = &mut actor.kind else {
            return;
        };
        if running && player.firing && player.ship.ready_to_fire(now) {
            player.ship.mark_fired(now);
            self.fire_bullet(id);
        }
    }

    fn update_enemy(&mut self, id: ActorId, dt: f32) {
        let now = self.time;
        let actor = &mut self.actors[id.index()];
        actor.body.integrate(dt);
        if !actor.body.in_view() {
            return;
        }
        let ActorKind::Enemy(enemy) = &mut actor.kind else {
            return;
        };
        if !enemy.activated {
            self.activate_enemy(id);
            return;
        }
        if enemy.kind.fires() && enemy.ship.ready_to_fire(now) {
            enemy.ship.mark_fired(now);
            self.fire_bullet(id);
        }
    }

    /// First in-view tick: arm the gun and start the trajectory tween
    fn activate_enemy(&mut self, id: ActorId) {
        let now = self.time;
        let world_width = self.world.width;
        let owner = self.actor_ref(id);
        let actor = &mut self.actors[id.index()];
        let x = actor.body.pos.x;
        let center_x = actor.body.center().x;
        let ActorKind::Enemy(enemy) = &mut actor.kind else {
            return;
        };
        enemy.activated = true;
        enemy.ship.mark_fired(now);

        // Amplitude follows the current world width
        let sway = match enemy.pattern {
            Pattern::Straight => None,
            Pattern::Sine => Some((world_width * 0.2, Easing::SineInOut, PATTERN_SECS)),
            Pattern::Cube => Some((world_width * 0.3, Easing::CubicInOut, PATTERN_SECS * 1.25)),
        };
        let Some((amplitude, easing, secs)) = sway else {
            return;
        };
        // Sway toward the middle of the field first
        let dir = if center_x < world_width * 0.5 { 1.0 } else { -1.0 };
        let tween = self.animator.animate(
            owner,
            TweenSpec::new(secs)
                .prop(Prop::X, x, x + dir * amplitude)
                .easing(easing)
                .yoyo_forever(Callback::PatternRepeat),
        );
        if let ActorKind::Enemy(enemy) = &mut self.actors[id.index()].kind {
            enemy.pattern_tween = Some(tween);
        }
    }

    /// Each pattern turnaround the enemy chases the player's layer
    pub(crate) fn on_pattern_repeat(&mut self, id: ActorId) {
        if self.follow_player_layer(id, ENEMY_LAYER_SWITCH_SECS) {
            log::trace!("Enemy {id:?} changing layer");
        }
    }

    /// Start a layer switch if `id` is not on the player's layer
    fn follow_player_layer(&mut self, id: ActorId, duration: f32) -> bool {
        let player = self.player_id();
        if !self.is_active(player) {
            return false;
        }
        let target = self.player_layer();
        let body = &self.actors[id.index()].body;
        if body.is_switching() || body.layer == target {
            return false;
        }
        self.switch_layer(id, duration);
        true
    }

    fn update_boss(&mut self, id: ActorId, dt: f32) {
        let now = self.time;
        let station = self.world.height * 0.5;
        let player = self.player_id();
        let player_x = self
            .is_active(player)
            .then(|| self.actors[player.index()].body.center().x);

        let actor = &mut self.actors[id.index()];
        actor.body.integrate(dt);
        let ActorKind::Boss(boss) = &mut actor.kind else {
            return;
        };
        match boss.stage {
            BossStage::Entering => {
                if actor.body.pos.y >= station - actor.body.size.y {
                    actor.body.vel = Vec2::ZERO;
                    boss.stage = BossStage::Attacking;
                    log::debug!("Boss {:?} on station", boss.kind);
                    self.start_boss_phase(id, AttackPhase::Spray);
                }
            }
            BossStage::Attacking => {
                actor.body.vel.x = match player_x {
                    Some(px) => {
                        let dx = px - actor.body.center().x;
                        if dx.abs() > 4.0 { dx.signum() * BOSS_DRIFT_SPEED } else { 0.0 }
                    }
                    None => 0.0,
                };
                if boss.ship.ready_to_fire(now) {
                    boss.ship.mark_fired(now);
                    self.fire_bullet(id);
                }
            }
        }
    }

    /// Enter an attack phase: adopt its weapon and cadence, follow the
    /// player's layer and schedule the next phase
    pub(crate) fn start_boss_phase(&mut self, id: ActorId, phase: AttackPhase) {
        let now = self.time;
        let owner = self.actor_ref(id);
        let ActorKind::Boss(boss) = &mut self.actors[id.index()].kind else {
            return;
        };
        boss.phase = phase;
        boss.ship.equip(phase.weapon());
        boss.ship.fire_interval = phase.fire_interval();
        boss.ship.mark_fired(now);
        let stale = boss.phase_timer.take();
        let kind = boss.kind;

        if let Some(timer) = stale {
            self.animator.cancel(timer);
        }
        let timer = self
            .animator
            .delay(owner, BOSS_PHASE_SECS, Callback::BossPhaseElapsed);
        if let ActorKind::Boss(boss) = &mut self.actors[id.index()].kind {
            boss.phase_timer = Some(timer);
        }
        log::debug!("Boss {kind:?} phase {phase:?}");

        self.follow_player_layer(id, BOSS_LAYER_SWITCH_SECS);
    }

    pub(crate) fn advance_boss_phase(&mut self, id: ActorId) {
        let next = match &mut self.actors[id.index()].kind {
            ActorKind::Boss(boss) => {
                boss.phase_timer = None;
                boss.phase.next()
            }
            _ => return,
        };
        self.start_boss_phase(id, next);
    }
}

#[cfg(test)]
mod tests {
    use super::super::actor::Layer;
    use super::super::game::{EnemySpawn, GameEvent};
    use super::super::ship::{BossType, EnemyType};
    use super::super::weapon::WeaponClass;
    use super::*;

    fn step(game: &mut Game, secs: f32) {
        let steps = (secs / SIM_DT).round() as usize;
        for _ in 0..steps {
            super::super::tick::tick(game, &Default::default(), SIM_DT);
        }
    }

    fn boss_on_station(game: &mut Game) -> ActorId {
        let id = game.create_boss(BossType::Dreadnought, 50).unwrap();
        let actor = game.actor_mut(id).unwrap();
        actor.body.vel = Vec2::ZERO;
        actor.body.pos = Vec2::new(300.0, 100.0);
        if let ActorKind::Boss(boss) = &mut actor.kind {
            boss.stage = BossStage::Attacking;
        }
        id
    }

    fn boss_phase(game: &Game, id: ActorId) -> u8 {
        match &game.actor(id).unwrap().kind {
            ActorKind::Boss(b) => b.phase.index(),
            _ => panic!("not a boss"),
        }
    }

    fn switch_starts(events: &[GameEvent], id: ActorId) -> usize {
        events
            .iter()
            .filter(|e| **e == GameEvent::LayerSwitchStart(id))
            .count()
    }

    #[test]
    fn test_boss_phases_cycle_every_interval() {
        let mut game = Game::new(7);
        let id = boss_on_station(&mut game);
        game.start_boss_phase(id, AttackPhase::Spray);

        // Sample mid-phase so step rounding never lands on a boundary
        step(&mut game, BOSS_PHASE_SECS * 0.5);
        let mut seen = vec![boss_phase(&game, id)];
        for _ in 0..3 {
            step(&mut game, BOSS_PHASE_SECS);
            seen.push(boss_phase(&game, id));
        }
        assert_eq!(seen, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_boss_switches_layer_once_per_phase_start() {
        let mut game = Game::new(7);
        game.start("ACE");
        game.stop();
        let id = boss_on_station(&mut game);
        assert_eq!(game.actor(id).unwrap().body.layer, Layer::Far);
        game.drain_events();

        game.start_boss_phase(id, AttackPhase::Spray);
        step(&mut game, BOSS_LAYER_SWITCH_SECS + 0.5);
        let events = game.drain_events();
        assert_eq!(switch_starts(&events, id), 1);
        assert!(events.contains(&GameEvent::LayerSwitchComplete(id)));
        assert_eq!(game.actor(id).unwrap().body.layer, Layer::Near);

        // Already on the player's layer: next phase starts without a switch
        step(&mut game, BOSS_PHASE_SECS);
        assert_eq!(switch_starts(&game.drain_events(), id), 0);
    }

    #[test]
    fn test_boss_descends_then_attacks() {
        let mut game = Game::new(3);
        let id = game.create_boss(BossType::Carrier, 10).unwrap();
        step(&mut game, 20.0);
        match &game.actor(id).unwrap().kind {
            ActorKind::Boss(b) => assert_eq!(b.stage, BossStage::Attacking),
            _ => panic!("not a boss"),
        }
        let body = &game.actor(id).unwrap().body;
        assert!(body.pos.y + body.size.y <= game.world.height * 0.5 + BOSS_DESCENT_SPEED * SIM_DT);
    }

    #[test]
    fn test_sine_enemy_sways_and_mine_holds_fire() {
        let mut game = Game::new(11);
        let mut spawn = EnemySpawn::new(EnemyType::Fighter, Vec2::new(100.0, 10.0));
        spawn.pattern = Pattern::Sine;
        let fighter = game.create_enemy(spawn).unwrap();

        let mut spawn = EnemySpawn::new(EnemyType::Mine, Vec2::new(500.0, 10.0));
        spawn.weapon = WeaponClass::Blaster;
        let mine = game.create_enemy(spawn).unwrap();

        step(&mut game, 0.1);
        assert_eq!(game.animator.pending_for(fighter), 1);
        assert_eq!(game.animator.pending_for(mine), 0);

        step(&mut game, 1.0);
        // Swayed toward the center
        assert!(game.actor(fighter).unwrap().body.pos.x > 100.0);

        step(&mut game, 4.0);
        let bullets_from = |owner: ActorId| {
            game.active_ids()
                .iter()
                .filter_map(|id| game.actor(*id).unwrap().kind.bullet())
                .filter(|b| b.owner.is_some_and(|o| o.id == owner))
                .count()
        };
        assert!(bullets_from(fighter) > 0);
        assert_eq!(bullets_from(mine), 0);
    }

    #[test]
    fn test_player_stays_on_screen_while_growing() {
        let mut game = Game::new(21);
        game.start("ACE");
        let player = game.player_id();
        game.switch_layer(player, 0.0);
        let width = game.world.width;
        let body = &mut game.actor_mut(player).unwrap().body;
        assert_eq!(body.layer, Layer::Far);
        body.pos.x = width - body.size.x;

        let right_edge = |game: &Game| {
            let body = &game.actor(player).unwrap().body;
            body.pos.x + body.offset.x + body.size.x
        };
        game.switch_layer(player, PLAYER_LAYER_SWITCH_SECS);
        step(&mut game, PLAYER_LAYER_SWITCH_SECS * 0.5);
        assert!(game.actor(player).unwrap().body.is_switching());
        assert!((right_edge(&game) - width).abs() < 1e-3);

        step(&mut game, PLAYER_LAYER_SWITCH_SECS);
        assert_eq!(game.actor(player).unwrap().body.layer, Layer::Near);
        assert!((right_edge(&game) - width).abs() < 1e-3);
    }

    #[test]
    fn test_released_slots_carry_no_timers() {
        let mut game = Game::new(13);
        let boss = boss_on_station(&mut game);
        game.start_boss_phase(boss, AttackPhase::Spray);
        assert!(game.animator.pending_for(boss) > 0);
        game.die(boss, None);
        assert_eq!(game.animator.pending_for(boss), 0);

        // Reacquired slot sits out a whole phase still descending
        let reused = game.create_boss(BossType::Carrier, 10).unwrap();
        assert_eq!(reused, boss);
        step(&mut game, BOSS_PHASE_SECS + 0.5);
        match &game.actor(reused).unwrap().kind {
            ActorKind::Boss(b) => {
                assert_eq!(b.stage, BossStage::Entering);
                assert_eq!(b.phase, AttackPhase::Spray);
                assert!(b.phase_timer.is_none());
            }
            _ => panic!("not a boss"),
        }
        assert_eq!(game.animator.pending_for(reused), 0);

        let mut spawn = EnemySpawn::new(EnemyType::Fighter, Vec2::new(100.0, 10.0));
        spawn.pattern = Pattern::Sine;
        let fighter = game.create_enemy(spawn).unwrap();
        step(&mut game, 0.1);
        assert_eq!(game.animator.pending_for(fighter), 1);
        game.dispose(fighter);
        assert_eq!(game.animator.pending_for(fighter), 0);

        let straight = game
            .create_enemy(EnemySpawn::new(EnemyType::Interceptor, Vec2::new(300.0, 10.0)))
            .unwrap();
        assert_eq!(straight, fighter);
        step(&mut game, PATTERN_SECS * 2.0);
        assert_eq!(game.animator.pending_for(straight), 0);
        assert_eq!(game.actor(straight).unwrap().body.pos, Vec2::new(300.0, 10.0));
    }
}
