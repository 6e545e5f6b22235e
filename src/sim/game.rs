//! Simulation context
//!
//! [`Game`] owns the actor arena, the per-kind pools, the active list, the
//! animator and the outgoing event queue. Every lifecycle change (spawn,
//! dispose, die) goes through it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actor::{Actor, ActorId, ActorRef, Body, Layer, LayerSwitch};
use super::pool::Pool;
use super::ship::{
    ActorKind, ActorTag, Boss, BossType, Bullet, Enemy, EnemyType, Pattern, Player, Powerup,
    PowerupKind,
};
use super::tween::{Animator, Callback, Easing, Prop, TweenSpec};
use super::weapon::{Weapon, WeaponClass};
use crate::consts::*;
use crate::error::GameError;

/// Playfield size, updated by the shell on resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl Default for World {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
        }
    }
}

/// Sound triggers for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Fire,
    Impact,
    Explosion,
    Pickup,
}

/// What was destroyed, for scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Victim {
    Player,
    Enemy {
        kind: EnemyType,
        weapon: WeaponClass,
        pattern: Pattern,
    },
    Boss {
        kind: BossType,
    },
}

/// Outcome notifications, drained by the session and presentation
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ActorAdded(ActorId),
    ActorRemoved(ActorId),
    /// Raised just before `ActorRemoved` when an actor dies
    ActorExploded {
        id: ActorId,
        at: Vec2,
        size: Vec2,
    },
    LayerSwitchStart(ActorId),
    LayerSwitchComplete(ActorId),
    /// The player touched or was touched by `by`
    PlayerHit {
        by: ActorId,
    },
    ShipDestroyed {
        id: ActorId,
        victim: Victim,
        by_player: bool,
    },
    BossDefeated,
    PlayerDestroyed,
    PowerupCollected {
        kind: PowerupKind,
        value: u32,
    },
    Sound(SoundCue),
}

/// Render snapshot of one active actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorView {
    pub id: ActorId,
    pub tag: ActorTag,
    pub variant: u8,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub layer: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Parameters for `create_enemy`
#[derive(Debug, Clone, Copy)]
pub struct EnemySpawn {
    pub kind: EnemyType,
    pub pattern: Pattern,
    /// Top-left corner after the layer is applied
    pub pos: Vec2,
    pub vel: Vec2,
    pub layer: Layer,
    pub energy: i32,
    pub weapon: WeaponClass,
}

impl EnemySpawn {
    pub fn new(kind: EnemyType, pos: Vec2) -> Self {
        Self {
            kind,
            pattern: Pattern::Straight,
            pos,
            vel: Vec2::ZERO,
            layer: Layer::Near,
            energy: 1,
            weapon: WeaponClass::Laser,
        }
    }
}

/// Parameters for `create_bullet`
#[derive(Debug, Clone, Copy)]
pub struct BulletSpawn {
    pub owner: Option<ActorRef>,
    pub from_player: bool,
    pub center: Vec2,
    pub vel: Vec2,
    pub layer: Layer,
    pub damage: i32,
    /// Near-layer size
    pub size: Vec2,
}

/// Transient-actor pools
#[derive(Debug)]
struct Pools {
    bullets: Pool,
    enemies: Pool,
    bosses: Pool,
    powerups: Pool,
}

impl Pools {
    fn get_mut(&mut self, tag: ActorTag) -> Option<&mut Pool> {
        match tag {
            ActorTag::Bullet => Some(&mut self.bullets),
            ActorTag::Enemy => Some(&mut self.enemies),
            ActorTag::Boss => Some(&mut self.bosses),
            ActorTag::Powerup => Some(&mut self.powerups),
            ActorTag::Player => None,
        }
    }

    fn get(&self, tag: ActorTag) -> Option<&Pool> {
        match tag {
            ActorTag::Bullet => Some(&self.bullets),
            ActorTag::Enemy => Some(&self.enemies),
            ActorTag::Boss => Some(&self.bosses),
            ActorTag::Powerup => Some(&self.powerups),
            ActorTag::Player => None,
        }
    }
}

/// What the acting ship ran into
enum Contact {
    Bullet { damage: i32, owner: Option<ActorRef> },
    Powerup,
    Ship { collidable: bool, crashable: bool },
}

#[derive(Debug)]
pub struct Game {
    pub world: World,
    /// Difficulty level, starting at 1
    pub level: u32,
    pub rng: Pcg32,
    pub(crate) time: f64,
    pub(crate) running: bool,
    pub(crate) actors: Vec<Actor>,
    /// Active actors in insertion order; the player, when present, is first
    pub(crate) active: Vec<ActorId>,
    pub(crate) animator: Animator,
    /// Actors already reported as hitting the player this tick
    pub(crate) player_hits: Vec<ActorId>,
    pools: Pools,
    player: ActorId,
    events: Vec<GameEvent>,
}

impl Game {
    /// Build the arena: the player in slot 0, then every pool
    pub fn new(seed: u64) -> Self {
        let capacity = 1 + BULLET_POOL + ENEMY_POOL + BOSS_POOL + POWERUP_POOL;
        let mut actors = Vec::with_capacity(capacity);

        let player = ActorId(0);
        let mut body = Body::new(Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT), false);
        // Off-stage until `start`
        body.disposed = true;
        actors.push(Actor {
            id: player,
            generation: 0,
            body,
            kind: ActorKind::Player(Player::new("PLAYER")),
        });

        let pools = Pools {
            bullets: allocate(
                &mut actors,
                ActorTag::Bullet,
                BULLET_POOL,
                Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
                || {
                    ActorKind::Bullet(Bullet {
                        damage: 0,
                        owner: None,
                        from_player: false,
                    })
                },
            ),
            enemies: allocate(
                &mut actors,
                ActorTag::Enemy,
                ENEMY_POOL,
                EnemyType::Fighter.size(),
                || ActorKind::Enemy(Enemy::new(EnemyType::Fighter, Pattern::Straight, 1, WeaponClass::Laser)),
            ),
            bosses: allocate(
                &mut actors,
                ActorTag::Boss,
                BOSS_POOL,
                BossType::Dreadnought.size(),
                || ActorKind::Boss(Boss::new(BossType::Dreadnought, 1)),
            ),
            powerups: allocate(
                &mut actors,
                ActorTag::Powerup,
                POWERUP_POOL,
                Vec2::splat(POWERUP_SIZE),
                || {
                    ActorKind::Powerup(Powerup {
                        kind: PowerupKind::Score,
                        value: 0,
                    })
                },
            ),
        };

        log::debug!("Game arena allocated: {} slots", actors.len());

        Self {
            world: World::default(),
            level: 1,
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
            running: false,
            actors,
            active: Vec::new(),
            animator: Animator::new(),
            player_hits: Vec::new(),
            pools,
            player,
            events: Vec::new(),
        }
    }

    /// Clear the field back to the idle state (player kept but off-stage)
    pub fn reset(&mut self) {
        for id in self.active.clone() {
            self.dispose(id);
        }
        self.animator.clear();
        self.level = 1;
        self.running = false;
        self.player_hits.clear();
    }

    /// Put a fresh player on the field and enable collisions
    pub fn start(&mut self, name: &str) {
        self.reset_player(name);
        let player = self.player;
        if !self.active.contains(&player) {
            self.active.insert(0, player);
            self.emit(GameEvent::ActorAdded(player));
        }
        self.running = true;
        log::info!("Round started for {name} at level {}", self.level);
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Simulation clock in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_world_size(&mut self, width: f32, height: f32) {
        self.world = World { width, height };
    }

    fn reset_player(&mut self, name: &str) {
        let player = self.player;
        self.animator.kill_tweens_of(player);
        let world = self.world;
        let actor = &mut self.actors[player.index()];
        actor.kind = ActorKind::Player(Player::new(name));
        actor.body.reset(Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT), HIT_MARGIN);
        actor.body.snap_to_layer(Layer::Near);
        actor.body.pos = Vec2::new(
            (world.width - actor.body.size.x) * 0.5,
            world.height - actor.body.size.y * 1.5,
        );
        actor.body.refresh_hit_box();
    }

    // === Queries ===

    pub fn player_id(&self) -> ActorId {
        self.player
    }

    pub fn player(&self) -> &Player {
        match &self.actors[self.player.index()].kind {
            ActorKind::Player(p) => p,
            _ => unreachable!("slot 0 always holds the player"),
        }
    }

    pub(crate) fn player_mut(&mut self) -> &mut Player {
        match &mut self.actors[self.player.index()].kind {
            ActorKind::Player(p) => p,
            _ => unreachable!("slot 0 always holds the player"),
        }
    }

    pub fn player_layer(&self) -> Layer {
        self.actors[self.player.index()].body.layer
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.index())
    }

    pub(crate) fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.index())
    }

    /// On the field (not disposed)
    pub fn is_active(&self, id: ActorId) -> bool {
        self.actors
            .get(id.index())
            .is_some_and(|a| !a.body.disposed)
    }

    /// Still the same acquisition and not disposed
    pub fn is_live(&self, actor: ActorRef) -> bool {
        self.actors
            .get(actor.id.index())
            .is_some_and(|a| a.generation == actor.generation && !a.body.disposed)
    }

    pub fn actor_ref(&self, id: ActorId) -> ActorRef {
        self.actors[id.index()].actor_ref()
    }

    pub fn active_ids(&self) -> &[ActorId] {
        &self.active
    }

    pub fn count_active(&self, tag: ActorTag) -> usize {
        self.active
            .iter()
            .filter(|id| self.actors[id.index()].kind.tag() == tag)
            .count()
    }

    /// Free slots left in a pool (`None` for the player)
    pub fn pool_available(&self, tag: ActorTag) -> Option<usize> {
        self.pools.get(tag).map(Pool::available)
    }

    /// Render snapshot of all active actors
    pub fn views(&self) -> Vec<ActorView> {
        self.active
            .iter()
            .map(|id| {
                let actor = &self.actors[id.index()];
                let body = &actor.body;
                ActorView {
                    id: *id,
                    tag: actor.kind.tag(),
                    variant: actor.kind.variant(),
                    x: body.pos.x,
                    y: body.pos.y,
                    width: body.size.x,
                    height: body.size.y,
                    layer: body.layer_value,
                    offset_x: body.offset.x,
                    offset_y: body.offset.y,
                }
            })
            .collect()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Lifecycle ===

    fn acquire(&mut self, tag: ActorTag) -> Option<ActorId> {
        let Some(id) = self.pools.get_mut(tag).and_then(Pool::acquire) else {
            log::debug!("{tag:?} pool exhausted, spawn skipped");
            return None;
        };
        let actor = &mut self.actors[id.index()];
        actor.generation = actor.generation.wrapping_add(1);
        Some(id)
    }

    /// Reset a freshly acquired slot and install its variant data
    fn prepare(&mut self, id: ActorId, kind: ActorKind, org_size: Vec2, hit_margin: f32, layer: Layer) {
        let actor = &mut self.actors[id.index()];
        actor.kind = kind;
        actor.body.reset(org_size, hit_margin);
        if actor.body.layer != layer {
            self.switch_layer(id, 0.0);
        }
    }

    fn activate(&mut self, id: ActorId) {
        self.actors[id.index()].body.refresh_hit_box();
        self.active.push(id);
        self.emit(GameEvent::ActorAdded(id));
    }

    /// Remove quietly (off-screen cull, spent bullet, collected powerup)
    pub fn dispose(&mut self, id: ActorId) {
        self.remove_actor(id, false);
    }

    fn remove_actor(&mut self, id: ActorId, explode: bool) {
        let Some(actor) = self.actors.get_mut(id.index()) else {
            return;
        };
        if actor.body.disposed {
            return;
        }
        actor.body.disposed = true;
        actor.body.switching = None;
        actor.body.offset = Vec2::ZERO;
        match &mut actor.kind {
            ActorKind::Player(p) => p.weapon_timer = None,
            ActorKind::Enemy(e) => e.pattern_tween = None,
            ActorKind::Boss(b) => b.phase_timer = None,
            ActorKind::Bullet(_) | ActorKind::Powerup(_) => {}
        }
        let pooled = actor.body.pooled;
        let tag = actor.kind.tag();
        let at = actor.body.center();
        let size = actor.body.size;

        self.animator.kill_tweens_of(id);
        if let Some(pos) = self.active.iter().position(|a| *a == id) {
            self.active.remove(pos);
        }
        if pooled {
            if let Some(pool) = self.pools.get_mut(tag) {
                pool.release(id);
            }
        }
        if explode {
            self.emit(GameEvent::ActorExploded { id, at, size });
        }
        self.emit(GameEvent::ActorRemoved(id));
    }

    /// Kill a ship: no energy, no collisions, removed with an explosion
    pub fn die(&mut self, id: ActorId, killer: Option<ActorId>) {
        let player = self.player;
        let Some(actor) = self.actors.get_mut(id.index()) else {
            return;
        };
        if actor.body.disposed {
            return;
        }
        let Some(victim) = victim_of(&actor.kind) else {
            return;
        };
        if let Some(ship) = actor.kind.ship_mut() {
            ship.energy = 0;
        }
        actor.body.collidable = false;
        let by_player = id != player && killer == Some(player);

        self.remove_actor(id, true);
        self.emit(GameEvent::ShipDestroyed {
            id,
            victim,
            by_player,
        });
        self.emit(GameEvent::Sound(SoundCue::Explosion));
        match victim {
            Victim::Boss { kind } => {
                log::info!("Boss {kind:?} defeated at level {}", self.level);
                self.emit(GameEvent::BossDefeated);
            }
            Victim::Player => {
                log::info!("Player destroyed");
                self.emit(GameEvent::PlayerDestroyed);
            }
            Victim::Enemy { .. } => {}
        }
    }

    // === Spawning ===

    pub fn create_enemy(&mut self, spawn: EnemySpawn) -> Option<ActorId> {
        let id = self.acquire(ActorTag::Enemy)?;
        let enemy = Enemy::new(spawn.kind, spawn.pattern, spawn.energy.max(1), spawn.weapon);
        self.prepare(id, ActorKind::Enemy(enemy), spawn.kind.size(), HIT_MARGIN, spawn.layer);
        let body = &mut self.actors[id.index()].body;
        body.pos = spawn.pos;
        body.vel = spawn.vel;
        self.activate(id);
        log::debug!("Enemy {:?} spawned as {id:?}", spawn.kind);
        Some(id)
    }

    /// Boss enters centered above the top edge, on the far layer
    pub fn create_boss(&mut self, kind: BossType, energy: i32) -> Option<ActorId> {
        let id = self.acquire(ActorTag::Boss)?;
        self.prepare(
            id,
            ActorKind::Boss(Boss::new(kind, energy.max(1))),
            kind.size(),
            kind.hit_margin(),
            Layer::Far,
        );
        let world = self.world;
        let body = &mut self.actors[id.index()].body;
        body.pos = Vec2::new((world.width - body.size.x) * 0.5, -body.size.y);
        body.vel = Vec2::new(0.0, BOSS_DESCENT_SPEED);
        self.activate(id);
        log::info!("Boss {kind:?} incoming with {energy} energy");
        Some(id)
    }

    /// Powerup drifting down from `center`
    pub fn create_powerup(
        &mut self,
        kind: PowerupKind,
        value: u32,
        center: Vec2,
        layer: Layer,
    ) -> Option<ActorId> {
        let id = self.acquire(ActorTag::Powerup)?;
        self.prepare(
            id,
            ActorKind::Powerup(Powerup { kind, value }),
            Vec2::splat(POWERUP_SIZE),
            HIT_MARGIN,
            layer,
        );
        let body = &mut self.actors[id.index()].body;
        body.set_center(center);
        body.vel = Vec2::new(0.0, POWERUP_SPEED);
        self.activate(id);
        Some(id)
    }

    pub fn create_bullet(&mut self, spawn: BulletSpawn) -> Option<ActorId> {
        let id = self.acquire(ActorTag::Bullet)?;
        let bullet = Bullet {
            damage: spawn.damage,
            owner: spawn.owner,
            from_player: spawn.from_player,
        };
        self.prepare(id, ActorKind::Bullet(bullet), spawn.size, HIT_MARGIN, spawn.layer);
        let body = &mut self.actors[id.index()].body;
        body.set_center(spawn.center);
        body.vel = spawn.vel;
        self.activate(id);
        Some(id)
    }

    /// Fire the ship's current weapon from its muzzle
    pub fn fire_bullet(&mut self, firer: ActorId) {
        let Some(actor) = self.actors.get(firer.index()) else {
            return;
        };
        if actor.body.disposed {
            return;
        }
        let Some(ship) = actor.kind.ship() else {
            return;
        };
        let weapon = Weapon::for_class(ship.weapon);
        let owner = actor.actor_ref();
        let from_player = firer == self.player;
        let layer = actor.body.layer;
        let center = actor.body.center();
        let top = actor.body.pos.y + actor.body.offset.y;
        let bottom = top + actor.body.size.y;

        self.emit(GameEvent::Sound(SoundCue::Fire));

        if weapon.is_spray() {
            self.fire_spray(owner, from_player, center, layer, weapon.damage);
            return;
        }

        let org_size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
        let half = org_size.y * layer.scale() * 0.5;
        let (muzzle_y, speed) = if from_player {
            (top - half, -weapon.bullet_speed)
        } else {
            (bottom + half, ENEMY_BULLET_SPEED)
        };
        self.create_bullet(BulletSpawn {
            owner: Some(owner),
            from_player,
            center: Vec2::new(center.x, muzzle_y),
            vel: Vec2::new(0.0, speed),
            layer,
            damage: weapon.damage,
            size: org_size,
        });
    }

    /// Radial volley animated out past the world edge
    fn fire_spray(&mut self, firer: ActorRef, from_player: bool, center: Vec2, layer: Layer, damage: i32) {
        let reach = self.world.width.max(self.world.height) * 1.5;
        let step = std::f32::consts::TAU / SPRAY_BULLETS as f32;

        let mut batch = Vec::with_capacity(SPRAY_BULLETS);
        for i in 0..SPRAY_BULLETS {
            let Some(id) = self.create_bullet(BulletSpawn {
                owner: Some(firer),
                from_player,
                center,
                vel: Vec2::ZERO,
                layer,
                damage,
                size: Vec2::splat(SPRAY_BULLET_SIZE),
            }) else {
                break;
            };
            let target = center + Vec2::from_angle(i as f32 * step) * reach;
            batch.push((self.actor_ref(id), target));
        }

        let refs: Vec<ActorRef> = batch.iter().map(|(r, _)| *r).collect();
        let last = batch.len().saturating_sub(1);
        for (n, (owner, target)) in batch.into_iter().enumerate() {
            let body = &self.actors[owner.id.index()].body;
            let from = body.pos;
            let to = target - body.size * 0.5;
            let callback = if n == last {
                Callback::SprayBatchSpent(refs.clone())
            } else {
                Callback::SprayBulletSpent
            };
            self.animator.animate(
                owner,
                TweenSpec::new(SPRAY_SECS)
                    .prop(Prop::X, from.x, to.x)
                    .prop(Prop::Y, from.y, to.y)
                    .on_complete(callback),
            );
        }
    }

    // === Layers ===

    /// Animate to the other layer; no-op while already switching.
    /// A zero duration snaps silently.
    pub fn switch_layer(&mut self, id: ActorId, duration: f32) {
        let Some(actor) = self.actors.get_mut(id.index()) else {
            return;
        };
        let owner = actor.actor_ref();
        let body = &mut actor.body;
        if body.disposed || body.is_switching() {
            return;
        }
        let from = body.layer;
        let to = from.other();
        if duration <= 0.0 {
            body.snap_to_layer(to);
            return;
        }
        let tween = self.animator.animate(
            owner,
            TweenSpec::new(duration)
                .prop(Prop::Layer, from.value(), to.value())
                .easing(Easing::SineInOut)
                .on_complete(Callback::LayerSwitched),
        );
        body.switching = Some(LayerSwitch {
            to,
            start_size: body.size,
            tween,
        });
        self.emit(GameEvent::LayerSwitchStart(id));
    }

    // === Combat ===

    /// Narrow phase: same layer, overlapping hit-boxes, not self, not own bullet
    pub fn collides(&self, a: ActorId, b: ActorId) -> bool {
        if a == b {
            return false;
        }
        let (Some(x), Some(y)) = (self.actors.get(a.index()), self.actors.get(b.index())) else {
            return false;
        };
        if fired_by(x, y) || fired_by(y, x) {
            return false;
        }
        x.body.collides(&y.body)
    }

    /// Broad phase: active actors whose visual bounds overlap `id`'s
    pub fn broad_phase(&self, id: ActorId) -> Vec<ActorId> {
        let bounds = self.actors[id.index()].body.bounds();
        self.active
            .iter()
            .copied()
            .filter(|&other| other != id && self.actors[other.index()].body.bounds().overlaps(&bounds))
            .collect()
    }

    /// Resolve `id` running into `other`. Only ships react.
    pub fn hit(&mut self, id: ActorId, other: ActorId) {
        if id == other || !self.is_active(id) || !self.is_active(other) {
            return;
        }
        let actor = &self.actors[id.index()];
        let Some(ship) = actor.kind.ship() else {
            return;
        };
        if !actor.body.collidable {
            return;
        }
        let crashable = ship.crashable;

        let target = &self.actors[other.index()];
        let contact = match &target.kind {
            ActorKind::Bullet(b) => Contact::Bullet {
                damage: b.damage,
                owner: b.owner,
            },
            ActorKind::Powerup(_) => Contact::Powerup,
            kind => Contact::Ship {
                collidable: target.body.collidable,
                crashable: kind.ship().is_some_and(|s| s.crashable),
            },
        };

        let me = self.actors[id.index()].actor_ref();
        let killer = match contact {
            Contact::Bullet { owner, .. } if owner == Some(me) => return,
            Contact::Bullet { damage, owner } => {
                self.bullet_hit(id, other, damage);
                // Credit only a firer still holding its slot
                owner.filter(|o| self.is_live(*o)).map(|o| o.id)
            }
            Contact::Powerup => {
                if id == self.player {
                    self.collect_powerup(other);
                }
                return;
            }
            Contact::Ship {
                collidable,
                crashable: other_crashable,
            } => {
                if !crashable || !collidable {
                    return;
                }
                if let Some(ship) = self.actors[id.index()].kind.ship_mut() {
                    ship.energy = 0;
                }
                if other_crashable {
                    if let Some(ship) = self.actors[other.index()].kind.ship_mut() {
                        ship.energy = 0;
                    }
                    self.die(other, Some(id));
                }
                Some(other)
            }
        };

        let dead = self.actors[id.index()]
            .kind
            .ship()
            .is_some_and(|s| s.is_dead());
        if dead {
            self.die(id, killer);
        }
    }

    /// Apply a bullet's damage to a ship; bullets are single-use
    fn bullet_hit(&mut self, target: ActorId, bullet: ActorId, damage: i32) {
        if let Some(ship) = self.actors[target.index()].kind.ship_mut() {
            ship.take_damage(damage);
        }
        self.emit(GameEvent::Sound(SoundCue::Impact));
        self.dispose(bullet);
    }

    fn collect_powerup(&mut self, id: ActorId) {
        let (kind, value) = match &self.actors[id.index()].kind {
            ActorKind::Powerup(p) => (p.kind, p.value),
            _ => return,
        };
        match kind {
            PowerupKind::Energy => self.player_mut().ship.heal(value as i32),
            PowerupKind::Weapon => {
                let class = u8::try_from(value)
                    .map_err(|_| GameError::UnknownWeaponClass(u8::MAX))
                    .and_then(WeaponClass::try_from);
                match class {
                    Ok(class) => self.upgrade_weapon(class),
                    Err(err) => log::error!("Ignoring weapon powerup: {err}"),
                }
            }
            PowerupKind::Score => self.player_mut().score += value as u64,
        }
        self.emit(GameEvent::PowerupCollected { kind, value });
        self.emit(GameEvent::Sound(SoundCue::Pickup));
        self.dispose(id);
    }

    /// Equip the player; anything but the default reverts after a while
    pub fn upgrade_weapon(&mut self, class: WeaponClass) {
        let owner = self.actor_ref(self.player);
        if let Some(timer) = self.player_mut().weapon_timer.take() {
            self.animator.cancel(timer);
        }
        self.player_mut().ship.equip(class);
        if class != WeaponClass::default() {
            let timer = self
                .animator
                .delay(owner, WEAPON_UPGRADE_SECS, Callback::WeaponExpired);
            self.player_mut().weapon_timer = Some(timer);
        }
        log::debug!("Player weapon: {class:?}");
    }

    /// Steering input: `axis` is clamped to unit length
    pub fn steer_player(&mut self, axis: Vec2, firing: bool) {
        let player = self.player;
        let actor = &mut self.actors[player.index()];
        actor.body.vel = axis.clamp_length_max(1.0) * PLAYER_SPEED;
        if let ActorKind::Player(p) = &mut actor.kind {
            p.firing = firing;
        }
    }

    // === Animations ===

    /// Step tweens and apply their values and callbacks
    pub(crate) fn run_animations(&mut self, dt: f32) {
        for frame in self.animator.advance(dt) {
            if !self.is_live(frame.owner) {
                continue;
            }
            let body = &mut self.actors[frame.owner.id.index()].body;
            for (prop, value) in &frame.values {
                match prop {
                    Prop::X => body.pos.x = *value,
                    Prop::Y => body.pos.y = *value,
                    Prop::Layer => body.apply_layer_value(*value),
                }
            }
            if !frame.values.is_empty() && body.in_view() {
                body.refresh_hit_box();
            }
            for callback in frame.callbacks {
                if !self.is_live(frame.owner) {
                    break;
                }
                self.handle_callback(frame.owner.id, callback);
            }
        }
    }

    fn handle_callback(&mut self, id: ActorId, callback: Callback) {
        match callback {
            Callback::LayerSwitched => {
                if self.actors[id.index()].body.finish_layer_switch() {
                    self.emit(GameEvent::LayerSwitchComplete(id));
                }
            }
            Callback::SprayBulletSpent => self.dispose(id),
            Callback::SprayBatchSpent(batch) => {
                for bullet in batch {
                    if self.is_live(bullet) {
                        self.dispose(bullet.id);
                    }
                }
            }
            Callback::WeaponExpired => {
                let player = self.player_mut();
                player.weapon_timer = None;
                player.ship.equip(WeaponClass::default());
                log::debug!("Weapon upgrade expired");
            }
            Callback::BossPhaseElapsed => self.advance_boss_phase(id),
            Callback::PatternRepeat => self.on_pattern_repeat(id),
        }
    }
}

/// Push `count` pooled slots of one kind onto the arena
fn allocate(
    actors: &mut Vec<Actor>,
    tag: ActorTag,
    count: usize,
    org_size: Vec2,
    make: impl Fn() -> ActorKind,
) -> Pool {
    let start = actors.len() as u32;
    for i in 0..count as u32 {
        actors.push(Actor {
            id: ActorId(start + i),
            generation: 0,
            body: Body::new(org_size, true),
            kind: make(),
        });
    }
    Pool::new(tag, (start..start + count as u32).map(ActorId))
}

fn victim_of(kind: &ActorKind) -> Option<Victim> {
    match kind {
        ActorKind::Player(_) => Some(Victim::Player),
        ActorKind::Enemy(e) => Some(Victim::Enemy {
            kind: e.kind,
            weapon: e.ship.weapon,
            pattern: e.pattern,
        }),
        ActorKind::Boss(b) => Some(Victim::Boss { kind: b.kind }),
        ActorKind::Bullet(_) | ActorKind::Powerup(_) => None,
    }
}

/// `actor` is a bullet fired by this acquisition of `ship`
fn fired_by(actor: &Actor, ship: &Actor) -> bool {
    actor
        .kind
        .bullet()
        .is_some_and(|b| b.owner == Some(ship.actor_ref()))
}
