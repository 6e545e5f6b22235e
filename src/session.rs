//! Session controller
//!
//! Drives the simulation from display frames with a fixed-timestep
//! accumulator, runs the spawn playlist, turns simulation events into score,
//! level and game-over transitions, and forwards them to the presentation.

use crate::action::{Action, points_for_kill};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::sim::{Game, GameEvent, TickInput, tick};

/// Top-level game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Attract screen: the field ticks, nothing collides, no spawns
    #[default]
    Title,
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug)]
pub struct Session {
    pub game: Game,
    pub action: Action,
    /// Input applied to every substep; one-shot flags are cleared after use
    pub input: TickInput,
    phase: SessionPhase,
    accumulator: f32,
    last_time: Option<f64>,
    /// Seconds until the next playlist entry runs
    next_act_in: f32,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            game: Game::new(seed),
            action: Action::new(),
            input: TickInput::default(),
            phase: SessionPhase::Title,
            accumulator: 0.0,
            last_time: None,
            next_act_in: 0.0,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.game.player().score
    }

    pub fn level(&self) -> u32 {
        self.game.level
    }

    /// Clear the field and start a fresh round
    pub fn start_round(&mut self, name: &str) {
        self.game.reset();
        self.game.start(name);
        self.next_act_in = self.action.reset();
        self.accumulator = 0.0;
        self.input = TickInput::default();
        self.phase = SessionPhase::Playing;
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            SessionPhase::Playing => {
                log::info!("Paused");
                SessionPhase::Paused
            }
            SessionPhase::Paused => {
                log::info!("Resumed");
                SessionPhase::Playing
            }
            other => other,
        };
    }

    /// Advance from a display timestamp in milliseconds.
    /// Returns the number of simulation steps taken.
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(time_ms);
        self.advance(dt)
    }

    /// Run as many fixed steps as `dt` covers, capped per frame
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.phase == SessionPhase::Paused {
            return 0;
        }
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.switch_layer = false;
        }
        substeps
    }

    fn step(&mut self) {
        tick(&mut self.game, &self.input, SIM_DT);

        if self.phase == SessionPhase::Playing {
            self.next_act_in -= SIM_DT;
            while self.next_act_in <= 0.0 {
                self.next_act_in += self.action.execute(&mut self.game);
            }
        }

        for event in self.game.drain_events() {
            self.handle(event);
        }
    }

    fn handle(&mut self, event: GameEvent) {
        match &event {
            GameEvent::ShipDestroyed {
                victim,
                by_player: true,
                ..
            } => {
                let points = points_for_kill(*victim, self.game.level);
                self.game.player_mut().score += points;
            }
            GameEvent::BossDefeated => {
                self.game.level += 1;
                self.next_act_in = self.action.reset();
                log::info!("Advancing to level {}", self.game.level);
            }
            GameEvent::PlayerDestroyed => {
                self.phase = SessionPhase::GameOver;
                self.game.stop();
                log::info!(
                    "Game over: {} scored {} at level {}",
                    self.game.player().name,
                    self.score(),
                    self.game.level
                );
            }
            _ => {}
        }
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Record the finished round on the board. Returns the rank achieved.
    pub fn submit_score(&self, scores: &mut HighScores) -> Option<usize> {
        if self.phase != SessionPhase::GameOver {
            return None;
        }
        let score = self.score();
        if !scores.is_new_score(score) {
            return None;
        }
        let rank = scores.add_score(&self.game.player().name, score);
        if let Some(rank) = rank {
            log::info!("New high score {score} at rank {rank}");
        }
        rank
    }
}
