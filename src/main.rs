//! Depth Raider entry point
//!
//! The browser build draws the field on a 2D canvas and drives the session
//! from `requestAnimationFrame`. The native build plays a seeded round on
//! autopilot and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use depth_raider::audio::{AudioManager, SoundEffect};
    use depth_raider::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use depth_raider::settings::SettingKey;
    use depth_raider::sim::{ActorTag, ActorView};
    use depth_raider::{HighScores, Session, SessionPhase, Settings};

    /// Arrow/WASD keys currently held
    #[derive(Default)]
    struct Held {
        left: bool,
        right: bool,
        up: bool,
        down: bool,
    }

    impl Held {
        fn axis(&self) -> Vec2 {
            let x = self.right as i32 - self.left as i32;
            let y = self.down as i32 - self.up as i32;
            Vec2::new(x as f32, y as f32)
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        ctx: CanvasRenderingContext2d,
        audio: AudioManager,
        settings: Settings,
        scores: HighScores,
        store: Box<dyn KeyValueStore>,
        held: Held,
        fire: bool,
        last_rank: Option<usize>,
        submitted: bool,
    }

    impl Game {
        fn start_round(&mut self) {
            self.audio.resume();
            self.session.start_round("PLAYER");
            self.submitted = false;
            self.last_rank = None;
            if !self.settings.flag(SettingKey::HasPlayed) {
                self.settings.set_flag(SettingKey::HasPlayed, true);
                if let Err(err) = self.settings.save(self.store.as_mut()) {
                    log::warn!("Settings not saved: {err}");
                }
            }
        }

        /// Flip a menu toggle, persist it and push it to the mixer
        fn toggle_setting(&mut self, key: SettingKey) {
            let on = self.settings.toggle(key);
            log::info!("{} {}", key.as_str(), if on { "on" } else { "off" });
            if let Err(err) = self.settings.save(self.store.as_mut()) {
                log::warn!("Settings not saved: {err}");
            }
            self.audio.apply_settings(&self.settings);
        }

        fn refresh_input(&mut self) {
            self.session.input.axis = self.held.axis();
            self.session.input.fire = self.fire;
        }

        fn key(&mut self, key: &str, down: bool) {
            match key {
                "ArrowLeft" | "a" | "A" => self.held.left = down,
                "ArrowRight" | "d" | "D" => self.held.right = down,
                "ArrowUp" | "w" | "W" => self.held.up = down,
                "ArrowDown" | "s" | "S" => self.held.down = down,
                " " => self.fire = down,
                "Shift" | "z" | "Z" if down => self.session.input.switch_layer = true,
                "Escape" | "p" | "P" if down => self.session.toggle_pause(),
                "m" | "M" if down => self.toggle_setting(SettingKey::SfxOn),
                "n" | "N" if down => self.toggle_setting(SettingKey::MusicOn),
                "Enter" if down => match self.session.phase() {
                    SessionPhase::Title | SessionPhase::GameOver => self.start_round(),
                    _ => {}
                },
                _ => {}
            }
            self.refresh_input();
        }

        fn update(&mut self, time: f64) {
            self.session.frame(time);

            for event in self.session.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }

            if self.session.phase() == SessionPhase::GameOver && !self.submitted {
                self.submitted = true;
                self.last_rank = self.session.submit_score(&mut self.scores);
                if self.last_rank.is_some() {
                    self.audio.play(SoundEffect::HighScore);
                    if let Err(err) = self.scores.save(self.store.as_mut()) {
                        log::warn!("High scores not saved: {err}");
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            let world = self.session.game.world;
            let ctx = &self.ctx;
            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str("#05060f");
            ctx.fill_rect(0.0, 0.0, world.width as f64, world.height as f64);

            // Far layer first so near actors draw on top
            let mut views = self.session.game.views();
            views.sort_by(|a, b| a.layer.total_cmp(&b.layer));
            for view in &views {
                draw_actor(ctx, view);
            }

            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str("#e0e6ff");
            ctx.set_font("16px monospace");
            let player = self.session.game.player();
            let hud = format!(
                "SCORE {:>8}   ENERGY {:>2}   LEVEL {}",
                player.score, player.ship.energy, self.session.level()
            );
            let _ = ctx.fill_text(&hud, 12.0, 22.0);

            let banner = match self.session.phase() {
                SessionPhase::Title => {
                    let best = self.scores.top_score().unwrap_or(0);
                    Some(format!("DEPTH RAIDER  -  ENTER TO START  -  BEST {best}"))
                }
                SessionPhase::Paused => Some("PAUSED".to_string()),
                SessionPhase::GameOver => Some(match self.last_rank {
                    Some(rank) => format!("GAME OVER  -  NEW HIGH SCORE #{rank}  -  ENTER"),
                    None => "GAME OVER  -  ENTER TO PLAY AGAIN".to_string(),
                }),
                SessionPhase::Playing => None,
            };
            if let Some(text) = banner {
                ctx.set_font("24px monospace");
                let _ = ctx.fill_text(&text, 40.0, world.height as f64 * 0.5);
            }
        }
    }

    fn draw_actor(ctx: &CanvasRenderingContext2d, view: &ActorView) {
        let color = match view.tag {
            ActorTag::Player => "#4fc3f7",
            ActorTag::Enemy => "#ef5350",
            ActorTag::Boss => "#ab47bc",
            ActorTag::Bullet if view.variant == 1 => "#fff176",
            ActorTag::Bullet => "#ff8a65",
            ActorTag::Powerup => "#66bb6a",
        };
        // Far layer is dimmer
        ctx.set_global_alpha(0.45 + 0.55 * view.layer as f64);
        ctx.set_fill_style_str(color);
        ctx.fill_rect(
            (view.x + view.offset_x) as f64,
            (view.y + view.offset_y) as f64,
            view.width as f64,
            view.height as f64,
        );
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Depth Raider starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let (width, height) = fit_canvas(&canvas);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let store: Box<dyn KeyValueStore> = match LocalStore::open() {
            Some(store) => Box::new(store),
            None => {
                log::warn!("LocalStorage unavailable, progress will not persist");
                Box::new(MemoryStore::new())
            }
        };
        let settings = Settings::load(store.as_ref());
        let scores = HighScores::load(store.as_ref());

        let seed = js_sys::Date::now() as u64;
        let mut session = Session::new(seed);
        session.game.set_world_size(width, height);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            ctx,
            audio: AudioManager::new(&settings),
            settings,
            scores,
            store,
            held: Held::default(),
            fire: false,
            last_rank: None,
            submitted: false,
        }));

        setup_keyboard(game.clone());
        setup_resize(game.clone(), canvas);
        setup_auto_pause(game.clone());
        request_animation_frame(game);

        log::info!("Depth Raider running!");
    }

    /// Match the drawing buffer to the displayed size; returns the world size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (f32, f32) {
        let width = canvas.client_width().max(320) as u32;
        let height = canvas.client_height().max(240) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width as f32, height as f32)
    }

    fn setup_resize(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&canvas);
            game.borrow_mut().session.game.set_world_size(width, height);
            log::info!("Resized to {width}x{height}");
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        for (kind, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == " " {
                    event.prevent_default();
                }
                game.borrow_mut().key(&event.key(), down);
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.phase() == SessionPhase::Playing {
                        g.session.toggle_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
                if g.session.phase() == SessionPhase::Playing {
                    g.session.toggle_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    log::info!("Depth Raider (native) autoplay, seed {seed}");

    let score = autoplay::run(seed, 60 * 60 * 3);
    println!("Autoplay finished: {score} points");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless round with a simple pilot, used as a smoke run
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use glam::Vec2;

    use depth_raider::consts::SIM_DT;
    use depth_raider::persistence::MemoryStore;
    use depth_raider::sim::{ActorTag, Layer};
    use depth_raider::{HighScores, Session, SessionPhase};

    /// Play up to `max_steps` ticks; returns the final score
    pub fn run(seed: u64, max_steps: u32) -> u64 {
        let mut session = Session::new(seed);
        session.start_round("AUTO");

        let mut steps = 0;
        while steps < max_steps && session.phase() == SessionPhase::Playing {
            steer(&mut session);
            session.advance(SIM_DT);
            session.drain_events();
            steps += 1;
        }
        log::info!(
            "Stopped after {:.1}s in {:?} at level {}",
            steps as f32 * SIM_DT,
            session.phase(),
            session.level()
        );

        let mut store = MemoryStore::new();
        let mut scores = HighScores::load(&store);
        if let Some(rank) = session.submit_score(&mut scores) {
            log::info!("Autopilot placed #{rank}");
            if let Err(err) = scores.save(&mut store) {
                log::warn!("High scores not saved: {err}");
            }
        }
        session.score()
    }

    /// Chase the lowest hostile on screen and match its layer
    fn steer(session: &mut Session) {
        let game = &session.game;
        let Some(me) = game.actor(game.player_id()) else {
            return;
        };
        let center = me.body.center();
        let target = game
            .views()
            .into_iter()
            .filter(|v| matches!(v.tag, ActorTag::Enemy | ActorTag::Boss) && v.y > 0.0)
            .max_by(|a, b| a.y.total_cmp(&b.y));

        let mut axis = Vec2::ZERO;
        let mut switch = false;
        if let Some(target) = target {
            let dx = target.x + target.width * 0.5 - center.x;
            if dx.abs() > 8.0 {
                axis.x = dx.signum();
            }
            let layer = if target.layer >= 0.5 { Layer::Near } else { Layer::Far };
            switch = layer != me.body.layer && !me.body.is_switching();
        }
        session.input.axis = axis;
        session.input.fire = true;
        session.input.switch_layer = switch;
    }
}
