//! Gloomcrawl entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use glam::Vec2;
    use gloomcrawl::Tuning;
    use gloomcrawl::consts::*;
    use gloomcrawl::renderer::DungeonRenderState;
    use gloomcrawl::sim::{GameState, InputSnapshot, SimPhase, tick};

    /// Keys currently held, sampled into an InputSnapshot each substep
    #[derive(Default)]
    struct HeldInput {
        forward: bool,
        back: bool,
        left: bool,
        right: bool,
        sprint: bool,
        interact: bool,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<DungeonRenderState>,
        accumulator: f32,
        last_time: f64,
        held: HeldInput,
        // One-shot inputs, consumed by the first substep of the next frame
        attack_queued: bool,
        jump_queued: bool,
        // Frontend pause; the sim itself only knows Running and GameOver
        paused: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    /// Build a state from tuning, falling back to defaults when stored
    /// tuning has been hand-edited into something the generator rejects
    fn fresh_state(seed: u64, tuning: Tuning) -> GameState {
        GameState::new(seed, tuning).unwrap_or_else(|e| {
            log::warn!("Rejected stored tuning ({}), using defaults", e);
            GameState::new(seed, Tuning::default()).expect("default tuning is valid")
        })
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            Self {
                state: fresh_state(seed, tuning),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                held: HeldInput::default(),
                attack_queued: false,
                jump_queued: false,
                paused: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Sample held keys into the sim's input form
        fn snapshot(&self) -> InputSnapshot {
            let mut dir = Vec2::ZERO;
            if self.held.forward {
                dir.y += 1.0;
            }
            if self.held.back {
                dir.y -= 1.0;
            }
            if self.held.right {
                dir.x += 1.0;
            }
            if self.held.left {
                dir.x -= 1.0;
            }
            if dir != Vec2::ZERO {
                dir = dir.normalize();
            }
            InputSnapshot {
                move_dir: dir,
                attack: self.attack_queued,
                jump: self.jump_queued,
                sprint: self.held.sprint,
                interact: self.held.interact,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);

            if !self.paused {
                self.accumulator += dt;

                let mut substeps = 0;
                while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                    let input = self.snapshot();
                    tick(&mut self.state, &input, SIM_DT);
                    self.accumulator -= SIM_DT;
                    substeps += 1;

                    // Clear one-shot inputs after processing
                    self.attack_queued = false;
                    self.jump_queued = false;
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_idx = self.frame_index;
            let oldest_time = self.frame_times[oldest_idx];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            let hud = self.state.hud();

            // Update health
            if let Some(el) = document.query_selector("#hud-health .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.health.max(0).to_string()));
            }

            // Update dungeon level
            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.level.to_string()));
            }

            // Update enemies remaining
            if let Some(el) = document
                .query_selector("#hud-enemies .hud-value")
                .ok()
                .flatten()
            {
                let live = self.state.live_enemies().count();
                let total = self.state.enemies.len();
                el.set_text_content(Some(&format!("{}/{}", live, total)));
            }

            // Update FPS
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }

            // Show/hide pause menu
            if let Some(el) = document.get_element_by_id("pause-menu") {
                if self.paused {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == SimPhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    // Update final stats
                    if let Some(level_el) = document.get_element_by_id("final-level") {
                        level_el.set_text_content(Some(&hud.level.to_string()));
                    }
                    if let Some(time_el) = document.get_element_by_id("final-time") {
                        time_el.set_text_content(Some(&format!("{:.1}s", self.state.elapsed)));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Reset game state for restart, keeping the current tuning
        fn restart(&mut self, seed: u64) {
            let tuning = self.state.tuning.clone();
            self.state = fresh_state(seed, tuning);
            self.accumulator = 0.0;
            self.attack_queued = false;
            self.jump_queued = false;
            self.paused = false;
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Gloomcrawl starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let tuning = Tuning::load();
        let game = Rc::new(RefCell::new(Game::new(seed, tuning)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = DungeonRenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        // Set up input handlers
        setup_input_handlers(&canvas, game.clone());

        // Set up restart button
        setup_restart_button(game.clone());

        // Set up pause menu buttons
        setup_pause_menu(game.clone());

        // Set up auto-pause on visibility change
        setup_auto_pause(game.clone());

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Gloomcrawl running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keydown - movement is held state, jump/attack are one-shot edges
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "w" | "W" | "ArrowUp" => g.held.forward = true,
                    "s" | "S" | "ArrowDown" => g.held.back = true,
                    "a" | "A" | "ArrowLeft" => g.held.left = true,
                    "d" | "D" | "ArrowRight" => g.held.right = true,
                    "Shift" => g.held.sprint = true,
                    "e" | "E" => g.held.interact = true,
                    " " => {
                        if !event.repeat() {
                            g.jump_queued = true;
                        }
                    }
                    "f" | "F" => {
                        if !event.repeat() {
                            g.attack_queued = true;
                        }
                    }
                    "Escape" => {
                        g.paused = !g.paused;
                        g.accumulator = 0.0;
                        log::info!("Paused: {}", g.paused);
                    }
                    "r" | "R" => {
                        let seed = js_sys::Date::now() as u64;
                        g.restart(seed);
                        log::info!("Game restarted with seed: {}", seed);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyup
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "w" | "W" | "ArrowUp" => g.held.forward = false,
                    "s" | "S" | "ArrowDown" => g.held.back = false,
                    "a" | "A" | "ArrowLeft" => g.held.left = false,
                    "d" | "D" | "ArrowRight" => g.held.right = false,
                    "Shift" => g.held.sprint = false,
                    "e" | "E" => g.held.interact = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - melee swing
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().attack_queued = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                g.restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pause_menu(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Resume button
        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.paused = false;
                g.accumulator = 0.0;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == SimPhase::Running && !g.paused {
                        g.paused = true;
                        g.accumulator = 0.0;
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
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == SimPhase::Running && !g.paused {
                    g.paused = true;
                    g.accumulator = 0.0;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gloomcrawl (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Run a short scripted session
    println!("\nRunning headless demo...");
    demo_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_run() {
    use glam::Vec2;
    use gloomcrawl::Tuning;
    use gloomcrawl::consts::SIM_DT;
    use gloomcrawl::sim::{GameState, InputSnapshot, SimPhase, tick};

    let mut state = GameState::new(7, Tuning::default()).expect("default tuning is valid");
    let spawn = state.player.actor.position;

    // Walk forward and swing on cooldown for ten simulated seconds
    let input = InputSnapshot {
        move_dir: Vec2::new(0.0, 1.0),
        attack: true,
        ..Default::default()
    };
    let steps = (10.0 / SIM_DT) as u32;
    for _ in 0..steps {
        if state.phase == SimPhase::GameOver {
            break;
        }
        tick(&mut state, &input, SIM_DT);
    }

    let hud = state.hud();
    println!(
        "after {:.1}s: health {}, {} of {} enemies alive, moved {:.1} units",
        state.elapsed,
        hud.health,
        state.live_enemies().count(),
        state.enemies.len(),
        (state.player.actor.position - spawn).length(),
    );
    assert!(state.time_ticks > 0, "sim should advance");
    println!("✓ Headless demo completed!");
}
