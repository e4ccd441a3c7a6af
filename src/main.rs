//! Flap Shop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use flap_shop::app::{App, Key, Screen};
    use flap_shop::consts::SIM_DT;
    use flap_shop::platform::web::{LocalStorageStore, VideoFrames, load_assets};
    use flap_shop::renderer::{self, RenderState, Viewport};
    use flap_shop::variants::Variant;
    use flap_shop::{Settings, audio};

    /// Game instance holding all state
    struct Game {
        app: App,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(app: App, canvas: HtmlCanvasElement) -> Self {
            Self {
                app,
                render_state: None,
                canvas,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Canvas CSS pixel -> logical screen point
        fn to_game(&self, x: f32, y: f32) -> Vec2 {
            let vp = Viewport::new(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            );
            vp.to_game(Vec2::new(x, y))
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            self.app.update(dt);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let scene = renderer::build(&self.app);
            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(&scene) {
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
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let screen = self.app.screen();
            let progress = self.app.progress();

            set_visible(&document, "menu-overlay", matches!(screen, Screen::Menu));
            set_visible(&document, "shop-overlay", matches!(screen, Screen::Shop));
            set_visible(&document, "capture-overlay", matches!(screen, Screen::Capture));
            set_visible(&document, "hud", matches!(screen, Screen::Play(_)));

            set_text(&document, "#menu-coins", &format!("₹ {}", progress.coins()));
            set_text(&document, "#shop-wallet", &format!("WALLET: ₹{}", progress.coins()));
            set_text(&document, "#hud-fps .hud-value", &self.fps.to_string());
            set_visible(&document, "hud-fps", self.app.settings().show_fps);

            if matches!(screen, Screen::Shop) {
                for variant in Variant::ALL {
                    let i = variant.index();
                    let status = if progress.is_unlocked(variant) {
                        "Owned".to_string()
                    } else {
                        format!("₹{} Coins", variant.price())
                    };
                    let button = if progress.is_equipped(variant) {
                        "EQUIPPED"
                    } else if progress.is_unlocked(variant) {
                        "EQUIP"
                    } else {
                        "ADD"
                    };
                    set_text(&document, &format!("#card-{} .card-name", i), variant.name());
                    set_text(&document, &format!("#card-{} .card-status", i), &status);
                    set_text(&document, &format!("#card-{} .card-button", i), button);
                }
            }

            let controller = self.app.controller();
            if let Some(session) = self.app.session() {
                set_text(&document, "#hud-score .hud-value", &session.score.to_string());
                set_text(&document, "#final-score", &format!("Score: {}", session.score));
                set_text(
                    &document,
                    "#final-coins",
                    &format!("Earned: ₹{}", session.coins_earned),
                );
            }
            set_visible(
                &document,
                "game-over",
                controller.is_some_and(|c| c.is_terminal()),
            );
            set_visible(
                &document,
                "autopilot-badge",
                controller.is_some_and(|c| c.autopilot()),
            );
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn size_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Flap Shop starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;
        let (width, height) = size_canvas(&canvas);

        let settings = Settings::load();
        let mut assets = load_assets("assets").await;
        audio::register_tones(&mut assets);

        let mut app = App::new(
            Box::new(LocalStorageStore::default()),
            Box::new(assets),
            settings,
        );
        if app.settings().background_feed {
            if let Some(feed) = VideoFrames::looping("assets/background.mp4", 400, 600) {
                app = app.with_background_feed(Box::new(feed));
            }
        }
        if let Some(camera) = VideoFrames::camera(400, 600) {
            app = app.with_camera(Box::new(camera));
        }

        let game = Rc::new(RefCell::new(Game::new(app, canvas.clone())));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| format!("Failed to create surface: {}", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("Failed to get adapter: {}", e))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| format!("Failed to create device: {}", e))?;
        game.borrow_mut().render_state = Some(render_state);

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Flap Shop running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let point = g.to_game(event.offset_x() as f32, event.offset_y() as f32);
                g.app.click(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let mut g = game.borrow_mut();
                    let point = g.to_game(x, y);
                    g.app.click(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = match event.key().as_str() {
                    " " => Key::Space,
                    "Escape" => Key::Escape,
                    "a" | "A" => Key::A,
                    "m" | "M" => Key::M,
                    "f" | "F" => Key::F,
                    "b" | "B" => Key::B,
                    _ => return,
                };
                if key == Key::Space {
                    event.prevent_default();
                }
                game.borrow_mut().app.key(key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            let (w, h) = size_canvas(&g.canvas);
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(w, h);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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
            if g.app.take_settings_changed() {
                g.app.settings().save();
            }
            g.render();
            g.update_hud();

            if g.app.should_quit() {
                log::info!("Stopped");
                return;
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flap Shop (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` to play");

    let summary = demo::run(std::path::Path::new("assets"));
    println!(
        "Autopilot demo: score {}, {} coins picked up, {} ticks ({:.1} s)",
        summary.score,
        summary.coins,
        summary.ticks,
        summary.ticks as f32 * flap_shop::consts::SIM_DT
    );
    println!("Saved balance untouched: {} coins", summary.saved_coins);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::Path;

    use flap_shop::app::{App, Command};
    use flap_shop::consts::SIM_DT;
    use flap_shop::persistence::{MemoryStore, ProgressStore};
    use flap_shop::platform::native::{JsonFileStore, load_assets, load_frame_sequence};
    use flap_shop::{Settings, renderer};

    /// Longest demo run (simulated seconds)
    const MAX_SECONDS: u64 = 120;

    pub struct Summary {
        pub score: u32,
        pub coins: u32,
        pub ticks: u64,
        pub saved_coins: u32,
    }

    /// Play one autopilot session against a copy of the saved progress
    pub fn run(asset_dir: &Path) -> Summary {
        let settings = Settings::load();
        let saved = JsonFileStore::in_data_dir().load();

        // Demo coins go to a scratch store, never the real save
        let mut scratch = MemoryStore::new();
        let _ = scratch.save(&saved);

        let mut app = App::new(
            Box::new(scratch),
            Box::new(load_assets(asset_dir)),
            settings,
        );
        if let Some(feed) = load_frame_sequence(&asset_dir.join("background_frames")) {
            app = app.with_background_feed(Box::new(feed));
        }

        app.handle(Command::Start);
        app.handle(Command::ToggleAutopilot);

        let max_ticks = MAX_SECONDS * 60;
        for tick in 0..max_ticks {
            app.update(SIM_DT);
            if tick % 600 == 0 {
                let scene = renderer::build(&app);
                log::debug!("Frame {}: {} vertices", tick, scene.vertex_count());
            }
            if app.controller().is_some_and(|c| c.is_terminal()) {
                break;
            }
        }

        let session = app.session();
        Summary {
            score: session.map_or(0, |s| s.score),
            coins: session.map_or(0, |s| s.coins_earned),
            ticks: session.map_or(0, |s| s.time_ticks),
            saved_coins: saved.coins(),
        }
    }
}
