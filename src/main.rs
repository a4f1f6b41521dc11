//! Tug of RPS entry point
//!
//! Handles platform-specific initialization and runs the demo loop. The
//! interactive build targets the browser; the native binary runs a headless
//! session of the selected demo and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use tug_of_rps::consts::*;
    use tug_of_rps::demos::{self, DemoKind, PolygonDemo, SketchPad, sketch};
    use tug_of_rps::display::StatusDisplay;
    use tug_of_rps::renderer::shapes::ShadeStyle;
    use tug_of_rps::renderer::{GfxError, WgpuDevice, dispatch_scene};
    use tug_of_rps::sim::{self, GamePhase, HeldKeys, PlayerAction, SceneState, TickInput};
    use tug_of_rps::{Settings, Tally};

    /// Writes status lines into the page's text elements
    struct DomDisplay {
        hands: Option<Element>,
        score: Option<Element>,
    }

    impl DomDisplay {
        fn new(document: &web_sys::Document) -> Self {
            Self {
                hands: document.get_element_by_id("handsPlayed"),
                score: document.get_element_by_id("Scoreboard"),
            }
        }
    }

    impl StatusDisplay for DomDisplay {
        fn set_hands(&mut self, text: &str) {
            if let Some(el) = &self.hands {
                el.set_text_content(Some(text));
            }
        }

        fn set_score(&mut self, text: &str) {
            if let Some(el) = &self.score {
                el.set_text_content(Some(text));
            }
        }
    }

    /// Everything the frame loop touches
    struct App {
        demo: DemoKind,
        scene: SceneState,
        pad: SketchPad,
        polygon: PolygonDemo,
        /// Frozen star draw; re-rolled on every star press
        star: Option<Pcg32>,
        star_presses: u64,
        device: Option<WgpuDevice>,
        display: DomDisplay,
        settings: Settings,
        tally: Tally,
        held: HeldKeys,
        queued: Vec<PlayerAction>,
        accumulator: f32,
        last_time: f64,
        was_terminal: bool,
        canvas_size: (f32, f32),
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(demo: DemoKind, seed: u64, settings: Settings, display: DomDisplay) -> Self {
            Self {
                demo,
                scene: demos::build_scene(demo, seed),
                pad: SketchPad::new(),
                polygon: PolygonDemo::new(settings.shade_intensity),
                star: None,
                star_presses: 0,
                device: None,
                display,
                settings,
                tally: Tally::load(),
                held: HeldKeys::default(),
                queued: Vec::new(),
                accumulator: 0.0,
                last_time: 0.0,
                was_terminal: false,
                canvas_size: (0.0, 0.0),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Drain queued actions, then run fixed-step simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            for action in self.queued.drain(..).collect::<Vec<_>>() {
                if sim::resolve(&mut self.scene, action, &mut self.display).is_some() {
                    self.tally.record_round();
                }
            }

            let dt = dt.min(0.1);
            self.accumulator += dt;
            let input = TickInput { held: self.held };
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                sim::tick(&mut self.scene, &input, SIM_DT, &mut self.display);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            // Record the match result once, when the terminal state appears
            if let GamePhase::GameOver { winner } = self.scene.phase {
                if !self.was_terminal {
                    self.tally.record_match(winner);
                    self.tally.save();
                    self.was_terminal = true;
                }
            }

            self.track_fps(time);
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Record and submit this frame's draws
        fn render(&mut self) {
            let Some(device) = self.device.as_mut() else {
                return;
            };
            device.begin_frame();

            match self.demo {
                DemoKind::Sketch => self.pad.draw(device),
                DemoKind::Polygon => {
                    if let Some(star_rng) = &self.star {
                        let mut rng = star_rng.clone();
                        self.polygon.draw_star(&mut rng, device);
                    } else {
                        self.polygon.draw(device);
                    }
                }
                _ => {
                    let vp = demos::scene_view_proj(self.demo, &self.scene, device.aspect());
                    dispatch_scene(&self.scene, vp, device);
                }
            }

            match device.render() {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = device.size;
                    device.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of memory!"),
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn update_hud(&self) {
            if !self.settings.show_fps {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("fps") {
                el.set_text_content(Some(&self.fps.to_string()));
            }
        }

        /// Read the brush/intensity input fields, as the update button does
        fn read_inputs(&mut self, document: &web_sys::Document) {
            let read = |id: &str| -> Option<f32> {
                document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .and_then(|input| input.value().parse().ok())
            };
            if let Some(v) = read("red") {
                self.settings.brush.r = v;
            }
            if let Some(v) = read("green") {
                self.settings.brush.g = v;
            }
            if let Some(v) = read("blue") {
                self.settings.brush.b = v;
            }
            if let Some(v) = read("pointSize") {
                self.settings.brush.size = v;
            }
            if let Some(v) = read("intensity") {
                self.settings.shade_intensity = v;
                self.polygon.set_intensity(v);
            }
            self.settings.save();
        }

        /// Canvas click: place a brush point (sketch demo only)
        fn on_canvas_click(&mut self, px: f32, py: f32) {
            if self.demo != DemoKind::Sketch {
                return;
            }
            let (w, h) = self.canvas_size;
            let (x, y) = sketch::canvas_to_ndc(px, py, w, h);
            // Brush size is in pixels; the pad works in clip space
            let size = self.settings.brush.size / h * 2.0;
            self.pad.place(x, y, self.settings.brush.color(), size);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tug of RPS starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("webgl")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let demo = window
            .location()
            .hash()
            .ok()
            .and_then(|hash| DemoKind::from_name(hash.trim_start_matches('#')))
            .unwrap_or(settings.demo);
        let seed = js_sys::Date::now() as u64;

        let display = DomDisplay::new(&document);
        let app = Rc::new(RefCell::new(App::new(demo, seed, settings, display)));
        app.borrow_mut().canvas_size = (client_w as f32, client_h as f32);

        log::info!("Demo '{}' with seed {}", demo.name(), seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");
        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("{} ({:?}), cannot start", GfxError::AdapterUnavailable, e);
                return;
            }
        };

        match WgpuDevice::new(surface, &adapter, width, height).await {
            Ok(mut device) => {
                device.set_clear_color(demo.clear_color());
                app.borrow_mut().device = Some(device);
            }
            Err(e) => {
                log::error!("renderer init failed, cannot start: {}", e);
                return;
            }
        }

        setup_buttons(&document, app.clone());
        setup_keyboard(app.clone());
        setup_canvas_click(&canvas, app.clone());

        request_animation_frame(app);
        log::info!("Tug of RPS running!");
    }

    fn on_click(document: &web_sys::Document, id: &str, app: Rc<RefCell<App>>, f: fn(&mut App)) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                f(&mut app.borrow_mut());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        // Tug hands
        on_click(document, "rock_btn", app.clone(), |app| {
            app.queued.push(PlayerAction::ChooseRock);
        });
        on_click(document, "paper_btn", app.clone(), |app| {
            app.queued.push(PlayerAction::ChoosePaper);
        });
        on_click(document, "scissor_btn", app.clone(), |app| {
            app.queued.push(PlayerAction::ChooseScissors);
        });

        // Polygon fan controls
        on_click(document, "inc_btn", app.clone(), |app| {
            app.polygon.increment_sides();
            app.star = None;
        });
        on_click(document, "dec_btn", app.clone(), |app| {
            app.polygon.decrement_sides();
            app.star = None;
        });
        on_click(document, "mid_btn", app.clone(), |app| {
            app.polygon.set_style(ShadeStyle::Mid);
            app.star = None;
        });
        on_click(document, "top_btn", app.clone(), |app| {
            app.polygon.set_style(ShadeStyle::Top);
            app.star = None;
        });
        on_click(document, "reset_btn", app.clone(), |app| {
            app.polygon.reset();
            app.star = None;
        });
        on_click(document, "app_1_btn", app.clone(), |app| {
            app.polygon.reset();
            app.star = None;
        });
        on_click(document, "app_2_btn", app.clone(), |app| {
            // New random star on every press, stable across frames
            app.star_presses += 1;
            app.star = Some(Pcg32::seed_from_u64(
                app.scene.seed.wrapping_add(app.star_presses),
            ));
        });

        // Brush/intensity update
        {
            let app = app.clone();
            if let Some(btn) = document.get_element_by_id("update_btn") {
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                        app.borrow_mut().read_inputs(&document);
                    }
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut app = app.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => app.held.turn_left = true,
                    "ArrowRight" => app.held.turn_right = true,
                    "ArrowUp" => app.held.forward = true,
                    "ArrowDown" => app.held.backward = true,
                    "y" | "Y" => app.held.yaw_base = true,
                    "w" | "W" => {
                        if !event.repeat() {
                            app.queued.push(PlayerAction::ToggleFan);
                        }
                    }
                    "1" => app.queued.push(PlayerAction::ToggleLight(0)),
                    "2" => app.queued.push(PlayerAction::ToggleLight(1)),
                    "Enter" => app.queued.push(PlayerAction::AcknowledgeResult),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut app = app.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => app.held.turn_left = false,
                    "ArrowRight" => app.held.turn_right = false,
                    "ArrowUp" => app.held.forward = false,
                    "ArrowDown" => app.held.backward = false,
                    "y" | "Y" => app.held.yaw_base = false,
                    _ => {}
                }
            });
            let window = web_sys::window().expect("no window");
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_canvas_click(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let rect = canvas_clone.get_bounding_client_rect();
            let x = event.client_x() as f32 - rect.left() as f32;
            let y = event.client_y() as f32 - rect.top() as f32;
            let mut app = app.borrow_mut();
            let w = canvas_clone.client_width() as f32;
            let h = canvas_clone.client_height() as f32;
            app.canvas_size = (w, h);
            app.on_canvas_click(x, y);
        });
        let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            frame(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt, time);
            a.render();
            a.update_hud();
        }
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tug_of_rps::demos::DemoKind;

    env_logger::init();

    let demo = std::env::args()
        .nth(1)
        .and_then(|name| DemoKind::from_name(&name))
        .unwrap_or(DemoKind::Tug);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    log::info!("Tug of RPS (native, headless) starting: demo '{}'", demo.name());

    match demo {
        DemoKind::Tug | DemoKind::TugTextured => headless::tug_match(demo, seed),
        DemoKind::Landscape => headless::landscape_walk(seed),
        DemoKind::Lighting => headless::lighting_toggles(seed),
        DemoKind::Polygon => headless::polygon_sweep(),
        DemoKind::Sketch => headless::sketch_info(),
    }
}

/// Headless demo runs for the native binary. The browser build is the
/// interactive one; these exercise the same sim and log the outcome.
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use tug_of_rps::Tally;
    use tug_of_rps::consts::*;
    use tug_of_rps::demos::{self, DemoKind};
    use tug_of_rps::display::LogDisplay;
    use tug_of_rps::sim::{self, GamePhase, HeldKeys, PlayerAction, TickInput};

    /// Play a full match with random player hands until game over
    pub fn tug_match(demo: DemoKind, seed: u64) {
        let mut scene = demos::build_scene(demo, seed);
        let mut display = LogDisplay;
        let mut tally = Tally::load();
        let mut rng = Pcg32::seed_from_u64(seed.rotate_left(17));
        let input = TickInput::default();

        // Ties never move the score, so bound the session
        for _ in 0..500 {
            let action = match rng.random_range(0..3u8) {
                0 => PlayerAction::ChooseRock,
                1 => PlayerAction::ChoosePaper,
                _ => PlayerAction::ChooseScissors,
            };
            if sim::resolve(&mut scene, action, &mut display).is_some() {
                tally.record_round();
            }
            for _ in 0..=ROUND_TICKS {
                sim::tick(&mut scene, &input, SIM_DT, &mut display);
            }
            if let GamePhase::GameOver { winner } = scene.phase {
                tally.record_match(winner);
                tally.save();
                log::info!(
                    "match finished after {} rounds ({})",
                    scene.rounds_played,
                    winner.banner()
                );
                return;
            }
        }
        log::warn!("move budget exhausted without a winner");
    }

    /// Hold the turn and move keys for a moment and report the camera
    pub fn landscape_walk(seed: u64) {
        let mut scene = demos::build_scene(DemoKind::Landscape, seed);
        let mut display = LogDisplay;

        let turning = TickInput {
            held: HeldKeys {
                turn_left: true,
                ..Default::default()
            },
        };
        for _ in 0..120 {
            sim::tick(&mut scene, &turning, SIM_DT, &mut display);
        }
        let walking = TickInput {
            held: HeldKeys {
                forward: true,
                ..Default::default()
            },
        };
        for _ in 0..240 {
            sim::tick(&mut scene, &walking, SIM_DT, &mut display);
        }

        log::info!(
            "camera angle {:.1} at ({:.2}, {:.2}), fan at {:.1}",
            scene.camera.angle,
            scene.camera.eye.x,
            scene.camera.eye.z,
            scene.windmill.fan_angle
        );
    }

    /// Toggle the point lights and report the marker scales
    pub fn lighting_toggles(seed: u64) {
        let mut scene = demos::build_scene(DemoKind::Lighting, seed);
        let mut display = LogDisplay;

        sim::resolve(&mut scene, PlayerAction::ToggleLight(0), &mut display);
        for _ in 0..60 {
            sim::tick(&mut scene, &TickInput::default(), SIM_DT, &mut display);
        }
        log::info!("lights now {:?}", scene.lights);
    }

    /// Walk the fan through a few side counts and log the shade ramp
    pub fn polygon_sweep() {
        use tug_of_rps::renderer::shapes::{ShadeStyle, fan_slices};

        for sides in [3u32, 6, 12] {
            match fan_slices(sides, 0.5, 1.0, ShadeStyle::Mid) {
                Ok(slices) => log::info!(
                    "{} sides: {} slices, red {:.2} down to {:.2}",
                    sides,
                    slices.len(),
                    slices.first().map(|s| s.color[0]).unwrap_or(0.0),
                    slices.last().map(|s| s.color[0]).unwrap_or(0.0)
                ),
                Err(err) => log::warn!("{}", err),
            }
        }
    }

    pub fn sketch_info() {
        log::info!("the sketch pad is interactive; run the web build for it");
    }
}
