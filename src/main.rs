//! Jump entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use jump::Settings;
    use jump::consts::*;
    use jump::game::Game;
    use jump::input::InputDevice;
    use jump::renderer::{RenderState, ShapeBatch};

    /// Keys currently held, fed by DOM keyboard events
    #[derive(Default)]
    struct Keyboard {
        held: HashSet<String>,
        quit: bool,
    }

    /// One gamepad as read at the start of a frame
    struct Pad {
        buttons: Vec<bool>,
        axes: Vec<f64>,
    }

    /// Input hardware state for one frame
    struct BrowserInput<'a> {
        keyboard: &'a Keyboard,
        pads: Vec<Option<Pad>>,
    }

    impl<'a> BrowserInput<'a> {
        fn poll(keyboard: &'a Keyboard) -> Self {
            Self {
                keyboard,
                pads: read_gamepads(),
            }
        }

        fn pad(&self, joystick: usize) -> Option<&Pad> {
            self.pads.get(joystick).and_then(Option::as_ref)
        }
    }

    impl InputDevice for BrowserInput<'_> {
        fn is_key_down(&self, code: &str) -> bool {
            self.keyboard.held.contains(code)
        }

        fn joystick_button(&self, joystick: usize, button: usize) -> bool {
            self.pad(joystick)
                .and_then(|pad| pad.buttons.get(button).copied())
                .unwrap_or(false)
        }

        fn joystick_axis(&self, joystick: usize, axis: usize) -> i16 {
            self.pad(joystick)
                .and_then(|pad| pad.axes.get(axis).copied())
                .map(|value| (value.clamp(-1.0, 1.0) * i16::MAX as f64) as i16)
                .unwrap_or(0)
        }

        fn quit_requested(&self) -> bool {
            self.keyboard.quit
        }
    }

    /// Snapshot connected gamepads, indexed like `navigator.getGamepads()`
    fn read_gamepads() -> Vec<Option<Pad>> {
        let Some(pads) = web_sys::window().and_then(|w| w.navigator().get_gamepads().ok()) else {
            return Vec::new();
        };
        pads.iter()
            .map(|value| {
                let gamepad = value.dyn_into::<web_sys::Gamepad>().ok()?;
                let buttons = gamepad
                    .buttons()
                    .iter()
                    .map(|b| {
                        b.dyn_into::<web_sys::GamepadButton>()
                            .map(|b| b.pressed())
                            .unwrap_or(false)
                    })
                    .collect();
                let axes = gamepad
                    .axes()
                    .iter()
                    .map(|a| a.as_f64().unwrap_or(0.0))
                    .collect();
                Some(Pad { buttons, axes })
            })
            .collect()
    }

    /// Browser-side game instance
    struct App {
        game: Game,
        batch: ShapeBatch,
        render_state: Option<RenderState>,
        keyboard: Rc<RefCell<Keyboard>>,
        accumulator: f32,
        last_time: f64,
        running: bool,
    }

    impl App {
        fn new(settings: &Settings) -> Self {
            Self {
                game: Game::new(settings.input_manager()),
                batch: ShapeBatch::new(settings.screen_width, settings.screen_height),
                render_state: None,
                keyboard: Rc::new(RefCell::new(Keyboard::default())),
                accumulator: 0.0,
                last_time: 0.0,
                running: true,
            }
        }

        /// Run as many fixed frames as the elapsed time allows
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let keyboard = self.keyboard.borrow();
                let device = BrowserInput::poll(&keyboard);
                self.running = self.game.frame(&mut self.batch, &device);
                self.accumulator -= SIM_DT;
                substeps += 1;

                if !self.running {
                    log::info!("Game finished after {} frames", self.batch.frames());
                    break;
                }
            }
        }

        /// Upload the last presented frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.batch.presented()) {
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
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Jump starting...");

        let settings = Settings::load();

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Integer scale of the virtual screen keeps pixels square
        let scale = settings.window_scale.max(1);
        let width = settings.screen_width.max(1) as u32 * scale;
        let height = settings.screen_height.max(1) as u32 * scale;
        canvas.set_width(width);
        canvas.set_height(height);

        let app = Rc::new(RefCell::new(App::new(&settings)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

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
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let screen_size = (settings.screen_width, settings.screen_height);
        match RenderState::new(surface, &adapter, width, height, screen_size).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        let keyboard = Rc::clone(&app.borrow().keyboard);
        setup_keyboard(keyboard);

        request_animation_frame(app);
        log::info!("Jump running!");
    }

    fn setup_keyboard(keyboard: Rc<RefCell<Keyboard>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let keyboard = keyboard.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if code.starts_with("Arrow") {
                    event.prevent_default();
                }
                let mut keyboard = keyboard.borrow_mut();
                if code == "Escape" {
                    keyboard.quit = true;
                }
                keyboard.held.insert(code);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                keyboard.borrow_mut().held.remove(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let running = {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.render();
            a.running
        };

        if running {
            request_animation_frame(app);
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
    use jump::Settings;
    use jump::game::Game;
    use jump::renderer::ShapeBatch;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Jump (native) starting...");
    log::info!("Native mode runs a scripted headless session; build for wasm32 to play");

    let settings = Settings::load();
    let mut game = Game::new(settings.input_manager());
    let mut batch = ShapeBatch::new(settings.screen_width, settings.screen_height);

    let mut frames = 0;
    for frame in 0..settings.headless_frames {
        let device = headless::Script::at(frame);
        frames += 1;
        if !game.frame(&mut batch, &device) {
            break;
        }
    }

    log::info!(
        "Ran {} frames, presented {}, last frame had {} vertices, state {:?}",
        frames,
        batch.frames(),
        batch.presented().len(),
        game.states().current()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use jump::input::InputDevice;

    /// Scripted keyboard: run right, jumping for a third of every 1.5 seconds
    pub struct Script {
        frame: u32,
    }

    impl Script {
        pub fn at(frame: u32) -> Self {
            Self { frame }
        }
    }

    impl InputDevice for Script {
        fn is_key_down(&self, code: &str) -> bool {
            match code {
                "ArrowRight" | "KeyZ" => true,
                "KeyX" => self.frame % 90 < 30,
                _ => false,
            }
        }

        fn joystick_button(&self, _joystick: usize, _button: usize) -> bool {
            false
        }

        fn joystick_axis(&self, _joystick: usize, _axis: usize) -> i16 {
            0
        }

        fn quit_requested(&self) -> bool {
            false
        }
    }
}
