//! Rope Swing entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use rope_swing::audio::WebAudio;
    use rope_swing::consts::NOMINAL_DT;
    use rope_swing::renderer::{RenderState, ShapeBatch};
    use rope_swing::{RopeApp, Settings};

    /// Everything the browser callbacks share
    struct Host {
        app: RopeApp<WebAudio>,
        batch: ShapeBatch,
        render_state: Option<RenderState>,
        last_time: f64,
        /// Canvas units per CSS pixel
        pointer_scale: Vec2,
    }

    impl Host {
        fn new(app: RopeApp<WebAudio>) -> Self {
            let mut batch = ShapeBatch::new();
            app.initialize(&mut batch);
            Self {
                app,
                batch,
                render_state: None,
                last_time: 0.0,
                pointer_scale: Vec2::ONE,
            }
        }

        fn set_client_size(&mut self, w: f32, h: f32) {
            if w > 0.0 && h > 0.0 {
                let settings = self.app.settings();
                self.pointer_scale = Vec2::new(settings.width / w, settings.height / h);
            }
        }

        fn pointer_moved(&mut self, x: f32, y: f32) {
            let p = Vec2::new(x, y) * self.pointer_scale;
            if let Err(e) = self.app.on_pointer_move(p.x, p.y) {
                log::warn!("Rejected pointer position: {}", e);
            }
        }

        fn pointer_pressed(&mut self) {
            self.app.audio().resume();
            if self.app.on_pointer_down() {
                set_hidden("start-prompt", true);
            }
        }

        /// Advance and draw one frame
        fn frame(&mut self, dt: f32) {
            if let Err(e) = self.app.frame(dt, &mut self.batch) {
                log::warn!("Skipped frame: {}", e);
            }

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.batch) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id));
        if let Some(el) = element {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("Rope Swing starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let settings = Settings::load();

        // Backing store follows the logical canvas size at device resolution
        let dpr = window.device_pixel_ratio();
        let width = (settings.width as f64 * dpr) as u32;
        let height = (settings.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let canvas_size = Vec2::new(settings.width, settings.height);
        let start_gate = settings.start_gate;
        let seed = js_sys::Date::now() as u64;
        let app = match RopeApp::new(settings, WebAudio::new(seed)) {
            Ok(app) => app,
            Err(e) => {
                log::error!("Invalid rope settings: {}", e);
                return;
            }
        };

        let host = Rc::new(RefCell::new(Host::new(app)));
        host.borrow_mut()
            .set_client_size(canvas.client_width() as f32, canvas.client_height() as f32);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
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
                power_preference: wgpu::PowerPreference::LowPower,
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

        match RenderState::new(surface, &adapter, width, height, canvas_size).await {
            Ok(render_state) => host.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        set_hidden("loading", true);
        set_hidden("start-prompt", !start_gate);

        setup_input_handlers(&canvas, host.clone());

        request_animation_frame(host);

        log::info!("Rope Swing running!");
    }

    /// Client coordinates relative to the canvas, in CSS pixels.
    /// Points outside the canvas come out negative or past its size.
    fn canvas_position(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f32, f32) {
        let rect = canvas.get_bounding_client_rect();
        (
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    fn touch_position(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        Some(canvas_position(canvas, touch.client_x(), touch.client_y()))
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // The anchor follows the pointer anywhere in the window, not just over the canvas
        if let Some(window) = web_sys::window() {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let (x, y) = canvas_position(&canvas_clone, event.client_x(), event.client_y());
                let mut h = host.borrow_mut();
                h.set_client_size(
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                h.pointer_moved(x, y);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse press opens the start gate
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                host.borrow_mut().pointer_pressed();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_position(&canvas_clone, &event) {
                    let mut h = host.borrow_mut();
                    h.set_client_size(
                        canvas_clone.client_width() as f32,
                        canvas_clone.client_height() as f32,
                    );
                    h.pointer_moved(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (open gate and grab)
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut h = host.borrow_mut();
                h.pointer_pressed();
                if let Some((x, y)) = touch_position(&canvas_clone, &event) {
                    h.pointer_moved(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();

            // Wall-clock delta; the rope integrates whatever the frame took
            let dt = if h.last_time > 0.0 {
                ((time - h.last_time) / 1000.0) as f32
            } else {
                NOMINAL_DT
            };
            h.last_time = time;

            h.frame(dt);
        }

        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rope Swing (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    if let Err(e) = run_headless(3.0) {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Swing the anchor in a circle for `seconds` of simulated 60 Hz frames
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(seconds: f32) -> Result<(), rope_swing::RopeError> {
    use rope_swing::consts::NOMINAL_DT;
    use rope_swing::renderer::ShapeBatch;
    use rope_swing::{RopeApp, Settings, Silent};

    let settings = Settings::load();
    let center = glam::Vec2::new(settings.width * 0.5, settings.height * 0.3);
    let mut app = RopeApp::new(settings, Silent)?;
    let mut batch = ShapeBatch::new();
    app.initialize(&mut batch);
    app.on_pointer_down();

    let frames = (seconds / NOMINAL_DT) as u32;
    for frame in 0..frames {
        let t = frame as f32 * NOMINAL_DT;
        let pointer = center + glam::Vec2::from_angle(t * 2.0) * 150.0;
        app.on_pointer_move(pointer.x, pointer.y)?;
        app.frame(NOMINAL_DT, &mut batch)?;

        if frame % 60 == 0 {
            let rope = &app.rope;
            log::info!(
                "t={:.1}s anchor=({:.0}, {:.0}) free=({:.0}, {:.0}) length={:.1} vertices={}",
                t,
                rope.anchor.x,
                rope.anchor.y,
                rope.free.x,
                rope.free.y,
                rope.length(),
                batch.vertices().len()
            );
        }
    }

    println!(
        "Simulated {} frames, free end at ({:.1}, {:.1})",
        frames, app.rope.free.x, app.rope.free.y
    );
    Ok(())
}
