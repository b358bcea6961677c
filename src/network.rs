// Browser host for the particle field: sizes the canvas to the viewport,
// regenerates the field on window resize and drives it from
// requestAnimationFrame until stopped.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlCanvasElement, Window};

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::field::{ParticleField, Viewport};
use crate::renderer::CanvasRenderer;

impl Viewport for Window {
    fn size(&self) -> (f64, f64) {
        let width = self.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = self.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (width, height)
    }
}

struct Scene {
    field: ParticleField,
    renderer: CanvasRenderer,
    canvas: HtmlCanvasElement,
    // shared with the owning handle so the count outlives the session
    frames: Rc<Cell<u64>>,
}

impl Scene {
    fn fit_to<V: Viewport>(&mut self, viewport: &V) {
        let (width, height) = self.field.fit_to(viewport);
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        log!(
            "particle field resized to {}x{} ({} particles, generation {})",
            width,
            height,
            self.field.len(),
            self.field.generation()
        );
    }

    fn draw(&mut self) {
        #[cfg(feature = "profile")]
        let _timer = crate::Timer::new("ParticleField::frame");
        self.field.frame(&mut self.renderer);
        self.frames.set(self.frames.get() + 1);
    }
}

// Registered listener, removed again on drop
struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut()>,
}

impl EventListener {
    fn new(
        target: &EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut()>,
    ) -> Result<Self, FieldError> {
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(EventListener {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

// Self-rescheduling requestAnimationFrame loop. Dropping it cancels the
// pending frame and frees the callback, so nothing runs afterwards.
struct FrameLoop {
    window: Window,
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameLoop {
    fn start(window: Window, scene: Weak<RefCell<Scene>>) -> Result<Self, FieldError> {
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

        let this_callback = Rc::downgrade(&callback);
        let tick_pending = pending.clone();
        let tick_window = window.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            tick_pending.set(None);
            let scene = match scene.upgrade() {
                Some(scene) => scene,
                None => return,
            };
            scene.borrow_mut().draw();

            if let Some(callback) = this_callback.upgrade() {
                if let Some(callback) = callback.borrow().as_ref() {
                    match tick_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                        Ok(id) => tick_pending.set(Some(id)),
                        Err(e) => warn!("requestAnimationFrame failed: {}", FieldError::from(e)),
                    }
                }
            }
        }) as Box<dyn FnMut()>));

        let frames = FrameLoop {
            window,
            pending,
            callback,
        };
        frames.schedule()?;
        Ok(frames)
    }

    fn schedule(&self) -> Result<(), FieldError> {
        if let Some(callback) = self.callback.borrow().as_ref() {
            let id = self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())?;
            self.pending.set(Some(id));
        }
        Ok(())
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

// Everything one start() acquires. Field order is drop order: the frame loop
// and the resize listener go before the scene they point at.
struct Session {
    _frames: FrameLoop,
    _resize: EventListener,
    scene: Rc<RefCell<Scene>>,
}

// Animated particle network background for a <canvas>.
//
//     const network = new ParticleNetwork({ seed: 42 });
//     network.start(document.querySelector("canvas"));
//     // later
//     network.stop();
#[wasm_bindgen]
pub struct ParticleNetwork {
    config: FieldConfig,
    session: Option<Session>,
    frames: Rc<Cell<u64>>,
}

#[wasm_bindgen]
impl ParticleNetwork {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<ParticleNetwork, JsValue> {
        let config = FieldConfig::from_js(options)?;
        Ok(ParticleNetwork::with_config(config))
    }

    // Sizes the canvas to the window and starts animating it. Does nothing
    // when the canvas has no 2d context.
    pub fn start(&mut self, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or(FieldError::NoWindow)?;
        self.start_with(canvas, window)?;
        Ok(())
    }

    // Cancels the pending frame and removes the resize listener. Safe to call
    // any number of times.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            drop(session);
            log!("particle field stopped");
        }
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.session
            .as_ref()
            .map(|s| s.scene.borrow().field.len())
            .unwrap_or(0)
    }

    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> u64 {
        self.session
            .as_ref()
            .map(|s| s.scene.borrow().field.generation())
            .unwrap_or(0)
    }

    // frames drawn by every session of this handle
    #[wasm_bindgen(getter, js_name = framesDrawn)]
    pub fn frames_drawn(&self) -> u64 {
        self.frames.get()
    }
}

impl ParticleNetwork {
    pub fn with_config(config: FieldConfig) -> Self {
        ParticleNetwork {
            config,
            session: None,
            frames: Rc::new(Cell::new(0)),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    // Like start(), but sized by `viewport` instead of the window. Resize
    // events still come from the window. A running session is stopped first,
    // so frames are never scheduled twice.
    pub fn start_with<V: Viewport + 'static>(
        &mut self,
        canvas: HtmlCanvasElement,
        viewport: V,
    ) -> Result<(), FieldError> {
        self.stop();

        let window = web_sys::window().ok_or(FieldError::NoWindow)?;
        let renderer = match CanvasRenderer::from_canvas(&canvas)? {
            Some(renderer) => renderer,
            None => {
                log!("canvas has no 2d context, particle field disabled");
                return Ok(());
            }
        };

        let scene = Rc::new(RefCell::new(Scene {
            field: ParticleField::new(self.config.clone()),
            renderer,
            canvas,
            frames: self.frames.clone(),
        }));
        scene.borrow_mut().fit_to(&viewport);

        let resize = {
            let scene = Rc::downgrade(&scene);
            EventListener::new(
                &window,
                "resize",
                Closure::wrap(Box::new(move || {
                    if let Some(scene) = scene.upgrade() {
                        scene.borrow_mut().fit_to(&viewport);
                    }
                }) as Box<dyn FnMut()>),
            )?
        };

        scene.borrow_mut().draw();
        let frames = FrameLoop::start(window, Rc::downgrade(&scene))?;

        self.session = Some(Session {
            _frames: frames,
            _resize: resize,
            scene,
        });
        log!("particle field started");
        Ok(())
    }
}

impl Default for ParticleNetwork {
    fn default() -> Self {
        ParticleNetwork::with_config(FieldConfig::default())
    }
}

impl Drop for ParticleNetwork {
    fn drop(&mut self) {
        self.stop();
    }
}
