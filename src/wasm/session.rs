use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Document, Element, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::interaction::{InteractionSnapshot, InteractionTracker};
use crate::layers::{derive_all, LayerRole};
use crate::params::ParameterSet;

use super::render::LayerRenderer;

type FrameCallback = Closure<dyn FnMut(f64)>;
type EventCallback = Closure<dyn FnMut(MouseEvent)>;

/// One layer's animation loop. The closure is stored next to the renderer
/// so it can re-schedule itself every frame.
struct LayerLoop {
    renderer: RefCell<LayerRenderer>,
    frame: RefCell<Option<FrameCallback>>,
    handle: Cell<Option<i32>>,
    last_ms: Cell<Option<f64>>,
}

struct Shared {
    window: Window,
    params: ParameterSet,
    config: EngineConfig,
    tracker: RefCell<InteractionTracker>,
    start_ms: f64,
    running: Cell<bool>,
}

/// A live visualization: five independently animated layers fed by one
/// parameter set and one interaction tracker.
pub struct RenderSession {
    shared: Rc<Shared>,
    layers: Vec<Rc<LayerLoop>>,
    failures: Vec<(LayerRole, EngineError)>,
    listeners: Vec<(EventTarget, &'static str, EventCallback)>,
}

impl RenderSession {
    /// Build every layer inside `container` and start their loops.
    ///
    /// Canvases are looked up by `"{role}-canvas"` id and created when
    /// missing. A layer whose context or program cannot be built is logged
    /// and skipped; only a missing window/document is an error.
    pub fn open(
        container: &Element,
        params: ParameterSet,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let window = window().ok_or_else(|| EngineError::MissingElement("window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| EngineError::MissingElement("document".into()))?;
        let start_ms = now_ms(&window);

        let shared = Rc::new(Shared {
            window,
            params,
            tracker: RefCell::new(InteractionTracker::new(config.decay)),
            config,
            start_ms,
            running: Cell::new(true),
        });

        let mut layers = Vec::new();
        let mut failures = Vec::new();
        for (role, layer_params) in derive_all(&params) {
            let built = layer_canvas(&document, container, role)
                .and_then(|canvas| LayerRenderer::new(role, canvas, layer_params));
            match built {
                Ok(renderer) => layers.push(Rc::new(LayerLoop {
                    renderer: RefCell::new(renderer),
                    frame: RefCell::new(None),
                    handle: Cell::new(None),
                    last_ms: Cell::new(None),
                })),
                Err(err @ EngineError::GpuUnavailable { .. }) => {
                    log::warn!("{err}; continuing without it");
                    failures.push((role, err));
                }
                Err(err) if err.is_layer_local() => {
                    log::error!("{role} layer disabled: {err}");
                    failures.push((role, err));
                }
                Err(err) => {
                    for layer in &layers {
                        layer.renderer.borrow().release();
                    }
                    return Err(err);
                }
            }
        }

        let mut session = Self {
            shared,
            layers,
            failures,
            listeners: Vec::new(),
        };
        for layer in &session.layers {
            start_loop(&session.shared, layer)?;
        }
        if session.shared.config.listen_to_document {
            session.listen(&document)?;
        }

        log::info!(
            "session open: {} of {} layers live, geometry {} ({})",
            session.layers.len(),
            LayerRole::ALL.len(),
            params.geometry_type,
            params.geometry().name()
        );
        Ok(session)
    }

    /// Route mousemove/click on `target` into the tracker.
    pub fn listen(&mut self, target: &EventTarget) -> Result<(), EngineError> {
        let shared = self.shared.clone();
        let on_move: EventCallback = Closure::wrap(Box::new(move |e: MouseEvent| {
            let viewport = viewport_size(&shared.window);
            shared.tracker.borrow_mut().pointer_move_client(
                e.client_x() as f32,
                e.client_y() as f32,
                viewport,
                e.movement_x() as f32,
                e.movement_y() as f32,
            );
        }) as Box<dyn FnMut(MouseEvent)>);

        let shared = self.shared.clone();
        let on_click: EventCallback = Closure::wrap(Box::new(move |_e: MouseEvent| {
            shared.tracker.borrow_mut().click();
        }) as Box<dyn FnMut(MouseEvent)>);

        for (kind, callback) in [("mousemove", on_move), ("click", on_click)] {
            target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
            self.listeners.push((target.clone(), kind, callback));
        }
        Ok(())
    }

    /// Feed a pointer move from the host, in client pixels.
    pub fn pointer_move(&self, client_x: f32, client_y: f32, dx: f32, dy: f32) {
        let viewport = viewport_size(&self.shared.window);
        self.shared
            .tracker
            .borrow_mut()
            .pointer_move_client(client_x, client_y, viewport, dx, dy);
    }

    pub fn click(&self) {
        self.shared.tracker.borrow_mut().click();
    }

    pub fn snapshot(&self, role: LayerRole) -> InteractionSnapshot {
        self.shared.tracker.borrow().snapshot(role)
    }

    pub fn params(&self) -> &ParameterSet {
        &self.shared.params
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.get()
    }

    /// Roles whose renderer is live.
    pub fn live_layers(&self) -> Vec<LayerRole> {
        self.layers.iter().map(|l| l.renderer.borrow().role()).collect()
    }

    pub fn failures(&self) -> &[(LayerRole, EngineError)] {
        &self.failures
    }

    pub fn canvas(&self, role: LayerRole) -> Option<HtmlCanvasElement> {
        self.layers
            .iter()
            .map(|l| l.renderer.borrow())
            .find(|r| r.role() == role)
            .map(|r| r.canvas().clone())
    }

    /// Stop every loop, detach listeners and free GPU objects. Idempotent.
    pub fn close(&mut self) {
        if !self.shared.running.replace(false) {
            return;
        }
        for layer in self.layers.drain(..) {
            if let Some(id) = layer.handle.take() {
                let _ = self.shared.window.cancel_animation_frame(id);
            }
            // breaks the closure <-> loop cycle
            layer.frame.borrow_mut().take();
            layer.renderer.borrow().release();
        }
        for (target, kind, callback) in self.listeners.drain(..) {
            let _ = target.remove_event_listener_with_callback(kind, callback.as_ref().unchecked_ref());
        }
        log::info!("session closed");
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn start_loop(shared: &Rc<Shared>, layer: &Rc<LayerLoop>) -> Result<(), EngineError> {
    let state = shared.clone();
    let this = layer.clone();
    let callback: FrameCallback = Closure::wrap(Box::new(move |now: f64| {
        if !state.running.get() {
            return;
        }
        let role = this.renderer.borrow().role();
        let dt = this.last_ms.replace(Some(now)).map_or(0.0, |prev| now - prev);
        let snapshot = {
            let mut tracker = state.tracker.borrow_mut();
            tracker.decay(role, dt);
            tracker.snapshot(role)
        };
        let elapsed = (now - state.start_ms).max(0.0);
        this.renderer
            .borrow_mut()
            .render(&snapshot, elapsed, state.config.device_pixel_ratio_aware);

        if let Err(err) = request_frame(&state.window, &this) {
            log::error!("{role} layer could not schedule next frame: {err}");
        }
    }) as Box<dyn FnMut(f64)>);

    *layer.frame.borrow_mut() = Some(callback);
    request_frame(&shared.window, layer)
}

fn request_frame(window: &Window, layer: &LayerLoop) -> Result<(), EngineError> {
    if let Some(callback) = layer.frame.borrow().as_ref() {
        let id = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        layer.handle.set(Some(id));
    }
    Ok(())
}

fn layer_canvas(
    document: &Document,
    container: &Element,
    role: LayerRole,
) -> Result<HtmlCanvasElement, EngineError> {
    let id = role.canvas_id();
    let element = match document.get_element_by_id(&id) {
        Some(el) => el,
        None => {
            let el = document.create_element("canvas")?;
            el.set_id(&id);
            container.append_child(&el)?;
            el
        }
    };
    element
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| EngineError::Dom(format!("#{id} is not a canvas")))
}

fn now_ms(window: &Window) -> f64 {
    window.performance().map_or_else(js_sys::Date::now, |p| p.now())
}

fn viewport_size(window: &Window) -> Vec2 {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0) as f32;
    Vec2::new(dim(window.inner_width()), dim(window.inner_height()))
}
