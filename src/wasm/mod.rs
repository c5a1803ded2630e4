//! Browser side: WebGL2 layer renderers, the session that drives them, and
//! the JS-facing surface.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlCanvasElement};

use crate::config::EngineConfig;
use crate::field::geometry_name;
use crate::layers::LayerRole;
use crate::params::ParameterSet;

mod render;
mod session;

pub use render::LayerRenderer;
pub use session::RenderSession;

/// Container the demo page renders into.
pub const DISPLAY_ID: &str = "holographic-display";

thread_local! {
    static ACTIVE: RefCell<Option<RenderSession>> = const { RefCell::new(None) };
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // a second init (tests, re-imports) is harmless
    console_log::init_with_level(log::Level::Debug).ok();
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    init_logging();
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    // library use: nothing to open unless the page provides the display
    let Some(container) = document.get_element_by_id(DISPLAY_ID) else {
        return Ok(());
    };
    let query = window.location().search().unwrap_or_default();
    let params = ParameterSet::from_query(&query);

    let session = open_session(&container, params, EngineConfig::default())?;
    for role in LayerRole::ALL {
        if let Some(canvas) = session.canvas(role) {
            apply_layer_style(&canvas, role);
        }
    }
    // replacing the previous session tears it down
    ACTIVE.with(|active| active.borrow_mut().replace(session));
    Ok(())
}

fn open_session(
    container: &Element,
    params: ParameterSet,
    config: EngineConfig,
) -> Result<RenderSession, JsValue> {
    log::set_max_level(config.level().to_level_filter());
    log::info!("opening session with {}", params.to_query());
    Ok(RenderSession::open(container, params, config)?)
}

/// Host-side compositing: the engine only renders, the page stacks.
fn apply_layer_style(canvas: &HtmlCanvasElement, role: LayerRole) {
    let css = format!(
        "position: absolute; top: 0; left: 0; width: 100%; height: 100%; {}",
        role.descriptor().css()
    );
    canvas.style().set_css_text(&css);
}

/// JSON text for a JS value: strings pass through, objects are stringified,
/// `undefined`/`null` mean "use defaults".
fn json_text(value: &JsValue) -> Option<String> {
    if value.is_undefined() || value.is_null() {
        return None;
    }
    value
        .as_string()
        .or_else(|| js_sys::JSON::stringify(value).ok().and_then(|s| s.as_string()))
}

fn parse_role(role: &str) -> Result<LayerRole, JsValue> {
    LayerRole::from_name(role).ok_or_else(|| JsValue::from_str(&format!("unknown layer role {role:?}")))
}

/// A running five-layer visualization.
#[wasm_bindgen]
pub struct HolographicDisplay {
    session: RenderSession,
}

#[wasm_bindgen]
impl HolographicDisplay {
    /// `params` and `config` may be objects, JSON strings, or omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(container: &Element, params: JsValue, config: JsValue) -> Result<HolographicDisplay, JsValue> {
        init_logging();
        let params = json_text(&params)
            .map(|text| ParameterSet::from_json(&text).unwrap_or_default())
            .unwrap_or_default();
        let config = match json_text(&config) {
            Some(text) => EngineConfig::from_json(&text)?,
            None => EngineConfig::default(),
        };
        let session = open_session(container, params, config)?;
        Ok(HolographicDisplay { session })
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, client_x: f32, client_y: f32, dx: f32, dy: f32) {
        self.session.pointer_move(client_x, client_y, dx, dy);
    }

    pub fn click(&self) {
        self.session.click();
    }

    pub fn close(&mut self) {
        self.session.close();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    #[wasm_bindgen(js_name = clickIntensity)]
    pub fn click_intensity(&self, role: &str) -> Result<f32, JsValue> {
        Ok(self.session.snapshot(parse_role(role)?).click_intensity)
    }

    #[wasm_bindgen(js_name = liveLayers)]
    pub fn live_layers(&self) -> js_sys::Array {
        self.session
            .live_layers()
            .into_iter()
            .map(|role| JsValue::from_str(role.name()))
            .collect()
    }

    #[wasm_bindgen(js_name = failedLayers)]
    pub fn failed_layers(&self) -> js_sys::Array {
        self.session
            .failures()
            .iter()
            .map(|(role, err)| JsValue::from_str(&format!("{role}: {err}")))
            .collect()
    }

    pub fn canvas(&self, role: &str) -> Result<Option<HtmlCanvasElement>, JsValue> {
        Ok(self.session.canvas(parse_role(role)?))
    }

    pub fn params(&self) -> Result<String, JsValue> {
        self.session
            .params()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = layerParams)]
    pub fn layer_params(&self, role: &str) -> Result<String, JsValue> {
        parse_role(role)?
            .descriptor()
            .derive(self.session.params())
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[wasm_bindgen(js_name = geometryName)]
pub fn geometry_name_js(index: f64) -> String {
    if index.fract() != 0.0 {
        return "UNKNOWN".to_string();
    }
    geometry_name(index as i64).to_string()
}

#[wasm_bindgen(js_name = layerStyle)]
pub fn layer_style(role: &str) -> Result<String, JsValue> {
    Ok(parse_role(role)?.descriptor().css())
}

#[wasm_bindgen(js_name = parametersFromQuery)]
pub fn parameters_from_query(query: &str) -> Result<String, JsValue> {
    ParameterSet::from_query(query)
        .to_json()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(js_name = parametersToQuery)]
pub fn parameters_to_query(params: JsValue) -> String {
    json_text(&params)
        .and_then(|text| ParameterSet::from_json(&text).ok())
        .unwrap_or_default()
        .to_query()
}
