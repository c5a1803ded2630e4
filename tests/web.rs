#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlCanvasElement};

use holo_layers::frame::{render_rgba, FrameUniforms, RowOrder};
use holo_layers::layers::LayerRole;
use holo_layers::wasm::{LayerRenderer, RenderSession};
use holo_layers::{EngineConfig, EngineError, InteractionSnapshot, ParameterSet};

wasm_bindgen_test_configure!(run_in_browser);

fn container(id: &str) -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let div = document.create_element("div").unwrap();
    div.set_id(id);
    div.set_attribute("style", "position: relative; width: 64px; height: 48px;")
        .unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

fn sized_canvas(width: u32, height: u32) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .unwrap()
        .dyn_into()
        .unwrap();
    canvas
        .set_attribute("style", &format!("width: {width}px; height: {height}px;"))
        .unwrap();
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn session_builds_every_layer_or_reports_it() {
    let root = container("session-root");
    let config = EngineConfig {
        listen_to_document: false,
        ..EngineConfig::default()
    };
    let mut session = RenderSession::open(&root, ParameterSet::default(), config).unwrap();

    assert_eq!(
        session.live_layers().len() + session.failures().len(),
        LayerRole::ALL.len()
    );
    for (_, err) in session.failures() {
        assert!(err.is_layer_local(), "{err}");
    }
    // one canvas per role, stacked in the container
    for role in LayerRole::ALL {
        let id = role.canvas_id();
        assert!(root.query_selector(&format!("#{id}")).unwrap().is_some(), "{id}");
    }

    session.close();
    assert!(!session.is_running());
    assert!(session.live_layers().is_empty());
    root.remove();
}

#[wasm_bindgen_test]
fn click_is_visible_immediately() {
    let root = container("click-root");
    let params = ParameterSet::from_json(
        r#"{"geometry":4,"density":1.2,"speed":0.5,"hue":200,"saturation":0.8,"intensity":0.5}"#,
    )
    .unwrap();
    let config = EngineConfig {
        listen_to_document: false,
        ..EngineConfig::default()
    };
    let mut session = RenderSession::open(&root, params, config).unwrap();
    session.click();
    for role in LayerRole::ALL {
        assert!((session.snapshot(role).click_intensity - 0.3).abs() < 1e-6);
    }
    session.close();
    root.remove();
}

#[wasm_bindgen_test]
fn gpu_matches_reference_renderer() {
    let canvas = sized_canvas(40, 30);
    let params = ParameterSet {
        geometry_type: 2,
        density: 3.0,
        ..ParameterSet::default()
    };
    let mut renderer = match LayerRenderer::new(LayerRole::Content, canvas.clone(), params) {
        Ok(r) => r,
        // headless runners without WebGL2 have nothing to compare
        Err(EngineError::GpuUnavailable { .. }) => return,
        Err(err) => panic!("{err}"),
    };

    let snapshot = InteractionSnapshot::default();
    let frame = renderer.render(&snapshot, 0.0, false);
    let gpu = renderer.read_pixels().unwrap();
    renderer.release();

    let (w, h) = (canvas.width(), canvas.height());
    assert_eq!(frame, FrameUniforms::new(&params, &snapshot, 0.0, w, h));
    let cpu = render_rgba(&frame, w, h, RowOrder::BottomUp);
    assert_eq!(gpu.len(), cpu.len());

    let total: u64 = gpu
        .iter()
        .zip(&cpu)
        .map(|(a, b)| (*a as i32 - *b as i32).unsigned_abs() as u64)
        .sum();
    let mean = total as f64 / gpu.len() as f64;
    assert!(mean < 2.0, "mean channel error {mean}");
    canvas.remove();
}
