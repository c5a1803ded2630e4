use std::fmt;

use thiserror::Error;

use crate::layers::LayerRole;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failures surfaced by the engine. None of them is fatal to a session:
/// a layer that fails to build is skipped and its siblings keep rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("WebGL2 context unavailable for {role} layer")]
    GpuUnavailable { role: LayerRole },

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("program failed to link: {log}")]
    ProgramLink { log: String },

    #[error("GPU resource allocation failed: {0}")]
    Resource(&'static str),

    #[error("element not found: {0}")]
    MissingElement(String),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// GPU-side failures only cost one layer.
    pub fn is_layer_local(&self) -> bool {
        matches!(
            self,
            EngineError::GpuUnavailable { .. }
                | EngineError::ShaderCompile { .. }
                | EngineError::ProgramLink { .. }
                | EngineError::Resource(_)
        )
    }
}

#[cfg(target_arch = "wasm32")]
impl From<EngineError> for wasm_bindgen::JsValue {
    fn from(err: EngineError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for EngineError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        EngineError::Dom(format!("{value:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_failures_are_layer_local() {
        let link = EngineError::ProgramLink {
            log: "varying mismatch".into(),
        };
        assert_eq!(link.to_string(), "program failed to link: varying mismatch");
        assert!(link.is_layer_local());

        let compile = EngineError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "0:12: syntax error".into(),
        };
        assert!(compile.is_layer_local());
        assert!(EngineError::GpuUnavailable { role: LayerRole::Accent }.is_layer_local());
        assert!(!EngineError::MissingElement("document".into()).is_layer_local());
    }
}
