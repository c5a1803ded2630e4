//! Layered procedural "holographic" renderer.
//!
//! A [`ParameterSet`] is expanded into five layer variants
//! ([`layers::derive_all`]); each layer evaluates one of eight lattice
//! fields and the shading model on the GPU every animation frame, perturbed
//! by pointer drag and click pulses from an [`InteractionTracker`].
//!
//! The numeric core (fields, shading, uniforms) is plain Rust and compiles
//! everywhere so it can be tested on the host and used for CPU snapshots.
//! The WebGL2 side lives in `wasm` and only builds for `wasm32`.

pub mod config;
pub mod error;
pub mod field;
pub mod frame;
pub mod interaction;
pub mod layers;
pub mod params;
pub mod shader;
pub mod shading;

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::EngineConfig;
pub use error::EngineError;
pub use field::{evaluate, GeometryKind};
pub use interaction::{DecayMode, InteractionSnapshot, InteractionTracker};
pub use layers::{LayerDescriptor, LayerRole};
pub use params::ParameterSet;
