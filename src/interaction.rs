//! Pointer and click signals shared by all layers of a session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::layers::LayerRole;

pub const CLICK_PULSE: f32 = 0.3;
pub const CLICK_DECAY: f32 = 0.95;
/// Movement (px) per event that saturates the drag signal.
pub const DRAG_SATURATION_PX: f32 = 40.0;

/// When click intensity decays.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DecayMode {
    /// Once per rendered frame, whatever the frame rate.
    #[default]
    PerFrame,
    /// `0.95^(dt / frame_budget_ms)`, independent of frame rate.
    Timed { frame_budget_ms: f32 },
}

impl DecayMode {
    /// Multiplier for one frame that took `dt_ms`.
    pub fn factor(&self, dt_ms: f64) -> f32 {
        match *self {
            DecayMode::PerFrame => CLICK_DECAY,
            DecayMode::Timed { frame_budget_ms } if frame_budget_ms > 0.0 => {
                let frames = (dt_ms.max(0.0) / frame_budget_ms as f64) as f32;
                CLICK_DECAY.powf(frames)
            }
            DecayMode::Timed { .. } => CLICK_DECAY,
        }
    }
}

/// Immutable view of the interaction signals handed to one layer for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionSnapshot {
    /// Normalised viewport position, origin bottom-left.
    pub pointer: Vec2,
    pub drag_intensity: f32,
    pub click_intensity: f32,
}

impl Default for InteractionSnapshot {
    fn default() -> Self {
        Self {
            pointer: Vec2::splat(0.5),
            drag_intensity: 0.0,
            click_intensity: 0.0,
        }
    }
}

impl InteractionSnapshot {
    /// Value uploaded as the shader's interaction intensity.
    pub fn combined(&self) -> f32 {
        self.drag_intensity + self.click_intensity
    }
}

/// Single writer for pointer/click input.
///
/// Pointer position and drag are shared. Each layer keeps its own click
/// pulse: a click bumps all of them, and a layer decays only its own on its
/// own frames, so a slow sibling never speeds up another layer's decay.
#[derive(Clone, Debug)]
pub struct InteractionTracker {
    pointer: Vec2,
    drag: f32,
    clicks: [f32; 5],
    mode: DecayMode,
}

impl Default for InteractionTracker {
    fn default() -> Self {
        Self::new(DecayMode::default())
    }
}

impl InteractionTracker {
    pub fn new(mode: DecayMode) -> Self {
        Self {
            pointer: Vec2::splat(0.5),
            drag: 0.0,
            clicks: [0.0; 5],
            mode,
        }
    }

    pub fn mode(&self) -> DecayMode {
        self.mode
    }

    /// Pointer moved to normalised `(u, v)` by `(dx, dy)` pixels. The drag
    /// signal is re-derived from this single event; the latest sample wins.
    pub fn pointer_move(&mut self, u: f32, v: f32, dx: f32, dy: f32) {
        self.pointer = Vec2::new(u, v);
        self.drag = ((dx * dx + dy * dy).sqrt() / DRAG_SATURATION_PX).clamp(0.0, 1.0);
    }

    /// Same as [`pointer_move`](Self::pointer_move) from client pixels;
    /// y is flipped so `v` grows upward like GL fragment coordinates.
    pub fn pointer_move_client(
        &mut self,
        x: f32,
        y: f32,
        viewport: Vec2,
        dx: f32,
        dy: f32,
    ) {
        let w = viewport.x.max(1.0);
        let h = viewport.y.max(1.0);
        self.pointer_move(x / w, 1.0 - y / h, dx, dy);
    }

    pub fn click(&mut self) {
        for c in &mut self.clicks {
            *c = (*c + CLICK_PULSE).min(1.0);
        }
    }

    /// One frame of decay for `role`'s click pulse.
    pub fn decay(&mut self, role: LayerRole, dt_ms: f64) {
        let c = &mut self.clicks[role.index()];
        *c = (*c * self.mode.factor(dt_ms)).max(0.0);
    }

    pub fn click_intensity(&self, role: LayerRole) -> f32 {
        self.clicks[role.index()]
    }

    pub fn snapshot(&self, role: LayerRole) -> InteractionSnapshot {
        InteractionSnapshot {
            pointer: self.pointer,
            drag_intensity: self.drag,
            click_intensity: self.click_intensity(role),
        }
    }
}
