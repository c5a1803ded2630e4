//! Per-frame uniform set and the CPU reference of the fragment program.

use glam::{Vec2, Vec3, Vec4};

use crate::field::evaluate_at;
use crate::interaction::InteractionSnapshot;
use crate::params::ParameterSet;
use crate::shading::fragment_color;

/// Milliseconds to field time, before the layer's speed multiplier.
pub const TIME_SCALE: f32 = 0.0004;
/// Amplitude of the slow z sway of the sample plane.
pub const DEPTH_SWAY: f32 = 0.15;

/// Everything one draw call uploads. Mirrors the `u_*` uniforms one to one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    pub resolution: Vec2,
    pub time_ms: f32,
    pub pointer: Vec2,
    pub geometry_type: f32,
    pub density: f32,
    pub speed: f32,
    pub intensity: f32,
    pub hue: f32,
    pub chaos: f32,
    pub morph: f32,
    pub interaction: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowOrder {
    /// First row is the top of the image.
    TopDown,
    /// First row is the bottom, as `readPixels` returns it.
    BottomUp,
}

impl FrameUniforms {
    pub fn new(
        params: &ParameterSet,
        interaction: &InteractionSnapshot,
        elapsed_ms: f64,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            resolution: Vec2::new(width as f32, height as f32),
            time_ms: elapsed_ms as f32,
            pointer: interaction.pointer,
            // reduced before the float conversion so large indices stay exact
            geometry_type: params.geometry().index() as f32,
            density: params.density,
            speed: params.speed,
            intensity: params.intensity,
            hue: params.hue,
            chaos: params.chaos,
            morph: params.morph,
            interaction: interaction.combined(),
        }
    }

    /// Speed-scaled clock that drives hue drift and the depth sway.
    pub fn scaled_time(&self) -> f32 {
        self.time_ms * TIME_SCALE * self.speed
    }

    fn aspect(&self) -> f32 {
        self.resolution.x / self.resolution.y.max(1.0)
    }

    /// Aspect-corrected, centred coordinate of a fragment.
    pub fn uv(&self, frag_coord: Vec2) -> Vec2 {
        let mut uv = frag_coord / self.resolution.max(Vec2::ONE);
        uv.x *= self.aspect();
        uv - Vec2::splat(0.5)
    }

    /// 3D sample point for a fragment, nudged by the pointer.
    pub fn sample_point(&self, frag_coord: Vec2) -> Vec3 {
        let offset = (self.pointer - Vec2::splat(0.5)) * self.interaction * 0.5;
        let uv = self.uv(frag_coord) + offset * 0.1;
        uv.extend((self.scaled_time() * 0.1).sin() * DEPTH_SWAY)
    }

    /// Distance from the fragment to the pointer in uv space.
    pub fn pointer_distance(&self, frag_coord: Vec2) -> f32 {
        let pointer = (self.pointer - Vec2::splat(0.5)) * Vec2::new(self.aspect(), 1.0);
        (self.uv(frag_coord) - pointer).length()
    }

    /// Lattice presence at a fragment.
    pub fn presence(&self, frag_coord: Vec2) -> f32 {
        evaluate_at(
            self.sample_point(frag_coord),
            self.density,
            self.geometry_type.floor() as i32,
            self.time_ms,
        )
    }

    /// What the fragment shader writes for `frag_coord` (pixel centres are
    /// at `.5`, origin bottom-left).
    pub fn shade_fragment(&self, frag_coord: Vec2) -> Vec4 {
        fragment_color(
            self.presence(frag_coord),
            self.scaled_time(),
            self.hue,
            self.intensity,
            self.interaction,
            self.pointer_distance(frag_coord),
        )
    }
}

/// Render a whole frame on the CPU as RGBA8, clamped like a colour buffer.
pub fn render_rgba(uniforms: &FrameUniforms, width: u32, height: u32, order: RowOrder) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for row in 0..height {
        let y = match order {
            RowOrder::BottomUp => row,
            RowOrder::TopDown => height - 1 - row,
        };
        for x in 0..width {
            let frag = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let color = uniforms.shade_fragment(frag);
            pixels.extend(color.to_array().map(to_unorm8));
        }
    }
    pixels
}

fn to_unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniforms(width: u32, height: u32) -> FrameUniforms {
        FrameUniforms::new(
            &ParameterSet::default(),
            &InteractionSnapshot::default(),
            0.0,
            width,
            height,
        )
    }

    #[test]
    fn buffer_size_matches_resolution() {
        let u = uniforms(7, 3);
        assert_eq!(render_rgba(&u, 7, 3, RowOrder::TopDown).len(), 7 * 3 * 4);
    }

    #[test]
    fn row_orders_are_mirror_images() {
        let u = uniforms(4, 5);
        let top = render_rgba(&u, 4, 5, RowOrder::TopDown);
        let bottom = render_rgba(&u, 4, 5, RowOrder::BottomUp);
        let stride = 4 * 4;
        for row in 0..5 {
            let a = &top[row * stride..(row + 1) * stride];
            let b = &bottom[(4 - row) * stride..(5 - row) * stride];
            assert_eq!(a, b);
        }
    }

    #[test]
    fn alpha_is_fixed() {
        let u = uniforms(3, 3);
        let px = render_rgba(&u, 3, 3, RowOrder::TopDown);
        assert!(px.chunks(4).all(|p| p[3] == 242));
    }
}
