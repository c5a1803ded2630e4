//! Presence-to-colour model shared by every layer.

use glam::{Vec3, Vec4};

use crate::field::fract;

/// Hue drift per unit of scaled time.
pub const HUE_DRIFT: f32 = 0.1;
/// Exponential falloff of the pointer glow with distance.
pub const GLOW_FALLOFF: f32 = 5.0 * 1.5;
/// Colour that empty space is pulled toward.
pub const BACKGROUND: Vec3 = Vec3::splat(0.1);
pub const BACKGROUND_MIX: f32 = 0.9;
pub const PRESENCE_FLOOR: f32 = 0.01;
pub const LAYER_ALPHA: f32 = 0.95;

const GLOW_TINT: Vec3 = Vec3::new(0.0, 1.0, 1.0);

/// GLSL-style HSV to RGB. Hue is in turns and wraps through `fract`, so any
/// real hue is valid without reducing it first.
pub fn hsv_to_rgb(hsv: Vec3) -> Vec3 {
    let k = Vec3::new(1.0, 2.0 / 3.0, 1.0 / 3.0);
    let p = (fract(Vec3::splat(hsv.x) + k) * 6.0 - Vec3::splat(3.0)).abs();
    hsv.z * Vec3::ONE.lerp((p - Vec3::ONE).clamp(Vec3::ZERO, Vec3::ONE), hsv.y)
}

/// Base colour for a presence value. `hue` is in degrees; `time` is the
/// speed-scaled clock; `interaction` is drag plus click intensity.
///
/// There is no saturation input: saturation is driven by presence alone
/// (`0.8 + presence * 0.2`). `ParameterSet::saturation` is carried through
/// layer derivation and serialisation but never uploaded, so two parameter
/// sets that differ only in saturation render the same pixels.
pub fn shade(presence: f32, time: f32, hue: f32, intensity: f32, interaction: f32) -> Vec3 {
    let h = hue / 360.0 + time * HUE_DRIFT + interaction * 0.2;
    let s = 0.8 + presence * 0.2;
    let v = 0.2 + presence * 0.8 * intensity + interaction * 0.15;
    hsv_to_rgb(Vec3::new(h, s, v))
}

/// Additive cyan glow around the pointer.
pub fn pointer_glow(distance: f32, interaction: f32) -> Vec3 {
    let glow = (-GLOW_FALLOFF * distance).exp() * interaction * 0.2;
    Vec3::splat(glow) * GLOW_TINT * 0.6
}

/// Empty space reads as near-black instead of stray hue.
pub fn suppress_background(presence: f32, color: Vec3) -> Vec3 {
    if presence < PRESENCE_FLOOR {
        color.lerp(BACKGROUND, BACKGROUND_MIX)
    } else {
        color
    }
}

/// Full fragment colour: base shade, glow, suppression, fixed alpha.
pub fn fragment_color(
    presence: f32,
    time: f32,
    hue: f32,
    intensity: f32,
    interaction: f32,
    pointer_distance: f32,
) -> Vec4 {
    let color = shade(presence, time, hue, intensity, interaction)
        + pointer_glow(pointer_distance, interaction);
    suppress_background(presence, color).extend(LAYER_ALPHA)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn primary_hues() {
        assert!(close(hsv_to_rgb(Vec3::new(0.0, 1.0, 1.0)), Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(hsv_to_rgb(Vec3::new(1.0 / 3.0, 1.0, 1.0)), Vec3::new(0.0, 1.0, 0.0)));
        assert!(close(hsv_to_rgb(Vec3::new(2.0 / 3.0, 1.0, 1.0)), Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert!(close(hsv_to_rgb(Vec3::new(0.37, 0.0, 0.4)), Vec3::splat(0.4)));
    }

    #[test]
    fn glow_vanishes_without_interaction() {
        assert_eq!(pointer_glow(0.0, 0.0), Vec3::ZERO);
        let g = pointer_glow(0.0, 1.0);
        assert_eq!(g.x, 0.0);
        assert!((g.y - 0.12).abs() < 1e-6);
    }
}
