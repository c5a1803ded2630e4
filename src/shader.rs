//! GLSL ES 3.00 sources for the layer program.
//!
//! The fragment shader is the GPU twin of [`crate::field`],
//! [`crate::shading`] and [`FrameUniforms::shade_fragment`](crate::frame::FrameUniforms::shade_fragment);
//! keep the two in step when changing either.

pub const POSITION_ATTRIBUTE: &str = "a_position";

/// Full-viewport quad as a triangle strip.
pub const QUAD: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];

pub const VERTEX_SHADER: &str = r#"#version 300 es
in vec2 a_position;
void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform vec2 u_resolution;
uniform float u_time;
uniform vec2 u_mouse;
uniform float u_geometryType;
uniform float u_density;
uniform float u_speed;
uniform float u_intensity;
uniform float u_hue;
uniform float u_chaos;
uniform float u_morph;
uniform float u_mouseIntensity;

out vec4 fragColor;

vec3 hsv2rgb(vec3 c) {
    vec4 K = vec4(1.0, 2.0 / 3.0, 1.0 / 3.0, 3.0);
    vec3 p = abs(fract(c.xxx + K.xyz) * 6.0 - K.www);
    return c.z * mix(K.xxx, clamp(p - K.xxx, 0.0, 1.0), c.y);
}

float band(float d, float width) {
    return 1.0 - smoothstep(0.0, width, d);
}

float tetrahedronLattice(vec3 p, float gridSize) {
    vec3 q = fract(p * gridSize) - 0.5;
    float d1 = length(q);
    float d2 = length(q - vec3(0.4, 0.0, 0.0));
    float d3 = length(q - vec3(0.0, 0.4, 0.0));
    float d4 = length(q - vec3(0.0, 0.0, 0.4));
    float vertices = band(min(min(d1, d2), min(d3, d4)), 0.04);
    float edges = 0.0;
    edges = max(edges, band(abs(length(q.xy) - 0.2), 0.02));
    edges = max(edges, band(abs(length(q.yz) - 0.2), 0.02));
    edges = max(edges, band(abs(length(q.xz) - 0.2), 0.02));
    return max(vertices, edges * 0.5);
}

float hypercubeLattice(vec3 p, float gridSize) {
    vec3 grid = fract(p * gridSize);
    vec3 edges = 1.0 - smoothstep(0.0, 0.03, abs(grid - 0.5));
    return max(max(edges.x, edges.y), edges.z);
}

float sphereLattice(vec3 p, float gridSize) {
    vec3 q = fract(p * gridSize) - 0.5;
    return 1.0 - smoothstep(0.2, 0.5, length(q));
}

float torusLattice(vec3 p, float gridSize) {
    vec3 q = fract(p * gridSize) - 0.5;
    float r1 = sqrt(q.x * q.x + q.y * q.y);
    float r2 = sqrt((r1 - 0.3) * (r1 - 0.3) + q.z * q.z);
    return band(r2, 0.1);
}

float kleinLattice(vec3 p, float gridSize) {
    vec3 q = fract(p * gridSize);
    float u = q.x * 6.28318;
    float v = q.y * 6.28318;
    float x = cos(u) * (3.0 + cos(u / 2.0) * sin(v) - sin(u / 2.0) * sin(2.0 * v));
    float shell = length(vec2(x, q.z)) - 0.1;
    return band(abs(shell), 0.05);
}

float fractalLattice(vec3 p, float gridSize) {
    vec3 q = p * gridSize;
    float scale = 1.0;
    float acc = 0.0;
    for (int i = 0; i < 4; i++) {
        q = fract(q) - 0.5;
        acc += length(q) / scale;
        scale *= 2.0;
        q *= 2.0;
    }
    return 1.0 - smoothstep(0.0, 1.0, acc);
}

float waveLattice(vec3 p, float gridSize) {
    vec3 q = p * gridSize;
    float wave = sin(q.x * 2.0) * sin(q.y * 2.0) * sin(q.z * 2.0 + u_time * 0.001);
    return smoothstep(-0.5, 0.5, wave);
}

float crystalLattice(vec3 p, float gridSize) {
    vec3 q = fract(p * gridSize) - 0.5;
    float d = max(max(abs(q.x), abs(q.y)), abs(q.z));
    return 1.0 - smoothstep(0.3, 0.5, d);
}

float lattice(vec3 p, float gridSize, float geometryType) {
    int geom = int(mod(floor(geometryType), 8.0));
    switch (geom) {
        case 0: return tetrahedronLattice(p, gridSize);
        case 1: return hypercubeLattice(p, gridSize);
        case 2: return sphereLattice(p, gridSize);
        case 3: return torusLattice(p, gridSize);
        case 4: return kleinLattice(p, gridSize);
        case 5: return fractalLattice(p, gridSize);
        case 6: return waveLattice(p, gridSize);
        default: return crystalLattice(p, gridSize);
    }
}

void main() {
    vec2 res = max(u_resolution, vec2(1.0));
    float aspect = u_resolution.x / res.y;
    vec2 uv = gl_FragCoord.xy / res;
    uv.x *= aspect;
    uv -= 0.5;

    float time = u_time * 0.0004 * u_speed;

    vec2 offset = (u_mouse - 0.5) * u_mouseIntensity * 0.5;
    vec3 p = vec3(uv + offset * 0.1, sin(time * 0.1) * 0.15);

    float presence = lattice(p, u_density, u_geometryType);

    float hue = u_hue / 360.0 + time * 0.1 + u_mouseIntensity * 0.2;
    float saturation = 0.8 + presence * 0.2;
    float brightness = 0.2 + presence * 0.8 * u_intensity + u_mouseIntensity * 0.15;
    vec3 color = hsv2rgb(vec3(hue, saturation, brightness));

    float dist = length(uv - (u_mouse - 0.5) * vec2(aspect, 1.0));
    float glow = exp(-7.5 * dist) * u_mouseIntensity * 0.2;
    color += vec3(glow) * vec3(0.0, 1.0, 1.0) * 0.6;

    if (presence < 0.01) {
        color = mix(color, vec3(0.1), 0.9);
    }

    fragColor = vec4(color, 0.95);
}
"#;

/// Uniform names, in the order [`UniformSlot`] indexes them.
pub const UNIFORM_NAMES: [&str; 11] = [
    "u_resolution",
    "u_time",
    "u_mouse",
    "u_geometryType",
    "u_density",
    "u_speed",
    "u_intensity",
    "u_hue",
    "u_chaos",
    "u_morph",
    "u_mouseIntensity",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformSlot {
    Resolution,
    Time,
    Pointer,
    GeometryType,
    Density,
    Speed,
    Intensity,
    Hue,
    Chaos,
    Morph,
    Interaction,
}

impl UniformSlot {
    pub fn name(self) -> &'static str {
        UNIFORM_NAMES[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_uniform_is_declared() {
        for name in UNIFORM_NAMES {
            assert!(
                FRAGMENT_SHADER.contains(&format!(" {name};")),
                "{name} missing from fragment shader"
            );
        }
    }

    #[test]
    fn version_directive_is_first() {
        assert!(VERTEX_SHADER.starts_with("#version 300 es"));
        assert!(FRAGMENT_SHADER.starts_with("#version 300 es"));
        assert!(VERTEX_SHADER.contains(POSITION_ATTRIBUTE));
    }

    #[test]
    fn slot_names_line_up() {
        assert_eq!(UniformSlot::Interaction.name(), "u_mouseIntensity");
        assert_eq!(UniformSlot::Resolution.name(), "u_resolution");
    }
}
