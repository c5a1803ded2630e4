//! Host-side reference implementation of the eight lattice fields.
//!
//! Every function here mirrors its GLSL twin in [`crate::shader`] line for
//! line, in `f32`, so the CPU path and the GPU path agree within rounding.

use glam::{Vec2, Vec3};

pub const GEOMETRY_COUNT: i32 = 8;

const TAU: f32 = 6.28318;

/// Closed set of lattice geometries, indexed 0..8 in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Tetrahedron,
    Hypercube,
    Sphere,
    Torus,
    Klein,
    Fractal,
    Wave,
    Crystal,
}

/// Signature shared by every lattice: sample point, grid density, elapsed ms.
pub type LatticeFn = fn(Vec3, f32, f32) -> f32;

const LATTICES: [LatticeFn; GEOMETRY_COUNT as usize] = [
    tetrahedron_lattice,
    hypercube_lattice,
    sphere_lattice,
    torus_lattice,
    klein_lattice,
    fractal_lattice,
    wave_lattice,
    crystal_lattice,
];

impl GeometryKind {
    pub const ALL: [GeometryKind; GEOMETRY_COUNT as usize] = [
        GeometryKind::Tetrahedron,
        GeometryKind::Hypercube,
        GeometryKind::Sphere,
        GeometryKind::Torus,
        GeometryKind::Klein,
        GeometryKind::Fractal,
        GeometryKind::Wave,
        GeometryKind::Crystal,
    ];

    /// Any integer maps to a geometry; dispatch wraps modulo 8.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(GEOMETRY_COUNT) as usize]
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            GeometryKind::Tetrahedron => "TETRAHEDRON",
            GeometryKind::Hypercube => "HYPERCUBE",
            GeometryKind::Sphere => "SPHERE",
            GeometryKind::Torus => "TORUS",
            GeometryKind::Klein => "KLEIN BOTTLE",
            GeometryKind::Fractal => "FRACTAL",
            GeometryKind::Wave => "WAVE",
            GeometryKind::Crystal => "CRYSTAL",
        }
    }

    pub fn evaluate(self, point: Vec3, grid_size: f32, time_ms: f32) -> f32 {
        LATTICES[self as usize](point, grid_size, time_ms)
    }
}

/// Display name for a raw geometry index. Unlike rendering, this does not
/// wrap: anything outside 0..8 is `"UNKNOWN"`.
pub fn geometry_name(index: i64) -> &'static str {
    usize::try_from(index)
        .ok()
        .and_then(|i| GeometryKind::ALL.get(i))
        .map_or("UNKNOWN", |kind| kind.name())
}

/// Presence of `geometry_type`'s lattice at `point`, with the wave phase at t=0.
pub fn evaluate(point: Vec3, grid_size: f32, geometry_type: i32) -> f32 {
    evaluate_at(point, grid_size, geometry_type, 0.0)
}

pub fn evaluate_at(point: Vec3, grid_size: f32, geometry_type: i32, time_ms: f32) -> f32 {
    GeometryKind::from_index(geometry_type).evaluate(point, grid_size, time_ms)
}

/// GLSL `smoothstep`. Callers always pass `edge0 < edge1`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// GLSL `fract`: `x - floor(x)`, so negative inputs land in [0,1).
/// A component that overflowed to infinity reads as 0.
pub fn fract(v: Vec3) -> Vec3 {
    let f = v - v.floor();
    Vec3::new(finite_or_zero(f.x), finite_or_zero(f.y), finite_or_zero(f.z))
}

fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// `sin` with a zero phase for arguments that overflowed.
fn wave_sin(x: f32) -> f32 {
    finite_or_zero(x).sin()
}

fn cell(point: Vec3, grid_size: f32) -> Vec3 {
    fract(point * grid_size) - Vec3::splat(0.5)
}

fn band(distance: f32, width: f32) -> f32 {
    1.0 - smoothstep(0.0, width, distance)
}

pub fn tetrahedron_lattice(point: Vec3, grid_size: f32, _time_ms: f32) -> f32 {
    let q = cell(point, grid_size);
    let d1 = q.length();
    let d2 = (q - Vec3::new(0.4, 0.0, 0.0)).length();
    let d3 = (q - Vec3::new(0.0, 0.4, 0.0)).length();
    let d4 = (q - Vec3::new(0.0, 0.0, 0.4)).length();
    let vertices = band(d1.min(d2).min(d3.min(d4)), 0.04);

    let ring = |a: f32, b: f32| band((Vec2::new(a, b).length() - 0.2).abs(), 0.02);
    let edges = 0.0f32
        .max(ring(q.x, q.y))
        .max(ring(q.y, q.z))
        .max(ring(q.x, q.z));

    vertices.max(edges * 0.5)
}

pub fn hypercube_lattice(point: Vec3, grid_size: f32, _time_ms: f32) -> f32 {
    let grid = fract(point * grid_size);
    let edges = (grid - Vec3::splat(0.5)).abs();
    band(edges.x, 0.03)
        .max(band(edges.y, 0.03))
        .max(band(edges.z, 0.03))
}

pub fn sphere_lattice(point: Vec3, grid_size: f32, _time_ms: f32) -> f32 {
    let r = cell(point, grid_size).length();
    1.0 - smoothstep(0.2, 0.5, r)
}

pub fn torus_lattice(point: Vec3, grid_size: f32, _time_ms: f32) -> f32 {
    let q = cell(point, grid_size);
    let r1 = (q.x * q.x + q.y * q.y).sqrt();
    let r2 = ((r1 - 0.3) * (r1 - 0.3) + q.z * q.z).sqrt();
    band(r2, 0.1)
}

pub fn klein_lattice(point: Vec3, grid_size: f32, _time_ms: f32) -> f32 {
    let q = fract(point * grid_size);
    let u = q.x * TAU;
    let v = q.y * TAU;
    let x = u.cos() * (3.0 + (u / 2.0).cos() * v.sin() - (u / 2.0).sin() * (2.0 * v).sin());
    let shell = Vec2::new(x, q.z).length() - 0.1;
    band(shell.abs(), 0.05)
}

pub fn fractal_lattice(point: Vec3, grid_size: f32, _time_ms: f32) -> f32 {
    let mut q = point * grid_size;
    let mut scale = 1.0;
    let mut accumulated = 0.0;
    for _ in 0..4 {
        q = fract(q) - Vec3::splat(0.5);
        accumulated += q.length() / scale;
        scale *= 2.0;
        q *= 2.0;
    }
    1.0 - smoothstep(0.0, 1.0, accumulated)
}

pub fn wave_lattice(point: Vec3, grid_size: f32, time_ms: f32) -> f32 {
    let q = point * grid_size;
    let wave = wave_sin(q.x * 2.0) * wave_sin(q.y * 2.0) * wave_sin(q.z * 2.0 + time_ms * 0.001);
    smoothstep(-0.5, 0.5, wave)
}

pub fn crystal_lattice(point: Vec3, grid_size: f32, _time_ms: f32) -> f32 {
    let d = cell(point, grid_size).abs().max_element();
    1.0 - smoothstep(0.3, 0.5, d)
}
