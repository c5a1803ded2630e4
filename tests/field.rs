use glam::Vec3;

use holo_layers::field::{evaluate, evaluate_at, geometry_name, GeometryKind};

fn sample_points() -> impl Iterator<Item = Vec3> {
    let coords = [-3.7, -1.0, -0.49, -0.01, 0.0, 0.013, 0.25, 0.5, 0.77, 1.0, 2.31, 5.5];
    coords.into_iter().flat_map(move |x| {
        coords
            .into_iter()
            .step_by(2)
            .flat_map(move |y| [-0.15f32, 0.0, 0.07, 0.15].map(|z| Vec3::new(x, y, z)))
    })
}

const GRIDS: [f32; 6] = [0.1, 0.4, 1.0, 1.2, 2.0, 7.5];

#[test]
fn presence_stays_in_unit_interval() {
    for geometry in 0..8 {
        for grid in GRIDS {
            for p in sample_points() {
                for t in [0.0, 1234.5, 86_400_000.0] {
                    let v = evaluate_at(p, grid, geometry, t);
                    assert!(
                        (0.0..=1.0).contains(&v),
                        "geometry {geometry} grid {grid} p {p} t {t}: {v}"
                    );
                }
            }
        }
    }

    // scaled coordinates that overflow to infinity must not leak NaN
    let huge = [
        Vec3::splat(3.0e38),
        Vec3::splat(-f32::MAX),
        Vec3::new(f32::MAX, 0.25, -0.1),
        Vec3::new(1.0e30, -2.0e35, f32::MAX),
    ];
    for geometry in 0..8 {
        for grid in GRIDS {
            for p in huge {
                let v = evaluate(p, grid, geometry);
                assert!(
                    (0.0..=1.0).contains(&v),
                    "geometry {geometry} grid {grid} p {p}: {v}"
                );
            }
        }
    }
}

#[test]
fn evaluation_is_deterministic() {
    for geometry in 0..8 {
        for p in sample_points() {
            let a = evaluate(p, 1.3, geometry);
            let b = evaluate(p, 1.3, geometry);
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}

#[test]
fn dispatch_has_period_eight() {
    for geometry in -16..16 {
        for p in sample_points().step_by(7) {
            assert_eq!(
                evaluate(p, 2.0, geometry).to_bits(),
                evaluate(p, 2.0, geometry + 8).to_bits(),
                "geometry {geometry}"
            );
        }
    }
}

#[test]
fn negative_indices_wrap_upward() {
    assert_eq!(GeometryKind::from_index(-1), GeometryKind::Crystal);
    assert_eq!(GeometryKind::from_index(-8), GeometryKind::Tetrahedron);
    assert_eq!(GeometryKind::from_index(12), GeometryKind::Klein);
}

#[test]
fn every_geometry_is_reachable_and_distinct() {
    for (i, kind) in GeometryKind::ALL.iter().enumerate() {
        assert_eq!(kind.index(), i as i32);
        assert_eq!(GeometryKind::from_index(i as i32), *kind);
    }
    // each field paints a different pattern over the same samples
    let signature = |g: i32| -> Vec<u32> { sample_points().map(|p| evaluate(p, 1.0, g).to_bits()).collect() };
    for a in 0..8 {
        for b in (a + 1)..8 {
            assert_ne!(signature(a), signature(b), "{a} vs {b}");
        }
    }
}

#[test]
fn names_do_not_wrap() {
    assert_eq!(geometry_name(0), "TETRAHEDRON");
    assert_eq!(geometry_name(4), "KLEIN BOTTLE");
    assert_eq!(geometry_name(7), "CRYSTAL");
    assert_eq!(geometry_name(8), "UNKNOWN");
    assert_eq!(geometry_name(-1), "UNKNOWN");
}
