use glam::Vec2;

use holo_layers::interaction::{DecayMode, InteractionTracker, CLICK_PULSE};
use holo_layers::layers::LayerRole;

const FRAME_MS: f64 = 16.7;

#[test]
fn click_pulses_and_caps() {
    let mut t = InteractionTracker::default();
    t.click();
    assert!((t.click_intensity(LayerRole::Content) - CLICK_PULSE).abs() < 1e-6);
    for _ in 0..10 {
        t.click();
    }
    for role in LayerRole::ALL {
        assert_eq!(t.click_intensity(role), 1.0);
    }
}

#[test]
fn per_frame_decay_law() {
    let mut t = InteractionTracker::default();
    for _ in 0..4 {
        t.click();
    }
    assert_eq!(t.click_intensity(LayerRole::Content), 1.0);
    for n in 1..=200 {
        t.decay(LayerRole::Content, FRAME_MS);
        let expected = 0.95f32.powi(n);
        let got = t.click_intensity(LayerRole::Content);
        assert!(got >= 0.0);
        assert!(
            (got - expected).abs() <= expected * 1e-4,
            "frame {n}: {got} vs {expected}"
        );
    }
}

#[test]
fn single_click_fades_below_one_percent_within_68_frames() {
    let mut t = InteractionTracker::default();
    t.click();
    let role = LayerRole::Content;
    assert!((t.snapshot(role).click_intensity - 0.3).abs() < 1e-6);

    let mut frames = 0;
    while t.click_intensity(role) >= 0.01 {
        t.decay(role, FRAME_MS);
        frames += 1;
        assert!(frames <= 68, "still {} after 68 frames", t.click_intensity(role));
    }
    assert!(frames > 60);
}

#[test]
fn layers_decay_independently() {
    let mut t = InteractionTracker::default();
    t.click();
    for _ in 0..10 {
        t.decay(LayerRole::Accent, FRAME_MS);
    }
    assert!((t.click_intensity(LayerRole::Background) - 0.3).abs() < 1e-6);
    assert!(t.click_intensity(LayerRole::Accent) < 0.2);
}

#[test]
fn timed_decay_ignores_frame_rate() {
    let mode = DecayMode::Timed { frame_budget_ms: 16.0 };
    let mut fast = InteractionTracker::new(mode);
    let mut slow = InteractionTracker::new(mode);
    fast.click();
    slow.click();
    for _ in 0..8 {
        fast.decay(LayerRole::Content, 8.0);
    }
    for _ in 0..2 {
        slow.decay(LayerRole::Content, 32.0);
    }
    let a = fast.click_intensity(LayerRole::Content);
    let b = slow.click_intensity(LayerRole::Content);
    assert!((a - b).abs() < 1e-5, "{a} vs {b}");
}

#[test]
fn drag_follows_latest_event() {
    let mut t = InteractionTracker::default();
    t.pointer_move(0.2, 0.8, 12.0, 16.0);
    assert!((t.snapshot(LayerRole::Content).drag_intensity - 0.5).abs() < 1e-6);
    t.pointer_move(0.2, 0.8, 30.0, 40.0);
    assert_eq!(t.snapshot(LayerRole::Content).drag_intensity, 1.0);
    t.pointer_move(0.2, 0.8, 0.0, 0.0);
    assert_eq!(t.snapshot(LayerRole::Content).drag_intensity, 0.0);
}

#[test]
fn client_coordinates_flip_y() {
    let mut t = InteractionTracker::default();
    assert_eq!(t.snapshot(LayerRole::Shadow).pointer, Vec2::splat(0.5));
    t.pointer_move_client(200.0, 150.0, Vec2::new(800.0, 600.0), 0.0, 0.0);
    let p = t.snapshot(LayerRole::Shadow).pointer;
    assert!((p.x - 0.25).abs() < 1e-6);
    assert!((p.y - 0.75).abs() < 1e-6);
}

#[test]
fn combined_intensity_sums_both_signals() {
    let mut t = InteractionTracker::default();
    t.pointer_move(0.5, 0.5, 0.0, 20.0);
    t.click();
    let s = t.snapshot(LayerRole::Highlight);
    assert!((s.combined() - 0.8).abs() < 1e-6);
}
