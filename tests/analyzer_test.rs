//! Motion analyzer behaviour: velocity history, swipes, circles, holds


use gesture_conductor::analyzer::{classify_swipe, CircularMotion, Rotation, SwipeDirection};
use gesture_conductor::config::AnalyzerConfig;
use gesture_conductor::events::GestureKind;
use proptest::prelude::*;
use test_helpers::*;

#[test]
fn test_average_velocity_neutral_below_two_samples() {
    let (mut analyzer, clock) = manual_analyzer(0.0);
    assert_eq!(analyzer.average_velocity(0.3), (0.0, 0.0));

    analyzer.add_position(0.4, 0.4);
    clock.advance(0.05);
    assert_eq!(analyzer.average_velocity(0.3), (0.0, 0.0));
    assert_eq!(analyzer.gesture_intensity(), 0.0);
}

#[test]
fn test_swipe_up_scenario() {
    let (mut analyzer, clock) = manual_analyzer(10.0);
    feed(&mut analyzer, &clock, &[(0.5, 0.8, 10.0), (0.5, 0.6, 10.1), (0.5, 0.4, 10.2)]);

    assert!(analyzer.detect_swipe_up());
    assert!(!analyzer.detect_swipe_down());
    assert!(!analyzer.detect_swipe_left());
    assert!(!analyzer.detect_swipe_right());
    assert_eq!(analyzer.detect_swipe(), Some(SwipeDirection::Up));
}

#[test]
fn test_swipe_each_direction() {
    let cases = [
        ((0.5, 0.2), (0.5, 0.4), SwipeDirection::Down),
        ((0.8, 0.5), (0.6, 0.5), SwipeDirection::Left),
        ((0.2, 0.5), (0.4, 0.5), SwipeDirection::Right),
    ];
    for (from, to, expected) in cases {
        let (mut analyzer, clock) = manual_analyzer(0.0);
        feed(&mut analyzer, &clock, &[(from.0, from.1, 0.0), (to.0, to.1, 0.1)]);
        assert_eq!(analyzer.detect_swipe(), Some(expected), "{:?} -> {:?}", from, to);
    }
}

#[test]
fn test_slow_motion_is_not_a_swipe() {
    let (mut analyzer, clock) = manual_analyzer(0.0);
    feed(&mut analyzer, &clock, &[(0.5, 0.5, 0.0), (0.51, 0.5, 0.1), (0.52, 0.5, 0.2)]);
    assert_eq!(analyzer.detect_swipe(), None);
}

#[test]
fn test_circle_clockwise_scenario() {
    let (mut analyzer, clock) = manual_analyzer(0.0);
    for (i, (x, y)) in circle_points((0.5, 0.5), 0.1, 8, true).into_iter().enumerate() {
        clock.set(i as f64 * 0.05);
        analyzer.add_position(x, y);
    }

    let motion = analyzer.detect_circular_motion();
    assert!(motion.is_circular);
    assert!(motion.direction > 0);
    assert_eq!(motion.direction, 7);
    assert_eq!(motion.rotation(), Some(Rotation::Clockwise));
}

#[test]
fn test_circle_counterclockwise_has_opposite_sign() {
    let (mut analyzer, clock) = manual_analyzer(0.0);
    for (i, (x, y)) in circle_points((0.5, 0.5), 0.1, 8, false).into_iter().enumerate() {
        clock.set(i as f64 * 0.05);
        analyzer.add_position(x, y);
    }

    let motion = analyzer.detect_circular_motion();
    assert!(motion.is_circular);
    assert_eq!(motion.direction, -7);
    assert_eq!(motion.rotation(), Some(Rotation::CounterClockwise));
}

/// One revolution, clockwise on screen, with radii alternating between `inner` and `outer`
fn lopsided_circle(inner: f64, outer: f64) -> Vec<(f64, f64)> {
    (0..8)
        .map(|i| {
            let theta = std::f64::consts::PI * i as f64 / 4.0;
            let r = if i % 2 == 0 { inner } else { outer };
            (0.5 + r * theta.cos(), 0.5 + r * theta.sin())
        })
        .collect()
}

#[test]
fn test_uneven_radii_still_circular() {
    // mean radius 0.1, radius variance 0.0016
    let (mut analyzer, clock) = manual_analyzer(0.0);
    for (i, (x, y)) in lopsided_circle(0.06, 0.14).into_iter().enumerate() {
        clock.set(i as f64 * 0.05);
        analyzer.add_position(x, y);
    }
    let motion = analyzer.detect_circular_motion();
    assert!(motion.is_circular);
    assert_eq!(motion.direction, 7);
}

#[test]
fn test_radius_variance_limit() {
    // mean radius 0.6, radius variance 0.25 > 0.3 * 0.6
    let (mut analyzer, clock) = manual_analyzer(0.0);
    for (i, (x, y)) in lopsided_circle(0.1, 1.1).into_iter().enumerate() {
        clock.set(i as f64 * 0.05);
        analyzer.add_position(x, y);
    }
    let motion = analyzer.detect_circular_motion();
    assert!(!motion.is_circular);
    assert_eq!(motion.direction, 7);
}

#[test]
fn test_small_circle_rejected() {
    let (mut analyzer, clock) = manual_analyzer(0.0);
    for (i, (x, y)) in circle_points((0.5, 0.5), 0.02, 8, true).into_iter().enumerate() {
        clock.set(i as f64 * 0.05);
        analyzer.add_position(x, y);
    }
    let motion = analyzer.detect_circular_motion();
    assert!(!motion.is_circular);
    assert_eq!(motion.rotation(), None);
}

#[test]
fn test_oscillation_is_not_circular() {
    // back and forth along an arc: radii agree but the rotation sense flips
    let (mut analyzer, clock) = manual_analyzer(0.0);
    let arc = circle_points((0.5, 0.5), 0.1, 16, true);
    let path = [arc[0], arc[1], arc[2], arc[1], arc[0], arc[1], arc[2], arc[1]];
    for (i, (x, y)) in path.into_iter().enumerate() {
        clock.set(i as f64 * 0.05);
        analyzer.add_position(x, y);
    }
    assert!(!analyzer.detect_circular_motion().is_circular);
}

#[test]
fn test_circle_uses_only_recent_window() {
    let (mut analyzer, clock) = manual_analyzer(0.0);
    // a straight line first, then a full circle that fills the window
    let mut t = 0.0;
    for i in 0..5 {
        clock.set(t);
        analyzer.add_position(0.1 + 0.05 * f64::from(i), 0.9);
        t += 0.05;
    }
    for (x, y) in circle_points((0.5, 0.5), 0.1, 8, true) {
        clock.set(t);
        analyzer.add_position(x, y);
        t += 0.05;
    }
    assert_eq!(analyzer.detect_circular_motion().rotation(), Some(Rotation::Clockwise));
}

#[test]
fn test_circular_needs_three_samples() {
    let (mut analyzer, clock) = manual_analyzer(0.0);
    feed(&mut analyzer, &clock, &[(0.6, 0.5, 0.0), (0.5, 0.6, 0.05)]);
    assert_eq!(analyzer.detect_circular_motion(), CircularMotion::default());
}

#[test]
fn test_static_hold_scenario() {
    let (mut analyzer, clock) = manual_analyzer(0.0);
    for i in 0..30 {
        clock.set(f64::from(i) * FRAME_DT);
        analyzer.add_position(0.5 + 0.001 * f64::from(i % 3), 0.5);
    }
    assert!(analyzer.detect_static_hold());
}

#[test]
fn test_static_hold_rejects_drift() {
    let (mut analyzer, clock) = manual_analyzer(0.0);
    for i in 0..10 {
        clock.set(f64::from(i) * 0.1);
        analyzer.add_position(0.3 + 0.01 * f64::from(i), 0.5);
    }
    assert!(!analyzer.detect_static_hold());
}

#[test]
fn test_static_hold_uses_euclidean_distance() {
    // 0.015 in x and y from the centroid: 0.021 away, above the 0.02 limit,
    // though each axis alone is below it
    let (mut analyzer, clock) = manual_analyzer(0.0);
    feed(
        &mut analyzer,
        &clock,
        &[(0.485, 0.485, 0.0), (0.515, 0.515, 0.1), (0.485, 0.485, 0.2), (0.515, 0.515, 0.3)],
    );
    assert!(!analyzer.detect_static_hold());
}

#[test]
fn test_intensity_scales_with_speed() {
    let (mut slow, slow_clock) = manual_analyzer(0.0);
    feed(&mut slow, &slow_clock, &[(0.5, 0.5, 0.0), (0.55, 0.5, 0.1)]);
    let (mut fast, fast_clock) = manual_analyzer(0.0);
    feed(&mut fast, &fast_clock, &[(0.5, 0.5, 0.0), (0.6, 0.5, 0.1)]);

    assert!((slow.gesture_intensity() - 0.25).abs() < 1e-9);
    assert!((fast.gesture_intensity() - 0.5).abs() < 1e-9);
}

#[test]
fn test_rotation_intensity_does_not_cancel_on_circle() {
    let (mut analyzer, clock) = manual_analyzer(0.0);
    for (i, (x, y)) in circle_points((0.5, 0.5), 0.1, 8, true).into_iter().enumerate() {
        clock.set(i as f64 * 0.05);
        analyzer.add_position(x, y);
    }
    assert!(analyzer.rotation_intensity() > analyzer.gesture_intensity());
    assert!(analyzer.rotation_intensity() > 0.5);
}

#[test]
fn test_cooldown_true_then_false() {
    let (mut analyzer, clock) = manual_analyzer(3.0);
    for kind in GestureKind::ALL {
        assert!(analyzer.can_trigger(kind));
        analyzer.mark_triggered(kind);
        clock.advance(0.1);
        assert!(!analyzer.can_trigger(kind), "{} re-armed early", kind);
    }
}

#[test]
fn test_clear_history_matches_fresh_analyzer() {
    let (fresh, _fresh_clock) = manual_analyzer(0.0);
    let (mut used, clock) = manual_analyzer(0.0);
    for (i, (x, y)) in circle_points((0.5, 0.5), 0.1, 8, true).into_iter().enumerate() {
        clock.set(i as f64 * 0.05);
        used.add_position(x, y);
    }
    used.clear_history();

    assert_eq!(used.average_velocity(0.3), fresh.average_velocity(0.3));
    assert_eq!(used.detect_swipe(), fresh.detect_swipe());
    assert_eq!(used.detect_circular_motion(), fresh.detect_circular_motion());
    assert_eq!(used.detect_static_hold(), fresh.detect_static_hold());
    assert_eq!(used.gesture_intensity(), fresh.gesture_intensity());
    assert_eq!(used.positions().len(), fresh.positions().len());
}

#[test]
fn test_custom_thresholds() {
    let config = AnalyzerConfig {
        swipe_threshold: 3.0,
        ..AnalyzerConfig::default()
    };
    let (mut analyzer, clock) = manual_analyzer_with(config, 0.0);
    feed(&mut analyzer, &clock, &[(0.5, 0.8, 0.0), (0.5, 0.6, 0.1)]);
    assert_eq!(analyzer.detect_swipe(), None);
}

proptest! {
    #[test]
    fn prop_velocity_history_shorter_than_positions(
        steps in prop::collection::vec((0.0f64..1.0, 0.0f64..1.0, -0.05f64..0.1), 0..40)
    ) {
        let (mut analyzer, clock) = manual_analyzer(0.0);
        let mut t = 0.0;
        for (x, y, dt) in steps {
            t += dt;
            clock.set(t);
            analyzer.add_position(x, y);
            prop_assert!(analyzer.velocities().len() + 1 <= analyzer.positions().len());
            prop_assert!(analyzer.positions().len() <= analyzer.config().history_size);
        }
    }

    #[test]
    fn prop_non_positive_dt_records_no_velocity(
        x0 in 0.0f64..1.0, y0 in 0.0f64..1.0,
        x1 in 0.0f64..1.0, y1 in 0.0f64..1.0,
        back in 0.0f64..1.0
    ) {
        let (mut analyzer, clock) = manual_analyzer(5.0);
        analyzer.add_position(x0, y0);
        clock.set(5.0 - back);
        analyzer.add_position(x1, y1);
        prop_assert!(analyzer.velocities().is_empty());
        prop_assert_eq!(analyzer.positions().len(), 2);
    }

    #[test]
    fn prop_swipe_up_down_exclusive(vx in -5.0f64..5.0, vy in -5.0f64..5.0) {
        let direction = classify_swipe(vx, vy, 0.3, 0.5);
        let up = direction == Some(SwipeDirection::Up);
        let down = direction == Some(SwipeDirection::Down);
        prop_assert!(!(up && down));
        // vertical and horizontal never both qualify
        let vertical = vy.abs() > 0.3 && vx.abs() < vy.abs() * 0.5;
        let horizontal = vx.abs() > 0.3 && vy.abs() < vx.abs() * 0.5;
        prop_assert!(!(vertical && horizontal));
    }

    #[test]
    fn prop_intensity_in_unit_range(
        points in prop::collection::vec((0.0f64..1.0, 0.0f64..1.0), 2..12)
    ) {
        let (mut analyzer, clock) = manual_analyzer(0.0);
        for (i, (x, y)) in points.into_iter().enumerate() {
            clock.set(i as f64 * 0.02);
            analyzer.add_position(x, y);
        }
        let intensity = analyzer.gesture_intensity();
        prop_assert!((0.0..=1.0).contains(&intensity));
        let rotation = analyzer.rotation_intensity();
        prop_assert!((0.0..=1.0).contains(&rotation));
    }

    #[test]
    fn prop_rotation_reverses_with_traversal(radius in 0.06f64..0.3, n in 6usize..10) {
        let window = AnalyzerConfig::default().circular_window;
        let n = n.min(window);
        let run = |clockwise: bool| {
            let (mut analyzer, clock) = manual_analyzer(0.0);
            for (i, (x, y)) in circle_points((0.5, 0.5), radius, n, clockwise).into_iter().enumerate() {
                clock.set(i as f64 * 0.05);
                analyzer.add_position(x, y);
            }
            analyzer.detect_circular_motion()
        };
        let cw = run(true);
        let ccw = run(false);
        prop_assert!(cw.direction > 0);
        prop_assert_eq!(cw.direction, -ccw.direction);
    }
}
