use smallvec::smallvec;

use super::*;
use crate::foundation::core::Rgb8;

fn stop(offset: f64, color: Rgb8, alpha: f32) -> ColorStop {
    ColorStop {
        offset,
        color,
        alpha,
    }
}

fn red_green_blue(alpha: f32) -> Vec<ColorStop> {
    vec![
        stop(0.0, Rgb8::new(255, 0, 0), alpha),
        stop(0.5, Rgb8::new(0, 255, 0), alpha),
        stop(1.0, Rgb8::new(0, 0, 255), alpha),
    ]
}

#[test]
fn stops_hit_exact_colors() {
    let stops = red_green_blue(1.0);
    assert_eq!(sample_stops(&stops, 0.0), [255, 0, 0, 255]);
    assert_eq!(sample_stops(&stops, 0.5), [0, 255, 0, 255]);
    assert_eq!(sample_stops(&stops, 1.0), [0, 0, 255, 255]);
    assert_eq!(sample_stops(&stops, -3.0), [255, 0, 0, 255]);
    assert_eq!(sample_stops(&stops, 7.0), [0, 0, 255, 255]);
    assert_eq!(sample_stops(&stops, 0.25), [128, 128, 0, 255]);
}

#[test]
fn stop_alpha_is_premultiplied() {
    let stops = vec![stop(0.0, Rgb8::WHITE, 0.8)];
    assert_eq!(sample_stops(&stops, 0.3), [204, 204, 204, 204]);
    assert_eq!(sample_stops(&[], 0.3), [0, 0, 0, 0]);
}

#[test]
fn linear_projects_onto_axis() {
    let paint = TrianglePaint::Linear {
        start: Point::new(0.0, 0.0),
        end: Point::new(10.0, 0.0),
        stops: smallvec![
            stop(0.0, Rgb8::BLACK, 1.0),
            stop(1.0, Rgb8::WHITE, 1.0)
        ],
    };
    let g = GradientSampler::new(&paint).unwrap();
    assert_eq!(g.offset_at(Point::new(5.0, 40.0)), 0.5);
    assert_eq!(g.offset_at(Point::new(-5.0, 0.0)), 0.0);
    assert_eq!(g.offset_at(Point::new(25.0, 1.0)), 1.0);
    assert_eq!(g.sample(Point::new(10.0, 3.0)), [255, 255, 255, 255]);
}

#[test]
fn degenerate_linear_paints_nothing() {
    let p = Point::new(3.0, 3.0);
    let paint = TrianglePaint::Linear {
        start: p,
        end: p,
        stops: smallvec![stop(0.0, Rgb8::WHITE, 1.0)],
    };
    assert!(GradientSampler::new(&paint).is_none());
}

#[test]
fn sweep_runs_clockwise_from_positive_x() {
    let paint = TrianglePaint::Sweep {
        center: Point::new(0.0, 0.0),
        start_angle: 0.0,
        stops: red_green_blue(1.0).into_iter().collect(),
    };
    let g = GradientSampler::new(&paint).unwrap();
    assert!(g.offset_at(Point::new(1.0, 0.0)).abs() < 1e-12);
    // Straight down on screen is a quarter turn clockwise.
    assert!((g.offset_at(Point::new(0.0, 1.0)) - 0.25).abs() < 1e-12);
    assert!((g.offset_at(Point::new(-1.0, 0.0)) - 0.5).abs() < 1e-12);
    assert!((g.offset_at(Point::new(0.0, -1.0)) - 0.75).abs() < 1e-12);
}

#[test]
fn sweep_respects_start_angle() {
    let paint = TrianglePaint::Sweep {
        center: Point::new(0.0, 0.0),
        start_angle: std::f64::consts::FRAC_PI_2,
        stops: red_green_blue(1.0).into_iter().collect(),
    };
    let g = GradientSampler::new(&paint).unwrap();
    assert!(g.offset_at(Point::new(0.0, 1.0)).abs() < 1e-12);
    assert!((g.offset_at(Point::new(1.0, 0.0)) - 0.75).abs() < 1e-12);
}
