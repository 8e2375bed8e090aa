//! Bezier curve flattening.
//!
//! Curves are sampled at `n` evenly spaced parameters in `(0, 1]`. The start
//! point is not emitted since it is already the last point of the polyline
//! being extended.

use sealtag_core::Point2D;

/// Samples per curve segment when none is configured
pub const DEFAULT_CURVE_SAMPLES: usize = 8;

/// Flattens a quadratic Bezier into `samples` points ending at `end`.
///
/// `samples == 0` is treated as 1.
pub fn flatten_quadratic(
    start: Point2D,
    ctrl: Point2D,
    end: Point2D,
    samples: usize,
) -> Vec<Point2D> {
    let n = samples.max(1);
    let mut out = Vec::with_capacity(n);
    for i in 1..n {
        let t = i as f64 / n as f64;
        let mt = 1.0 - t;
        let (a, b, c) = (mt * mt, 2.0 * mt * t, t * t);
        out.push(Point2D::new(
            a * start.x + b * ctrl.x + c * end.x,
            a * start.y + b * ctrl.y + c * end.y,
        ));
    }
    out.push(end);
    out
}

/// Flattens a cubic Bezier into `samples` points ending at `end`.
///
/// `samples == 0` is treated as 1.
pub fn flatten_cubic(
    start: Point2D,
    ctrl1: Point2D,
    ctrl2: Point2D,
    end: Point2D,
    samples: usize,
) -> Vec<Point2D> {
    let n = samples.max(1);
    let mut out = Vec::with_capacity(n);
    for i in 1..n {
        let t = i as f64 / n as f64;
        let mt = 1.0 - t;
        let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
        out.push(Point2D::new(
            a * start.x + b * ctrl1.x + c * ctrl2.x + d * end.x,
            a * start.y + b * ctrl1.y + c * ctrl2.y + d * end.y,
        ));
    }
    out.push(end);
    out
}
