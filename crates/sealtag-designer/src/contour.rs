//! Closed 2D polylines assembled from a path command stream.

use sealtag_core::Point2D;
use tracing::trace;

use crate::flatten::{flatten_cubic, flatten_quadratic, DEFAULT_CURVE_SAMPLES};
use crate::outline::PathCommand;

/// Consecutive points closer than this are merged
pub const CONTOUR_EPSILON: f64 = 1e-6;

/// A closed polygon; the last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point2D>,
}

impl Contour {
    /// Builds a contour after merging near-duplicate neighbours and dropping
    /// a trailing copy of the first point. Returns `None` when fewer than
    /// three points remain.
    pub fn new(points: Vec<Point2D>) -> Option<Self> {
        let mut cleaned: Vec<Point2D> = Vec::with_capacity(points.len());
        for p in points {
            if cleaned
                .last()
                .is_some_and(|last| last.distance_to(&p) < CONTOUR_EPSILON)
            {
                continue;
            }
            cleaned.push(p);
        }
        while cleaned.len() > 1
            && cleaned[0].distance_to(&cleaned[cleaned.len() - 1]) < CONTOUR_EPSILON
        {
            cleaned.pop();
        }
        if cleaned.len() < 3 {
            return None;
        }
        Some(Self { points: cleaned })
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Point2D {
        self.points[0]
    }

    /// Shoelace area; positive for outers in y-down glyph space
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut sum = 0.0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            sum += p.x * q.y - q.x * p.y;
        }
        0.5 * sum
    }

    /// Even-odd ray casting; points exactly on the boundary may go either way
    pub fn contains(&self, p: &Point2D) -> bool {
        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Same loop, opposite winding
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }
}

/// Incremental contour assembly.
///
/// Open buffers are finalized by `MoveTo`, `Close` or [`finish`](Self::finish);
/// no closing segment is synthesized since contours are implicitly closed.
#[derive(Debug)]
pub struct ContourBuilder {
    samples: usize,
    contours: Vec<Contour>,
    buffer: Vec<Point2D>,
    cursor: Point2D,
    start: Point2D,
}

impl Default for ContourBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CURVE_SAMPLES)
    }
}

impl ContourBuilder {
    pub fn new(samples: usize) -> Self {
        Self {
            samples: samples.max(1),
            contours: Vec::new(),
            buffer: Vec::new(),
            cursor: Point2D::default(),
            start: Point2D::default(),
        }
    }

    pub fn push(&mut self, command: &PathCommand) {
        match *command {
            PathCommand::MoveTo(p) => {
                self.flush();
                self.buffer.push(p);
                self.start = p;
                self.cursor = p;
            }
            PathCommand::LineTo(p) => {
                self.begin_if_empty();
                self.buffer.push(p);
                self.cursor = p;
            }
            PathCommand::QuadTo { ctrl, to } => {
                self.begin_if_empty();
                let pts = flatten_quadratic(self.cursor, ctrl, to, self.samples);
                self.buffer.extend(pts);
                self.cursor = to;
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                self.begin_if_empty();
                let pts = flatten_cubic(self.cursor, ctrl1, ctrl2, to, self.samples);
                self.buffer.extend(pts);
                self.cursor = to;
            }
            PathCommand::Close => {
                self.flush();
                self.cursor = self.start;
            }
        }
    }

    /// Finalizes any open buffer and returns the contours in stream order
    pub fn finish(mut self) -> Vec<Contour> {
        self.flush();
        self.contours
    }

    // Drawing after a Close without a MoveTo continues from the cursor.
    fn begin_if_empty(&mut self) {
        if self.buffer.is_empty() {
            self.buffer.push(self.cursor);
            self.start = self.cursor;
        }
    }

    fn flush(&mut self) {
        let points = std::mem::take(&mut self.buffer);
        if points.len() <= 2 {
            if !points.is_empty() {
                trace!("dropping {}-point contour", points.len());
            }
            return;
        }
        match Contour::new(points) {
            Some(contour) => self.contours.push(contour),
            None => trace!("dropping contour degenerate after merging"),
        }
    }
}

/// Assembles a whole command stream into contours
pub fn build_contours(commands: &[PathCommand], samples: usize) -> Vec<Contour> {
    let mut builder = ContourBuilder::new(samples);
    for command in commands {
        builder.push(command);
    }
    builder.finish()
}
