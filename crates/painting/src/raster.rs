//! Stroke rasterization
//!
//! One stroke operation covers the union of the shapes that make up a
//! stroked path: a band per segment, discs for round caps and joins, a
//! wedge for bevel joins. Coverage from all shapes is merged by maximum
//! before the pen color is composited, so pixels shared by overlapping
//! segments of the same operation are blended exactly once.

use glam::Vec2;
use tracing::debug;

use crate::style::{LineCap, LineJoin, StrokeStyle};
use crate::surface::Surface;

/// Affected region (x, y, width, height) of a stroke operation
pub type Region = (u32, u32, u32, u32);

#[derive(Debug, Clone, Copy)]
enum Shape {
    /// Body of one segment, flat at both ends
    Band { a: Vec2, b: Vec2 },
    /// Round cap or round join
    Disc { center: Vec2 },
    /// Bevel join filling the outer gap between two bands
    Wedge { a: Vec2, b: Vec2, c: Vec2 },
}

impl Shape {
    fn bounds(&self, half_width: f32) -> (Vec2, Vec2) {
        // One extra pixel for the anti-aliased edge
        let reach = Vec2::splat(half_width + 1.0);
        match *self {
            Shape::Band { a, b } => (a.min(b) - reach, a.max(b) + reach),
            Shape::Disc { center } => (center - reach, center + reach),
            Shape::Wedge { a, b, c } => (a.min(b).min(c) - Vec2::ONE, a.max(b).max(c) + Vec2::ONE),
        }
    }

    fn coverage(&self, p: Vec2, half_width: f32) -> f32 {
        match *self {
            Shape::Band { a, b } => {
                let ab = b - a;
                let len_sq = ab.length_squared();
                if len_sq <= f32::EPSILON {
                    return 0.0;
                }
                let t = (p - a).dot(ab) / len_sq;
                if !(0.0..=1.0).contains(&t) {
                    return 0.0;
                }
                edge_coverage(p.distance(a + ab * t), half_width)
            }
            Shape::Disc { center } => edge_coverage(p.distance(center), half_width),
            Shape::Wedge { a, b, c } => {
                if point_in_triangle(p, a, b, c) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Anti-aliased coverage of a pixel whose centre lies `distance` from the
/// stroke's centre line
#[inline]
pub fn edge_coverage(distance: f32, half_width: f32) -> f32 {
    (half_width + 0.5 - distance).clamp(0.0, 1.0)
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Join shape at vertex `v` between segments prev->v and v->next
fn join_shape(prev: Vec2, v: Vec2, next: Vec2, pen: &StrokeStyle, half_width: f32) -> Shape {
    match pen.join {
        LineJoin::Round => Shape::Disc { center: v },
        LineJoin::Bevel => {
            let incoming = v - prev;
            let outgoing = next - v;
            let mut n_in = incoming.perp().normalize_or_zero() * half_width;
            let mut n_out = outgoing.perp().normalize_or_zero() * half_width;
            // Put the wedge on the outside of the turn
            if incoming.perp_dot(outgoing) > 0.0 {
                n_in = -n_in;
                n_out = -n_out;
            }
            Shape::Wedge {
                a: v,
                b: v + n_in,
                c: v + n_out,
            }
        }
    }
}

/// Decompose a path into coverage shapes
fn outline(points: &[Vec2], closed: bool, pen: &StrokeStyle) -> Vec<Shape> {
    let half_width = pen.width / 2.0;

    if points.len() == 1 {
        let p = points[0];
        if closed {
            return Vec::new();
        }
        return match pen.cap {
            LineCap::Round => vec![Shape::Disc { center: p }],
            LineCap::Square => vec![Shape::Band {
                a: p - Vec2::new(half_width, 0.0),
                b: p + Vec2::new(half_width, 0.0),
            }],
            LineCap::Butt => Vec::new(),
        };
    }

    let mut shapes = Vec::with_capacity(points.len() * 2 + 2);

    if closed {
        let n = points.len();
        for i in 0..n {
            let a = points[i];
            let b = points[(i + 1) % n];
            shapes.push(Shape::Band { a, b });
            let next = points[(i + 2) % n];
            shapes.push(join_shape(a, b, next, pen, half_width));
        }
        return shapes;
    }

    let last_segment = points.len() - 2;
    for (i, pair) in points.windows(2).enumerate() {
        let (mut a, mut b) = (pair[0], pair[1]);
        if pen.cap == LineCap::Square {
            let dir = (b - a).normalize_or_zero();
            if i == 0 {
                a -= dir * half_width;
            }
            if i == last_segment {
                b += dir * half_width;
            }
        }
        shapes.push(Shape::Band { a, b });
    }

    for triple in points.windows(3) {
        shapes.push(join_shape(triple[0], triple[1], triple[2], pen, half_width));
    }

    if pen.cap == LineCap::Round {
        shapes.push(Shape::Disc { center: points[0] });
        shapes.push(Shape::Disc {
            center: points[points.len() - 1],
        });
    }

    shapes
}

impl Surface {
    /// Stroke an open polyline with the current pen in one operation
    pub fn stroke_polyline(&mut self, points: &[Vec2]) -> Option<Region> {
        self.stroke_path(points, false)
    }

    /// Stroke a single straight segment
    pub fn stroke_segment(&mut self, from: Vec2, to: Vec2) -> Option<Region> {
        self.stroke_path(&[from, to], false)
    }

    /// Stroke the outline of the axis-aligned rectangle spanned by two
    /// opposite corners, in either drag direction
    pub fn stroke_rect(&mut self, corner: Vec2, opposite: Vec2) -> Option<Region> {
        let min = corner.min(opposite);
        let max = corner.max(opposite);
        self.stroke_path(
            &[min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
            true,
        )
    }

    /// Stroke a path with the current pen.
    ///
    /// Non-finite points and consecutive duplicates are dropped. Returns the
    /// affected region, or None if nothing landed on the surface.
    pub fn stroke_path(&mut self, points: &[Vec2], closed: bool) -> Option<Region> {
        let mut points: Vec<Vec2> = points.iter().copied().filter(|p| p.is_finite()).collect();
        points.dedup();
        if closed && points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        let pen = self.pen;
        let half_width = pen.width / 2.0;
        if points.is_empty() || !half_width.is_finite() || half_width <= 0.0 {
            return None;
        }

        let shapes = outline(&points, closed, &pen);
        if shapes.is_empty() {
            return None;
        }

        // Stroke bounds, clamped to the surface
        let (mut lo, mut hi) = shapes[0].bounds(half_width);
        for shape in &shapes[1..] {
            let (l, h) = shape.bounds(half_width);
            lo = lo.min(l);
            hi = hi.max(h);
        }
        let (x0, y0, x1, y1) = self.clamp_bounds(lo, hi)?;
        let region_width = x1 - x0;
        let region_height = y1 - y0;

        let mut coverage = vec![0.0f32; (region_width as usize) * (region_height as usize)];
        for shape in &shapes {
            let (l, h) = shape.bounds(half_width);
            let Some((sx0, sy0, sx1, sy1)) = self.clamp_bounds(l, h) else {
                continue;
            };
            for py in sy0..sy1 {
                for px in sx0..sx1 {
                    let centre = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                    let value = shape.coverage(centre, half_width);
                    if value > 0.0 {
                        let slot = &mut coverage
                            [((py - y0) * region_width + (px - x0)) as usize];
                        *slot = slot.max(value);
                    }
                }
            }
        }

        for py in y0..y1 {
            for px in x0..x1 {
                let value = coverage[((py - y0) * region_width + (px - x0)) as usize];
                if value > 0.0 {
                    self.blend_pixel(px, py, pen.color, value);
                }
            }
        }

        debug!(
            "stroke_path: {} points ({} shapes, closed={}) -> ({}, {}) {}x{}",
            points.len(),
            shapes.len(),
            closed,
            x0,
            y0,
            region_width,
            region_height
        );
        self.damage.mark_region(x0, y0, region_width, region_height);
        Some((x0, y0, region_width, region_height))
    }

    /// Clamp float bounds to pixel bounds [x0, x1) x [y0, y1) on the surface
    fn clamp_bounds(&self, lo: Vec2, hi: Vec2) -> Option<(u32, u32, u32, u32)> {
        let x0 = (lo.x.floor().max(0.0) as u32).min(self.width());
        let y0 = (lo.y.floor().max(0.0) as u32).min(self.height());
        let x1 = (hi.x.ceil().max(0.0) as u32).min(self.width());
        let y1 = (hi.y.ceil().max(0.0) as u32).min(self.height());
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }
}
