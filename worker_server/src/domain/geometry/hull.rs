// Convex hull construction for procedural asteroid shapes.

use super::vector::Vec2;
use rand::Rng;
use std::cmp::Ordering;

/// Computes the convex hull of `points` with a Graham scan. The hull is
/// returned in anticlockwise order starting at the pivot (minimum y, ties
/// broken by minimum x).
///
/// Exactly-collinear points as seen from the pivot sort in an unspecified
/// relative order, so degenerate inputs produce a hull whose vertex set is
/// correct but whose collinear interior points are kept or dropped
/// nondeterministically.
pub fn convex_hull(points: &[Vec2]) -> Vec<Vec2> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let mut pivot = *first;
    for point in &points[1..] {
        if point.y < pivot.y || (point.y == pivot.y && point.x < pivot.x) {
            pivot = *point;
        }
    }

    let mut remaining: Vec<Vec2> = points
        .iter()
        .copied()
        .filter(|point| *point != pivot)
        .collect();
    sort_points_about(pivot, &mut remaining);

    let mut hull = vec![pivot];
    for point in remaining {
        while hull.len() > 1
            && !is_left_turn(hull[hull.len() - 2], hull[hull.len() - 1], point)
        {
            hull.pop();
        }
        hull.push(point);
    }
    hull
}

/// Shoelace area of a convex hull given in vertex order.
pub fn hull_area(points: &[Vec2]) -> f64 {
    let mut sum = 0.0;
    for i in 0..points.len() {
        let u = points[i];
        let v = points[(i + 1) % points.len()];
        sum += u.cross(v);
    }
    (sum / 2.0).abs()
}

/// A random convex hull with between `min_points` and `max_points` vertices
/// (inclusive). Each candidate coordinate has magnitude uniform in
/// `[min_radius, min_radius + max_radius)` with a random sign.
pub fn random_convex_hull(
    min_points: usize,
    max_points: usize,
    min_radius: f64,
    max_radius: f64,
) -> Vec<Vec2> {
    let mut rng = rand::thread_rng();
    let count = rng.gen_range(min_points..=max_points);
    let points: Vec<Vec2> = (0..count)
        .map(|_| {
            Vec2::new(
                (min_radius + rng.gen::<f64>() * max_radius)
                    .copysign(rng.gen::<f64>() - 0.5),
                (min_radius + rng.gen::<f64>() * max_radius)
                    .copysign(rng.gen::<f64>() - 0.5),
            )
        })
        .collect();
    convex_hull(&points)
}

/// An axis-aligned rectangle hull centered on the origin, anticlockwise.
pub fn rectangle_hull(width: f64, height: f64) -> Vec<Vec2> {
    let (w, h) = (width / 2.0, height / 2.0);
    vec![
        Vec2::new(-w, -h),
        Vec2::new(w, -h),
        Vec2::new(w, h),
        Vec2::new(-w, h),
    ]
}

fn sort_points_about(pivot: Vec2, points: &mut [Vec2]) {
    points.sort_by(|a, b| {
        let angle_a = a.sub(pivot).angle();
        let angle_b = b.sub(pivot).angle();
        angle_a.partial_cmp(&angle_b).unwrap_or(Ordering::Equal)
    });
}

fn is_left_turn(a: Vec2, b: Vec2, c: Vec2) -> bool {
    let u = b.sub(a);
    let v = c.sub(b);
    u.cross(v).atan2(u.dot(v)) > 0.0
}
