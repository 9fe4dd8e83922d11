//! Broadphase collision detection over the entity table.
//!
//! The production path sweeps a vertical line across the x axis over each
//! hull's horizontal extent, so only horizontally overlapping pairs reach
//! the separating-axis test. The quadratic scan is kept as a reference
//! for equivalence testing.

use crate::domain::entities::Entity;
use crate::domain::geometry::BoundingBox;
use std::collections::HashMap;

struct Edge {
    x: f64,
    index: usize,
    is_left: bool,
}

/// Reports every colliding pair exactly once via `on_collision`, in
/// O(n log n + k) for k horizontally overlapping pairs.
pub fn resolve_collisions_line_sweep(
    entities: &HashMap<String, Entity>,
    on_collision: &mut impl FnMut(&str, &str),
) {
    let items: Vec<(&str, BoundingBox<'_>)> = entities
        .iter()
        .map(|(id, entity)| (id.as_str(), entity.bounding_box()))
        .collect();

    let mut edges = Vec::with_capacity(items.len() * 2);
    for (index, (_, bounds)) in items.iter().enumerate() {
        let (min_x, max_x) = bounds.horizontal_bounds();
        edges.push(Edge {
            x: min_x,
            index,
            is_left: true,
        });
        edges.push(Edge {
            x: max_x,
            index,
            is_left: false,
        });
    }
    // Left edges before right edges on a tie, so touching extents still
    // enter the window together.
    edges.sort_by(|a, b| {
        a.x.total_cmp(&b.x)
            .then_with(|| b.is_left.cmp(&a.is_left))
    });

    let mut window: Vec<usize> = Vec::new();
    for edge in &edges {
        if edge.is_left {
            for &other in &window {
                if items[edge.index].1.did_collide(&items[other].1) {
                    on_collision(items[edge.index].0, items[other].0);
                }
            }
            window.push(edge.index);
        } else {
            window.retain(|&index| index != edge.index);
        }
    }
}

/// Quadratic reference scan used to cross-check the sweep.
pub fn resolve_collisions_naive(
    entities: &HashMap<String, Entity>,
    on_collision: &mut impl FnMut(&str, &str),
) {
    let items: Vec<(&str, BoundingBox<'_>)> = entities
        .iter()
        .map(|(id, entity)| (id.as_str(), entity.bounding_box()))
        .collect();

    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            if items[i].1.did_collide(&items[j].1) {
                on_collision(items[i].0, items[j].0);
            }
        }
    }
}
