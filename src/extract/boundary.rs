//! External boundary tracing over binary edge maps.
//!
//! Moore neighbor following with eight-connectivity: scan the map in row
//! order, and for each connected component trace the walk around its outer
//! boundary starting from the first pixel the scan reaches (which is always
//! on that boundary). The whole component is then marked visited, so a
//! hollow component contributes exactly one external contour and its inner
//! boundary is never traced. The scan order makes the output deterministic
//! for a given edge map.

use crate::contour::{Contour, Point};
use crate::extract::canny::EdgeMap;
use std::collections::VecDeque;

const NEIGHBORS_8: [(i32, i32); 8] = [
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
    (-1, -1), // NW
    (0, -1),  // N
    (1, -1),  // NE
];

fn in_bounds(x: i32, y: i32, w: i32, h: i32) -> bool {
    x >= 0 && y >= 0 && x < w && y < h
}

fn is_set(map: &EdgeMap, x: i32, y: i32) -> bool {
    let w = map.width as i32;
    let h = map.height as i32;
    in_bounds(x, y, w, h) && map.data[(y * w + x) as usize] > 0
}

fn follow_boundary(map: &EdgeMap, sx: i32, sy: i32) -> Vec<Point> {
    let mut points = Vec::new();
    let mut current = (sx, sy);
    let mut prev_dir = 4usize; // pretend we arrived from the west
    let start = current;
    let start_prev_dir = prev_dir;
    let max_steps = (map.width * map.height).saturating_mul(8).max(32);

    for _ in 0..max_steps {
        points.push(Point {
            x: current.0,
            y: current.1,
        });

        let mut next = None;
        for step in 1..=8 {
            let k = (prev_dir + step) % 8;
            let nx = current.0 + NEIGHBORS_8[k].0;
            let ny = current.1 + NEIGHBORS_8[k].1;
            if is_set(map, nx, ny) {
                // Resume the clockwise search from the neighbor preceding k.
                prev_dir = (k + 6) % 8;
                next = Some((nx, ny));
                break;
            }
        }

        let Some(next) = next else { break };
        if next == start && prev_dir == start_prev_dir && points.len() > 1 {
            break;
        }
        current = next;
    }

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Marks every pixel of the 8-connected component containing `(sx, sy)`.
fn mark_component(map: &EdgeMap, sx: i32, sy: i32, visited: &mut [bool]) {
    let w = map.width as i32;
    let mut queue = VecDeque::new();
    visited[(sy * w + sx) as usize] = true;
    queue.push_back((sx, sy));

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in NEIGHBORS_8 {
            let nx = x + dx;
            let ny = y + dy;
            if !is_set(map, nx, ny) {
                continue;
            }
            let nidx = (ny * w + nx) as usize;
            if !visited[nidx] {
                visited[nidx] = true;
                queue.push_back((nx, ny));
            }
        }
    }
}

/// Traces the external boundary of every connected edge component.
pub(crate) fn external_contours(map: &EdgeMap) -> Vec<Contour> {
    let w = map.width as i32;
    let h = map.height as i32;
    let mut visited = vec![false; map.width * map.height];
    let mut contours = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) as usize;
            if visited[idx] || !is_set(map, x, y) {
                continue;
            }
            // Row-order scanning reaches a component first at a pixel on
            // its outer boundary.
            let points = follow_boundary(map, x, y);
            mark_component(map, x, y, &mut visited);
            if points.len() >= 3 {
                contours.push(Contour::new(points));
            }
        }
    }

    contours
}
