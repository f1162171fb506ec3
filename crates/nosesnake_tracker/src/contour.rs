//! # Nose Contour Stage
//!
//! Default [`ContourStage`]: fills the convex hull of the nose landmarks,
//! keeps the pixels at or above the threshold and returns the centroid of
//! what is left from its image moments:
//!
//! ```text
//! m00 = Σ 1      m10 = Σ x      m01 = Σ y
//! centroid = (m10 / m00, m01 / m00)
//! ```

use crate::decoder::Centroid;
use crate::landmarks::Point;
use crate::vision::{intensity, ContourStage, Frame};

/// Moment-based contour stage over the nose hull.
#[derive(Clone, Copy, Debug, Default)]
pub struct HullMoments;

impl ContourStage for HullMoments {
    fn centroid(&mut self, frame: &Frame, nose: &[Point], threshold: u8) -> Option<Centroid> {
        let hull = convex_hull(nose);
        if hull.len() < 3 {
            return None;
        }

        let (min_x, max_x) = bounds(hull.iter().map(|p| p.x))?;
        let (min_y, max_y) = bounds(hull.iter().map(|p| p.y))?;

        let mut m00: i64 = 0;
        let mut m10: i64 = 0;
        let mut m01: i64 = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point::new(x, y);
                if !inside(&hull, p) {
                    continue;
                }
                match intensity(frame, x, y) {
                    Some(value) if value >= threshold => {
                        m00 += 1;
                        m10 += i64::from(x);
                        m01 += i64::from(y);
                    }
                    _ => {}
                }
            }
        }

        if m00 == 0 {
            return None;
        }
        let cx = i32::try_from(m10 / m00).ok()?;
        let cy = i32::try_from(m01 / m00).ok()?;
        Some(Centroid::new(cx, cy))
    }
}

fn bounds(values: impl Iterator<Item = i32> + Clone) -> Option<(i32, i32)> {
    Some((values.clone().min()?, values.max()?))
}

fn cross(o: Point, a: Point, b: Point) -> i64 {
    i64::from(a.x - o.x) * i64::from(b.y - o.y) - i64::from(a.y - o.y) * i64::from(b.x - o.x)
}

/// Counter-clockwise convex hull (monotone chain). Collinear points are
/// dropped, so a degenerate outline yields fewer than three vertices.
#[must_use]
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| (p.x, p.y));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(sorted.len() * 2);
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Point-in-convex-polygon test, edges included.
fn inside(hull: &[Point], p: Point) -> bool {
    hull.iter()
        .zip(hull.iter().cycle().skip(1))
        .all(|(&a, &b)| cross(a, b, p) >= 0)
}
