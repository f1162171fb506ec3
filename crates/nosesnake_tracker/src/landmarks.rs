//! # Facial Landmarks
//!
//! Output of the external predictor: 68 integer points per face, in the
//! standard iBUG ordering. Only the nose subset is used here.
//!
//! ```text
//!          27
//!          28        bridge
//!          29
//!          30        tip
//!   31  32  33  34  35   nostrils
//! ```

use nosesnake_shared::constants::{NOSE_LANDMARKS, NUM_FACIAL_LANDMARKS};

/// Integer image coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Landmarks of one face. Always exactly 68 points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    /// Wraps predictor output. Returns `None` unless exactly 68 points are
    /// given.
    #[must_use]
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        (points.len() == NUM_FACIAL_LANDMARKS).then_some(Self { points })
    }

    /// All points in predictor order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Nose outline (indices 27..=35).
    #[must_use]
    pub fn nose(&self) -> [Point; 9] {
        NOSE_LANDMARKS.map(|i| self.points[i])
    }
}

/// Face bounding box reported by the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceBox {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl FaceBox {
    /// Creates a box.
    #[must_use]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Area in pixels. Negative extents count as empty.
    #[must_use]
    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }
}

/// Picks the face to track: the largest box, the earliest one on ties.
#[must_use]
pub fn select_face(faces: &[FaceBox]) -> Option<FaceBox> {
    let mut best: Option<FaceBox> = None;
    for face in faces {
        match best {
            Some(current) if face.area() <= current.area() => {}
            _ => best = Some(*face),
        }
    }
    best
}
