//! # Vision Collaborators
//!
//! The tracker does not own a camera driver, a face detector or image
//! morphology. It talks to them through the traits below:
//!
//! ```text
//! Camera::read_frame ──> FaceModel::detect_faces ──> select_face
//!                                                        │
//!      Centroid <── ContourStage::centroid <── nose <── FaceModel::predict_landmarks
//! ```
//!
//! [`locate_nose`] runs that chain for one frame. Every "nothing found"
//! outcome collapses into `None`.

use image::{GrayImage, Luma};

use crate::decoder::Centroid;
use crate::error::TrackerResult;
use crate::landmarks::{select_face, FaceBox, LandmarkSet, Point};

/// 8-bit grayscale camera frame.
pub type Frame = GrayImage;

/// Intensity at a signed landmark coordinate, `None` outside the frame.
#[inline]
#[must_use]
pub fn intensity(frame: &Frame, x: i32, y: i32) -> Option<u8> {
    let x = u32::try_from(x).ok()?;
    let y = u32::try_from(y).ok()?;
    frame.get_pixel_checked(x, y).map(|&Luma([value])| value)
}

/// Frame source.
pub trait Camera {
    /// Blocks until the next frame is available.
    ///
    /// # Errors
    ///
    /// [`crate::TrackerError::CameraUnavailable`] when no more frames can be
    /// produced. Fatal to the tracker.
    fn read_frame(&mut self) -> TrackerResult<Frame>;

    /// Releases the device.
    fn release(&mut self);
}

/// Face detector plus 68-point landmark predictor.
pub trait FaceModel {
    /// Face boxes in detection order.
    fn detect_faces(&mut self, frame: &Frame) -> Vec<FaceBox>;

    /// Landmarks for one detected face.
    fn predict_landmarks(&mut self, frame: &Frame, face: FaceBox) -> Option<LandmarkSet>;
}

/// Threshold and contour step applied to the nose polygon.
pub trait ContourStage {
    /// Centroid of the best contour inside `nose`, if any.
    fn centroid(&mut self, frame: &Frame, nose: &[Point], threshold: u8) -> Option<Centroid>;
}

/// Runs the full per-frame chain from pixels to nose centroid.
pub fn locate_nose<M, S>(frame: &Frame, model: &mut M, contour: &mut S, threshold: u8) -> Option<Centroid>
where
    M: FaceModel + ?Sized,
    S: ContourStage + ?Sized,
{
    let faces = model.detect_faces(frame);
    if faces.len() > 1 {
        tracing::debug!("{} faces detected, tracking the largest", faces.len());
    }
    let face = select_face(&faces)?;
    let landmarks = model.predict_landmarks(frame, face)?;
    contour.centroid(frame, &landmarks.nose(), threshold)
}
