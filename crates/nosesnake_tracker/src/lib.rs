//! # NOSESNAKE Tracker
//!
//! Reads a face from the camera and steers the snake with the nose.
//!
//! ```text
//!   Camera ──> FaceModel ──> nose polygon ──> ContourStage
//!                                                 │
//!                                             Centroid
//!                                                 │
//!                                          GestureDecoder
//!                                                 │
//!                                  UP/DOWN/LEFT/RIGHT (never NONE)
//!                                                 │
//!                                          CommandChannel
//! ```
//!
//! The camera, the face model and the contour stage are collaborators
//! behind traits. [`sim`] provides keyboard-driven stand-ins so the whole
//! pipeline runs on a machine without a webcam.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod contour;
pub mod control;
pub mod decoder;
pub mod error;
pub mod landmarks;
pub mod sim;
pub mod vision;

pub use contour::HullMoments;
pub use control::{TrackerControlLoop, TrackerStats};
pub use decoder::{classify, Centroid, GestureDecoder};
pub use error::{TrackerError, TrackerResult};
pub use landmarks::{select_face, FaceBox, LandmarkSet, Point};
pub use vision::{intensity, locate_nose, Camera, ContourStage, FaceModel, Frame};
