//! # Simulated Sensor
//!
//! Lets the tracker run without a webcam or a landmark model. A bright
//! rectangle stands in for the face; the keyboard moves it around.
//!
//! | Key | Action                  |
//! |-----|-------------------------|
//! | `w` | face up                 |
//! | `a` | face left               |
//! | `s` | face down               |
//! | `d` | face right              |
//! | `x` | hide / show the face    |
//! | `q` | quit                    |
//!
//! Keys are read line by line from stdin, so `dd` + Enter moves twice.
//! The frames still go through the real detector traits, the contour stage
//! and the decoder.
//!
//! The nose template can be replaced by a TOML file, loaded once at
//! startup:
//!
//! ```toml
//! # landmarks 27..=35 as fractions of the face box
//! nose = [[0.50, 0.35], [0.50, 0.42], [0.50, 0.49], [0.50, 0.56],
//!         [0.40, 0.62], [0.45, 0.64], [0.50, 0.65], [0.55, 0.64], [0.60, 0.62]]
//! ```

use std::io::BufRead;
use std::path::Path;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use image::{imageops, GrayImage, Luma};
use nosesnake_shared::constants::{NOSE_LANDMARKS, NUM_FACIAL_LANDMARKS};
use nosesnake_shared::{QuitSignal, TrackerConfig};
use serde::Deserialize;

use crate::error::{TrackerError, TrackerResult};
use crate::landmarks::{FaceBox, LandmarkSet, Point};
use crate::vision::{Camera, FaceModel, Frame};

/// Simulated frame width.
pub const SIM_FRAME_WIDTH: u32 = 640;
/// Simulated frame height.
pub const SIM_FRAME_HEIGHT: u32 = 480;

const FACE_WIDTH: u32 = 120;
const FACE_HEIGHT: u32 = 160;
const FACE_INTENSITY: u8 = 200;
const DETECTION_LEVEL: u8 = 128;

const NOSE_POINTS: usize = NOSE_LANDMARKS.len();

/// Nose landmarks 27..=35 as fractions of the face box.
const NOSE_TEMPLATE: [[f32; 2]; NOSE_POINTS] = [
    [0.50, 0.35],
    [0.50, 0.42],
    [0.50, 0.49],
    [0.50, 0.56],
    [0.40, 0.62],
    [0.45, 0.64],
    [0.50, 0.65],
    [0.55, 0.64],
    [0.60, 0.62],
];

/// One keyboard action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    /// Move the face by this many pixels.
    Nudge {
        /// Horizontal offset.
        dx: i32,
        /// Vertical offset.
        dy: i32,
    },
    /// Hide or show the face.
    ToggleFace,
    /// Stop the tracker.
    Quit,
}

/// Decodes one line of keyboard input. Unknown characters are skipped.
#[must_use]
pub fn parse_keys(line: &str, nudge: i32) -> Vec<SimKey> {
    line.chars()
        .filter_map(|c| match c.to_ascii_lowercase() {
            'w' => Some(SimKey::Nudge { dx: 0, dy: -nudge }),
            'a' => Some(SimKey::Nudge { dx: -nudge, dy: 0 }),
            's' => Some(SimKey::Nudge { dx: 0, dy: nudge }),
            'd' => Some(SimKey::Nudge { dx: nudge, dy: 0 }),
            'x' => Some(SimKey::ToggleFace),
            'q' => Some(SimKey::Quit),
            _ => None,
        })
        .collect()
}

/// Spawns the stdin reader feeding a [`SimulatedCamera`].
#[must_use]
pub fn spawn_keyboard(nudge: i32) -> Receiver<SimKey> {
    let (tx, rx) = unbounded();
    thread::spawn(move || read_keyboard(&tx, nudge));
    rx
}

fn read_keyboard(tx: &Sender<SimKey>, nudge: i32) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        for key in parse_keys(&line, nudge) {
            if tx.send(key).is_err() {
                return;
            }
        }
    }
}

/// Camera that renders the virtual face.
#[derive(Debug)]
pub struct SimulatedCamera {
    width: u32,
    height: u32,
    center: Point,
    visible: bool,
    keys: Receiver<SimKey>,
    quit: QuitSignal,
    released: bool,
}

impl SimulatedCamera {
    /// Face starts centred and visible. A [`SimKey::Quit`] triggers `quit`.
    #[must_use]
    pub fn new(width: u32, height: u32, keys: Receiver<SimKey>, quit: QuitSignal) -> Self {
        Self {
            width,
            height,
            center: Point::new(width as i32 / 2, height as i32 / 2),
            visible: true,
            keys,
            quit,
            released: false,
        }
    }

    /// Current face centre.
    #[must_use]
    pub const fn face_center(&self) -> Point {
        self.center
    }

    /// True while the face is drawn.
    #[must_use]
    pub const fn face_visible(&self) -> bool {
        self.visible
    }

    fn apply(&mut self, key: SimKey) {
        match key {
            SimKey::Nudge { dx, dy } => {
                self.center.x = (self.center.x + dx).clamp(0, self.width as i32);
                self.center.y = (self.center.y + dy).clamp(0, self.height as i32);
                tracing::debug!("simulated face at ({}, {})", self.center.x, self.center.y);
            }
            SimKey::ToggleFace => {
                self.visible = !self.visible;
                tracing::info!("simulated face {}", if self.visible { "shown" } else { "hidden" });
            }
            SimKey::Quit => self.quit.trigger(),
        }
    }
}

impl Camera for SimulatedCamera {
    fn read_frame(&mut self) -> TrackerResult<Frame> {
        if self.released {
            return Err(TrackerError::CameraUnavailable("simulated camera released".to_string()));
        }
        loop {
            match self.keys.try_recv() {
                Ok(key) => self.apply(key),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        let mut frame = Frame::new(self.width, self.height);
        if self.visible {
            let face = GrayImage::from_pixel(FACE_WIDTH, FACE_HEIGHT, Luma([FACE_INTENSITY]));
            let left = i64::from(self.center.x) - i64::from(FACE_WIDTH / 2);
            let top = i64::from(self.center.y) - i64::from(FACE_HEIGHT / 2);
            imageops::replace(&mut frame, &face, left, top);
        }
        Ok(frame)
    }

    fn release(&mut self) {
        self.released = true;
    }
}

#[derive(Deserialize)]
struct TemplateFile {
    nose: Vec<[f32; 2]>,
}

/// Face model for simulated frames: the bright blob is the face and the
/// landmarks come from a fixed template scaled to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemplateFaceModel {
    nose: [[f32; 2]; NOSE_POINTS],
}

impl Default for TemplateFaceModel {
    fn default() -> Self {
        Self { nose: NOSE_TEMPLATE }
    }
}

impl TemplateFaceModel {
    /// Loads the template named in the config, or the built-in one.
    ///
    /// # Errors
    ///
    /// [`TrackerError::ModelLoad`] when the configured file is missing or
    /// malformed. Fatal at startup.
    pub fn from_config(config: &TrackerConfig) -> TrackerResult<Self> {
        match &config.landmark_model {
            Some(path) => Self::load(Path::new(path)),
            None => Ok(Self::default()),
        }
    }

    /// Loads a nose template file.
    ///
    /// # Errors
    ///
    /// [`TrackerError::ModelLoad`] when the file cannot be read or parsed,
    /// does not hold exactly nine points, or places a point outside the
    /// face box.
    pub fn load(path: &Path) -> TrackerResult<Self> {
        let fail = |reason: String| TrackerError::ModelLoad(format!("{}: {reason}", path.display()));

        let text = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        let file: TemplateFile = toml::from_str(&text).map_err(|e| fail(e.to_string()))?;
        let nose: [[f32; 2]; NOSE_POINTS] = file
            .nose
            .try_into()
            .map_err(|points: Vec<_>| fail(format!("expected {NOSE_POINTS} nose points, got {}", points.len())))?;
        if nose.iter().flatten().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(fail("nose points must lie inside the face box (0.0..=1.0)".to_string()));
        }

        tracing::info!("landmark template loaded from {}", path.display());
        Ok(Self { nose })
    }
}

impl FaceModel for TemplateFaceModel {
    fn detect_faces(&mut self, frame: &Frame) -> Vec<FaceBox> {
        let bright = frame
            .enumerate_pixels()
            .filter(|&(_, _, &Luma([value]))| value >= DETECTION_LEVEL)
            .map(|(x, y, _)| (x as i32, y as i32));

        let mut extent: Option<(Point, Point)> = None;
        for (x, y) in bright {
            let (min, max) = extent.get_or_insert((Point::new(x, y), Point::new(x, y)));
            *min = Point::new(min.x.min(x), min.y.min(y));
            *max = Point::new(max.x.max(x), max.y.max(y));
        }
        extent
            .map(|(min, max)| vec![FaceBox::new(min.x, min.y, max.x - min.x + 1, max.y - min.y + 1)])
            .unwrap_or_default()
    }

    fn predict_landmarks(&mut self, _frame: &Frame, face: FaceBox) -> Option<LandmarkSet> {
        let scale = |[fx, fy]: [f32; 2]| {
            Point::new(
                face.left + (fx * face.width as f32) as i32,
                face.top + (fy * face.height as f32) as i32,
            )
        };
        let points = (0..NUM_FACIAL_LANDMARKS)
            .map(|i| match NOSE_LANDMARKS.iter().position(|&n| n == i) {
                Some(k) => scale(self.nose[k]),
                // Coarse grid for the rest of the face.
                None => scale([(i % 17) as f32 / 16.0, (i / 17) as f32 / 4.0]),
            })
            .collect();
        LandmarkSet::from_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::HullMoments;
    use crate::vision::locate_nose;

    fn camera() -> (Sender<SimKey>, SimulatedCamera, QuitSignal) {
        let (tx, rx) = unbounded();
        let quit = QuitSignal::new();
        let camera = SimulatedCamera::new(SIM_FRAME_WIDTH, SIM_FRAME_HEIGHT, rx, quit.clone());
        (tx, camera, quit)
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(
            parse_keys("dW?x", 30),
            vec![
                SimKey::Nudge { dx: 30, dy: 0 },
                SimKey::Nudge { dx: 0, dy: -30 },
                SimKey::ToggleFace
            ]
        );
        assert_eq!(parse_keys("q", 30), vec![SimKey::Quit]);
        assert!(parse_keys("", 30).is_empty());
    }

    #[test]
    fn test_detects_drawn_face() {
        let (_tx, mut camera, _quit) = camera();
        let frame = camera.read_frame().unwrap();
        let faces = TemplateFaceModel::default().detect_faces(&frame);
        assert_eq!(faces, vec![FaceBox::new(260, 160, 120, 160)]);
    }

    #[test]
    fn test_hidden_face_yields_no_centroid() {
        let (tx, mut camera, _quit) = camera();
        tx.send(SimKey::ToggleFace).unwrap();
        let frame = camera.read_frame().unwrap();
        assert!(!camera.face_visible());
        assert_eq!(locate_nose(&frame, &mut TemplateFaceModel::default(), &mut HullMoments, 0), None);
    }

    #[test]
    fn test_nudge_moves_centroid() {
        let (tx, mut camera, _quit) = camera();
        let first = camera.read_frame().unwrap();
        let before = locate_nose(&first, &mut TemplateFaceModel::default(), &mut HullMoments, 0).unwrap();

        tx.send(SimKey::Nudge { dx: 30, dy: 0 }).unwrap();
        let second = camera.read_frame().unwrap();
        let after = locate_nose(&second, &mut TemplateFaceModel::default(), &mut HullMoments, 0).unwrap();

        assert_eq!(after.x - before.x, 30);
        assert_eq!(after.y, before.y);
    }

    #[test]
    fn test_quit_key_triggers_signal() {
        let (tx, mut camera, quit) = camera();
        tx.send(SimKey::Quit).unwrap();
        camera.read_frame().unwrap();
        assert!(quit.is_triggered());
    }

    fn template_path(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("nosesnake_{name}_{}.toml", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_default_config_uses_builtin_template() {
        let model = TemplateFaceModel::from_config(&TrackerConfig::default()).unwrap();
        assert_eq!(model, TemplateFaceModel::default());
    }

    #[test]
    fn test_template_file_moves_nose() {
        let path = template_path(
            "shifted",
            "nose = [[0.25, 0.25], [0.25, 0.375], [0.25, 0.5], [0.25, 0.625], [0.125, 0.75], [0.1875, 0.75], [0.25, 0.75], [0.3125, 0.75], [0.5, 0.75]]\n",
        );
        let mut model = TemplateFaceModel::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let face = FaceBox::new(0, 0, 100, 100);
        let landmarks = model.predict_landmarks(&Frame::new(100, 100), face).unwrap();
        assert_eq!(landmarks.nose()[0], Point::new(25, 25));
        assert_eq!(landmarks.nose()[8], Point::new(50, 75));
    }

    #[test]
    fn test_missing_template_is_model_load_error() {
        let config = TrackerConfig {
            landmark_model: Some("/nonexistent/nose.toml".to_string()),
            ..TrackerConfig::default()
        };
        assert!(matches!(
            TemplateFaceModel::from_config(&config),
            Err(TrackerError::ModelLoad(_))
        ));
    }

    #[test]
    fn test_malformed_template_is_model_load_error() {
        let short = template_path("short", "nose = [[0.5, 0.5]]\n");
        let outside = template_path(
            "outside",
            "nose = [[0.5, 0.5], [0.5, 0.5], [0.5, 0.5], [0.5, 0.5], [0.5, 0.5], [0.5, 0.5], [0.5, 0.5], [0.5, 0.5], [1.5, 0.5]]\n",
        );
        let garbage = template_path("garbage", "nose = \"big\"\n");

        for path in [short, outside, garbage] {
            let result = TemplateFaceModel::load(&path);
            std::fs::remove_file(&path).ok();
            assert!(matches!(result, Err(TrackerError::ModelLoad(_))), "{}", path.display());
        }
    }

    #[test]
    fn test_released_camera_fails() {
        let (_tx, mut camera, _quit) = camera();
        camera.release();
        assert!(matches!(camera.read_frame(), Err(TrackerError::CameraUnavailable(_))));
    }
}
