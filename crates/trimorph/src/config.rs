use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use trimorph_geometry::Point2;
use trimorph_imgproc::{
    interpolation::InterpolationMode,
    morph::FrameSchedule,
    parallel::ExecutionStrategy,
    warp::{validate_landmarks, HullPolicy, WarpOptions},
    MorphError,
};

/// An error type for the configuration module.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Error to read the configuration file.
    #[error("Failed to read the config file. {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid configuration.
    #[error("Failed to parse the config. {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration holds invalid morph inputs.
    #[error("Invalid config. {0}")]
    Invalid(#[from] MorphError),

    /// The configuration renders no frame.
    #[error("The config renders no frame, set num_frames or the fractions")]
    NoFrames,
}

fn default_num_frames() -> usize {
    50
}

fn default_output() -> PathBuf {
    PathBuf::from("output.gif")
}

fn default_frame_delay_ms() -> u32 {
    100
}

/// A morph between two images described as JSON.
///
/// Relative paths are resolved against the directory of the configuration file by
/// [`MorphConfig::from_file`].
///
/// # Example
///
/// ```
/// use trimorph::config::MorphConfig;
///
/// let config = MorphConfig::from_json(r#"{
///     "source_image": "a.png",
///     "target_image": "b.png",
///     "source_landmarks": [[0, 0], [9, 0], [0, 9], [9, 9]],
///     "target_landmarks": [[0, 0], [9, 0], [0, 9], [9, 9]],
///     "num_frames": 10
/// }"#).unwrap();
///
/// assert_eq!(config.schedule().unwrap().len(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MorphConfig {
    /// Image shown at the start of the morph.
    pub source_image: PathBuf,
    /// Image shown at the end of the morph.
    pub target_image: PathBuf,
    /// Landmarks on the source image as `[x, y]`.
    pub source_landmarks: Vec<Point2>,
    /// Corresponding landmarks on the target image.
    pub target_landmarks: Vec<Point2>,
    /// Number of frames of the linear schedule.
    #[serde(default = "default_num_frames")]
    pub num_frames: usize,
    /// Explicit warp fractions, replacing the linear schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warp_fractions: Option<Vec<f64>>,
    /// Explicit dissolve fractions, replacing the linear schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dissolve_fractions: Option<Vec<f64>>,
    /// Path of the animated GIF.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Directory receiving every frame as `frame_XXXX.png`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames_dir: Option<PathBuf>,
    /// Display time of every GIF frame in milliseconds.
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u32,
    /// Resampling kernel.
    #[serde(default)]
    pub interpolation: InterpolationMode,
    /// Handling of pixels outside the landmark mesh.
    #[serde(default)]
    pub hull_policy: HullPolicy,
}

impl MorphConfig {
    /// Parse a configuration from a JSON string, paths are kept as written.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load and validate a configuration file.
    ///
    /// Relative paths are resolved against the directory containing the file.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] if the file cannot be read.
    /// * [`ConfigError::Json`] if the content is not a valid configuration.
    /// * Any error of [`MorphConfig::validate`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_json(&std::fs::read_to_string(path)?)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        log::debug!(
            "loaded {} with {} landmark pairs",
            path.display(),
            config.source_landmarks.len()
        );
        Ok(config)
    }

    /// Make every relative path of the configuration relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.source_image);
        resolve(&mut self.target_image);
        resolve(&mut self.output);
        if let Some(dir) = self.frames_dir.as_mut() {
            resolve(dir);
        }
    }

    /// Check the landmarks and the frame schedule.
    ///
    /// The image sizes are checked when the images are read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_landmarks(&self.source_landmarks, &self.target_landmarks)?;
        self.schedule().map(|_| ())
    }

    /// The frame schedule.
    ///
    /// Explicit fractions take precedence, a missing sequence falls back to the linear
    /// schedule of `num_frames` frames.
    pub fn schedule(&self) -> Result<FrameSchedule, ConfigError> {
        let linear = FrameSchedule::linear(self.num_frames);
        let warp = self
            .warp_fractions
            .clone()
            .unwrap_or_else(|| linear.warp_fractions().to_vec());
        let dissolve = self
            .dissolve_fractions
            .clone()
            .unwrap_or_else(|| linear.dissolve_fractions().to_vec());

        let schedule = FrameSchedule::new(warp, dissolve)?;
        if schedule.is_empty() {
            return Err(ConfigError::NoFrames);
        }
        Ok(schedule)
    }

    /// The warp options, rows are processed in parallel.
    pub fn warp_options(&self) -> WarpOptions {
        WarpOptions {
            interpolation: self.interpolation,
            hull_policy: self.hull_policy,
            strategy: ExecutionStrategy::ParallelRows,
        }
    }
}
