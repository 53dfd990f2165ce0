use std::path::{Path, PathBuf};

use trimorph_image::{Image, ImageSize};
use trimorph_imgproc::{morph::Morpher, MorphError};
use trimorph_io::{
    functional::{read_image_rgb8, write_image_png_rgb8},
    gif::{write_gif, GifOptions},
    IoError,
};

use crate::config::{ConfigError, MorphConfig};

/// An error type for the pipeline module.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The configuration is not valid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Error to read an input or write an output.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Error while rendering the frames.
    #[error(transparent)]
    Morph(#[from] MorphError),
}

/// What a call to [`run`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Number of rendered frames.
    pub num_frames: usize,
    /// Size of every frame.
    pub image_size: ImageSize,
    /// Path of the animated GIF.
    pub output: PathBuf,
    /// Directory holding the individual frames, if requested.
    pub frames_dir: Option<PathBuf>,
}

/// Name of the `idx`-th frame inside the frames directory.
pub fn frame_file_name(idx: usize) -> String {
    format!("frame_{idx:04}.png")
}

fn create_dir_all(dir: &Path) -> Result<(), IoError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Render the morph described by `config` and write it to disk.
///
/// Every input is checked before the first frame is rendered. Frames are written to
/// `frames_dir` as they are produced, the animation is written once all of them are done.
///
/// # Errors
///
/// * [`PipelineError::Config`] if the landmarks or the schedule are invalid.
/// * [`PipelineError::Io`] if an image cannot be read or an output cannot be written.
/// * [`PipelineError::Morph`] if the images do not match or a frame cannot be rendered.
pub fn run(config: &MorphConfig) -> Result<RunSummary, PipelineError> {
    config.validate()?;
    let schedule = config.schedule()?;

    let source = read_image_rgb8(&config.source_image)?;
    let target = read_image_rgb8(&config.target_image)?;
    log::info!(
        "morphing {} into {}: {} frames of {}",
        config.source_image.display(),
        config.target_image.display(),
        schedule.len(),
        source.size()
    );

    let morpher = Morpher::new(
        &source,
        &target,
        &config.source_landmarks,
        &config.target_landmarks,
        config.warp_options(),
    )?;

    if let Some(dir) = &config.frames_dir {
        create_dir_all(dir)?;
    }
    if let Some(parent) = config.output.parent() {
        create_dir_all(parent)?;
    }

    let mut frames: Vec<Image<u8, 3>> = Vec::with_capacity(schedule.len());
    for (idx, frame) in morpher.frames(&schedule).enumerate() {
        let frame = frame?;
        if let Some(dir) = &config.frames_dir {
            write_image_png_rgb8(dir.join(frame_file_name(idx)), &frame)?;
        }
        frames.push(frame);
    }

    let gif_options = GifOptions {
        frame_delay_ms: config.frame_delay_ms,
        ..Default::default()
    };
    write_gif(&config.output, &frames, &gif_options)?;
    log::info!(
        "wrote {} frames to {}",
        frames.len(),
        config.output.display()
    );

    Ok(RunSummary {
        num_frames: frames.len(),
        image_size: source.size(),
        output: config.output.clone(),
        frames_dir: config.frames_dir.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &Path) -> MorphConfig {
        MorphConfig {
            source_image: dir.join("a.png"),
            target_image: dir.join("b.png"),
            source_landmarks: vec![[0.0, 0.0], [5.0, 0.0], [0.0, 5.0], [5.0, 5.0]],
            target_landmarks: vec![[1.0, 1.0], [5.0, 0.0], [0.0, 5.0], [4.0, 4.0]],
            num_frames: 4,
            warp_fractions: None,
            dissolve_fractions: None,
            output: dir.join("out").join("morph.gif"),
            frames_dir: Some(dir.join("frames")),
            frame_delay_ms: 40,
            interpolation: Default::default(),
            hull_policy: Default::default(),
        }
    }

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name(0), "frame_0000.png");
        assert_eq!(frame_file_name(42), "frame_0042.png");
    }

    #[test]
    fn test_run_writes_outputs() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let size = ImageSize {
            width: 6,
            height: 6,
        };
        write_image_png_rgb8(
            tmp_dir.path().join("a.png"),
            &Image::from_size_pixel(size, [200, 10, 10])?,
        )?;
        write_image_png_rgb8(
            tmp_dir.path().join("b.png"),
            &Image::from_size_pixel(size, [10, 10, 200])?,
        )?;

        let config = config(tmp_dir.path());
        let summary = run(&config)?;
        assert_eq!(summary.num_frames, 4);
        assert_eq!(summary.image_size, size);
        assert!(config.output.exists());

        let frames_dir = tmp_dir.path().join("frames");
        for idx in 0..4 {
            let frame = read_image_rgb8(frames_dir.join(frame_file_name(idx)))?;
            assert_eq!(frame.size(), size);
        }
        let first = read_image_rgb8(frames_dir.join(frame_file_name(0)))?;
        assert_eq!(first.pixel(3, 3)?, &[200, 10, 10]);
        Ok(())
    }

    #[test]
    fn test_run_size_mismatch() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        write_image_png_rgb8(
            tmp_dir.path().join("a.png"),
            &Image::from_size_val([6, 6].into(), 0)?,
        )?;
        write_image_png_rgb8(
            tmp_dir.path().join("b.png"),
            &Image::from_size_val([6, 5].into(), 0)?,
        )?;

        let config = config(tmp_dir.path());
        assert!(matches!(
            run(&config),
            Err(PipelineError::Morph(MorphError::ImageSizeMismatch(_, _)))
        ));
        assert!(!config.output.exists());
        assert!(!tmp_dir.path().join("frames").exists());
        Ok(())
    }
}
