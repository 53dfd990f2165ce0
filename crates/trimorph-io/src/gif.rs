use std::{fs::File, path::Path};

use image::{
    codecs::gif::{GifEncoder, Repeat},
    Delay, Frame, RgbaImage,
};
use trimorph_image::{ops::ensure_same_size, Image};

use crate::{error::IoError, functional::image_dims};

/// Options of the animated GIF encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifOptions {
    /// Display time of every frame in milliseconds.
    pub frame_delay_ms: u32,
    /// Number of repetitions, `None` loops forever.
    pub repeat: Option<u16>,
    /// Color quantization speed from 1 (best quality) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            frame_delay_ms: 100,
            repeat: None,
            speed: 10,
        }
    }
}

/// Writes a sequence of RGB frames as an animated GIF.
///
/// # Arguments
///
/// * `file_path` - The path to the GIF file.
/// * `frames` - The frames in display order, all with the same size.
/// * `options` - Frame delay, looping and quantization speed.
///
/// # Errors
///
/// * [`IoError::EmptySequence`] if there is no frame.
/// * [`IoError::ImageCreationError`] if the frames differ in size.
/// * [`IoError::ImageCodecError`] if the encoder fails.
pub fn write_gif(
    file_path: impl AsRef<Path>,
    frames: &[Image<u8, 3>],
    options: &GifOptions,
) -> Result<(), IoError> {
    let Some(first) = frames.first() else {
        return Err(IoError::EmptySequence);
    };
    for frame in frames {
        ensure_same_size(first, frame)?;
    }
    let (width, height) = image_dims(first)?;

    let file = File::create(file_path.as_ref())?;
    let mut encoder = GifEncoder::new_with_speed(file, options.speed.clamp(1, 30));
    encoder.set_repeat(match options.repeat {
        Some(n) => Repeat::Finite(n),
        None => Repeat::Infinite,
    })?;

    let delay = Delay::from_numer_denom_ms(options.frame_delay_ms, 1);
    for frame in frames {
        let mut rgba = Vec::with_capacity(frame.as_slice().len() / 3 * 4);
        for pixel in frame.as_slice().chunks_exact(3) {
            rgba.extend_from_slice(&[pixel[0], pixel[1], pixel[2], 255]);
        }
        let buffer =
            RgbaImage::from_raw(width, height, rgba).ok_or(IoError::ImageTooLarge(frame.size()))?;
        encoder.encode_frame(Frame::from_parts(buffer, 0, 0, delay))?;
    }

    log::debug!(
        "encoded {} frames of {} into {}",
        frames.len(),
        first.size(),
        file_path.as_ref().display()
    );

    Ok(())
}
