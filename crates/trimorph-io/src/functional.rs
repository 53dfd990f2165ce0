use std::path::Path;

use trimorph_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an RGB image from the given file path.
///
/// The method reads any image format supported by the image crate, the format is guessed from
/// the file content. Grayscale and alpha images are converted to 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image with three channels (rgb8).
pub fn read_image_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    log::debug!("decoded {} as {size}", file_path.display());

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes an RGB image to the given file path as PNG.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
/// * `image` - The image to write.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    let (width, height) = image_dims(image)?;
    image::save_buffer_with_format(
        file_path,
        image.as_slice(),
        width,
        height,
        image::ExtendedColorType::Rgb8,
        image::ImageFormat::Png,
    )?;
    Ok(())
}

pub(crate) fn image_dims<const C: usize>(image: &Image<u8, C>) -> Result<(u32, u32), IoError> {
    match (u32::try_from(image.width()), u32::try_from(image.height())) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(IoError::ImageTooLarge(image.size())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("frame.png");

        let data = (0..5 * 3 * 3).map(|v| (v * 5) as u8).collect::<Vec<_>>();
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 5,
                height: 3,
            },
            data,
        )?;
        write_image_png_rgb8(&file_path, &image)?;

        let image_back = read_image_rgb8(&file_path)?;
        assert_eq!(image_back, image);
        Ok(())
    }

    #[test]
    fn read_gray_as_rgb() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");
        image::GrayImage::from_raw(2, 1, vec![10, 200])
            .expect("buffer matches the dimensions")
            .save(&file_path)?;

        let image = read_image_rgb8(&file_path)?;
        assert_eq!(image.as_slice(), &[10, 10, 10, 200, 200, 200]);
        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_rgb8("this/file/does/not/exist.jpg");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }
}
