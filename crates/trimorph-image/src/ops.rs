use crate::{Image, ImageError};

/// Check that two images share the same size.
///
/// # Arguments
///
/// * `src` - The first image.
/// * `dst` - The second image.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] with both sizes when they differ.
///
/// Example:
///
/// ```
/// use trimorph_image::{Image, ImageSize};
/// use trimorph_image::ops::ensure_same_size;
///
/// let a = Image::<u8, 3>::from_size_val(ImageSize { width: 2, height: 1 }, 0).unwrap();
/// let b = Image::<f32, 3>::from_size_val(ImageSize { width: 2, height: 1 }, 0.0).unwrap();
///
/// assert!(ensure_same_size(&a, &b).is_ok());
/// ```
pub fn ensure_same_size<T, U, const C1: usize, const C2: usize>(
    src: &Image<T, C1>,
    dst: &Image<U, C2>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    Ok(())
}
