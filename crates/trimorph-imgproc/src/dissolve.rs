use trimorph_image::{ops::ensure_same_size, Image};

use crate::{error::MorphError, parallel, warp::validate_fraction};

/// Blend two warped images into an 8-bit frame.
///
/// Computes `(1 - dissolve_frac) * src1 + dissolve_frac * src2` per channel in double
/// precision, clips the result to [0, 255] and truncates it towards zero. The blend is
/// evaluated as `src1 + dissolve_frac * (src2 - src1)` so that equal inputs stay exact.
///
/// # Arguments
///
/// * `src1` - The image weighted by `1 - dissolve_frac`.
/// * `src2` - The image weighted by `dissolve_frac`.
/// * `dst` - The output frame.
/// * `dissolve_frac` - The blend fraction in [0, 1].
///
/// # Errors
///
/// * [`MorphError::Image`] if the three images differ in size.
/// * [`MorphError::InvalidFraction`] if the fraction is not finite or outside [0, 1].
///
/// # Example
///
/// ```
/// use trimorph_image::{Image, ImageSize};
/// use trimorph_imgproc::dissolve::cross_dissolve;
///
/// let size = ImageSize { width: 4, height: 4 };
/// let red = Image::<f32, 3>::from_size_pixel(size, [255.0, 0.0, 0.0]).unwrap();
/// let blue = Image::<f32, 3>::from_size_pixel(size, [0.0, 0.0, 255.0]).unwrap();
/// let mut out = Image::<u8, 3>::from_size_val(size, 0).unwrap();
///
/// cross_dissolve(&red, &blue, &mut out, 0.5).unwrap();
/// assert_eq!(out.pixel(0, 0).unwrap(), &[127, 0, 127]);
/// ```
pub fn cross_dissolve<const C: usize>(
    src1: &Image<f32, C>,
    src2: &Image<f32, C>,
    dst: &mut Image<u8, C>,
    dissolve_frac: f64,
) -> Result<(), MorphError> {
    ensure_same_size(src1, src2)?;
    ensure_same_size(src1, dst)?;
    validate_fraction(dissolve_frac)?;

    parallel::par_iter_rows_val_two(src1, src2, dst, |&a, &b, out| {
        let (a, b) = (f64::from(a), f64::from(b));
        // `as` truncates towards zero
        *out = (a + dissolve_frac * (b - a)).clamp(0.0, 255.0) as u8;
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimorph_image::{ImageError, ImageSize};

    fn size() -> ImageSize {
        ImageSize {
            width: 4,
            height: 4,
        }
    }

    #[test]
    fn test_dissolve_endpoints() -> Result<(), MorphError> {
        let a = Image::<f32, 3>::new(size(), (0..48).map(|v| v as f32 * 5.0).collect())?;
        let b = Image::<f32, 3>::from_size_val(size(), 17.0)?;
        let mut out = Image::<u8, 3>::from_size_val(size(), 0)?;

        cross_dissolve(&a, &b, &mut out, 0.0)?;
        assert_eq!(
            out.as_slice(),
            (0..48).map(|v| (v * 5) as u8).collect::<Vec<_>>()
        );

        cross_dissolve(&a, &b, &mut out, 1.0)?;
        assert!(out.as_slice().iter().all(|&v| v == 17));
        Ok(())
    }

    #[test]
    fn test_dissolve_red_blue() -> Result<(), MorphError> {
        let red = Image::<f32, 3>::from_size_pixel(size(), [255.0, 0.0, 0.0])?;
        let blue = Image::<f32, 3>::from_size_pixel(size(), [0.0, 0.0, 255.0])?;
        let mut out = Image::<u8, 3>::from_size_val(size(), 0)?;
        cross_dissolve(&red, &blue, &mut out, 0.5)?;
        assert!(out.as_slice().chunks_exact(3).all(|p| p == [127, 0, 127]));
        Ok(())
    }

    #[test]
    fn test_dissolve_keeps_fraction_precision() -> Result<(), MorphError> {
        let a = Image::<f32, 1>::from_size_val([3, 1].into(), 10.0)?;
        let b = Image::<f32, 1>::from_size_val([3, 1].into(), 200.0)?;
        let mut out = Image::<u8, 1>::from_size_val([3, 1].into(), 0)?;

        // 199.99999981 truncates to 199, the fraction must not round up to 1
        cross_dissolve(&a, &b, &mut out, 1.0 - 1e-9)?;
        assert_eq!(out.as_slice(), &[199, 199, 199]);

        // equal inputs are reproduced at any fraction
        for d in [0.1, 0.3, 1.0 / 3.0, 0.7, 0.999] {
            cross_dissolve(&b, &b, &mut out, d)?;
            assert_eq!(out.as_slice(), &[200, 200, 200]);
        }
        Ok(())
    }

    #[test]
    fn test_dissolve_clips() -> Result<(), MorphError> {
        let a = Image::<f32, 1>::new([2, 1].into(), vec![-40.0, 300.0])?;
        let b = Image::<f32, 1>::new([2, 1].into(), vec![-10.0, 900.0])?;
        let mut out = Image::<u8, 1>::from_size_val([2, 1].into(), 7)?;
        cross_dissolve(&a, &b, &mut out, 0.25)?;
        assert_eq!(out.as_slice(), &[0, 255]);
        Ok(())
    }

    #[test]
    fn test_dissolve_errors() -> Result<(), MorphError> {
        let a = Image::<f32, 3>::from_size_val(size(), 0.0)?;
        let b = Image::<f32, 3>::from_size_val([4, 3].into(), 0.0)?;
        let mut out = Image::<u8, 3>::from_size_val(size(), 0)?;
        assert_eq!(
            cross_dissolve(&a, &b, &mut out, 0.5),
            Err(MorphError::Image(ImageError::InvalidImageSize(4, 4, 4, 3)))
        );
        assert_eq!(
            cross_dissolve(&a, &a, &mut out, -0.5),
            Err(MorphError::InvalidFraction(-0.5))
        );
        Ok(())
    }
}
