use num_traits::AsPrimitive;
use trimorph_image::Image;

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values.
///
/// PRECONDITION: the image is not empty.
pub(crate) fn bilinear_interpolation<T, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
) -> [f32; C]
where
    T: AsPrimitive<f32>,
{
    let (rows, cols) = (image.rows(), image.cols());

    let u = u.clamp(0.0, (cols - 1) as f32);
    let v = v.clamp(0.0, (rows - 1) as f32);

    let iu0 = (u.floor() as usize).min(cols - 1);
    let iv0 = (v.floor() as usize).min(rows - 1);

    let frac_u = u - iu0 as f32;
    let frac_v = v - iv0 as f32;

    let iu1 = (iu0 + 1).min(cols - 1);
    let iv1 = (iv0 + 1).min(rows - 1);

    let data = image.as_slice();
    let base00 = (iv0 * cols + iu0) * C;
    let base01 = (iv0 * cols + iu1) * C;
    let base10 = (iv1 * cols + iu0) * C;
    let base11 = (iv1 * cols + iu1) * C;

    let p00 = &data[base00..base00 + C];
    let p01 = &data[base01..base01 + C];
    let p10 = &data[base10..base10 + C];
    let p11 = &data[base11..base11 + C];

    // lerp form: integer sampling positions return the pixel unchanged
    let mut pixel = [0.0; C];
    for k in 0..C {
        let top = p00[k].as_() + frac_u * (p01[k].as_() - p00[k].as_());
        let bottom = p10[k].as_() + frac_u * (p11[k].as_() - p10[k].as_());
        pixel[k] = top + frac_v * (bottom - top);
    }

    pixel
}
