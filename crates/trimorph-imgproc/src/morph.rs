use trimorph_geometry::Point2;
use trimorph_image::Image;

use crate::{
    dissolve::cross_dissolve,
    error::MorphError,
    warp::{validate_fraction, validate_inputs, warp_frame, WarpOptions},
};

/// The warp and dissolve fractions of every frame of a morph.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSchedule {
    warp: Vec<f64>,
    dissolve: Vec<f64>,
}

impl FrameSchedule {
    /// Create a schedule from explicit fractions.
    ///
    /// # Errors
    ///
    /// * [`MorphError::FractionCountMismatch`] if the sequences differ in length.
    /// * [`MorphError::InvalidFraction`] if a value is not finite or outside [0, 1].
    pub fn new(warp: Vec<f64>, dissolve: Vec<f64>) -> Result<Self, MorphError> {
        if warp.len() != dissolve.len() {
            return Err(MorphError::FractionCountMismatch(warp.len(), dissolve.len()));
        }
        for &fraction in warp.iter().chain(dissolve.iter()) {
            validate_fraction(fraction)?;
        }
        Ok(Self { warp, dissolve })
    }

    /// A schedule of `num_frames` frames moving both fractions by `1 / num_frames` per frame.
    ///
    /// Frame `f` uses `f / num_frames`, so the last frame stops one step short of the target.
    ///
    /// # Example
    ///
    /// ```
    /// use trimorph_imgproc::morph::FrameSchedule;
    ///
    /// let schedule = FrameSchedule::linear(4);
    /// assert_eq!(schedule.warp_fractions(), &[0.0, 0.25, 0.5, 0.75]);
    /// ```
    pub fn linear(num_frames: usize) -> Self {
        let fractions = (0..num_frames)
            .map(|f| f as f64 / num_frames as f64)
            .collect::<Vec<_>>();
        Self {
            warp: fractions.clone(),
            dissolve: fractions,
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.warp.len()
    }

    /// Whether the schedule has no frame.
    pub fn is_empty(&self) -> bool {
        self.warp.is_empty()
    }

    /// The warp fraction of every frame.
    pub fn warp_fractions(&self) -> &[f64] {
        &self.warp
    }

    /// The dissolve fraction of every frame.
    pub fn dissolve_fractions(&self) -> &[f64] {
        &self.dissolve
    }

    /// Iterate over `(warp_frac, dissolve_frac)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.warp.iter().copied().zip(self.dissolve.iter().copied())
    }
}

/// Renders morph frames between two images.
///
/// The inputs are validated once on construction, frames are then produced one at a time.
///
/// # Example
///
/// ```
/// use trimorph_image::{Image, ImageSize};
/// use trimorph_imgproc::morph::{FrameSchedule, Morpher};
/// use trimorph_imgproc::warp::WarpOptions;
///
/// let size = ImageSize { width: 6, height: 6 };
/// let a = Image::<u8, 3>::from_size_pixel(size, [255, 0, 0]).unwrap();
/// let b = Image::<u8, 3>::from_size_pixel(size, [0, 0, 255]).unwrap();
/// let pts = [[1.0, 1.0], [4.0, 1.0], [1.0, 4.0], [4.0, 4.0]];
///
/// let morpher = Morpher::new(&a, &b, &pts, &pts, WarpOptions::default()).unwrap();
/// let frames = morpher
///     .frames(&FrameSchedule::linear(3))
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
/// assert_eq!(frames.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Morpher<'a> {
    source: &'a Image<u8, 3>,
    target: &'a Image<u8, 3>,
    source_landmarks: &'a [Point2],
    target_landmarks: &'a [Point2],
    options: WarpOptions,
}

impl<'a> Morpher<'a> {
    /// Validate the inputs and create a new morpher.
    ///
    /// # Errors
    ///
    /// Any error of [`validate_inputs`].
    pub fn new(
        source: &'a Image<u8, 3>,
        target: &'a Image<u8, 3>,
        source_landmarks: &'a [Point2],
        target_landmarks: &'a [Point2],
        options: WarpOptions,
    ) -> Result<Self, MorphError> {
        validate_inputs(source, target, source_landmarks, target_landmarks)?;
        Ok(Self {
            source,
            target,
            source_landmarks,
            target_landmarks,
            options,
        })
    }

    /// The warp options used for every frame.
    pub fn options(&self) -> &WarpOptions {
        &self.options
    }

    /// Render a single frame.
    ///
    /// # Arguments
    ///
    /// * `warp_frac` - Geometry interpolation, 0 is the source shape and 1 the target shape.
    /// * `dissolve_frac` - Color interpolation, 0 is the source colors and 1 the target colors.
    pub fn frame(&self, warp_frac: f64, dissolve_frac: f64) -> Result<Image<u8, 3>, MorphError> {
        validate_fraction(dissolve_frac)?;
        let warped = warp_frame(
            self.source,
            self.target,
            self.source_landmarks,
            self.target_landmarks,
            warp_frac,
            &self.options,
        )?;

        let mut frame = Image::<u8, 3>::from_size_val(self.source.size(), 0)?;
        cross_dissolve(&warped.from_source, &warped.from_target, &mut frame, dissolve_frac)?;

        Ok(frame)
    }

    /// Lazily render the frames of a schedule, in order.
    pub fn frames<'s>(
        &'s self,
        schedule: &'s FrameSchedule,
    ) -> impl Iterator<Item = Result<Image<u8, 3>, MorphError>> + 's {
        let total = schedule.len();
        schedule
            .iter()
            .enumerate()
            .map(move |(idx, (warp_frac, dissolve_frac))| {
                log::debug!(
                    "frame {}/{total}: warp {warp_frac:.4}, dissolve {dissolve_frac:.4}",
                    idx + 1
                );
                self.frame(warp_frac, dissolve_frac)
            })
    }
}

/// Compute the morph sequence between two images.
///
/// Every input is validated before the first frame is rendered. Frame `f` warps both images
/// to `warp_fracs[f]` and blends them with `dissolve_fracs[f]`.
///
/// # Arguments
///
/// * `source` - The first image.
/// * `target` - The second image, same size as `source`.
/// * `source_landmarks` - Landmarks on the source image as `[x, y]`.
/// * `target_landmarks` - Corresponding landmarks on the target image.
/// * `warp_fracs` - The warp fraction of every frame.
/// * `dissolve_fracs` - The dissolve fraction of every frame.
///
/// # Returns
///
/// One frame per fraction pair, each with the size of the inputs.
pub fn morph(
    source: &Image<u8, 3>,
    target: &Image<u8, 3>,
    source_landmarks: &[Point2],
    target_landmarks: &[Point2],
    warp_fracs: &[f64],
    dissolve_fracs: &[f64],
) -> Result<Vec<Image<u8, 3>>, MorphError> {
    let schedule = FrameSchedule::new(warp_fracs.to_vec(), dissolve_fracs.to_vec())?;
    let morpher = Morpher::new(
        source,
        target,
        source_landmarks,
        target_landmarks,
        WarpOptions::default(),
    )?;
    morpher.frames(&schedule).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimorph_image::ImageSize;

    fn size() -> ImageSize {
        ImageSize {
            width: 4,
            height: 4,
        }
    }

    fn landmarks() -> Vec<Point2> {
        vec![[0.0, 0.0], [3.0, 0.0], [0.0, 3.0], [3.0, 3.0]]
    }

    #[test]
    fn test_red_to_blue() -> Result<(), MorphError> {
        let red = Image::<u8, 3>::from_size_pixel(size(), [255, 0, 0])?;
        let blue = Image::<u8, 3>::from_size_pixel(size(), [0, 0, 255])?;
        let pts = landmarks();

        let frames = morph(&red, &blue, &pts, &pts, &[0.5], &[0.5])?;
        assert_eq!(frames.len(), 1);
        assert!(frames[0]
            .as_slice()
            .chunks_exact(3)
            .all(|p| p == [127, 0, 127]));
        Ok(())
    }

    #[test]
    fn test_linear_schedule() -> Result<(), MorphError> {
        let red = Image::<u8, 3>::from_size_pixel(size(), [255, 0, 0])?;
        let blue = Image::<u8, 3>::from_size_pixel(size(), [0, 0, 255])?;
        let pts = landmarks();

        let schedule = FrameSchedule::linear(5);
        let frames = morph(
            &red,
            &blue,
            &pts,
            &pts,
            schedule.warp_fractions(),
            schedule.dissolve_fractions(),
        )?;
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[0], red);
        for frame in &frames {
            assert_eq!(frame.size(), size());
        }
        // red decreases monotonically while blue increases
        let reds = frames.iter().map(|f| f.as_slice()[0]).collect::<Vec<_>>();
        assert!(reds.windows(2).all(|w| w[0] > w[1]));
        Ok(())
    }

    #[test]
    fn test_boundaries() -> Result<(), MorphError> {
        let mut a = Image::<u8, 3>::from_size_val(size(), 0)?;
        let mut b = Image::<u8, 3>::from_size_val(size(), 0)?;
        for (i, (pa, pb)) in a
            .as_slice_mut()
            .iter_mut()
            .zip(b.as_slice_mut().iter_mut())
            .enumerate()
        {
            *pa = (i * 5) as u8;
            *pb = 255 - (i * 3) as u8;
        }
        let pts_a = vec![[1.0, 1.0], [2.0, 1.0], [1.0, 2.0], [2.0, 2.0]];
        let pts_b = vec![[1.5, 0.5], [2.5, 1.0], [0.5, 2.0], [2.0, 2.5]];

        let frames = morph(&a, &b, &pts_a, &pts_b, &[0.0, 1.0], &[0.0, 1.0])?;
        assert_eq!(frames[0], a);
        assert_eq!(frames[1], b);
        Ok(())
    }

    #[test]
    fn test_invalid_input_before_frames() -> Result<(), MorphError> {
        let img = Image::<u8, 3>::from_size_val(size(), 0)?;
        let pts = landmarks();
        assert_eq!(
            morph(&img, &img, &pts, &pts, &[0.0, 0.5], &[0.0]),
            Err(MorphError::FractionCountMismatch(2, 1))
        );
        assert!(matches!(
            morph(&img, &img, &pts, &pts, &[0.0, f64::NAN], &[0.0, 0.5]),
            Err(MorphError::InvalidFraction(v)) if v.is_nan()
        ));
        assert_eq!(
            morph(&img, &img, &pts, &pts[..2], &[0.5], &[0.5]),
            Err(MorphError::LandmarkCountMismatch(4, 2))
        );
        assert_eq!(morph(&img, &img, &pts, &pts, &[], &[])?.len(), 0);
        Ok(())
    }

    #[test]
    fn test_frames_are_lazy() -> Result<(), MorphError> {
        let img = Image::<u8, 3>::from_size_pixel(size(), [1, 2, 3])?;
        let pts = landmarks();
        let morpher = Morpher::new(&img, &img, &pts, &pts, WarpOptions::default())?;
        let schedule = FrameSchedule::linear(50);
        let first_two = morpher
            .frames(&schedule)
            .take(2)
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(first_two.len(), 2);
        assert_eq!(first_two[1], img);
        Ok(())
    }

    #[test]
    fn test_schedule_validation() {
        assert_eq!(
            FrameSchedule::new(vec![0.0, 1.2], vec![0.0, 0.5]),
            Err(MorphError::InvalidFraction(1.2))
        );
        let schedule = FrameSchedule::linear(2);
        assert_eq!(schedule.iter().collect::<Vec<_>>(), vec![(0.0, 0.0), (0.5, 0.5)]);
        assert!(FrameSchedule::linear(0).is_empty());
    }
}
