use rayon::prelude::*;
use trimorph_image::{ops::ensure_same_size, Image, ImageError};

/// Controls how the per-pixel loops are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,
}

/// Apply a function to each pixel of two images and write into a third one, in parallel by rows.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the three images differ in size.
pub fn par_iter_rows_val_two<T1, T2, T3, const C: usize>(
    src1: &Image<T1, C>,
    src2: &Image<T2, C>,
    dst: &mut Image<T3, C>,
    f: impl Fn(&T1, &T2, &mut T3) + Send + Sync,
) -> Result<(), ImageError>
where
    T1: Send + Sync,
    T2: Send + Sync,
    T3: Send + Sync,
{
    ensure_same_size(src1, src2)?;
    ensure_same_size(src1, dst)?;
    if src1.size().num_pixels() == 0 {
        return Ok(());
    }

    let stride = C * src1.cols();
    src1.as_slice()
        .par_chunks_exact(stride)
        .zip(src2.as_slice().par_chunks_exact(stride))
        .zip(dst.as_slice_mut().par_chunks_exact_mut(stride))
        .for_each(|((src1_chunk, src2_chunk), dst_chunk)| {
            src1_chunk
                .iter()
                .zip(src2_chunk.iter())
                .zip(dst_chunk.iter_mut())
                .for_each(|((src1_pixel, src2_pixel), dst_pixel)| {
                    f(src1_pixel, src2_pixel, dst_pixel);
                });
        });

    Ok(())
}

/// Fill two images of the same size row by row.
///
/// The function receives the row index and the mutable row slices of both images.
///
/// # Arguments
///
/// * `strategy` - Whether rows are processed on the Rayon thread pool or serially.
/// * `dst1` - The first output image.
/// * `dst2` - The second output image.
/// * `f` - The per-row kernel.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the images differ in size.
pub fn iter_rows_pair<T1, T2, const C: usize>(
    strategy: ExecutionStrategy,
    dst1: &mut Image<T1, C>,
    dst2: &mut Image<T2, C>,
    f: impl Fn(usize, &mut [T1], &mut [T2]) + Send + Sync,
) -> Result<(), ImageError>
where
    T1: Send + Sync,
    T2: Send + Sync,
{
    ensure_same_size(dst1, dst2)?;
    if dst1.size().num_pixels() == 0 {
        return Ok(());
    }

    let stride = C * dst1.cols();
    let rows1 = dst1.as_slice_mut();
    let rows2 = dst2.as_slice_mut();

    match strategy {
        ExecutionStrategy::ParallelRows => {
            rows1
                .par_chunks_exact_mut(stride)
                .zip(rows2.par_chunks_exact_mut(stride))
                .enumerate()
                .for_each(|(row, (row1, row2))| f(row, row1, row2));
        }
        ExecutionStrategy::Serial => {
            rows1
                .chunks_exact_mut(stride)
                .zip(rows2.chunks_exact_mut(stride))
                .enumerate()
                .for_each(|(row, (row1, row2))| f(row, row1, row2));
        }
    }

    Ok(())
}
