use ferrovis_image::{Image, ImageError};
use rayon::{iter::IndexedParallelIterator, iter::ParallelIterator, slice::ParallelSliceMut};

/// How the channels of the source image map to the channels of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvolveMode {
    /// Keep one output channel per input channel.
    #[default]
    Preserve,
    /// Collapse to a single output channel holding the sum of the per-channel results.
    Sum,
}

impl From<bool> for ConvolveMode {
    fn from(preserve: bool) -> Self {
        if preserve {
            ConvolveMode::Preserve
        } else {
            ConvolveMode::Sum
        }
    }
}

/// Correlate one channel of `src` with one channel of `kernel` around `(x, y)`.
///
/// Samples falling outside the image are clamped to the nearest edge pixel.
/// The sum is accumulated in `f64` so that kernels whose taps cancel give
/// exactly zero on flat regions.
#[inline]
fn correlate_at(
    src: &Image,
    kernel: &Image,
    x: usize,
    y: usize,
    ch: usize,
    kernel_ch: usize,
) -> f64 {
    let half_w = (kernel.width() / 2) as isize;
    let half_h = (kernel.height() / 2) as isize;

    let mut sum = 0.0f64;
    for (fy, taps) in kernel
        .channel_slice(kernel_ch)
        .chunks_exact(kernel.width())
        .enumerate()
    {
        let sy = y as isize + fy as isize - half_h;
        for (fx, &k) in taps.iter().enumerate() {
            let sx = x as isize + fx as isize - half_w;
            sum += k as f64 * src.get_pixel(sx, sy, ch) as f64;
        }
    }
    sum
}

/// Convolve an image with a filter kernel.
///
/// The kernel is applied as a direct spatial correlation centered on the tap
/// `(kernel.width() / 2, kernel.height() / 2)`. Samples outside the image are
/// clamped to the nearest edge pixel, never zero padded.
///
/// # Arguments
///
/// * `src` - The source image with shape (C, H, W).
/// * `kernel` - The filter, with either one channel shared by every image
///   channel or one channel per image channel.
/// * `mode` - Whether to keep the channels of `src` or to sum them into one.
///
/// # Returns
///
/// A newly allocated image with the same size as `src` and either `C` or one channel.
///
/// # Errors
///
/// If the kernel channel count is neither one nor the image channel count,
/// or the kernel is empty, an error is returned and nothing is computed.
///
/// # Examples
///
/// ```
/// use ferrovis_image::Image;
/// use ferrovis_imgproc::filter::{convolve, ConvolveMode};
///
/// let image = Image::new([3, 1].into(), 1, vec![1.0, 2.0, 3.0]).unwrap();
/// let shift_left = Image::from_rows([[0.0, 0.0, 1.0]]);
///
/// let out = convolve(&image, &shift_left, ConvolveMode::Preserve).unwrap();
/// assert_eq!(out.as_slice(), &[2.0, 3.0, 3.0]);
/// ```
pub fn convolve(src: &Image, kernel: &Image, mode: ConvolveMode) -> Result<Image, ImageError> {
    let channels = src.num_channels();
    let kernel_channels = kernel.num_channels();
    if kernel_channels != 1 && kernel_channels != channels {
        return Err(ImageError::KernelChannelMismatch(kernel_channels, channels));
    }

    if kernel.width() == 0 || kernel.height() == 0 {
        return Err(ImageError::EmptyKernel(kernel.width(), kernel.height()));
    }

    let kernel_ch = |ch: usize| if kernel_channels == 1 { 0 } else { ch };

    let out_channels = match mode {
        ConvolveMode::Preserve => channels,
        ConvolveMode::Sum => 1,
    };
    let mut dst = Image::zeros(src.size(), out_channels)?;

    let (cols, rows) = (src.cols(), src.rows());
    if cols == 0 || rows == 0 {
        return Ok(dst);
    }

    match mode {
        ConvolveMode::Preserve => {
            // the planar buffer is a stack of C * H rows
            dst.as_slice_mut()
                .par_chunks_exact_mut(cols)
                .enumerate()
                .for_each(|(plane_row, dst_row)| {
                    let (ch, y) = (plane_row / rows, plane_row % rows);
                    dst_row.iter_mut().enumerate().for_each(|(x, out)| {
                        *out = correlate_at(src, kernel, x, y, ch, kernel_ch(ch)) as f32;
                    });
                });
        }
        ConvolveMode::Sum => {
            dst.as_slice_mut()
                .par_chunks_exact_mut(cols)
                .enumerate()
                .for_each(|(y, dst_row)| {
                    dst_row.iter_mut().enumerate().for_each(|(x, out)| {
                        *out = (0..channels).fold(0.0f64, |acc, ch| {
                            acc + correlate_at(src, kernel, x, y, ch, kernel_ch(ch))
                        }) as f32;
                    });
                });
        }
    }

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernels;

    #[test]
    fn test_convolve_identity() -> Result<(), ImageError> {
        let image = Image::new([3, 2].into(), 2, (0..12).map(|x| x as f32).collect())?;
        let identity = Image::from_rows([[1.0]]);

        let out = convolve(&image, &identity, ConvolveMode::Preserve)?;
        assert_eq!(out, image);
        Ok(())
    }

    #[test]
    fn test_convolve_clamped_border() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::new(
            [3, 3].into(),
            1,
            vec![
                0.0, 1.0, 2.0,
                3.0, 4.0, 5.0,
                6.0, 7.0, 8.0,
            ],
        )?;

        // samples the right neighbour, the last column clamps onto itself
        #[rustfmt::skip]
        let kernel = Image::from_rows([
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
        ]);
        let out = convolve(&image, &kernel, ConvolveMode::Preserve)?;

        #[rustfmt::skip]
        assert_eq!(
            out.as_slice(),
            &[
                1.0, 2.0, 2.0,
                4.0, 5.0, 5.0,
                7.0, 8.0, 8.0,
            ]
        );

        // samples the upper neighbour, the first row clamps onto itself
        #[rustfmt::skip]
        let kernel = Image::from_rows([
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
        ]);
        let out = convolve(&image, &kernel, ConvolveMode::Preserve)?;

        #[rustfmt::skip]
        assert_eq!(
            out.as_slice(),
            &[
                0.0, 1.0, 2.0,
                0.0, 1.0, 2.0,
                3.0, 4.0, 5.0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_convolve_even_kernel_center() -> Result<(), ImageError> {
        // a 2-wide kernel has its center tap at index 1
        let image = Image::new([3, 1].into(), 1, vec![1.0, 2.0, 3.0])?;
        let kernel = Image::from_rows([[1.0, 0.0]]);

        let out = convolve(&image, &kernel, ConvolveMode::Preserve)?;
        assert_eq!(out.as_slice(), &[1.0, 1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn test_convolve_sum_mode() -> Result<(), ImageError> {
        let image = Image::new([2, 1].into(), 3, vec![1.0, 2.0, 10.0, 20.0, 100.0, 200.0])?;
        let identity = Image::from_rows([[1.0]]);

        let out = convolve(&image, &identity, ConvolveMode::Sum)?;
        assert_eq!(out.num_channels(), 1);
        assert_eq!(out.as_slice(), &[111.0, 222.0]);

        // the boolean flag maps onto the same modes
        let out = convolve(&image, &identity, false.into())?;
        assert_eq!(out.as_slice(), &[111.0, 222.0]);
        Ok(())
    }

    #[test]
    fn test_convolve_per_channel_kernel() -> Result<(), ImageError> {
        let image = Image::new([2, 1].into(), 2, vec![1.0, 2.0, 3.0, 4.0])?;
        let kernel = Image::new([1, 1].into(), 2, vec![2.0, -1.0])?;

        let out = convolve(&image, &kernel, ConvolveMode::Preserve)?;
        assert_eq!(out.as_slice(), &[2.0, 4.0, -3.0, -4.0]);

        let out = convolve(&image, &kernel, ConvolveMode::Sum)?;
        assert_eq!(out.as_slice(), &[-1.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_convolve_channel_mismatch() -> Result<(), ImageError> {
        let image = Image::zeros([4, 4].into(), 3)?;
        let kernel = Image::zeros([3, 3].into(), 2)?;

        assert_eq!(
            convolve(&image, &kernel, ConvolveMode::Preserve),
            Err(ImageError::KernelChannelMismatch(2, 3))
        );

        let empty = Image::zeros([0, 3].into(), 1)?;
        assert_eq!(
            convolve(&image, &empty, ConvolveMode::Preserve),
            Err(ImageError::EmptyKernel(0, 3))
        );
        Ok(())
    }

    #[test]
    fn test_convolve_constant_image() -> Result<(), ImageError> {
        let image = Image::from_size_val([7, 5].into(), 3, 0.6)?;

        for kernel in [
            kernels::box_kernel(3)?,
            kernels::box_kernel(5)?,
            kernels::gaussian_kernel_2d(1.0)?,
        ] {
            let out = convolve(&image, &kernel, ConvolveMode::Preserve)?;
            assert_eq!(out.num_channels(), 3);
            for &v in out.as_slice() {
                approx::assert_relative_eq!(v, 0.6, epsilon = 1e-5);
            }
        }
        Ok(())
    }

    #[test]
    fn test_convolve_propagates_nan() -> Result<(), ImageError> {
        let mut image = Image::zeros([7, 7].into(), 1)?;
        image.set_pixel(3, 3, 0, f32::NAN);

        let out = convolve(&image, &kernels::box_kernel(3)?, ConvolveMode::Preserve)?;
        assert!(out.get_pixel(3, 3, 0).is_nan());
        assert!(out.get_pixel(2, 4, 0).is_nan());
        assert_eq!(out.get_pixel(0, 0, 0), 0.0);
        assert_eq!(out.get_pixel(6, 6, 0), 0.0);
        Ok(())
    }
}
