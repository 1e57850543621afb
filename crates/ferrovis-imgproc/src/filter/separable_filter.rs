use ferrovis_image::{Image, ImageError};

use super::{
    convolve,
    kernels::{self, KernelAxis},
    ConvolveMode,
};

/// Apply a separable filter as two sequential one dimensional convolutions.
///
/// The horizontal pass runs first and its output feeds the vertical pass.
/// Both passes keep the channels of `src`.
///
/// # Arguments
///
/// * `src` - The source image with shape (C, H, W).
/// * `kernel_x` - The horizontal kernel, a single row.
/// * `kernel_y` - The vertical kernel, a single column.
///
/// # Errors
///
/// Returns the errors of [`convolve`] for either pass.
pub fn separable_filter(
    src: &Image,
    kernel_x: &Image,
    kernel_y: &Image,
) -> Result<Image, ImageError> {
    let horizontal = convolve(src, kernel_x, ConvolveMode::Preserve)?;
    convolve(&horizontal, kernel_y, ConvolveMode::Preserve)
}

/// Smooth an image with a separable gaussian of standard deviation `sigma`.
///
/// Equivalent, up to float rounding, to a convolution with
/// [`kernels::gaussian_kernel_2d`] but with `O(k)` instead of `O(k^2)` taps
/// per pixel.
///
/// # Errors
///
/// Returns [`ImageError::InvalidSigma`] if `sigma` is not a positive finite number.
pub fn gaussian_smooth(src: &Image, sigma: f32) -> Result<Image, ImageError> {
    let kernel_x = kernels::gaussian_kernel_1d(sigma, KernelAxis::Horizontal)?;
    let kernel_y = kernels::gaussian_kernel_1d(sigma, KernelAxis::Vertical)?;
    separable_filter(src, &kernel_x, &kernel_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_separable_filter() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::new(
            [5, 5].into(),
            1,
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 9.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )?;

        let kernel_x = Image::from_rows([[1.0, 1.0, 1.0]]);
        let kernel_y = Image::from_rows([[1.0], [1.0], [1.0]]);
        let out = separable_filter(&image, &kernel_x, &kernel_y)?;

        #[rustfmt::skip]
        assert_eq!(
            out.as_slice(),
            &[
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 9.0, 9.0, 9.0, 0.0,
                0.0, 9.0, 9.0, 9.0, 0.0,
                0.0, 9.0, 9.0, 9.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_gaussian_smooth_matches_2d() -> Result<(), ImageError> {
        let data = (0..8 * 6 * 2).map(|i| ((i * 37) % 11) as f32 / 10.0).collect();
        let image = Image::new([8, 6].into(), 2, data)?;

        let sigma = 0.8;
        let separable = gaussian_smooth(&image, sigma)?;
        let direct = convolve(
            &image,
            &kernels::gaussian_kernel_2d(sigma)?,
            ConvolveMode::Preserve,
        )?;

        assert_eq!(separable.num_channels(), 2);
        for (&a, &b) in separable.as_slice().iter().zip(direct.as_slice()) {
            assert_relative_eq!(a, b, epsilon = 1e-5);
        }
        Ok(())
    }

    #[test]
    fn test_gaussian_smooth_invalid_sigma() -> Result<(), ImageError> {
        let image = Image::zeros([3, 3].into(), 1)?;
        assert_eq!(
            gaussian_smooth(&image, 0.0),
            Err(ImageError::InvalidSigma(0.0))
        );
        Ok(())
    }
}
