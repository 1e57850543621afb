use ferrovis_image::{Image, ImageError};

use super::{convolve, gaussian_smooth, kernels, ConvolveMode};

/// Blur an image using a box filter.
///
/// # Arguments
///
/// * `src` - The source image with shape (C, H, W).
/// * `kernel_size` - The side of the square box, rounded up to odd.
///
/// # Returns
///
/// The blurred image with the same shape as `src`.
pub fn box_blur(src: &Image, kernel_size: usize) -> Result<Image, ImageError> {
    let kernel = kernels::box_kernel(kernel_size)?;
    convolve(src, &kernel, ConvolveMode::Preserve)
}

/// Blur an image using a gaussian filter.
///
/// The blur is computed with the separable form, see [`gaussian_smooth`].
///
/// # Arguments
///
/// * `src` - The source image with shape (C, H, W).
/// * `sigma` - The standard deviation of the gaussian.
///
/// # Returns
///
/// The blurred image with the same shape as `src`.
pub fn gaussian_blur(src: &Image, sigma: f32) -> Result<Image, ImageError> {
    gaussian_smooth(src, sigma)
}
