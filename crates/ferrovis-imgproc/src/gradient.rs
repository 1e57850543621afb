use ferrovis_image::{Image, ImageError};
use rayon::prelude::*;

use crate::filter::{convolve, kernels, ConvolveMode};

/// Compute the first order spatial derivatives of an image.
///
/// Every channel of `src` is convolved with the sobel kernels and the
/// per-channel results are summed, so both outputs are single channel.
///
/// # Returns
///
/// The horizontal and vertical derivatives `(Ix, Iy)`.
pub fn spatial_gradient(src: &Image) -> Result<(Image, Image), ImageError> {
    let ix = convolve(src, &kernels::sobel_x_kernel(), ConvolveMode::Sum)?;
    let iy = convolve(src, &kernels::sobel_y_kernel(), ConvolveMode::Sum)?;
    Ok((ix, iy))
}

/// The result of the sobel operator.
#[derive(Debug, Clone, PartialEq)]
pub struct SobelOutput {
    /// Gradient magnitude `sqrt(Ix^2 + Iy^2)`, single channel.
    pub magnitude: Image,
    /// Gradient direction `atan2(Ix, Iy)` in radians, single channel.
    pub direction: Image,
}

/// Compute the gradient magnitude and direction of an image.
///
/// The direction is `atan2(Ix, Iy)`, which measures the angle from the
/// vertical axis. A direction that evaluates to NaN is replaced by zero;
/// the magnitude is returned as computed.
///
/// # Examples
///
/// ```
/// use ferrovis_image::Image;
/// use ferrovis_imgproc::gradient::sobel;
///
/// let image = Image::from_size_val([5, 5].into(), 3, 0.25).unwrap();
/// let out = sobel(&image).unwrap();
///
/// assert!(out.magnitude.as_slice().iter().all(|&v| v == 0.0));
/// assert!(out.direction.as_slice().iter().all(|&v| v == 0.0));
/// ```
pub fn sobel(src: &Image) -> Result<SobelOutput, ImageError> {
    let (ix, iy) = spatial_gradient(src)?;

    let mut magnitude = Image::zeros(src.size(), 1)?;
    let mut direction = Image::zeros(src.size(), 1)?;

    magnitude
        .as_slice_mut()
        .par_iter_mut()
        .zip(direction.as_slice_mut().par_iter_mut())
        .zip(ix.as_slice().par_iter().zip(iy.as_slice().par_iter()))
        .for_each(|((mag, dir), (&gx, &gy))| {
            *mag = (gx * gx + gy * gy).sqrt();
            let theta = gx.atan2(gy);
            *dir = if theta.is_nan() { 0.0 } else { theta };
        });

    Ok(SobelOutput {
        magnitude,
        direction,
    })
}
