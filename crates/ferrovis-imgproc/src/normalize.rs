//! In-place normalization of images and kernels.
//!
//! * [`l1_normalize`] scales the elements so that they sum to one, used to
//!   build blur kernels that keep the overall brightness of an image.
//! * [`feature_normalize`] rescales the elements into `[0, 1]` with a min-max
//!   transform, used to visualise filter responses.

use ferrovis_image::{Image, ImageError};

/// Divide every element of the image by the sum over all channels and positions.
///
/// # Errors
///
/// Returns [`ImageError::ZeroSumNormalization`] when the elements sum to
/// exactly zero. The image is left untouched in that case. A NaN sum is not
/// an error and spreads to every element.
///
/// # Examples
///
/// ```
/// use ferrovis_image::Image;
/// use ferrovis_imgproc::normalize::l1_normalize;
///
/// let mut kernel = Image::new([2, 2].into(), 1, vec![1.0, 1.0, 1.0, 1.0]).unwrap();
/// l1_normalize(&mut kernel).unwrap();
///
/// assert_eq!(kernel.as_slice(), &[0.25, 0.25, 0.25, 0.25]);
/// ```
pub fn l1_normalize(src: &mut Image) -> Result<(), ImageError> {
    let sum = src.as_slice().iter().sum::<f32>();
    if sum == 0.0 {
        return Err(ImageError::ZeroSumNormalization);
    }

    src.as_slice_mut().iter_mut().for_each(|v| *v /= sum);

    Ok(())
}

/// Rescale the elements of the image into `[0, 1]` using its global min and max.
///
/// The extremes are taken over all channels together. An image whose elements
/// are all equal has no range to stretch and is filled with zeros.
///
/// # Examples
///
/// ```
/// use ferrovis_image::Image;
/// use ferrovis_imgproc::normalize::feature_normalize;
///
/// let mut image = Image::new([3, 1].into(), 1, vec![-2.0, 0.0, 2.0]).unwrap();
/// feature_normalize(&mut image);
///
/// assert_eq!(image.as_slice(), &[0.0, 0.5, 1.0]);
/// ```
pub fn feature_normalize(src: &mut Image) {
    let (min, max) = src
        .as_slice()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });

    let range = max - min;
    if range == 0.0 {
        src.as_slice_mut().fill(0.0);
        return;
    }

    src.as_slice_mut()
        .iter_mut()
        .for_each(|v| *v = (*v - min) / range);
}
