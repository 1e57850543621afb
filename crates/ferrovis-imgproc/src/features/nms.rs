use ferrovis_image::{Image, ImageError};
use rayon::{iter::IndexedParallelIterator, iter::ParallelIterator, slice::ParallelSliceMut};

/// The value written into suppressed pixels of a response map.
///
/// It is far below any cornerness a `[0, 1]` image can produce, so a
/// suppressed pixel never passes a keypoint threshold.
pub const SUPPRESSED_RESPONSE: f32 = -999_999.0;

/// Suppress every response that is not a local maximum.
///
/// Each pixel looks at the `(2 * radius + 1)^2` window centered on itself,
/// sampling outside the image with clamped coordinates. If any pixel in the
/// window is strictly greater, the output holds [`SUPPRESSED_RESPONSE`];
/// otherwise it keeps its response. Equal neighbours do not suppress each
/// other, so plateaus survive whole.
///
/// # Arguments
///
/// * `response` - A single channel response map.
/// * `radius` - The distance to look for larger responses.
///
/// # Errors
///
/// Returns [`ImageError::InvalidChannelCount`] if `response` has more than one channel.
///
/// # Examples
///
/// ```
/// use ferrovis_image::Image;
/// use ferrovis_imgproc::features::{non_max_suppression, SUPPRESSED_RESPONSE};
///
/// let response = Image::new([3, 1].into(), 1, vec![1.0, 3.0, 2.0]).unwrap();
/// let out = non_max_suppression(&response, 1).unwrap();
///
/// assert_eq!(out.as_slice(), &[SUPPRESSED_RESPONSE, 3.0, SUPPRESSED_RESPONSE]);
/// ```
pub fn non_max_suppression(response: &Image, radius: usize) -> Result<Image, ImageError> {
    if response.num_channels() != 1 {
        return Err(ImageError::InvalidChannelCount(
            response.num_channels(),
            1,
        ));
    }

    let mut dst = response.clone();

    let cols = response.cols();
    if cols == 0 || response.rows() == 0 {
        return Ok(dst);
    }

    let half = radius as isize;

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let y = y as isize;
            dst_row.iter_mut().enumerate().for_each(|(x, dst_pixel)| {
                let x = x as isize;
                let center = *dst_pixel;

                let dominated = (-half..=half).any(|wy| {
                    (-half..=half).any(|wx| response.get_pixel(x + wx, y + wy, 0) > center)
                });

                if dominated {
                    *dst_pixel = SUPPRESSED_RESPONSE;
                }
            });
        });

    Ok(dst)
}
