use ferrovis_image::{Image, ImageError};

/// Side of the square patch sampled by a descriptor.
pub const DESCRIPTOR_PATCH_SIZE: usize = 5;

/// A keypoint location and the signature of the patch around it.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Column of the keypoint in the source image.
    pub x: usize,
    /// Row of the keypoint in the source image.
    pub y: usize,
    /// Patch values relative to the center pixel, `5 * 5 * C` entries.
    pub data: Vec<f32>,
}

impl Descriptor {
    /// The keypoint location as `(x, y)`.
    pub fn point(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// The number of values in the descriptor.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the descriptor holds no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Describe the pixel at `(x, y)` by the 5x5 patch around it.
///
/// For every channel, the patch is walked column by column (`dx` outer,
/// `dy` inner, both in `-2..=2`) and each entry is the center value minus
/// the neighbour value, which cancels a uniform brightness offset. Samples
/// outside the image use clamped coordinates.
///
/// # Panics
///
/// Panics if the image is empty.
pub fn describe_point(src: &Image, x: usize, y: usize) -> Descriptor {
    let half = (DESCRIPTOR_PATCH_SIZE / 2) as isize;
    let (cx, cy) = (x as isize, y as isize);

    let mut data =
        Vec::with_capacity(DESCRIPTOR_PATCH_SIZE * DESCRIPTOR_PATCH_SIZE * src.num_channels());
    for ch in 0..src.num_channels() {
        let center = src.get_pixel(cx, cy, ch);
        for dx in -half..=half {
            for dy in -half..=half {
                data.push(center - src.get_pixel(cx + dx, cy + dy, ch));
            }
        }
    }

    Descriptor { x, y, data }
}

/// Describe the pixel at the linear row-major `index` of a channel plane.
///
/// # Panics
///
/// Panics if the image is empty.
pub fn describe_index(src: &Image, index: usize) -> Descriptor {
    let width = src.width().max(1);
    describe_point(src, index % width, index / width)
}

/// Extract a descriptor for every pixel whose suppressed response exceeds `threshold`.
///
/// Qualifying pixels are counted first so the output is allocated once, then
/// described in raster order (by increasing row, then column).
///
/// # Arguments
///
/// * `src` - The image the descriptors sample.
/// * `suppressed` - A single channel response map with the size of `src`.
/// * `threshold` - The strict lower bound on the response.
///
/// # Errors
///
/// Returns [`ImageError::InvalidChannelCount`] if `suppressed` has more than
/// one channel and [`ImageError::InvalidImageSize`] if the sizes differ.
pub fn extract_keypoints(
    src: &Image,
    suppressed: &Image,
    threshold: f32,
) -> Result<Vec<Descriptor>, ImageError> {
    if suppressed.num_channels() != 1 {
        return Err(ImageError::InvalidChannelCount(
            suppressed.num_channels(),
            1,
        ));
    }

    if src.size() != suppressed.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            suppressed.cols(),
            suppressed.rows(),
        ));
    }

    let responses = suppressed.as_slice();
    let count = responses.iter().filter(|&&r| r > threshold).count();

    let mut keypoints = Vec::with_capacity(count);
    keypoints.extend(
        responses
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r > threshold)
            .map(|(index, _)| describe_index(src, index)),
    );

    Ok(keypoints)
}
