use crate::{Image, ImageError};

/// Add a constant to every pixel of one channel, in place.
///
/// # Arguments
///
/// * `image` - The image to modify.
/// * `ch` - The channel to shift.
/// * `val` - The value to add.
///
/// # Errors
///
/// If the channel index is out of bounds, an error is returned.
///
/// Example:
///
/// ```
/// use ferrovis_image::{ops, Image};
///
/// let mut image = Image::from_size_val([2, 1].into(), 2, 0.25).unwrap();
/// ops::shift(&mut image, 1, 0.5).unwrap();
///
/// assert_eq!(image.as_slice(), &[0.25, 0.25, 0.75, 0.75]);
/// ```
pub fn shift(image: &mut Image, ch: usize, val: f32) -> Result<(), ImageError> {
    if ch >= image.num_channels() {
        return Err(ImageError::ChannelIndexOutOfBounds(
            ch,
            image.num_channels(),
        ));
    }

    image
        .channel_slice_mut(ch)
        .iter_mut()
        .for_each(|p| *p += val);

    Ok(())
}

/// Clamp every pixel of the image into `[0, 1]`, in place.
pub fn clamp(image: &mut Image) {
    image
        .as_slice_mut()
        .iter_mut()
        .for_each(|p| *p = p.clamp(0.0, 1.0));
}

fn check_same_shape(a: &Image, b: &Image) -> Result<(), ImageError> {
    if a.size() != b.size() {
        return Err(ImageError::InvalidImageSize(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        ));
    }
    if a.num_channels() != b.num_channels() {
        return Err(ImageError::InvalidChannelCount(
            b.num_channels(),
            a.num_channels(),
        ));
    }
    Ok(())
}

/// Add two images pixel by pixel into a new image.
///
/// # Errors
///
/// Both images must have the same size and number of channels.
pub fn add(a: &Image, b: &Image) -> Result<Image, ImageError> {
    check_same_shape(a, b)?;
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| x + y)
        .collect();
    Image::new(a.size(), a.num_channels(), data)
}

/// Subtract `b` from `a` pixel by pixel into a new image.
///
/// # Errors
///
/// Both images must have the same size and number of channels.
pub fn sub(a: &Image, b: &Image) -> Result<Image, ImageError> {
    check_same_shape(a, b)?;
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| x - y)
        .collect();
    Image::new(a.size(), a.num_channels(), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift() -> Result<(), ImageError> {
        let mut image = Image::new([2, 1].into(), 3, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6])?;
        shift(&mut image, 2, 1.0)?;
        assert_eq!(image.channel_slice(0), &[0.1, 0.2]);
        assert_eq!(image.channel_slice(1), &[0.3, 0.4]);
        approx::assert_relative_eq!(image.channel_slice(2)[0], 1.5);
        approx::assert_relative_eq!(image.channel_slice(2)[1], 1.6);

        assert_eq!(
            shift(&mut image, 3, 1.0),
            Err(ImageError::ChannelIndexOutOfBounds(3, 3))
        );
        Ok(())
    }

    #[test]
    fn test_clamp() -> Result<(), ImageError> {
        let mut image = Image::new([4, 1].into(), 1, vec![-0.5, 0.0, 0.5, 1.5])?;
        clamp(&mut image);
        assert_eq!(image.as_slice(), &[0.0, 0.0, 0.5, 1.0]);
        Ok(())
    }

    #[test]
    fn test_add_sub() -> Result<(), ImageError> {
        let a = Image::new([2, 1].into(), 1, vec![1.0, 2.0])?;
        let b = Image::new([2, 1].into(), 1, vec![0.5, 4.0])?;

        assert_eq!(add(&a, &b)?.as_slice(), &[1.5, 6.0]);
        assert_eq!(sub(&a, &b)?.as_slice(), &[0.5, -2.0]);

        // low + high frequency reconstruction gives back the input
        let low = Image::new([2, 1].into(), 1, vec![0.75, 1.0])?;
        let high = sub(&a, &low)?;
        assert_eq!(add(&low, &high)?, a);
        Ok(())
    }

    #[test]
    fn test_add_shape_mismatch() -> Result<(), ImageError> {
        let a = Image::zeros([2, 1].into(), 1)?;
        let b = Image::zeros([1, 2].into(), 1)?;
        let c = Image::zeros([2, 1].into(), 3)?;

        assert_eq!(add(&a, &b), Err(ImageError::InvalidImageSize(2, 1, 1, 2)));
        assert_eq!(sub(&a, &c), Err(ImageError::InvalidChannelCount(3, 1)));
        Ok(())
    }
}
