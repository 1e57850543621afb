use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use ferrovis_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels in a single channel plane.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// Represents an image with planar `f32` pixel data.
///
/// The pixels are stored channel-major: channel `k` occupies the contiguous
/// block `[k * w * h, (k + 1) * w * h)` of the buffer and each block is
/// row-major. Values loaded from 8-bit sources live in the `[0, 1]` range.
///
/// The same container is used for filter kernels, structure tensors and
/// response maps.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    size: ImageSize,
    channels: usize,
    data: Vec<f32>,
}

impl Image {
    /// Create a new image from planar pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `channels` - The number of channels, at least one.
    /// * `data` - The planar pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the number of channels is zero or the length of the pixel data does
    /// not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrovis_image::{Image, ImageSize};
    ///
    /// let image = Image::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     3,
    ///     vec![0f32; 10 * 20 * 3],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, channels: usize, data: Vec<f32>) -> Result<Self, ImageError> {
        if channels == 0 {
            return Err(ImageError::InvalidChannelCount(0, 1));
        }

        // check if the data length matches the image size
        let expected = size.area() * channels;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Create a new image with the given size and every element set to `val`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrovis_image::Image;
    ///
    /// let image = Image::from_size_val([4, 2].into(), 1, 0.5).unwrap();
    ///
    /// assert_eq!(image.as_slice(), &[0.5; 8]);
    /// ```
    pub fn from_size_val(size: ImageSize, channels: usize, val: f32) -> Result<Self, ImageError> {
        Image::new(size, channels, vec![val; size.area() * channels])
    }

    /// Create a new zero-filled image.
    pub fn zeros(size: ImageSize, channels: usize) -> Result<Self, ImageError> {
        Image::from_size_val(size, channels, 0.0)
    }

    /// Create a single channel image from rows of values.
    ///
    /// This is mostly used to write small fixed kernels as literals.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrovis_image::Image;
    ///
    /// let kernel = Image::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    ///
    /// assert_eq!(kernel.width(), 3);
    /// assert_eq!(kernel.height(), 2);
    /// assert_eq!(kernel.get_pixel(0, 1, 0), 4.0);
    /// ```
    pub fn from_rows<const W: usize, const H: usize>(rows: [[f32; W]; H]) -> Self {
        Self {
            size: ImageSize {
                width: W,
                height: H,
            },
            channels: 1,
            data: rows.iter().flatten().copied().collect(),
        }
    }

    /// Create an image from interleaved 8-bit data, scaling every value into `[0, 1]`.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `channels` - The number of interleaved channels.
    /// * `data` - The interleaved (H, W, C) pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrovis_image::Image;
    ///
    /// let image = Image::from_interleaved_u8([2, 1].into(), 2, &[0, 255, 255, 0]).unwrap();
    ///
    /// assert_eq!(image.as_slice(), &[0.0, 1.0, 1.0, 0.0]);
    /// ```
    pub fn from_interleaved_u8(
        size: ImageSize,
        channels: usize,
        data: &[u8],
    ) -> Result<Self, ImageError> {
        if channels == 0 {
            return Err(ImageError::InvalidChannelCount(0, 1));
        }

        let expected = size.area() * channels;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        let mut image = Image::zeros(size, channels)?;
        let plane = size.area();
        for (i, pixel) in data.chunks_exact(channels).enumerate() {
            for (ch, &v) in pixel.iter().enumerate() {
                image.data[ch * plane + i] = v as f32 / 255.0;
            }
        }

        Ok(image)
    }

    /// Convert the image into interleaved 8-bit data.
    ///
    /// Values are clamped into `[0, 1]` before being scaled by 255.
    pub fn to_interleaved_u8(&self) -> Vec<u8> {
        let plane = self.size.area();
        let mut out = Vec::with_capacity(self.data.len());
        for i in 0..plane {
            for ch in 0..self.channels {
                let v = self.data[ch * plane + i].clamp(0.0, 1.0);
                out.push((v * 255.0).round() as u8);
            }
        }
        out
    }

    /// Stack single channel images into one multi-channel image.
    ///
    /// # Errors
    ///
    /// Every input must be single channel and all inputs must share a size.
    pub fn from_channels(planes: &[Image]) -> Result<Self, ImageError> {
        let Some(first) = planes.first() else {
            return Err(ImageError::InvalidChannelCount(0, 1));
        };

        let size = first.size();
        let mut data = Vec::with_capacity(size.area() * planes.len());
        for plane in planes {
            if plane.num_channels() != 1 {
                return Err(ImageError::InvalidChannelCount(plane.num_channels(), 1));
            }
            if plane.size() != size {
                return Err(ImageError::InvalidImageSize(
                    size.width,
                    size.height,
                    plane.width(),
                    plane.height(),
                ));
            }
            data.extend_from_slice(plane.as_slice());
        }

        Image::new(size, planes.len(), data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        self.channels
    }

    /// Get the planar pixel buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get the planar pixel buffer mutably.
    pub fn as_slice_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the image and return its planar pixel buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Get the pixels of one channel plane.
    ///
    /// # Panics
    ///
    /// Panics if `ch` is not a valid channel index.
    pub fn channel_slice(&self, ch: usize) -> &[f32] {
        let plane = self.size.area();
        &self.data[ch * plane..(ch + 1) * plane]
    }

    /// Get the pixels of one channel plane mutably.
    ///
    /// # Panics
    ///
    /// Panics if `ch` is not a valid channel index.
    pub fn channel_slice_mut(&mut self, ch: usize) -> &mut [f32] {
        let plane = self.size.area();
        &mut self.data[ch * plane..(ch + 1) * plane]
    }

    /// Get a channel of the image as a new single channel image.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn channel(&self, ch: usize) -> Result<Image, ImageError> {
        if ch >= self.channels {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, self.channels));
        }
        Image::new(self.size, 1, self.channel_slice(ch).to_vec())
    }

    /// Split the image into its channels.
    pub fn split_channels(&self) -> Result<Vec<Image>, ImageError> {
        (0..self.channels).map(|ch| self.channel(ch)).collect()
    }

    /// Get a pixel value without any coordinate clamping.
    ///
    /// Returns `None` when `(x, y, ch)` falls outside the image.
    pub fn get(&self, x: usize, y: usize, ch: usize) -> Option<f32> {
        if x >= self.width() || y >= self.height() || ch >= self.channels {
            return None;
        }
        Some(self.data[self.offset(x, y, ch)])
    }

    /// Get a pixel value, clamping the coordinates to the nearest valid pixel.
    ///
    /// Out of range coordinates are neither wrapped nor zero padded: `x` is
    /// clamped into `[0, width - 1]` and `y` into `[0, height - 1]`.
    ///
    /// # Panics
    ///
    /// Panics if the image is empty or `ch` is not a valid channel index.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrovis_image::Image;
    ///
    /// let image = Image::new([2, 1].into(), 1, vec![1.0, 2.0]).unwrap();
    ///
    /// assert_eq!(image.get_pixel(-5, 0, 0), 1.0);
    /// assert_eq!(image.get_pixel(7, 3, 0), 2.0);
    /// ```
    #[inline]
    pub fn get_pixel(&self, x: isize, y: isize, ch: usize) -> f32 {
        let (x, y) = self.clamp_coords(x, y);
        self.data[self.offset_checked_channel(x, y, ch)]
    }

    /// Set a pixel value, clamping the coordinates to the nearest valid pixel.
    ///
    /// # Panics
    ///
    /// Panics if the image is empty or `ch` is not a valid channel index.
    #[inline]
    pub fn set_pixel(&mut self, x: isize, y: isize, ch: usize, val: f32) {
        let (x, y) = self.clamp_coords(x, y);
        let idx = self.offset_checked_channel(x, y, ch);
        self.data[idx] = val;
    }

    #[inline]
    fn clamp_coords(&self, x: isize, y: isize) -> (usize, usize) {
        let x = x.clamp(0, self.width() as isize - 1) as usize;
        let y = y.clamp(0, self.height() as isize - 1) as usize;
        (x, y)
    }

    #[inline]
    fn offset(&self, x: usize, y: usize, ch: usize) -> usize {
        ch * self.size.area() + y * self.width() + x
    }

    #[inline]
    fn offset_checked_channel(&self, x: usize, y: usize, ch: usize) -> usize {
        assert!(
            ch < self.channels,
            "channel index {ch} out of bounds for {} channels",
            self.channels
        );
        self.offset(x, y, ch)
    }
}
