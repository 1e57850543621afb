use std::str::FromStr;

use ferrovis_image::{Image, ImageError, ImageSize};

use super::{convolve, ConvolveMode};
use crate::normalize::l1_normalize;

/// The orientation of a one dimensional kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelAxis {
    /// A single row, `size x 1`.
    Horizontal,
    /// A single column, `1 x size`.
    Vertical,
}

/// Compute the side length of a gaussian kernel for a given sigma.
///
/// The kernel covers three standard deviations on each side: `round(6 * sigma)`,
/// bumped to the next odd number so that a center tap exists.
///
/// # Examples
///
/// ```
/// use ferrovis_imgproc::filter::kernels::kernel_size_from_sigma;
///
/// assert_eq!(kernel_size_from_sigma(1.0), 7);
/// assert_eq!(kernel_size_from_sigma(2.0), 13);
/// assert_eq!(kernel_size_from_sigma(0.5), 3);
/// ```
pub fn kernel_size_from_sigma(sigma: f32) -> usize {
    let size = (sigma * 6.0).round().max(0.0) as usize;
    if size % 2 == 1 {
        size
    } else {
        size + 1
    }
}

fn check_sigma(sigma: f32) -> Result<(), ImageError> {
    // sigma * sigma must not underflow to zero
    if !sigma.is_finite() || sigma < 0.0 || sigma * sigma <= 0.0 {
        return Err(ImageError::InvalidSigma(sigma));
    }
    Ok(())
}

/// Gaussian density at squared distance `r2` from the center.
#[inline]
fn gaussian_density(r2: f32, sigma: f32) -> f32 {
    let s2 = sigma * sigma;
    (-r2 / (2.0 * s2)).exp() / (2.0 * std::f32::consts::PI * s2)
}

/// Create a box kernel whose taps all equal `1 / (size * size)`.
///
/// Even sizes are rounded up to the next odd size, so `box_kernel(4)` is a 5x5
/// kernel and `box_kernel(0)` is the 1x1 identity.
///
/// # Examples
///
/// ```
/// use ferrovis_imgproc::filter::kernels::box_kernel;
///
/// let kernel = box_kernel(3).unwrap();
/// assert_eq!(kernel.width(), 3);
/// assert_eq!(kernel.as_slice(), &[1.0 / 9.0; 9]);
/// ```
pub fn box_kernel(size: usize) -> Result<Image, ImageError> {
    let size = if size % 2 == 1 { size } else { size + 1 };
    let tap = 1.0 / (size * size) as f32;
    Image::from_size_val([size, size].into(), 1, tap)
}

/// Create a square gaussian kernel.
///
/// The side is given by [`kernel_size_from_sigma`] and the taps are L1-normalized.
///
/// # Errors
///
/// Returns [`ImageError::InvalidSigma`] if `sigma` is not a positive finite number.
pub fn gaussian_kernel_2d(sigma: f32) -> Result<Image, ImageError> {
    check_sigma(sigma)?;

    let size = kernel_size_from_sigma(sigma);
    let center = (size / 2) as f32;

    let mut kernel = Image::zeros([size, size].into(), 1)?;
    for (y, row) in kernel.as_slice_mut().chunks_exact_mut(size).enumerate() {
        let dy = y as f32 - center;
        for (x, tap) in row.iter_mut().enumerate() {
            let dx = x as f32 - center;
            *tap = gaussian_density(dx * dx + dy * dy, sigma);
        }
    }

    l1_normalize(&mut kernel)?;
    Ok(kernel)
}

/// Create a one dimensional gaussian kernel laid out along `axis`.
///
/// Applying the horizontal kernel and then the vertical one is equivalent to
/// a single convolution with [`gaussian_kernel_2d`] of the same sigma.
///
/// # Errors
///
/// Returns [`ImageError::InvalidSigma`] if `sigma` is not a positive finite number.
pub fn gaussian_kernel_1d(sigma: f32, axis: KernelAxis) -> Result<Image, ImageError> {
    check_sigma(sigma)?;

    let size = kernel_size_from_sigma(sigma);
    let center = (size / 2) as f32;

    let taps = (0..size)
        .map(|i| {
            let r = i as f32 - center;
            gaussian_density(r * r, sigma)
        })
        .collect();

    let kernel_size = match axis {
        KernelAxis::Horizontal => ImageSize {
            width: size,
            height: 1,
        },
        KernelAxis::Vertical => ImageSize {
            width: 1,
            height: size,
        },
    };

    let mut kernel = Image::new(kernel_size, 1, taps)?;
    l1_normalize(&mut kernel)?;
    Ok(kernel)
}

/// Sobel kernel responding to horizontal intensity changes.
#[rustfmt::skip]
pub fn sobel_x_kernel() -> Image {
    Image::from_rows([
        [-1.0, 0.0, 1.0],
        [-2.0, 0.0, 2.0],
        [-1.0, 0.0, 1.0],
    ])
}

/// Sobel kernel responding to vertical intensity changes.
#[rustfmt::skip]
pub fn sobel_y_kernel() -> Image {
    Image::from_rows([
        [-1.0, -2.0, -1.0],
        [ 0.0,  0.0,  0.0],
        [ 1.0,  2.0,  1.0],
    ])
}

/// Sharpen kernel, the identity plus a highpass.
#[rustfmt::skip]
pub fn sharpen_kernel() -> Image {
    Image::from_rows([
        [ 0.0, -1.0,  0.0],
        [-1.0,  5.0, -1.0],
        [ 0.0, -1.0,  0.0],
    ])
}

/// Highpass (laplacian) kernel. Its taps sum to zero.
#[rustfmt::skip]
pub fn highpass_kernel() -> Image {
    Image::from_rows([
        [ 0.0, -1.0,  0.0],
        [-1.0,  4.0, -1.0],
        [ 0.0, -1.0,  0.0],
    ])
}

/// Emboss kernel.
#[rustfmt::skip]
pub fn emboss_kernel() -> Image {
    Image::from_rows([
        [-2.0, -1.0, 0.0],
        [-1.0,  1.0, 1.0],
        [ 0.0,  1.0, 2.0],
    ])
}

/// A named entry of the filter bank.
///
/// # Examples
///
/// ```
/// use ferrovis_imgproc::filter::{kernels::FilterKind, ConvolveMode};
///
/// let kind: FilterKind = "gaussian:1.5".parse().unwrap();
/// assert_eq!(kind, FilterKind::Gaussian(1.5));
/// assert_eq!(kind.default_mode(), ConvolveMode::Preserve);
///
/// let kind: FilterKind = "highpass".parse().unwrap();
/// assert_eq!(kind.default_mode(), ConvolveMode::Sum);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    /// Box blur with the given side length.
    Box(usize),
    /// Gaussian blur with the given sigma.
    Gaussian(f32),
    /// Sharpening.
    Sharpen,
    /// Highpass edge extraction.
    Highpass,
    /// Emboss.
    Emboss,
    /// Horizontal sobel derivative.
    SobelX,
    /// Vertical sobel derivative.
    SobelY,
}

impl FilterKind {
    /// Build the kernel of this filter.
    pub fn kernel(&self) -> Result<Image, ImageError> {
        match *self {
            FilterKind::Box(size) => box_kernel(size),
            FilterKind::Gaussian(sigma) => gaussian_kernel_2d(sigma),
            FilterKind::Sharpen => Ok(sharpen_kernel()),
            FilterKind::Highpass => Ok(highpass_kernel()),
            FilterKind::Emboss => Ok(emboss_kernel()),
            FilterKind::SobelX => Ok(sobel_x_kernel()),
            FilterKind::SobelY => Ok(sobel_y_kernel()),
        }
    }

    /// The convolution mode this filter is usually applied with.
    ///
    /// Filters that keep the look of the image preserve its channels, edge
    /// detectors collapse them into a single response.
    pub fn default_mode(&self) -> ConvolveMode {
        match self {
            FilterKind::Box(_)
            | FilterKind::Gaussian(_)
            | FilterKind::Sharpen
            | FilterKind::Emboss => ConvolveMode::Preserve,
            FilterKind::Highpass | FilterKind::SobelX | FilterKind::SobelY => ConvolveMode::Sum,
        }
    }

    /// Build the kernel and convolve `src` with it using [`FilterKind::default_mode`].
    pub fn apply(&self, src: &Image) -> Result<Image, ImageError> {
        convolve(src, &self.kernel()?, self.default_mode())
    }
}

impl FromStr for FilterKind {
    type Err = ImageError;

    /// Parse `box[:size]`, `gaussian[:sigma]`, `sharpen`, `highpass`,
    /// `emboss`, `sobel-x` or `sobel-y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ImageError::UnknownFilter(s.to_string());

        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        let kind = match (name.to_ascii_lowercase().as_str(), arg) {
            ("box", None) => FilterKind::Box(3),
            ("box", Some(arg)) => FilterKind::Box(arg.parse().map_err(|_| unknown())?),
            ("gaussian", None) => FilterKind::Gaussian(1.0),
            ("gaussian", Some(arg)) => FilterKind::Gaussian(arg.parse().map_err(|_| unknown())?),
            ("sharpen", None) => FilterKind::Sharpen,
            ("highpass", None) => FilterKind::Highpass,
            ("emboss", None) => FilterKind::Emboss,
            ("sobel-x" | "sobel_x", None) => FilterKind::SobelX,
            ("sobel-y" | "sobel_y", None) => FilterKind::SobelY,
            _ => return Err(unknown()),
        };

        Ok(kind)
    }
}
