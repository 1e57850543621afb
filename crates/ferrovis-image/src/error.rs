/// An error type for the image and image processing crates.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the number of channels is not the one an operation expects.
    #[error("Invalid number of channels: got {0}, expected {1}")]
    InvalidChannelCount(usize, usize),

    /// Error when two images that must agree in size do not.
    #[error("Image size mismatch: {0}x{1} vs {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds for an image with {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a kernel has neither one channel nor the channels of the image.
    #[error("Kernel with {0} channels cannot filter an image with {1} channels")]
    KernelChannelMismatch(usize, usize),

    /// Error when a kernel has no taps.
    #[error("Kernel must have at least one tap, got {0}x{1}")]
    EmptyKernel(usize, usize),

    /// Error when a filter name cannot be parsed.
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// Error when a gaussian sigma is not a positive finite number.
    #[error("Invalid sigma {0}: must be positive and finite")]
    InvalidSigma(f32),

    /// Error when an L1 normalization would divide by a zero sum.
    #[error("Cannot L1-normalize an image whose elements sum to zero")]
    ZeroSumNormalization,

    /// Error when a detector configuration is rejected.
    #[error("Invalid harris configuration: {0}")]
    InvalidHarrisConfig(String),
}
