#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// feature detection module.
pub mod features;

/// image filtering module.
pub mod filter;

/// image gradients and sobel operator module.
pub mod gradient;

/// operations to normalize images.
pub mod normalize;
