//! Filter operations
//!
//! This module provides the convolution engine and the filter bank used by
//! the gradient and feature modules.

/// Filter kernels
pub mod kernels;

/// Direct spatial convolution
mod convolution;
pub use convolution::*;

/// Blur operations
mod ops;
pub use ops::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;
