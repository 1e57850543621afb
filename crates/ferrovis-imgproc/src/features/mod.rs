//! Corner detection and keypoint extraction.
//!
//! The harris pipeline is split into stages that can be run on their own:
//!
//! 1. [`structure_matrix`] - gaussian weighted second moments of the gradients.
//! 2. [`cornerness_response`] - the harris measure of every pixel.
//! 3. [`non_max_suppression`] - thinning to local maxima.
//! 4. [`extract_keypoints`] - thresholding and patch descriptors.
//!
//! [`harris_detect`] and [`HarrisDetector`] chain all of them.

mod descriptor;
pub use descriptor::*;

mod harris;
pub use harris::*;

mod nms;
pub use nms::*;
