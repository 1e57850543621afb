//! Classical feature detection for raster images.
//!
//! * [`image`] holds the planar `f32` image container shared by every stage.
//! * [`imgproc`] holds the convolution engine, the filter bank, the sobel
//!   operator and the harris corner detector.
//!
//! ```
//! use ferrovis::image::Image;
//! use ferrovis::imgproc::features::harris_detect;
//!
//! let image = Image::zeros([32, 32].into(), 3).unwrap();
//! let corners = harris_detect(&image, 2.0, 50.0, 3).unwrap();
//!
//! assert!(corners.is_empty());
//! ```

#[doc(inline)]
pub use ferrovis_image as image;

#[doc(inline)]
pub use ferrovis_imgproc as imgproc;
