use ferrovis_image::{Image, ImageError};
use log::debug;
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{extract_keypoints, non_max_suppression, Descriptor};
use crate::{filter::gaussian_smooth, gradient::spatial_gradient};

/// The default sensitivity of the harris cornerness measure.
pub const HARRIS_DEFAULT_ALPHA: f32 = 0.06;

/// Compute the smoothed structure tensor of an image.
///
/// The output has three channels holding the gaussian weighted sums of
/// `Ix^2`, `Iy^2` and `Ix * Iy` respectively, where `Ix` and `Iy` are the
/// channel-summed sobel derivatives of `src`.
///
/// # Arguments
///
/// * `src` - The source image with shape (C, H, W).
/// * `sigma` - The standard deviation of the gaussian window.
///
/// # Errors
///
/// Returns [`ImageError::InvalidSigma`] if `sigma` is not a positive finite number.
pub fn structure_matrix(src: &Image, sigma: f32) -> Result<Image, ImageError> {
    let (ix, iy) = spatial_gradient(src)?;

    let mut tensor = Image::zeros(src.size(), 3)?;
    let plane = src.size().area();
    let (ixx, rest) = tensor.as_slice_mut().split_at_mut(plane);
    let (iyy, ixy) = rest.split_at_mut(plane);

    ixx.par_iter_mut()
        .zip(iyy.par_iter_mut())
        .zip(ixy.par_iter_mut())
        .zip(ix.as_slice().par_iter().zip(iy.as_slice().par_iter()))
        .for_each(|(((xx, yy), xy), (&gx, &gy))| {
            *xx = gx * gx;
            *yy = gy * gy;
            *xy = gx * gy;
        });

    gaussian_smooth(&tensor, sigma)
}

/// Compute the harris cornerness `det(S) - alpha * trace(S)^2` of a structure tensor.
///
/// # Arguments
///
/// * `tensor` - A three channel structure tensor, see [`structure_matrix`].
/// * `alpha` - The sensitivity, usually [`HARRIS_DEFAULT_ALPHA`].
///
/// # Errors
///
/// Returns [`ImageError::InvalidChannelCount`] if `tensor` does not have three channels.
pub fn cornerness_response(tensor: &Image, alpha: f32) -> Result<Image, ImageError> {
    if tensor.num_channels() != 3 {
        return Err(ImageError::InvalidChannelCount(tensor.num_channels(), 3));
    }

    let mut response = Image::zeros(tensor.size(), 1)?;

    response
        .as_slice_mut()
        .par_iter_mut()
        .zip(tensor.channel_slice(0).par_iter())
        .zip(tensor.channel_slice(1).par_iter())
        .zip(tensor.channel_slice(2).par_iter())
        .for_each(|(((r, &sxx), &syy), &sxy)| {
            let det = sxx * syy - sxy * sxy;
            let trace = sxx + syy;
            *r = det - alpha * trace * trace;
        });

    Ok(response)
}

/// Parameters of the harris corner detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HarrisConfig {
    /// Standard deviation of the gaussian window of the structure tensor.
    pub sigma: f32,
    /// Responses must be strictly above this value to become keypoints.
    pub threshold: f32,
    /// Radius of the non-maximum suppression window.
    pub nms_radius: usize,
    /// Sensitivity of the cornerness measure.
    pub alpha: f32,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            sigma: 2.0,
            threshold: 50.0,
            nms_radius: 3,
            alpha: HARRIS_DEFAULT_ALPHA,
        }
    }
}

impl HarrisConfig {
    /// Set the gaussian window standard deviation.
    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set the response threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the non-maximum suppression radius.
    pub fn with_nms_radius(mut self, nms_radius: usize) -> Self {
        self.nms_radius = nms_radius;
        self
    }

    /// Set the cornerness sensitivity.
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Check that the parameters can drive a detection.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidHarrisConfig`] if sigma is not positive
    /// and finite, or if the threshold or alpha are not finite.
    pub fn validate(&self) -> Result<(), ImageError> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(ImageError::InvalidHarrisConfig(format!(
                "sigma must be positive and finite, got {}",
                self.sigma
            )));
        }
        if !self.threshold.is_finite() {
            return Err(ImageError::InvalidHarrisConfig(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if !self.alpha.is_finite() {
            return Err(ImageError::InvalidHarrisConfig(format!(
                "alpha must be finite, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Harris corner detector.
///
/// # Examples
///
/// ```
/// use ferrovis_image::Image;
/// use ferrovis_imgproc::features::{HarrisConfig, HarrisDetector};
///
/// let detector = HarrisDetector::new(HarrisConfig::default().with_sigma(1.0)).unwrap();
///
/// let image = Image::zeros([16, 16].into(), 1).unwrap();
/// let keypoints = detector.detect(&image).unwrap();
///
/// assert!(keypoints.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct HarrisDetector {
    config: HarrisConfig,
}

impl HarrisDetector {
    /// Create a detector from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidHarrisConfig`] if the configuration does not validate.
    pub fn new(config: HarrisConfig) -> Result<Self, ImageError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration of the detector.
    pub fn config(&self) -> &HarrisConfig {
        &self.config
    }

    /// Compute the cornerness of every pixel, before suppression.
    pub fn response_map(&self, src: &Image) -> Result<Image, ImageError> {
        let tensor = structure_matrix(src, self.config.sigma)?;
        cornerness_response(&tensor, self.config.alpha)
    }

    /// Detect corners and return the suppressed response map with the descriptors.
    pub fn detect_with_response(
        &self,
        src: &Image,
    ) -> Result<(Image, Vec<Descriptor>), ImageError> {
        let response = self.response_map(src)?;
        let suppressed = non_max_suppression(&response, self.config.nms_radius)?;
        drop(response);

        let keypoints = extract_keypoints(src, &suppressed, self.config.threshold)?;

        debug!(
            "harris: {}x{}x{} image, {} keypoints above {}",
            src.width(),
            src.height(),
            src.num_channels(),
            keypoints.len(),
            self.config.threshold
        );

        Ok((suppressed, keypoints))
    }

    /// Detect corners and describe them.
    pub fn detect(&self, src: &Image) -> Result<Vec<Descriptor>, ImageError> {
        let (_, keypoints) = self.detect_with_response(src)?;
        Ok(keypoints)
    }
}

/// Detect harris corners and describe them.
///
/// Runs the structure tensor, the cornerness with [`HARRIS_DEFAULT_ALPHA`],
/// non-maximum suppression and keypoint extraction in sequence.
///
/// # Arguments
///
/// * `src` - The source image with shape (C, H, W).
/// * `sigma` - The standard deviation of the gaussian window.
/// * `threshold` - Responses must be strictly above this value.
/// * `nms_radius` - The radius of the suppression window.
///
/// # Returns
///
/// One descriptor per surviving corner in raster order, possibly none.
pub fn harris_detect(
    src: &Image,
    sigma: f32,
    threshold: f32,
    nms_radius: usize,
) -> Result<Vec<Descriptor>, ImageError> {
    let config = HarrisConfig {
        sigma,
        threshold,
        nms_radius,
        alpha: HARRIS_DEFAULT_ALPHA,
    };
    HarrisDetector::new(config)?.detect(src)
}
