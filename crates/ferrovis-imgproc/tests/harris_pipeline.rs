use ferrovis_image::{Image, ImageError};
use ferrovis_imgproc::features::{
    extract_keypoints, harris_detect, non_max_suppression, HarrisConfig, HarrisDetector,
    SUPPRESSED_RESPONSE,
};

fn block_image(size: usize, block: std::ops::Range<usize>, values: &[f32]) -> Image {
    let mut image = Image::zeros([size, size].into(), values.len()).unwrap();
    for (ch, &v) in values.iter().enumerate() {
        for y in block.clone() {
            for x in block.clone() {
                image.set_pixel(x as isize, y as isize, ch, v);
            }
        }
    }
    image
}

#[test]
fn test_harris_single_corner() -> Result<(), ImageError> {
    // a bright 3x3 block in the bottom right corner of a 9x9 image, the
    // clamped border leaves a single corner at its top left
    let image = block_image(9, 6..9, &[1.0]);

    let keypoints = harris_detect(&image, 1.0, 1.0, 1)?;
    assert_eq!(keypoints.len(), 1);

    let (x, y) = keypoints[0].point();
    assert!(x.abs_diff(6) <= 1 && y.abs_diff(6) <= 1, "corner at ({x}, {y})");
    assert_eq!(keypoints[0].len(), 25);
    Ok(())
}

#[test]
fn test_harris_interior_block() -> Result<(), ImageError> {
    // a 3x3 block in the middle of a 9x9 image has its strongest response
    // at the block center once the window spans the whole block
    let image = block_image(9, 3..6, &[1.0]);

    let keypoints = harris_detect(&image, 1.0, 1.0, 1)?;
    let points = keypoints.iter().map(|d| d.point()).collect::<Vec<_>>();
    assert_eq!(points, vec![(4, 4)]);
    assert_eq!(keypoints[0].len(), 25);
    Ok(())
}

#[test]
fn test_harris_square_corners() -> Result<(), ImageError> {
    let image = block_image(16, 5..11, &[1.0, 0.5, 0.25]);

    let detector = HarrisDetector::new(
        HarrisConfig::default()
            .with_sigma(1.0)
            .with_threshold(1.0)
            .with_nms_radius(2),
    )?;
    let keypoints = detector.detect(&image)?;

    let points = keypoints.iter().map(|d| d.point()).collect::<Vec<_>>();
    assert_eq!(points, vec![(5, 5), (10, 5), (5, 10), (10, 10)]);

    // every channel contributes a 5x5 patch
    assert!(keypoints.iter().all(|d| d.len() == 75));
    Ok(())
}

#[test]
fn test_harris_empty_result() -> Result<(), ImageError> {
    let image = Image::zeros([9, 9].into(), 1)?;
    let keypoints = harris_detect(&image, 1.0, 0.5, 1)?;
    assert!(keypoints.is_empty());
    Ok(())
}

#[test]
fn test_threshold_count_matches_map() -> Result<(), ImageError> {
    let data = (0..20 * 15)
        .map(|i| (((i * 7919) % 101) as f32 / 101.0).powi(2))
        .collect();
    let image = Image::new([20, 15].into(), 1, data)?;

    let detector = HarrisDetector::new(HarrisConfig::default().with_sigma(1.0))?;
    let suppressed = non_max_suppression(&detector.response_map(&image)?, 1)?;

    for threshold in [0.0, 0.01, 0.1, 1.0] {
        let keypoints = extract_keypoints(&image, &suppressed, threshold)?;
        let expected = suppressed
            .as_slice()
            .iter()
            .filter(|&&r| r > threshold)
            .count();
        assert_eq!(keypoints.len(), expected);

        // raster order and no suppressed pixel slips through
        for pair in keypoints.windows(2) {
            let (a, b) = (pair[0].point(), pair[1].point());
            assert!((a.1, a.0) < (b.1, b.0));
        }
        for d in &keypoints {
            let (x, y) = d.point();
            assert_ne!(
                suppressed.get_pixel(x as isize, y as isize, 0),
                SUPPRESSED_RESPONSE
            );
        }
    }
    Ok(())
}
