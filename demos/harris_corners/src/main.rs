use argh::FromArgs;
use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use ferrovis::{
    image::Image,
    imgproc::features::{Descriptor, HarrisConfig, HarrisDetector},
};

/// Detect harris corners on an image and mark them.
#[derive(FromArgs)]
struct Args {
    /// path to the image to detect corners on
    #[argh(option)]
    image_path: PathBuf,

    /// path to write the marked image to
    #[argh(option, default = "PathBuf::from(\"corners.png\")")]
    output_path: PathBuf,

    /// optional json file with the detector configuration
    #[argh(option)]
    config: Option<PathBuf>,

    /// standard deviation of the structure tensor window
    #[argh(option)]
    sigma: Option<f32>,

    /// minimum cornerness of a keypoint
    #[argh(option)]
    threshold: Option<f32>,

    /// radius of the non-maximum suppression window
    #[argh(option)]
    nms_radius: Option<usize>,

    /// sensitivity of the cornerness measure
    #[argh(option)]
    alpha: Option<f32>,

    /// write the normalized response map instead of the marked image
    #[argh(switch)]
    response: bool,
}

fn load_config(args: &Args) -> Result<HarrisConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => HarrisConfig::default(),
    };

    if let Some(sigma) = args.sigma {
        config = config.with_sigma(sigma);
    }
    if let Some(threshold) = args.threshold {
        config = config.with_threshold(threshold);
    }
    if let Some(nms_radius) = args.nms_radius {
        config = config.with_nms_radius(nms_radius);
    }
    if let Some(alpha) = args.alpha {
        config = config.with_alpha(alpha);
    }

    Ok(config)
}

/// Draw a magenta cross centered on the keypoint.
fn mark_spot(image: &mut Image, keypoint: &Descriptor) {
    let (x, y) = (keypoint.x as isize, keypoint.y as isize);
    let color = [1.0, 0.0, 1.0];
    for i in -9..10 {
        for (ch, &v) in color.iter().enumerate().take(image.num_channels()) {
            image.set_pixel(x + i, y, ch, v);
            image.set_pixel(x, y + i, ch, v);
        }
    }
}

fn save_rgb(image: &Image, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let size = image.size();
    let buffer =
        image::RgbImage::from_raw(size.width as u32, size.height as u32, image.to_interleaved_u8())
            .ok_or("image buffer does not match its size")?;
    buffer.save(path)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = load_config(&args)?;
    let detector = HarrisDetector::new(config)?;
    log::info!("detector configuration: {:?}", detector.config());

    // read the image as rgb in [0, 1]
    let rgb = image::open(&args.image_path)?.to_rgb8();
    let size = [rgb.width() as usize, rgb.height() as usize].into();
    let mut img = Image::from_interleaved_u8(size, 3, rgb.as_raw())?;

    if args.response {
        let mut response = detector.response_map(&img)?;
        ferrovis::imgproc::normalize::feature_normalize(&mut response);
        let gray = Image::from_channels(&[response.clone(), response.clone(), response])?;
        save_rgb(&gray, &args.output_path)?;
        log::info!("wrote response map to {}", args.output_path.display());
        return Ok(());
    }

    let start = Instant::now();
    let keypoints = detector.detect(&img)?;
    log::info!(
        "found {} corners in {:?}",
        keypoints.len(),
        start.elapsed()
    );

    for keypoint in &keypoints {
        mark_spot(&mut img, keypoint);
    }

    save_rgb(&img, &args.output_path)?;
    log::info!("wrote marked image to {}", args.output_path.display());

    Ok(())
}
