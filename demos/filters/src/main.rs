use argh::FromArgs;
use std::path::PathBuf;

use ferrovis::{
    image::{ops, Image},
    imgproc::{
        filter::{convolve, kernels::FilterKind, ConvolveMode},
        normalize::feature_normalize,
    },
};

/// Apply a filter of the filter bank to an image
#[derive(FromArgs)]
struct Args {
    /// path to the image to filter
    #[argh(option)]
    image_path: PathBuf,

    /// path to write the filtered image to
    #[argh(option, default = "PathBuf::from(\"filtered.png\")")]
    output_path: PathBuf,

    /// the filter to apply: box[:size], gaussian[:sigma], sharpen, highpass,
    /// emboss, sobel-x or sobel-y
    #[argh(option)]
    filter: FilterKind,

    /// keep the channels even for filters that sum them by default
    #[argh(switch)]
    preserve: bool,

    /// stretch the result into [0, 1] instead of clamping it
    #[argh(switch)]
    normalize: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let rgb = image::open(&args.image_path)?.to_rgb8();
    let size = [rgb.width() as usize, rgb.height() as usize].into();
    let img = Image::from_interleaved_u8(size, 3, rgb.as_raw())?;

    let mode = if args.preserve {
        ConvolveMode::Preserve
    } else {
        args.filter.default_mode()
    };
    log::info!("applying {:?} with {:?}", args.filter, mode);

    let mut filtered = convolve(&img, &args.filter.kernel()?, mode)?;

    if args.normalize {
        feature_normalize(&mut filtered);
    } else {
        ops::clamp(&mut filtered);
    }

    // summed outputs are gray, replicate them to rgb
    let filtered = match filtered.num_channels() {
        1 => Image::from_channels(&[filtered.clone(), filtered.clone(), filtered])?,
        _ => filtered,
    };

    let out = image::RgbImage::from_raw(
        size.width as u32,
        size.height as u32,
        filtered.to_interleaved_u8(),
    )
    .ok_or("image buffer does not match its size")?;
    out.save(&args.output_path)?;
    log::info!("wrote {}", args.output_path.display());

    Ok(())
}
