use argh::FromArgs;
use std::path::{Path, PathBuf};

use brushstamp::brush::{Brush, TransformParams};
use brushstamp::image::{Image, ImageSize};

#[derive(FromArgs)]
/// Transform a brush stamp and write the resulting mask and pixmap as PNG
struct Args {
    /// path to a stamp image, a round stamp is generated when omitted
    #[argh(option, short = 'i')]
    input: Option<PathBuf>,

    /// side length of the generated round stamp
    #[argh(option, default = "64")]
    size: usize,

    /// directory the outputs are written to
    #[argh(option, short = 'o', default = "PathBuf::from(\"out\")")]
    output: PathBuf,

    /// json file with the transform parameters, overrides the options below
    #[argh(option)]
    params: Option<PathBuf>,

    /// scale factor
    #[argh(option, default = "1.0")]
    scale: f64,

    /// aspect ratio in [-1, 1]
    #[argh(option, default = "0.0")]
    aspect_ratio: f64,

    /// rotation in fractions of a full turn
    #[argh(option, default = "0.0")]
    angle: f64,

    /// edge hardness in [0, 1]
    #[argh(option, default = "1.0")]
    hardness: f64,
}

fn round_stamp(size: usize) -> Result<(Image<u8, 1>, Image<u8, 3>), Box<dyn std::error::Error>> {
    let image_size = ImageSize {
        width: size,
        height: size,
    };
    let r = size as f64 / 2.0;

    let mask = Image::<u8, 1>::from_fn(image_size, |x, y, _| {
        let (dx, dy) = (x as f64 + 0.5 - r, y as f64 + 0.5 - r);
        if dx * dx + dy * dy <= r * r {
            255
        } else {
            0
        }
    })?;

    let pixmap = Image::<u8, 3>::from_fn(image_size, |x, y, ch| match ch {
        0 => (255 * x / size) as u8,
        1 => (255 * y / size) as u8,
        _ => 160,
    })?;

    Ok((mask, pixmap))
}

fn read_stamp(path: &Path) -> Result<(Image<u8, 1>, Image<u8, 3>), Box<dyn std::error::Error>> {
    let img = image::open(path)?;
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let mask = Image::new(size, img.to_luma8().into_raw())?;
    let pixmap = Image::new(size, img.to_rgb8().into_raw())?;

    Ok((mask, pixmap))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let params = match &args.params {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => TransformParams::new(args.scale, args.aspect_ratio, args.angle, args.hardness),
    };
    log::info!("transform parameters: {params:?}");

    let (mask, pixmap) = match &args.input {
        Some(path) => read_stamp(path)?,
        None => round_stamp(args.size)?,
    };
    log::info!("stamp size: {}", mask.size());

    let brush = Brush::with_pixmap(mask, pixmap)?;

    let mask = brush.transform_mask(&params)?;
    let pixmap = brush
        .transform_pixmap(&params)?
        .ok_or("brush has no pixmap")?;
    log::info!("transformed size: {}", mask.size());

    std::fs::create_dir_all(&args.output)?;

    let [width, height]: [u32; 2] = mask.size().into();

    image::GrayImage::from_raw(width, height, mask.as_slice().to_vec())
        .ok_or("mask buffer does not match its size")?
        .save(args.output.join("mask.png"))?;

    image::RgbImage::from_raw(width, height, pixmap.as_slice().to_vec())
        .ok_or("pixmap buffer does not match its size")?
        .save(args.output.join("pixmap.png"))?;

    log::info!("wrote {}", args.output.display());

    Ok(())
}
