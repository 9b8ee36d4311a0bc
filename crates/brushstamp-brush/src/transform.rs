use brushstamp_image::{Image, ImageError, ImageSize};
use brushstamp_imgproc::{matrix::Matrix3, warp::warp_affine_fixed};

use crate::blur;

/// Build the forward transform of a brush stamp.
///
/// The stamp is scaled, skewed by `aspect_ratio` and rotated by `angle`
/// turns around the center of the scaled stamp.
///
/// # Arguments
///
/// * `width` - The width of the stamp.
/// * `height` - The height of the stamp.
/// * `scale` - Uniform scale factor.
/// * `aspect_ratio` - Negative values shrink the width, positive values the
///   height, by up to `1/20` of the scale per unit.
/// * `angle` - Rotation in fractions of a full turn.
///
/// # Example
///
/// ```
/// use brushstamp_brush::transform::transform_matrix;
///
/// let m = transform_matrix(4.0, 4.0, 2.0, 0.0, 0.0);
/// assert_eq!(m.transform_point(4.0, 4.0), (8.0, 8.0));
///
/// assert!(transform_matrix(4.0, 4.0, 1.0, 0.0, 0.0).is_identity());
/// ```
pub fn transform_matrix(
    width: f64,
    height: f64,
    scale: f64,
    aspect_ratio: f64,
    angle: f64,
) -> Matrix3 {
    let center_x = width / 2.0;
    let center_y = height / 2.0;

    let (scale_x, scale_y) = if aspect_ratio < 0.0 {
        (scale * (1.0 - aspect_ratio.abs() / 20.0), scale)
    } else if aspect_ratio > 0.0 {
        (scale, scale * (1.0 - aspect_ratio / 20.0))
    } else {
        (scale, scale)
    };

    let mut matrix = Matrix3::identity();
    matrix.scale(scale_x, scale_y);
    matrix.translate(-center_x * scale_x, -center_y * scale_y);
    matrix.rotate_turns(-angle);
    matrix.translate(center_x * scale_x, center_y * scale_y);

    matrix
}

/// Integer bounds of a transformed stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Left edge, may be negative.
    pub x: i32,
    /// Top edge, may be negative.
    pub y: i32,
    /// Width, at least 1.
    pub width: usize,
    /// Height, at least 1.
    pub height: usize,
}

impl BoundingBox {
    /// The size of the box.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Compute the bounds of an image of `size` after the forward transform `matrix`.
///
/// The four corners `(0, 0)`, `(w, 0)`, `(0, h)` and `(w, h)` are mapped
/// through the matrix. The origin is floored and the extent rounded up,
/// and a degenerate extent still yields a 1x1 box.
pub fn bounding_box(size: ImageSize, matrix: &Matrix3) -> BoundingBox {
    let (w, h) = (size.width as f64, size.height as f64);

    let corners = [
        matrix.transform_point(0.0, 0.0),
        matrix.transform_point(w, 0.0),
        matrix.transform_point(0.0, h),
        matrix.transform_point(w, h),
    ];

    let (min_x, max_x, min_y, max_y) = corners.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(min_x, max_x, min_y, max_y), &(x, y)| {
            (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
        },
    );

    BoundingBox {
        x: min_x.floor() as i32,
        y: min_y.floor() as i32,
        width: ((max_x - min_x).ceil() as usize).max(1),
        height: ((max_y - min_y).ceil() as usize).max(1),
    }
}

/// Size of a stamp of `size` after the transform.
///
/// # Example
///
/// ```
/// use brushstamp_brush::transform_size;
///
/// let size = transform_size([4, 4].into(), 2.0, 0.0, 0.0);
/// assert_eq!((size.width, size.height), (8, 8));
/// ```
pub fn transform_size(size: ImageSize, scale: f64, aspect_ratio: f64, angle: f64) -> ImageSize {
    let matrix = transform_matrix(
        size.width as f64,
        size.height as f64,
        scale,
        aspect_ratio,
        angle,
    );

    bounding_box(size, &matrix).size()
}

/// Transform a stamp with any number of channels.
///
/// The result has the size of the transformed bounds and is filled by
/// fixed-point bilinear resampling. Pixels outside the source are zero.
/// A `hardness` below `1` then softens the result.
///
/// When the transform is the identity the source is returned unchanged,
/// without applying `hardness`.
pub fn transform_image<const C: usize>(
    src: &Image<u8, C>,
    scale: f64,
    aspect_ratio: f64,
    angle: f64,
    hardness: f64,
) -> Result<Image<u8, C>, ImageError> {
    let mut matrix = transform_matrix(
        src.width() as f64,
        src.height() as f64,
        scale,
        aspect_ratio,
        angle,
    );

    if matrix.is_identity() {
        log::trace!("identity transform, copying {} stamp", src.size());
        return Ok(src.clone());
    }

    let bbox = bounding_box(src.size(), &matrix);
    log::debug!(
        "transforming {} stamp to {} at ({}, {})",
        src.size(),
        bbox.size(),
        bbox.x,
        bbox.y
    );

    matrix.translate(-bbox.x as f64, -bbox.y as f64);

    let mut dst = Image::<u8, C>::from_size_val(bbox.size(), 0)?;
    warp_affine_fixed(src, &mut dst, &matrix)?;

    if hardness < 1.0 {
        blur::apply_softness(&mut dst, hardness)?;
    }

    Ok(dst)
}

/// Transform a single channel brush mask.
///
/// # Arguments
///
/// * `mask` - The source mask.
/// * `scale` - Uniform scale factor.
/// * `aspect_ratio` - Skew in `[-1, 1]`.
/// * `angle` - Rotation in fractions of a full turn.
/// * `hardness` - Edge hardness in `[0, 1]`.
///
/// # Returns
///
/// A newly allocated mask of the transformed size.
///
/// # Example
///
/// ```
/// use brushstamp_image::{Image, ImageSize};
/// use brushstamp_brush::transform_mask;
///
/// let mask = Image::<u8, 1>::from_size_val([4, 4].into(), 255).unwrap();
/// let scaled = transform_mask(&mask, 2.0, 0.0, 0.0, 1.0).unwrap();
///
/// assert_eq!(scaled.size(), ImageSize::from([8, 8]));
/// assert!(scaled.as_slice().iter().all(|&v| v == 255));
/// ```
pub fn transform_mask(
    mask: &Image<u8, 1>,
    scale: f64,
    aspect_ratio: f64,
    angle: f64,
    hardness: f64,
) -> Result<Image<u8, 1>, ImageError> {
    transform_image(mask, scale, aspect_ratio, angle, hardness)
}

/// Transform a three channel brush pixmap.
///
/// Behaves like [`transform_mask`] on each channel independently.
pub fn transform_pixmap(
    pixmap: &Image<u8, 3>,
    scale: f64,
    aspect_ratio: f64,
    angle: f64,
    hardness: f64,
) -> Result<Image<u8, 3>, ImageError> {
    transform_image(pixmap, scale, aspect_ratio, angle, hardness)
}
