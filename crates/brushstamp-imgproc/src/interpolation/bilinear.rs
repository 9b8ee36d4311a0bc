use brushstamp_image::Image;

use super::fixed::{self, INT_MULTIPLE, RECOVERY_BITS};

/// Kernel for bilinear interpolation on a 12-bit fixed-point position.
///
/// # Arguments
///
/// * `image` - The source image.
/// * `pos_x` - The x coordinate in fixed point.
/// * `pos_y` - The y coordinate in fixed point.
///
/// # Returns
///
/// The interpolated pixel, or `None` when the integer part of the position
/// lies outside the image. The right and bottom neighbours are clamped to
/// the last column and row.
///
/// Per channel the result is
/// `((p00 * (4096 - fx) + p10 * fx) * (4096 - fy) + (p01 * (4096 - fx) + p11 * fx) * fy) >> 24`.
/// The largest intermediate is `255 * 2^24`, which fits in `u32`.
#[inline]
pub fn bilinear_fixed<const C: usize>(
    image: &Image<u8, C>,
    pos_x: i32,
    pos_y: i32,
) -> Option<[u8; C]> {
    let (cols, rows) = (image.cols(), image.rows());

    let sx = fixed::integer_part(pos_x);
    let sy = fixed::integer_part(pos_y);

    if sx < 0 || sy < 0 || sx as usize >= cols || sy as usize >= rows {
        return None;
    }

    let (sx0, sy0) = (sx as usize, sy as usize);
    let sx1 = if sx0 + 1 < cols { sx0 + 1 } else { sx0 };
    let sy1 = if sy0 + 1 < rows { sy0 + 1 } else { sy0 };

    let fx = fixed::fraction(pos_x) as u32;
    let fy = fixed::fraction(pos_y) as u32;
    let ox = INT_MULTIPLE as u32 - fx;
    let oy = INT_MULTIPLE as u32 - fy;

    let base00 = (sy0 * cols + sx0) * C;
    let base10 = (sy0 * cols + sx1) * C;
    let base01 = (sy1 * cols + sx0) * C;
    let base11 = (sy1 * cols + sx1) * C;

    let data = image.as_slice();

    let mut pixel = [0u8; C];
    for (k, out) in pixel.iter_mut().enumerate() {
        let top = data[base00 + k] as u32 * ox + data[base10 + k] as u32 * fx;
        let bottom = data[base01 + k] as u32 * ox + data[base11 + k] as u32 * fx;
        *out = ((top * oy + bottom * fy) >> RECOVERY_BITS) as u8;
    }

    Some(pixel)
}

/// Kernel for bilinear interpolation on a floating point position.
///
/// Follows the same rules as [`bilinear_fixed`]: the integer source pixel is
/// `floor(u), floor(v)`, positions outside the image yield `None` and the
/// right and bottom neighbours are clamped to the image edge.
pub fn bilinear_reference<const C: usize>(image: &Image<f64, C>, u: f64, v: f64) -> Option<[f64; C]> {
    let (cols, rows) = (image.cols(), image.rows());

    let (iu, iv) = (u.floor(), v.floor());
    if iu < 0.0 || iv < 0.0 || iu >= cols as f64 || iv >= rows as f64 {
        return None;
    }

    let (iu0, iv0) = (iu as usize, iv as usize);
    let iu1 = if iu0 + 1 < cols { iu0 + 1 } else { iu0 };
    let iv1 = if iv0 + 1 < rows { iv0 + 1 } else { iv0 };

    let frac_u = u - iu;
    let frac_v = v - iv;
    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let data = image.as_slice();
    let p00 = &data[(iv0 * cols + iu0) * C..][..C];
    let p10 = &data[(iv0 * cols + iu1) * C..][..C];
    let p01 = &data[(iv1 * cols + iu0) * C..][..C];
    let p11 = &data[(iv1 * cols + iu1) * C..][..C];

    let mut pixel = [0.0; C];
    for (k, out) in pixel.iter_mut().enumerate() {
        *out = (p00[k] * frac_uu + p10[k] * frac_u) * frac_vv
            + (p01[k] * frac_uu + p11[k] * frac_u) * frac_v;
    }

    Some(pixel)
}

#[cfg(test)]
mod tests {
    use super::{bilinear_fixed, bilinear_reference};
    use crate::interpolation::fixed::to_fixed;
    use approx::assert_relative_eq;
    use brushstamp_image::{Image, ImageError};

    #[test]
    fn fixed_on_grid_points() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 2].into(), vec![10, 20, 30, 40])?;

        assert_eq!(bilinear_fixed(&image, 0, 0), Some([10]));
        assert_eq!(bilinear_fixed(&image, to_fixed(1.0), 0), Some([20]));
        assert_eq!(bilinear_fixed(&image, 0, to_fixed(1.0)), Some([30]));
        assert_eq!(bilinear_fixed(&image, to_fixed(1.0), to_fixed(1.0)), Some([40]));

        Ok(())
    }

    #[test]
    fn fixed_midpoints() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 2].into(), vec![10, 20, 30, 40])?;

        assert_eq!(bilinear_fixed(&image, to_fixed(0.5), 0), Some([15]));
        assert_eq!(bilinear_fixed(&image, 0, to_fixed(0.5)), Some([20]));
        assert_eq!(bilinear_fixed(&image, to_fixed(0.5), to_fixed(0.5)), Some([25]));

        Ok(())
    }

    #[test]
    fn fixed_truncates() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 1].into(), vec![0, 255])?;

        // 255 * 4095 / 4096 = 254.94 is truncated, not rounded
        assert_eq!(bilinear_fixed(&image, 4095, 0), Some([254]));

        Ok(())
    }

    #[test]
    fn fixed_full_white_does_not_overflow() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val([3, 3].into(), 255)?;

        for pos in [0, 1, 2047, 2048, 4095, 4096, 5000, 8191] {
            assert_eq!(bilinear_fixed(&image, pos, pos), Some([255, 255, 255]));
        }

        Ok(())
    }

    #[test]
    fn fixed_clamps_to_edge() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 2].into(), vec![10, 20, 30, 40])?;

        // last column: the right neighbour is the pixel itself
        assert_eq!(bilinear_fixed(&image, to_fixed(1.5), 0), Some([20]));
        // last row: the bottom neighbour is the pixel itself
        assert_eq!(bilinear_fixed(&image, 0, to_fixed(1.5)), Some([30]));
        assert_eq!(bilinear_fixed(&image, to_fixed(1.9), to_fixed(1.9)), Some([40]));

        Ok(())
    }

    #[test]
    fn fixed_out_of_bounds() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 2].into(), vec![10, 20, 30, 40])?;

        assert_eq!(bilinear_fixed(&image, -1, 0), None);
        assert_eq!(bilinear_fixed(&image, 0, -1), None);
        assert_eq!(bilinear_fixed(&image, to_fixed(2.0), 0), None);
        assert_eq!(bilinear_fixed(&image, 0, to_fixed(2.0)), None);

        Ok(())
    }

    #[test]
    fn reference_matches_fixed_on_exact_fractions() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_fn([3, 2].into(), |x, y, ch| (40 * x + 70 * y + ch) as u8)?;
        let image_f64 = image.cast::<f64>()?;

        for (u, v) in [(0.0, 0.0), (0.5, 0.25), (1.75, 0.5), (2.5, 1.5)] {
            let fixed = bilinear_fixed(&image, to_fixed(u), to_fixed(v)).expect("in bounds");
            let reference = bilinear_reference(&image_f64, u, v).expect("in bounds");
            for k in 0..3 {
                assert_relative_eq!(reference[k].trunc(), fixed[k] as f64);
            }
        }

        assert!(bilinear_reference(&image_f64, -0.01, 0.0).is_none());
        assert!(bilinear_reference(&image_f64, 0.0, 2.0).is_none());

        Ok(())
    }
}
