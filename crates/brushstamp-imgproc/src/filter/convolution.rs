use brushstamp_image::{Image, ImageError, Rect};

use crate::parallel::{self, ExecutionStrategy};

/// How the weighted sum of a convolution is mapped back to a pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvolutionType {
    /// `sum / divisor`.
    #[default]
    Normal,
    /// `|sum / divisor|`, for kernels with negative weights such as edge detectors.
    Absolute,
    /// `sum / divisor` shifted to mid grey, so negative responses stay visible.
    Negative,
}

impl ConvolutionType {
    #[inline]
    fn apply(&self, value: f32) -> u8 {
        let value = match self {
            ConvolutionType::Normal => value,
            ConvolutionType::Absolute => value.abs(),
            ConvolutionType::Negative => value + 127.5,
        };
        value.round().clamp(0.0, 255.0) as u8
    }
}

/// Convolve a region of an image with a square kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `src_rect` - The region of `src` to read.
/// * `dst` - The destination image.
/// * `dst_rect` - The region of `dst` to write; same size as `src_rect`.
/// * `kernel` - Row-major weights of a `kernel_size x kernel_size` kernel.
/// * `kernel_size` - Side length of the kernel.
/// * `divisor` - Normalization factor applied to the weighted sum.
/// * `mode` - How the normalized sum becomes a pixel value.
/// * `alpha_weighting` - For 2 and 4 channel images, weight the color
///   channels by the alpha of each sample. Ignored for other channel counts.
///
/// Samples beyond the source region replicate its edge pixels. Results are
/// rounded to the nearest integer and clamped to `[0, 255]`.
///
/// # Errors
///
/// Fails if the kernel length is not `kernel_size²`, the divisor is zero, a
/// region does not fit its image, or the two regions differ in size.
///
/// # Example
///
/// ```
/// use brushstamp_image::{Image, Rect};
/// use brushstamp_imgproc::filter::{convolve, ConvolutionType};
///
/// let src = Image::<u8, 1>::new([3, 1].into(), vec![0, 90, 0]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
/// let rect = Rect::from_size(src.size());
///
/// let kernel = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
/// convolve(&src, rect, &mut dst, rect, &kernel, 3, 3.0, ConvolutionType::Normal, false).unwrap();
///
/// assert_eq!(dst.as_slice(), &[30, 30, 30]);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn convolve<const C: usize>(
    src: &Image<u8, C>,
    src_rect: Rect,
    dst: &mut Image<u8, C>,
    dst_rect: Rect,
    kernel: &[f32],
    kernel_size: usize,
    divisor: f64,
    mode: ConvolutionType,
    alpha_weighting: bool,
) -> Result<(), ImageError> {
    if kernel_size == 0 || kernel.len() != kernel_size * kernel_size {
        return Err(ImageError::InvalidKernel(format!(
            "expected {} weights for size {}, got {}",
            kernel_size * kernel_size,
            kernel_size,
            kernel.len()
        )));
    }

    if divisor == 0.0 {
        return Err(ImageError::InvalidKernel("divisor must be non-zero".into()));
    }

    if !src_rect.fits_in(src.size()) {
        return Err(ImageError::RectOutOfBounds(
            src_rect.to_string(),
            src.size().to_string(),
        ));
    }

    if !dst_rect.fits_in(dst.size()) {
        return Err(ImageError::RectOutOfBounds(
            dst_rect.to_string(),
            dst.size().to_string(),
        ));
    }

    if src_rect.size() != dst_rect.size() {
        return Err(ImageError::InvalidImageSize(
            src_rect.width,
            src_rect.height,
            dst_rect.width,
            dst_rect.height,
        ));
    }

    let margin = (kernel_size / 2) as isize;
    let divisor = divisor as f32;
    let alpha = (alpha_weighting && (C == 2 || C == 4)).then(|| C - 1);

    let src_cols = src.cols();
    let src_data = src.as_slice();
    let (x_min, x_max) = (src_rect.x as isize, (src_rect.x + src_rect.width - 1) as isize);
    let (y_min, y_max) = (src_rect.y as isize, (src_rect.y + src_rect.height - 1) as isize);

    parallel::for_each_row(dst, ExecutionStrategy::ParallelRows, |row, dst_row| {
        if row < dst_rect.y || row >= dst_rect.y + dst_rect.height {
            return;
        }
        let sy = (src_rect.y + row - dst_rect.y) as isize;

        let dst_pixels = dst_row
            .chunks_exact_mut(C)
            .skip(dst_rect.x)
            .take(dst_rect.width);

        for (i, dst_pixel) in dst_pixels.enumerate() {
            let sx = (src_rect.x + i) as isize;

            let mut total = [0.0f32; C];
            let mut weighted_divisor = 0.0f32;

            for (j, kernel_row) in kernel.chunks_exact(kernel_size).enumerate() {
                let yy = (sy + j as isize - margin).clamp(y_min, y_max) as usize;

                for (k, &weight) in kernel_row.iter().enumerate() {
                    let xx = (sx + k as isize - margin).clamp(x_min, x_max) as usize;
                    let s = &src_data[(yy * src_cols + xx) * C..][..C];

                    match alpha {
                        Some(a) => {
                            let s_alpha = s[a] as f32 / 255.0;
                            for b in 0..a {
                                total[b] += weight * s[b] as f32 * s_alpha;
                            }
                            total[a] += weight * s[a] as f32;
                            weighted_divisor += weight * s_alpha;
                        }
                        None => {
                            for b in 0..C {
                                total[b] += weight * s[b] as f32;
                            }
                        }
                    }
                }
            }

            for (b, out) in dst_pixel.iter_mut().enumerate() {
                let value = match alpha {
                    Some(a) if b != a => {
                        if weighted_divisor != 0.0 {
                            total[b] / weighted_divisor
                        } else {
                            0.0
                        }
                    }
                    _ => total[b] / divisor,
                };
                *out = mode.apply(value);
            }
        }
    })?;

    Ok(())
}
