use brushstamp_image::{Image, ImageError, ImageSize, Rect};
use brushstamp_imgproc::filter::{convolve, ConvolutionType};

/// Largest side length of the softness kernel.
pub const MAX_BLUR_KERNEL: usize = 15;

/// A square pyramid-shaped kernel used to soften transformed stamps.
#[derive(Debug, Clone, PartialEq)]
pub struct BlurKernel {
    /// Side length of the kernel, always odd.
    pub size: usize,
    /// The `size * size` weights, row-major.
    pub weights: Vec<f32>,
}

impl BlurKernel {
    /// Create a kernel of the given side length.
    pub fn new(size: usize) -> Self {
        let mut weights = vec![0.0; size * size];
        fill_blur_kernel(&mut weights);
        Self { size, weights }
    }

    /// Create the kernel that softens an image of `size` to `hardness`.
    pub fn for_image(size: ImageSize, hardness: f64) -> Self {
        Self::new(blur_kernel_size(size.height, size.width, hardness))
    }

    /// Sum of all weights.
    pub fn divisor(&self) -> f64 {
        self.weights.iter().sum::<f32>() as f64
    }
}

/// Side length of the softness kernel for an image.
///
/// Grows linearly with `1 - hardness` up to the smaller image dimension,
/// capped at [`MAX_BLUR_KERNEL`], and is always odd.
pub fn blur_kernel_size(height: usize, width: usize, hardness: f64) -> usize {
    let min_dim = width.min(height) as f64;
    let max_size = MAX_BLUR_KERNEL.min(width.min(height)) as f64;

    let size = (max_size * ((min_dim * (1.0 - hardness)) / min_dim)) as usize;

    if size % 2 == 0 {
        size + 1
    } else {
        size
    }
}

/// Fill a flat kernel with weights falling from the first element towards
/// the middle and rising again towards the last one.
///
/// With `half = len / 2 + 1` the weight at index `i` is `half - i` below
/// `half` and `i - half` from there on. The index runs over the whole
/// buffer, not per row.
pub fn fill_blur_kernel(kernel: &mut [f32]) {
    let half = kernel.len() / 2 + 1;

    for (i, w) in kernel.iter_mut().enumerate() {
        let weight = if i < half { half - i } else { i - half };
        *w = weight as f32;
    }
}

/// Soften an image in place according to `hardness`.
///
/// The image is convolved with a [`BlurKernel`] sized for its dimensions.
/// Kernels of side 1 leave the image untouched.
pub fn apply_softness<const C: usize>(
    image: &mut Image<u8, C>,
    hardness: f64,
) -> Result<(), ImageError> {
    let kernel = BlurKernel::for_image(image.size(), hardness);

    if kernel.size <= 1 {
        log::trace!("hardness {hardness}: kernel size {}, no blur", kernel.size);
        return Ok(());
    }

    log::debug!(
        "softening {} stamp with a {}x{} kernel",
        image.size(),
        kernel.size,
        kernel.size
    );

    let scratch = image.clone();
    let rect = Rect::from_size(image.size());

    convolve(
        &scratch,
        rect,
        image,
        rect,
        &kernel.weights,
        kernel.size,
        kernel.divisor(),
        ConvolutionType::Normal,
        false,
    )
}
