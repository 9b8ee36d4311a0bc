/// An error type for the image and image processing crates.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when an image with a zero dimension is requested.
    #[error("Image size must be non-zero, got {0}x{1}")]
    ZeroSizedImage(usize, usize),

    /// Error when two images that must match in size do not.
    #[error("Invalid image size: {0}x{1} does not match {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds for {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel ({0}, {1}) is out of bounds for a {2}x{3} image")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the pixel buffer of an image cannot be sized or allocated.
    #[error("Image of {0}x{1} with {2} channels is too large to allocate")]
    ImageTooLarge(usize, usize, usize),

    /// Error when the pixel data cannot be cast to the requested type.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when a convolution kernel is malformed.
    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),

    /// Error when a region does not fit inside its image.
    #[error("Region {0} is out of bounds for image of size {1}")]
    RectOutOfBounds(String, String),

    /// Error when a parallel operation could not be scheduled.
    #[error("Parallel execution failed: {0}")]
    ExecutionError(String),

    /// Error when transform parameters are outside the accepted range.
    #[error("Invalid transform parameter: {0}")]
    InvalidTransformParameter(String),
}
