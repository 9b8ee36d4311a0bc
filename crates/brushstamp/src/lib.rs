#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use brushstamp_image as image;

#[doc(inline)]
pub use brushstamp_imgproc as imgproc;

#[doc(inline)]
pub use brushstamp_brush as brush;
