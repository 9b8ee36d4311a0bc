use std::sync::Arc;

use brushstamp_image::{Image, ImageError, ImageSize};

use crate::cache::{CacheKey, TransformCache};
use crate::params::TransformParams;
use crate::transform;

/// A paint brush stamp: a mask and an optional color pixmap of the same size.
///
/// The most recent transform of the mask and of the pixmap is cached, so
/// repeated stamps with the same parameters are not resampled again.
///
/// # Example
///
/// ```
/// use brushstamp_image::{Image, ImageSize};
/// use brushstamp_brush::{Brush, TransformParams};
///
/// let brush = Brush::new(Image::from_size_val([4, 4].into(), 255).unwrap());
/// let params = TransformParams { scale: 2.0, ..Default::default() };
///
/// let mask = brush.transform_mask(&params).unwrap();
/// assert_eq!(mask.size(), ImageSize::from([8, 8]));
/// assert_eq!(brush.transform_size(&params).unwrap(), ImageSize::from([8, 8]));
/// ```
#[derive(Debug)]
pub struct Brush {
    mask: Image<u8, 1>,
    pixmap: Option<Image<u8, 3>>,
    mask_cache: TransformCache<Image<u8, 1>>,
    pixmap_cache: TransformCache<Image<u8, 3>>,
}

impl Brush {
    /// Create a brush from a mask alone.
    pub fn new(mask: Image<u8, 1>) -> Self {
        Self {
            mask,
            pixmap: None,
            mask_cache: TransformCache::default(),
            pixmap_cache: TransformCache::default(),
        }
    }

    /// Create a brush with a color pixmap.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidImageSize`] if the pixmap and mask sizes differ.
    pub fn with_pixmap(mask: Image<u8, 1>, pixmap: Image<u8, 3>) -> Result<Self, ImageError> {
        if mask.size() != pixmap.size() {
            return Err(ImageError::InvalidImageSize(
                mask.width(),
                mask.height(),
                pixmap.width(),
                pixmap.height(),
            ));
        }

        Ok(Self {
            pixmap: Some(pixmap),
            ..Self::new(mask)
        })
    }

    /// The untransformed mask.
    pub fn mask(&self) -> &Image<u8, 1> {
        &self.mask
    }

    /// The untransformed pixmap, if any.
    pub fn pixmap(&self) -> Option<&Image<u8, 3>> {
        self.pixmap.as_ref()
    }

    /// The size of the untransformed brush.
    pub fn size(&self) -> ImageSize {
        self.mask.size()
    }

    /// Size of the brush after the transform.
    ///
    /// Unscaled, unskewed brushes turned by 0, 1/2 or a full turn keep their size.
    pub fn transform_size(&self, params: &TransformParams) -> Result<ImageSize, ImageError> {
        params.validate()?;

        if params.scale == 1.0
            && params.aspect_ratio == 0.0
            && (params.angle == 0.0 || params.angle == 0.5 || params.angle == 1.0)
        {
            return Ok(self.mask.size());
        }

        Ok(transform::transform_size(
            self.mask.size(),
            params.scale,
            params.aspect_ratio,
            params.angle,
        ))
    }

    /// The transformed mask.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidTransformParameter`] if the parameters
    /// are not valid, see [`TransformParams::validate`].
    pub fn transform_mask(&self, params: &TransformParams) -> Result<Arc<Image<u8, 1>>, ImageError> {
        let key = self.cache_key(params)?;

        self.mask_cache.get_or_try_insert_with(key, || {
            if params.is_identity() {
                return Ok(self.mask.clone());
            }
            transform::transform_mask(
                &self.mask,
                params.scale,
                params.aspect_ratio,
                params.angle,
                params.hardness,
            )
        })
    }

    /// The transformed pixmap, or `None` for a mask-only brush.
    ///
    /// # Errors
    ///
    /// Same as [`Brush::transform_mask`].
    pub fn transform_pixmap(
        &self,
        params: &TransformParams,
    ) -> Result<Option<Arc<Image<u8, 3>>>, ImageError> {
        let Some(pixmap) = &self.pixmap else {
            return Ok(None);
        };

        let key = self.cache_key(params)?;

        let transformed = self.pixmap_cache.get_or_try_insert_with(key, || {
            if params.is_identity() {
                return Ok(pixmap.clone());
            }
            transform::transform_pixmap(
                pixmap,
                params.scale,
                params.aspect_ratio,
                params.angle,
                params.hardness,
            )
        })?;

        Ok(Some(transformed))
    }

    /// Drop all cached transforms.
    pub fn clear_cache(&self) {
        self.mask_cache.clear();
        self.pixmap_cache.clear();
    }

    fn cache_key(&self, params: &TransformParams) -> Result<CacheKey, ImageError> {
        let size = self.transform_size(params)?;

        Ok(CacheKey {
            width: size.width,
            height: size.height,
            params: *params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_mask(size: usize) -> Result<Image<u8, 1>, ImageError> {
        let r = size as f64 / 2.0;
        Image::from_fn([size, size].into(), |x, y, _| {
            let (dx, dy) = (x as f64 + 0.5 - r, y as f64 + 0.5 - r);
            if dx * dx + dy * dy <= r * r {
                255
            } else {
                0
            }
        })
    }

    #[test]
    fn pixmap_size_must_match() -> Result<(), ImageError> {
        let mask = Image::<u8, 1>::from_size_val([4, 4].into(), 0)?;
        let pixmap = Image::<u8, 3>::from_size_val([4, 5].into(), 0)?;

        let res = Brush::with_pixmap(mask, pixmap);
        assert!(matches!(res, Err(ImageError::InvalidImageSize(4, 4, 4, 5))));

        Ok(())
    }

    #[test]
    fn transform_size_shortcut() -> Result<(), ImageError> {
        let brush = Brush::new(Image::from_size_val([10, 4].into(), 255)?);

        for angle in [0.0, 0.5, 1.0] {
            let params = TransformParams::new(1.0, 0.0, angle, 0.3);
            assert_eq!(brush.transform_size(&params)?, ImageSize::from([10, 4]));
        }

        let params = TransformParams::new(2.0, 0.0, 0.0, 1.0);
        assert_eq!(brush.transform_size(&params)?, ImageSize::from([20, 8]));

        Ok(())
    }

    #[test]
    fn identity_returns_copy() -> Result<(), ImageError> {
        let brush = Brush::new(round_mask(9)?);
        let mask = brush.transform_mask(&TransformParams::default())?;
        assert_eq!(mask.as_ref(), brush.mask());

        Ok(())
    }

    #[test]
    fn cached_transforms() -> Result<(), ImageError> {
        let brush = Brush::new(round_mask(12)?);
        let params = TransformParams::new(0.75, 0.2, 0.1, 0.6);

        let first = brush.transform_mask(&params)?;
        let second = brush.transform_mask(&params)?;
        assert!(Arc::ptr_eq(&first, &second));

        let other = brush.transform_mask(&TransformParams::new(0.75, 0.2, 0.2, 0.6))?;
        assert!(!Arc::ptr_eq(&first, &other));

        brush.clear_cache();
        let recomputed = brush.transform_mask(&params)?;
        assert!(!Arc::ptr_eq(&first, &recomputed));
        assert_eq!(first, recomputed);

        Ok(())
    }

    #[test]
    fn pixmap_follows_mask() -> Result<(), ImageError> {
        let mask = round_mask(10)?;
        let pixmap = Image::<u8, 3>::from_fn(mask.size(), |x, y, _| {
            mask.as_slice()[y * mask.cols() + x]
        })?;
        let brush = Brush::with_pixmap(mask, pixmap)?;
        let params = TransformParams::new(1.3, 0.0, 0.2, 0.8);

        let mask = brush.transform_mask(&params)?;
        let pixmap = brush.transform_pixmap(&params)?.expect("brush has a pixmap");
        assert_eq!(mask.size(), pixmap.size());
        for ch in 0..3 {
            assert_eq!(pixmap.channel(ch)?, *mask);
        }

        let mask_only = Brush::new(round_mask(10)?);
        assert!(mask_only.transform_pixmap(&params)?.is_none());

        Ok(())
    }

    #[test]
    fn invalid_params() -> Result<(), ImageError> {
        let brush = Brush::new(round_mask(4)?);

        let res = brush.transform_mask(&TransformParams::new(0.0, 0.0, 0.0, 1.0));
        assert!(matches!(res, Err(ImageError::InvalidTransformParameter(_))));

        let res = brush.transform_size(&TransformParams::new(1.0, f64::NAN, 0.0, 1.0));
        assert!(matches!(res, Err(ImageError::InvalidTransformParameter(_))));

        Ok(())
    }

    #[test]
    fn oversized_stamp_is_an_error() -> Result<(), ImageError> {
        let brush = Brush::new(round_mask(100)?);

        let res = brush.transform_mask(&TransformParams::new(1e10, 0.0, 0.0, 1.0));
        assert!(matches!(res, Err(ImageError::ImageTooLarge(..))));

        // the failure is not cached
        let scaled = brush.transform_mask(&TransformParams::new(0.5, 0.0, 0.0, 1.0))?;
        assert_eq!(scaled.size(), ImageSize::from([50, 50]));

        Ok(())
    }
}
