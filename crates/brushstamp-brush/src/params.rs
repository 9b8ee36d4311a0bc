use serde::{Deserialize, Serialize};

use brushstamp_image::ImageError;

/// Parameters of a brush stamp transform.
///
/// Missing fields fall back to their [`Default`] values when deserializing.
///
/// # Example
///
/// ```
/// use brushstamp_brush::TransformParams;
///
/// let params: TransformParams = serde_json::from_str(r#"{ "angle": 0.25 }"#).unwrap();
/// assert_eq!(params.scale, 1.0);
/// assert_eq!(params.angle, 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    /// Uniform scale factor, must be positive.
    pub scale: f64,
    /// Skew in `[-1, 1]`. Negative values shrink the width, positive values the height.
    pub aspect_ratio: f64,
    /// Rotation in fractions of a full turn.
    pub angle: f64,
    /// Edge hardness in `[0, 1]`. Values below `1` soften the stamp.
    pub hardness: f64,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            aspect_ratio: 0.0,
            angle: 0.0,
            hardness: 1.0,
        }
    }
}

impl TransformParams {
    /// Create a new set of transform parameters.
    pub fn new(scale: f64, aspect_ratio: f64, angle: f64, hardness: f64) -> Self {
        Self {
            scale,
            aspect_ratio,
            angle,
            hardness,
        }
    }

    /// Whether the parameters leave a stamp untouched.
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.aspect_ratio == 0.0 && self.angle == 0.0 && self.hardness == 1.0
    }

    /// Check that the parameters describe a usable transform.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidTransformParameter`] if any value is not
    /// finite or the scale is not positive.
    pub fn validate(&self) -> Result<(), ImageError> {
        let fields = [
            ("scale", self.scale),
            ("aspect_ratio", self.aspect_ratio),
            ("angle", self.angle),
            ("hardness", self.hardness),
        ];

        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ImageError::InvalidTransformParameter(format!(
                "{name} must be finite, got {value}"
            )));
        }

        if self.scale <= 0.0 {
            return Err(ImageError::InvalidTransformParameter(format!(
                "scale must be > 0, got {}",
                self.scale
            )));
        }

        Ok(())
    }
}
