use crate::foundation::error::{FramekitError, FramekitResult};

/// Interactive transform parameters applied to the source photo at render
/// time.
///
/// Owned and mutated by the controller layer; the compositor only reads
/// them. Persisted as-is in the preset slot.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    /// Scale multiplier on the cover-fit draw size. Finite and > 0.
    /// Values below 1 may re-introduce background gaps; that is intended.
    pub zoom: f64,
    /// Rotation in degrees about the canvas center. Any finite value.
    pub rotate_deg: f64,
    /// Linear brightness on the source layer. 100 is identity, 0 is black,
    /// values above 100 brighten without an upper clamp.
    pub brightness_pct: f64,
    /// Mirror across the vertical axis (applied after rotation).
    pub flip_horizontal: bool,
    /// Mirror across the horizontal axis (applied after rotation).
    pub flip_vertical: bool,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotate_deg: 0.0,
            brightness_pct: 100.0,
            flip_horizontal: false,
            flip_vertical: false,
        }
    }
}

impl TransformSettings {
    pub fn validate(&self) -> FramekitResult<()> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(FramekitError::validation("zoom must be finite and > 0"));
        }
        if !self.rotate_deg.is_finite() {
            return Err(FramekitError::validation("rotation must be finite"));
        }
        if !self.brightness_pct.is_finite() || self.brightness_pct < 0.0 {
            return Err(FramekitError::validation(
                "brightness must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Restore all parameters to their defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_identity() {
        let s = TransformSettings::default();
        assert_eq!(s.zoom, 1.0);
        assert_eq!(s.rotate_deg, 0.0);
        assert_eq!(s.brightness_pct, 100.0);
        assert!(!s.flip_horizontal);
        assert!(!s.flip_vertical);
        s.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut s = TransformSettings::default();
        s.zoom = 0.0;
        assert!(s.validate().is_err());
        s.zoom = f64::NAN;
        assert!(s.validate().is_err());

        let mut s = TransformSettings::default();
        s.brightness_pct = -1.0;
        assert!(s.validate().is_err());

        let mut s = TransformSettings::default();
        s.rotate_deg = f64::INFINITY;
        assert!(s.validate().is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut s = TransformSettings {
            zoom: 2.5,
            rotate_deg: 45.0,
            brightness_pct: 60.0,
            flip_horizontal: true,
            flip_vertical: true,
        };
        s.reset();
        assert_eq!(s, TransformSettings::default());
    }

    #[test]
    fn serde_fills_missing_fields_with_defaults() {
        let s: TransformSettings = serde_json::from_str(r#"{"zoom":1.5}"#).unwrap();
        assert_eq!(s.zoom, 1.5);
        assert_eq!(s.brightness_pct, 100.0);
    }
}
