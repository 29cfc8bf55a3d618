//! Per-(hangar, camera) manual alignment corrections.
//!
//! Camera rigs are mounted slightly differently at each hangar. A calibration
//! transform re-aligns a site's feed to the baseline framing so ROI presets
//! authored against the baseline frame the same subject everywhere. Absent
//! entries are the identity.

#[cfg(test)]
#[path = "calibration_test.rs"]
mod calibration_test;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Hangar site identifier as supplied by the settings store.
pub type HangarId = String;

/// Slot index of a camera within the inspection grid.
pub type CameraIndex = usize;

/// Manual correction applied around the zoomed image's center.
///
/// Translation is in reference units (see [`crate::consts::CALIBRATION_REFERENCE_PX`]),
/// rotation in degrees, opacity in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalibrationTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    #[serde(alias = "rotationDegrees")]
    pub rotation: f64,
    pub flipped: bool,
    pub opacity: f64,
}

impl Default for CalibrationTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CalibrationTransform {
    pub const IDENTITY: Self =
        Self { translate_x: 0.0, translate_y: 0.0, scale: 1.0, rotation: 0.0, flipped: false, opacity: 100.0 };

    /// Whether this transform leaves placement untouched (opacity aside).
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_identity_placement(&self) -> bool {
        self.translate_x == 0.0 && self.translate_y == 0.0 && self.scale == 1.0 && !self.is_rotated_or_flipped()
    }

    /// Whether drawing needs the rotate/flip path.
    #[must_use]
    pub fn is_rotated_or_flipped(&self) -> bool {
        self.rotation != 0.0 || self.flipped
    }

    /// Draw alpha in `[0, 1]`.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        if self.opacity.is_nan() {
            return 1.0;
        }
        (self.opacity / 100.0).clamp(0.0, 1.0)
    }

    /// Replace non-finite or non-positive components with identity values.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        let scale = finite_or(self.scale, 1.0);
        Self {
            translate_x: finite_or(self.translate_x, 0.0),
            translate_y: finite_or(self.translate_y, 0.0),
            scale: if scale > 0.0 { scale } else { 1.0 },
            rotation: finite_or(self.rotation, 0.0),
            flipped: self.flipped,
            opacity: finite_or(self.opacity, 100.0).clamp(0.0, 100.0),
        }
    }
}

/// Wire shape of the calibration settings: `hangar -> camera index -> transform`.
type CalibrationFile = BTreeMap<HangarId, BTreeMap<String, CalibrationTransform>>;

/// Registry of calibration transforms, keyed by `(hangar, camera)`.
#[derive(Debug, Clone, Default)]
pub struct CalibrationRegistry {
    entries: HashMap<(HangarId, CameraIndex), CalibrationTransform>,
}

impl CalibrationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the nested settings map.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] for malformed payloads and
    /// [`LoadError::InvalidCameraIndex`] when a camera key is not an unsigned integer.
    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        let file: CalibrationFile = serde_json::from_str(raw)?;
        let mut registry = Self::new();
        for (hangar, cameras) in file {
            for (key, transform) in cameras {
                let camera = key
                    .trim()
                    .parse::<CameraIndex>()
                    .map_err(|_| LoadError::InvalidCameraIndex { hangar: hangar.clone(), key: key.clone() })?;
                registry.set(&hangar, camera, transform);
            }
        }
        tracing::debug!(entries = registry.len(), "calibration registry loaded");
        Ok(registry)
    }

    /// Serialize back to the nested settings map.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LoadError> {
        let mut file = CalibrationFile::new();
        for ((hangar, camera), transform) in &self.entries {
            file.entry(hangar.clone())
                .or_default()
                .insert(camera.to_string(), *transform);
        }
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Transform for `(hangar, camera)`; the identity when absent.
    #[must_use]
    pub fn get(&self, hangar: &str, camera: CameraIndex) -> CalibrationTransform {
        match self.entries.get(&(hangar.to_owned(), camera)) {
            Some(transform) => *transform,
            None => {
                tracing::trace!(hangar, camera, "no calibration entry; using identity");
                CalibrationTransform::IDENTITY
            }
        }
    }

    /// Store a transform, sanitizing non-finite components.
    pub fn set(&mut self, hangar: &str, camera: CameraIndex, transform: CalibrationTransform) {
        self.entries.insert((hangar.to_owned(), camera), transform.sanitized());
    }

    /// Drop an entry so the camera falls back to the identity.
    pub fn remove(&mut self, hangar: &str, camera: CameraIndex) -> Option<CalibrationTransform> {
        self.entries.remove(&(hangar.to_owned(), camera))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
