//! Typed system settings
//!
//! The store keeps settings as JSON blobs in a key/value table. Rather than
//! passing those blobs around untyped, each known `setting_key` maps to a
//! fixed schema, decoded and validated at the boundary.

use crate::verdict::Thresholds;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Setting key for detection thresholds
pub const KEY_THRESHOLDS: &str = "thresholds";
/// Setting key for the camera roster
pub const KEY_CAMERA_CONFIG: &str = "camera_config";

/// Roster of camera identifiers available to the intake flow
///
/// Behaves as an ordered set: duplicates are rejected without mutating
/// state, and removing an absent camera is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRoster {
    pub cameras: Vec<String>,
}

impl Default for CameraRoster {
    fn default() -> Self {
        Self {
            cameras: vec![
                "CAM-01".to_string(),
                "CAM-02".to_string(),
                "CAM-03".to_string(),
            ],
        }
    }
}

impl CameraRoster {
    pub fn empty() -> Self {
        Self { cameras: Vec::new() }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cameras.iter().any(|c| c == name)
    }

    /// Add a camera, preserving existing order
    ///
    /// Rejects blank names and duplicates; the roster is unchanged on error.
    pub fn add(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Camera name cannot be empty".to_string()));
        }
        if self.contains(name) {
            return Err(Error::InvalidInput(format!(
                "Camera already exists: {}",
                name
            )));
        }
        self.cameras.push(name.to_string());
        Ok(())
    }

    /// Remove a camera; returns whether anything was removed
    ///
    /// Removing a camera that is not present is a no-op.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.cameras.len();
        self.cameras.retain(|c| c != name);
        before != self.cameras.len()
    }

    /// Validate a roster supplied wholesale (blank or duplicate names)
    pub fn validate(&self) -> Result<()> {
        let mut rebuilt = CameraRoster::empty();
        for name in &self.cameras {
            rebuilt.add(name)?;
        }
        Ok(())
    }
}

/// A decoded `system_settings` value, tagged by its `setting_key`
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Thresholds(Thresholds),
    CameraConfig(CameraRoster),
}

impl SettingValue {
    /// The `setting_key` this value is stored under
    pub fn key(&self) -> &'static str {
        match self {
            SettingValue::Thresholds(_) => KEY_THRESHOLDS,
            SettingValue::CameraConfig(_) => KEY_CAMERA_CONFIG,
        }
    }

    /// Decode and validate a stored JSON blob for a known key
    pub fn decode(key: &str, json: &str) -> Result<Self> {
        match key {
            KEY_THRESHOLDS => {
                let thresholds: Thresholds = serde_json::from_str(json).map_err(|e| {
                    Error::InvalidInput(format!("Malformed thresholds setting: {}", e))
                })?;
                thresholds.validate()?;
                Ok(SettingValue::Thresholds(thresholds))
            }
            KEY_CAMERA_CONFIG => {
                let roster: CameraRoster = serde_json::from_str(json).map_err(|e| {
                    Error::InvalidInput(format!("Malformed camera_config setting: {}", e))
                })?;
                roster.validate()?;
                Ok(SettingValue::CameraConfig(roster))
            }
            other => Err(Error::InvalidInput(format!(
                "Unknown setting key: {}",
                other
            ))),
        }
    }

    /// Extract thresholds; errors when the value is a different variant
    pub fn into_thresholds(self) -> Result<Thresholds> {
        match self {
            SettingValue::Thresholds(t) => Ok(t),
            other => Err(Error::Internal(format!(
                "Expected thresholds setting, got {}",
                other.key()
            ))),
        }
    }

    /// Extract the camera roster; errors when the value is a different variant
    pub fn into_cameras(self) -> Result<CameraRoster> {
        match self {
            SettingValue::CameraConfig(r) => Ok(r),
            other => Err(Error::Internal(format!(
                "Expected camera_config setting, got {}",
                other.key()
            ))),
        }
    }

    /// Encode the value as the JSON blob stored in `setting_value`
    pub fn encode(&self) -> Result<String> {
        let json = match self {
            SettingValue::Thresholds(t) => serde_json::to_string(t),
            SettingValue::CameraConfig(r) => serde_json::to_string(r),
        };
        json.map_err(|e| Error::Internal(format!("Failed to encode setting: {}", e)))
    }
}
