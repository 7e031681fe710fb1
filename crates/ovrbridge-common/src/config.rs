//! Already-parsed configuration consumed by the input and compositor layers.
//!
//! Defaults match the shipped configuration file. Parsing the user's file is
//! the host's business; [`Config::from_json_str`] exists for tooling.

use serde::{Deserialize, Serialize};

use crate::{VrError, VrResult};

/// Manual grip offsets and global tilt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerAdjustConfig {
    pub adjust_left_position: bool,
    pub adjust_right_position: bool,
    pub adjust_left_rotation: bool,
    pub adjust_right_rotation: bool,
    /// Metres.
    pub left_position: [f32; 3],
    /// Metres.
    pub right_position: [f32; 3],
    /// Degrees about X, Y, Z.
    pub left_rotation: [f32; 3],
    /// Degrees about X, Y, Z.
    pub right_rotation: [f32; 3],
    pub adjust_tilt: bool,
    /// Degrees about X.
    pub tilt: f32,
}

/// Controller pose smoothing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub enabled: bool,
    pub pos_min_cutoff: f32,
    pub pos_beta: f32,
    pub rot_min_cutoff: f32,
    pub rot_beta: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pos_min_cutoff: 1.25,
            pos_beta: 20.0,
            rot_min_cutoff: 1.5,
            rot_beta: 0.2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub controller: ControllerAdjustConfig,
    pub smoothing: SmoothingConfig,
    /// Turn soft failures into fatal ones. Useful while debugging.
    pub stop_on_soft_abort: bool,
}

impl Config {
    pub fn from_json_str(json: &str) -> VrResult<Self> {
        serde_json::from_str(json).map_err(|e| VrError::soft(format!("invalid config: {e}")))
    }
}
