use std::path::Path;

use cgmath::{Vector3, vec3};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    curve::{CurveKey, ResponseCurve},
    error::{VrError, VrResult},
    input_context::InputBindings,
};

/// Upper bound on projectile path samples per frame
pub const MAX_SIMULATION_STEPS: f32 = 4096.0;

/// Which tracked device the teleport is aimed with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AimSource {
    Head,
    LeftHand,
    RightHand,
}

/// How the destination is searched for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetingMode {
    /// Straight trace of `max_teleport_distance`
    LineTrace,
    /// Ballistic arc launched at `projectile_speed`
    Projectile,
}

/// Visual assets for the teleport arc and destination marker
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcVisualConfig {
    pub arc_mesh: Option<String>,
    pub arc_material: Option<String>,
    pub marker_mesh: Option<String>,
    pub marker_material: Option<String>,
}

impl Default for ArcVisualConfig {
    fn default() -> Self {
        Self {
            arc_mesh: Some("meshes/teleport_arc_segment".to_owned()),
            arc_material: Some("materials/teleport_arc".to_owned()),
            marker_mesh: Some("meshes/destination_marker".to_owned()),
            marker_material: None,
        }
    }
}

/// Blinker post-process material bindings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkerConfig {
    pub radius_parameter: String,
    pub centre_parameter: String,
    /// How far ahead of the camera the travel direction is sampled, in meters
    pub stationary_distance: f32,
    /// Speed below which the character counts as stationary
    pub stationary_speed: f32,
    pub radius_vs_velocity: Option<ResponseCurve>,
}

impl Default for BlinkerConfig {
    fn default() -> Self {
        Self {
            radius_parameter: "Radius".to_owned(),
            centre_parameter: "Centre".to_owned(),
            stationary_distance: 10.0,
            stationary_speed: 1e-3,
            radius_vs_velocity: ResponseCurve::new(vec![
                CurveKey::new(0.0, 1.0),
                CurveKey::new(3.0, 0.4),
            ])
            .ok(),
        }
    }
}

/// Tunables for the VR character. Distances are meters, times seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VrCharacterConfig {
    pub aim_source: AimSource,
    pub targeting: TargetingMode,
    pub max_teleport_distance: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub simulation_time: f32,
    /// Path samples per simulated second
    pub sim_frequency: f32,
    pub gravity: f32,
    pub fade_time: f32,
    pub pause_time: f32,
    pub fade_color: Vector3<f32>,
    /// Half extents of the box searched when snapping a hit onto the nav mesh
    pub projection_extent: Vector3<f32>,
    pub capsule_half_height: f32,
    pub arc: ArcVisualConfig,
    pub blinkers: BlinkerConfig,
    pub bindings: InputBindings,
}

impl Default for VrCharacterConfig {
    fn default() -> Self {
        VrCharacterConfig {
            aim_source: AimSource::RightHand,
            targeting: TargetingMode::Projectile,
            max_teleport_distance: 10.0,
            projectile_speed: 10.0,
            projectile_radius: 0.1,
            simulation_time: 5.0,
            sim_frequency: 15.0,
            gravity: 9.8,
            fade_time: 0.6,
            pause_time: 0.2,
            fade_color: vec3(0.0, 0.0, 0.0),
            projection_extent: vec3(1.0, 1.0, 1.0),
            capsule_half_height: 0.88,
            arc: ArcVisualConfig::default(),
            blinkers: BlinkerConfig::default(),
            bindings: InputBindings::default(),
        }
    }
}

impl VrCharacterConfig {
    pub fn from_json_str(json: &str) -> VrResult<Self> {
        let config: VrCharacterConfig =
            serde_json::from_str(json).map_err(|source| VrError::Parse {
                context: "character config".to_owned(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> VrResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| VrError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        info!("loaded character config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> VrResult<()> {
        let non_negative = [
            ("max_teleport_distance", self.max_teleport_distance),
            ("projectile_radius", self.projectile_radius),
            ("simulation_time", self.simulation_time),
            ("gravity", self.gravity),
            ("fade_time", self.fade_time),
            ("pause_time", self.pause_time),
            ("capsule_half_height", self.capsule_half_height),
            ("blinkers.stationary_speed", self.blinkers.stationary_speed),
        ];
        for (item, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(VrError::validation(
                    item,
                    format!("must be a finite non-negative number, got {}", value),
                ));
            }
        }

        let positive = [
            ("projectile_speed", self.projectile_speed),
            ("sim_frequency", self.sim_frequency),
            ("blinkers.stationary_distance", self.blinkers.stationary_distance),
        ];
        for (item, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(VrError::validation(
                    item,
                    format!("must be a finite positive number, got {}", value),
                ));
            }
        }

        let steps = (self.simulation_time * self.sim_frequency).ceil();
        if steps > MAX_SIMULATION_STEPS {
            return Err(VrError::validation(
                "simulation_time",
                format!(
                    "{} steps at {}Hz exceeds the limit of {}",
                    steps, self.sim_frequency, MAX_SIMULATION_STEPS
                ),
            ));
        }

        let extent = self.projection_extent;
        if [extent.x, extent.y, extent.z]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(VrError::validation(
                "projection_extent",
                "components must be finite and non-negative",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(VrCharacterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = VrCharacterConfig::from_json_str(
            r#"{ "fade_time": 0.3, "aim_source": "Head", "projection_extent": [0.5, 2.0, 0.5] }"#,
        )
        .unwrap();

        assert_eq!(config.fade_time, 0.3);
        assert_eq!(config.aim_source, AimSource::Head);
        assert_eq!(config.projection_extent, vec3(0.5, 2.0, 0.5));
        assert_eq!(config.pause_time, 0.2);
        assert_eq!(config.bindings.teleport_action, "Teleport");
    }

    #[test]
    fn test_curve_can_be_disabled() {
        let config =
            VrCharacterConfig::from_json_str(r#"{ "blinkers": { "radius_vs_velocity": null } }"#)
                .unwrap();
        assert!(config.blinkers.radius_vs_velocity.is_none());
        assert_eq!(config.blinkers.radius_parameter, "Radius");
    }

    #[test]
    fn test_rejects_negative_fade() {
        let err = VrCharacterConfig::from_json_str(r#"{ "fade_time": -1.0 }"#).unwrap_err();
        assert!(matches!(err, VrError::Validation { ref item, .. } if item == "fade_time"));
    }

    #[test]
    fn test_rejects_zero_sim_frequency() {
        let config = VrCharacterConfig {
            sim_frequency: 0.0,
            ..VrCharacterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unbounded_projectile_steps() {
        let err = VrCharacterConfig::from_json_str(
            r#"{ "simulation_time": 1000.0, "sim_frequency": 1000.0 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, VrError::Validation { ref item, .. } if item == "simulation_time"));

        let at_limit = VrCharacterConfig {
            simulation_time: 4.0,
            sim_frequency: 1024.0,
            ..VrCharacterConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = VrCharacterConfig::from_json_str("{ fade_time: }").unwrap_err();
        assert!(matches!(err, VrError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = VrCharacterConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, VrError::Io { .. }));
    }
}
