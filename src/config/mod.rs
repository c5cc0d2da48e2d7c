//! Static per-surface catalog: display details and camera focus settings.
//!
//! Keyed by surface display name. Lookups never fail; unknown names resolve
//! to a documented generic fallback so picking an unmodeled surface still
//! produces a usable experience.

use crate::scene::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the camera frames a surface when it gains focus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusTarget {
    /// Offset from the surface's world position to the look-at point.
    pub target_offset: [f32; 3],
    /// Camera distance from the look-at point along the fixed view direction.
    pub distance: f32,
    pub fov_deg: f32,
}

impl Default for FocusTarget {
    fn default() -> Self {
        Self {
            target_offset: [0.0, 0.0, 0.0],
            distance: 1.0,
            fov_deg: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
    Critical,
}

/// Human-readable fields consumed by the detail/tooltip UI, plus the camera
/// settings the choreographer reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDetails {
    pub id: String,
    pub name: String,
    pub description: String,
    pub group: String,
    pub importance: Importance,
    #[serde(default)]
    pub camera: FocusTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub name: String,
    pub color: Color,
    pub description: String,
}

/// Read-only registry of surface details and part groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurfaceCatalog {
    #[serde(default)]
    entries: HashMap<String, SurfaceDetails>,
    #[serde(default)]
    groups: HashMap<String, GroupInfo>,
}

impl SurfaceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn insert(&mut self, surface_name: impl Into<String>, details: SurfaceDetails) {
        self.entries.insert(surface_name.into(), details);
    }

    pub fn insert_group(&mut self, group_id: impl Into<String>, info: GroupInfo) {
        self.groups.insert(group_id.into(), info);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Details for a surface name. Unmatched names get a humanized fallback
    /// (underscores become spaces) with default camera settings.
    pub fn details_for(&self, surface_name: &str) -> SurfaceDetails {
        if let Some(details) = self.entries.get(surface_name) {
            return details.clone();
        }
        SurfaceDetails {
            id: surface_name.to_lowercase(),
            name: surface_name.replace('_', " "),
            description: "Mechanism part".to_string(),
            group: "unknown".to_string(),
            importance: Importance::Low,
            camera: FocusTarget::default(),
        }
    }

    pub fn focus_target_for(&self, surface_name: &str) -> FocusTarget {
        self.entries
            .get(surface_name)
            .map(|details| details.camera)
            .unwrap_or_default()
    }

    pub fn group_info(&self, group_id: &str) -> GroupInfo {
        self.groups.get(group_id).cloned().unwrap_or_else(|| GroupInfo {
            name: "Unknown group".to_string(),
            color: Color::hex(0x888888),
            description: "Part group".to_string(),
        })
    }

    /// The compiled-in engine showcase catalog.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        catalog.insert(
            "Engine_Casing",
            SurfaceDetails {
                id: "engine_casing".into(),
                name: "Engine casing".into(),
                description: "Main engine housing in heat-resistant alloy. \
                              Shields the internals from overheating."
                    .into(),
                group: "engine".into(),
                importance: Importance::High,
                camera: FocusTarget {
                    target_offset: [0.0, 0.3, 0.0],
                    distance: 1.5,
                    fov_deg: 45.0,
                },
            },
        );
        catalog.insert(
            "Piston_Assembly",
            SurfaceDetails {
                id: "piston_assembly".into(),
                name: "Piston assembly".into(),
                description: "Pistons and connecting rods. Converts combustion \
                              energy into mechanical motion."
                    .into(),
                group: "engine".into(),
                importance: Importance::Critical,
                camera: FocusTarget {
                    target_offset: [0.0, 0.2, 0.0],
                    distance: 1.2,
                    fov_deg: 50.0,
                },
            },
        );
        catalog.insert(
            "Valve_System",
            SurfaceDetails {
                id: "valve_system".into(),
                name: "Valve system".into(),
                description: "Intake and exhaust valves. Meters fuel delivery \
                              and exhaust flow."
                    .into(),
                group: "engine".into(),
                importance: Importance::Medium,
                camera: FocusTarget {
                    target_offset: [0.0, 0.15, 0.0],
                    distance: 1.0,
                    fov_deg: 55.0,
                },
            },
        );
        catalog.insert(
            "Gear_Assembly",
            SurfaceDetails {
                id: "gear_assembly".into(),
                name: "Gear assembly".into(),
                description: "Gear train transferring torque between \
                              components."
                    .into(),
                group: "transmission".into(),
                importance: Importance::High,
                camera: FocusTarget {
                    target_offset: [0.0, 0.1, 0.0],
                    distance: 0.8,
                    fov_deg: 60.0,
                },
            },
        );
        catalog.insert(
            "Cooling_System",
            SurfaceDetails {
                id: "cooling_system".into(),
                name: "Cooling system".into(),
                description: "Radiator and water pump. Holds the working \
                              temperature in range."
                    .into(),
                group: "cooling".into(),
                importance: Importance::Medium,
                camera: FocusTarget {
                    target_offset: [0.0, 0.25, 0.0],
                    distance: 1.3,
                    fov_deg: 40.0,
                },
            },
        );

        catalog.insert_group(
            "engine",
            GroupInfo {
                name: "Engine".into(),
                color: Color::hex(0xff4444),
                description: "Primary power unit".into(),
            },
        );
        catalog.insert_group(
            "transmission",
            GroupInfo {
                name: "Transmission".into(),
                color: Color::hex(0x44ff44),
                description: "Power transfer system".into(),
            },
        );
        catalog.insert_group(
            "cooling",
            GroupInfo {
                name: "Cooling".into(),
                color: Color::hex(0x4444ff),
                description: "Thermal regulation system".into(),
            },
        );
        catalog.insert_group(
            "electrical",
            GroupInfo {
                name: "Electrical".into(),
                color: Color::hex(0xffff44),
                description: "Electronic control system".into(),
            },
        );

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_engine_casing() {
        let catalog = SurfaceCatalog::builtin();
        let details = catalog.details_for("Engine_Casing");
        assert_eq!(details.importance, Importance::High);
        assert!((details.camera.distance - 1.5).abs() < 1e-6);
        assert!((details.camera.fov_deg - 45.0).abs() < 1e-6);
        assert_eq!(details.camera.target_offset[1], 0.3);
    }

    #[test]
    fn unknown_surface_gets_humanized_fallback() {
        let catalog = SurfaceCatalog::builtin();
        let details = catalog.details_for("Spark_Plug_Left");
        assert_eq!(details.name, "Spark Plug Left");
        assert_eq!(details.group, "unknown");
        assert_eq!(details.importance, Importance::Low);
        let camera = details.camera;
        assert!((camera.distance - 1.0).abs() < 1e-6);
        assert!((camera.fov_deg - 50.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_group_gets_fallback() {
        let catalog = SurfaceCatalog::builtin();
        let info = catalog.group_info("hydraulics");
        assert_eq!(info.name, "Unknown group");
    }

    #[test]
    fn catalog_loads_from_json() {
        let json = r##"{
            "entries": {
                "Rotor": {
                    "id": "rotor",
                    "name": "Rotor",
                    "description": "Spinning part",
                    "group": "engine",
                    "importance": "critical",
                    "camera": { "target_offset": [0.0, 0.1, 0.0], "distance": 2.0, "fov_deg": 35.0 }
                }
            },
            "groups": {}
        }"##;
        let catalog = SurfaceCatalog::from_json(json).unwrap();
        let details = catalog.details_for("Rotor");
        assert_eq!(details.importance, Importance::Critical);
        assert!((details.camera.fov_deg - 35.0).abs() < 1e-6);
    }
}
