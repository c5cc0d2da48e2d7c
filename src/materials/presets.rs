//! Named material preset registry.
//!
//! Presets are declarative [`MaterialSpec`]s; building one yields a fresh
//! [`Material`] with family defaults overridden by the spec's parameters.
//! The registry is read-only at runtime and lookup misses degrade to a
//! neutral material rather than failing.

use crate::scene::{Color, Material, MaterialKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Optional parameter overrides for a material build. Unset fields keep the
/// family default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialParams {
    pub color: Option<Color>,
    pub emissive: Option<Color>,
    pub emissive_intensity: Option<f32>,
    pub roughness: Option<f32>,
    pub metalness: Option<f32>,
    pub transmission: Option<f32>,
    pub thickness: Option<f32>,
    pub ior: Option<f32>,
    pub clearcoat: Option<f32>,
    pub clearcoat_roughness: Option<f32>,
    pub sheen: Option<f32>,
    pub sheen_roughness: Option<f32>,
    pub sheen_color: Option<Color>,
    pub specular_intensity: Option<f32>,
    pub env_map_intensity: Option<f32>,
    pub opacity: Option<f32>,
    pub transparent: Option<bool>,
    pub wireframe: Option<bool>,
    pub double_sided: Option<bool>,
}

impl MaterialParams {
    /// Overlay `other` on top of self: set fields in `other` win.
    pub fn merged_with(&self, other: &MaterialParams) -> MaterialParams {
        macro_rules! pick {
            ($field:ident) => {
                other.$field.clone().or_else(|| self.$field.clone())
            };
        }
        MaterialParams {
            color: pick!(color),
            emissive: pick!(emissive),
            emissive_intensity: pick!(emissive_intensity),
            roughness: pick!(roughness),
            metalness: pick!(metalness),
            transmission: pick!(transmission),
            thickness: pick!(thickness),
            ior: pick!(ior),
            clearcoat: pick!(clearcoat),
            clearcoat_roughness: pick!(clearcoat_roughness),
            sheen: pick!(sheen),
            sheen_roughness: pick!(sheen_roughness),
            sheen_color: pick!(sheen_color),
            specular_intensity: pick!(specular_intensity),
            env_map_intensity: pick!(env_map_intensity),
            opacity: pick!(opacity),
            transparent: pick!(transparent),
            wireframe: pick!(wireframe),
            double_sided: pick!(double_sided),
        }
    }
}

/// Declarative description of a material: family plus parameter overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub kind: MaterialKind,
    #[serde(default)]
    pub params: MaterialParams,
}

impl MaterialSpec {
    pub fn new(kind: MaterialKind, params: MaterialParams) -> Self {
        Self { kind, params }
    }

    /// Build a concrete material. Deterministic: the same spec always yields
    /// the same material.
    pub fn build(&self) -> Material {
        let mut material = Material::default_for_kind(self.kind);
        let p = &self.params;
        if let Some(v) = p.color {
            material.color = v;
        }
        if let Some(v) = p.emissive {
            material.emissive = v;
        }
        if let Some(v) = p.emissive_intensity {
            material.emissive_intensity = v;
        }
        if let Some(v) = p.roughness {
            material.roughness = v;
        }
        if let Some(v) = p.metalness {
            material.metalness = v;
        }
        if let Some(v) = p.transmission {
            material.transmission = v;
        }
        if let Some(v) = p.thickness {
            material.thickness = v;
        }
        if let Some(v) = p.ior {
            material.ior = v;
        }
        if let Some(v) = p.clearcoat {
            material.clearcoat = v;
        }
        if let Some(v) = p.clearcoat_roughness {
            material.clearcoat_roughness = v;
        }
        if let Some(v) = p.sheen {
            material.sheen = v;
        }
        if let Some(v) = p.sheen_roughness {
            material.sheen_roughness = v;
        }
        if let Some(v) = p.sheen_color {
            material.sheen_color = v;
        }
        if let Some(v) = p.specular_intensity {
            material.specular_intensity = v;
        }
        if let Some(v) = p.env_map_intensity {
            material.env_map_intensity = v;
        }
        if let Some(v) = p.opacity {
            material.opacity = v;
        }
        if let Some(v) = p.transparent {
            material.transparent = v;
        }
        if let Some(v) = p.wireframe {
            material.wireframe = v;
        }
        if let Some(v) = p.double_sided {
            material.double_sided = v;
        }
        material
    }
}

/// Named, read-only preset registry. Lookup is exact (case-preserving);
/// the capitalized aliases of the common presets are registered explicitly.
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: HashMap<String, MaterialSpec>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: MaterialSpec) {
        self.presets.insert(name.into(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&MaterialSpec> {
        self.presets.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the named preset, or the neutral fallback when the name is
    /// unknown (logged, never an error: substitution must not block
    /// rendering).
    pub fn build(&self, name: &str) -> Material {
        match self.presets.get(name) {
            Some(spec) => spec.build(),
            None => {
                log::warn!("material preset {name:?} not found, using neutral fallback");
                Material::neutral()
            }
        }
    }

    /// The built-in preset library.
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        let standard = |params: MaterialParams| MaterialSpec::new(MaterialKind::Standard, params);
        let physical = |params: MaterialParams| MaterialSpec::new(MaterialKind::Physical, params);
        let basic = |params: MaterialParams| MaterialSpec::new(MaterialKind::Basic, params);

        registry.insert(
            "plastic",
            standard(MaterialParams {
                color: Some(Color::hex(0xffffff)),
                roughness: Some(0.3),
                metalness: Some(0.0),
                env_map_intensity: Some(1.0),
                ..Default::default()
            }),
        );
        registry.insert(
            "rubber",
            standard(MaterialParams {
                color: Some(Color::hex(0x222222)),
                roughness: Some(0.9),
                metalness: Some(0.0),
                ..Default::default()
            }),
        );
        registry.insert(
            "metal",
            standard(MaterialParams {
                color: Some(Color::hex(0xaaaaaa)),
                roughness: Some(0.1),
                metalness: Some(1.0),
                env_map_intensity: Some(1.5),
                ..Default::default()
            }),
        );
        registry.insert(
            "gold",
            standard(MaterialParams {
                color: Some(Color::hex(0xffd700)),
                roughness: Some(0.1),
                metalness: Some(1.0),
                env_map_intensity: Some(1.5),
                ..Default::default()
            }),
        );
        registry.insert(
            "chrome",
            standard(MaterialParams {
                color: Some(Color::hex(0xcccccc)),
                roughness: Some(0.05),
                metalness: Some(1.0),
                env_map_intensity: Some(2.0),
                ..Default::default()
            }),
        );
        registry.insert(
            "emissive",
            standard(MaterialParams {
                color: Some(Color::hex(0xffffff)),
                emissive: Some(Color::hex(0xff4444)),
                emissive_intensity: Some(1.0),
                ..Default::default()
            }),
        );
        registry.insert(
            "matte",
            standard(MaterialParams {
                color: Some(Color::hex(0x888888)),
                roughness: Some(1.0),
                metalness: Some(0.0),
                ..Default::default()
            }),
        );

        registry.insert(
            "glass",
            physical(MaterialParams {
                color: Some(Color::hex(0xffffff)),
                roughness: Some(0.0),
                transmission: Some(1.0),
                thickness: Some(0.1),
                ior: Some(1.5),
                specular_intensity: Some(1.0),
                transparent: Some(true),
                double_sided: Some(true),
                ..Default::default()
            }),
        );
        registry.insert(
            "water",
            physical(MaterialParams {
                color: Some(Color::hex(0x88aaff)),
                roughness: Some(0.0),
                transmission: Some(0.8),
                thickness: Some(0.5),
                ior: Some(1.33),
                transparent: Some(true),
                ..Default::default()
            }),
        );
        registry.insert(
            "diamond",
            physical(MaterialParams {
                color: Some(Color::hex(0xffffff)),
                roughness: Some(0.0),
                transmission: Some(0.9),
                thickness: Some(0.3),
                ior: Some(2.42),
                specular_intensity: Some(2.0),
                transparent: Some(true),
                ..Default::default()
            }),
        );
        registry.insert(
            "acrylic",
            physical(MaterialParams {
                color: Some(Color::hex(0xffffff)),
                roughness: Some(0.1),
                transmission: Some(0.5),
                thickness: Some(0.2),
                ior: Some(1.49),
                clearcoat: Some(0.5),
                clearcoat_roughness: Some(0.1),
                ..Default::default()
            }),
        );
        registry.insert(
            "car_paint",
            physical(MaterialParams {
                color: Some(Color::hex(0xff0000)),
                roughness: Some(0.2),
                metalness: Some(0.0),
                clearcoat: Some(1.0),
                clearcoat_roughness: Some(0.1),
                sheen: Some(0.5),
                sheen_roughness: Some(0.1),
                sheen_color: Some(Color::hex(0xffffff)),
                ..Default::default()
            }),
        );
        registry.insert(
            "ceramic",
            physical(MaterialParams {
                color: Some(Color::hex(0xffffff)),
                roughness: Some(0.0),
                metalness: Some(0.0),
                clearcoat: Some(0.8),
                clearcoat_roughness: Some(0.1),
                ..Default::default()
            }),
        );
        registry.insert(
            "velvet",
            physical(MaterialParams {
                color: Some(Color::hex(0x440044)),
                roughness: Some(0.8),
                metalness: Some(0.0),
                sheen: Some(1.0),
                sheen_roughness: Some(0.2),
                sheen_color: Some(Color::hex(0xff44ff)),
                ..Default::default()
            }),
        );
        registry.insert(
            "scratched_metal",
            standard(MaterialParams {
                color: Some(Color::hex(0x888888)),
                roughness: Some(0.4),
                metalness: Some(1.0),
                env_map_intensity: Some(1.2),
                ..Default::default()
            }),
        );
        registry.insert(
            "fabric",
            physical(MaterialParams {
                color: Some(Color::hex(0x553322)),
                roughness: Some(0.9),
                metalness: Some(0.0),
                sheen: Some(0.5),
                sheen_roughness: Some(0.5),
                ..Default::default()
            }),
        );

        registry.insert(
            "wireframe",
            basic(MaterialParams {
                color: Some(Color::hex(0xffffff)),
                wireframe: Some(true),
                transparent: Some(true),
                opacity: Some(0.5),
                ..Default::default()
            }),
        );
        registry.insert(
            "invisible",
            basic(MaterialParams {
                transparent: Some(true),
                opacity: Some(0.0),
                ..Default::default()
            }),
        );
        registry.insert(
            "solid_color",
            basic(MaterialParams {
                color: Some(Color::hex(0xff0000)),
                ..Default::default()
            }),
        );

        // Capitalized aliases kept for authoring convenience.
        for (alias, source) in [
            ("Glass", "glass"),
            ("Metal", "metal"),
            ("Plastic", "plastic"),
            ("Rubber", "rubber"),
            ("Chrome", "chrome"),
            ("Gold", "gold"),
            ("Water", "water"),
            ("Diamond", "diamond"),
            ("CarPaint", "car_paint"),
            ("Ceramic", "ceramic"),
            ("Velvet", "velvet"),
        ] {
            if let Some(spec) = registry.presets.get(source).cloned() {
                registry.presets.insert(alias.to_string(), spec);
            }
        }

        registry
    }
}
