//! Declarative material substitution.
//!
//! Matches surfaces by name or pattern and swaps their material for one built
//! from a preset or ad-hoc spec, carrying forward any bound texture maps so a
//! swap never discards baked detail. Substitution is reversible through a
//! per-surface binding side table and never blocks rendering: lookup misses
//! and bad patterns degrade with a warning.

pub mod presets;

pub use presets::{MaterialParams, MaterialSpec, PresetRegistry};

use crate::scene::{Material, SceneGraph, SurfaceId};
use regex::RegexBuilder;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Which surfaces a substitution applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    All,
    /// Case-insensitive substring of the surface's material name.
    MaterialName(String),
    /// Case-insensitive substring of the surface's own name.
    SurfaceName(String),
    /// Regular expression tested (case-insensitively) against both names.
    /// An invalid expression is treated as matching nothing.
    Pattern(String),
    /// Matches no surface. The parse fallback for unrecognized prefixes.
    Nothing,
}

impl FromStr for TargetSelector {
    type Err = std::convert::Infallible;

    /// Parse the `"all" | "material:Name" | "mesh:Name" | "regex:expr"`
    /// authoring form. A bare name is a surface-name substring match; an
    /// unrecognized prefix matches nothing.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(match text.split_once(':') {
            None => {
                if text == "all" {
                    Self::All
                } else {
                    Self::SurfaceName(text.to_string())
                }
            }
            Some(("material", name)) => Self::MaterialName(name.to_string()),
            Some(("mesh", name)) => Self::SurfaceName(name.to_string()),
            Some(("regex", expr)) => Self::Pattern(expr.to_string()),
            Some((prefix, _)) => {
                log::warn!("unknown selector prefix {prefix:?}");
                Self::Nothing
            }
        })
    }
}

/// Per-surface memo of the material in place before the first substitution,
/// kept so substitution is reversible. Created once, cleared on restore,
/// never auto-expires.
#[derive(Debug, Clone)]
pub struct MaterialBinding {
    pub original: Material,
    pub original_name: String,
    pub applied_at_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Record a binding before the first mutation so `restore` can undo it.
    pub keep_original: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            keep_original: true,
        }
    }
}

/// Where the replacement material comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSource {
    Preset(String),
    Custom(MaterialSpec),
}

impl MaterialSource {
    fn label(&self) -> &str {
        match self {
            Self::Preset(name) => name,
            Self::Custom(_) => "custom",
        }
    }
}

enum CompiledSelector {
    All,
    MaterialName(String),
    SurfaceName(String),
    Regex(regex::Regex),
    Never,
}

impl CompiledSelector {
    fn matches(&self, surface_name: &str, material_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::MaterialName(needle) => material_name.to_lowercase().contains(needle),
            Self::SurfaceName(needle) => surface_name.to_lowercase().contains(needle),
            Self::Regex(re) => re.is_match(material_name) || re.is_match(surface_name),
            Self::Never => false,
        }
    }
}

/// The substitution engine and its binding side table.
#[derive(Debug)]
pub struct MaterialSubstitution {
    registry: PresetRegistry,
    bindings: HashMap<SurfaceId, MaterialBinding>,
}

impl MaterialSubstitution {
    pub fn new() -> Self {
        Self {
            registry: PresetRegistry::builtin(),
            bindings: HashMap::new(),
        }
    }

    pub fn with_registry(registry: PresetRegistry) -> Self {
        Self {
            registry,
            bindings: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &PresetRegistry {
        &self.registry
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn binding(&self, id: SurfaceId) -> Option<&MaterialBinding> {
        self.bindings.get(&id)
    }

    /// Apply a material to every surface the selector matches. Returns the
    /// number of surfaces rewritten. Idempotent with respect to bindings:
    /// re-applying never stacks a second binding, so `restore` always puts
    /// back the true original.
    pub fn apply(
        &mut self,
        scene: &mut SceneGraph,
        selector: &TargetSelector,
        source: &MaterialSource,
        options: ApplyOptions,
    ) -> usize {
        let compiled = match selector {
            TargetSelector::All => CompiledSelector::All,
            TargetSelector::MaterialName(needle) => {
                CompiledSelector::MaterialName(needle.to_lowercase())
            }
            TargetSelector::SurfaceName(needle) => {
                CompiledSelector::SurfaceName(needle.to_lowercase())
            }
            TargetSelector::Pattern(expr) => {
                match RegexBuilder::new(expr).case_insensitive(true).build() {
                    Ok(re) => CompiledSelector::Regex(re),
                    Err(err) => {
                        log::warn!("invalid selector pattern {expr:?}: {err}");
                        CompiledSelector::Never
                    }
                }
            }
            TargetSelector::Nothing => CompiledSelector::Never,
        };

        let applied_at_ms = unix_millis();
        let label = source.label();
        let mut applied = 0usize;

        let target_ids: Vec<SurfaceId> = scene
            .surfaces()
            .filter(|surface| compiled.matches(&surface.name, &surface.material.name))
            .map(|surface| surface.id())
            .collect();

        for id in target_ids {
            let Some(surface) = scene.surface_mut(id) else {
                continue;
            };
            if options.keep_original && !self.bindings.contains_key(&id) {
                self.bindings.insert(
                    id,
                    MaterialBinding {
                        original: surface.material.clone(),
                        original_name: surface.material.name.clone(),
                        applied_at_ms,
                    },
                );
            }

            let mut replacement = match source {
                MaterialSource::Preset(name) => self.registry.build(name),
                MaterialSource::Custom(spec) => spec.build(),
            };
            replacement.maps.carry_from(&surface.material.maps);
            replacement.name = format!("{}_{}", surface.name, label);
            surface.material = replacement;
            applied += 1;
        }

        log::debug!("material substitution applied to {applied} surface(s) as {label:?}");
        applied
    }

    /// Put back every recorded original material and clear the bindings.
    /// Returns the number of surfaces restored.
    pub fn restore(&mut self, scene: &mut SceneGraph) -> usize {
        let mut restored = 0usize;
        for (id, binding) in self.bindings.drain() {
            if let Some(surface) = scene.surface_mut(id) {
                surface.material = binding.original;
                surface.material.name = binding.original_name;
                restored += 1;
            }
        }
        log::debug!("material substitution restored {restored} surface(s)");
        restored
    }
}

impl Default for MaterialSubstitution {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Geometry, MaterialKind, TextureRef};
    use glam::Mat4;

    fn glass_metal_scene() -> (SceneGraph, SurfaceId, SurfaceId, SurfaceId) {
        let mut scene = SceneGraph::new();
        let mut glass = Material::default().with_name("Glass");
        glass.maps.normal = Some(TextureRef::new("normal.jpg"));
        glass.maps.roughness = Some(TextureRef::new("roughness.jpg"));
        let metal = Material::default().with_name("Metal");
        let glass_inner = Material::default().with_name("Glass_Inner");

        let a = scene.add_surface("Shell", Geometry::quad(1.0), Mat4::IDENTITY, glass);
        let b = scene.add_surface("Frame", Geometry::quad(1.0), Mat4::IDENTITY, metal);
        let c = scene.add_surface("Inlay", Geometry::quad(1.0), Mat4::IDENTITY, glass_inner);
        (scene, a, b, c)
    }

    #[test]
    fn material_substring_matches_case_insensitively() {
        let (mut scene, a, _b, c) = glass_metal_scene();
        let mut substitution = MaterialSubstitution::new();
        let selector: TargetSelector = "material:glass".parse().unwrap();
        let applied = substitution.apply(
            &mut scene,
            &selector,
            &MaterialSource::Preset("glass".into()),
            ApplyOptions::default(),
        );
        assert_eq!(applied, 2);
        assert_eq!(scene.surface(a).unwrap().material.kind, MaterialKind::Physical);
        assert_eq!(scene.surface(c).unwrap().material.kind, MaterialKind::Physical);
        // Texture maps survive the swap.
        assert_eq!(
            scene.surface(a).unwrap().material.maps.normal,
            Some(TextureRef::new("normal.jpg"))
        );
        assert_eq!(
            scene.surface(a).unwrap().material.maps.roughness,
            Some(TextureRef::new("roughness.jpg"))
        );
    }

    #[test]
    fn applied_material_is_tagged_with_surface_and_preset() {
        let (mut scene, _a, b, _c) = glass_metal_scene();
        let mut substitution = MaterialSubstitution::new();
        substitution.apply(
            &mut scene,
            &TargetSelector::SurfaceName("frame".into()),
            &MaterialSource::Preset("chrome".into()),
            ApplyOptions::default(),
        );
        assert_eq!(scene.surface(b).unwrap().material.name, "Frame_chrome");
    }

    #[test]
    fn apply_then_restore_is_field_for_field_identical() {
        let (mut scene, a, _b, _c) = glass_metal_scene();
        let before = scene.surface(a).unwrap().material.clone();
        let mut substitution = MaterialSubstitution::new();
        substitution.apply(
            &mut scene,
            &TargetSelector::All,
            &MaterialSource::Preset("gold".into()),
            ApplyOptions::default(),
        );
        assert_ne!(scene.surface(a).unwrap().material, before);
        let restored = substitution.restore(&mut scene);
        assert_eq!(restored, 3);
        assert_eq!(scene.surface(a).unwrap().material, before);
        assert_eq!(substitution.binding_count(), 0);
    }

    #[test]
    fn double_apply_keeps_one_binding_and_same_material() {
        let (mut scene, a, _b, _c) = glass_metal_scene();
        let original = scene.surface(a).unwrap().material.clone();
        let mut substitution = MaterialSubstitution::new();
        let selector = TargetSelector::All;
        let source = MaterialSource::Preset("metal".into());

        substitution.apply(&mut scene, &selector, &source, ApplyOptions::default());
        let after_first = scene.surface(a).unwrap().material.clone();
        substitution.apply(&mut scene, &selector, &source, ApplyOptions::default());
        let after_second = scene.surface(a).unwrap().material.clone();

        assert_eq!(after_first, after_second);
        assert_eq!(substitution.binding_count(), 3);
        substitution.restore(&mut scene);
        assert_eq!(scene.surface(a).unwrap().material, original);
    }

    #[test]
    fn invalid_regex_matches_nothing() {
        let (mut scene, _a, _b, _c) = glass_metal_scene();
        let mut substitution = MaterialSubstitution::new();
        let applied = substitution.apply(
            &mut scene,
            &TargetSelector::Pattern("[unclosed".into()),
            &MaterialSource::Preset("glass".into()),
            ApplyOptions::default(),
        );
        assert_eq!(applied, 0);
        assert_eq!(substitution.binding_count(), 0);
    }

    #[test]
    fn regex_matches_either_name() {
        let (mut scene, a, _b, c) = glass_metal_scene();
        let mut substitution = MaterialSubstitution::new();
        let applied = substitution.apply(
            &mut scene,
            &TargetSelector::Pattern("^(shell|glass_inner)$".into()),
            &MaterialSource::Preset("ceramic".into()),
            ApplyOptions::default(),
        );
        // "Shell" by surface name, "Glass_Inner" by material name.
        assert_eq!(applied, 2);
        assert!(substitution.binding(a).is_some());
        assert!(substitution.binding(c).is_some());
    }

    #[test]
    fn unknown_preset_yields_neutral_material_without_failing() {
        let (mut scene, a, _b, _c) = glass_metal_scene();
        let mut substitution = MaterialSubstitution::new();
        let applied = substitution.apply(
            &mut scene,
            &TargetSelector::SurfaceName("shell".into()),
            &MaterialSource::Preset("unobtainium".into()),
            ApplyOptions::default(),
        );
        assert_eq!(applied, 1);
        let material = &scene.surface(a).unwrap().material;
        assert_eq!(material.color, Material::neutral().color);
        assert_eq!(material.name, "Shell_unobtainium");
    }

    #[test]
    fn keep_original_false_records_no_binding() {
        let (mut scene, _a, _b, _c) = glass_metal_scene();
        let mut substitution = MaterialSubstitution::new();
        substitution.apply(
            &mut scene,
            &TargetSelector::All,
            &MaterialSource::Preset("matte".into()),
            ApplyOptions {
                keep_original: false,
            },
        );
        assert_eq!(substitution.binding_count(), 0);
        assert_eq!(substitution.restore(&mut scene), 0);
    }

    #[test]
    fn selector_parses_authoring_strings() {
        assert_eq!("all".parse::<TargetSelector>().unwrap(), TargetSelector::All);
        assert_eq!(
            "material:Glass".parse::<TargetSelector>().unwrap(),
            TargetSelector::MaterialName("Glass".into())
        );
        assert_eq!(
            "mesh:Engine_Casing".parse::<TargetSelector>().unwrap(),
            TargetSelector::SurfaceName("Engine_Casing".into())
        );
        assert_eq!(
            "regex:^Valve.*".parse::<TargetSelector>().unwrap(),
            TargetSelector::Pattern("^Valve.*".into())
        );
    }

    #[test]
    fn unknown_selector_prefix_matches_nothing() {
        let (mut scene, _a, _b, _c) = glass_metal_scene();
        let selector: TargetSelector = "texture:glass".parse().unwrap();
        assert_eq!(selector, TargetSelector::Nothing);

        let mut substitution = MaterialSubstitution::new();
        let applied = substitution.apply(
            &mut scene,
            &selector,
            &MaterialSource::Preset("glass".into()),
            ApplyOptions::default(),
        );
        assert_eq!(applied, 0);
        assert_eq!(substitution.binding_count(), 0);
    }

    #[test]
    fn custom_spec_source_applies_ad_hoc_material() {
        let (mut scene, a, _b, _c) = glass_metal_scene();
        let mut substitution = MaterialSubstitution::new();
        let spec = MaterialSpec::new(
            MaterialKind::Physical,
            MaterialParams {
                transmission: Some(0.98),
                thickness: Some(0.125),
                roughness: Some(0.1),
                ior: Some(1.45),
                clearcoat: Some(0.8),
                clearcoat_roughness: Some(0.4),
                ..Default::default()
            },
        );
        substitution.apply(
            &mut scene,
            &TargetSelector::SurfaceName("shell".into()),
            &MaterialSource::Custom(spec),
            ApplyOptions::default(),
        );
        let material = &scene.surface(a).unwrap().material;
        assert!((material.transmission - 0.98).abs() < 1e-6);
        assert_eq!(material.name, "Shell_custom");
    }
}
