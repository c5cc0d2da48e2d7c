//! Scene-graph primitives: surfaces, geometry, and materials.
//!
//! The scene is an arena of [`Surface`]s owned by the host's asset loader.
//! This crate never creates or destroys surfaces at runtime; it only mutates
//! their material and appearance fields. Traversal order is insertion order
//! and is the tie-breaking order for picking.

pub mod camera;
pub mod controls;

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Stable handle for a surface in the scene arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u32);

impl SurfaceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ========================================================================
// Color
// ========================================================================

/// Linear RGB color. Preset tables are authored in `#rrggbb` hex, so the
/// serde form accepts either a hex string or a `[f32; 3]` triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0]);

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn hex(rgb: u32) -> Self {
        Self([
            ((rgb >> 16) & 0xFF) as f32 / 255.0,
            ((rgb >> 8) & 0xFF) as f32 / 255.0,
            (rgb & 0xFF) as f32 / 255.0,
        ])
    }

    /// Parse a `"#rrggbb"` string (leading `#` optional).
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 {
            return None;
        }
        let packed = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::hex(packed))
    }

    pub fn to_hex_string(self) -> String {
        let quantize = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        format!(
            "#{:02x}{:02x}{:02x}",
            quantize(self.0[0]),
            quantize(self.0[1]),
            quantize(self.0[2])
        )
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Rgb([f32; 3]),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Hex(text) => Color::from_hex(&text)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color {text:?}"))),
            Repr::Rgb(rgb) => Ok(Color(rgb)),
        }
    }
}

// ========================================================================
// Textures
// ========================================================================

/// Cheap handle to a texture owned by the host's asset loader. Cloning the
/// handle shares the same underlying source, so substitution can carry maps
/// forward without touching texel data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRef(Arc<str>);

impl TextureRef {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self(source.into())
    }

    pub fn source(&self) -> &str {
        &self.0
    }
}

/// The texture slots substitution must preserve across a material swap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureMaps {
    pub diffuse: Option<TextureRef>,
    pub normal: Option<TextureRef>,
    pub roughness: Option<TextureRef>,
    pub metalness: Option<TextureRef>,
    pub ambient_occlusion: Option<TextureRef>,
    pub emissive: Option<TextureRef>,
}

impl TextureMaps {
    /// Copy every bound map of `other` into the matching empty-or-not slot.
    /// Unbound slots in `other` are left as-is.
    pub fn carry_from(&mut self, other: &TextureMaps) {
        let slots = [
            (&mut self.diffuse, &other.diffuse),
            (&mut self.normal, &other.normal),
            (&mut self.roughness, &other.roughness),
            (&mut self.metalness, &other.metalness),
            (&mut self.ambient_occlusion, &other.ambient_occlusion),
            (&mut self.emissive, &other.emissive),
        ];
        for (dst, src) in slots {
            if let Some(map) = src {
                *dst = Some(map.clone());
            }
        }
    }
}

// ========================================================================
// Material
// ========================================================================

/// Rendering model of a material, mirroring the three families the preset
/// registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Standard,
    Physical,
    Basic,
}

/// Full material state of a surface. Comparison is field-for-field, which is
/// what makes substitution reversibility checkable.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub kind: MaterialKind,
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub transmission: f32,
    pub thickness: f32,
    pub ior: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub sheen: f32,
    pub sheen_roughness: f32,
    pub sheen_color: Color,
    pub specular_intensity: f32,
    pub env_map_intensity: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub double_sided: bool,
    pub maps: TextureMaps,
}

impl Material {
    /// Family defaults: white, fully rough, dielectric.
    pub fn default_for_kind(kind: MaterialKind) -> Self {
        Self {
            name: String::new(),
            kind,
            color: Color::WHITE,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            roughness: 1.0,
            metalness: 0.0,
            transmission: 0.0,
            thickness: 0.0,
            ior: 1.5,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            sheen: 0.0,
            sheen_roughness: 0.0,
            sheen_color: Color::WHITE,
            specular_intensity: 1.0,
            env_map_intensity: 1.0,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            double_sided: false,
            maps: TextureMaps::default(),
        }
    }

    /// The neutral gray fallback used when a preset lookup misses.
    pub fn neutral() -> Self {
        Self {
            color: Color::hex(0x888888),
            ..Self::default_for_kind(MaterialKind::Standard)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::default_for_kind(MaterialKind::Standard)
    }
}

// ========================================================================
// Geometry
// ========================================================================

/// Triangle-list geometry in surface-local space. UVs are optional; when
/// present they must be per-vertex.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub triangles: Vec<[u32; 3]>,
}

/// One ray-geometry intersection, in world space.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    pub uv: Option<Vec2>,
}

const RAY_EPSILON: f32 = 1e-6;

impl Geometry {
    pub fn new(positions: Vec<Vec3>, uvs: Vec<Vec2>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            uvs,
            triangles,
        }
    }

    /// Unit quad in the XY plane facing +Z, centered at the origin.
    pub fn quad(half_extent: f32) -> Self {
        let h = half_extent;
        Self {
            positions: vec![
                Vec3::new(-h, -h, 0.0),
                Vec3::new(h, -h, 0.0),
                Vec3::new(h, h, 0.0),
                Vec3::new(-h, h, 0.0),
            ],
            uvs: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    pub fn triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            positions: vec![a, b, c],
            uvs: Vec::new(),
            triangles: vec![[0, 1, 2]],
        }
    }

    /// Nearest intersection of a world-space ray with this geometry under
    /// `transform`. `dir` must be normalized so `distance` is in world units.
    pub fn intersect_ray(&self, transform: &Mat4, origin: Vec3, dir: Vec3) -> Option<RayHit> {
        let mut nearest: Option<(f32, f32, f32, [u32; 3])> = None;
        for tri in &self.triangles {
            let v0 = transform.transform_point3(self.positions[tri[0] as usize]);
            let v1 = transform.transform_point3(self.positions[tri[1] as usize]);
            let v2 = transform.transform_point3(self.positions[tri[2] as usize]);
            if let Some((t, u, v)) = ray_triangle(origin, dir, v0, v1, v2) {
                if nearest.map_or(true, |(best, ..)| t < best) {
                    nearest = Some((t, u, v, *tri));
                }
            }
        }
        nearest.map(|(t, u, v, tri)| {
            let uv = (self.uvs.len() == self.positions.len()).then(|| {
                let uv0 = self.uvs[tri[0] as usize];
                let uv1 = self.uvs[tri[1] as usize];
                let uv2 = self.uvs[tri[2] as usize];
                uv0 * (1.0 - u - v) + uv1 * u + uv2 * v
            });
            RayHit {
                distance: t,
                point: origin + dir * t,
                uv,
            }
        })
    }
}

/// Möller–Trumbore, double-sided. Returns `(t, u, v)` with barycentric
/// coordinates of the hit.
fn ray_triangle(origin: Vec3, dir: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<(f32, f32, f32)> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < RAY_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - v0;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t > RAY_EPSILON).then_some((t, u, v))
}

// ========================================================================
// Surface + arena
// ========================================================================

/// A single pickable/renderable primitive in the scene.
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    pub name: String,
    pub visible: bool,
    pub transform: Mat4,
    pub geometry: Geometry,
    pub material: Material,
}

impl Surface {
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// World-space origin of the surface (the transform's translation).
    pub fn world_position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }
}

/// Arena of surfaces. Insertion order is the traversal order.
#[derive(Debug, Default)]
pub struct SceneGraph {
    surfaces: Vec<Surface>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_surface(
        &mut self,
        name: impl Into<String>,
        geometry: Geometry,
        transform: Mat4,
        material: Material,
    ) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len() as u32);
        self.surfaces.push(Surface {
            id,
            name: name.into(),
            visible: true,
            transform,
            geometry,
            material,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.index())
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(id.index())
    }

    /// Surfaces in traversal order.
    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter()
    }

    pub fn surfaces_mut(&mut self) -> impl Iterator<Item = &mut Surface> {
        self.surfaces.iter_mut()
    }

    /// Recursive-descent equivalent for hosts that think in visitors.
    pub fn traverse(&self, mut visitor: impl FnMut(&Surface)) {
        for surface in &self.surfaces {
            visitor(surface);
        }
    }
}
