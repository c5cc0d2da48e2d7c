//! Pointer-to-surface picking.
//!
//! Converts a pointer position into a camera ray and resolves the nearest
//! intersected visible surface. Picking is a pure query: it never mutates
//! the scene or any emphasis state; that is the selection coordinator's job.

use crate::scene::camera::{Camera, Viewport};
use crate::scene::{SceneGraph, Surface, SurfaceId};
use glam::{Vec2, Vec3};

/// Pointer position in window pixels, top-left origin (same space as
/// [`Viewport`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Outcome of one pick. Transient; produced per pointer event and not
/// retained.
#[derive(Debug, Clone, Copy)]
pub struct PickResult {
    pub surface: Option<SurfaceId>,
    pub world_point: Option<Vec3>,
    pub distance: f32,
    pub surface_uv: Option<Vec2>,
}

impl PickResult {
    /// The "nothing hit" result. Not an error.
    pub fn miss() -> Self {
        Self {
            surface: None,
            world_point: None,
            distance: f32::INFINITY,
            surface_uv: None,
        }
    }

    pub fn is_miss(&self) -> bool {
        self.surface.is_none()
    }
}

/// Invalid-input conditions. These are integration errors, not runtime
/// conditions to recover from; "nothing hit" is never an error.
#[derive(Debug, thiserror::Error)]
pub enum PickError {
    #[error("viewport has degenerate size {width}x{height}")]
    DegenerateViewport { width: f32, height: f32 },
    #[error("camera field of view {0} is outside (0, 180)")]
    InvalidFov(f32),
    #[error("camera pose contains non-finite values")]
    NonFiniteCamera,
}

/// Pick the nearest visible surface under the pointer.
pub fn pick(
    scene: &SceneGraph,
    camera: &Camera,
    viewport: Viewport,
    pointer: PointerPosition,
) -> Result<PickResult, PickError> {
    pick_filtered(scene, camera, viewport, pointer, |_| true)
}

/// Like [`pick`], with a candidate pre-filter. Surfaces failing the filter
/// are never ray-tested. Ties in distance resolve to the first surface in
/// traversal order.
pub fn pick_filtered(
    scene: &SceneGraph,
    camera: &Camera,
    viewport: Viewport,
    pointer: PointerPosition,
    filter: impl Fn(&Surface) -> bool,
) -> Result<PickResult, PickError> {
    if !(viewport.width > 0.0 && viewport.height > 0.0) {
        return Err(PickError::DegenerateViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    if !(camera.fov_deg > 0.0 && camera.fov_deg < 180.0) {
        return Err(PickError::InvalidFov(camera.fov_deg));
    }
    if !camera.pose().is_finite() {
        return Err(PickError::NonFiniteCamera);
    }

    let ndc = viewport.to_ndc(pointer.x, pointer.y);
    let (origin, dir) = camera.ndc_ray(ndc, viewport.aspect());
    if dir == Vec3::ZERO {
        return Err(PickError::NonFiniteCamera);
    }

    let mut best = PickResult::miss();
    for surface in scene.surfaces() {
        if !surface.visible || !filter(surface) {
            continue;
        }
        if let Some(hit) = surface.geometry.intersect_ray(&surface.transform, origin, dir) {
            // Strictly-less keeps the first surface in traversal order on
            // an exact tie.
            if hit.distance < best.distance {
                best = PickResult {
                    surface: Some(surface.id()),
                    world_point: Some(hit.point),
                    distance: hit.distance,
                    surface_uv: hit.uv,
                };
            }
        }
    }
    Ok(best)
}
