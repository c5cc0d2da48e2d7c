//! Viewpoint state and viewport math shared by picking, highlighting, and
//! camera choreography.

use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Rectangle of the rendering surface in window pixels, top-left origin.
/// Pointer coordinates are remapped against this rectangle, not the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Pixel position to normalized device coordinates, x/y in [-1, 1] with
    /// +y up.
    pub fn to_ndc(&self, px: f32, py: f32) -> Vec2 {
        Vec2::new(
            ((px - self.x) / self.width) * 2.0 - 1.0,
            -(((py - self.y) / self.height) * 2.0 - 1.0),
        )
    }
}

/// Position, look-at target, and field of view. The atom the choreographer
/// interpolates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_deg: f32,
}

impl CameraPose {
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.target.is_finite() && self.fov_deg.is_finite()
    }
}

/// Perspective look-at camera. `zoom` is a host-level scale carried through
/// saved poses; the projection itself uses `fov_deg`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_deg: f32,
    pub zoom: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, fov_deg: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_deg,
            zoom: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            target: self.target,
            fov_deg: self.fov_deg,
        }
    }

    pub fn apply_pose(&mut self, pose: &CameraPose) {
        self.position = pose.position;
        self.target = pose.target;
        self.fov_deg = pose.fov_deg;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), aspect.max(1e-6), self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// World-space ray through the given NDC point. The direction is
    /// normalized, so intersection distances come out in world units.
    pub fn ndc_ray(&self, ndc: Vec2, aspect: f32) -> (Vec3, Vec3) {
        let inverse = self.view_projection(aspect).inverse();
        // perspective_rh maps the far plane to clip depth 1.
        let far_point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let dir = (far_point - self.position).normalize_or_zero();
        (self.position, dir)
    }

    /// Project a world point into viewport pixel coordinates (top-left
    /// origin). `None` when the point is behind the camera.
    pub fn world_to_viewport(&self, point: Vec3, viewport: Viewport) -> Option<Vec2> {
        let clip = self.view_projection(viewport.aspect()) * Vec4::from((point, 1.0));
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            viewport.x + (ndc.x * 0.5 + 0.5) * viewport.width,
            viewport.y + (-ndc.y * 0.5 + 0.5) * viewport.height,
        ))
    }
}
