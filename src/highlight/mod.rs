//! Transient visual emphasis for hovered and selected surfaces.
//!
//! Applies color/emissive tints and reverts them exactly, with the captured
//! original appearance keyed per surface in a side table (never stored on the
//! surfaces themselves). Capture always reads the material's current state,
//! so highlighting composes correctly with material substitution.

use crate::scene::camera::{Camera, Viewport};
use crate::scene::{Color, SceneGraph, SurfaceId};
use glam::Vec2;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tint {
    color: Color,
    emissive: Color,
    emissive_intensity: f32,
}

const SELECTED_TINT: Tint = Tint {
    color: Color([0.0, 1.0, 0.0]),
    emissive: Color([0.0, 0.2, 0.0]),
    emissive_intensity: 0.3,
};

const HOVER_TINT: Tint = Tint {
    color: Color([1.0, 1.0, 0.0]),
    emissive: Color([0.2, 0.2, 0.0]),
    emissive_intensity: 0.2,
};

#[derive(Debug, Clone, Copy)]
struct CapturedAppearance {
    color: Color,
    emissive: Color,
    emissive_intensity: f32,
}

/// Screen-space anchor for the floating label near the hovered surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelAnchor {
    pub surface: SurfaceId,
    /// Viewport pixel coordinates, top-left origin.
    pub x: f32,
    pub y: f32,
}

/// Applies and reverts hover/selection tints in response to selection-state
/// changes.
#[derive(Debug, Default)]
pub struct HighlightPresenter {
    captured: HashMap<SurfaceId, CapturedAppearance>,
    applied: HashMap<SurfaceId, Tint>,
}

impl HighlightPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile tints with the current hover/selection. The selected tint
    /// takes precedence when the same surface is both hovered and selected.
    pub fn sync(
        &mut self,
        scene: &mut SceneGraph,
        hovered: Option<SurfaceId>,
        selected: Option<SurfaceId>,
    ) {
        let mut desired: HashMap<SurfaceId, Tint> = HashMap::new();
        if let Some(id) = selected {
            desired.insert(id, SELECTED_TINT);
        }
        if let Some(id) = hovered {
            desired.entry(id).or_insert(HOVER_TINT);
        }

        // Revert surfaces whose tint is no longer wanted.
        let stale: Vec<SurfaceId> = self
            .applied
            .keys()
            .filter(|id| !desired.contains_key(id))
            .copied()
            .collect();
        for id in stale {
            self.revert(scene, id);
        }

        for (id, tint) in desired {
            if self.applied.get(&id) == Some(&tint) {
                continue;
            }
            let Some(surface) = scene.surface_mut(id) else {
                continue;
            };
            // Capture once per surface; the original survives a
            // hover-to-selected promotion.
            self.captured.entry(id).or_insert(CapturedAppearance {
                color: surface.material.color,
                emissive: surface.material.emissive,
                emissive_intensity: surface.material.emissive_intensity,
            });
            surface.material.color = tint.color;
            surface.material.emissive = tint.emissive;
            surface.material.emissive_intensity = tint.emissive_intensity;
            self.applied.insert(id, tint);
        }
    }

    /// Revert every applied tint.
    pub fn clear(&mut self, scene: &mut SceneGraph) {
        let tinted: Vec<SurfaceId> = self.applied.keys().copied().collect();
        for id in tinted {
            self.revert(scene, id);
        }
    }

    fn revert(&mut self, scene: &mut SceneGraph, id: SurfaceId) {
        self.applied.remove(&id);
        if let Some(original) = self.captured.remove(&id) {
            if let Some(surface) = scene.surface_mut(id) {
                surface.material.color = original.color;
                surface.material.emissive = original.emissive;
                surface.material.emissive_intensity = original.emissive_intensity;
            }
        }
    }

    /// Where to anchor the floating label: the hovered surface's world
    /// position projected into viewport pixels. Hidden when nothing is
    /// hovered, when the hovered surface is the selected one, or when the
    /// surface is behind the camera.
    pub fn label_anchor(
        &self,
        scene: &SceneGraph,
        camera: &Camera,
        viewport: Viewport,
        hovered: Option<SurfaceId>,
        selected: Option<SurfaceId>,
    ) -> Option<LabelAnchor> {
        let id = hovered?;
        if Some(id) == selected {
            return None;
        }
        let surface = scene.surface(id)?;
        let pixel: Vec2 = camera.world_to_viewport(surface.world_position(), viewport)?;
        Some(LabelAnchor {
            surface: id,
            x: pixel.x,
            y: pixel.y,
        })
    }
}
