//! Orbit navigation controller, shared between the user and the camera
//! choreographer. The enable/disable toggle is the mutual-exclusion
//! mechanism.

use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitController {
    pub enabled: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_rotate: bool,
    pub target: Vec3,
    update_count: u64,
}

impl OrbitController {
    pub fn new(target: Vec3) -> Self {
        Self {
            enabled: true,
            enable_zoom: true,
            enable_pan: true,
            enable_rotate: true,
            target,
            update_count: 0,
        }
    }

    /// Toggle every interaction switch at once. Disabling also re-applies
    /// state immediately so the host stops processing input mid-gesture.
    pub fn set_all_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.enable_zoom = enabled;
        self.enable_pan = enabled;
        self.enable_rotate = enabled;
        if !enabled {
            self.update();
        }
    }

    pub fn update(&mut self) {
        self.update_count = self.update_count.wrapping_add(1);
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
