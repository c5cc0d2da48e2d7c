//! Camera choreography.
//!
//! A state machine that animates the viewpoint between the user-controlled
//! orbital view and a focused view locked onto a surface, suspending the
//! shared navigation controller for the span of every transition. Animation
//! is driven by `step(now_ms)` calls from the host's per-frame callback and
//! keyed to wall-clock time, so behavior is frame-rate independent.

pub mod transition;

pub use transition::{TransitionHandle, TransitionStatus};

use crate::config::SurfaceCatalog;
use crate::scene::camera::{Camera, CameraPose};
use crate::scene::controls::OrbitController;
use crate::scene::{SceneGraph, SurfaceId};
use glam::Vec3;
use transition::TransitionTask;

/// Default transition length.
pub const DEFAULT_TRANSITION_MS: f64 = 1200.0;
/// Field of view restored when returning to the orbital view.
pub const DEFAULT_RETURN_FOV_DEG: f32 = 60.0;

/// Fixed view direction the focused camera approaches a target from,
/// slightly above the horizontal.
fn focus_view_direction() -> Vec3 {
    Vec3::new(0.0, 0.2, 1.0).normalize()
}

/// Choreography states. `FocusedOrbital` keeps the logical focus target while
/// the user orbits freely; only an explicit close returns to `Orbital` proper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Orbital,
    Focusing,
    Focused,
    FocusedOrbital,
    Returning,
}

/// Camera and controller state captured before the first focus, restored by
/// `return_to_original_view`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedPose {
    pub position: Vec3,
    pub target: Vec3,
    pub zoom: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum FocusError {
    #[error("surface {0:?} is not in the scene")]
    UnknownSurface(SurfaceId),
    #[error("no saved pose to return to")]
    NothingToReturnTo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionGoal {
    Focus,
    Return,
}

struct ActiveTransition {
    task: TransitionTask,
    goal: TransitionGoal,
}

/// Owns the focus state machine and the single in-flight transition.
pub struct CameraChoreographer {
    state: FocusState,
    saved_pose: Option<SavedPose>,
    focused_surface: Option<SurfaceId>,
    active: Option<ActiveTransition>,
}

impl CameraChoreographer {
    pub fn new() -> Self {
        Self {
            state: FocusState::Orbital,
            saved_pose: None,
            focused_surface: None,
            active: None,
        }
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn saved_pose(&self) -> Option<SavedPose> {
        self.saved_pose
    }

    pub fn focused_surface(&self) -> Option<SurfaceId> {
        self.focused_surface
    }

    /// Whether the camera is logically locked onto a surface (any state but
    /// plain `Orbital`/`Returning`).
    pub fn is_camera_focused(&self) -> bool {
        matches!(
            self.state,
            FocusState::Focusing | FocusState::Focused | FocusState::FocusedOrbital
        )
    }

    /// Start animating toward the focus pose for `surface`. Cancels any
    /// in-flight transition first (last request wins), disables the shared
    /// controller for the span of the animation, and leaves it disabled once
    /// `Focused` until orbital release is requested explicitly.
    pub fn focus(
        &mut self,
        scene: &SceneGraph,
        camera: &Camera,
        controls: &mut OrbitController,
        catalog: &SurfaceCatalog,
        surface_id: SurfaceId,
        duration_ms: f64,
        now_ms: f64,
    ) -> Result<TransitionHandle, FocusError> {
        let surface = scene
            .surface(surface_id)
            .ok_or(FocusError::UnknownSurface(surface_id))?;

        self.cancel_active();

        // Captured once only, on the first focus out of the orbital view, so
        // chained focuses keep the true original.
        if self.saved_pose.is_none() {
            self.saved_pose = Some(SavedPose {
                position: camera.position,
                target: controls.target,
                zoom: camera.zoom,
            });
        }

        let focus_target = catalog.focus_target_for(&surface.name);
        let target_point = surface.world_position() + Vec3::from(focus_target.target_offset);
        let end = CameraPose {
            position: target_point + focus_view_direction() * focus_target.distance,
            target: target_point,
            fov_deg: focus_target.fov_deg,
        };
        let start = CameraPose {
            position: camera.position,
            target: controls.target,
            fov_deg: camera.fov_deg,
        };

        controls.set_all_enabled(false);
        let (task, handle) = TransitionTask::new(start, end, now_ms, duration_ms);
        self.active = Some(ActiveTransition {
            task,
            goal: TransitionGoal::Focus,
        });
        self.focused_surface = Some(surface_id);
        self.state = FocusState::Focusing;
        log::debug!(
            "focusing on {:?} over {duration_ms} ms (fov {} deg)",
            surface.name,
            focus_target.fov_deg
        );
        Ok(handle)
    }

    /// Re-enable the navigation controller while keeping the logical focus
    /// target. No pose change; an in-flight animation is cancelled.
    pub fn switch_to_orbital_mode(&mut self, controls: &mut OrbitController) {
        self.cancel_active();
        controls.set_all_enabled(true);
        self.state = match self.state {
            FocusState::Focusing | FocusState::Focused | FocusState::FocusedOrbital => {
                FocusState::FocusedOrbital
            }
            FocusState::Orbital | FocusState::Returning => FocusState::Orbital,
        };
        log::debug!("orbital mode released, state {:?}", self.state);
    }

    /// Animate back to the saved pre-focus pose, restoring the default field
    /// of view. Controls stay disabled during the transition and are
    /// re-enabled on completion, when the saved pose is also cleared.
    pub fn return_to_original_view(
        &mut self,
        camera: &Camera,
        controls: &mut OrbitController,
        duration_ms: f64,
        now_ms: f64,
    ) -> Result<TransitionHandle, FocusError> {
        let saved = self.saved_pose.ok_or(FocusError::NothingToReturnTo)?;
        self.cancel_active();

        let start = CameraPose {
            position: camera.position,
            target: controls.target,
            fov_deg: camera.fov_deg,
        };
        let end = CameraPose {
            position: saved.position,
            target: saved.target,
            fov_deg: DEFAULT_RETURN_FOV_DEG,
        };

        controls.set_all_enabled(false);
        let (task, handle) = TransitionTask::new(start, end, now_ms, duration_ms);
        self.active = Some(ActiveTransition {
            task,
            goal: TransitionGoal::Return,
        });
        self.state = FocusState::Returning;
        log::debug!("returning to original view over {duration_ms} ms");
        Ok(handle)
    }

    /// Advance the in-flight transition to wall-clock time `now_ms`,
    /// applying the interpolated pose to the camera and the controller
    /// target. A non-finite pose fails the transition and force-restores the
    /// controller so the UI can never end up stuck disabled.
    pub fn step(&mut self, camera: &mut Camera, controls: &mut OrbitController, now_ms: f64) {
        let (pose, done) = match &self.active {
            Some(active) => (
                active.task.pose_at(now_ms),
                active.task.progress(now_ms) >= 1.0,
            ),
            None => return,
        };

        if !pose.is_finite() {
            log::warn!("camera transition produced a non-finite pose, aborting");
            if let Some(active) = self.active.take() {
                if active.task.end.is_finite() {
                    camera.apply_pose(&active.task.end);
                    controls.target = active.task.end.target;
                }
                controls.set_all_enabled(true);
                controls.update();
                self.state = match active.goal {
                    TransitionGoal::Focus => FocusState::FocusedOrbital,
                    TransitionGoal::Return => {
                        self.saved_pose = None;
                        self.focused_surface = None;
                        FocusState::Orbital
                    }
                };
                active.task.finish(TransitionStatus::Failed);
            }
            return;
        }

        camera.apply_pose(&pose);
        controls.target = pose.target;
        controls.update();

        if done {
            if let Some(active) = self.active.take() {
                match active.goal {
                    TransitionGoal::Focus => {
                        // Camera locked on target; controls stay disabled
                        // until orbital release is requested.
                        self.state = FocusState::Focused;
                    }
                    TransitionGoal::Return => {
                        if let Some(saved) = self.saved_pose.take() {
                            camera.zoom = saved.zoom;
                        }
                        controls.set_all_enabled(true);
                        self.focused_surface = None;
                        self.state = FocusState::Orbital;
                    }
                }
                active.task.finish(TransitionStatus::Completed);
                log::debug!("camera transition complete, state {:?}", self.state);
            }
        }
    }

    /// Teardown: cancel any in-flight transition and force-restore the
    /// controller to fully enabled, whatever state the machine was in.
    pub fn shutdown(&mut self, controls: &mut OrbitController) {
        self.cancel_active();
        controls.set_all_enabled(true);
        self.saved_pose = None;
        self.focused_surface = None;
        self.state = FocusState::Orbital;
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.task.finish(TransitionStatus::Cancelled);
        }
    }
}

impl Default for CameraChoreographer {
    fn default() -> Self {
        Self::new()
    }
}
