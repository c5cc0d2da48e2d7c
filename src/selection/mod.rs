//! Selection orchestration.
//!
//! The coordinator is the single writer of hover/selection state. Pointer
//! events come in, picking resolves them, and the coordinator fans the
//! outcome out to the highlight presenter and the camera choreographer.
//! Everything else (picking, highlighting, choreography) stays composable
//! and side-effect free on its own.

use crate::config::{SurfaceCatalog, SurfaceDetails};
use crate::focus::{CameraChoreographer, FocusState, DEFAULT_TRANSITION_MS};
use crate::highlight::HighlightPresenter;
use crate::pick::{pick, PickError, PointerPosition};
use crate::scene::camera::{Camera, Viewport};
use crate::scene::controls::OrbitController;
use crate::scene::{SceneGraph, SurfaceId};

/// Observable selection state. `detail_open` is never true without a
/// selected surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectionState {
    pub hovered: Option<SurfaceId>,
    pub selected: Option<SurfaceId>,
    pub detail_open: bool,
    pub camera_focused: bool,
    /// User has released the camera to orbit while a focus target is kept.
    pub camera_orbital: bool,
}

/// Floating label content for the hovered surface.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverLabel {
    pub surface: SurfaceId,
    pub text: String,
    /// Viewport pixel coordinates, top-left origin.
    pub x: f32,
    pub y: f32,
}

/// Owns the selection state machine and the components it drives.
pub struct SelectionCoordinator {
    state: SelectionState,
    highlight: HighlightPresenter,
    choreographer: CameraChoreographer,
    catalog: SurfaceCatalog,
}

impl SelectionCoordinator {
    pub fn new(catalog: SurfaceCatalog) -> Self {
        Self {
            state: SelectionState::default(),
            highlight: HighlightPresenter::new(),
            choreographer: CameraChoreographer::new(),
            catalog,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn focus_state(&self) -> FocusState {
        self.choreographer.state()
    }

    pub fn is_animating(&self) -> bool {
        self.choreographer.is_animating()
    }

    pub fn catalog(&self) -> &SurfaceCatalog {
        &self.catalog
    }

    /// Re-resolve hover from a pointer move. Highlight churn is bounded:
    /// nothing is touched unless the hovered surface actually changed.
    pub fn pointer_moved(
        &mut self,
        scene: &mut SceneGraph,
        camera: &Camera,
        viewport: Viewport,
        pointer: PointerPosition,
    ) -> Result<(), PickError> {
        let result = pick(scene, camera, viewport, pointer)?;
        if result.surface == self.state.hovered {
            return Ok(());
        }
        self.state.hovered = result.surface;
        self.highlight
            .sync(scene, self.state.hovered, self.state.selected);
        Ok(())
    }

    /// Resolve a click. A hit selects the surface, opens the detail view and
    /// starts the focus animation; a miss clears the selection and, when the
    /// camera is away from its orbital home, flies it back.
    pub fn pointer_clicked(
        &mut self,
        scene: &mut SceneGraph,
        camera: &mut Camera,
        controls: &mut OrbitController,
        viewport: Viewport,
        pointer: PointerPosition,
        now_ms: f64,
    ) -> Result<(), PickError> {
        let result = pick(scene, camera, viewport, pointer)?;

        let Some(id) = result.surface else {
            self.clear_selection(scene);
            if self.choreographer.state() != FocusState::Orbital {
                self.fly_back(camera, controls, now_ms);
            }
            self.sync_camera_flags();
            return Ok(());
        };

        log::debug!("surface {:?} clicked", scene.surface(id).map(|s| &s.name));
        // The observable selection flips synchronously; only the camera
        // motion is animated.
        self.state.selected = Some(id);
        self.state.detail_open = true;
        self.highlight
            .sync(scene, self.state.hovered, self.state.selected);

        match self.choreographer.focus(
            scene,
            camera,
            controls,
            &self.catalog,
            id,
            DEFAULT_TRANSITION_MS,
            now_ms,
        ) {
            Ok(handle) => {
                handle.on_complete(|status| {
                    log::debug!("focus transition settled: {status:?}");
                });
            }
            Err(err) => log::warn!("focus failed: {err}"),
        }
        self.sync_camera_flags();
        Ok(())
    }

    /// Reset every selection field to its initial falsy value and revert
    /// highlights. The camera pose is left alone.
    pub fn clear_selection(&mut self, scene: &mut SceneGraph) {
        self.state = SelectionState::default();
        self.highlight.sync(scene, None, None);
    }

    /// Close the detail view: clears the selection and returns the camera to
    /// its pre-focus pose when one was saved.
    pub fn close_detail(
        &mut self,
        scene: &mut SceneGraph,
        camera: &mut Camera,
        controls: &mut OrbitController,
        now_ms: f64,
    ) {
        self.clear_selection(scene);
        if self.choreographer.saved_pose().is_some() {
            self.fly_back(camera, controls, now_ms);
        }
        self.sync_camera_flags();
    }

    /// Hand camera control back to the user while keeping the selection and
    /// the logical focus target.
    pub fn release_orbit(&mut self, controls: &mut OrbitController) {
        self.choreographer.switch_to_orbital_mode(controls);
        self.sync_camera_flags();
    }

    /// Advance the in-flight camera transition, if any, to `now_ms`. Idle
    /// frames are no-ops, so a cleared selection stays cleared.
    pub fn step(&mut self, camera: &mut Camera, controls: &mut OrbitController, now_ms: f64) {
        if !self.choreographer.is_animating() {
            return;
        }
        self.choreographer.step(camera, controls, now_ms);
        self.sync_camera_flags();
    }

    /// Floating label for the hovered surface, with the catalog display name.
    pub fn hover_label(
        &self,
        scene: &SceneGraph,
        camera: &Camera,
        viewport: Viewport,
    ) -> Option<HoverLabel> {
        let anchor = self.highlight.label_anchor(
            scene,
            camera,
            viewport,
            self.state.hovered,
            self.state.selected,
        )?;
        let surface = scene.surface(anchor.surface)?;
        Some(HoverLabel {
            surface: anchor.surface,
            text: self.catalog.details_for(&surface.name).name,
            x: anchor.x,
            y: anchor.y,
        })
    }

    /// Catalog details for a surface name, for the detail/tooltip UI.
    pub fn details_for(&self, surface_name: &str) -> SurfaceDetails {
        self.catalog.details_for(surface_name)
    }

    /// Catalog details for the selected surface, for the detail view.
    pub fn selected_details(&self, scene: &SceneGraph) -> Option<SurfaceDetails> {
        let id = self.state.selected?;
        let surface = scene.surface(id)?;
        Some(self.catalog.details_for(&surface.name))
    }

    /// Teardown: revert every tint and force-restore the controller.
    pub fn shutdown(&mut self, scene: &mut SceneGraph, controls: &mut OrbitController) {
        self.highlight.clear(scene);
        self.choreographer.shutdown(controls);
        self.state = SelectionState::default();
    }

    fn fly_back(&mut self, camera: &mut Camera, controls: &mut OrbitController, now_ms: f64) {
        match self
            .choreographer
            .return_to_original_view(camera, controls, DEFAULT_TRANSITION_MS, now_ms)
        {
            Ok(handle) => {
                handle.on_complete(|status| {
                    log::debug!("return transition settled: {status:?}");
                });
            }
            Err(err) => log::warn!("return failed: {err}"),
        }
    }

    fn sync_camera_flags(&mut self) {
        self.state.camera_focused = self.choreographer.is_camera_focused();
        self.state.camera_orbital = self.choreographer.state() == FocusState::FocusedOrbital;
    }
}

impl Default for SelectionCoordinator {
    fn default() -> Self {
        Self::new(SurfaceCatalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Color, Geometry, Material};
    use glam::{Mat4, Vec3};

    const CENTER: PointerPosition = PointerPosition { x: 400.0, y: 300.0 };
    const CORNER: PointerPosition = PointerPosition { x: 5.0, y: 5.0 };

    struct Rig {
        scene: SceneGraph,
        camera: Camera,
        controls: OrbitController,
        viewport: Viewport,
        id: SurfaceId,
    }

    fn rig() -> Rig {
        rig_with_extent(1.0)
    }

    fn rig_with_extent(half_extent: f32) -> Rig {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut scene = SceneGraph::new();
        let id = scene.add_surface(
            "Engine_Casing",
            Geometry::quad(half_extent),
            Mat4::IDENTITY,
            Material::default(),
        );
        Rig {
            scene,
            camera: Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 60.0),
            controls: OrbitController::new(Vec3::ZERO),
            viewport: Viewport::new(0.0, 0.0, 800.0, 600.0),
            id,
        }
    }

    fn run_animation(rig: &mut Rig, coordinator: &mut SelectionCoordinator, start_ms: f64) {
        let mut now = start_ms;
        while coordinator.is_animating() && now < start_ms + 5000.0 {
            now += 16.0;
            coordinator.step(&mut rig.camera, &mut rig.controls, now);
        }
    }

    #[test]
    fn hover_applies_tint_and_unhover_reverts() {
        let mut rig = rig();
        let original = rig.scene.surface(rig.id).unwrap().material.color;
        let mut coordinator = SelectionCoordinator::default();

        coordinator
            .pointer_moved(&mut rig.scene, &rig.camera, rig.viewport, CENTER)
            .unwrap();
        assert_eq!(coordinator.state().hovered, Some(rig.id));
        assert_ne!(rig.scene.surface(rig.id).unwrap().material.color, original);

        coordinator
            .pointer_moved(&mut rig.scene, &rig.camera, rig.viewport, CORNER)
            .unwrap();
        assert_eq!(coordinator.state().hovered, None);
        assert_eq!(rig.scene.surface(rig.id).unwrap().material.color, original);
    }

    #[test]
    fn click_selects_opens_detail_and_starts_focus() {
        let mut rig = rig();
        let mut coordinator = SelectionCoordinator::default();

        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CENTER,
                0.0,
            )
            .unwrap();

        let state = coordinator.state();
        assert_eq!(state.selected, Some(rig.id));
        assert!(state.detail_open);
        assert!(state.camera_focused);
        assert!(!state.camera_orbital);
        assert_eq!(coordinator.focus_state(), FocusState::Focusing);
        assert!(!rig.controls.enabled);

        run_animation(&mut rig, &mut coordinator, 0.0);
        assert_eq!(coordinator.focus_state(), FocusState::Focused);
        assert!(coordinator.state().camera_focused);
    }

    #[test]
    fn miss_click_clears_selection_and_returns_camera() {
        // Small quad: from the focused pose (distance 1.5, fov 45) a corner
        // click must land off the surface.
        let mut rig = rig_with_extent(0.2);
        let original_position = rig.camera.position;
        let mut coordinator = SelectionCoordinator::default();

        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CENTER,
                0.0,
            )
            .unwrap();
        run_animation(&mut rig, &mut coordinator, 0.0);
        assert_ne!(rig.camera.position, original_position);

        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CORNER,
                2000.0,
            )
            .unwrap();
        let state = coordinator.state();
        assert_eq!(state.selected, None);
        assert!(!state.detail_open);
        assert_eq!(coordinator.focus_state(), FocusState::Returning);

        run_animation(&mut rig, &mut coordinator, 2000.0);
        assert_eq!(coordinator.focus_state(), FocusState::Orbital);
        assert!(!coordinator.state().camera_focused);
        assert!((rig.camera.position - original_position).length() < 1e-3);
        assert!(rig.controls.enabled);
    }

    #[test]
    fn miss_click_in_orbital_view_does_not_animate() {
        let mut rig = rig();
        let mut coordinator = SelectionCoordinator::default();
        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CORNER,
                0.0,
            )
            .unwrap();
        assert!(!coordinator.is_animating());
        assert_eq!(coordinator.focus_state(), FocusState::Orbital);
    }

    #[test]
    fn clear_selection_resets_camera_flags() {
        let mut rig = rig();
        let mut coordinator = SelectionCoordinator::default();
        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CENTER,
                0.0,
            )
            .unwrap();
        run_animation(&mut rig, &mut coordinator, 0.0);
        assert!(coordinator.state().camera_focused);

        coordinator.clear_selection(&mut rig.scene);
        assert_eq!(coordinator.state(), SelectionState::default());

        // An idle frame must not resurrect the cleared flags.
        coordinator.step(&mut rig.camera, &mut rig.controls, 5000.0);
        assert!(!coordinator.state().camera_focused);
        assert!(!coordinator.state().camera_orbital);
    }

    #[test]
    fn reselection_supersedes_in_flight_focus() {
        let mut rig = rig();
        let second = rig.scene.add_surface(
            "Gear_Assembly",
            Geometry::quad(0.4),
            Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0)),
            Material::default(),
        );
        let mut coordinator = SelectionCoordinator::default();

        // (320, 300) is inside the big quad's projection but outside the
        // small near quad's, so this click selects the first surface.
        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                PointerPosition::new(320.0, 300.0),
                0.0,
            )
            .unwrap();
        assert_eq!(coordinator.state().selected, Some(rig.id));
        coordinator.step(&mut rig.camera, &mut rig.controls, 400.0);

        // Mid-animation, clicking the near quad retargets the camera.
        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CENTER,
                400.0,
            )
            .unwrap();
        assert_eq!(coordinator.state().selected, Some(second));
        assert!(coordinator.state().detail_open);

        run_animation(&mut rig, &mut coordinator, 400.0);
        assert_eq!(coordinator.focus_state(), FocusState::Focused);
        // Gear_Assembly: offset (0, 0.1, 0) from its position (0, 0, 2).
        assert!((rig.controls.target - Vec3::new(0.0, 0.1, 2.0)).length() < 1e-3);
    }

    #[test]
    fn selected_highlight_survives_hover_churn() {
        let mut rig = rig();
        let mut coordinator = SelectionCoordinator::default();

        coordinator
            .pointer_moved(&mut rig.scene, &rig.camera, rig.viewport, CENTER)
            .unwrap();
        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CENTER,
                0.0,
            )
            .unwrap();
        let selected_color = rig.scene.surface(rig.id).unwrap().material.color;

        coordinator
            .pointer_moved(&mut rig.scene, &rig.camera, rig.viewport, CORNER)
            .unwrap();
        // Unhovering must not strip the selected tint.
        assert_eq!(rig.scene.surface(rig.id).unwrap().material.color, selected_color);
        assert_eq!(selected_color, Color([0.0, 1.0, 0.0]));
    }

    #[test]
    fn detail_open_implies_selection() {
        let mut rig = rig();
        let mut coordinator = SelectionCoordinator::default();

        let check = |coordinator: &SelectionCoordinator| {
            let state = coordinator.state();
            assert!(!state.detail_open || state.selected.is_some());
        };

        check(&coordinator);
        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CENTER,
                0.0,
            )
            .unwrap();
        check(&coordinator);
        coordinator.clear_selection(&mut rig.scene);
        check(&coordinator);
        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CORNER,
                100.0,
            )
            .unwrap();
        check(&coordinator);
    }

    #[test]
    fn close_detail_returns_camera_home() {
        let mut rig = rig();
        let original_position = rig.camera.position;
        let mut coordinator = SelectionCoordinator::default();

        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CENTER,
                0.0,
            )
            .unwrap();
        run_animation(&mut rig, &mut coordinator, 0.0);

        coordinator.close_detail(&mut rig.scene, &mut rig.camera, &mut rig.controls, 2000.0);
        assert!(!coordinator.state().detail_open);
        run_animation(&mut rig, &mut coordinator, 2000.0);
        assert!((rig.camera.position - original_position).length() < 1e-3);
    }

    #[test]
    fn release_orbit_enables_controls_and_sets_flag() {
        let mut rig = rig();
        let mut coordinator = SelectionCoordinator::default();
        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CENTER,
                0.0,
            )
            .unwrap();
        run_animation(&mut rig, &mut coordinator, 0.0);
        assert!(!rig.controls.enabled);

        coordinator.release_orbit(&mut rig.controls);
        assert!(rig.controls.enabled);
        let state = coordinator.state();
        assert!(state.camera_orbital);
        assert!(state.camera_focused);
        assert_eq!(state.selected, Some(rig.id));
    }

    #[test]
    fn hover_label_uses_catalog_display_name() {
        let mut rig = rig();
        let mut coordinator = SelectionCoordinator::default();
        coordinator
            .pointer_moved(&mut rig.scene, &rig.camera, rig.viewport, CENTER)
            .unwrap();

        let label = coordinator
            .hover_label(&rig.scene, &rig.camera, rig.viewport)
            .unwrap();
        assert_eq!(label.surface, rig.id);
        assert_eq!(label.text, "Engine casing");
        assert!((label.x - 400.0).abs() < 1.0);
        assert!((label.y - 300.0).abs() < 1.0);
    }

    #[test]
    fn selected_details_come_from_catalog() {
        let mut rig = rig();
        let mut coordinator = SelectionCoordinator::default();
        assert!(coordinator.selected_details(&rig.scene).is_none());

        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CENTER,
                0.0,
            )
            .unwrap();
        let details = coordinator.selected_details(&rig.scene).unwrap();
        assert_eq!(details.group, "engine");
    }

    #[test]
    fn shutdown_reverts_tints_and_restores_controls() {
        let mut rig = rig();
        let original = rig.scene.surface(rig.id).unwrap().material.color;
        let mut coordinator = SelectionCoordinator::default();
        coordinator
            .pointer_moved(&mut rig.scene, &rig.camera, rig.viewport, CENTER)
            .unwrap();
        coordinator
            .pointer_clicked(
                &mut rig.scene,
                &mut rig.camera,
                &mut rig.controls,
                rig.viewport,
                CENTER,
                0.0,
            )
            .unwrap();

        coordinator.shutdown(&mut rig.scene, &mut rig.controls);
        assert_eq!(rig.scene.surface(rig.id).unwrap().material.color, original);
        assert!(rig.controls.enabled);
        assert_eq!(coordinator.state(), SelectionState::default());
    }
}
