//! vitrine: interactive selection and camera choreography for 3D showcase
//! scenes.
//!
//! The crate is renderer-agnostic. A host owns the window, the render loop
//! and the input events; vitrine owns the interaction logic on top of a
//! [`scene::SceneGraph`]:
//!
//! - [`pick`] resolves pointer positions to surfaces with ray casting
//! - [`materials`] swaps surface materials from a preset registry and
//!   restores the originals
//! - [`highlight`] applies and reverts hover/selection tints
//! - [`focus`] animates the camera between orbital and focused views
//! - [`selection`] coordinates all of the above from pointer events
//! - [`config`] supplies per-surface display details and focus framing
//! - [`playback`] tracks an animation clip's playhead
//!
//! All animation is driven by explicit `step(now_ms)` calls with
//! host-supplied wall-clock time, so every behavior is deterministic under
//! test.

pub mod config;
pub mod focus;
pub mod highlight;
pub mod materials;
pub mod pick;
pub mod playback;
pub mod scene;
pub mod selection;

pub use config::{FocusTarget, SurfaceCatalog, SurfaceDetails};
pub use focus::{CameraChoreographer, FocusState, TransitionHandle, TransitionStatus};
pub use highlight::HighlightPresenter;
pub use materials::{MaterialSubstitution, TargetSelector};
pub use pick::{pick, PickResult, PointerPosition};
pub use playback::{ClipInfo, PlaybackController};
pub use scene::camera::{Camera, Viewport};
pub use scene::controls::OrbitController;
pub use scene::{SceneGraph, Surface, SurfaceId};
pub use selection::{SelectionCoordinator, SelectionState};
