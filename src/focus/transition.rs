//! Cancellable camera-transition tasks, keyed to wall-clock time.

use crate::scene::camera::CameraPose;
use std::cell::RefCell;
use std::rc::Rc;

/// Terminal-or-running status of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStatus {
    Running,
    Completed,
    /// Superseded by a newer transition or torn down.
    Cancelled,
    /// A per-frame step produced an unusable pose.
    Failed,
}

type CompletionCallback = Box<dyn FnOnce(TransitionStatus)>;

struct Shared {
    status: TransitionStatus,
    callbacks: Vec<CompletionCallback>,
}

/// Pending completion handle for an in-flight transition. Callbacks fire
/// exactly once.
#[derive(Clone)]
pub struct TransitionHandle {
    shared: Rc<RefCell<Shared>>,
}

impl TransitionHandle {
    pub fn status(&self) -> TransitionStatus {
        self.shared.borrow().status
    }

    pub fn is_running(&self) -> bool {
        self.status() == TransitionStatus::Running
    }

    /// Runs immediately if the transition has already settled.
    pub fn on_complete(&self, callback: impl FnOnce(TransitionStatus) + 'static) {
        let status = self.shared.borrow().status;
        if status == TransitionStatus::Running {
            self.shared.borrow_mut().callbacks.push(Box::new(callback));
        } else {
            callback(status);
        }
    }
}

impl std::fmt::Debug for TransitionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionHandle")
            .field("status", &self.status())
            .finish()
    }
}

/// Ease-out cubic: fast start, smooth settle.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

fn lerp_pose(start: &CameraPose, end: &CameraPose, t: f32) -> CameraPose {
    CameraPose {
        position: start.position.lerp(end.position, t),
        target: start.target.lerp(end.target, t),
        fov_deg: start.fov_deg + (end.fov_deg - start.fov_deg) * t,
    }
}

/// The choreographer-side state of one transition.
pub(crate) struct TransitionTask {
    pub start: CameraPose,
    pub end: CameraPose,
    pub start_ms: f64,
    pub duration_ms: f64,
    shared: Rc<RefCell<Shared>>,
}

impl TransitionTask {
    pub fn new(
        start: CameraPose,
        end: CameraPose,
        start_ms: f64,
        duration_ms: f64,
    ) -> (Self, TransitionHandle) {
        let shared = Rc::new(RefCell::new(Shared {
            status: TransitionStatus::Running,
            callbacks: Vec::new(),
        }));
        let handle = TransitionHandle {
            shared: Rc::clone(&shared),
        };
        (
            Self {
                start,
                end,
                start_ms,
                duration_ms,
                shared,
            },
            handle,
        )
    }

    /// Linear progress in [0, 1] at the given wall-clock time.
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)) as f32
    }

    /// Eased pose at the given wall-clock time.
    pub fn pose_at(&self, now_ms: f64) -> CameraPose {
        lerp_pose(&self.start, &self.end, ease_out_cubic(self.progress(now_ms)))
    }

    /// Settle and fire callbacks. Idempotent; a settled task ignores
    /// further finishes.
    pub fn finish(&self, status: TransitionStatus) {
        let callbacks = {
            let mut shared = self.shared.borrow_mut();
            if shared.status != TransitionStatus::Running {
                return;
            }
            shared.status = status;
            std::mem::take(&mut shared.callbacks)
        };
        for callback in callbacks {
            callback(status);
        }
    }
}
