//! Mutable per-machine gesture bookkeeping.

use crate::geometry::Point;
use crate::input::PointerSample;
use crate::schedule::Token;
use crate::time::Timestamp;

/// State tracking the current (or most recent) gesture.
///
/// One session lives as long as its state machine. Per-gesture fields are
/// cleared when a gesture begins and again when it ends. `is_active`, the
/// double tap timestamp and the detachment flag persist across gestures.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GestureSession {
    /// True from an accepted press until the gesture ends.
    pub is_pressed: bool,
    /// True once a sample has been accepted as a press. Only a pointer-down
    /// can start a gesture after that; moves alone never re-press.
    pub is_active: bool,
    /// Position the gesture started at.
    pub origin: Option<Point>,
    /// Last sample seen in the current gesture.
    pub last_sample: Option<PointerSample>,
    /// Largest distance from `origin` reached so far.
    pub max_drag_distance_observed: f32,
    /// Generation of the pending long press deadline.
    pub long_press_generation: Token,
    /// Generation of the pending repeat-start deadline.
    pub repeat_generation: Token,
    /// Generation of the pending stuck-gesture check.
    pub stuck_generation: Token,
    /// Last release that can still pair into a double tap. `None` means no
    /// release is eligible, which is also the state right after a double tap.
    pub last_release: Option<Timestamp>,
    /// Set once the owning widget is torn down.
    pub is_detached: bool,
}

impl GestureSession {
    /// Create an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new gesture at `sample` with fresh deadline generations.
    pub(crate) fn begin(&mut self, sample: PointerSample) {
        self.is_pressed = true;
        self.is_active = true;
        self.origin = Some(sample.position);
        self.last_sample = Some(sample);
        self.max_drag_distance_observed = 0.0;
        self.invalidate_deadlines();
    }

    /// Record a move sample and update the drag distance.
    pub(crate) fn observe(&mut self, sample: PointerSample) {
        self.last_sample = Some(sample);
        if let Some(origin) = self.origin {
            let distance = sample.position.distance_from(origin);
            self.max_drag_distance_observed = self.max_drag_distance_observed.max(distance);
        }
    }

    /// Clear per-gesture state and make every pending deadline stale.
    pub(crate) fn reset(&mut self) {
        self.is_pressed = false;
        self.origin = None;
        self.last_sample = None;
        self.max_drag_distance_observed = 0.0;
        self.invalidate_deadlines();
    }

    fn invalidate_deadlines(&mut self) {
        self.long_press_generation = self.long_press_generation.next();
        self.repeat_generation = self.repeat_generation.next();
        self.stuck_generation = self.stuck_generation.next();
    }
}
