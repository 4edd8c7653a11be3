//! The press gesture state machine.
//!
//! [`GestureStateMachine`] turns one stream of raw pointer samples into
//! press, release, long press, double tap, repeat, drag and end events.
//!
//! ## Driving the machine
//!
//! All input and all timer work must arrive on one execution context:
//!
//! 1) Forward tracker samples to [`GestureStateMachine::on_pointer_down`],
//!    [`GestureStateMachine::on_pointer_move`] and
//!    [`GestureStateMachine::on_pointer_up`].
//! 2) Call [`GestureStateMachine::poll`] whenever time passes. It fires every
//!    deadline and repeat tick due at or before the given instant, in time
//!    order. Use [`GestureStateMachine::next_deadline`] to arm one wakeup.
//! 3) Call [`GestureStateMachine::on_detach`] when the widget goes away.
//!
//! ```
//! use presskit_core::{
//!     EventRecorder, GestureActions, GestureConfiguration, GestureEvent, GestureStateMachine,
//!     PointerSample, Rect, Timestamp,
//! };
//!
//! let recorder = EventRecorder::new();
//! let mut machine = GestureStateMachine::new(
//!     GestureConfiguration::default(),
//!     GestureActions::recording(&recorder),
//! );
//! let bounds = Rect::from_size(100.0, 40.0);
//!
//! machine.on_pointer_down(PointerSample::at(50.0, 20.0, 0));
//! machine.poll(Timestamp::from_millis(600));
//! machine.on_pointer_up(PointerSample::at(50.0, 20.0, 650), bounds);
//!
//! assert_eq!(recorder.count("long_press"), 1);
//! assert_eq!(recorder.count("release_inside"), 1);
//! assert_eq!(recorder.events().last(), Some(&GestureEvent::End));
//! ```
//!
//! ## Stuck gestures
//!
//! Some trackers never deliver the terminating event, for example when an
//! enclosing scroll surface swallows it. With
//! [`GestureConfiguration::cancel_delay`] set, the machine checks once,
//! `cancel_delay` after the press, whether the last sample position is
//! still the one seen at press time; if so it ends the gesture with only an
//! `end` event. This is a heuristic: a finger genuinely held still is
//! cancelled too, and a finger that moved at all is never checked again.

use crate::actions::{GestureActions, GestureEvent};
use crate::config::GestureConfiguration;
use crate::geometry::{Point, Rect};
use crate::input::{PointerEvent, PointerSample};
use crate::schedule::{Deadline, DeadlineKind, DeadlineQueue};
use crate::session::GestureSession;
use crate::time::Timestamp;
use crate::timer::RepeatTimer;

/// Coarse state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// No gesture in progress.
    Idle,
    /// A gesture has been accepted as a press and not yet released or cancelled.
    Pressed,
}

/// Disambiguates one pointer gesture stream into semantic events.
#[derive(Debug, Default)]
pub struct GestureStateMachine {
    config: GestureConfiguration,
    actions: GestureActions,
    session: GestureSession,
    deadlines: DeadlineQueue,
    repeat_timer: RepeatTimer,
}

impl GestureStateMachine {
    /// Create a machine with the given configuration and callbacks.
    #[must_use]
    pub fn new(config: GestureConfiguration, actions: GestureActions) -> Self {
        Self {
            config,
            actions,
            session: GestureSession::new(),
            deadlines: DeadlineQueue::new(),
            repeat_timer: RepeatTimer::new(),
        }
    }

    /// Create a machine with default configuration.
    #[must_use]
    pub fn with_actions(actions: GestureActions) -> Self {
        Self::new(GestureConfiguration::default(), actions)
    }

    /// Current configuration.
    #[must_use]
    pub const fn configuration(&self) -> &GestureConfiguration {
        &self.config
    }

    /// Replace the configuration. Deadlines already scheduled keep the
    /// timing they were scheduled with.
    pub fn set_configuration(&mut self, config: GestureConfiguration) {
        self.config = config;
    }

    /// Current callbacks.
    #[must_use]
    pub const fn actions(&self) -> &GestureActions {
        &self.actions
    }

    /// Replace the callbacks. A repeat run already ticking keeps the
    /// callbacks it was started with until the gesture ends.
    pub fn set_actions(&mut self, actions: GestureActions) {
        self.actions = actions;
    }

    /// Session bookkeeping.
    #[must_use]
    pub const fn session(&self) -> &GestureSession {
        &self.session
    }

    /// The auto-repeat ticker.
    #[must_use]
    pub const fn repeat_timer(&self) -> &RepeatTimer {
        &self.repeat_timer
    }

    /// Coarse state.
    #[must_use]
    pub const fn phase(&self) -> GesturePhase {
        if self.session.is_pressed {
            GesturePhase::Pressed
        } else {
            GesturePhase::Idle
        }
    }

    /// Check if a gesture is currently pressed.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.session.is_pressed
    }

    /// Check if the owning widget has been torn down.
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.session.is_detached
    }

    /// Number of scheduled deadlines, including stale ones.
    #[must_use]
    pub fn pending_deadlines(&self) -> usize {
        self.deadlines.len()
    }

    /// Earliest instant at which [`poll`](Self::poll) could have an effect.
    ///
    /// Stale deadlines are included, so a wakeup may turn out to do nothing.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Timestamp> {
        match (self.deadlines.next_due(), self.repeat_timer.next_tick()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Dispatch a host event.
    pub fn handle(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down { sample } => self.on_pointer_down(sample),
            PointerEvent::Move { sample } => self.on_pointer_move(sample),
            PointerEvent::Up { sample, bounds } => self.on_pointer_up(sample, bounds),
            PointerEvent::Cancel { timestamp } => self.on_pointer_cancel(timestamp),
            PointerEvent::Detach => self.on_detach(),
        }
    }

    /// Pointer went down. Starts a gesture unless one is already pressed.
    pub fn on_pointer_down(&mut self, sample: PointerSample) {
        if self.session.is_pressed {
            log::trace!("ignoring pointer down while pressed at {:?}", sample.position);
            return;
        }
        self.press(sample);
    }

    /// Pointer moved.
    ///
    /// Drags a pressed gesture. If no sample has ever been accepted the move
    /// is taken as the start of the gesture (for trackers that never report
    /// a separate down). Otherwise it is ignored, so a stray move after a
    /// release cannot start a new gesture.
    ///
    /// Only the very first gesture of a machine can start from a move. Hosts
    /// that report moves alone must send [`on_pointer_down`](Self::on_pointer_down)
    /// to start every later gesture.
    pub fn on_pointer_move(&mut self, sample: PointerSample) {
        if self.session.is_pressed {
            self.session.observe(sample);
            self.actions.emit(&GestureEvent::Drag { sample });
        } else if !self.session.is_active {
            self.press(sample);
        } else {
            log::trace!("ignoring pointer move while idle at {:?}", sample.position);
        }
    }

    /// Pointer went up. `bounds` are the hosting view's bounds, in the same
    /// coordinates as the sample.
    pub fn on_pointer_up(&mut self, sample: PointerSample, bounds: Rect) {
        if !self.session.is_pressed {
            log::trace!("ignoring pointer up without a press");
            return;
        }
        self.finish_gesture();

        let now = sample.timestamp;
        let is_double_tap = self
            .session
            .last_release
            .is_some_and(|last| now - last < self.config.double_tap_window);
        if is_double_tap {
            self.session.last_release = None;
            self.actions.emit(&GestureEvent::DoubleTap);
        } else {
            self.session.last_release = Some(now);
        }

        self.actions.emit(&GestureEvent::DragEnd { sample });
        let inside = bounds.contains_point_strict(&sample.position);
        log::debug!(
            "released {} at {:?}{}",
            if inside { "inside" } else { "outside" },
            sample.position,
            if is_double_tap { " (double tap)" } else { "" }
        );
        self.actions.emit(if inside {
            &GestureEvent::ReleaseInside
        } else {
            &GestureEvent::ReleaseOutside
        });
        self.actions.emit(&GestureEvent::End);
    }

    /// The tracker abandoned the gesture. Ends a pressed gesture with only
    /// an `end` event.
    pub fn on_pointer_cancel(&mut self, timestamp: Timestamp) {
        if !self.session.is_pressed {
            log::trace!("ignoring cancel without a press");
            return;
        }
        log::debug!("gesture cancelled by tracker at {:.3}s", timestamp.as_secs_f64());
        self.cancel();
    }

    /// The owning widget was torn down. Pending deadlines and repeat ticks
    /// will no longer invoke callbacks. No `end` event is emitted.
    pub fn on_detach(&mut self) {
        log::debug!("detached");
        self.session.is_detached = true;
        self.repeat_timer.stop();
    }

    /// Fire every deadline and repeat tick due at or before `now`, earliest
    /// first.
    pub fn poll(&mut self, now: Timestamp) {
        loop {
            let deadline_due = self.deadlines.next_due().filter(|at| *at <= now);
            let tick_due = self.repeat_timer.next_tick().filter(|at| *at <= now);
            match (deadline_due, tick_due) {
                (None, None) => break,
                (Some(deadline), Some(tick)) if tick < deadline => self.tick(tick),
                (None, Some(tick)) => self.tick(tick),
                _ => {
                    if let Some(deadline) = self.deadlines.pop_due(now) {
                        self.fire(deadline, now);
                    }
                }
            }
        }
    }

    /// Poll at every intermediate deadline up to `target`, as a host that
    /// wakes exactly on time would, then at `target`.
    pub fn advance_to(&mut self, target: Timestamp) {
        while let Some(at) = self.next_deadline().filter(|at| *at <= target) {
            self.poll(at);
        }
        self.poll(target);
    }

    fn press(&mut self, sample: PointerSample) {
        self.repeat_timer.stop();
        self.session.begin(sample);
        log::debug!("press accepted at {:?}", sample.position);

        self.actions.emit(&GestureEvent::Press);
        self.actions.emit(&GestureEvent::DragStart { sample });

        let now = sample.timestamp;
        if let Some(delay) = self.config.cancel_delay {
            let seen: Option<Point> = self.session.last_sample.map(|s| s.position);
            self.deadlines.schedule(
                now + delay,
                DeadlineKind::StuckCheck {
                    token: self.session.stuck_generation,
                    seen,
                },
            );
        }
        self.deadlines.schedule(
            now + self.config.long_press_delay,
            DeadlineKind::LongPress(self.session.long_press_generation),
        );
        self.deadlines.schedule(
            now + self.config.repeat_start_delay,
            DeadlineKind::RepeatStart(self.session.repeat_generation),
        );
    }

    fn fire(&mut self, deadline: Deadline, now: Timestamp) {
        if self.session.is_detached {
            log::trace!("dropping {:?} after detach", deadline.kind);
            return;
        }
        match deadline.kind {
            DeadlineKind::LongPress(token) => {
                if token != self.session.long_press_generation {
                    log::trace!("stale long press deadline");
                } else if self.session.max_drag_distance_observed
                    > self.config.long_press_max_drag_distance
                {
                    log::debug!(
                        "long press suppressed after dragging {:.1}",
                        self.session.max_drag_distance_observed
                    );
                } else {
                    self.actions.emit(&GestureEvent::LongPress);
                }
            }
            DeadlineKind::RepeatStart(token) => {
                if token != self.session.repeat_generation {
                    log::trace!("stale repeat deadline");
                    return;
                }
                let actions = self.actions.clone();
                self.repeat_timer
                    .start(self.config.repeat_interval, now, move || {
                        actions.emit(&GestureEvent::Repeat);
                    });
            }
            DeadlineKind::StuckCheck { token, seen } => {
                if token != self.session.stuck_generation {
                    log::trace!("stale stuck check");
                    return;
                }
                let current = self.session.last_sample.map(|s| s.position);
                if self.session.is_pressed && current == seen {
                    log::debug!("gesture has not moved since press; cancelling");
                    self.cancel();
                }
            }
        }
    }

    fn tick(&mut self, due: Timestamp) {
        if self.session.is_detached {
            self.repeat_timer.stop();
            return;
        }
        self.repeat_timer.advance(due);
    }

    fn finish_gesture(&mut self) {
        self.session.reset();
        self.repeat_timer.stop();
    }

    fn cancel(&mut self) {
        self.finish_gesture();
        self.actions.emit(&GestureEvent::End);
    }
}
