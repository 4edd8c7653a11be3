//! Outbound semantic events and the optional callbacks that receive them.
//!
//! [`GestureActions`] is a struct of independently optional callbacks owned
//! by the UI layer. Unset callbacks are skipped. Callbacks are fire-and-forget:
//! the state machine invokes them synchronously and never waits on any work
//! they kick off.
//!
//! ```
//! use presskit_core::{EventRecorder, GestureActions, GestureEvent};
//!
//! let recorder = EventRecorder::new();
//! let actions = GestureActions::recording(&recorder);
//! actions.emit(&GestureEvent::Press);
//! assert_eq!(recorder.events(), vec![GestureEvent::Press]);
//! ```

use crate::input::PointerSample;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Callback without arguments.
pub type Action = Arc<dyn Fn() + Send + Sync>;

/// Callback receiving the sample that triggered it.
pub type SampleAction = Arc<dyn Fn(&PointerSample) + Send + Sync>;

/// A semantic event emitted by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GestureEvent {
    /// A gesture was accepted as a press.
    Press,
    /// Released strictly inside the host bounds.
    ReleaseInside,
    /// Released on or outside the host bounds.
    ReleaseOutside,
    /// Held long enough without wandering too far.
    LongPress,
    /// Second release within the double tap window.
    DoubleTap,
    /// Auto-repeat tick while held.
    Repeat,
    /// Drag began at the press sample.
    DragStart {
        /// The press sample
        sample: PointerSample,
    },
    /// Pointer moved while pressed.
    Drag {
        /// The move sample
        sample: PointerSample,
    },
    /// Drag ended at the release sample.
    DragEnd {
        /// The release sample
        sample: PointerSample,
    },
    /// The gesture is over (released or cancelled).
    End,
}

impl GestureEvent {
    /// Stable snake_case name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Press => "press",
            Self::ReleaseInside => "release_inside",
            Self::ReleaseOutside => "release_outside",
            Self::LongPress => "long_press",
            Self::DoubleTap => "double_tap",
            Self::Repeat => "repeat",
            Self::DragStart { .. } => "drag_start",
            Self::Drag { .. } => "drag",
            Self::DragEnd { .. } => "drag_end",
            Self::End => "end",
        }
    }
}

impl fmt::Display for GestureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DragStart { sample } | Self::Drag { sample } | Self::DragEnd { sample } => {
                write!(
                    f,
                    "{}({}, {})",
                    self.name(),
                    sample.position.x,
                    sample.position.y
                )
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// The set of callbacks a gesture can drive.
#[derive(Clone, Default)]
pub struct GestureActions {
    /// Called when a gesture is accepted as a press.
    pub press: Option<Action>,
    /// Called on release strictly inside the bounds.
    pub release_inside: Option<Action>,
    /// Called on release on or outside the bounds.
    pub release_outside: Option<Action>,
    /// Called once when a held press becomes a long press.
    pub long_press: Option<Action>,
    /// Called on the second release of a double tap.
    pub double_tap: Option<Action>,
    /// Called on every auto-repeat tick.
    pub repeat: Option<Action>,
    /// Called with the press sample.
    pub drag_start: Option<SampleAction>,
    /// Called with every move sample while pressed.
    pub drag: Option<SampleAction>,
    /// Called with the release sample.
    pub drag_end: Option<SampleAction>,
    /// Called when the gesture ends, by release or cancellation.
    pub end: Option<Action>,
}

impl GestureActions {
    /// Create an empty action set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the press callback.
    #[must_use]
    pub fn on_press(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.press = Some(Arc::new(f));
        self
    }

    /// Set the release-inside callback.
    #[must_use]
    pub fn on_release_inside(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.release_inside = Some(Arc::new(f));
        self
    }

    /// Set the release-outside callback.
    #[must_use]
    pub fn on_release_outside(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.release_outside = Some(Arc::new(f));
        self
    }

    /// Set the long press callback.
    #[must_use]
    pub fn on_long_press(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.long_press = Some(Arc::new(f));
        self
    }

    /// Set the double tap callback.
    #[must_use]
    pub fn on_double_tap(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.double_tap = Some(Arc::new(f));
        self
    }

    /// Set the repeat callback.
    #[must_use]
    pub fn on_repeat(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.repeat = Some(Arc::new(f));
        self
    }

    /// Set the drag start callback.
    #[must_use]
    pub fn on_drag_start(mut self, f: impl Fn(&PointerSample) + Send + Sync + 'static) -> Self {
        self.drag_start = Some(Arc::new(f));
        self
    }

    /// Set the drag callback.
    #[must_use]
    pub fn on_drag(mut self, f: impl Fn(&PointerSample) + Send + Sync + 'static) -> Self {
        self.drag = Some(Arc::new(f));
        self
    }

    /// Set the drag end callback.
    #[must_use]
    pub fn on_drag_end(mut self, f: impl Fn(&PointerSample) + Send + Sync + 'static) -> Self {
        self.drag_end = Some(Arc::new(f));
        self
    }

    /// Set the end callback.
    #[must_use]
    pub fn on_end(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.end = Some(Arc::new(f));
        self
    }

    /// An action set that pushes every event into `recorder`.
    #[must_use]
    pub fn recording(recorder: &EventRecorder) -> Self {
        let sink = |event: GestureEvent| {
            let recorder = recorder.clone();
            move || recorder.record(event)
        };
        let sample_sink = |make: fn(PointerSample) -> GestureEvent| {
            let recorder = recorder.clone();
            move |sample: &PointerSample| recorder.record(make(*sample))
        };
        Self::new()
            .on_press(sink(GestureEvent::Press))
            .on_release_inside(sink(GestureEvent::ReleaseInside))
            .on_release_outside(sink(GestureEvent::ReleaseOutside))
            .on_long_press(sink(GestureEvent::LongPress))
            .on_double_tap(sink(GestureEvent::DoubleTap))
            .on_repeat(sink(GestureEvent::Repeat))
            .on_drag_start(sample_sink(|sample| GestureEvent::DragStart { sample }))
            .on_drag(sample_sink(|sample| GestureEvent::Drag { sample }))
            .on_drag_end(sample_sink(|sample| GestureEvent::DragEnd { sample }))
            .on_end(sink(GestureEvent::End))
    }

    /// Invoke the callback matching `event`, if one is set.
    pub fn emit(&self, event: &GestureEvent) {
        log::trace!("emit {event}");
        let call = |action: &Option<Action>| {
            if let Some(action) = action {
                action();
            }
        };
        let call_with = |action: &Option<SampleAction>, sample: &PointerSample| {
            if let Some(action) = action {
                action(sample);
            }
        };
        match event {
            GestureEvent::Press => call(&self.press),
            GestureEvent::ReleaseInside => call(&self.release_inside),
            GestureEvent::ReleaseOutside => call(&self.release_outside),
            GestureEvent::LongPress => call(&self.long_press),
            GestureEvent::DoubleTap => call(&self.double_tap),
            GestureEvent::Repeat => call(&self.repeat),
            GestureEvent::DragStart { sample } => call_with(&self.drag_start, sample),
            GestureEvent::Drag { sample } => call_with(&self.drag, sample),
            GestureEvent::DragEnd { sample } => call_with(&self.drag_end, sample),
            GestureEvent::End => call(&self.end),
        }
    }
}

impl fmt::Debug for GestureActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureActions")
            .field("press", &self.press.is_some())
            .field("release_inside", &self.release_inside.is_some())
            .field("release_outside", &self.release_outside.is_some())
            .field("long_press", &self.long_press.is_some())
            .field("double_tap", &self.double_tap.is_some())
            .field("repeat", &self.repeat.is_some())
            .field("drag_start", &self.drag_start.is_some())
            .field("drag", &self.drag.is_some())
            .field("drag_end", &self.drag_end.is_some())
            .field("end", &self.end.is_some())
            .finish()
    }
}

/// Shared, cloneable log of emitted events.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<GestureEvent>>>,
}

impl EventRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn record(&self, event: GestureEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Snapshot of all recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<GestureEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all recorded events.
    pub fn take(&self) -> Vec<GestureEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of recorded events with the given name.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }
}
