//! Recorded pointer traces and their replay.
//!
//! A trace is a YAML or JSON document:
//!
//! ```yaml
//! bounds: { x: 0.0, y: 0.0, width: 120.0, height: 40.0 }
//! until: 2.0
//! events:
//!   - { type: down, at: 0.0, x: 60.0, y: 20.0 }
//!   - { type: move, at: 0.1, x: 64.0, y: 20.0 }
//!   - { type: up, at: 0.2, x: 64.0, y: 20.0 }
//! ```
//!
//! Times are seconds. An `up` may carry its own `bounds`; otherwise the
//! trace-level bounds apply.

use presskit_core::{
    EventRecorder, GestureActions, GestureConfiguration, GestureEvent, GestureStateMachine,
    Point, PointerEvent, PointerSample, Rect, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors from loading a trace.
#[derive(Debug, Error)]
pub(crate) enum TraceError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Events are not in time order.
    #[error("Event {index} at {at:.3}s is earlier than the event before it")]
    OutOfOrder {
        /// Position of the offending event
        index: usize,
        /// Its time in seconds
        at: f64,
    },
}

/// One recorded host event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum TraceEvent {
    /// Pointer went down.
    Down { at: Timestamp, x: f32, y: f32 },
    /// Pointer moved.
    Move { at: Timestamp, x: f32, y: f32 },
    /// Pointer went up.
    Up {
        at: Timestamp,
        x: f32,
        y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bounds: Option<Rect>,
    },
    /// Tracker cancelled the gesture.
    Cancel { at: Timestamp },
    /// Widget torn down.
    Detach {
        #[serde(default)]
        at: Option<Timestamp>,
    },
}

impl TraceEvent {
    /// Time of the event, if recorded.
    pub(crate) const fn at(&self) -> Option<Timestamp> {
        match *self {
            Self::Down { at, .. } | Self::Move { at, .. } | Self::Up { at, .. } => Some(at),
            Self::Cancel { at } => Some(at),
            Self::Detach { at } => at,
        }
    }

    /// Convert to the machine's input, filling in `bounds` for releases.
    pub(crate) fn to_pointer_event(&self, bounds: Rect) -> PointerEvent {
        let sample = |at, x, y| PointerSample::new(Point::new(x, y), at);
        match *self {
            Self::Down { at, x, y } => PointerEvent::Down {
                sample: sample(at, x, y),
            },
            Self::Move { at, x, y } => PointerEvent::Move {
                sample: sample(at, x, y),
            },
            Self::Up {
                at,
                x,
                y,
                bounds: own,
            } => PointerEvent::Up {
                sample: sample(at, x, y),
                bounds: own.unwrap_or(bounds),
            },
            Self::Cancel { at } => PointerEvent::Cancel { timestamp: at },
            Self::Detach { .. } => PointerEvent::Detach,
        }
    }
}

/// A recorded gesture session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Trace {
    /// Bounds of the hosting view.
    pub(crate) bounds: Rect,
    /// Events in time order.
    pub(crate) events: Vec<TraceEvent>,
    /// Absolute time to keep polling until once all events are handled.
    #[serde(default)]
    pub(crate) until: Option<Timestamp>,
}

impl Trace {
    /// Parse a YAML document. JSON is valid YAML, so this accepts both.
    pub(crate) fn from_yaml_str(src: &str) -> Result<Self, TraceError> {
        let trace: Self = serde_yaml_ng::from_str(src)?;
        trace.validate()?;
        Ok(trace)
    }

    /// Parse a JSON document.
    pub(crate) fn from_json_str(src: &str) -> Result<Self, TraceError> {
        let trace: Self = serde_json::from_str(src)?;
        trace.validate()?;
        Ok(trace)
    }

    /// Load from a file, choosing the parser by extension.
    pub(crate) fn load(path: &Path) -> Result<Self, TraceError> {
        let src = fs::read_to_string(path)?;
        log::debug!("loading trace from {}", path.display());
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&src),
            _ => Self::from_yaml_str(&src),
        }
    }

    fn validate(&self) -> Result<(), TraceError> {
        let mut last = Timestamp::ZERO;
        for (index, event) in self.events.iter().enumerate() {
            if let Some(at) = event.at() {
                if at < last {
                    return Err(TraceError::OutOfOrder {
                        index,
                        at: at.as_secs_f64(),
                    });
                }
                last = at;
            }
        }
        Ok(())
    }
}

/// A gesture event together with the time of the step that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Emitted {
    /// Step time in seconds.
    pub(crate) time: Timestamp,
    /// The emitted event.
    #[serde(flatten)]
    pub(crate) event: GestureEvent,
}

/// Run `trace` through a fresh machine and collect what it emits.
///
/// Deadlines fire exactly on time: before each event the machine is polled
/// at every pending deadline up to the event's time.
pub(crate) fn replay(trace: &Trace, config: GestureConfiguration) -> Vec<Emitted> {
    let recorder = EventRecorder::new();
    let mut machine = GestureStateMachine::new(config, GestureActions::recording(&recorder));
    let mut out = Vec::new();
    let mut now = Timestamp::ZERO;

    for event in &trace.events {
        if let Some(at) = event.at() {
            run_until(&mut machine, &recorder, at, &mut out);
            now = at;
        }
        machine.handle(&event.to_pointer_event(trace.bounds));
        collect(&recorder, now, &mut out);
    }
    if let Some(until) = trace.until {
        run_until(&mut machine, &recorder, until, &mut out);
    }
    log::debug!("replayed {} events, {} emitted", trace.events.len(), out.len());
    out
}

fn run_until(
    machine: &mut GestureStateMachine,
    recorder: &EventRecorder,
    target: Timestamp,
    out: &mut Vec<Emitted>,
) {
    while let Some(at) = machine.next_deadline().filter(|at| *at <= target) {
        machine.poll(at);
        collect(recorder, at, out);
    }
    machine.poll(target);
    collect(recorder, target, out);
}

fn collect(recorder: &EventRecorder, time: Timestamp, out: &mut Vec<Emitted>) {
    out.extend(
        recorder
            .take()
            .into_iter()
            .map(|event| Emitted { time, event }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAP: &str = r"
bounds: { x: 0.0, y: 0.0, width: 100.0, height: 40.0 }
events:
  - { type: down, at: 0.0, x: 50.0, y: 20.0 }
  - { type: up, at: 0.125, x: 50.0, y: 20.0 }
";

    fn names(emitted: &[Emitted]) -> Vec<&'static str> {
        emitted.iter().map(|e| e.event.name()).collect()
    }

    #[test]
    fn test_parse_yaml_trace() {
        let trace = Trace::from_yaml_str(TAP).unwrap();
        assert_eq!(trace.events.len(), 2);
        assert_eq!(trace.bounds, Rect::from_size(100.0, 40.0));
        assert_eq!(trace.until, None);
        assert_eq!(trace.events[1].at(), Some(Timestamp::from_millis(125)));
    }

    #[test]
    fn test_parse_json_trace() {
        let json = r#"{
            "bounds": {"x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0},
            "events": [{"type": "detach"}],
            "until": 1.5
        }"#;
        let trace = Trace::from_json_str(json).unwrap();
        assert_eq!(trace.events, vec![TraceEvent::Detach { at: None }]);
        assert_eq!(trace.until, Some(Timestamp::from_millis(1500)));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let src = r"
bounds: { x: 0.0, y: 0.0, width: 100.0, height: 40.0 }
events:
  - { type: down, at: 0.5, x: 50.0, y: 20.0 }
  - { type: up, at: 0.25, x: 50.0, y: 20.0 }
";
        let err = Trace::from_yaml_str(src).unwrap_err();
        assert!(matches!(err, TraceError::OutOfOrder { index: 1, .. }));
    }

    #[test]
    fn test_up_uses_own_bounds_when_given() {
        let fallback = Rect::from_size(100.0, 100.0);
        let own = Rect::from_size(10.0, 10.0);
        let event = TraceEvent::Up {
            at: Timestamp::ZERO,
            x: 50.0,
            y: 50.0,
            bounds: Some(own),
        };
        match event.to_pointer_event(fallback) {
            PointerEvent::Up { bounds, .. } => assert_eq!(bounds, own),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_replay_tap() {
        let trace = Trace::from_yaml_str(TAP).unwrap();
        let emitted = replay(&trace, GestureConfiguration::default());
        assert_eq!(
            names(&emitted),
            vec!["press", "drag_start", "drag_end", "release_inside", "end"]
        );
        assert_eq!(emitted[0].time, Timestamp::ZERO);
        assert_eq!(emitted[4].time, Timestamp::from_millis(125));
    }

    #[test]
    fn test_replay_stamps_deadlines_with_due_time() {
        let src = r"
bounds: { x: 0.0, y: 0.0, width: 100.0, height: 40.0 }
until: 1.0
events:
  - { type: down, at: 0.0, x: 50.0, y: 20.0 }
";
        let trace = Trace::from_yaml_str(src).unwrap();
        let emitted = replay(&trace, GestureConfiguration::default());
        let long_press = emitted
            .iter()
            .find(|e| e.event == GestureEvent::LongPress)
            .unwrap();
        assert_eq!(long_press.time, Timestamp::from_millis(500));
        let repeat = emitted
            .iter()
            .find(|e| e.event == GestureEvent::Repeat)
            .unwrap();
        assert_eq!(repeat.time, Timestamp::from_millis(900));
    }

    #[test]
    fn test_until_is_absolute_time() {
        let src = r"
bounds: { x: 0.0, y: 0.0, width: 100.0, height: 40.0 }
until: 1.5
events:
  - { type: down, at: 1.0, x: 50.0, y: 20.0 }
";
        let trace = Trace::from_yaml_str(src).unwrap();
        let emitted = replay(&trace, GestureConfiguration::default());
        assert_eq!(
            names(&emitted),
            vec!["press", "drag_start", "long_press"]
        );
        assert_eq!(emitted[2].time, Timestamp::from_millis(1500));
    }

    #[test]
    fn test_emitted_json_shape() {
        let emitted = Emitted {
            time: Timestamp::from_millis(500),
            event: GestureEvent::LongPress,
        };
        let json = serde_json::to_string(&emitted).unwrap();
        assert_eq!(json, r#"{"time":0.5,"event":"long_press"}"#);
    }
}
