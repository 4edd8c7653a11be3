//! Press gesture disambiguation for pointer input.
//!
//! This crate turns one raw pointer gesture stream into semantic events:
//! - Press and release, split into inside/outside by [`Rect`] containment
//! - Long press, suppressed once the pointer drags too far
//! - Double tap, judged release-to-release
//! - Fire-while-held auto-repeat driven by [`RepeatTimer`]
//! - Drag start, move and end with the raw [`PointerSample`]s
//!
//! The machine never reads a clock. Samples carry [`Timestamp`]s and the
//! host calls [`GestureStateMachine::poll`] to let time pass.

mod actions;
mod config;
mod error;
mod geometry;
mod input;
mod machine;
mod schedule;
mod session;
mod time;
mod timer;

pub use actions::{Action, EventRecorder, GestureActions, GestureEvent, SampleAction};
pub use config::{
    GestureConfiguration, DEFAULT_CANCEL_DELAY, DEFAULT_DOUBLE_TAP_WINDOW,
    DEFAULT_LONG_PRESS_DELAY, DEFAULT_REPEAT_INTERVAL, DEFAULT_REPEAT_START_DELAY,
};
pub use error::ConfigError;
pub use geometry::{Point, Rect};
pub use input::{PointerEvent, PointerSample};
pub use machine::{GesturePhase, GestureStateMachine};
pub use schedule::{Deadline, DeadlineKind, DeadlineQueue, Token};
pub use session::GestureSession;
pub use time::Timestamp;
pub use timer::{RepeatTimer, TickCallback};
