//! Raw pointer input delivered by the host's gesture tracker.

use crate::geometry::{Point, Rect};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// A single pointer position report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Position in the host view's local coordinates.
    pub position: Point,
    /// When the sample was taken.
    pub timestamp: Timestamp,
}

impl PointerSample {
    /// Create a new sample.
    #[must_use]
    pub const fn new(position: Point, timestamp: Timestamp) -> Self {
        Self {
            position,
            timestamp,
        }
    }

    /// Shorthand for a sample at `(x, y)` taken `millis` after the origin.
    #[must_use]
    pub const fn at(x: f32, y: f32, millis: u64) -> Self {
        Self::new(Point::new(x, y), Timestamp::from_millis(millis))
    }
}

/// Inbound notification from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Pointer went down.
    Down {
        /// The sample
        sample: PointerSample,
    },
    /// Pointer moved.
    Move {
        /// The sample
        sample: PointerSample,
    },
    /// Pointer went up.
    Up {
        /// The sample
        sample: PointerSample,
        /// Bounds of the hosting view, in the same coordinates as the sample.
        bounds: Rect,
    },
    /// The tracker abandoned the gesture.
    Cancel {
        /// When the cancellation was reported.
        timestamp: Timestamp,
    },
    /// The hosting widget was torn down.
    Detach,
}

impl PointerEvent {
    /// Time the event carries, if any.
    #[must_use]
    pub const fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Down { sample } | Self::Move { sample } | Self::Up { sample, .. } => {
                Some(sample.timestamp)
            }
            Self::Cancel { timestamp } => Some(*timestamp),
            Self::Detach => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_at() {
        let s = PointerSample::at(3.0, 4.0, 250);
        assert_eq!(s.position, Point::new(3.0, 4.0));
        assert_eq!(s.timestamp, Timestamp::from_millis(250));
    }

    #[test]
    fn test_event_timestamp() {
        let s = PointerSample::at(0.0, 0.0, 10);
        assert_eq!(
            PointerEvent::Down { sample: s }.timestamp(),
            Some(Timestamp::from_millis(10))
        );
        assert_eq!(
            PointerEvent::Up {
                sample: s,
                bounds: Rect::from_size(1.0, 1.0)
            }
            .timestamp(),
            Some(Timestamp::from_millis(10))
        );
        assert_eq!(
            PointerEvent::Cancel {
                timestamp: Timestamp::from_millis(20)
            }
            .timestamp(),
            Some(Timestamp::from_millis(20))
        );
        assert_eq!(PointerEvent::Detach.timestamp(), None);
    }

    #[test]
    fn test_event_serde_tagged() {
        let json = r#"{"type":"up","sample":{"position":{"x":5.0,"y":6.0},"timestamp":0.5},"bounds":{"x":0.0,"y":0.0,"width":10.0,"height":10.0}}"#;
        let event: PointerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            PointerEvent::Up {
                sample: PointerSample::at(5.0, 6.0, 500),
                bounds: Rect::from_size(10.0, 10.0),
            }
        );

        let detach: PointerEvent = serde_json::from_str(r#"{"type":"detach"}"#).unwrap();
        assert_eq!(detach, PointerEvent::Detach);
    }
}
