//! The collaborator contract between the engine and its embedding runtime.
//!
//! Everything the engine cannot do by itself — capturing the screen, running
//! a named recognizer, tapping, scrolling, executing declarative flows, and
//! reporting cancellation — goes through one trait implemented by the
//! integration layer. The engine holds no reference to the host; every
//! operation threads `&mut impl Host` explicitly.

pub mod scripted;

use crate::detection::Recognition;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum HostError {
    #[error("viewport capture failed: {0}")]
    Capture(String),
    #[error("recognizer '{key}' failed: {reason}")]
    Recognition { key: String, reason: String },
}

/// Outcome of one follow-on task run. A host-level failure inside the flow
/// surfaces as `succeeded: false`; the engine does not distinguish further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskReport {
    pub succeeded: bool,
}

pub trait Host {
    /// Opaque captured viewport, only ever handed back to `recognize`.
    type Frame;

    /// Capture the current viewport. Blocking.
    fn capture(&mut self) -> Result<Self::Frame, HostError>;

    /// Run the named recognizer over a captured frame. Blocking.
    fn recognize(&mut self, key: &str, frame: &Self::Frame) -> Result<Recognition, HostError>;

    /// Tap at viewport coordinates. Blocks until acknowledged.
    fn click(&mut self, x: i32, y: i32);

    fn scroll_down(&mut self);

    fn scroll_up(&mut self);

    /// Execute an external declarative flow, optionally overriding named
    /// steps with the given payload. Blocking.
    fn run_task(&mut self, name: &str, overrides: Option<&serde_json::Value>) -> TaskReport;

    /// Cooperative cancellation signal. Polled, never blocks.
    fn is_stopping(&self) -> bool;
}
