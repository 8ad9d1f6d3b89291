//! A deterministic `Host` over a scripted frame sequence.
//!
//! Backs the `listsense run` dry-run command and the test suite: the
//! viewport is a fixed list of frames, scrolling moves a cursor over them,
//! and every click, scroll, and task invocation is recorded for inspection.

use crate::config::RecognizerKeys;
use crate::detection::{RawDetection, Recognition};
use crate::host::{Host, HostError, TaskReport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::Cell;

/// One scripted viewport position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameScript {
    /// What the entry-name recognizer reports at this position.
    pub detections: Vec<RawDetection>,
    /// Whether the bottom-of-list sentinel hits here.
    pub at_bottom: bool,
    /// Whether the top-of-list sentinel hits here.
    pub at_top: bool,
    /// Inject a capture failure at this position.
    pub fail_capture: bool,
    /// Inject a recognition failure at this position.
    pub fail_recognition: bool,
}

/// A whole scripted viewport plus scripted collaborator behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportScript {
    pub frames: Vec<FrameScript>,
    /// Position the cursor starts at.
    pub start_frame: usize,
    /// Follow-on task outcomes, consumed in order; exhausted entries report
    /// success.
    pub task_reports: Vec<bool>,
    /// Report `is_stopping` after this many polls; absent means never stop.
    pub stop_after_polls: Option<u32>,
}

/// Record of one follow-on task run.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTask {
    pub name: String,
    pub overrides: Option<Value>,
}

pub struct ScriptedHost {
    script: ViewportScript,
    keys: RecognizerKeys,
    position: usize,
    polls: Cell<u32>,
    pub clicks: Vec<(i32, i32)>,
    pub scroll_downs: u32,
    pub scroll_ups: u32,
    pub captures: u32,
    pub tasks: Vec<RecordedTask>,
    next_report: usize,
}

impl ScriptedHost {
    pub fn new(script: ViewportScript, keys: RecognizerKeys) -> Self {
        let position = script.start_frame.min(script.frames.len().saturating_sub(1));
        Self {
            script,
            keys,
            position,
            polls: Cell::new(0),
            clicks: Vec::new(),
            scroll_downs: 0,
            scroll_ups: 0,
            captures: 0,
            tasks: Vec::new(),
            next_report: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn frame(&self, index: usize) -> Result<&FrameScript, HostError> {
        self.script
            .frames
            .get(index)
            .ok_or_else(|| HostError::Capture("script has no frames".to_string()))
    }
}

impl Host for ScriptedHost {
    /// Frame index at capture time.
    type Frame = usize;

    fn capture(&mut self) -> Result<usize, HostError> {
        let frame = self.frame(self.position)?;
        if frame.fail_capture {
            return Err(HostError::Capture("scripted capture failure".to_string()));
        }
        self.captures += 1;
        Ok(self.position)
    }

    fn recognize(&mut self, key: &str, frame: &usize) -> Result<Recognition, HostError> {
        let scripted = self.frame(*frame)?.clone();
        if scripted.fail_recognition {
            return Err(HostError::Recognition {
                key: key.to_string(),
                reason: "scripted recognition failure".to_string(),
            });
        }

        if key == self.keys.entries {
            Ok(Recognition {
                hit: !scripted.detections.is_empty(),
                detections: scripted.detections,
            })
        } else if key == self.keys.list_bottom {
            Ok(Recognition {
                hit: scripted.at_bottom,
                detections: Vec::new(),
            })
        } else if key == self.keys.list_top {
            Ok(Recognition {
                hit: scripted.at_top,
                detections: Vec::new(),
            })
        } else {
            Err(HostError::Recognition {
                key: key.to_string(),
                reason: "key not scripted".to_string(),
            })
        }
    }

    fn click(&mut self, x: i32, y: i32) {
        self.clicks.push((x, y));
    }

    fn scroll_down(&mut self) {
        self.scroll_downs += 1;
        if self.position + 1 < self.script.frames.len() {
            self.position += 1;
        }
    }

    fn scroll_up(&mut self) {
        self.scroll_ups += 1;
        self.position = self.position.saturating_sub(1);
    }

    fn run_task(&mut self, name: &str, overrides: Option<&Value>) -> TaskReport {
        self.tasks.push(RecordedTask {
            name: name.to_string(),
            overrides: overrides.cloned(),
        });
        let succeeded = self
            .script
            .task_reports
            .get(self.next_report)
            .copied()
            .unwrap_or(true);
        self.next_report += 1;
        TaskReport { succeeded }
    }

    fn is_stopping(&self) -> bool {
        self.polls.set(self.polls.get() + 1);
        match self.script.stop_after_polls {
            Some(limit) => self.polls.get() > limit,
            None => false,
        }
    }
}
