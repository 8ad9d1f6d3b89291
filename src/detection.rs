use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Integer pixel rectangle, origin at the top-left of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Center point, truncating toward zero.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

/// One raw OCR-reported text fragment for a single capture.
///
/// Short-lived: produced by the host's recognizer, consumed by the merger,
/// never stored across scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawDetection {
    pub text: String,
    /// Recognizer confidence in [0, 1].
    pub score: f32,
    pub bounds: Rect,
}

impl RawDetection {
    pub fn new(text: impl Into<String>, score: f32, bounds: Rect) -> Self {
        Self {
            text: text.into(),
            score,
            bounds,
        }
    }
}

/// Result of one named recognition call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Recognition {
    /// Whether the recognizer considers itself triggered. Sentinel
    /// recognizers carry their whole answer here.
    pub hit: bool,
    #[serde(default)]
    pub detections: Vec<RawDetection>,
}

impl Recognition {
    pub fn hit(detections: Vec<RawDetection>) -> Self {
        Self {
            hit: true,
            detections,
        }
    }

    pub fn miss() -> Self {
        Self {
            hit: false,
            detections: Vec::new(),
        }
    }
}
