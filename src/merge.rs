//! Reconstruction of logical name entries from fragmented OCR detections.
//!
//! OCR frequently splits one on-screen label into several boxes (punctuation,
//! kerning, line wraps). The merger folds vertically sorted fragments into
//! accumulators by position proximity — a deterministic single pass, not a
//! clustering algorithm.

use crate::detection::RawDetection;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum distances under which two fragments are considered part of the
/// same entry: `x` between horizontal reference positions, `y` between the
/// accumulator's bottom edge and the candidate's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MergeTolerance {
    pub x: i32,
    pub y: i32,
}

impl Default for MergeTolerance {
    fn default() -> Self {
        Self { x: 50, y: 30 }
    }
}

/// One reconstructed name label with an inferred tap point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MergedEntry {
    pub text: String,
    pub click_x: i32,
    pub click_y: i32,
    /// Left edge of the first fragment; horizontal reference for later merges.
    pub x_ref: i32,
    /// Bottom edge of the most recently merged fragment.
    pub y_bottom: i32,
}

/// Merge raw detections into logical entries.
///
/// Detections scoring below `score_threshold` are dropped. The survivors are
/// sorted by top edge and folded top-to-bottom: each detection joins the
/// first accumulator within tolerance, or starts a new one. Click
/// coordinates are the running midpoint of the merged fragments' centers
/// (integer truncation), which drifts toward the latest fragment — close
/// enough to the label's true center for reliable tapping.
///
/// Output order is accumulator creation order, first-seen-top-to-bottom.
pub fn merge_text_blocks(
    detections: &[RawDetection],
    score_threshold: f32,
    tolerance: &MergeTolerance,
) -> Vec<MergedEntry> {
    if detections.is_empty() {
        return Vec::new();
    }

    let mut kept: Vec<&RawDetection> = detections
        .iter()
        .filter(|d| d.score >= score_threshold)
        .collect();
    kept.sort_by_key(|d| d.bounds.y);

    let mut merged: Vec<MergedEntry> = Vec::new();
    for det in kept {
        let (cx, cy) = det.bounds.center();

        let slot = merged.iter_mut().find(|m| {
            (m.x_ref - det.bounds.x).abs() <= tolerance.x
                && (det.bounds.y - m.y_bottom).abs() <= tolerance.y
        });

        match slot {
            Some(entry) => {
                entry.text.push_str(&det.text);
                entry.click_x = (entry.click_x + cx) / 2;
                entry.click_y = (entry.click_y + cy) / 2;
                entry.y_bottom = det.bounds.bottom();
            }
            None => merged.push(MergedEntry {
                text: det.text.clone(),
                click_x: cx,
                click_y: cy,
                x_ref: det.bounds.x,
                y_bottom: det.bounds.bottom(),
            }),
        }
    }

    merged
}
