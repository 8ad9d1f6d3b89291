use crate::config::SearchConfig;
use crate::host::Host;
use crate::matcher;
use crate::merge::{MergeTolerance, MergedEntry, merge_text_blocks};
use crate::target::TargetSpec;
use tracing::{debug, warn};

/// Single-capture query over the visible list region: capture, recognize,
/// merge, fuzzy-match. Purely a query; the only side effects are the host's
/// capture and recognition calls.
#[derive(Debug, Clone)]
pub struct EntryLocator {
    pub score_threshold: f32,
    pub similarity_limit: f64,
    pub tolerance: MergeTolerance,
}

impl EntryLocator {
    pub fn new(score_threshold: f32, similarity_limit: f64, tolerance: MergeTolerance) -> Self {
        Self {
            score_threshold,
            similarity_limit,
            tolerance,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.score_threshold, config.similarity_limit, config.merge)
    }

    /// Return the first merged entry matching the target's name, in merge
    /// output order (first-match-wins, not best-match).
    ///
    /// A capture or recognition failure is reported as "not found": at this
    /// layer the caller cannot distinguish an absent target from a sensor
    /// failure. The failure is logged so it is at least visible.
    pub fn locate<H: Host>(
        &self,
        host: &mut H,
        target: &TargetSpec,
        key: &str,
    ) -> Option<MergedEntry> {
        let frame = match host.capture() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("treating capture failure as not-found: {}", e);
                return None;
            }
        };
        let recognition = match host.recognize(key, &frame) {
            Ok(recognition) => recognition,
            Err(e) => {
                warn!("treating recognition failure as not-found: {}", e);
                return None;
            }
        };

        let entries = merge_text_blocks(&recognition.detections, self.score_threshold, &self.tolerance);
        debug!("merged {} detections into {} entries", recognition.detections.len(), entries.len());

        for entry in entries {
            if matcher::is_match(&entry.text, &target.name, self.similarity_limit) {
                debug!(
                    "entry '{}' matches target '{}' at ({}, {})",
                    entry.text, target.name, entry.click_x, entry.click_y
                );
                return Some(entry);
            }
            debug!("entry '{}' does not match target '{}'", entry.text, target.name);
        }
        None
    }
}

impl Default for EntryLocator {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}
