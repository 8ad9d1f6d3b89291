//! The paginated-search state machine: scan, match, scroll, re-scan.

use crate::config::SearchConfig;
use crate::followup;
use crate::host::Host;
use crate::locator::EntryLocator;
use crate::target::{NodeData, TargetSpec};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of processing one target: whether it was clicked, and whether the
/// list must be scrolled back to the top before the next target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchOutcome {
    pub found: bool,
    pub needs_scroll_reset: bool,
}

/// The batch was cancelled by the host's stop signal.
struct Cancelled;

pub struct PaginatedSearchController {
    config: SearchConfig,
    locator: EntryLocator,
}

impl PaginatedSearchController {
    pub fn new(config: SearchConfig) -> Self {
        let locator = EntryLocator::from_config(&config);
        Self { config, locator }
    }

    /// Process every target in order. Returns true iff the whole batch was
    /// processed (each target found or exhausted) without cancellation.
    pub fn run<H: Host>(&self, host: &mut H, targets: &[TargetSpec]) -> bool {
        for spec in targets {
            if spec.name.is_empty() {
                debug!("skipping target with empty name");
                continue;
            }

            info!("searching list for '{}'", spec.name);
            match self.process_target(host, spec) {
                Ok(outcome) => {
                    info!(
                        "target '{}': found={}, reset={}",
                        spec.name, outcome.found, outcome.needs_scroll_reset
                    );
                    if outcome.needs_scroll_reset && self.scroll_to_top(host).is_err() {
                        warn!("cancelled while scrolling back to top");
                        return false;
                    }
                }
                Err(Cancelled) => {
                    warn!("cancelled while searching for '{}'", spec.name);
                    return false;
                }
            }

            if host.is_stopping() {
                warn!("cancelled after processing '{}'", spec.name);
                return false;
            }
        }
        true
    }

    /// Like [`run`](Self::run), but extracting each target from loosely
    /// structured node data first. Nodes whose extraction fails are logged
    /// and skipped exactly like empty-name targets.
    pub fn run_nodes<H: Host>(&self, host: &mut H, nodes: &[NodeData]) -> bool {
        let targets: Vec<TargetSpec> = nodes
            .iter()
            .map(|node| match TargetSpec::from_node(&node.data) {
                Ok(spec) => spec,
                Err(e) => {
                    warn!("skipping node '{}': {}", node.label, e);
                    TargetSpec::new("", crate::target::GiftOption::None)
                }
            })
            .collect();
        self.run(host, &targets)
    }

    /// One target's scan loop. Scans, clicks and runs the follow-on flow on
    /// a match, otherwise scrolls down until the bottom sentinel hits.
    fn process_target<H: Host>(
        &self,
        host: &mut H,
        spec: &TargetSpec,
    ) -> Result<SearchOutcome, Cancelled> {
        let mut scans = 0u32;
        loop {
            if host.is_stopping() {
                return Err(Cancelled);
            }
            scans += 1;

            if let Some(entry) = self.locator.locate(host, spec, &self.config.keys.entries) {
                info!(
                    "clicking '{}' at ({}, {}) after {} scans",
                    entry.text, entry.click_x, entry.click_y, scans
                );
                host.click(entry.click_x, entry.click_y);

                let invocation = followup::invitation(spec.gift_option, &self.config.tasks);
                let report = host.run_task(&invocation.task, invocation.overrides.as_ref());
                if !report.succeeded {
                    warn!("follow-on task '{}' reported failure", invocation.task);
                }
                // Matched: scanning stops here no matter how the follow-on
                // flow went; only the reset decision depends on it.
                return Ok(SearchOutcome {
                    found: true,
                    needs_scroll_reset: !report.succeeded,
                });
            }

            host.scroll_down();
            if Self::sentinel_hit(host, &self.config.keys.list_bottom) {
                debug!("bottom of list after {} scans, giving up on '{}'", scans, spec.name);
                return Ok(SearchOutcome {
                    found: false,
                    needs_scroll_reset: true,
                });
            }
        }
    }

    /// Scroll back until the top sentinel hits or cancellation fires.
    fn scroll_to_top<H: Host>(&self, host: &mut H) -> Result<(), Cancelled> {
        debug!("scrolling back to the top of the list");
        loop {
            if host.is_stopping() {
                return Err(Cancelled);
            }
            host.scroll_up();
            if Self::sentinel_hit(host, &self.config.keys.list_top) {
                return Ok(());
            }
        }
    }

    /// Query a boundary sentinel. A capture or recognition failure reads as
    /// "boundary reached" — fail-safe toward stopping rather than looping
    /// forever.
    fn sentinel_hit<H: Host>(host: &mut H, key: &str) -> bool {
        let frame = match host.capture() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("treating capture failure as boundary: {}", e);
                return true;
            }
        };
        match host.recognize(key, &frame) {
            Ok(recognition) => recognition.hit,
            Err(e) => {
                warn!("treating sentinel failure as boundary: {}", e);
                true
            }
        }
    }
}
