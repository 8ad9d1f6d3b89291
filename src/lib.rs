pub mod config;
pub mod detection;
pub mod followup;
pub mod host;
pub mod locator;
pub mod matcher;
pub mod merge;
pub mod search;
pub mod target;

pub use detection::{RawDetection, Recognition, Rect};
pub use locator::EntryLocator;
pub use merge::{MergeTolerance, MergedEntry, merge_text_blocks};
pub use search::{PaginatedSearchController, SearchOutcome};
pub use target::{GiftOption, TargetSpec};
