/// Episode pagination module
///
/// This module turns a flat, source-supplied episode list into windowed
/// pages under a user-selectable display order, and owns the forward and
/// inverse index mapping between what the user sees and the underlying
/// episode list.

pub mod pagination;

// Re-export main types
pub use pagination::{
    actual_index, page_episodes, page_ranges, range_for_value, EpisodePager, SelectionPolicy,
};

use serde::{Deserialize, Serialize};

/// Order in which episodes are presented to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayOrder {
    /// Episode 1 first
    #[default]
    Ascending,
    /// Latest episode first
    Descending,
}

/// A contiguous window of display indices selectable as one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    /// Human-readable label, phrased in episode numbers under the current
    /// display order
    pub label: String,

    /// Canonical `"start-end"` key identifying the selected page
    pub value: String,

    /// First display index of the window (inclusive)
    pub start: usize,

    /// Last display index of the window (inclusive)
    pub end: usize,
}

/// One episode as rendered on the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEpisode {
    /// Episode display name from the source-supplied list
    pub name: String,

    /// Position within the current display order
    pub display_index: usize,

    /// Position within the original episode list, used for playback
    pub actual_index: usize,
}
