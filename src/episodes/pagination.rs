/// Episode pagination and reindexing engine
///
/// Pure functions over `(total, episodes_per_page, order)` plus a small
/// selection state machine. Descending order flips only the index mapping
/// and labels; page windows themselves always cover ascending display
/// indices.
use tracing::debug;

use super::{DisplayOrder, PageEpisode, PageRange};

/// Partition `[0, total)` display-index space into contiguous windows of
/// `per_page`, labelling each in episode numbers under `order`
pub fn page_ranges(total: usize, per_page: usize, order: DisplayOrder) -> Vec<PageRange> {
    if total == 0 || per_page == 0 {
        return Vec::new();
    }

    let mut ranges = Vec::with_capacity(total.div_ceil(per_page));
    let mut start = 0;
    while start < total {
        let end = (start + per_page - 1).min(total - 1);
        let label = match order {
            // Labels count down from the high end even though start/end are
            // ascending display-index bounds
            DisplayOrder::Descending => format!("{} - {}", total - start, total - end),
            DisplayOrder::Ascending => format!("{} - {}", start + 1, end + 1),
        };
        ranges.push(PageRange {
            label,
            value: format!("{}-{}", start, end),
            start,
            end,
        });
        start += per_page;
    }
    ranges
}

/// Translate a display index into the original-list index to play
pub fn actual_index(display_index: usize, order: DisplayOrder, total: usize) -> usize {
    match order {
        DisplayOrder::Descending => total - 1 - display_index,
        DisplayOrder::Ascending => display_index,
    }
}

/// Episodes to render for one page window, in ascending display order
pub fn page_episodes(range: &PageRange, order: DisplayOrder, episode_names: &[String]) -> Vec<PageEpisode> {
    let total = episode_names.len();
    if total == 0 {
        return Vec::new();
    }

    let end = range.end.min(total - 1);
    (range.start..=end)
        .map(|display| {
            let actual = actual_index(display, order, total);
            PageEpisode {
                name: episode_names[actual].clone(),
                display_index: display,
                actual_index: actual,
            }
        })
        .collect()
}

/// Resolve a selected range key against the available ranges.
///
/// A stale or unknown key falls back to the first range; only an empty
/// range set yields `None`.
pub fn range_for_value<'a>(ranges: &'a [PageRange], value: &str) -> Option<&'a PageRange> {
    let first = ranges.first()?;
    Some(ranges.iter().find(|range| range.value == value).unwrap_or(first))
}

/// How the pager repositions its selection when the order, page size, or
/// episode count changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Jump to the first range (browse-only views)
    FirstRange,
    /// Keep the range containing this actual episode index visible
    /// (playback views)
    TrackEpisode(usize),
}

/// Per-view pagination state: the display order and the selected page key.
///
/// Every mutation recomputes the selection under an explicit, caller-chosen
/// policy, so a stale key after a resize or reorder resolves to a valid
/// range instead of panicking.
#[derive(Debug, Clone)]
pub struct EpisodePager {
    total: usize,
    per_page: usize,
    order: DisplayOrder,
    selected_range_value: Option<String>,
}

impl EpisodePager {
    /// Create a pager positioned on the first range
    pub fn new(total: usize, per_page: usize, order: DisplayOrder) -> Self {
        let mut pager = Self {
            total,
            per_page,
            order,
            selected_range_value: None,
        };
        pager.reselect(SelectionPolicy::FirstRange);
        pager
    }

    pub fn order(&self) -> DisplayOrder {
        self.order
    }

    /// Canonical key of the selected range, if any range exists
    pub fn selected_range_value(&self) -> Option<&str> {
        self.selected_range_value.as_deref()
    }

    /// All selectable ranges under the current order
    pub fn ranges(&self) -> Vec<PageRange> {
        page_ranges(self.total, self.per_page, self.order)
    }

    /// The selected range, after soft resolution against the current ranges
    pub fn selected_range(&self) -> Option<PageRange> {
        let ranges = self.ranges();
        let value = self.selected_range_value.as_deref().unwrap_or("");
        range_for_value(&ranges, value).cloned()
    }

    /// Select a range by its canonical key; unknown keys resolve to the
    /// first range
    pub fn select_range(&mut self, value: &str) {
        let ranges = self.ranges();
        self.selected_range_value = range_for_value(&ranges, value).map(|range| range.value.clone());
    }

    /// Switch the display order, repositioning per `policy`
    pub fn set_order(&mut self, order: DisplayOrder, policy: SelectionPolicy) {
        if self.order != order {
            self.order = order;
            self.reselect(policy);
        }
    }

    /// Apply a new page size (e.g. after a viewport resize)
    pub fn set_page_size(&mut self, per_page: usize, policy: SelectionPolicy) {
        if self.per_page != per_page {
            self.per_page = per_page;
            self.reselect(policy);
        }
    }

    /// Apply a new episode count (e.g. a different video was loaded)
    pub fn set_total(&mut self, total: usize, policy: SelectionPolicy) {
        if self.total != total {
            self.total = total;
            self.reselect(policy);
        }
    }

    /// Episodes to render for the selected page
    pub fn page(&self, episode_names: &[String]) -> Vec<PageEpisode> {
        match self.selected_range() {
            Some(range) => page_episodes(&range, self.order, episode_names),
            None => Vec::new(),
        }
    }

    fn reselect(&mut self, policy: SelectionPolicy) {
        let ranges = self.ranges();
        if ranges.is_empty() {
            self.selected_range_value = None;
            return;
        }

        let chosen = match policy {
            SelectionPolicy::FirstRange => &ranges[0],
            SelectionPolicy::TrackEpisode(actual) => {
                // The display/actual mapping is an involution, so the same
                // formula recovers the episode's display position
                let display = actual_index(actual.min(self.total.saturating_sub(1)), self.order, self.total);
                ranges
                    .iter()
                    .find(|range| range.start <= display && display <= range.end)
                    .unwrap_or(&ranges[0])
            }
        };
        debug!("📄 Selected episode page {} ({})", chosen.value, chosen.label);
        self.selected_range_value = Some(chosen.value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(total: usize) -> Vec<String> {
        (1..=total).map(|n| format!("Episode {:02}", n)).collect()
    }

    #[test]
    fn test_single_descending_page() {
        // 10 episodes on one oversized page, newest first
        let ranges = page_ranges(10, 100, DisplayOrder::Descending);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].label, "10 - 1");
        assert_eq!(ranges[0].value, "0-9");

        let episodes = page_episodes(&ranges[0], DisplayOrder::Descending, &names(10));
        assert_eq!(episodes.len(), 10);
        assert_eq!(episodes[0].display_index, 0);
        assert_eq!(episodes[0].actual_index, 9);
        assert_eq!(episodes[0].name, "Episode 10");
        assert_eq!(episodes[9].display_index, 9);
        assert_eq!(episodes[9].actual_index, 0);
        assert_eq!(episodes[9].name, "Episode 01");
    }

    #[test]
    fn test_ascending_ranges_with_truncated_tail() {
        let ranges = page_ranges(25, 10, DisplayOrder::Ascending);
        let pairs: Vec<(&str, &str)> = ranges
            .iter()
            .map(|r| (r.label.as_str(), r.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("1 - 10", "0-9"), ("11 - 20", "10-19"), ("21 - 25", "20-24")]
        );
    }

    #[test]
    fn test_descending_labels_count_down() {
        let ranges = page_ranges(25, 10, DisplayOrder::Descending);
        let labels: Vec<&str> = ranges.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["25 - 16", "15 - 6", "5 - 1"]);
        // Keys stay in display-index space regardless of order
        assert_eq!(ranges[1].value, "10-19");
    }

    #[test]
    fn test_zero_episodes() {
        assert!(page_ranges(0, 10, DisplayOrder::Ascending).is_empty());
        let pager = EpisodePager::new(0, 10, DisplayOrder::Descending);
        assert!(pager.selected_range_value().is_none());
        assert!(pager.page(&[]).is_empty());
    }

    #[test]
    fn test_inverse_law() {
        // The playback translation must agree with what page_episodes emits
        for &order in &[DisplayOrder::Ascending, DisplayOrder::Descending] {
            for total in [1usize, 7, 24, 100] {
                let list = names(total);
                for range in page_ranges(total, 10, order) {
                    for episode in page_episodes(&range, order, &list) {
                        assert_eq!(
                            actual_index(episode.display_index, order, total),
                            episode.actual_index
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_stale_range_value_falls_back_to_first() {
        let ranges = page_ranges(25, 10, DisplayOrder::Ascending);
        let resolved = range_for_value(&ranges, "40-49").unwrap();
        assert_eq!(resolved.value, "0-9");
        assert!(range_for_value(&[], "0-9").is_none());
    }

    #[test]
    fn test_pager_survives_page_size_change() {
        let mut pager = EpisodePager::new(100, 40, DisplayOrder::Ascending);
        pager.select_range("40-79");
        assert_eq!(pager.selected_range_value(), Some("40-79"));

        // Resize to a narrower viewport: "40-79" no longer exists, the
        // browse policy resets to the first range
        pager.set_page_size(16, SelectionPolicy::FirstRange);
        assert_eq!(pager.selected_range_value(), Some("0-15"));
    }

    #[test]
    fn test_pager_tracks_playing_episode_across_reorder() {
        // Watching actual episode 3 of 50, ascending, 10 per page
        let mut pager = EpisodePager::new(50, 10, DisplayOrder::Ascending);
        pager.set_order(DisplayOrder::Ascending, SelectionPolicy::TrackEpisode(3));
        assert_eq!(pager.selected_range_value(), Some("0-9"));

        // Flip to descending: episode 3 now sits at display index 46
        pager.set_order(DisplayOrder::Descending, SelectionPolicy::TrackEpisode(3));
        assert_eq!(pager.selected_range_value(), Some("40-49"));

        let episodes = pager.page(&names(50));
        assert!(episodes.iter().any(|e| e.actual_index == 3));
    }

    #[test]
    fn test_pager_tracks_episode_after_resize() {
        let mut pager = EpisodePager::new(100, 40, DisplayOrder::Ascending);
        pager.set_page_size(16, SelectionPolicy::TrackEpisode(50));
        assert_eq!(pager.selected_range_value(), Some("48-63"));
    }

    #[test]
    fn test_select_unknown_range_resolves_soft() {
        let mut pager = EpisodePager::new(25, 10, DisplayOrder::Ascending);
        pager.select_range("999-1010");
        assert_eq!(pager.selected_range_value(), Some("0-9"));
    }

    #[test]
    fn test_page_clamps_to_shorter_list() {
        // Range computed for 25 episodes applied to a 22-name list must not
        // index out of bounds
        let ranges = page_ranges(25, 10, DisplayOrder::Ascending);
        let episodes = page_episodes(&ranges[2], DisplayOrder::Ascending, &names(22));
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes.last().unwrap().actual_index, 21);
    }
}
