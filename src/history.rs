use heapless::String;

/// A fixed-depth ring of previously submitted lines.
///
/// New lines are written at the write pointer, overwriting the oldest entry
/// once all `DEPTH` slots are in use. A separate read pointer walks backward
/// and forward through the populated entries for recall. While no recall is
/// in progress the read pointer rests on the write pointer.
#[derive(Debug, Clone)]
pub struct History<const DEPTH: usize, const N: usize> {
    slots: [String<N>; DEPTH],
    wp: usize,
    /// How many entries back from `wp` the read pointer is. Zero means no
    /// recall is in progress.
    back: usize,
    len: usize,
}

impl<const DEPTH: usize, const N: usize> History<DEPTH, N> {
    const NONZERO_DEPTH: () = assert!(DEPTH > 0, "history depth must be non-zero");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO_DEPTH;
        Self {
            slots: [const { String::new() }; DEPTH],
            wp: 0,
            back: 0,
            len: 0,
        }
    }

    /// Number of populated entries.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the read pointer has been moved away from the write pointer.
    #[inline(always)]
    pub fn is_recalling(&self) -> bool {
        self.back != 0
    }

    fn rp(&self) -> usize {
        (self.wp + DEPTH - self.back) % DEPTH
    }

    /// Stores `line` as the newest entry and cancels any recall.
    ///
    /// Empty lines are rejected. Lines longer than `N` bytes are truncated.
    pub fn write(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return false;
        }
        let slot = &mut self.slots[self.wp];
        slot.clear();
        for c in line.chars() {
            if slot.push(c).is_err() {
                log::trace!("history entry truncated at {} bytes", slot.len());
                break;
            }
        }
        self.wp = (self.wp + 1) % DEPTH;
        self.len = core::cmp::min(self.len + 1, DEPTH);
        self.back = 0;
        true
    }

    /// The entry under the read pointer, or an empty string when no recall
    /// is in progress.
    pub fn read(&self) -> &str {
        if self.back == 0 {
            return "";
        }
        &self.slots[self.rp()]
    }

    /// Moves the read pointer to the next older entry.
    ///
    /// Refuses once the oldest populated entry has been reached.
    pub fn recall_prev(&mut self) -> bool {
        if self.back >= self.len {
            return false;
        }
        self.back += 1;
        true
    }

    /// Moves the read pointer to the next newer entry.
    ///
    /// Moving forward from the newest entry ends the recall; after that
    /// this refuses.
    pub fn recall_next(&mut self) -> bool {
        if self.back == 0 {
            return false;
        }
        self.back -= 1;
        true
    }

    pub fn reset_recall(&mut self) {
        self.back = 0;
    }

    /// Finds the `index`th entry sharing a prefix with `prefix`.
    ///
    /// The scan visits every slot once, starting at the read pointer and
    /// moving forward with wraparound, so with no recall in progress the
    /// oldest entries are visited first. An entry matches when the first
    /// `min(entry.len(), prefix.len())` bytes of both are equal and that
    /// length is non-zero.
    pub fn find(&self, index: usize, prefix: &str) -> Option<&str> {
        let start = self.rp();
        (0..DEPTH)
            .map(|i| self.slots[(start + i) % DEPTH].as_str())
            .filter(|entry| {
                let n = core::cmp::min(entry.len(), prefix.len());
                n > 0 && entry.as_bytes()[..n] == prefix.as_bytes()[..n]
            })
            .nth(index)
    }
}

impl<const DEPTH: usize, const N: usize> Default for History<DEPTH, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    type TestHistory = History<4, 16>;

    fn history(lines: &[&str]) -> TestHistory {
        let mut h = TestHistory::new();
        for line in lines {
            h.write(line);
        }
        h
    }

    #[test]
    fn empty_line_is_rejected() {
        let mut h = TestHistory::new();
        assert!(!h.write(""));
        assert!(h.is_empty());
        assert!(!h.recall_prev());
    }

    #[test]
    fn recall_walks_back_and_forward() {
        let mut h = history(&["one", "two", "three"]);
        assert_eq!(h.read(), "");
        assert!(h.recall_prev());
        assert_eq!(h.read(), "three");
        assert!(h.recall_prev());
        assert_eq!(h.read(), "two");
        assert!(h.recall_prev());
        assert_eq!(h.read(), "one");
        assert!(!h.recall_prev());
        assert_eq!(h.read(), "one");

        assert!(h.recall_next());
        assert_eq!(h.read(), "two");
        assert!(h.recall_next());
        assert!(h.recall_next());
        assert!(!h.is_recalling());
        assert_eq!(h.read(), "");
        assert!(!h.recall_next());
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut h = history(&["a", "b", "c", "d", "e"]);
        assert_eq!(h.len(), 4);
        for expected in ["e", "d", "c", "b"] {
            assert!(h.recall_prev());
            assert_eq!(h.read(), expected);
        }
        assert!(!h.recall_prev());
        assert_eq!(h.find(0, "a"), None);
    }

    #[test]
    fn write_cancels_recall() {
        let mut h = history(&["a", "b"]);
        h.recall_prev();
        h.recall_prev();
        h.write("c");
        assert!(!h.is_recalling());
        assert!(h.recall_prev());
        assert_eq!(h.read(), "c");
    }

    #[test]
    fn write_truncates_long_lines() {
        let h = history(&["0123456789abcdefXYZ"]);
        assert_eq!(h.find(0, "0"), Some("0123456789abcdef"));
    }

    #[test]
    fn find_by_prefix() {
        let h = history(&["help", "hello", "info"]);
        assert_eq!(h.find(0, "he"), Some("help"));
        assert_eq!(h.find(1, "he"), Some("hello"));
        assert_eq!(h.find(2, "he"), None);
        assert_eq!(h.find(0, "i"), Some("info"));
    }

    #[test]
    fn find_never_matches_empty_prefix() {
        let h = history(&["help"]);
        assert_eq!(h.find(0, ""), None);
    }

    #[test]
    fn find_compares_shorter_length() {
        let h = history(&["h"]);
        assert_eq!(h.find(0, "help"), Some("h"));
    }

    #[test]
    fn find_starts_at_read_pointer() {
        let mut h = history(&["ab", "ac", "ad"]);
        h.recall_prev();
        assert_eq!(h.find(0, "a"), Some("ad"));
        assert_eq!(h.find(1, "a"), Some("ab"));
    }
}
