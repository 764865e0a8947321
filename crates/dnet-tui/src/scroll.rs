//! Scroll position of the message pane.

use unicode_width::UnicodeWidthChar;

/// Scroll mode for the message pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Show the newest messages at the bottom of the pane.
    FollowLatest,
    /// User scrolled manually; offset is the first visible row.
    Anchored { offset: usize },
}

/// Scroll state for the message pane.
///
/// Rows are counted after wrapping, so `line_count` must be refreshed
/// whenever the messages or the pane width change.
#[derive(Debug, Clone)]
pub struct ScrollState {
    pub mode: ScrollMode,
    /// Total wrapped rows of the current message list.
    pub line_count: usize,
    /// Visible rows of the message pane.
    pub viewport_height: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            mode: ScrollMode::FollowLatest,
            line_count: 0,
            viewport_height: 0,
        }
    }
}

impl ScrollState {
    pub fn is_following(&self) -> bool {
        matches!(self.mode, ScrollMode::FollowLatest)
    }

    fn max_offset(&self) -> usize {
        self.line_count.saturating_sub(self.viewport_height)
    }

    /// First visible row.
    pub fn offset(&self) -> usize {
        match self.mode {
            ScrollMode::FollowLatest => self.max_offset(),
            ScrollMode::Anchored { offset } => offset.min(self.max_offset()),
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let offset = self.offset().saturating_sub(lines);
        self.mode = ScrollMode::Anchored { offset };
    }

    /// Scrolls down, switching back to follow mode at the bottom.
    pub fn scroll_down(&mut self, lines: usize) {
        if self.is_following() {
            return;
        }
        let offset = (self.offset() + lines).min(self.max_offset());
        self.mode = if offset >= self.max_offset() {
            ScrollMode::FollowLatest
        } else {
            ScrollMode::Anchored { offset }
        };
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.mode = ScrollMode::Anchored { offset: 0 };
    }

    pub fn scroll_to_bottom(&mut self) {
        self.mode = ScrollMode::FollowLatest;
    }
}

/// Splits `text` into rows no wider than `width` display columns.
///
/// Every message yields at least one row, so an empty message still takes
/// up a line. Embedded newlines start a new row.
pub fn wrap_message(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for segment in text.split('\n') {
        let mut row = String::new();
        let mut used = 0;
        for c in segment.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                used = 0;
            }
            row.push(c);
            used += w;
        }
        rows.push(row);
    }

    rows
}

/// Total wrapped rows for `messages` at `width`.
pub fn wrapped_height(messages: &[String], width: usize) -> usize {
    messages.iter().map(|m| wrap_message(m, width).len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(line_count: usize, viewport_height: usize) -> ScrollState {
        ScrollState {
            line_count,
            viewport_height,
            ..ScrollState::default()
        }
    }

    #[test]
    fn test_follow_shows_bottom() {
        let scroll = state(30, 10);
        assert!(scroll.is_following());
        assert_eq!(scroll.offset(), 20);

        let short = state(4, 10);
        assert_eq!(short.offset(), 0);
    }

    #[test]
    fn test_scroll_up_then_back_down_resumes_follow() {
        let mut scroll = state(30, 10);
        scroll.scroll_up(5);
        assert_eq!(scroll.mode, ScrollMode::Anchored { offset: 15 });

        scroll.scroll_down(2);
        assert_eq!(scroll.offset(), 17);

        scroll.scroll_down(10);
        assert!(scroll.is_following());
    }

    #[test]
    fn test_page_navigation() {
        let mut scroll = state(50, 10);
        scroll.page_up();
        assert_eq!(scroll.offset(), 30);
        scroll.scroll_to_top();
        assert_eq!(scroll.offset(), 0);
        scroll.page_down();
        assert_eq!(scroll.offset(), 10);
        scroll.scroll_to_bottom();
        assert_eq!(scroll.offset(), 40);
    }

    #[test]
    fn test_anchored_offset_is_clamped() {
        let mut scroll = state(30, 10);
        scroll.mode = ScrollMode::Anchored { offset: 25 };
        scroll.line_count = 12;
        assert_eq!(scroll.offset(), 2);
    }

    #[test]
    fn test_wrap_message() {
        assert_eq!(wrap_message("", 10), vec![""]);
        assert_eq!(wrap_message("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_message("ab\ncd", 10), vec!["ab", "cd"]);
        // Wide characters count double.
        assert_eq!(wrap_message("水水水", 4), vec!["水水", "水"]);
    }

    #[test]
    fn test_wrapped_height() {
        let messages = vec!["abcdef".to_string(), String::new(), "xy".to_string()];
        assert_eq!(wrapped_height(&messages, 4), 4);
    }
}
