//! Incremental page window for infinite scroll.
//!
//! The window exposes a growing prefix of the filtered, sorted result.
//! It only ever grows within one filter session; any criteria change
//! resets it to a single page and abandons an in-flight extension.

/// Items added per extension, matching the original listing views.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Scroll proximity (in pixels) to the bottom of the rendered content
/// that arms an extension.
pub const NEAR_BOTTOM_THRESHOLD_PX: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Extending,
}

#[derive(Debug, Clone)]
pub struct PageWindow {
    page_size: usize,
    pages: usize,
    phase: Phase,
}

impl PageWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            pages: 1,
            phase: Phase::Idle,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// How many of `total` filtered items are currently materialized.
    /// Always computed against the caller's current total, never a
    /// stored count, so a shrunken result set can never leave the
    /// window pointing past the end.
    pub fn visible_count(&self, total: usize) -> usize {
        (self.pages * self.page_size).min(total)
    }

    pub fn fully_shown(&self, total: usize) -> bool {
        self.pages * self.page_size >= total
    }

    pub fn is_extending(&self) -> bool {
        self.phase == Phase::Extending
    }

    /// Arms an extension. Returns false (and changes nothing) when one
    /// is already in flight or the whole result is on screen.
    pub fn begin_extension(&mut self, total: usize) -> bool {
        if self.phase == Phase::Extending || self.fully_shown(total) {
            return false;
        }
        self.phase = Phase::Extending;
        true
    }

    /// Completes an armed extension, growing the window by one page.
    /// A settle landing after a reset finds the window idle and is
    /// ignored.
    pub fn settle(&mut self) -> bool {
        if self.phase != Phase::Extending {
            return false;
        }
        self.pages += 1;
        self.phase = Phase::Idle;
        true
    }

    /// Hard reset on criteria change: back to one page, any in-flight
    /// extension abandoned.
    pub fn reset(&mut self) {
        self.pages = 1;
        self.phase = Phase::Idle;
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// The scroll-position check the rendering layer runs on every scroll
/// event before asking the session to extend.
pub fn near_bottom(scroll_top: f64, viewport_height: f64, content_height: f64) -> bool {
    scroll_top + viewport_height + NEAR_BOTTOM_THRESHOLD_PX >= content_height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extend(window: &mut PageWindow, total: usize) -> bool {
        if !window.begin_extension(total) {
            return false;
        }
        window.settle()
    }

    #[test]
    fn grows_by_one_page_per_settled_extension_and_caps_at_total() {
        let mut window = PageWindow::new(20);
        let total = 55;

        assert_eq!(window.visible_count(total), 20);

        assert!(extend(&mut window, total));
        assert_eq!(window.visible_count(total), 40);

        assert!(extend(&mut window, total));
        assert_eq!(window.visible_count(total), 55);

        // Fully shown: a fourth trigger must not arm anything.
        assert!(!extend(&mut window, total));
        assert_eq!(window.visible_count(total), 55);
    }

    #[test]
    fn does_not_arm_while_an_extension_is_in_flight() {
        let mut window = PageWindow::new(20);
        assert!(window.begin_extension(100));
        assert!(!window.begin_extension(100));
        assert!(window.settle());
        assert!(window.begin_extension(100));
    }

    #[test]
    fn reset_returns_to_one_page_and_caps_to_a_smaller_result() {
        let mut window = PageWindow::new(20);
        for _ in 0..3 {
            extend(&mut window, 55);
        }
        assert_eq!(window.visible_count(55), 55);

        // Criteria change: the new result only has 10 matches.
        window.reset();
        assert_eq!(window.visible_count(10), 10);
        assert_eq!(window.visible_count(55), 20);
    }

    #[test]
    fn reset_abandons_an_in_flight_extension() {
        let mut window = PageWindow::new(20);
        assert!(window.begin_extension(100));
        window.reset();

        // The stale settle lands after the reset and must not grow the
        // fresh window.
        assert!(!window.settle());
        assert_eq!(window.visible_count(100), 20);
    }

    #[test]
    fn short_result_is_fully_shown_from_the_start() {
        let mut window = PageWindow::new(20);
        assert!(window.fully_shown(7));
        assert!(!window.begin_extension(7));
        assert_eq!(window.visible_count(7), 7);
    }

    #[test]
    fn near_bottom_uses_the_fixed_threshold() {
        assert!(near_bottom(700.0, 800.0, 1700.0));
        assert!(near_bottom(701.0, 800.0, 1700.0));
        assert!(!near_bottom(699.0, 800.0, 1700.0));
    }
}
