//! Scroll viewport that keeps the selected control visible.

use glam::Vec2;
use soulkeeper_core::ScreenRect;

/// Visible window over scrollable content, in content coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollViewport {
    offset: Vec2,
    size: Vec2,
}

impl ScrollViewport {
    /// Creates a viewport of the provided size scrolled to the content origin.
    #[must_use]
    pub fn new(size: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            size: size.max(Vec2::ZERO),
        }
    }

    /// Current scroll offset of the content origin.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Size of the visible window.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Region of the content currently visible.
    #[must_use]
    pub fn visible(&self) -> ScreenRect {
        ScreenRect::new(self.offset, self.size)
    }

    /// Scrolls back to the content origin.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
    }

    /// Scrolls by the smallest amount that brings `target` fully into view.
    ///
    /// Returns the applied delta, or `None` when the target was already
    /// visible. A target larger than the viewport is aligned to its leading edge.
    pub fn scroll_into_view(&mut self, target: &ScreenRect) -> Option<Vec2> {
        let visible = self.visible();
        let delta = Vec2::new(
            axis_delta(visible.min().x, visible.max().x, target.min().x, target.max().x),
            axis_delta(visible.min().y, visible.max().y, target.min().y, target.max().y),
        );
        if delta == Vec2::ZERO {
            return None;
        }
        self.offset += delta;
        Some(delta)
    }
}

fn axis_delta(view_min: f32, view_max: f32, target_min: f32, target_max: f32) -> f32 {
    if target_min < view_min {
        target_min - view_min
    } else if target_max > view_max {
        (target_max - view_max).min(target_min - view_min)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(top: f32) -> ScreenRect {
        ScreenRect::new(Vec2::new(0.0, top), Vec2::new(80.0, 40.0))
    }

    #[test]
    fn visible_targets_do_not_scroll() {
        let mut viewport = ScrollViewport::new(Vec2::new(100.0, 100.0));
        assert_eq!(viewport.scroll_into_view(&row(60.0)), None);
        assert_eq!(viewport.offset(), Vec2::ZERO);
    }

    #[test]
    fn targets_below_scroll_just_enough() {
        let mut viewport = ScrollViewport::new(Vec2::new(100.0, 100.0));
        assert_eq!(
            viewport.scroll_into_view(&row(120.0)),
            Some(Vec2::new(0.0, 60.0))
        );
        assert!(viewport.visible().contains_rect(&row(120.0)));
    }

    #[test]
    fn targets_above_align_to_the_top() {
        let mut viewport = ScrollViewport::new(Vec2::new(100.0, 100.0));
        let _ = viewport.scroll_into_view(&row(200.0));
        assert_eq!(
            viewport.scroll_into_view(&row(40.0)),
            Some(Vec2::new(0.0, -100.0))
        );
        assert_eq!(viewport.offset(), Vec2::new(0.0, 40.0));
    }

    #[test]
    fn oversized_targets_align_their_leading_edge() {
        let mut viewport = ScrollViewport::new(Vec2::new(100.0, 20.0));
        let _ = viewport.scroll_into_view(&row(50.0));
        assert_eq!(viewport.offset(), Vec2::new(0.0, 50.0));
    }
}
