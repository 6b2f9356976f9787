use crate::numbers::clamp;

/// Bias added to the scroll position so a section becomes active slightly
/// before it reaches the top of the viewport.
pub const ACTIVE_SECTION_LOOKAHEAD: f64 = 150.0;
pub const NAV_HEADER_OFFSET: f64 = 80.0;
pub const SCROLLED_THRESHOLD: f64 = 50.0;
pub const REVEAL_RATIO: f64 = 0.8;
pub const MOBILE_BREAKPOINT: f64 = 768.0;
pub const HERO_SECTION_ID: &str = "hero";

#[derive(Debug, Clone, PartialEq)]
pub struct SectionOffset {
    pub id: String,
    pub top: f64,
}

impl SectionOffset {
    pub fn new(id: impl Into<String>, top: f64) -> Self {
        Self {
            id: id.into(),
            top,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub document_height: f64,
    pub viewport_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// Id of the last section whose top lies at or above `scroll_y` plus
/// [`ACTIVE_SECTION_LOOKAHEAD`], falling back to the first section.
pub fn active_section(sections: &[SectionOffset], scroll_y: f64) -> Option<&str> {
    active_section_with_lookahead(sections, scroll_y, ACTIVE_SECTION_LOOKAHEAD)
}

/// [`active_section`] with a configurable lookahead.
pub fn active_section_with_lookahead(
    sections: &[SectionOffset],
    scroll_y: f64,
    lookahead: f64,
) -> Option<&str> {
    let position = scroll_y + lookahead;

    sections
        .iter()
        .rev()
        .find(|section| section.top <= position)
        .or_else(|| sections.first())
        .map(|section| section.id.as_str())
}

/// Percentage of the document scrolled, in `[0, 100]`.
///
/// A page no taller than the viewport has nothing to scroll and reports 0.
pub fn scroll_progress(metrics: ScrollMetrics) -> f64 {
    let track = metrics.document_height - metrics.viewport_height;
    if track <= 0.0 || !track.is_finite() {
        return 0.0;
    }
    let progress = clamp(metrics.scroll_top / track * 100.0, 0.0, 100.0);
    if progress.is_nan() {
        0.0
    } else {
        progress
    }
}

/// True when the rect lies completely inside the viewport.
pub fn is_in_viewport(rect: BoundingRect, viewport_width: f64, viewport_height: f64) -> bool {
    rect.top >= 0.0
        && rect.left >= 0.0
        && rect.bottom <= viewport_height
        && rect.right <= viewport_width
}

pub fn should_reveal(rect_top: f64, viewport_height: f64, ratio: f64) -> bool {
    rect_top < viewport_height * ratio
}

pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Scroll position for a nav link's target. The hero sits flush with the
/// top; everything else clears the fixed header.
pub fn nav_scroll_target(target_id: &str, offset_top: f64, header_offset: f64) -> f64 {
    if target_id == HERO_SECTION_ID {
        offset_top
    } else {
        offset_top - header_offset
    }
}

pub fn should_close_menu_on_resize(viewport_width: f64, breakpoint: f64, menu_open: bool) -> bool {
    menu_open && viewport_width > breakpoint
}

/// `"#section"` → `"section"`; anything that is not a fragment link yields `None`.
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}
