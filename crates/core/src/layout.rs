//! Viewport layout for the host window.
//!
//! A fixed chrome reservation stacks the tab-group bar, the tab bar, and the
//! address toolbar above the content viewport; every surface is laid out
//! into the remainder.

use warren_protocol::Bounds;

/// Height of the tab-group bar, in logical units.
pub const GROUP_BAR_HEIGHT: u32 = 35;
/// Height of the tab bar.
pub const TAB_BAR_HEIGHT: u32 = 35;
/// Height of the address/toolbar row.
pub const TOOLBAR_HEIGHT: u32 = 50;
/// Total chrome reserved above the content viewport.
pub const CHROME_HEIGHT: u32 = GROUP_BAR_HEIGHT + TAB_BAR_HEIGHT + TOOLBAR_HEIGHT;

/// Content viewport for a host window of `window` bounds.
pub fn content_viewport(window: Bounds) -> Bounds {
    Bounds::new(
        0,
        CHROME_HEIGHT as i32,
        window.width,
        window.height.saturating_sub(CHROME_HEIGHT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_reserves_chrome_height() {
        let viewport = content_viewport(Bounds::new(0, 0, 1000, 700));
        assert_eq!(viewport, Bounds::new(0, 120, 1000, 580));
    }

    #[test]
    fn viewport_height_saturates_for_tiny_windows() {
        let viewport = content_viewport(Bounds::new(0, 0, 300, 80));
        assert_eq!(viewport.height, 0);
        assert_eq!(viewport.width, 300);
    }
}
