//! Desktop/mobile layout switch.

/// Widest viewport, in CSS pixels, that still gets the mobile layout.
pub const MOBILE_MAX_WIDTH: u32 = 991;

/// Which filter UI the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Filter bar with a bottom sheet.
    Mobile,
    /// Sidebar filter form.
    #[default]
    Desktop,
}

impl LayoutMode {
    #[must_use]
    pub const fn for_width(width: u32) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile)
    }

    /// Whether the mobile filter bar is shown.
    #[must_use]
    pub const fn shows_filter_bar(self) -> bool {
        self.is_mobile()
    }

    /// Whether the desktop sidebar is shown.
    #[must_use]
    pub const fn shows_sidebar(self) -> bool {
        !self.is_mobile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint() {
        assert_eq!(LayoutMode::for_width(375), LayoutMode::Mobile);
        assert_eq!(LayoutMode::for_width(991), LayoutMode::Mobile);
        assert_eq!(LayoutMode::for_width(992), LayoutMode::Desktop);
    }

    #[test]
    fn test_one_filter_ui_at_a_time() {
        for mode in [LayoutMode::Mobile, LayoutMode::Desktop] {
            assert_ne!(mode.shows_filter_bar(), mode.shows_sidebar());
        }
    }
}
