//! Display readiness checks.
//!
//! The relay only encodes while the consumer's display surface is usable.
//! A hidden or zero-sized surface skips the tick; the sink keeps whatever
//! was published last.

/// State of the host display surface at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    /// Host window is minimized to an icon.
    pub iconified: bool,
    /// Surface is connected to a displayable hierarchy.
    pub displayable: bool,
    /// Surface width in pixels.
    pub width: i32,
    /// Surface height in pixels.
    pub height: i32,
}

impl DisplayState {
    /// A visible surface of the given size.
    pub fn visible(width: i32, height: i32) -> Self {
        Self {
            iconified: false,
            displayable: true,
            width,
            height,
        }
    }

    /// Whether encoding may proceed this tick.
    pub fn is_ready(&self) -> bool {
        !self.iconified && self.displayable && self.width > 0 && self.height > 0
    }
}

/// Seam to the host window system.
///
/// Implemented by whatever owns the actual surface; tests provide fixed
/// states.
pub trait DisplayProbe: Send + Sync {
    /// Current display state, sampled once per tick.
    fn display_state(&self) -> DisplayState;
}

/// A probe reporting a constant display state.
///
/// Useful for headless recorders, which are always ready, and for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedDisplay(pub DisplayState);

impl DisplayProbe for FixedDisplay {
    fn display_state(&self) -> DisplayState {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_surface_is_ready() {
        assert!(DisplayState::visible(800, 600).is_ready());
    }

    #[test]
    fn test_iconified_is_not_ready() {
        let state = DisplayState {
            iconified: true,
            ..DisplayState::visible(800, 600)
        };
        assert!(!state.is_ready());
    }

    #[test]
    fn test_undisplayable_is_not_ready() {
        let state = DisplayState {
            displayable: false,
            ..DisplayState::visible(800, 600)
        };
        assert!(!state.is_ready());
    }

    #[test]
    fn test_zero_or_negative_size_is_not_ready() {
        assert!(!DisplayState::visible(0, 600).is_ready());
        assert!(!DisplayState::visible(800, 0).is_ready());
        assert!(!DisplayState::visible(-1, 600).is_ready());
        assert!(!DisplayState::visible(800, -1).is_ready());
    }
}
