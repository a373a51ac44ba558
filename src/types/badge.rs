/// Glyph shown on the badge right after a page is saved.
pub const CONFIRMATION_GLYPH: &str = "✓";

/// Text and background color of the toolbar badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub color: String,
}

impl Badge {
    pub fn new(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: color.into(),
        }
    }
}

/// Save-feedback phases of the badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgePhase {
    /// Nothing has been written to the toolbar yet in this context.
    Idle,
    /// The confirmation glyph is showing and its timer is running.
    Confirming,
    /// The badge shows the count (or nothing).
    Steady,
}

/// Toolbar icon paths for each rendered size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSet {
    pub size_48: &'static str,
    pub size_128: &'static str,
    pub size_256: &'static str,
}
