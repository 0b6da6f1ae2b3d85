#![forbid(unsafe_code)]

//! Aggregator configuration.

use std::time::Duration;

use spindle_core::spinner;

use crate::surface::BorderStyle;

/// How long a finished source lingers on screen before its window is torn
/// down, unless a new event reactivates it first.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(5000);

/// Placement and presentation knobs.
///
/// ```
/// use std::time::Duration;
/// use spindle::{AggregatorConfig, BorderStyle};
///
/// let config = AggregatorConfig::default()
///     .grace(Duration::from_secs(2))
///     .frames(spindle_core::LINE)
///     .border(BorderStyle::Rounded);
/// assert_eq!(config.grace, Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Grace delay between a source's end event and window teardown.
    pub grace: Duration,
    /// Spinner frame set shared by every source.
    pub frames: &'static [&'static str],
    /// Border requested on window creation.
    pub border: BorderStyle,
    /// Columns kept free at the right viewport edge.
    pub margin_right: u16,
    /// Rows kept free below the anchor row.
    pub margin_bottom: u16,
    /// Rows between consecutive slots. Values below 1 behave as 1.
    pub row_height: u16,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            grace: DEFAULT_GRACE,
            frames: spinner::DOTS,
            border: BorderStyle::None,
            margin_right: 0,
            margin_bottom: 1,
            row_height: 1,
        }
    }
}

impl AggregatorConfig {
    #[must_use]
    pub fn grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    #[must_use]
    pub fn frames(mut self, frames: &'static [&'static str]) -> Self {
        self.frames = frames;
        self
    }

    #[must_use]
    pub fn border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    #[must_use]
    pub fn margin_right(mut self, columns: u16) -> Self {
        self.margin_right = columns;
        self
    }

    #[must_use]
    pub fn margin_bottom(mut self, rows: u16) -> Self {
        self.margin_bottom = rows;
        self
    }

    #[must_use]
    pub fn row_height(mut self, rows: u16) -> Self {
        self.row_height = rows;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_contract() {
        let config = AggregatorConfig::default();
        assert_eq!(config.grace, Duration::from_millis(5000));
        assert_eq!(config.frames, spinner::DOTS);
        assert_eq!(config.border, BorderStyle::None);
        assert_eq!(config.margin_right, 0);
        assert_eq!(config.margin_bottom, 1);
        assert_eq!(config.row_height, 1);
    }

    #[test]
    fn builder_methods_chain() {
        let config = AggregatorConfig::default()
            .grace(Duration::from_secs(1))
            .frames(spinner::LINE)
            .border(BorderStyle::Double)
            .margin_right(2)
            .margin_bottom(0)
            .row_height(2);
        assert_eq!(config.grace, Duration::from_secs(1));
        assert_eq!(config.frames, spinner::LINE);
        assert_eq!(config.border, BorderStyle::Double);
        assert_eq!(config.margin_right, 2);
        assert_eq!(config.margin_bottom, 0);
        assert_eq!(config.row_height, 2);
    }
}
