#![forbid(unsafe_code)]

//! Spinner frame sets and the per-source frame cursor.

pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
pub const LINE: &[&str] = &["|", "/", "-", "\\"];

/// Wrapping cursor into a spinner frame set.
///
/// The cursor stores only the index; the frame set is supplied at read time
/// so every source can share the one configured set. The index grows
/// monotonically and is reduced modulo the set length on read, so switching
/// frame sets mid-cycle stays safe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpinnerCursor {
    index: usize,
}

impl SpinnerCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances to the next frame.
    pub fn advance(&mut self) {
        self.index = self.index.wrapping_add(1);
    }

    /// Rewinds to the first frame, for a source starting a fresh cycle.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }

    /// The glyph for the current frame.
    ///
    /// An empty frame set yields an empty glyph rather than a panic.
    #[must_use]
    pub fn glyph(self, frames: &[&'static str]) -> &'static str {
        if frames.is_empty() {
            ""
        } else {
            frames[self.index % frames.len()]
        }
    }
}
