#![forbid(unsafe_code)]

//! Label composition.
//!
//! Every event for a source collapses into a single display line:
//!
//! ```text
//! [rust-analyzer] Indexing: ⠙ crates/core ( 42%)
//! [rust-analyzer] Indexing: DONE!
//! ```
//!
//! The bracketed name comes from the host's side channel, the title sticks
//! for the whole cycle, and the tail describes the current phase. Widths
//! are measured in display columns so wide glyphs keep right-aligned labels
//! flush against the viewport edge.

use unicode_width::UnicodeWidthStr;

/// Completion marker shown when a source reports its end phase.
pub const DONE_MARKER: &str = "DONE!";

/// The phase-dependent tail of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelBody<'a> {
    /// An open cycle: spinner glyph plus optional step detail.
    Working {
        glyph: &'a str,
        message: Option<&'a str>,
        percentage: Option<u8>,
    },
    /// A finished cycle lingering until expiry.
    Done,
}

/// Everything needed to render one source's display line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelParts<'a> {
    pub name: &'a str,
    pub title: Option<&'a str>,
    pub body: LabelBody<'a>,
}

/// Renders `[Name] <title>: <body>`.
///
/// A missing title drops the `<title>: ` segment entirely; empty strings
/// count as missing so no dangling colon ever appears.
#[must_use]
pub fn render(parts: &LabelParts<'_>) -> String {
    let mut out = String::new();
    out.push('[');
    out.push_str(parts.name);
    out.push(']');
    if let Some(title) = parts.title.filter(|t| !t.is_empty()) {
        out.push(' ');
        out.push_str(title);
        out.push(':');
    }
    match parts.body {
        LabelBody::Working {
            glyph,
            message,
            percentage,
        } => {
            if !glyph.is_empty() {
                out.push(' ');
                out.push_str(glyph);
            }
            if let Some(message) = message.filter(|m| !m.is_empty()) {
                out.push(' ');
                out.push_str(message);
            }
            if let Some(pct) = percentage {
                out.push(' ');
                out.push_str(&percentage_field(pct));
            }
        }
        LabelBody::Done => {
            out.push(' ');
            out.push_str(DONE_MARKER);
        }
    }
    out
}

/// Formats the completion percentage as a fixed-width field:
/// `5` → `"(  5%)"`, `42` → `"( 42%)"`, `100` → `"(100%)"`.
#[must_use]
pub fn percentage_field(pct: u8) -> String {
    format!("({:>3}%)", pct.min(100))
}

/// Display-column width of a rendered label.
///
/// Wide glyphs count their terminal cells; widths past `u16::MAX` saturate.
#[must_use]
pub fn display_width(label: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(label)).unwrap_or(u16::MAX)
}
