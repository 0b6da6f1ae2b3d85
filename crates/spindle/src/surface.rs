#![forbid(unsafe_code)]

//! The display-surface collaborator boundary.
//!
//! The aggregator never draws. It issues a four-call command set against
//! whatever the host provides: a floating editor window, a terminal overlay
//! region, a headless recorder in tests. Commands flow one way; the
//! aggregator never reads the surface back, so hosts are free to batch,
//! coalesce, or throttle the actual drawing.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;

/// Host dimensions that placement math works against.
///
/// Defaults to the classic 80x24 when the host never reports a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Opaque identifier minted by the surface when a window is created.
///
/// Handles are meaningful only to the surface that minted them; the
/// aggregator stores and replays them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceHandle(u64);

impl SurfaceHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Border treatment requested at creation. Interpretation is the host's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BorderStyle {
    #[default]
    None,
    Plain,
    Rounded,
    Double,
}

/// What a host must provide to display progress lines.
///
/// Every call may fail with a [`SurfaceError`]; the aggregator logs and
/// degrades rather than propagating, so implementations should prefer
/// returning errors over panicking.
pub trait Surface {
    /// Creates a window of `width` x `height` cells at (`row`, `col`) and
    /// returns its handle.
    fn create(
        &mut self,
        width: u16,
        height: u16,
        row: u16,
        col: u16,
        border: BorderStyle,
    ) -> Result<SurfaceHandle, SurfaceError>;

    /// Moves and resizes an existing window. Height never changes.
    fn reposition(
        &mut self,
        handle: SurfaceHandle,
        width: u16,
        row: u16,
        col: u16,
    ) -> Result<(), SurfaceError>;

    /// Replaces the window's single line of content.
    fn set_text(&mut self, handle: SurfaceHandle, text: &str) -> Result<(), SurfaceError>;

    /// Releases the window and its handle.
    fn destroy(&mut self, handle: SurfaceHandle) -> Result<(), SurfaceError>;
}

/// Record of one surface call that actually succeeded.
///
/// Batches of these come back from the aggregator so hosts and tests can
/// observe what was issued without wrapping the surface themselves.
/// `Create` additionally carries the handle the surface minted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SurfaceOp {
    Create {
        handle: SurfaceHandle,
        width: u16,
        height: u16,
        row: u16,
        col: u16,
        border: BorderStyle,
    },
    Reposition {
        handle: SurfaceHandle,
        width: u16,
        row: u16,
        col: u16,
    },
    SetText {
        handle: SurfaceHandle,
        text: String,
    },
    Destroy {
        handle: SurfaceHandle,
    },
}

impl SurfaceOp {
    /// The handle this op touched.
    #[must_use]
    pub fn handle(&self) -> SurfaceHandle {
        match self {
            SurfaceOp::Create { handle, .. }
            | SurfaceOp::Reposition { handle, .. }
            | SurfaceOp::SetText { handle, .. }
            | SurfaceOp::Destroy { handle } => *handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_defaults_to_80_by_24() {
        assert_eq!(Viewport::default(), Viewport::new(80, 24));
    }

    #[test]
    fn handle_displays_with_prefix() {
        assert_eq!(SurfaceHandle::new(7).to_string(), "surface#7");
    }

    #[test]
    fn border_style_defaults_to_none() {
        assert_eq!(BorderStyle::default(), BorderStyle::None);
    }

    #[test]
    fn op_handle_is_uniform_across_variants() {
        let handle = SurfaceHandle::new(3);
        let ops = [
            SurfaceOp::Create {
                handle,
                width: 10,
                height: 1,
                row: 0,
                col: 0,
                border: BorderStyle::None,
            },
            SurfaceOp::Reposition {
                handle,
                width: 10,
                row: 0,
                col: 0,
            },
            SurfaceOp::SetText {
                handle,
                text: "x".to_owned(),
            },
            SurfaceOp::Destroy { handle },
        ];
        assert!(ops.iter().all(|op| op.handle() == handle));
    }
}
