#![forbid(unsafe_code)]

//! A surface that records instead of drawing.

use std::collections::BTreeSet;

use spindle::{BorderStyle, Surface, SurfaceError, SurfaceHandle, SurfaceOp};

/// Records every call, validates handles, and mints them sequentially
/// starting at 1.
///
/// Creation failures can be injected with
/// [`fail_next_creates`](RecordingSurface::fail_next_creates) to exercise
/// the retry-on-next-event path.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    next_handle: u64,
    live: BTreeSet<u64>,
    fail_creates: u32,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` create calls fail.
    pub fn fail_next_creates(&mut self, count: u32) {
        self.fail_creates = count;
    }

    /// Every call recorded so far, in order.
    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drains the recorded calls.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Handles created and not yet destroyed, in creation order.
    #[must_use]
    pub fn live_handles(&self) -> Vec<SurfaceHandle> {
        self.live.iter().copied().map(SurfaceHandle::new).collect()
    }

    /// Total number of handles ever minted.
    #[must_use]
    pub fn created(&self) -> u64 {
        self.next_handle
    }

    /// Every text ever set on `handle`, oldest first.
    #[must_use]
    pub fn texts_for(&self, handle: SurfaceHandle) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::SetText { handle: h, text } if *h == handle => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The most recent text on `handle`.
    #[must_use]
    pub fn last_text(&self, handle: SurfaceHandle) -> Option<&str> {
        self.texts_for(handle).pop()
    }

    fn check_live(&self, handle: SurfaceHandle) -> Result<(), SurfaceError> {
        if self.live.contains(&handle.raw()) {
            Ok(())
        } else {
            Err(SurfaceError::UnknownHandle(handle))
        }
    }
}

impl Surface for RecordingSurface {
    fn create(
        &mut self,
        width: u16,
        height: u16,
        row: u16,
        col: u16,
        border: BorderStyle,
    ) -> Result<SurfaceHandle, SurfaceError> {
        if self.fail_creates > 0 {
            self.fail_creates -= 1;
            return Err(SurfaceError::CreateFailed("injected failure".to_owned()));
        }
        self.next_handle += 1;
        let handle = SurfaceHandle::new(self.next_handle);
        self.live.insert(handle.raw());
        self.ops.push(SurfaceOp::Create {
            handle,
            width,
            height,
            row,
            col,
            border,
        });
        Ok(handle)
    }

    fn reposition(
        &mut self,
        handle: SurfaceHandle,
        width: u16,
        row: u16,
        col: u16,
    ) -> Result<(), SurfaceError> {
        self.check_live(handle)?;
        self.ops.push(SurfaceOp::Reposition {
            handle,
            width,
            row,
            col,
        });
        Ok(())
    }

    fn set_text(&mut self, handle: SurfaceHandle, text: &str) -> Result<(), SurfaceError> {
        self.check_live(handle)?;
        self.ops.push(SurfaceOp::SetText {
            handle,
            text: text.to_owned(),
        });
        Ok(())
    }

    fn destroy(&mut self, handle: SurfaceHandle) -> Result<(), SurfaceError> {
        self.check_live(handle)?;
        self.live.remove(&handle.raw());
        self.ops.push(SurfaceOp::Destroy { handle });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mints_handles_sequentially_and_tracks_liveness() {
        let mut surface = RecordingSurface::new();
        let a = surface.create(10, 1, 0, 0, BorderStyle::None).unwrap();
        let b = surface.create(10, 1, 1, 0, BorderStyle::None).unwrap();
        assert_eq!(a, SurfaceHandle::new(1));
        assert_eq!(b, SurfaceHandle::new(2));
        assert_eq!(surface.live_handles(), vec![a, b]);

        surface.destroy(a).unwrap();
        assert_eq!(surface.live_handles(), vec![b]);
        assert_eq!(surface.created(), 2);
    }

    #[test]
    fn rejects_calls_on_dead_handles() {
        let mut surface = RecordingSurface::new();
        let a = surface.create(10, 1, 0, 0, BorderStyle::None).unwrap();
        surface.destroy(a).unwrap();
        assert_eq!(
            surface.set_text(a, "late"),
            Err(SurfaceError::UnknownHandle(a))
        );
        assert_eq!(surface.destroy(a), Err(SurfaceError::UnknownHandle(a)));
    }

    #[test]
    fn injected_create_failures_are_consumed_in_order() {
        let mut surface = RecordingSurface::new();
        surface.fail_next_creates(1);
        assert!(surface.create(10, 1, 0, 0, BorderStyle::None).is_err());
        assert!(surface.create(10, 1, 0, 0, BorderStyle::None).is_ok());
        assert_eq!(surface.created(), 1);
    }

    #[test]
    fn records_texts_per_handle() {
        let mut surface = RecordingSurface::new();
        let a = surface.create(10, 1, 0, 0, BorderStyle::None).unwrap();
        surface.set_text(a, "one").unwrap();
        surface.set_text(a, "two").unwrap();
        assert_eq!(surface.texts_for(a), vec!["one", "two"]);
        assert_eq!(surface.last_text(a), Some("two"));
    }
}
