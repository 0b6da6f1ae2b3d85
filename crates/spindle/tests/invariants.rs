//! Property checks over random event interleavings: slot uniqueness,
//! state/window accounting, and grace-delay cleanup.

use std::time::Duration;

use proptest::prelude::*;

use spindle::{Aggregator, NameTable, ProgressEvent, SourceId, Viewport};
use spindle_harness::{ManualTimer, RecordingSurface};

const IDS: [&str; 3] = ["a", "b", "c"];

fn build() -> Aggregator<RecordingSurface, ManualTimer, NameTable> {
    let mut names = NameTable::new();
    for id in IDS {
        names.insert(id, format!("tool-{id}"));
    }
    let mut agg = Aggregator::new(RecordingSurface::new(), ManualTimer::new(), names);
    agg.set_viewport(Viewport::new(120, 40));
    agg
}

proptest! {
    /// No interleaving of begins, reports, ends, and clock advances may
    /// ever leave two live sources on one slot, or a window without a
    /// state behind it.
    #[test]
    fn random_interleavings_keep_slots_and_windows_consistent(
        steps in proptest::collection::vec((0usize..3, 0u8..4), 1..80),
    ) {
        let mut agg = build();
        for (idx, action) in steps {
            let id = IDS[idx];
            match action {
                0 => {
                    let _ = agg.ingest(ProgressEvent::begin(id).title("Work"));
                }
                1 => {
                    let _ = agg.ingest(ProgressEvent::report(id).percentage(50));
                }
                2 => {
                    let _ = agg.ingest(ProgressEvent::end(id));
                }
                _ => {
                    agg.timer_mut().advance(Duration::from_millis(2600));
                    let _ = agg.tick();
                }
            }

            let mut slots: Vec<_> = IDS
                .iter()
                .filter_map(|id| agg.slot_of(&SourceId::new(*id)))
                .collect();
            let live = slots.len();
            slots.sort();
            slots.dedup();
            prop_assert_eq!(slots.len(), live);
            prop_assert_eq!(agg.live_count(), live);
            prop_assert_eq!(agg.surface().live_handles().len(), live);
        }
    }

    /// However many cycles ran, advancing a full grace delay after the
    /// last end clears every finished source.
    #[test]
    fn a_full_grace_delay_always_clears_finished_sources(
        ends in proptest::collection::vec(0usize..3, 1..10),
    ) {
        let mut agg = build();
        for idx in &ends {
            let id = IDS[*idx];
            let _ = agg.ingest(ProgressEvent::begin(id));
            let _ = agg.ingest(ProgressEvent::end(id));
        }
        agg.timer_mut().advance(Duration::from_millis(5000));
        let _ = agg.tick();
        prop_assert!(agg.is_idle());
        prop_assert!(agg.surface().live_handles().is_empty());
    }
}
