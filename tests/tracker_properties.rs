//! Property tests for contact bookkeeping

use proptest::prelude::*;
use std::collections::BTreeMap;
use touch_overlay::{AffineSurface, ContactTracker, RawTouch, TouchEvent, TrackerSignal};

#[derive(Debug, Clone)]
enum Op {
    Begin(f64, f64),
    Move(usize, f64, f64),
    End(usize),
    Cancel(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.0f64..1000.0, 0.0f64..1000.0).prop_map(|(x, y)| Op::Begin(x, y)),
        (any::<usize>(), 0.0f64..1000.0, 0.0f64..1000.0).prop_map(|(i, x, y)| Op::Move(i, x, y)),
        any::<usize>().prop_map(Op::End),
        any::<usize>().prop_map(Op::Cancel),
    ]
}

proptest! {
    #[test]
    fn prop_active_count_matches_balance(ops in prop::collection::vec(op(), 0..64)) {
        let surface = AffineSurface::identity();
        let mut tracker = ContactTracker::new();
        // host touch id -> latest position
        let mut down: BTreeMap<u64, (f64, f64)> = BTreeMap::new();
        let mut next_touch = 0u64;
        let mut peak = 0usize;

        for op in ops {
            match op {
                Op::Begin(x, y) => {
                    let id = next_touch;
                    next_touch += 1;
                    down.insert(id, (x, y));
                    let signal = tracker.handle(&TouchEvent::began(vec![RawTouch::new(id, x, y)]), &surface);
                    prop_assert_eq!(signal, TrackerSignal::Active);
                }
                Op::Move(pick, x, y) => {
                    if down.is_empty() {
                        continue;
                    }
                    let id = *down.keys().nth(pick % down.len()).unwrap();
                    down.insert(id, (x, y));
                    let before = tracker.active_set().len();
                    tracker.handle(&TouchEvent::moved(vec![RawTouch::new(id, x, y)]), &surface);
                    prop_assert_eq!(tracker.active_set().len(), before);
                }
                Op::End(pick) | Op::Cancel(pick) => {
                    if down.is_empty() {
                        continue;
                    }
                    let id = *down.keys().nth(pick % down.len()).unwrap();
                    let (x, y) = down.remove(&id).unwrap();
                    let touches = vec![RawTouch::new(id, x, y)];
                    let event = match op {
                        Op::End(_) => TouchEvent::ended(touches),
                        _ => TouchEvent::cancelled(touches),
                    };
                    let signal = tracker.handle(&event, &surface);
                    prop_assert_eq!(signal.is_terminal(), down.is_empty());
                }
            }

            peak = peak.max(down.len());
            prop_assert_eq!(tracker.active_set().len(), down.len());
            prop_assert_eq!(tracker.live_count(), down.len());

            let mut positions: Vec<(f64, f64)> = tracker
                .active_set()
                .iter()
                .map(|c| (c.position.x, c.position.y))
                .collect();
            let mut expected: Vec<(f64, f64)> = down.values().copied().collect();
            positions.sort_by(|a, b| a.partial_cmp(b).unwrap());
            expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
            prop_assert_eq!(positions, expected);

            let ids: Vec<u32> = tracker.active_set().iter().map(|c| c.id.0).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
            // Smallest-free allocation never exceeds the peak number of simultaneous contacts.
            prop_assert!(ids.iter().all(|id| (*id as usize) < peak));
        }
    }
}
