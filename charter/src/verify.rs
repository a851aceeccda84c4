use crate::lane_assigner::ChartEvent;
use std::fmt;

/// A broken playability rule, pointing at the event index that breaks it
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    LaneOutOfRange { index: usize, lane: u8 },
    OutOfOrder { index: usize, previous: u64, time: u64 },
    RepeatedLane { index: usize, lane: u8 },
    GapTooShort { index: usize, lane: u8, free_at: u64, time: u64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::LaneOutOfRange { index, lane } => {
                write!(f, "note #{}: lane {} does not exist", index, lane)
            }
            Violation::OutOfOrder { index, previous, time } => {
                write!(f, "note #{}: {} ms comes after {} ms", index, time, previous)
            }
            Violation::RepeatedLane { index, lane } => {
                write!(f, "note #{}: lane {} used twice in a row", index, lane)
            }
            Violation::GapTooShort { index, lane, free_at, time } => write!(
                f,
                "note #{}: lane {} reused at {} ms, free only from {} ms",
                index, lane, time, free_at
            ),
        }
    }
}

/// Check a finished chart against the rules the constrained assigner enforces.
///
/// `min_gap` is the idle time each lane needs after a note ends. Pass 0 to
/// check ordering and lane variety only.
pub fn verify_chart(events: &[ChartEvent], lane_count: u8, min_gap: u64) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut free_at: Vec<Option<u64>> = vec![None; lane_count as usize];
    let mut previous: Option<&ChartEvent> = None;

    for (index, event) in events.iter().enumerate() {
        if event.lane >= lane_count {
            violations.push(Violation::LaneOutOfRange {
                index,
                lane: event.lane,
            });
            previous = Some(event);
            continue;
        }

        if let Some(prev) = previous {
            if event.time < prev.time {
                violations.push(Violation::OutOfOrder {
                    index,
                    previous: prev.time,
                    time: event.time,
                });
            }
            if event.lane == prev.lane {
                violations.push(Violation::RepeatedLane {
                    index,
                    lane: event.lane,
                });
            }
        }

        let slot = &mut free_at[event.lane as usize];
        if let Some(free) = *slot {
            if event.time < free {
                violations.push(Violation::GapTooShort {
                    index,
                    lane: event.lane,
                    free_at: free,
                    time: event.time,
                });
            }
        }
        *slot = Some(
            event
                .time
                .saturating_add(event.duration)
                .saturating_add(min_gap),
        );
        previous = Some(event);
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(time: u64, lane: u8, duration: u64) -> ChartEvent {
        ChartEvent { time, lane, duration }
    }

    #[test]
    fn test_clean_chart() {
        let chart = vec![ev(300, 0, 200), ev(500, 1, 300), ev(800, 2, 100), ev(900, 0, 500)];
        assert!(verify_chart(&chart, 4, 200).is_empty());
    }

    #[test]
    fn test_detects_repeat_and_short_gap() {
        let chart = vec![ev(0, 1, 100), ev(100, 1, 100)];
        let violations = verify_chart(&chart, 4, 250);
        assert_eq!(
            violations,
            vec![
                Violation::RepeatedLane { index: 1, lane: 1 },
                Violation::GapTooShort { index: 1, lane: 1, free_at: 350, time: 100 },
            ]
        );
    }

    #[test]
    fn test_huge_times_are_reported_not_overflowed() {
        let chart = vec![
            ev(u64::MAX - 10, 0, 100),
            ev(u64::MAX - 5, 1, 0),
            ev(u64::MAX - 1, 0, 0),
        ];
        let violations = verify_chart(&chart, 4, 250);
        assert_eq!(
            violations,
            vec![Violation::GapTooShort {
                index: 2,
                lane: 0,
                free_at: u64::MAX,
                time: u64::MAX - 1,
            }]
        );
    }

    #[test]
    fn test_detects_order_and_range() {
        let chart = vec![ev(500, 0, 100), ev(400, 1, 100), ev(600, 7, 100)];
        let violations = verify_chart(&chart, 4, 0);
        assert_eq!(violations.len(), 2);
        assert!(matches!(violations[0], Violation::OutOfOrder { index: 1, .. }));
        assert!(matches!(violations[1], Violation::LaneOutOfRange { index: 2, lane: 7 }));
        assert!(violations[1].to_string().contains("lane 7"));
    }
}
