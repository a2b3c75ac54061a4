use crate::pins::Observation;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy)]
pub struct ClockDef {
    pub period: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Outputs computed at an earlier time become visible.
    Settle(Observation),
    /// The clock moves to the given level.
    Clock { next_level: bool },
}

impl EventKind {
    // Settles at a given time land before a clock toggle at the same time.
    fn rank(&self) -> u8 {
        match self {
            Self::Settle(_) => 0,
            Self::Clock { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimEvent {
    pub time: u64,
    pub kind: EventKind,
    seq: u64,
}

impl PartialEq for SimEvent {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for SimEvent {}

impl PartialOrd for SimEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Earlier time has higher priority (BinaryHeap is a Max-Heap)
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.kind.rank().cmp(&self.kind.rank()))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    pub(crate) time: u64,
    pub(crate) clock: Option<ClockDef>,
    event_queue: BinaryHeap<SimEvent>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.event_queue.peek().map(|e| e.time)
    }

    pub fn push(&mut self, time: u64, kind: EventKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.event_queue.push(SimEvent { time, kind, seq });
    }

    pub fn pop_all_at_next_time(&mut self) -> Option<(u64, Vec<SimEvent>)> {
        let next_time = self.next_event_time()?;
        let mut events = Vec::new();
        while let Some(ev) = self.event_queue.peek() {
            if ev.time != next_time {
                break;
            }
            if let Some(ev) = self.event_queue.pop() {
                events.push(ev);
            }
        }
        Some((next_time, events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_time_then_rank_then_insertion_order() {
        let mut sched = Scheduler::new();
        sched.push(10, EventKind::Clock { next_level: true });
        sched.push(5, EventKind::Clock { next_level: false });
        sched.push(10, EventKind::Settle(Observation::default()));
        sched.push(
            10,
            EventKind::Settle(Observation {
                uo_out: Some(1),
                uio_oe: 0,
            }),
        );

        let (t, evs) = sched.pop_all_at_next_time().unwrap();
        assert_eq!(t, 5);
        assert_eq!(evs.len(), 1);

        let (t, evs) = sched.pop_all_at_next_time().unwrap();
        assert_eq!(t, 10);
        let kinds: Vec<_> = evs.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Settle(Observation::default()),
                EventKind::Settle(Observation {
                    uo_out: Some(1),
                    uio_oe: 0
                }),
                EventKind::Clock { next_level: true },
            ]
        );
        assert!(sched.pop_all_at_next_time().is_none());
    }
}
