//! Simulation clock and event queue
//!
//! The scheduler owns the single logical clock of a run. Actions are queued
//! with a trigger time and fire in (time, insertion order) order, so events
//! scheduled for the same instant replay in exactly the order they were
//! created. Cancellation is lazy: a cancelled entry stays in the heap and is
//! discarded when it reaches the front.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use tracing::trace;

/// Simulated time in minutes since the start of the run
pub type SimTime = f64;

/// Handle to a scheduled event, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey(u64);

#[derive(Debug)]
struct Entry<A> {
    time: SimTime,
    seq: u64,
    action: A,
}

impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<A> Eq for Entry<A> {}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Entry<A> {
    // Reversed so that the max-heap pops the earliest (time, seq) first
    fn cmp(&self, other: &Self) -> Ordering {
        other.time.total_cmp(&self.time).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Discrete-event scheduler over actions of type `A`
#[derive(Debug)]
pub struct Scheduler<A> {
    now: SimTime,
    next_seq: u64,
    queue: BinaryHeap<Entry<A>>,
    live: HashSet<u64>,
    fired: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    /// Create an empty scheduler at time zero
    pub fn new() -> Self {
        Self { now: 0.0, next_seq: 0, queue: BinaryHeap::new(), live: HashSet::new(), fired: 0 }
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule an action `delay` minutes from now
    ///
    /// Negative and NaN delays are treated as zero; the clock never runs backwards.
    pub fn schedule_in(&mut self, delay: SimTime, action: A) -> EventKey {
        let delay = if delay.is_nan() { 0.0 } else { delay.max(0.0) };
        self.push(self.now + delay, action)
    }

    /// Schedule an action at an absolute time, clamped to the current time
    pub fn schedule_at(&mut self, time: SimTime, action: A) -> EventKey {
        let time = if time.is_nan() { self.now } else { time.max(self.now) };
        self.push(time, action)
    }

    fn push(&mut self, time: SimTime, action: A) -> EventKey {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert(seq);
        self.queue.push(Entry { time, seq, action });
        EventKey(seq)
    }

    /// Cancel a pending event; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, key: EventKey) -> bool {
        let removed = self.live.remove(&key.0);
        if removed {
            trace!(event = key.0, "Cancelled scheduled event");
        }
        removed
    }

    /// Whether the event is still waiting to fire
    pub fn is_pending(&self, key: EventKey) -> bool {
        self.live.contains(&key.0)
    }

    /// Number of live events in the queue
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// Number of events fired so far
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Trigger time of the next live event
    pub fn peek_time(&mut self) -> Option<SimTime> {
        self.discard_cancelled();
        self.queue.peek().map(|entry| entry.time)
    }

    /// Advance to and return the next event that fires at or before `horizon`
    ///
    /// When the next live event lies beyond the horizon (or none remains) the
    /// clock is moved to the horizon and `None` is returned; the remaining
    /// events stay queued.
    pub fn next_until(&mut self, horizon: SimTime) -> Option<(SimTime, A)> {
        self.discard_cancelled();
        match self.queue.peek() {
            Some(entry) if entry.time <= horizon => {}
            _ => {
                self.now = self.now.max(horizon);
                return None;
            }
        }

        let entry = self.queue.pop()?;
        self.live.remove(&entry.seq);
        self.now = entry.time;
        self.fired += 1;
        Some((entry.time, entry.action))
    }

    fn discard_cancelled(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.live.contains(&entry.seq) {
                break;
            }
            self.queue.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_fire_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(5.0, "late");
        scheduler.schedule_in(1.0, "early");
        scheduler.schedule_in(3.0, "middle");

        let order: Vec<_> =
            std::iter::from_fn(|| scheduler.next_until(100.0)).map(|(_, a)| a).collect();
        assert_eq!(order, vec!["early", "middle", "late"]);
    }

    #[test]
    fn test_same_instant_ties_break_by_insertion_order() {
        let mut scheduler = Scheduler::new();
        for i in 0..10 {
            scheduler.schedule_in(2.0, i);
        }

        let order: Vec<_> =
            std::iter::from_fn(|| scheduler.next_until(100.0)).map(|(_, a)| a).collect();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_cancelled_events_never_fire() {
        let mut scheduler = Scheduler::new();
        let keep = scheduler.schedule_in(1.0, "keep");
        let drop = scheduler.schedule_in(2.0, "drop");

        assert!(scheduler.cancel(drop));
        assert!(!scheduler.cancel(drop));
        assert!(scheduler.is_pending(keep));
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(scheduler.next_until(10.0), Some((1.0, "keep")));
        assert_eq!(scheduler.next_until(10.0), None);
        assert!(!scheduler.cancel(keep));
    }

    #[test]
    fn test_horizon_stops_the_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(5.0, "inside");
        scheduler.schedule_in(50.0, "outside");

        assert_eq!(scheduler.next_until(10.0), Some((5.0, "inside")));
        assert_eq!(scheduler.next_until(10.0), None);
        assert_eq!(scheduler.now(), 10.0);
        // The truncated event is still queued
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.fired(), 1);
    }

    #[test]
    fn test_clock_never_decreases() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(4.0, 'a');
        assert_eq!(scheduler.next_until(10.0), Some((4.0, 'a')));

        scheduler.schedule_in(-3.0, 'b');
        scheduler.schedule_at(1.0, 'c');
        scheduler.schedule_in(f64::NAN, 'd');

        let mut last = scheduler.now();
        while let Some((time, _)) = scheduler.next_until(10.0) {
            assert!(time >= last);
            last = time;
        }
        assert_eq!(last, 4.0);
        assert_eq!(scheduler.now(), 10.0);
    }

    #[test]
    fn test_events_scheduled_during_dispatch_at_same_instant_run_after_existing() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(1.0, 1);
        scheduler.schedule_in(1.0, 2);

        let (_, first) = scheduler.next_until(10.0).unwrap();
        assert_eq!(first, 1);
        scheduler.schedule_in(0.0, 3);

        assert_eq!(scheduler.next_until(10.0), Some((1.0, 2)));
        assert_eq!(scheduler.next_until(10.0), Some((1.0, 3)));
    }
}
