//! Acquire-versus-timeout contests
//!
//! A passenger that may renege races a resource request against a timer. The
//! first side to fire wins and the other is withdrawn:
//!
//! - a grant cancels the pending timer;
//! - a timeout withdraws the queued request, and if the grant has already
//!   been issued but not yet delivered, releases that slot straight back to
//!   the pool so it is never silently held.
//!
//! Grants are delivered through the event queue, so a timer and a grant can
//! both fire at the same instant; whichever is dequeued first decides the race.

use super::resource::{Acquire, Grant, ResourcePool, Ticket};
use super::scheduler::{EventKey, Scheduler, SimTime};
use crate::simulation::{SimulationError, SimulationResult};

/// An outstanding request for a pool, optionally raced against a timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contest<P> {
    /// Which pool the request was made to
    pub pool: P,
    /// Ticket of the request
    pub ticket: Ticket,
    /// Renege timer, absent when the request cannot time out
    pub timer: Option<EventKey>,
    /// Time the request was made
    pub requested_at: SimTime,
    /// Whether the slot has been granted
    pub granted: bool,
    /// Whether the timer won and the request is gone
    pub closed: bool,
}

/// How a timeout was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutResolution<O> {
    /// The timer belongs to an older contest and is ignored
    Stale,
    /// The queued request was withdrawn; the passenger reneges
    Withdrawn,
    /// The slot had been granted but not yet delivered; it was released
    /// again, possibly promoting the next waiter
    LateGrant(Option<Grant<O>>),
}

impl<P: Copy> Contest<P> {
    /// Request a slot, arming a renege timer when the request has to queue
    ///
    /// `on_timeout` builds the action the scheduler fires when the tolerance
    /// elapses. With `tolerance == None` the request waits indefinitely.
    pub fn enter<O: Copy, A>(
        pool_id: P,
        pool: &mut ResourcePool<O>,
        owner: O,
        priority: i32,
        tolerance: Option<SimTime>,
        scheduler: &mut Scheduler<A>,
        on_timeout: impl FnOnce(Ticket) -> A,
    ) -> Self {
        let requested_at = scheduler.now();
        match pool.request(owner, priority) {
            Acquire::Granted(ticket) => {
                Self { pool: pool_id, ticket, timer: None, requested_at, granted: true, closed: false }
            }
            Acquire::Queued(ticket) => {
                let timer = tolerance.map(|t| scheduler.schedule_in(t, on_timeout(ticket)));
                Self { pool: pool_id, ticket, timer, requested_at, granted: false, closed: false }
            }
        }
    }

    /// Accept a delivered grant; returns false when the grant is not for this contest
    pub fn accept_grant<A>(&mut self, ticket: Ticket, scheduler: &mut Scheduler<A>) -> bool {
        if ticket != self.ticket || self.granted || self.closed {
            return false;
        }
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
        self.granted = true;
        true
    }

    /// Resolve a fired renege timer
    pub fn resolve_timeout<O: Copy>(
        &mut self,
        ticket: Ticket,
        pool: &mut ResourcePool<O>,
    ) -> SimulationResult<TimeoutResolution<O>> {
        if ticket != self.ticket || self.granted || self.closed {
            return Ok(TimeoutResolution::Stale);
        }
        self.timer = None;
        self.closed = true;

        if pool.withdraw(ticket) {
            return Ok(TimeoutResolution::Withdrawn);
        }
        if pool.is_holding(ticket) {
            let next = pool.release(ticket)?;
            return Ok(TimeoutResolution::LateGrant(next));
        }
        Err(SimulationError::resource_error(format!(
            "{}: timed-out ticket {} is neither waiting nor holding",
            pool.name(),
            ticket.sequence()
        )))
    }

    /// Minutes spent waiting, measured at `now`
    pub fn waited(&self, now: SimTime) -> SimTime {
        (now - self.requested_at).max(0.0)
    }

    /// Undo the contest during fault recovery: withdraw or release the
    /// request and disarm the timer
    pub fn abandon<O: Copy, A>(
        &mut self,
        pool: &mut ResourcePool<O>,
        scheduler: &mut Scheduler<A>,
    ) -> SimulationResult<Option<Grant<O>>> {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
        if pool.withdraw(self.ticket) {
            return Ok(None);
        }
        if pool.is_holding(self.ticket) {
            return pool.release(self.ticket);
        }
        Ok(None)
    }
}
