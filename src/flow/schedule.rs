//! Virtual-clock timer queue
//!
//! Every delayed transition is a named event scheduled here. The host owns
//! real time: it advances the clock and asks for the next deadline so it can
//! arm a single browser timer. Events fire in deadline order, ties in
//! scheduling order.

/// Milliseconds on the host clock
pub type Millis = u64;

#[derive(Debug, Clone)]
struct Pending<E> {
    /// Scheduling order, breaks deadline ties
    seq: u64,
    due: Millis,
    event: E,
}

/// Pending events keyed by deadline
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now: Millis,
    next_seq: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Move the clock forward. Going backwards is ignored.
    pub fn set_now(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }

    /// Schedule `event` to fire `delay` ms from now
    pub fn schedule(&mut self, delay: Millis, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            seq,
            due: self.now.saturating_add(delay),
            event,
        });
    }

    /// Drop every pending event matching `pred`
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&E) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| !pred(&p.event));
        before - self.pending.len()
    }

    pub fn is_pending(&self, mut pred: impl FnMut(&E) -> bool) -> bool {
        self.pending.iter().any(|p| pred(&p.event))
    }

    /// Earliest deadline still pending
    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Remove and return the earliest event that is due now.
    ///
    /// Events scheduled while draining with a zero delay are due too, so a
    /// caller looping on this sees them in the same pass.
    pub fn pop_due(&mut self) -> Option<E> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= self.now)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(idx).event)
    }
}
