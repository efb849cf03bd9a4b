//! Virtual-clock timer queue.
//!
//! Replaces `setTimeout` / `setInterval`: the frame loop advances the clock and
//! drains due timers one at a time, so a handler can cancel a timer that is due
//! in the same frame before it ever fires.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<E> {
    id: TimerId,
    due: f64,
    every: Option<f64>,
    event: E,
}

// a zero interval would fire forever inside a single pop_due drain
const MIN_INTERVAL_MS: f64 = 1.0;

#[derive(Debug)]
pub struct Timeline<E> {
    now: f64,
    next_id: u64,
    entries: Vec<Entry<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Timeline {
            now: 0.0,
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<E: Clone> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock in milliseconds
    /// - while draining, this is the due time of the timer being handled
    pub fn now(&self) -> f64 {
        self.now
    }

    /// One-shot timer, `delay_ms` from now
    pub fn after(&mut self, delay_ms: f64, event: E) -> TimerId {
        self.push(self.now + delay_ms.max(0.0), None, event)
    }

    /// Recurring timer, first firing one interval from now
    pub fn every(&mut self, interval_ms: f64, event: E) -> TimerId {
        let interval = interval_ms.max(MIN_INTERVAL_MS);
        self.push(self.now + interval, Some(interval), event)
    }

    /// Returns false if the timer already fired (one-shot) or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    #[cfg(test)]
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    #[cfg(test)]
    pub fn recurring(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.every.is_some())
            .count()
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Earliest timer due at or before `until`
    /// - ties go to the timer created first
    /// - recurring timers are re-armed from their due time, not from `until`
    pub fn pop_due(&mut self, until: f64) -> Option<(TimerId, E)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(index, _)| index)?;

        self.now = self.now.max(self.entries[index].due);
        match self.entries[index].every {
            Some(interval) => {
                let entry = &mut self.entries[index];
                entry.due += interval;
                Some((entry.id, entry.event.clone()))
            }
            None => {
                let entry = self.entries.swap_remove(index);
                Some((entry.id, entry.event))
            }
        }
    }

    /// Moves the clock forward once every due timer has been drained
    pub fn settle(&mut self, now: f64) {
        self.now = self.now.max(now);
    }

    fn push(&mut self, due: f64, every: Option<f64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due,
            every,
            event,
        });
        id
    }
}
