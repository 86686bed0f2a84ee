use foundation::time::Millis;

/// Handle returned by [`TimerQueue::schedule`]; used to cancel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

struct Pending<T> {
    id: TimerId,
    due: Millis,
    payload: T,
}

/// Single-shot, cancellable timers.
///
/// Nothing runs on its own: the owner calls [`TimerQueue::take_due`] from its
/// frame callback and handles the returned payloads in place. That keeps all
/// state owned by the one execution context that polls the queue.
///
/// Ordering contract:
/// - Due payloads are returned ordered by `(due, schedule order)`.
/// - A cancelled timer never fires, even if it was already due.
pub struct TimerQueue<T> {
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a timer that becomes due `delay_ms` after `now`.
    pub fn schedule(&mut self, now: Millis, delay_ms: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(Pending {
            id,
            due: now.saturating_add(delay_ms),
            payload,
        });
        id
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Removes and returns every payload due at or before `now`.
    pub fn take_due(&mut self, now: Millis) -> Vec<T> {
        let mut due = Vec::new();
        let mut keep = Vec::with_capacity(self.pending.len());
        for p in self.pending.drain(..) {
            if p.due <= now {
                due.push(p);
            } else {
                keep.push(p);
            }
        }
        self.pending = keep;

        due.sort_by(|a, b| a.due.cmp(&b.due).then_with(|| a.id.cmp(&b.id)));
        due.into_iter().map(|p| p.payload).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;
    use foundation::time::Millis;

    #[test]
    fn fires_only_when_due() {
        let mut q = TimerQueue::new();
        q.schedule(Millis(0), 2000, "hover");
        assert!(q.take_due(Millis(1999)).is_empty());
        assert_eq!(q.take_due(Millis(2000)), vec!["hover"]);
        assert!(q.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let id = q.schedule(Millis(0), 10, 1);
        assert!(q.is_pending(id));
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert!(q.take_due(Millis(100)).is_empty());
    }

    #[test]
    fn due_payloads_are_ordered_by_deadline_then_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(Millis(0), 30, "c");
        q.schedule(Millis(0), 10, "a");
        q.schedule(Millis(5), 5, "b");
        assert_eq!(q.next_deadline(), Some(Millis(10)));
        assert_eq!(q.take_due(Millis(50)), vec!["a", "b", "c"]);
    }

    #[test]
    fn cancel_all_clears_pending() {
        let mut q = TimerQueue::new();
        q.schedule(Millis(0), 1, ());
        q.schedule(Millis(0), 2, ());
        assert_eq!(q.len(), 2);
        q.cancel_all();
        assert_eq!(q.next_deadline(), None);
    }
}
