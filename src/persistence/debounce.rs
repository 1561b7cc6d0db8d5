use std::time::{Duration, Instant};

/// Cancellable delayed action keyed by the latest value.
///
/// Each `schedule` replaces the pending value and restarts the delay, so a
/// burst of changes produces one write carrying the last value. Time is
/// supplied by the caller; nothing runs in the background.
#[derive(Debug, Clone)]
pub struct DebouncedTask<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> DebouncedTask<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    #[must_use]
    pub fn pending_value(&self) -> Option<&T> {
        self.pending.as_ref().map(|pending| &pending.value)
    }

    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// Takes the value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.deadline);
        if !due {
            return None;
        }
        self.pending.take().map(|pending| pending.value)
    }

    /// Takes the value regardless of its deadline.
    pub fn take_now(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// Drops any pending value; returns whether one was dropped.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
