use std::time::{Duration, Instant};

/// Trailing throttle with a guaranteed final flush.
///
/// Every offered value replaces the buffered one. A value is emitted immediately when
/// at least `interval` has elapsed since the previous emission (the very first offer
/// always emits); otherwise it waits in the buffer until the next eligible offer or an
/// explicit [`Throttle::flush`]. Time is supplied by the caller so the behavior is
/// reproducible.
#[derive(Clone, Debug)]
pub struct Throttle<T> {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Buffer `value`; returns it back if it should be emitted now.
    pub fn offer(&mut self, value: T, now: Instant) -> Option<T> {
        self.pending = Some(value);
        let due = match self.last_emit {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due { self.flush(now) } else { None }
    }

    /// Emit the buffered value, if any, regardless of the interval.
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        let out = self.pending.take()?;
        self.last_emit = Some(now);
        Some(out)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the buffered value without emitting it.
    pub fn discard(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/throttle.rs"]
mod tests;
