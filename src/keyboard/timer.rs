use std::time::{Duration, Instant};

/// How long a key tile stays pressed after a matching key press.
pub const PRESS_FLASH: Duration = Duration::from_millis(100);

/// A cancellable one-shot deadline, polled from the UI tick.
///
/// At most one deadline is pending: arming cancels the previous one first.
#[derive(Clone, Copy, Debug)]
pub struct RevertTimer {
    duration: Duration,
    deadline: Option<Instant>,
}

impl Default for RevertTimer {
    fn default() -> Self {
        Self::new(PRESS_FLASH)
    }
}

impl RevertTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadline: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.cancel();
        self.deadline = Some(now + self.duration);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True while the deadline is still ahead of `now`.
    pub fn is_active(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Fire the timer if due. Returns true exactly once per armed deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
