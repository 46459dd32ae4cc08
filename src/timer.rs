//! Wall-clock deadlines for search time management.
//!
//! The search polls the deadline at every node entry; there is no timer
//! thread and no other cancellation mechanism.

use std::time::{Duration, Instant};

/// A monotonic wall-clock deadline, possibly unlimited.
#[derive(Clone, Copy, Debug)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// A deadline that never expires.
    #[must_use]
    pub fn unlimited() -> Self {
        Deadline(None)
    }

    /// A deadline at a fixed instant.
    #[must_use]
    pub fn at(instant: Instant) -> Self {
        Deadline(Some(instant))
    }

    /// A deadline `duration` from now.
    #[must_use]
    pub fn after(duration: Duration) -> Self {
        Deadline(Some(Instant::now() + duration))
    }

    /// True once the deadline has passed.
    #[must_use]
    pub fn expired(&self) -> bool {
        match self.0 {
            Some(instant) => Instant::now() > instant,
            None => false,
        }
    }

    /// Time left until the deadline, `None` when unlimited.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.0
            .map(|instant| instant.saturating_duration_since(Instant::now()))
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Deadline::unlimited()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_unlimited_never_expires() {
        let deadline = Deadline::unlimited();
        assert!(!deadline.expired());
        assert_eq!(deadline.remaining(), None);
    }

    #[test]
    fn test_deadline_expires() {
        let deadline = Deadline::after(Duration::from_millis(20));
        assert!(!deadline.expired());
        thread::sleep(Duration::from_millis(40));
        assert!(deadline.expired());
        assert_eq!(deadline.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_deadline_in_past() {
        let past = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .expect("1 second ago should be valid");
        assert!(Deadline::at(past).expired());
    }
}
