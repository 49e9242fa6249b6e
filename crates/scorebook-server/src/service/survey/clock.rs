use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use jiff::Timestamp;

/// Identifier and processing time of one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadStamp {
    /// Milliseconds since the Unix epoch, unique within the process.
    pub id: i64,
    /// Processing time matching `id`.
    pub at: Timestamp,
}

/// Millisecond clock that never hands out the same value twice.
///
/// When two uploads fall into the same millisecond the later one is bumped
/// to the previous value plus one. Clones share the last issued value.
#[derive(Debug, Clone, Default)]
pub struct UploadClock {
    last: Arc<AtomicI64>,
}

impl UploadClock {
    /// Creates a new clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a stamp for the current time.
    pub fn stamp(&self) -> UploadStamp {
        self.stamp_at(Timestamp::now())
    }

    fn stamp_at(&self, now: Timestamp) -> UploadStamp {
        let millis = now.as_millisecond();
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(millis.max(last + 1))
            })
            .unwrap_or_else(|last| last);

        let id = millis.max(previous + 1);
        let at = Timestamp::from_millisecond(id).unwrap_or(now);
        UploadStamp { id, at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_millisecond_is_bumped() {
        let clock = UploadClock::new();
        let now = Timestamp::from_millisecond(1_700_000_000_000).unwrap();

        let first = clock.stamp_at(now);
        let second = clock.stamp_at(now);

        assert_eq!(first.id, 1_700_000_000_000);
        assert_eq!(second.id, 1_700_000_000_001);
        assert_eq!(second.at.as_millisecond(), second.id);
    }

    #[test]
    fn test_later_time_is_used_as_is() {
        let clock = UploadClock::new();
        clock.stamp_at(Timestamp::from_millisecond(1_000).unwrap());

        let stamp = clock.stamp_at(Timestamp::from_millisecond(5_000).unwrap());
        assert_eq!(stamp.id, 5_000);
    }

    #[test]
    fn test_clones_share_state() {
        let clock = UploadClock::new();
        let other = clock.clone();
        let now = Timestamp::from_millisecond(42).unwrap();

        assert_ne!(clock.stamp_at(now).id, other.stamp_at(now).id);
    }

    #[test]
    fn test_stamp_is_current() {
        let before = Timestamp::now().as_millisecond();
        let stamp = UploadClock::new().stamp();
        assert!(stamp.id >= before);
    }
}
